//! 子实体定义
//!
//! 暴露、结局、调节变量和效应量，均归属于唯一一条综述。
//! 子记录的 review_id 在写入时由服务端统一赋值，客户端提交的值一律覆盖。

use serde::{Deserialize, Serialize};
use validator::Validate;

/// 暴露（研究变量：屏幕使用行为的内容、设备、场景等）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate, sqlx::FromRow)]
pub struct Exposure {
    #[validate(length(min = 1, message = "id 不能为空"))]
    pub id: String,
    /// 归属综述 ID，写入时由服务端赋值
    #[serde(default)]
    pub review_id: Option<String>,
    #[serde(default)]
    pub content_specifics: String,
    #[serde(default)]
    pub content_category: String,
    #[serde(default)]
    pub measure: String,
    #[serde(default)]
    pub measure_type: String,
    #[serde(default)]
    pub device_type: String,
    #[serde(default)]
    pub device_category: String,
    #[serde(default)]
    pub device_portability: String,
    #[serde(default)]
    pub setting: String,
    #[serde(default)]
    pub setting_category: String,
    #[serde(default)]
    pub social_environment_specific: String,
    #[serde(default)]
    pub social_environment_general: String,
}

/// 结局（被测量的结果变量）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate, sqlx::FromRow)]
pub struct Outcome {
    #[validate(length(min = 1, message = "id 不能为空"))]
    pub id: String,
    #[serde(default)]
    pub review_id: Option<String>,
    #[serde(default)]
    pub measure: String,
    #[serde(default)]
    pub measure_type: String,
    #[serde(default)]
    pub specific_variable: String,
    #[serde(default)]
    pub higher_order_variable: String,
    #[serde(default)]
    pub category: String,
}

/// 调节变量
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate, sqlx::FromRow)]
pub struct Moderator {
    #[validate(length(min = 1, message = "id 不能为空"))]
    pub id: String,
    #[serde(default)]
    pub review_id: Option<String>,
    #[serde(default)]
    pub level: String,
    #[serde(default)]
    pub category: String,
}

/// 效应量
///
/// 关联行，没有独立主键：在一条综述内引用某个暴露、结局和调节变量，
/// 并记录关联强度的量化值。引用是否指向同一综述的子记录由客户端保证，
/// 服务端不做交叉校验。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct EffectSize {
    #[serde(default)]
    pub review_id: Option<String>,
    #[serde(default)]
    pub exposure_id: Option<String>,
    #[serde(default)]
    pub outcome_id: Option<String>,
    #[serde(default)]
    pub moderator_id: Option<String>,
    #[serde(default)]
    pub team_narrative_summary: String,
    #[serde(default)]
    pub value: Option<f64>,
    #[serde(default)]
    pub value_lower_bound: Option<f64>,
    #[serde(default)]
    pub value_upper_bound: Option<f64>,
    #[serde(default)]
    pub p_value: Option<f64>,
    #[serde(default)]
    pub statistical_test: String,
    #[serde(default)]
    pub comments: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use validator::Validate;

    #[test]
    fn test_exposure_defaults_from_sparse_json() {
        let exposure: Exposure = serde_json::from_str(r#"{"id": "e1"}"#).unwrap();
        assert_eq!(exposure.id, "e1");
        assert_eq!(exposure.review_id, None);
        assert_eq!(exposure.content_specifics, "");
        assert_eq!(exposure.social_environment_general, "");
    }

    #[test]
    fn test_child_rejects_empty_id() {
        let outcome: Outcome = serde_json::from_str(r#"{"id": ""}"#).unwrap();
        assert!(outcome.validate().is_err());

        let moderator: Moderator = serde_json::from_str(r#"{"id": ""}"#).unwrap();
        assert!(moderator.validate().is_err());
    }

    #[test]
    fn test_effect_size_all_fields_optional() {
        // 效应量没有主键，空对象也是合法的提交
        let es: EffectSize = serde_json::from_str("{}").unwrap();
        assert_eq!(es.exposure_id, None);
        assert_eq!(es.value, None);
        assert_eq!(es.comments, "");
    }
}
