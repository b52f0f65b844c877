//! 综述根实体定义
//!
//! 对应 reviews 表。一条综述记录代表一份文献综述数据提取表单，
//! id 由客户端生成，文本字段缺省为空串，数值字段缺省为 NULL。

use serde::{Deserialize, Serialize};
use validator::Validate;

/// 综述扁平行
///
/// 不含子集合的 reviews 表单行形状，既是存储行也是嵌套表示中的根字段。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate, sqlx::FromRow)]
pub struct ReviewRecord {
    /// 客户端生成的主键
    #[validate(length(min = 1, message = "id 不能为空"))]
    pub id: String,
    #[serde(default)]
    pub extractor_name: String,
    #[serde(default)]
    pub extraction_date: String,
    #[serde(default)]
    pub first_author: String,
    #[serde(default)]
    pub year_of_publication: Option<i32>,
    #[serde(default)]
    pub search_strategy_desc: String,
    #[serde(default)]
    pub sample_age_desc: String,
    #[serde(default)]
    pub sample_age_lowest_mean: Option<f64>,
    #[serde(default)]
    pub sample_age_highest_mean: Option<f64>,
    /// 提取者确认该综述满足全部入选标准
    #[serde(default)]
    pub are_you_sure: Option<bool>,
    #[serde(default)]
    pub inclusion_exclusion_concerns: String,
    #[serde(default)]
    pub earliest_publication_year: Option<i32>,
    #[serde(default)]
    pub latest_publication_year: Option<i32>,
    /// k：纳入研究数
    #[serde(default)]
    pub number_of_studies: Option<i32>,
    /// N：跨研究合并样本量
    #[serde(default)]
    pub number_of_samples: Option<i32>,
    #[serde(default)]
    pub rating_of_low_risk_bias: Option<f64>,
    #[serde(default)]
    pub rating_of_moderate_risk_bias: Option<f64>,
    #[serde(default)]
    pub rating_of_high_risk_bias: Option<f64>,
    #[serde(default)]
    pub bias_rating_system: String,
    #[serde(default)]
    pub bias_rating_system_reference: String,
    #[serde(default)]
    pub level_of_evidence_judgement_1: String,
    #[serde(default)]
    pub level_of_evidence_judgement_2: String,
    #[serde(default)]
    pub level_of_evidence_judgement_3: String,
    #[serde(default)]
    pub notes: String,
}

/// 综述列表摘要
///
/// 列表视图使用的投影，仅含索引页需要的五个字段。
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct ReviewSummary {
    pub id: String,
    pub extractor_name: String,
    pub extraction_date: String,
    pub first_author: String,
    pub year_of_publication: Option<i32>,
}
