//! 聚合引擎
//!
//! 扁平存储行与嵌套客户端表示之间的双向映射。映射规则集中在此处，
//! 仓储层不做散落的逐字段拷贝：
//! - `compose_review`：把综述行和四个子集合合并为嵌套聚合（纯合并，不过滤不排序）
//! - `decompose_review`：逆操作，剥离四个子集合得到扁平综述行
//! - `assign_parent_id`：写入前把每个子记录的 review_id 统一改写为父 id

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::models::{EffectSize, Exposure, Moderator, Outcome, ReviewRecord};

/// 可归属于综述的子记录
pub trait ChildRecord {
    /// 改写归属综述 ID，覆盖已有值
    fn set_review_id(&mut self, parent_id: &str);
}

impl ChildRecord for Exposure {
    fn set_review_id(&mut self, parent_id: &str) {
        self.review_id = Some(parent_id.to_string());
    }
}

impl ChildRecord for Outcome {
    fn set_review_id(&mut self, parent_id: &str) {
        self.review_id = Some(parent_id.to_string());
    }
}

impl ChildRecord for Moderator {
    fn set_review_id(&mut self, parent_id: &str) {
        self.review_id = Some(parent_id.to_string());
    }
}

impl ChildRecord for EffectSize {
    fn set_review_id(&mut self, parent_id: &str) {
        self.review_id = Some(parent_id.to_string());
    }
}

/// 嵌套综述聚合
///
/// 客户端 JSON 的完整形状：综述的扁平字段加四个子集合数组。
/// 子集合顺序跟随存储读取顺序，不保证稳定。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct ReviewAggregate {
    #[serde(flatten)]
    #[validate(nested)]
    pub review: ReviewRecord,
    #[serde(default)]
    #[validate(nested)]
    pub exposures: Vec<Exposure>,
    #[serde(default)]
    #[validate(nested)]
    pub outcomes: Vec<Outcome>,
    #[serde(default)]
    #[validate(nested)]
    pub moderators: Vec<Moderator>,
    #[serde(default)]
    pub effect_sizes: Vec<EffectSize>,
}

/// 分解出的四个子集合
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ChildCollections {
    pub exposures: Vec<Exposure>,
    pub outcomes: Vec<Outcome>,
    pub moderators: Vec<Moderator>,
    pub effect_sizes: Vec<EffectSize>,
}

/// 把每个子记录的 review_id 改写为父 id
///
/// 客户端提交的 review_id 一律不可信，空集合是无操作。
pub fn assign_parent_id<T: ChildRecord>(children: &mut [T], parent_id: &str) {
    for child in children.iter_mut() {
        child.set_review_id(parent_id);
    }
}

/// 把综述行和四个子集合合并为嵌套聚合
pub fn compose_review(
    review: ReviewRecord,
    exposures: Vec<Exposure>,
    outcomes: Vec<Outcome>,
    moderators: Vec<Moderator>,
    effect_sizes: Vec<EffectSize>,
) -> ReviewAggregate {
    ReviewAggregate {
        review,
        exposures,
        outcomes,
        moderators,
        effect_sizes,
    }
}

/// 把嵌套聚合拆回扁平综述行和四个子集合
///
/// 子集合原样返回，review_id 赋值由 `assign_parent_id` 单独完成。
pub fn decompose_review(aggregate: ReviewAggregate) -> (ReviewRecord, ChildCollections) {
    let ReviewAggregate {
        review,
        exposures,
        outcomes,
        moderators,
        effect_sizes,
    } = aggregate;

    (
        review,
        ChildCollections {
            exposures,
            outcomes,
            moderators,
            effect_sizes,
        },
    )
}
