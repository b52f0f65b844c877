//! 响应 DTO 定义
//!
//! 综述读写接口的响应体结构。列表与详情直接复用实体形状
//! （ReviewSummary / ReviewAggregate），此处只定义写路径的确认响应。

use serde::{Deserialize, Serialize};

/// 写入确认响应
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SavedReviewResponse {
    pub review_id: String,
}
