//! 综述 API 处理器
//!
//! 实现综述聚合的列表、创建、读取与保存操作

use axum::{
    Json,
    extract::{Path, State},
};
use tracing::info;
use validator::Validate;

use crate::{
    aggregate::ReviewAggregate,
    dto::SavedReviewResponse,
    error::ServiceError,
    models::ReviewSummary,
    repository::ReviewRepository,
    state::AppState,
};

/// 获取综述摘要列表
///
/// GET /reviews
pub async fn list_reviews(
    State(state): State<AppState>,
) -> Result<Json<Vec<ReviewSummary>>, ServiceError> {
    let repo = ReviewRepository::new(state.pool.clone());
    let summaries = repo.list_summaries().await?;

    Ok(Json(summaries))
}

/// 创建综述（遗留的仅创建端点）
///
/// POST /reviews
///
/// 不做存在性判断：重复 id 作为存储错误浮出。与 PUT 的
/// 创建或覆盖语义并存是沿用的既有接口形状。
pub async fn create_review(
    State(state): State<AppState>,
    Json(payload): Json<ReviewAggregate>,
) -> Result<Json<SavedReviewResponse>, ServiceError> {
    payload.validate()?;

    let repo = ReviewRepository::new(state.pool.clone());
    let review_id = repo.create_review(payload).await?;

    info!(review_id = %review_id, "Review created via legacy create endpoint");

    Ok(Json(SavedReviewResponse { review_id }))
}

/// 读取一条嵌套综述
///
/// GET /reviews/{id}
pub async fn get_review(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ReviewAggregate>, ServiceError> {
    let repo = ReviewRepository::new(state.pool.clone());
    let aggregate = repo.get_review(&id).await?;

    Ok(Json(aggregate))
}

/// 创建或整体覆盖一条综述
///
/// PUT /reviews/{id}
///
/// 行键以路径参数为准；载荷自带的 id 字段不参与寻址。
pub async fn save_review(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(mut payload): Json<ReviewAggregate>,
) -> Result<Json<SavedReviewResponse>, ServiceError> {
    // 行键以路径为准，先覆盖载荷 id 再做形状校验，
    // 避免载荷 id 缺失或不一致被误判为校验错误
    payload.review.id = id.clone();
    payload.validate()?;

    let repo = ReviewRepository::new(state.pool.clone());
    let outcome = repo.save_review(&id, payload).await?;

    info!(review_id = %id, ?outcome, "Review saved");

    Ok(Json(SavedReviewResponse { review_id: id }))
}
