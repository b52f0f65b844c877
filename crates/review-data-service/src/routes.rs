//! 路由配置模块
//!
//! 定义所有 REST API 端点的路由映射

use axum::{
    Router,
    routing::{get, post, put},
};
use tower_http::services::{ServeDir, ServeFile};

use crate::{handlers, state::AppState};

/// 构建综述读写路由
///
/// POST（仅创建）与 PUT（创建或覆盖）并存是沿用的既有接口形状：
/// 浏览器端旧版本走 POST，新版统一走 PUT。
pub fn review_routes() -> Router<AppState> {
    Router::new()
        .route("/reviews", get(handlers::review::list_reviews))
        .route("/reviews", post(handlers::review::create_review))
        .route("/reviews/{id}", get(handlers::review::get_review))
        .route("/reviews/{id}", put(handlers::review::save_review))
}

/// 构建报表导出路由
pub fn report_routes() -> Router<AppState> {
    Router::new()
        .route("/reports/reviews", get(handlers::report::reviews_report))
        .route(
            "/reports/effect_sizes",
            get(handlers::report::effect_sizes_report),
        )
}

/// 构建静态资源路由
///
/// 数据录入界面本体；核心逻辑之外的薄包装
pub fn static_routes() -> Router<AppState> {
    Router::new()
        .route_service("/", ServeFile::new("static/index.html"))
        .nest_service("/static", ServeDir::new("static"))
}
