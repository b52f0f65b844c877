//! 文献综述提取数据服务入口
//!
//! 提供综述录入、读取与 CSV 报表导出的 REST API。

use axum::{Json, Router, http::HeaderValue, routing::get};
use extraction_shared::{config::AppConfig, database::Database, observability};
use review_data_service::{routes, state::AppState};
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 本地开发时从 .env 注入环境变量（如 EXTRACTION_DATABASE_URL）
    dotenvy::dotenv().ok();

    // 统一加载配置：config/{env}.toml + EXTRACTION_ 前缀环境变量
    let config = AppConfig::load("review-data-service").unwrap_or_default();

    observability::init(&config.observability)?;

    info!("Starting review-data-service on {}", config.server_addr());

    // 初始化基础设施
    let db = Database::connect(&config.database).await?;

    // 启动时应用迁移，保证五张表就位
    sqlx::migrate!("./migrations").run(db.pool()).await?;
    info!("Database migrations applied");

    let state = AppState::new(db.pool().clone(), config.report.clone());

    // CORS 配置：通过 EXTRACTION_CORS_ORIGINS 环境变量控制允许的来源，
    // 默认放开（录入工具通常与前端同源部署，跨域仅出现在本地开发）
    let allowed_origins =
        std::env::var("EXTRACTION_CORS_ORIGINS").unwrap_or_else(|_| "*".to_string());

    let cors = if allowed_origins == "*" {
        if config.is_production() {
            warn!("EXTRACTION_CORS_ORIGINS=\"*\" 在生产环境中不安全，请设置为具体域名");
        }
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any)
    } else {
        info!("CORS allowed_origins: {}", allowed_origins);
        let origins: Vec<_> = allowed_origins
            .split(',')
            .filter_map(|s| s.trim().parse::<HeaderValue>().ok())
            .collect();
        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods(Any)
            .allow_headers(Any)
    };

    let app = Router::new()
        .merge(routes::review_routes())
        .merge(routes::report_routes())
        .merge(routes::static_routes())
        .route("/health", get(health_check))
        .route(
            "/ready",
            get({
                let db_for_ready = db;
                move || readiness_check(db_for_ready.clone())
            }),
        )
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    let listener = TcpListener::bind(config.server_addr()).await?;
    info!("Listening on {}", config.server_addr());

    // 优雅关闭：收到 SIGTERM 或 Ctrl+C 时停止接收新连接，
    // 等待已有请求（包括进行中的报表流）处理完毕
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server shutdown complete");

    Ok(())
}

/// 监听关闭信号
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("注册 Ctrl+C 处理器失败");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("注册 SIGTERM 处理器失败")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("Received Ctrl+C, initiating graceful shutdown..."),
        _ = terminate => info!("Received SIGTERM, initiating graceful shutdown..."),
    }
}

/// 存活探针：服务进程正常即返回 ok
async fn health_check() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "ok",
        "service": "review-data-service"
    }))
}

/// 就绪探针：检查数据库连接是否可用
async fn readiness_check(db: Database) -> Json<serde_json::Value> {
    let db_ok = db.health_check().await.is_ok();

    Json(serde_json::json!({
        "status": if db_ok { "ok" } else { "degraded" },
        "service": "review-data-service",
        "checks": {
            "database": if db_ok { "ok" } else { "fail" }
        }
    }))
}
