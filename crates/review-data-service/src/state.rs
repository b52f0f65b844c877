//! 应用状态定义
//!
//! 包含 Axum 路由共享的应用状态

use extraction_shared::config::ReportConfig;
use sqlx::PgPool;

/// Axum 应用共享状态
///
/// 进程级存储访问状态：连接池在启动时初始化一次，
/// 每个请求从池中借取连接或事务，处理结束即归还。
#[derive(Clone)]
pub struct AppState {
    /// PostgreSQL 连接池
    pub pool: PgPool,
    /// 报表导出配置
    pub report: ReportConfig,
}

impl AppState {
    /// 创建新的应用状态
    pub fn new(pool: PgPool, report: ReportConfig) -> Self {
        Self { pool, report }
    }
}
