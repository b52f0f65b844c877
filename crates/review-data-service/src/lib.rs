//! 文献综述提取数据服务
//!
//! 结构化文献综述记录的录入与报表后端：以嵌套聚合的形式
//! 持久化一条综述及其四个子集合，通过 HTTP JSON API 供浏览器
//! 端读写，并把关系连接摊平为流式 CSV 导出。
//!
//! ## 模块结构
//!
//! - `models`: 五种记录的规范字段形状（共享契约）
//! - `aggregate`: 扁平行与嵌套表示之间的双向映射
//! - `repository`: 事务性的聚合读写编排
//! - `report`: 两条流式 CSV 报表流水线
//! - `handlers` / `routes` / `state`: HTTP 接口层
//! - `dto`: 写路径的响应体
//! - `error`: 错误类型定义
//!
//! ## 技术栈
//!
//! - Web 框架：Axum
//! - 存储：PostgreSQL（sqlx）
//! - CSV 编码：csv crate
//! - 数据验证：validator

pub mod aggregate;
pub mod dto;
pub mod error;
pub mod handlers;
pub mod models;
pub mod report;
pub mod repository;
pub mod routes;
pub mod state;

// 重新导出核心类型
pub use aggregate::{ChildCollections, ReviewAggregate};
pub use dto::SavedReviewResponse;
pub use error::{Result, ServiceError};
pub use models::{EffectSize, Exposure, Moderator, Outcome, ReviewRecord, ReviewSummary};
pub use repository::{ReviewRepository, SaveOutcome};
pub use report::ReportStreamer;
