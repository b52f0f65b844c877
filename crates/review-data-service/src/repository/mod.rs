//! 仓储模块
//!
//! 提供综述聚合的存储编排：列表投影、聚合读取、事务性写入

pub mod review_repo;

pub use review_repo::{ReviewRepository, SaveOutcome};
