//! 实体定义模块
//!
//! 五种记录的规范字段形状，作为聚合引擎与存储之间的共享契约。
//! 结构体只声明数据形状，不承载业务逻辑。

pub mod children;
pub mod review;

pub use children::{EffectSize, Exposure, Moderator, Outcome};
pub use review::{ReviewRecord, ReviewSummary};
