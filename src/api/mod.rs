//! 空气质量 HTTP API
//!
//! # 功能
//! - 全部记录、表状态、按城市查询
//! - 请求校验（方法、路径关键字、city 参数）
//! - 每个请求一条远端日志

mod error;
mod handlers;
mod middleware;
mod query;
mod router;
mod types;

pub use middleware::AppState;
pub use router::create_router;
