//! API 路由配置

use axum::{Router, middleware, routing::get};

use crate::model::config::ServiceMode;

use super::{
    handlers::{catch_all, get_all, get_server_status, get_table_status, search},
    middleware::{AppState, request_log_middleware},
};

/// 创建 API 路由
///
/// # 端点
/// - `GET {prefix}/all` - 全部记录（仅 full）
/// - `GET {prefix}/status` - 表记录数（full）或服务器时间（status-only）
/// - `GET {prefix}/search?city=<value>` - 按城市查询（仅 full）
/// - 其他路径 - 空响应
///
/// 所有请求（含 fallback）都经过校验与日志中间件
pub fn create_router(state: AppState, mode: ServiceMode, prefix: &str) -> Router {
    let router = match mode {
        ServiceMode::Full => Router::new()
            .route(&format!("{}/all", prefix), get(get_all))
            .route(&format!("{}/status", prefix), get(get_table_status))
            .route(&format!("{}/search", prefix), get(search)),
        ServiceMode::StatusOnly => {
            Router::new().route(&format!("{}/status", prefix), get(get_server_status))
        }
    };

    router
        .fallback(catch_all)
        .layer(middleware::from_fn_with_state(
            state.clone(),
            request_log_middleware,
        ))
        .with_state(state)
}
