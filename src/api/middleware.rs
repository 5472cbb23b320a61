//! 请求校验与日志中间件

use std::sync::Arc;

use axum::{
    body::Body,
    extract::State,
    http::{Method, Request, Uri, header},
    middleware::Next,
    response::{IntoResponse, Response},
};

use crate::log_sink::{RequestLogEntry, RequestLogSink};
use crate::store::AirQualityStore;

use super::error::ApiError;
use super::query::{CityQueryError, query_pairs, validate_city};

/// URI 中至少要包含其中一个关键字
const ROUTE_KEYWORDS: &[&str] = &["all", "status", "search"];

/// 应用共享状态
#[derive(Clone)]
pub struct AppState {
    /// 表存储
    pub store: Arc<dyn AirQualityStore>,
    /// 请求日志投递
    pub log_sink: Arc<dyn RequestLogSink>,
    /// 表名
    pub table_name: String,
}

impl AppState {
    pub fn new(
        store: Arc<dyn AirQualityStore>,
        log_sink: Arc<dyn RequestLogSink>,
        table_name: impl Into<String>,
    ) -> Self {
        Self {
            store,
            log_sink,
            table_name: table_name.into(),
        }
    }
}

/// 请求目标（path + query）
fn request_target(uri: &Uri) -> String {
    uri.path_and_query()
        .map(|pq| pq.as_str().to_string())
        .unwrap_or_else(|| uri.path().to_string())
}

/// 校验请求：方法、URI 关键字、search 查询参数
///
/// 关键字检查对 path + query 做子串匹配
pub fn check_request(method: &Method, uri: &Uri) -> Result<(), ApiError> {
    if method != Method::GET {
        return Err(ApiError::MethodNotAllowed);
    }

    let target = request_target(uri);
    if !ROUTE_KEYWORDS.iter().any(|k| target.contains(k)) {
        return Err(ApiError::NotFound);
    }

    if target.contains("search") {
        let pairs = query_pairs(uri)
            .map_err(|_| ApiError::BadRequest(CityQueryError::MissingOrLength))?;
        validate_city(&pairs).map_err(ApiError::BadRequest)?;
    }

    Ok(())
}

/// 请求校验与日志中间件
///
/// 校验失败时直接返回，不进入处理器。
/// 每个请求恰好投递一条日志，状态码取实际写出的响应
pub async fn request_log_middleware(
    State(state): State<AppState>,
    request: Request<Body>,
    next: Next,
) -> Response {
    let method = request.method().clone();
    let uri = request_target(request.uri());
    let host = request
        .headers()
        .get(header::HOST)
        .and_then(|v| v.to_str().ok())
        .or_else(|| request.uri().host())
        .unwrap_or_default()
        .to_string();

    let verdict = check_request(&method, request.uri());
    let response = match verdict {
        Ok(()) => next.run(request).await,
        Err(e) => e.into_response(),
    };

    state.log_sink.send(RequestLogEntry {
        method: method.to_string(),
        uri,
        host,
        status: response.status().as_u16(),
    });

    response
}
