//! API 错误类型

use axum::{
    http::{StatusCode, header},
    response::{IntoResponse, Response},
};

use super::query::CityQueryError;

/// API 错误
///
/// 客户端错误返回描述文本；存储/解码错误只在本地记录详情
#[derive(Debug)]
pub enum ApiError {
    /// 非 GET 请求
    MethodNotAllowed,
    /// 路径不包含任何已知端点关键字
    NotFound,
    /// search 查询参数无效
    BadRequest(CityQueryError),
    /// 配置的表不存在
    TableNotFound(String),
    /// 远端存储调用失败
    Store(anyhow::Error),
    /// 条目解码失败
    Decode(anyhow::Error),
}

impl ApiError {
    /// 获取对应的 HTTP 状态码
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            ApiError::NotFound => StatusCode::NOT_FOUND,
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::TableNotFound(_) | ApiError::Store(_) | ApiError::Decode(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// 响应正文
    pub fn body(&self) -> &'static str {
        match self {
            ApiError::MethodNotAllowed => "405 - Method Not Allowed",
            ApiError::NotFound => "404 - Not Found",
            ApiError::BadRequest(e) => e.message(),
            ApiError::TableNotFound(_) | ApiError::Store(_) | ApiError::Decode(_) => {
                "500 - Internal Server Error"
            }
        }
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ApiError::TableNotFound(table) => write!(f, "表不存在: {}", table),
            ApiError::Store(e) => write!(f, "存储调用失败: {}", e),
            ApiError::Decode(e) => write!(f, "条目解码失败: {}", e),
            other => f.write_str(other.body()),
        }
    }
}

impl std::error::Error for ApiError {}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!("{}", self);
        }

        (
            status,
            [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
            self.body(),
        )
            .into_response()
    }
}
