//! API 响应类型

use serde::Serialize;

/// 表状态（full 变体）
#[derive(Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct TableStatusResponse {
    /// 表名
    pub table: String,
    /// 表中记录数
    pub record_count: i64,
}

/// 服务器状态（status-only 变体）
#[derive(Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct ServerStatusResponse {
    /// 服务器当前时间（RFC3339 格式）
    pub time: String,
    /// HTTP 状态码
    pub status: u16,
}

impl ServerStatusResponse {
    pub fn now() -> Self {
        Self {
            time: chrono::Utc::now().to_rfc3339(),
            status: 200,
        }
    }
}
