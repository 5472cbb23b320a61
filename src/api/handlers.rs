//! API HTTP 处理器

use std::convert::Infallible;

use axum::{
    Json,
    body::Body,
    extract::{Query, State},
    http::{StatusCode, header},
    response::{IntoResponse, Response},
};
use bytes::Bytes;

use crate::store::{EqualityFilter, Item, decode_item};

use super::{
    error::ApiError,
    middleware::AppState,
    query::{QueryPairs, validate_city},
    types::{ServerStatusResponse, TableStatusResponse},
};

/// GET {prefix}/all
/// 全表扫描，逐条输出 JSON 对象
pub async fn get_all(State(state): State<AppState>) -> Result<Response, ApiError> {
    ensure_table(&state).await?;

    let items = state
        .store
        .scan(&state.table_name, None)
        .await
        .map_err(ApiError::Store)?;

    records_response(&items)
}

/// GET {prefix}/status
/// 表名与记录数
pub async fn get_table_status(State(state): State<AppState>) -> Result<Response, ApiError> {
    let record_count = state
        .store
        .item_count(&state.table_name)
        .await
        .map_err(ApiError::Store)?;

    Ok(Json(TableStatusResponse {
        table: state.table_name.clone(),
        record_count,
    })
    .into_response())
}

/// GET {prefix}/status（status-only 变体）
pub async fn get_server_status() -> impl IntoResponse {
    Json(ServerStatusResponse::now())
}

/// GET {prefix}/search?city=<value>
/// 按 city 等值过滤扫描
pub async fn search(
    State(state): State<AppState>,
    Query(pairs): Query<QueryPairs>,
) -> Result<Response, ApiError> {
    // 中间件已校验过；处理器单独挂载时同样生效
    let city = validate_city(&pairs).map_err(ApiError::BadRequest)?;

    ensure_table(&state).await?;

    let filter = EqualityFilter::new("city", city);
    let items = state
        .store
        .scan(&state.table_name, Some(&filter))
        .await
        .map_err(ApiError::Store)?;

    records_response(&items)
}

/// 其他路径：空响应
pub async fn catch_all() -> StatusCode {
    StatusCode::OK
}

/// 确认配置的表存在
async fn ensure_table(state: &AppState) -> Result<(), ApiError> {
    let tables = state.store.list_tables().await.map_err(ApiError::Store)?;

    if tables.iter().any(|t| t == &state.table_name) {
        Ok(())
    } else {
        Err(ApiError::TableNotFound(state.table_name.clone()))
    }
}

/// 解码全部条目后以分块方式输出，每块一个 JSON 对象（无外层数组）
fn records_response(items: &[Item]) -> Result<Response, ApiError> {
    let chunks = items
        .iter()
        .map(|item| {
            let record = decode_item(item).map_err(ApiError::Decode)?;
            let json = serde_json::to_vec(&record).map_err(|e| ApiError::Decode(e.into()))?;
            Ok(Bytes::from(json))
        })
        .collect::<Result<Vec<_>, ApiError>>()?;

    let stream = futures::stream::iter(chunks.into_iter().map(Ok::<_, Infallible>));

    Ok((
        [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
        Body::from_stream(stream),
    )
        .into_response())
}
