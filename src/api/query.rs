//! search 查询参数校验

use std::collections::HashSet;
use std::fmt;
use std::sync::OnceLock;

use axum::extract::Query;
use axum::extract::rejection::QueryRejection;
use axum::http::Uri;
use regex::Regex;

/// city 参数最大长度
pub const MAX_CITY_LEN: usize = 20;

static CITY_PATTERN: OnceLock<Regex> = OnceLock::new();

fn city_pattern() -> &'static Regex {
    CITY_PATTERN.get_or_init(|| Regex::new(r"^[-a-zA-Z0-9:]+$").expect("city 正则无效"))
}

/// city 参数校验失败原因（按检查顺序）
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CityQueryError {
    /// 不存在、为空或超长
    MissingOrLength,
    /// 查询参数不止一个
    TooManyParameters,
    /// 包含非法字符
    InvalidCharacters,
}

impl CityQueryError {
    pub fn message(&self) -> &'static str {
        match self {
            Self::MissingOrLength => {
                "400 - The query parameter either does not exist, is empty, or is too long"
            }
            Self::TooManyParameters => "400 - There are too many query parameters",
            Self::InvalidCharacters => {
                "400 - The query parameter contains characters that should not be in the parameter"
            }
        }
    }
}

impl fmt::Display for CityQueryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message())
    }
}

impl std::error::Error for CityQueryError {}

/// 解码后的查询参数（保持原始顺序）
pub type QueryPairs = Vec<(String, String)>;

/// 从 URI 解析查询参数，无查询串时为空
pub fn query_pairs(uri: &Uri) -> Result<QueryPairs, QueryRejection> {
    Query::<QueryPairs>::try_from_uri(uri).map(|Query(pairs)| pairs)
}

/// 校验 search 的查询参数，返回 city 值
///
/// 重复的 city 取第一个值；参数名去重后必须只有 city 一个
pub fn validate_city(pairs: &[(String, String)]) -> Result<String, CityQueryError> {
    let city = match pairs.iter().find(|(k, _)| k == "city") {
        Some((_, v)) if !v.is_empty() && v.len() <= MAX_CITY_LEN => v,
        _ => return Err(CityQueryError::MissingOrLength),
    };

    let names: HashSet<&str> = pairs.iter().map(|(k, _)| k.as_str()).collect();
    if names.len() > 1 {
        return Err(CityQueryError::TooManyParameters);
    }

    if !city_pattern().is_match(city) {
        return Err(CityQueryError::InvalidCharacters);
    }

    Ok(city.clone())
}
