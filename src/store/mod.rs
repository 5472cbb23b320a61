//! 远端表存储
//!
//! 提供表列举、全表/过滤扫描和记录数查询

mod dynamo;

use std::collections::HashMap;

use aws_sdk_dynamodb::types::AttributeValue;

pub use dynamo::{DynamoStore, decode_item};

/// 扫描返回的原始条目
pub type Item = HashMap<String, AttributeValue>;

/// 扫描过滤条件：`attribute = value`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EqualityFilter {
    pub attribute: String,
    pub value: String,
}

impl EqualityFilter {
    pub fn new(attribute: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            attribute: attribute.into(),
            value: value.into(),
        }
    }
}

/// 空气质量表存储 trait
#[async_trait::async_trait]
pub trait AirQualityStore: Send + Sync {
    /// 列出所有表名
    async fn list_tables(&self) -> anyhow::Result<Vec<String>>;

    /// 扫描表（单次调用，不分页），可选等值过滤
    async fn scan(&self, table: &str, filter: Option<&EqualityFilter>) -> anyhow::Result<Vec<Item>>;

    /// 表中记录数
    async fn item_count(&self, table: &str) -> anyhow::Result<i64>;
}
