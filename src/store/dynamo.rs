//! DynamoDB 存储实现

use aws_sdk_dynamodb::Client;
use aws_sdk_dynamodb::types::AttributeValue;
use serde_json::{Map, Number, Value};

use crate::model::record::AirQualityRecord;

use super::{AirQualityStore, EqualityFilter, Item};

/// 基于 aws-sdk-dynamodb 的存储
///
/// SDK Client 内部是共享句柄，clone 开销很小
#[derive(Clone)]
pub struct DynamoStore {
    client: Client,
}

impl DynamoStore {
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    /// 从 AWS 默认配置链构建
    ///
    /// # Arguments
    /// * `region` - 可选的 Region 覆盖
    /// * `endpoint_url` - 可选的端点覆盖（DynamoDB Local 等）
    pub async fn from_env(region: Option<&str>, endpoint_url: Option<&str>) -> Self {
        let mut loader = aws_config::defaults(aws_config::BehaviorVersion::latest());
        if let Some(region) = region {
            loader = loader.region(aws_config::Region::new(region.to_string()));
        }
        if let Some(url) = endpoint_url {
            tracing::debug!("DynamoDB 使用自定义端点: {}", url);
            loader = loader.endpoint_url(url);
        }
        let config = loader.load().await;
        Self::new(Client::new(&config))
    }
}

#[async_trait::async_trait]
impl AirQualityStore for DynamoStore {
    async fn list_tables(&self) -> anyhow::Result<Vec<String>> {
        let output = self.client.list_tables().send().await?;
        Ok(output.table_names.unwrap_or_default())
    }

    async fn scan(&self, table: &str, filter: Option<&EqualityFilter>) -> anyhow::Result<Vec<Item>> {
        let mut request = self.client.scan().table_name(table);

        if let Some(filter) = filter {
            let expr = ScanExpression::equality(filter);
            let (name_key, name) = expr.name;
            let (value_key, value) = expr.value;
            request = request
                .filter_expression(expr.filter)
                .expression_attribute_names(name_key, name)
                .expression_attribute_values(value_key, value);
        }

        let output = request.send().await?;
        Ok(output.items.unwrap_or_default())
    }

    async fn item_count(&self, table: &str) -> anyhow::Result<i64> {
        let output = self.client.describe_table().table_name(table).send().await?;
        Ok(output
            .table
            .and_then(|t| t.item_count)
            .unwrap_or_default())
    }
}

/// Scan 过滤表达式的各部分
#[derive(Debug, Clone, PartialEq)]
struct ScanExpression {
    filter: &'static str,
    /// 属性名占位符 -> 属性名
    name: (&'static str, String),
    /// 值占位符 -> 值
    value: (&'static str, AttributeValue),
}

impl ScanExpression {
    fn equality(filter: &EqualityFilter) -> Self {
        Self {
            filter: "#0 = :0",
            name: ("#0", filter.attribute.clone()),
            value: (":0", AttributeValue::S(filter.value.clone())),
        }
    }
}

/// 将扫描条目解码为空气质量记录
pub fn decode_item(item: &Item) -> anyhow::Result<AirQualityRecord> {
    let value = Value::Object(attributes_to_object(item)?);
    Ok(serde_json::from_value(value)?)
}

/// NULL 属性视为缺失，交给 serde 默认值处理
fn attributes_to_object<'a, I>(attributes: I) -> anyhow::Result<Map<String, Value>>
where
    I: IntoIterator<Item = (&'a String, &'a AttributeValue)>,
{
    let mut object = Map::new();
    for (name, value) in attributes {
        if matches!(value, AttributeValue::Null(_)) {
            continue;
        }
        object.insert(name.clone(), attribute_to_json(value)?);
    }
    Ok(object)
}

fn attribute_to_json(value: &AttributeValue) -> anyhow::Result<Value> {
    let json = match value {
        AttributeValue::S(s) => Value::String(s.clone()),
        AttributeValue::N(n) => Value::Number(parse_number(n)?),
        AttributeValue::Bool(b) => Value::Bool(*b),
        AttributeValue::Null(_) => Value::Null,
        AttributeValue::M(m) => Value::Object(attributes_to_object(m)?),
        AttributeValue::L(l) => Value::Array(
            l.iter()
                .map(attribute_to_json)
                .collect::<anyhow::Result<Vec<_>>>()?,
        ),
        AttributeValue::Ss(ss) => Value::Array(ss.iter().cloned().map(Value::String).collect()),
        AttributeValue::Ns(ns) => Value::Array(
            ns.iter()
                .map(|n| parse_number(n).map(Value::Number))
                .collect::<anyhow::Result<Vec<_>>>()?,
        ),
        other => anyhow::bail!("不支持的属性类型: {:?}", other),
    };
    Ok(json)
}

fn parse_number(raw: &str) -> anyhow::Result<Number> {
    if let Ok(i) = raw.parse::<i64>() {
        return Ok(Number::from(i));
    }
    let f: f64 = raw
        .parse()
        .map_err(|_| anyhow::anyhow!("无效的数字属性: {}", raw))?;
    Number::from_f64(f).ok_or_else(|| anyhow::anyhow!("无效的数字属性: {}", raw))
}
