//! 空气质量记录数据模型
//!
//! 字段名与表中属性名、对外 JSON 字段名一致。缺失的属性取零值。

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// 单条空气质量记录
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AirQualityRecord {
    pub datetime: String,
    pub status: String,
    pub city: String,
    pub state: String,
    pub country: String,
    pub data: AirQualityData,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AirQualityData {
    pub city: String,
    pub state: String,
    pub country: String,
    pub location: Location,
    pub current: Current,
}

/// GeoJSON 点坐标
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Location {
    #[serde(rename = "type")]
    pub location_type: String,
    pub coordinates: Vec<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Current {
    pub pollution: Pollution,
    pub weather: Weather,
}

/// 污染指数
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Pollution {
    pub ts: DateTime<Utc>,
    /// AQI（美国标准）
    pub aqius: i64,
    /// 主要污染物（美国标准）
    pub mainus: String,
    /// AQI（中国标准）
    pub aqicn: i64,
    /// 主要污染物（中国标准）
    pub maincn: String,
}

/// 天气
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Weather {
    pub ts: DateTime<Utc>,
    /// 温度（摄氏度）
    pub tp: i64,
    /// 气压（hPa）
    pub pr: i64,
    /// 湿度（%）
    pub hu: i64,
    /// 风速（m/s）
    pub ws: f64,
    /// 风向（度）
    pub wd: i64,
    /// 天气图标
    pub ic: String,
}
