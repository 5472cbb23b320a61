use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// 服务变体
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, clap::ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum ServiceMode {
    /// all / status / search 全部端点
    Full,
    /// 仅 status 端点（返回服务器时间）
    StatusOnly,
}

impl Default for ServiceMode {
    fn default() -> Self {
        Self::Full
    }
}

/// 空气质量服务配置
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    /// AWS Region（可选），未配置时使用 AWS 默认链
    #[serde(default)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,

    /// DynamoDB 端点覆盖（可选，用于 DynamoDB Local）
    #[serde(default)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub endpoint_url: Option<String>,

    #[serde(default = "default_table_name")]
    pub table_name: String,

    /// 路由前缀，如 /jwilcox5
    #[serde(default = "default_route_prefix")]
    pub route_prefix: String,

    #[serde(default)]
    pub mode: ServiceMode,

    /// Loggly 标签
    #[serde(default = "default_log_tag")]
    pub log_tag: String,

    /// Loggly 客户令牌（可选），未配置时回退到 LOGGLY_TOKEN 环境变量
    #[serde(default)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub loggly_token: Option<String>,

    #[serde(default = "default_loggly_url")]
    pub loggly_url: String,

    /// 配置文件路径（运行时元数据，不写入 JSON）
    #[serde(skip)]
    config_path: Option<PathBuf>,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_table_name() -> String {
    "air-quality-data-jwilcox5".to_string()
}

fn default_route_prefix() -> String {
    "/jwilcox5".to_string()
}

fn default_log_tag() -> String {
    "IQAir Air Quality Data".to_string()
}

fn default_loggly_url() -> String {
    "https://logs-01.loggly.com".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            region: None,
            endpoint_url: None,
            table_name: default_table_name(),
            route_prefix: default_route_prefix(),
            mode: ServiceMode::default(),
            log_tag: default_log_tag(),
            loggly_token: None,
            loggly_url: default_loggly_url(),
            config_path: None,
        }
    }
}

impl Config {
    /// 获取默认配置文件路径
    pub fn default_config_path() -> &'static str {
        "config.json"
    }

    /// 获取有效的 Loggly 令牌
    /// 优先使用配置文件，未配置时回退到 LOGGLY_TOKEN 环境变量
    pub fn effective_loggly_token(&self) -> Option<String> {
        self.loggly_token
            .clone()
            .or_else(|| std::env::var("LOGGLY_TOKEN").ok())
            .filter(|t| !t.trim().is_empty())
    }

    /// 规范化后的路由前缀：以 `/` 开头，不以 `/` 结尾
    pub fn normalized_prefix(&self) -> String {
        let trimmed = self.route_prefix.trim_matches('/');
        if trimmed.is_empty() {
            String::new()
        } else {
            format!("/{}", trimmed)
        }
    }

    /// 从文件加载配置
    pub fn load<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            // 配置文件不存在，返回默认配置
            let mut config = Self::default();
            config.config_path = Some(path.to_path_buf());
            return Ok(config);
        }

        let content = fs::read_to_string(path)?;
        let mut config: Config = serde_json::from_str(&content)?;
        config.config_path = Some(path.to_path_buf());
        Ok(config)
    }

    /// 获取配置文件路径（如果有）
    pub fn config_path(&self) -> Option<&Path> {
        self.config_path.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_missing_file_returns_defaults() {
        let config = Config::load("/nonexistent/airquality/config.json").unwrap();

        assert_eq!(config.port, 8080);
        assert_eq!(config.table_name, "air-quality-data-jwilcox5");
        assert_eq!(config.mode, ServiceMode::Full);
        assert_eq!(
            config.config_path(),
            Some(Path::new("/nonexistent/airquality/config.json"))
        );
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let json = r#"{"port": 9090, "mode": "status-only", "routePrefix": "api/"}"#;
        let config: Config = serde_json::from_str(json).unwrap();

        assert_eq!(config.port, 9090);
        assert_eq!(config.mode, ServiceMode::StatusOnly);
        assert_eq!(config.log_tag, "IQAir Air Quality Data");
        assert_eq!(config.normalized_prefix(), "/api");
    }

    #[test]
    fn test_normalized_prefix_empty() {
        let config = Config {
            route_prefix: "/".to_string(),
            ..Config::default()
        };
        assert_eq!(config.normalized_prefix(), "");
    }

    #[test]
    fn test_loggly_token_from_config() {
        let config = Config {
            loggly_token: Some("abc123".to_string()),
            ..Config::default()
        };
        assert_eq!(config.effective_loggly_token().as_deref(), Some("abc123"));
    }
}
