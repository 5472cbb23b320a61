mod api;
mod log_sink;
mod model;
mod store;

use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use api::{AppState, create_router};
use log_sink::LogglySink;
use model::config::{Config, ServiceMode};
use store::DynamoStore;

/// 空气质量数据只读服务
#[derive(Parser, Debug)]
#[command(name = "airquality-rs", version, about)]
struct Args {
    /// 配置文件路径
    #[arg(short, long)]
    config: Option<String>,

    /// 监听端口（覆盖配置文件）
    #[arg(short, long)]
    port: Option<u16>,

    /// 服务变体（覆盖配置文件）
    #[arg(long, value_enum)]
    mode: Option<ServiceMode>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();

    let config_path = args
        .config
        .unwrap_or_else(|| Config::default_config_path().to_string());
    let mut config = Config::load(&config_path)
        .with_context(|| format!("加载配置失败: {}", config_path))?;
    if let Some(port) = args.port {
        config.port = port;
    }
    if let Some(mode) = args.mode {
        config.mode = mode;
    }
    if let Some(path) = config.config_path() {
        tracing::info!("配置文件: {}", path.display());
    }

    let store = DynamoStore::from_env(config.region.as_deref(), config.endpoint_url.as_deref()).await;
    let log_sink = LogglySink::new(
        &config.loggly_url,
        config.effective_loggly_token(),
        &config.log_tag,
    )?;

    let state = AppState::new(Arc::new(store), Arc::new(log_sink), config.table_name.clone());
    let prefix = config.normalized_prefix();
    let app = create_router(state, config.mode, &prefix);

    let addr = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("监听失败: {}", addr))?;

    tracing::info!(
        "服务已启动: http://{} (模式: {:?}, 表: {}, 前缀: {})",
        addr,
        config.mode,
        config.table_name,
        prefix
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("服务已关闭");
    Ok(())
}

/// 等待 Ctrl+C
async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("无法监听退出信号: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("收到退出信号，开始关闭");
}
