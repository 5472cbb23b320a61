//! 请求日志远端投递模块
//!
//! 每个请求生成一条日志，本地通过 tracing 输出，并通过 HTTP POST 发送到 Loggly。
//! 通过 mpsc channel 异步发送，发送失败只在本地记录，不影响客户端响应。

use std::time::Duration;

use serde::Serialize;
use tokio::sync::mpsc;

/// 单个请求的日志条目
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestLogEntry {
    pub method: String,
    pub uri: String,
    pub host: String,
    pub status: u16,
}

impl RequestLogEntry {
    /// 渲染为多行日志文本
    pub fn message(&self) -> String {
        format!(
            "\nMethod Type: {}\nRequest URI: {}\nHost: {}\nHTTP Status Code: {}",
            self.method, self.uri, self.host, self.status
        )
    }
}

/// 请求日志投递 trait
pub trait RequestLogSink: Send + Sync {
    /// 投递一条日志（非阻塞，不返回错误）
    fn send(&self, entry: RequestLogEntry);
}

/// Loggly 投递 payload
#[derive(Debug, Clone, Serialize)]
struct LogglyPayload<'a> {
    level: &'static str,
    message: &'a str,
    timestamp: String,
}

/// 发送上下文（传入 consume_loop）
struct SendContext {
    url: String,
    client: reqwest::Client,
}

/// Loggly 日志投递
///
/// 未配置令牌时只做本地输出
pub struct LogglySink {
    sender: Option<mpsc::Sender<RequestLogEntry>>,
}

impl LogglySink {
    /// 创建新的 LogglySink，有令牌时启动后台消费任务
    pub fn new(base_url: &str, token: Option<String>, tag: &str) -> anyhow::Result<Self> {
        let Some(token) = token else {
            tracing::warn!("未配置 Loggly 令牌，请求日志仅输出到本地");
            return Ok(Self { sender: None });
        };

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(10))
            .build()?;
        let (tx, rx) = mpsc::channel(1024);
        let ctx = SendContext {
            url: Self::input_url(base_url, &token, tag),
            client,
        };
        tokio::spawn(Self::consume_loop(ctx, rx));
        Ok(Self { sender: Some(tx) })
    }

    /// Loggly HTTP 输入端点
    fn input_url(base_url: &str, token: &str, tag: &str) -> String {
        format!(
            "{}/inputs/{}/tag/{}/",
            base_url.trim_end_matches('/'),
            urlencoding::encode(token),
            urlencoding::encode(tag)
        )
    }

    /// 后台消费循环
    async fn consume_loop(ctx: SendContext, mut rx: mpsc::Receiver<RequestLogEntry>) {
        while let Some(entry) = rx.recv().await {
            let message = entry.message();
            let payload = LogglyPayload {
                level: "info",
                message: &message,
                timestamp: chrono::Utc::now().to_rfc3339(),
            };

            match ctx.client.post(&ctx.url).json(&payload).send().await {
                Ok(resp) if !resp.status().is_success() => {
                    tracing::warn!("Loggly 发送失败: HTTP {} ({})", resp.status(), entry.uri);
                }
                Ok(_) => {}
                Err(e) => {
                    tracing::warn!("Loggly 发送失败: {} ({})", e, entry.uri);
                }
            }
        }
        tracing::debug!("Loggly 消费循环已退出");
    }
}

impl RequestLogSink for LogglySink {
    fn send(&self, entry: RequestLogEntry) {
        tracing::info!(
            method = %entry.method,
            uri = %entry.uri,
            host = %entry.host,
            status = entry.status,
            "请求完成"
        );

        if let Some(sender) = &self.sender {
            if let Err(e) = sender.try_send(entry) {
                tracing::warn!("Loggly 日志投递失败（channel 已满或已关闭）: {}", e);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use axum::{Router, body::Bytes, http::{Method, StatusCode, Uri}};

    use super::*;

    type Received = (Method, String, Bytes);

    /// 启动本地接收端，返回地址和收到的请求
    async fn spawn_receiver(reply: StatusCode) -> (std::net::SocketAddr, mpsc::Receiver<Received>) {
        let (tx, rx) = mpsc::channel(16);
        let app = Router::new().fallback(move |method: Method, uri: Uri, body: Bytes| {
            let tx = tx.clone();
            async move {
                let _ = tx.send((method, uri.path().to_string(), body)).await;
                reply
            }
        });

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            let _ = axum::serve(listener, app).await;
        });
        (addr, rx)
    }

    async fn recv(rx: &mut mpsc::Receiver<Received>) -> Received {
        tokio::time::timeout(Duration::from_secs(5), rx.recv())
            .await
            .expect("等待 Loggly 请求超时")
            .expect("接收端已关闭")
    }

    fn sample_entry(status: u16) -> RequestLogEntry {
        RequestLogEntry {
            method: "GET".to_string(),
            uri: "/jwilcox5/search?city=Seattle".to_string(),
            host: "localhost:8080".to_string(),
            status,
        }
    }

    #[test]
    fn test_message_format() {
        let entry = RequestLogEntry {
            method: "GET".to_string(),
            uri: "/jwilcox5/search?city=Seattle".to_string(),
            host: "localhost:8080".to_string(),
            status: 200,
        };

        assert_eq!(
            entry.message(),
            "\nMethod Type: GET\nRequest URI: /jwilcox5/search?city=Seattle\nHost: localhost:8080\nHTTP Status Code: 200"
        );
    }

    #[test]
    fn test_input_url_encodes_tag() {
        let url = LogglySink::input_url("https://logs-01.loggly.com/", "tok", "IQAir Air Quality Data");
        assert_eq!(
            url,
            "https://logs-01.loggly.com/inputs/tok/tag/IQAir%20Air%20Quality%20Data/"
        );
    }

    #[test]
    fn test_without_token_is_local_only() {
        let sink = LogglySink::new("https://logs-01.loggly.com", None, "tag").unwrap();
        assert!(sink.sender.is_none());

        // 无令牌时 send 不应 panic
        sink.send(RequestLogEntry {
            method: "GET".to_string(),
            uri: "/".to_string(),
            host: String::new(),
            status: 404,
        });
    }

    #[tokio::test]
    async fn test_send_posts_to_loggly_input() {
        let (addr, mut rx) = spawn_receiver(StatusCode::OK).await;
        let sink = LogglySink::new(
            &format!("http://{}", addr),
            Some("tok".to_string()),
            "IQAir Air Quality Data",
        )
        .unwrap();

        let entry = sample_entry(200);
        sink.send(entry.clone());

        let (method, path, body) = recv(&mut rx).await;
        assert_eq!(method, Method::POST);
        assert_eq!(path, "/inputs/tok/tag/IQAir%20Air%20Quality%20Data/");

        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["level"], "info");
        assert_eq!(json["message"], entry.message());
        assert!(chrono::DateTime::parse_from_rfc3339(json["timestamp"].as_str().unwrap()).is_ok());

        // 只发送一次
        tokio::time::sleep(Duration::from_millis(100)).await;
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_error_reply_does_not_stop_delivery() {
        let (addr, mut rx) = spawn_receiver(StatusCode::INTERNAL_SERVER_ERROR).await;
        let sink = LogglySink::new(&format!("http://{}", addr), Some("tok".to_string()), "tag")
            .unwrap();

        sink.send(sample_entry(200));
        sink.send(sample_entry(404));

        let (_, _, first) = recv(&mut rx).await;
        let (_, _, second) = recv(&mut rx).await;
        let first: serde_json::Value = serde_json::from_slice(&first).unwrap();
        let second: serde_json::Value = serde_json::from_slice(&second).unwrap();
        assert!(first["message"].as_str().unwrap().ends_with("HTTP Status Code: 200"));
        assert!(second["message"].as_str().unwrap().ends_with("HTTP Status Code: 404"));
    }

    #[tokio::test]
    async fn test_unreachable_endpoint_is_only_warned() {
        // 先占用再释放端口，保证连接失败
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let sink = LogglySink::new(&format!("http://{}", addr), Some("tok".to_string()), "tag")
            .unwrap();
        sink.send(sample_entry(200));
        tokio::time::sleep(Duration::from_millis(200)).await;

        // 消费任务仍在运行，channel 未关闭
        let sender = sink.sender.as_ref().unwrap();
        assert!(!sender.is_closed());
        sink.send(sample_entry(500));
    }
}
