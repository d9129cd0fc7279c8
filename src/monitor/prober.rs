//! Reachability probes

use std::time::Duration;

use async_trait::async_trait;
use tracing::trace;
use ureq::Agent;

use super::ProbeOutcome;

/// 对单个目标 URL 做一次可达性探测
#[async_trait]
pub trait LinkProber: Send + Sync {
    async fn probe(&self, url: &str) -> ProbeOutcome;
}

/// 基于 ureq 的 HEAD 探测
///
/// ureq 是同步客户端，请求在 blocking 线程池中执行。
pub struct HttpProber {
    agent: Agent,
}

impl HttpProber {
    pub fn new(timeout: Duration) -> Self {
        let agent = Agent::config_builder()
            .timeout_global(Some(timeout))
            // 4xx/5xx 作为普通响应返回，由我们自己分类
            .http_status_as_error(false)
            .build()
            .into();
        Self { agent }
    }

    fn probe_sync(agent: &Agent, url: &str) -> ProbeOutcome {
        match agent.head(url).call() {
            Ok(resp) => {
                let status = resp.status().as_u16();
                trace!("HEAD {} -> {}", url, status);
                if status < 400 {
                    ProbeOutcome::Reachable { status }
                } else {
                    ProbeOutcome::Unreachable { status }
                }
            }
            Err(e) => ProbeOutcome::Error(e.to_string()),
        }
    }
}

#[async_trait]
impl LinkProber for HttpProber {
    async fn probe(&self, url: &str) -> ProbeOutcome {
        let agent = self.agent.clone();
        let url = url.to_string();

        tokio::task::spawn_blocking(move || Self::probe_sync(&agent, &url))
            .await
            .unwrap_or_else(|e| ProbeOutcome::Error(format!("probe task failed: {}", e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{Read, Write};
    use std::net::TcpListener;

    /// 起一个只回复一次固定状态行的本地 HTTP 服务
    fn one_shot_server(status_line: &'static str) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        std::thread::spawn(move || {
            if let Ok((mut stream, _)) = listener.accept() {
                let mut buf = [0u8; 1024];
                let mut request = Vec::new();
                while !request.windows(4).any(|w| w == b"\r\n\r\n") {
                    match stream.read(&mut buf) {
                        Ok(0) | Err(_) => break,
                        Ok(n) => request.extend_from_slice(&buf[..n]),
                    }
                }
                let response = format!(
                    "HTTP/1.1 {}\r\nContent-Length: 0\r\nConnection: close\r\n\r\n",
                    status_line
                );
                let _ = stream.write_all(response.as_bytes());
            }
        });
        format!("http://{}/", addr)
    }

    #[tokio::test]
    async fn test_ok_status_is_reachable() {
        let url = one_shot_server("200 OK");
        let prober = HttpProber::new(Duration::from_secs(5));
        assert_eq!(
            prober.probe(&url).await,
            ProbeOutcome::Reachable { status: 200 }
        );
    }

    #[tokio::test]
    async fn test_error_status_is_unreachable() {
        let url = one_shot_server("404 Not Found");
        let prober = HttpProber::new(Duration::from_secs(5));
        assert_eq!(
            prober.probe(&url).await,
            ProbeOutcome::Unreachable { status: 404 }
        );
    }

    #[tokio::test]
    async fn test_refused_connection_is_error() {
        // 绑定后立即释放，端口上不再有监听者
        let port = TcpListener::bind("127.0.0.1:0")
            .unwrap()
            .local_addr()
            .unwrap()
            .port();
        let prober = HttpProber::new(Duration::from_secs(5));
        let outcome = prober.probe(&format!("http://127.0.0.1:{}/", port)).await;
        assert!(matches!(outcome, ProbeOutcome::Error(_)));
    }
}
