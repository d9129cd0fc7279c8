//! Graceful shutdown
//!
//! Order matters: the HTTP server (the only producer of click events) is
//! stopped first, then the monitor is told to stop, then the click queue is
//! closed exactly once and the workers drain it.

use std::time::Duration;

use actix_web::dev::ServerHandle;
use tokio::signal;
use tokio::time::timeout;
use tracing::{error, info, warn};

use super::startup::{ClickPipeline, MonitorHandle};
use crate::analytics::DrainSummary;

/// 等待监控任务退出的上限（秒）
const MONITOR_STOP_TIMEOUT_SECS: u64 = 2;

/// 等待 Ctrl+C 或 SIGTERM
pub async fn wait_for_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            warn!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                warn!("Failed to listen for SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("Received Ctrl+C, shutting down"),
        _ = terminate => info!("Received SIGTERM, shutting down"),
    }
}

/// 关闭结果
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ShutdownReport {
    /// 监控任务已退出（未启用监控时为 true）
    pub monitor_stopped: bool,
    /// 点击队列排空结果；未启用统计或排空超时时为 `None`
    pub drained: Option<DrainSummary>,
}

/// 按顺序关闭所有组件
pub async fn shutdown(
    server: Option<ServerHandle>,
    monitor: Option<MonitorHandle>,
    pipeline: Option<ClickPipeline>,
    drain_timeout: Duration,
) -> ShutdownReport {
    let mut report = ShutdownReport {
        monitor_stopped: true,
        drained: None,
    };

    // 1. 停止接收新请求，等待进行中的请求完成
    if let Some(server) = server {
        info!("Stopping HTTP server...");
        server.stop(true).await;
        info!("HTTP server stopped");
    }

    // 2. 通知监控退出（它没有需要落盘的状态）
    if let Some(monitor) = monitor {
        let _ = monitor.shutdown.send(true);
        match timeout(Duration::from_secs(MONITOR_STOP_TIMEOUT_SECS), monitor.task).await {
            Ok(_) => info!("Link monitor stopped"),
            Err(_) => {
                warn!("Link monitor did not stop in time, abandoning it");
                report.monitor_stopped = false;
            }
        }
    }

    // 3. 关闭队列，worker 排空后退出
    if let Some(pipeline) = pipeline {
        report.drained = drain_click_pipeline(pipeline, drain_timeout).await;
    }

    info!("Shutdown complete");
    report
}

/// 关闭点击队列并等待 worker 排空，超时返回 `None`
pub async fn drain_click_pipeline(
    pipeline: ClickPipeline,
    drain_timeout: Duration,
) -> Option<DrainSummary> {
    let pending = pipeline.queue.len();
    info!("Closing click queue ({} events pending)", pending);
    pipeline.queue.close();

    match timeout(drain_timeout, pipeline.pool.join()).await {
        Ok(summary) => {
            info!(
                "Click queue drained: {} persisted, {} failed",
                summary.persisted, summary.failed
            );
            Some(summary)
        }
        Err(_) => {
            error!(
                "Click workers did not drain within {} ms, remaining events are lost",
                drain_timeout.as_millis()
            );
            None
        }
    }
}
