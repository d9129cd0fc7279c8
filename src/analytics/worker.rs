//! Click persistence workers
//!
//! Each worker loops on the shared [`ClickStream`] and writes one click row per
//! event. A failed write is logged and the event is discarded; the worker keeps
//! going. Workers exit once the queue is closed and fully drained.

use std::sync::Arc;

use futures_util::future::join_all;
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

use super::ClickStream;
use crate::storage::ClickStore;

/// 单个 worker（或整个池）退出时的统计
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct DrainSummary {
    pub persisted: u64,
    pub failed: u64,
}

impl DrainSummary {
    fn merge(self, other: DrainSummary) -> DrainSummary {
        DrainSummary {
            persisted: self.persisted + other.persisted,
            failed: self.failed + other.failed,
        }
    }
}

pub struct ClickWorkerPool {
    handles: Vec<JoinHandle<DrainSummary>>,
}

impl ClickWorkerPool {
    /// 启动 `count` 个 worker 共享消费 `stream`
    pub fn spawn(count: usize, stream: ClickStream, store: Arc<dyn ClickStore>) -> Self {
        let count = count.max(1);
        let handles = (0..count)
            .map(|id| tokio::spawn(run_worker(id, stream.clone(), Arc::clone(&store))))
            .collect();

        info!("Click worker pool started with {} worker(s)", count);
        Self { handles }
    }

    pub fn size(&self) -> usize {
        self.handles.len()
    }

    /// 等待所有 worker 退出
    ///
    /// 只有在队列关闭后才会返回；调用方负责加超时。
    pub async fn join(self) -> DrainSummary {
        let results = join_all(self.handles).await;

        let mut total = DrainSummary::default();
        for result in results {
            match result {
                Ok(summary) => total = total.merge(summary),
                Err(e) => error!("Click worker terminated abnormally: {}", e),
            }
        }
        info!(
            "Click workers drained: {} persisted, {} failed",
            total.persisted, total.failed
        );
        total
    }
}

async fn run_worker(
    id: usize,
    stream: ClickStream,
    store: Arc<dyn ClickStore>,
) -> DrainSummary {
    let mut summary = DrainSummary::default();
    debug!("Click worker {} started", id);

    while let Some(event) = stream.next().await {
        let shortcode = event.shortcode.clone();
        let (link_id, timestamp) = (event.link_id, event.timestamp);
        match store.create(event.into_new_click()).await {
            Ok(click) => {
                summary.persisted += 1;
                debug!(
                    "Click worker {}: recorded click {} for '{}'",
                    id, click.id, shortcode
                );
            }
            Err(e) => {
                summary.failed += 1;
                warn!(
                    shortcode = %shortcode,
                    link_id,
                    timestamp = %timestamp,
                    "Click worker {}: failed to record click: {}", id, e
                );
            }
        }
    }

    debug!("Click worker {} stopped", id);
    summary
}
