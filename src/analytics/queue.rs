//! Bounded click queue
//!
//! Producers never wait: `enqueue` either places the event or drops it and
//! reports `ChannelFull`. Closing is a one-shot transition; after it the
//! consumers drain whatever is still buffered and then observe end-of-stream.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use parking_lot::RwLock;
use tokio::sync::{Mutex, mpsc};
use tracing::{debug, error, trace, warn};

use super::ClickEvent;
use crate::errors::{Result, ShortenerError};

struct QueueInner {
    /// `None` once the queue has been closed
    sender: RwLock<Option<mpsc::Sender<ClickEvent>>>,
    capacity: usize,
    dropped: AtomicU64,
}

/// 生产端句柄，可在所有请求处理器之间克隆共享
#[derive(Clone)]
pub struct ClickQueue {
    inner: Arc<QueueInner>,
}

/// 消费端句柄，由 worker 共享
#[derive(Clone)]
pub struct ClickStream {
    receiver: Arc<Mutex<mpsc::Receiver<ClickEvent>>>,
}

/// 创建容量为 `capacity` 的点击队列
///
/// # Panics
///
/// `capacity` 为 0 时 panic（配置校验会先拒绝这种值）。
pub fn bounded(capacity: usize) -> (ClickQueue, ClickStream) {
    assert!(capacity > 0, "click queue capacity must be greater than 0");

    let (sender, receiver) = mpsc::channel(capacity);
    let queue = ClickQueue {
        inner: Arc::new(QueueInner {
            sender: RwLock::new(Some(sender)),
            capacity,
            dropped: AtomicU64::new(0),
        }),
    };
    let stream = ClickStream {
        receiver: Arc::new(Mutex::new(receiver)),
    };
    (queue, stream)
}

// 调用方必须已持有 sender 锁，这里不再加锁
fn buffered(sender: &mpsc::Sender<ClickEvent>) -> usize {
    sender.max_capacity() - sender.capacity()
}

impl ClickQueue {
    /// 非阻塞入队
    ///
    /// 队列已满时丢弃事件并返回 `ChannelFull`，调用方只需记录，不应重试。
    ///
    /// # Panics
    ///
    /// 在 `close()` 之后调用会 panic。
    pub fn enqueue(&self, event: ClickEvent) -> Result<()> {
        let guard = self.inner.sender.read();
        let Some(sender) = guard.as_ref() else {
            panic!(
                "click event for '{}' enqueued after the click queue was closed",
                event.shortcode
            );
        };

        match sender.try_send(event) {
            Ok(()) => {
                trace!("ClickQueue: event queued ({} buffered)", buffered(sender));
                Ok(())
            }
            Err(mpsc::error::TrySendError::Full(event)) => {
                self.inner.dropped.fetch_add(1, Ordering::Relaxed);
                warn!(
                    shortcode = %event.shortcode,
                    timestamp = %event.timestamp,
                    "Click queue full, dropping click event"
                );
                Err(ShortenerError::channel_full(format!(
                    "Click queue is full (capacity {}), event for '{}' dropped",
                    self.inner.capacity, event.shortcode
                )))
            }
            Err(mpsc::error::TrySendError::Closed(event)) => {
                // 消费端已全部退出，只能丢弃
                self.inner.dropped.fetch_add(1, Ordering::Relaxed);
                error!(
                    shortcode = %event.shortcode,
                    timestamp = %event.timestamp,
                    "Click consumers are gone, dropping click event"
                );
                Err(ShortenerError::channel_full(format!(
                    "No click consumers left, event for '{}' dropped",
                    event.shortcode
                )))
            }
        }
    }

    /// 关闭队列，已缓冲的事件仍会被消费
    ///
    /// # Panics
    ///
    /// 重复关闭会 panic。
    pub fn close(&self) {
        let sender = self.inner.sender.write().take();
        match sender {
            Some(sender) => {
                debug!(
                    "ClickQueue: closing with {} buffered events",
                    buffered(&sender)
                );
                drop(sender);
            }
            None => panic!("click queue closed twice"),
        }
    }

    /// 当前缓冲的事件数
    pub fn len(&self) -> usize {
        match self.inner.sender.read().as_ref() {
            Some(sender) => buffered(sender),
            None => 0,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn capacity(&self) -> usize {
        self.inner.capacity
    }

    pub fn is_closed(&self) -> bool {
        self.inner.sender.read().is_none()
    }

    /// 因队列满而丢弃的事件总数
    pub fn dropped(&self) -> u64 {
        self.inner.dropped.load(Ordering::Relaxed)
    }
}

impl ClickStream {
    /// 取下一个事件；队列关闭且已排空时返回 `None`
    pub async fn next(&self) -> Option<ClickEvent> {
        self.receiver.lock().await.recv().await
    }
}
