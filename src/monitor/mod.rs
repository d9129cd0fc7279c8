//! Periodic link health monitor
//!
//! On every tick the monitor reads the full link set and probes each target
//! concurrently, each probe under its own timeout, so one slow host cannot
//! stall the round. Results are logged only; links are never modified.

mod prober;

pub use prober::{HttpProber, LinkProber};

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use dashmap::DashMap;
use futures_util::{StreamExt, stream};
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior, interval_at, timeout};
use tracing::{debug, info, warn};

use crate::config::MonitorConfig;
use crate::services::LinkService;
use crate::storage::Link;

/// 单次探测结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProbeOutcome {
    /// 目标返回了 < 400 的状态码
    Reachable { status: u16 },
    /// 目标返回了 >= 400 的状态码
    Unreachable { status: u16 },
    /// 连接失败、超时等，没有拿到响应
    Error(String),
}

impl ProbeOutcome {
    pub fn is_reachable(&self) -> bool {
        matches!(self, ProbeOutcome::Reachable { .. })
    }

    pub fn is_error(&self) -> bool {
        matches!(self, ProbeOutcome::Error(_))
    }
}

impl fmt::Display for ProbeOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProbeOutcome::Reachable { status } => write!(f, "reachable ({})", status),
            ProbeOutcome::Unreachable { status } => write!(f, "unreachable ({})", status),
            ProbeOutcome::Error(msg) => write!(f, "probe error: {}", msg),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ProbeReport {
    pub link_id: i64,
    pub shortcode: String,
    pub long_url: String,
    pub outcome: ProbeOutcome,
}

pub struct LinkMonitor {
    link_service: Arc<LinkService>,
    prober: Arc<dyn LinkProber>,
    interval: Duration,
    probe_timeout: Duration,
    max_concurrent_probes: usize,
    /// link id → 上一轮是否可达
    last_reachable: DashMap<i64, bool>,
}

impl LinkMonitor {
    pub fn new(
        link_service: Arc<LinkService>,
        prober: Arc<dyn LinkProber>,
        config: &MonitorConfig,
    ) -> Self {
        Self::with_timings(
            link_service,
            prober,
            Duration::from_secs(config.interval_minutes * 60),
            Duration::from_secs(config.probe_timeout_secs),
            config.max_concurrent_probes,
        )
    }

    pub fn with_timings(
        link_service: Arc<LinkService>,
        prober: Arc<dyn LinkProber>,
        interval: Duration,
        probe_timeout: Duration,
        max_concurrent_probes: usize,
    ) -> Self {
        Self {
            link_service,
            prober,
            interval,
            probe_timeout,
            max_concurrent_probes: max_concurrent_probes.max(1),
            last_reachable: DashMap::new(),
        }
    }

    /// 上一轮探测该链接时是否可达
    pub fn last_reachable(&self, link_id: i64) -> Option<bool> {
        self.last_reachable.get(&link_id).map(|entry| *entry.value())
    }

    /// 执行一轮探测并返回每个链接的结果
    ///
    /// 读取链接列表失败时本轮直接跳过，下一轮再试。
    pub async fn run_round(&self) -> Vec<ProbeReport> {
        let links = match self.link_service.list_links().await {
            Ok(links) => links,
            Err(e) => {
                warn!("LinkMonitor: failed to load links, skipping round: {}", e);
                return Vec::new();
            }
        };

        debug!("LinkMonitor: probing {} links", links.len());

        stream::iter(links)
            .map(|link| self.probe_link(link))
            .buffer_unordered(self.max_concurrent_probes)
            .collect()
            .await
    }

    async fn probe_link(&self, link: Link) -> ProbeReport {
        let outcome = match timeout(self.probe_timeout, self.prober.probe(&link.long_url)).await {
            Ok(outcome) => outcome,
            Err(_) => ProbeOutcome::Error(format!(
                "timed out after {}ms",
                self.probe_timeout.as_millis()
            )),
        };

        match &outcome {
            ProbeOutcome::Reachable { .. } => info!(
                shortcode = %link.shortcode,
                url = %link.long_url,
                "Link check: {}", outcome
            ),
            _ => warn!(
                shortcode = %link.shortcode,
                url = %link.long_url,
                "Link check: {}", outcome
            ),
        }
        self.record_transition(&link, &outcome);

        ProbeReport {
            link_id: link.id,
            shortcode: link.shortcode,
            long_url: link.long_url,
            outcome,
        }
    }

    fn record_transition(&self, link: &Link, outcome: &ProbeOutcome) {
        let reachable = outcome.is_reachable();
        match self.last_reachable.insert(link.id, reachable) {
            Some(true) if !reachable => warn!(
                shortcode = %link.shortcode,
                "Link became unreachable: {}", link.long_url
            ),
            Some(false) if reachable => info!(
                shortcode = %link.shortcode,
                "Link is reachable again: {}", link.long_url
            ),
            _ => {}
        }
    }

    /// 启动后台定时循环，直到 `shutdown` 收到信号（或发送端被丢弃）
    ///
    /// 第一轮在一个间隔之后执行；错过的 tick 直接跳过。
    pub fn spawn(self: Arc<Self>, mut shutdown: watch::Receiver<bool>) -> JoinHandle<()> {
        tokio::spawn(async move {
            let mut ticker = interval_at(Instant::now() + self.interval, self.interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

            info!(
                "Link monitor started (interval {}s, probe timeout {}ms)",
                self.interval.as_secs(),
                self.probe_timeout.as_millis()
            );

            loop {
                tokio::select! {
                    _ = ticker.tick() => {}
                    _ = shutdown.changed() => break,
                }

                let started = Instant::now();
                tokio::select! {
                    reports = self.run_round() => {
                        let reachable = reports.iter().filter(|r| r.outcome.is_reachable()).count();
                        let errors = reports.iter().filter(|r| r.outcome.is_error()).count();
                        info!(
                            "Link monitor round finished in {}ms: {} checked, {} reachable, {} unreachable, {} errors",
                            started.elapsed().as_millis(),
                            reports.len(),
                            reachable,
                            reports.len() - reachable - errors,
                            errors
                        );
                    }
                    _ = shutdown.changed() => {
                        debug!("Link monitor: abandoning in-flight round");
                        break;
                    }
                }
            }

            info!("Link monitor stopped");
        })
    }
}
