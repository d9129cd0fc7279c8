use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::analytics::{ClickQueue, ClickWorkerPool, bounded};
use crate::config::{AnalyticsConfig, AppConfig, MonitorConfig};
use crate::monitor::{HttpProber, LinkMonitor};
use crate::services::LinkService;
use crate::storage::{Storage, StorageFactory};

/// 存储与服务层，CLI 与 Server 模式共用
pub struct StartupContext {
    pub storage: Storage,
    pub link_service: Arc<LinkService>,
}

/// 运行中的点击管道
pub struct ClickPipeline {
    pub queue: ClickQueue,
    pub pool: ClickWorkerPool,
}

/// 运行中的健康监控
pub struct MonitorHandle {
    pub shutdown: watch::Sender<bool>,
    pub task: JoinHandle<()>,
}

/// 打开存储并构建 LinkService
pub async fn prepare_services(config: &AppConfig) -> Result<StartupContext> {
    let start_time = std::time::Instant::now();

    let storage = StorageFactory::create(&config.database)
        .await
        .context("Failed to create storage backend")?;
    info!("Using storage backend: {}", storage.backend_name);

    let link_service = Arc::new(LinkService::new(&storage, &config.shortcode));

    debug!(
        "Services ready in {} ms",
        start_time.elapsed().as_millis()
    );
    Ok(StartupContext {
        storage,
        link_service,
    })
}

/// 创建点击队列并启动 worker；统计关闭时返回 `None`
pub fn start_click_pipeline(config: &AnalyticsConfig, storage: &Storage) -> Option<ClickPipeline> {
    if !config.enabled {
        info!("Click analytics disabled, redirects will not be recorded");
        return None;
    }

    let (queue, stream) = bounded(config.click_channel_capacity);
    let pool = ClickWorkerPool::spawn(config.click_worker_count, stream, storage.clicks.clone());
    Some(ClickPipeline { queue, pool })
}

/// 启动链接健康监控；未启用时返回 `None`
pub fn start_monitor(config: &MonitorConfig, link_service: Arc<LinkService>) -> Option<MonitorHandle> {
    if !config.enabled {
        info!("Link monitor disabled");
        return None;
    }

    let prober = Arc::new(HttpProber::new(Duration::from_secs(config.probe_timeout_secs)));
    let monitor = Arc::new(LinkMonitor::new(link_service, prober, config));
    let (shutdown, rx) = watch::channel(false);
    let task = monitor.spawn(rx);

    Some(MonitorHandle { shutdown, task })
}
