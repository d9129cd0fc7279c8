//! Link monitor tests

use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use async_trait::async_trait;

use urlshortener::config::ShortcodeConfig;
use urlshortener::monitor::{LinkMonitor, LinkProber, ProbeOutcome};
use urlshortener::services::LinkService;
use urlshortener::storage::{MemoryStorage, Storage};

/// 按 URL 返回预设结果，可指定延迟
struct FakeProber {
    delays: HashMap<String, Duration>,
}

#[async_trait]
impl LinkProber for FakeProber {
    async fn probe(&self, url: &str) -> ProbeOutcome {
        if let Some(delay) = self.delays.get(url) {
            tokio::time::sleep(*delay).await;
        }
        ProbeOutcome::Reachable { status: 200 }
    }
}

fn service() -> Arc<LinkService> {
    let storage = Storage::from_backend(Arc::new(MemoryStorage::new()), "memory");
    Arc::new(LinkService::new(&storage, &ShortcodeConfig::default()))
}

#[tokio::test]
async fn test_one_stuck_probe_does_not_stall_the_round() {
    let service = service();
    let fast_a = service.create_link("https://a.example").await.unwrap();
    let fast_b = service.create_link("https://b.example").await.unwrap();
    let stuck = service.create_link("https://stuck.example").await.unwrap();

    let prober = Arc::new(FakeProber {
        delays: HashMap::from([("https://stuck.example".to_string(), Duration::from_secs(30))]),
    });
    let monitor = LinkMonitor::with_timings(
        service,
        prober,
        Duration::from_secs(60),
        Duration::from_millis(200),
        8,
    );

    let start = Instant::now();
    let reports = monitor.run_round().await;
    assert!(start.elapsed() < Duration::from_secs(5));

    assert_eq!(reports.len(), 3);
    let by_code: HashMap<_, _> = reports
        .iter()
        .map(|r| (r.shortcode.clone(), r.outcome.clone()))
        .collect();
    assert!(by_code[&fast_a.shortcode].is_reachable());
    assert!(by_code[&fast_b.shortcode].is_reachable());
    assert!(by_code[&stuck.shortcode].is_error());

    assert_eq!(monitor.last_reachable(stuck.id), Some(false));
    assert_eq!(monitor.last_reachable(fast_a.id), Some(true));
}

#[tokio::test]
async fn test_probes_run_concurrently() {
    let service = service();
    let mut delays = HashMap::new();
    for i in 0..5 {
        let url = format!("https://slow{}.example", i);
        service.create_link(&url).await.unwrap();
        delays.insert(url, Duration::from_millis(300));
    }

    let monitor = LinkMonitor::with_timings(
        service,
        Arc::new(FakeProber { delays }),
        Duration::from_secs(60),
        Duration::from_secs(5),
        5,
    );

    let start = Instant::now();
    let reports = monitor.run_round().await;
    // 串行需要 1.5s
    assert!(start.elapsed() < Duration::from_millis(1200));
    assert!(reports.iter().all(|r| r.outcome.is_reachable()));
}

#[tokio::test]
async fn test_round_does_not_modify_links() {
    let service = service();
    let link = service.create_link("https://stuck.example").await.unwrap();
    let monitor = LinkMonitor::with_timings(
        service.clone(),
        Arc::new(FakeProber {
            delays: HashMap::from([(link.long_url.clone(), Duration::from_secs(30))]),
        }),
        Duration::from_secs(60),
        Duration::from_millis(50),
        1,
    );

    monitor.run_round().await;
    assert_eq!(service.list_links().await.unwrap(), vec![link]);
}
