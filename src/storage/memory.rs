//! In-memory storage backend
//!
//! Backed by DashMap; the shortcode index uses the shard-locked entry API so
//! concurrent inserts of the same code resolve to exactly one winner, the same
//! contract a database unique index gives.

use std::sync::atomic::{AtomicI64, Ordering};

use async_trait::async_trait;
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use tracing::trace;

use super::models::{Click, Link, NewClick, NewLink};
use super::traits::{ClickStore, LinkStore, StoreError, StoreResult};

#[derive(Default)]
pub struct MemoryStorage {
    /// id → link
    links: DashMap<i64, Link>,
    /// shortcode → id（唯一索引）
    codes: DashMap<String, i64>,
    /// link_id → clicks
    clicks: DashMap<i64, Vec<Click>>,
    next_link_id: AtomicI64,
    next_click_id: AtomicI64,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// 当前链接数量
    pub fn link_count(&self) -> usize {
        self.links.len()
    }

    /// 所有点击记录总数
    pub fn click_count(&self) -> usize {
        self.clicks.iter().map(|entry| entry.value().len()).sum()
    }

    /// 某个链接的点击记录快照
    pub fn clicks_for(&self, link_id: i64) -> Vec<Click> {
        self.clicks
            .get(&link_id)
            .map(|entry| entry.value().clone())
            .unwrap_or_default()
    }
}

#[async_trait]
impl LinkStore for MemoryStorage {
    async fn create(&self, link: NewLink) -> StoreResult<Link> {
        match self.codes.entry(link.shortcode.clone()) {
            Entry::Occupied(_) => Err(StoreError::UniqueViolation(link.shortcode)),
            Entry::Vacant(slot) => {
                let id = self.next_link_id.fetch_add(1, Ordering::Relaxed) + 1;
                let stored = Link {
                    id,
                    shortcode: link.shortcode,
                    long_url: link.long_url,
                    created_at: link.created_at,
                };
                self.links.insert(id, stored.clone());
                slot.insert(id);
                trace!("MemoryStorage: inserted link {} ({})", stored.shortcode, id);
                Ok(stored)
            }
        }
    }

    async fn find_by_shortcode(&self, code: &str) -> StoreResult<Link> {
        let id = self
            .codes
            .get(code)
            .map(|entry| *entry.value())
            .ok_or_else(|| StoreError::NotFound(code.to_string()))?;

        self.links
            .get(&id)
            .map(|entry| entry.value().clone())
            .ok_or_else(|| StoreError::NotFound(code.to_string()))
    }

    async fn find_all(&self) -> StoreResult<Vec<Link>> {
        let mut links: Vec<Link> = self.links.iter().map(|e| e.value().clone()).collect();
        links.sort_by_key(|link| link.id);
        Ok(links)
    }
}

#[async_trait]
impl ClickStore for MemoryStorage {
    async fn create(&self, click: NewClick) -> StoreResult<Click> {
        if !self.links.contains_key(&click.link_id) {
            return Err(StoreError::NotFound(format!("link id {}", click.link_id)));
        }

        let stored = Click {
            id: self.next_click_id.fetch_add(1, Ordering::Relaxed) + 1,
            link_id: click.link_id,
            timestamp: click.timestamp,
            referrer: click.referrer,
            user_agent: click.user_agent,
            ip_address: click.ip_address,
        };
        self.clicks
            .entry(stored.link_id)
            .or_default()
            .push(stored.clone());
        Ok(stored)
    }

    async fn count_by_link_id(&self, link_id: i64) -> StoreResult<u64> {
        Ok(self
            .clicks
            .get(&link_id)
            .map(|entry| entry.value().len() as u64)
            .unwrap_or(0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use std::sync::Arc;

    fn new_click(link_id: i64) -> NewClick {
        NewClick {
            link_id,
            timestamp: Utc::now(),
            referrer: None,
            user_agent: None,
            ip_address: None,
        }
    }

    #[tokio::test]
    async fn test_create_and_find() {
        let store = MemoryStorage::new();
        let link = LinkStore::create(&store, NewLink::new("abc123", "https://example.com"))
            .await
            .unwrap();
        assert_eq!(link.id, 1);

        let found = store.find_by_shortcode("abc123").await.unwrap();
        assert_eq!(found, link);
    }

    #[tokio::test]
    async fn test_duplicate_shortcode_rejected() {
        let store = MemoryStorage::new();
        LinkStore::create(&store, NewLink::new("dup", "https://a.example"))
            .await
            .unwrap();
        let err = LinkStore::create(&store, NewLink::new("dup", "https://b.example"))
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::UniqueViolation(_)));
        // 原记录不变
        let found = store.find_by_shortcode("dup").await.unwrap();
        assert_eq!(found.long_url, "https://a.example");
    }

    #[tokio::test]
    async fn test_concurrent_same_code_single_winner() {
        let store = Arc::new(MemoryStorage::new());
        let mut handles = Vec::new();
        for i in 0..16 {
            let store = Arc::clone(&store);
            handles.push(tokio::spawn(async move {
                LinkStore::create(
                    store.as_ref(),
                    NewLink::new("race", format!("https://{}.example", i)),
                )
                .await
                .is_ok()
            }));
        }
        let mut winners = 0;
        for handle in handles {
            if handle.await.unwrap() {
                winners += 1;
            }
        }
        assert_eq!(winners, 1);
        assert_eq!(store.link_count(), 1);
    }

    #[tokio::test]
    async fn test_find_missing() {
        let store = MemoryStorage::new();
        assert!(matches!(
            store.find_by_shortcode("nope").await,
            Err(StoreError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_clicks_require_existing_link() {
        let store = MemoryStorage::new();
        let err = ClickStore::create(&store, new_click(42)).await.unwrap_err();
        assert!(matches!(err, StoreError::NotFound(_)));
        assert_eq!(store.click_count(), 0);
    }

    #[tokio::test]
    async fn test_count_by_link_id() {
        let store = MemoryStorage::new();
        let a = LinkStore::create(&store, NewLink::new("aaaaaa", "https://a.example"))
            .await
            .unwrap();
        let b = LinkStore::create(&store, NewLink::new("bbbbbb", "https://b.example"))
            .await
            .unwrap();

        for _ in 0..3 {
            ClickStore::create(&store, new_click(a.id)).await.unwrap();
        }
        ClickStore::create(&store, new_click(b.id)).await.unwrap();

        assert_eq!(store.count_by_link_id(a.id).await.unwrap(), 3);
        assert_eq!(store.count_by_link_id(b.id).await.unwrap(), 1);
        assert_eq!(store.count_by_link_id(999).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_find_all_sorted_by_id() {
        let store = MemoryStorage::new();
        for code in ["cccccc", "aaaaaa", "bbbbbb"] {
            LinkStore::create(&store, NewLink::new(code, "https://x.example"))
                .await
                .unwrap();
        }
        let all = store.find_all().await.unwrap();
        let ids: Vec<i64> = all.iter().map(|l| l.id).collect();
        assert_eq!(ids, vec![1, 2, 3]);
        assert_eq!(all[0].shortcode, "cccccc");
    }
}
