//! Link management service
//!
//! Owns shortcode assignment: generate a candidate, try to insert it, and on a
//! unique-constraint collision reported by the store, generate a new candidate.
//! The store's unique index is the only authority on collisions; nothing here
//! checks for an existing code before inserting.

use std::sync::Arc;

use serde::Serialize;
use tracing::{debug, info, warn};

use crate::config::ShortcodeConfig;
use crate::errors::{Result, ShortenerError};
use crate::storage::{ClickStore, Link, LinkStore, NewLink, Storage, StoreError};
use crate::utils::generate_random_code;
use crate::utils::url_validator::validate_url;

/// 短码候选生成器
pub trait CodeGenerator: Send + Sync {
    fn generate(&self) -> String;
}

/// 定长随机短码
pub struct RandomCodeGenerator {
    length: usize,
}

impl RandomCodeGenerator {
    pub fn new(length: usize) -> Self {
        Self { length }
    }
}

impl CodeGenerator for RandomCodeGenerator {
    fn generate(&self) -> String {
        generate_random_code(self.length)
    }
}

/// Link plus its recorded click total
#[derive(Debug, Clone, Serialize)]
pub struct LinkStats {
    pub link: Link,
    /// Point-in-time count; concurrent click writes may not be reflected.
    pub total_clicks: u64,
}

pub struct LinkService {
    links: Arc<dyn LinkStore>,
    clicks: Arc<dyn ClickStore>,
    generator: Arc<dyn CodeGenerator>,
    max_retries: u32,
}

impl LinkService {
    pub fn new(storage: &Storage, config: &ShortcodeConfig) -> Self {
        Self::with_generator(
            storage.links.clone(),
            storage.clicks.clone(),
            Arc::new(RandomCodeGenerator::new(config.length)),
            config.max_retries,
        )
    }

    pub fn with_generator(
        links: Arc<dyn LinkStore>,
        clicks: Arc<dyn ClickStore>,
        generator: Arc<dyn CodeGenerator>,
        max_retries: u32,
    ) -> Self {
        Self {
            links,
            clicks,
            generator,
            max_retries,
        }
    }

    /// Create a new short link for `long_url`
    ///
    /// The URL is validated before any store access. One initial attempt plus
    /// up to `max_retries` regenerations are made; if every candidate collides
    /// the call fails with `GenerationExhausted`.
    pub async fn create_link(&self, long_url: &str) -> Result<Link> {
        validate_url(long_url).map_err(|e| ShortenerError::invalid_input(e.to_string()))?;
        let long_url = long_url.trim();

        let attempts = self.max_retries + 1;
        for attempt in 1..=attempts {
            let code = self.generator.generate();

            match self.links.create(NewLink::new(code.as_str(), long_url)).await {
                Ok(link) => {
                    info!(
                        "LinkService: created link '{}' -> '{}'",
                        link.shortcode, link.long_url
                    );
                    return Ok(link);
                }
                Err(StoreError::UniqueViolation(_)) => {
                    debug!(
                        "LinkService: shortcode '{}' collided (attempt {}/{})",
                        code, attempt, attempts
                    );
                }
                Err(e) => return Err(e.into()),
            }
        }

        warn!(
            "LinkService: no free shortcode after {} attempts for '{}'",
            attempts, long_url
        );
        Err(ShortenerError::generation_exhausted(format!(
            "Could not find a free shortcode after {} attempts",
            attempts
        )))
    }

    /// Resolve a shortcode to its link
    pub async fn get_link_by_shortcode(&self, code: &str) -> Result<Link> {
        self.links.find_by_shortcode(code).await.map_err(|e| match e {
            StoreError::NotFound(_) => {
                ShortenerError::not_found(format!("Link '{}' not found", code))
            }
            other => other.into(),
        })
    }

    /// Resolve a shortcode and count its recorded clicks
    pub async fn get_link_stats(&self, code: &str) -> Result<LinkStats> {
        let link = self.get_link_by_shortcode(code).await?;
        let total_clicks = self.clicks.count_by_link_id(link.id).await?;
        Ok(LinkStats { link, total_clicks })
    }

    /// All links, in creation order
    pub async fn list_links(&self) -> Result<Vec<Link>> {
        Ok(self.links.find_all().await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStorage;

    fn service(length: usize) -> LinkService {
        let store = Arc::new(MemoryStorage::new());
        LinkService::new(
            &Storage::from_backend(store, "memory"),
            &ShortcodeConfig {
                length,
                max_retries: 5,
            },
        )
    }

    #[tokio::test]
    async fn test_create_uses_configured_length() {
        let svc = service(8);
        let link = svc.create_link("https://example.com").await.unwrap();
        assert_eq!(link.shortcode.len(), 8);
        assert!(crate::utils::is_valid_short_code(&link.shortcode));
    }

    #[tokio::test]
    async fn test_create_trims_url() {
        let svc = service(6);
        let link = svc.create_link("  https://example.com/a  ").await.unwrap();
        assert_eq!(link.long_url, "https://example.com/a");
    }

    #[tokio::test]
    async fn test_invalid_url_rejected() {
        let svc = service(6);
        let err = svc.create_link("not a url").await.unwrap_err();
        assert!(matches!(err, ShortenerError::InvalidInput(_)));
        assert!(svc.list_links().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_lookup_unknown() {
        let svc = service(6);
        assert!(matches!(
            svc.get_link_by_shortcode("unknown").await,
            Err(ShortenerError::NotFound(_))
        ));
        assert!(matches!(
            svc.get_link_stats("unknown").await,
            Err(ShortenerError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_stats_start_at_zero() {
        let svc = service(6);
        let link = svc.create_link("https://example.com").await.unwrap();
        let stats = svc.get_link_stats(&link.shortcode).await.unwrap();
        assert_eq!(stats.link, link);
        assert_eq!(stats.total_clicks, 0);
    }
}
