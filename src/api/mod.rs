//! HTTP surface
//!
//! Thin actix-web handlers over [`LinkService`] and the click queue; routing
//! is assembled by [`services::configure_routes`].

pub mod error;
pub mod services;

use std::sync::Arc;

use crate::services::LinkService;

/// 所有 handler 共享的应用状态
pub struct AppState {
    pub link_service: Arc<LinkService>,
    /// 对外可见的基础 URL，用于拼接完整短链接
    pub base_url: String,
}

impl AppState {
    pub fn new(link_service: Arc<LinkService>, base_url: impl Into<String>) -> Self {
        Self {
            link_service,
            base_url: base_url.into(),
        }
    }

    pub fn full_short_url(&self, code: &str) -> String {
        crate::utils::full_short_url(&self.base_url, code)
    }
}
