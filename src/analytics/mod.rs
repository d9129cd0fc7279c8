//! Click analytics pipeline
//!
//! Redirect handlers push [`ClickEvent`]s into a bounded [`ClickQueue`] without
//! ever waiting; a fixed [`ClickWorkerPool`] drains the matching
//! [`ClickStream`] and writes one `Click` row per event.

pub mod queue;
pub mod worker;

pub use queue::{ClickQueue, ClickStream, bounded};
pub use worker::{ClickWorkerPool, DrainSummary};

use chrono::{DateTime, Utc};

use crate::storage::{Link, NewClick};

/// 一次重定向产生的点击事件（只在内存中流转）
#[derive(Debug, Clone)]
pub struct ClickEvent {
    /// 被访问链接的 id
    pub link_id: i64,
    /// 短码（用于日志）
    pub shortcode: String,
    /// 重定向发生的时间
    pub timestamp: DateTime<Utc>,
    /// 来源页面 (Referer header)
    pub referrer: Option<String>,
    /// 用户代理 (User-Agent header)
    pub user_agent: Option<String>,
    /// 客户端 IP 地址
    pub ip_address: Option<String>,
}

impl ClickEvent {
    /// 为已解析的链接创建点击事件，时间戳取当前时间
    pub fn new(link: &Link) -> Self {
        Self {
            link_id: link.id,
            shortcode: link.shortcode.clone(),
            timestamp: Utc::now(),
            referrer: None,
            user_agent: None,
            ip_address: None,
        }
    }

    /// 附加请求元数据（仅供参考，不影响正确性）
    pub fn with_request_meta(
        mut self,
        referrer: Option<String>,
        user_agent: Option<String>,
        ip_address: Option<String>,
    ) -> Self {
        self.referrer = referrer;
        self.user_agent = user_agent;
        self.ip_address = ip_address;
        self
    }

    /// 转换为待持久化的点击记录
    pub fn into_new_click(self) -> NewClick {
        NewClick {
            link_id: self.link_id,
            timestamp: self.timestamp,
            referrer: self.referrer,
            user_agent: self.user_agent,
            ip_address: self.ip_address,
        }
    }
}
