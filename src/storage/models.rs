use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// 一条短链接记录，创建后不可修改
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Link {
    pub id: i64,
    pub shortcode: String,
    pub long_url: String,
    pub created_at: DateTime<Utc>,
}

/// 待写入的短链接（id 由存储分配）
#[derive(Debug, Clone)]
pub struct NewLink {
    pub shortcode: String,
    pub long_url: String,
    pub created_at: DateTime<Utc>,
}

impl NewLink {
    pub fn new(shortcode: impl Into<String>, long_url: impl Into<String>) -> Self {
        Self {
            shortcode: shortcode.into(),
            long_url: long_url.into(),
            created_at: Utc::now(),
        }
    }
}

/// 已持久化的点击记录
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Click {
    pub id: i64,
    pub link_id: i64,
    pub timestamp: DateTime<Utc>,
    pub referrer: Option<String>,
    pub user_agent: Option<String>,
    pub ip_address: Option<String>,
}

/// 待写入的点击记录
#[derive(Debug, Clone)]
pub struct NewClick {
    pub link_id: i64,
    pub timestamp: DateTime<Utc>,
    pub referrer: Option<String>,
    pub user_agent: Option<String>,
    pub ip_address: Option<String>,
}
