use std::fmt;

use async_trait::async_trait;

use super::models::{Click, Link, NewClick, NewLink};

/// 存储层错误
///
/// `UniqueViolation` 必须与其他失败区分开：链接服务依赖它判断短码冲突。
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// 短码已被占用
    UniqueViolation(String),
    /// 记录不存在
    NotFound(String),
    /// 其他任何存储失败
    Unavailable(String),
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreError::UniqueViolation(msg) => write!(f, "unique constraint violation: {}", msg),
            StoreError::NotFound(msg) => write!(f, "not found: {}", msg),
            StoreError::Unavailable(msg) => write!(f, "store unavailable: {}", msg),
        }
    }
}

impl std::error::Error for StoreError {}

pub type StoreResult<T> = std::result::Result<T, StoreError>;

/// Link 持久化接口
///
/// 实现必须自行保证并发安全，并以 shortcode 唯一约束作为冲突的唯一判定来源。
#[async_trait]
pub trait LinkStore: Send + Sync {
    /// 插入新链接，shortcode 冲突时返回 `StoreError::UniqueViolation`
    async fn create(&self, link: NewLink) -> StoreResult<Link>;

    /// 按短码查询，不存在时返回 `StoreError::NotFound`
    async fn find_by_shortcode(&self, code: &str) -> StoreResult<Link>;

    /// 全部链接（按 id 升序）
    async fn find_all(&self) -> StoreResult<Vec<Link>>;
}

/// Click 持久化接口
#[async_trait]
pub trait ClickStore: Send + Sync {
    /// 写入一条点击，link_id 必须指向已存在的链接
    async fn create(&self, click: NewClick) -> StoreResult<Click>;

    /// 统计某个链接的点击总数
    async fn count_by_link_id(&self, link_id: i64) -> StoreResult<u64>;
}
