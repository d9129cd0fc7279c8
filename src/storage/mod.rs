use std::sync::Arc;

use tracing::info;

use crate::config::DatabaseConfig;
use crate::errors::Result;

pub mod backend;
pub mod memory;
pub mod models;
mod traits;

pub use backend::SeaOrmStorage;
pub use memory::MemoryStorage;
pub use models::{Click, Link, NewClick, NewLink};
pub use traits::{ClickStore, LinkStore, StoreError, StoreResult};

/// URL 前缀：选择进程内存储
pub const MEMORY_URL_PREFIX: &str = "memory://";

/// 已打开的存储后端，Link 与 Click 两个视图共享同一个底层实例
#[derive(Clone)]
pub struct Storage {
    pub links: Arc<dyn LinkStore>,
    pub clicks: Arc<dyn ClickStore>,
    pub backend_name: String,
}

impl Storage {
    /// 用同一个实现同时充当 LinkStore 与 ClickStore
    pub fn from_backend<S>(backend: Arc<S>, backend_name: &str) -> Self
    where
        S: LinkStore + ClickStore + 'static,
    {
        Self {
            links: backend.clone(),
            clicks: backend,
            backend_name: backend_name.to_string(),
        }
    }
}

pub struct StorageFactory;

impl StorageFactory {
    pub async fn create(config: &DatabaseConfig) -> Result<Storage> {
        let database_url = &config.database_url;

        if database_url.starts_with(MEMORY_URL_PREFIX) {
            info!("Using in-memory storage, data will not survive a restart");
            return Ok(Storage::from_backend(
                Arc::new(MemoryStorage::new()),
                "memory",
            ));
        }

        // 从 URL 自动推断数据库类型
        let backend_type = backend::infer_backend_from_url(database_url)?;
        let storage = SeaOrmStorage::new(database_url, &backend_type, config.pool_size).await?;
        Ok(Storage::from_backend(Arc::new(storage), &backend_type))
    }
}
