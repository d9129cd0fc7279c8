use std::sync::{Arc, OnceLock};

use super::AppConfig;
use crate::errors::Result;

static CONFIG: OnceLock<Arc<AppConfig>> = OnceLock::new();

/// Initialize the global configuration from `path`
///
/// Only the first call takes effect; later calls return the already loaded
/// configuration.
pub fn init_config(path: &str) -> Result<Arc<AppConfig>> {
    if let Some(config) = CONFIG.get() {
        return Ok(config.clone());
    }
    let loaded = Arc::new(AppConfig::load(path)?);
    Ok(CONFIG.get_or_init(|| loaded).clone())
}
