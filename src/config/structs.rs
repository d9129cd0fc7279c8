use serde::{Deserialize, Serialize};

use crate::errors::{Result, ShortenerError};

/// 环境变量前缀，例如 URLSHORTENER__SERVER__PORT=9000
pub const ENV_PREFIX: &str = "URLSHORTENER";

/// 默认配置文件路径
pub const DEFAULT_CONFIG_PATH: &str = "config.toml";

/// 静态配置（从 TOML 加载，启动时使用）
///
/// 优先级：ENV > config.toml > 默认值。
/// 每个字段都有默认值，没有配置文件也能启动。
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub shortcode: ShortcodeConfig,
    #[serde(default)]
    pub analytics: AnalyticsConfig,
    #[serde(default)]
    pub monitor: MonitorConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// 从 TOML 文件和环境变量加载配置
    ///
    /// ENV 前缀：URLSHORTENER，分隔符：__
    pub fn load(path: &str) -> Result<Self> {
        use config::{Config, Environment, File};

        let settings = Config::builder()
            .add_source(File::with_name(path).required(false))
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .map_err(|e| ShortenerError::config(format!("Failed to build config: {}", e)))?;

        let config: AppConfig = settings
            .try_deserialize()
            .map_err(|e| ShortenerError::config(format!("Failed to deserialize config: {}", e)))?;

        if std::path::Path::new(path).exists() {
            eprintln!("[INFO] Configuration loaded from: {}", path);
        }

        config.validate()?;
        Ok(config)
    }

    /// 校验取值范围
    pub fn validate(&self) -> Result<()> {
        if self.analytics.click_channel_capacity == 0 {
            return Err(ShortenerError::config(
                "analytics.click_channel_capacity must be greater than 0",
            ));
        }
        if self.analytics.click_worker_count == 0 {
            return Err(ShortenerError::config(
                "analytics.click_worker_count must be at least 1",
            ));
        }
        if self.monitor.interval_minutes == 0 {
            return Err(ShortenerError::config(
                "monitor.interval_minutes must be greater than 0",
            ));
        }
        if self.monitor.probe_timeout_secs == 0 {
            return Err(ShortenerError::config(
                "monitor.probe_timeout_secs must be greater than 0",
            ));
        }
        if self.monitor.max_concurrent_probes == 0 {
            return Err(ShortenerError::config(
                "monitor.max_concurrent_probes must be greater than 0",
            ));
        }
        if !(MIN_CODE_LENGTH..=MAX_CODE_LENGTH).contains(&self.shortcode.length) {
            return Err(ShortenerError::config(format!(
                "shortcode.length must be between {} and {}, got {}",
                MIN_CODE_LENGTH, MAX_CODE_LENGTH, self.shortcode.length
            )));
        }
        if self.shortcode.max_retries < MIN_GENERATION_RETRIES {
            return Err(ShortenerError::config(format!(
                "shortcode.max_retries must be at least {}, got {}",
                MIN_GENERATION_RETRIES, self.shortcode.max_retries
            )));
        }
        if url::Url::parse(&self.server.base_url).is_err() {
            return Err(ShortenerError::config(format!(
                "server.base_url is not a valid URL: {}",
                self.server.base_url
            )));
        }
        Ok(())
    }

    /// 生成示例 TOML 配置文件
    pub fn sample_toml() -> String {
        toml::to_string_pretty(&Self::default())
            .unwrap_or_else(|e| format!("Error generating sample config: {}", e))
    }
}

/// 短码长度下限
pub const MIN_CODE_LENGTH: usize = 6;
/// 短码长度上限（与 links.shortcode 列宽一致）
pub const MAX_CODE_LENGTH: usize = 10;
/// 唯一性冲突重试次数下限
pub const MIN_GENERATION_RETRIES: u32 = 5;

/// 服务器配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_server_host")]
    pub host: String,
    #[serde(default = "default_server_port")]
    pub port: u16,
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_workers")]
    pub workers: usize,
    #[serde(default = "default_shutdown_timeout_secs")]
    pub shutdown_timeout_secs: u64,
}

/// 数据库连接配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    #[serde(default = "default_database_url")]
    pub database_url: String,
    #[serde(default = "default_database_pool_size")]
    pub pool_size: u32,
}

/// 短码生成配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShortcodeConfig {
    #[serde(default = "default_code_length")]
    pub length: usize,
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,
}

/// 点击统计配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalyticsConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,
    #[serde(default = "default_click_channel_capacity")]
    pub click_channel_capacity: usize,
    #[serde(default = "default_click_worker_count")]
    pub click_worker_count: usize,
}

/// 链接健康监控配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonitorConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,
    #[serde(default = "default_interval_minutes")]
    pub interval_minutes: u64,
    #[serde(default = "default_probe_timeout_secs")]
    pub probe_timeout_secs: u64,
    #[serde(default = "default_max_concurrent_probes")]
    pub max_concurrent_probes: usize,
}

/// 日志配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default = "default_log_format")]
    pub format: String,
    #[serde(default)]
    pub file: Option<String>,
    #[serde(default = "default_max_backups")]
    pub max_backups: u32,
    #[serde(default = "default_true")]
    pub enable_rotation: bool,
}

// ============================================================
// Default value functions
// ============================================================

fn default_true() -> bool {
    true
}

fn default_server_host() -> String {
    "127.0.0.1".to_string()
}

fn default_server_port() -> u16 {
    8080
}

fn default_base_url() -> String {
    "http://localhost:8080".to_string()
}

fn default_workers() -> usize {
    num_cpus::get()
}

fn default_shutdown_timeout_secs() -> u64 {
    10
}

fn default_database_url() -> String {
    "urlshortener.db".to_string()
}

fn default_database_pool_size() -> u32 {
    10
}

fn default_code_length() -> usize {
    6
}

fn default_max_retries() -> u32 {
    5
}

fn default_click_channel_capacity() -> usize {
    100
}

fn default_click_worker_count() -> usize {
    1
}

fn default_interval_minutes() -> u64 {
    5
}

fn default_probe_timeout_secs() -> u64 {
    5
}

fn default_max_concurrent_probes() -> usize {
    16
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "text".to_string()
}

fn default_max_backups() -> u32 {
    5
}

// ============================================================
// Default implementations
// ============================================================

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_server_host(),
            port: default_server_port(),
            base_url: default_base_url(),
            workers: default_workers(),
            shutdown_timeout_secs: default_shutdown_timeout_secs(),
        }
    }
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            database_url: default_database_url(),
            pool_size: default_database_pool_size(),
        }
    }
}

impl Default for ShortcodeConfig {
    fn default() -> Self {
        Self {
            length: default_code_length(),
            max_retries: default_max_retries(),
        }
    }
}

impl Default for AnalyticsConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            click_channel_capacity: default_click_channel_capacity(),
            click_worker_count: default_click_worker_count(),
        }
    }
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            interval_minutes: default_interval_minutes(),
            probe_timeout_secs: default_probe_timeout_secs(),
            max_concurrent_probes: default_max_concurrent_probes(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
            file: None,
            max_backups: default_max_backups(),
            enable_rotation: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let config = AppConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.analytics.click_channel_capacity, 100);
        assert_eq!(config.analytics.click_worker_count, 1);
        assert!(config.monitor.enabled);
        assert_eq!(config.monitor.interval_minutes, 5);
        assert_eq!(config.shortcode.length, 6);
    }

    #[test]
    fn test_missing_file_uses_defaults() {
        let config = AppConfig::load("definitely-not-here.toml").unwrap();
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.database.database_url, "urlshortener.db");
    }

    #[test]
    fn test_partial_toml_keeps_other_defaults() {
        let config: AppConfig = toml::from_str(
            r#"
            [analytics]
            click_channel_capacity = 2

            [monitor]
            enabled = false
            "#,
        )
        .unwrap();
        assert_eq!(config.analytics.click_channel_capacity, 2);
        assert_eq!(config.analytics.click_worker_count, 1);
        assert!(config.analytics.enabled);
        assert!(!config.monitor.enabled);
        assert_eq!(config.monitor.interval_minutes, 5);
    }

    #[test]
    fn test_validate_rejects_zero_capacity() {
        let mut config = AppConfig::default();
        config.analytics.click_channel_capacity = 0;
        assert!(matches!(config.validate(), Err(ShortenerError::Config(_))));
    }

    #[test]
    fn test_validate_rejects_zero_workers() {
        let mut config = AppConfig::default();
        config.analytics.click_worker_count = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_code_length_out_of_range() {
        let mut config = AppConfig::default();
        config.shortcode.length = 4;
        assert!(config.validate().is_err());
        config.shortcode.length = 11;
        assert!(config.validate().is_err());
        config.shortcode.length = 10;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_few_retries() {
        let mut config = AppConfig::default();
        config.shortcode.max_retries = 2;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_sample_toml_round_trips() {
        let sample = AppConfig::sample_toml();
        let parsed: AppConfig = toml::from_str(&sample).unwrap();
        assert_eq!(parsed.server.base_url, "http://localhost:8080");
        assert_eq!(parsed.shortcode.max_retries, 5);
    }
}
