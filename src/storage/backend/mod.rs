//! SeaORM storage backend
//!
//! This module provides database storage using SeaORM,
//! supporting SQLite, MySQL/MariaDB, and PostgreSQL.

mod clicks;
mod connection;
mod converters;
mod links;

use sea_orm::{DatabaseConnection, DbErr, SqlErr};
use tracing::info;

use crate::errors::{Result, ShortenerError};
use crate::storage::StoreError;

pub use connection::{connect_generic, connect_sqlite, run_migrations};
pub use converters::link_from_model;

/// 从数据库 URL 推断数据库类型
pub fn infer_backend_from_url(database_url: &str) -> Result<String> {
    if database_url.starts_with("sqlite://")
        || database_url.ends_with(".db")
        || database_url.ends_with(".sqlite")
        || database_url == ":memory:"
    {
        Ok("sqlite".to_string())
    } else if database_url.starts_with("mysql://") || database_url.starts_with("mariadb://") {
        Ok("mysql".to_string())
    } else if database_url.starts_with("postgres://") || database_url.starts_with("postgresql://") {
        Ok("postgres".to_string())
    } else {
        Err(ShortenerError::config(format!(
            "Cannot infer database type from URL: {}. Supported: sqlite://, mysql://, mariadb://, postgres://, memory://",
            database_url
        )))
    }
}

/// 将 DbErr 归类为存储错误
///
/// 唯一约束冲突单独识别，其余一律视为存储不可用。
pub(crate) fn classify_db_error(err: DbErr, context: &str) -> StoreError {
    match err.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(detail)) => StoreError::UniqueViolation(detail),
        _ => StoreError::Unavailable(format!("{}: {}", context, err)),
    }
}

/// SeaORM-based storage backend
#[derive(Clone)]
pub struct SeaOrmStorage {
    db: DatabaseConnection,
    backend_name: String,
}

impl SeaOrmStorage {
    pub async fn new(database_url: &str, backend_name: &str, pool_size: u32) -> Result<Self> {
        if database_url.is_empty() {
            return Err(ShortenerError::config("database_url is empty"));
        }

        let db = if backend_name == "sqlite" {
            connect_sqlite(database_url).await?
        } else {
            connect_generic(database_url, backend_name, pool_size).await?
        };

        let storage = SeaOrmStorage {
            db,
            backend_name: backend_name.to_string(),
        };

        run_migrations(&storage.db).await?;

        info!(
            "{} Storage initialized.",
            storage.backend_name.to_uppercase()
        );
        Ok(storage)
    }
}
