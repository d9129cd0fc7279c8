//! SeaORM storage tests (SQLite on a temp file)

use std::sync::Arc;

use chrono::Utc;
use tempfile::TempDir;

use migration::{Migrator, MigratorTrait};
use urlshortener::config::{DatabaseConfig, ShortcodeConfig};
use urlshortener::storage::backend::{connect_sqlite, run_migrations};
use urlshortener::services::LinkService;
use urlshortener::storage::{
    ClickStore, LinkStore, NewClick, NewLink, SeaOrmStorage, StorageFactory, StoreError,
};

async fn sqlite_storage(dir: &TempDir) -> SeaOrmStorage {
    let db_path = dir.path().join("storage_test.db");
    let db_url = format!("sqlite://{}?mode=rwc", db_path.display());
    SeaOrmStorage::new(&db_url, "sqlite", 1)
        .await
        .expect("Failed to open SQLite storage")
}

fn new_click(link_id: i64) -> NewClick {
    NewClick {
        link_id,
        timestamp: Utc::now(),
        referrer: Some("https://ref.example".into()),
        user_agent: None,
        ip_address: Some("127.0.0.1".into()),
    }
}

#[tokio::test]
async fn test_create_and_find_link() {
    let dir = TempDir::new().unwrap();
    let storage = sqlite_storage(&dir).await;

    let created = LinkStore::create(&storage, NewLink::new("abc123", "https://example.com"))
        .await
        .unwrap();
    assert!(created.id > 0);

    let found = storage.find_by_shortcode("abc123").await.unwrap();
    assert_eq!(found.id, created.id);
    assert_eq!(found.long_url, "https://example.com");

    assert!(matches!(
        storage.find_by_shortcode("nope00").await,
        Err(StoreError::NotFound(_))
    ));
}

#[tokio::test]
async fn test_unique_index_reports_collision() {
    let dir = TempDir::new().unwrap();
    let storage = sqlite_storage(&dir).await;

    LinkStore::create(&storage, NewLink::new("dup123", "https://a.example"))
        .await
        .unwrap();
    let err = LinkStore::create(&storage, NewLink::new("dup123", "https://b.example"))
        .await
        .unwrap_err();
    assert!(matches!(err, StoreError::UniqueViolation(_)), "{:?}", err);

    let all = storage.find_all().await.unwrap();
    assert_eq!(all.len(), 1);
    assert_eq!(all[0].long_url, "https://a.example");
}

#[tokio::test]
async fn test_click_count() {
    let dir = TempDir::new().unwrap();
    let storage = sqlite_storage(&dir).await;

    let a = LinkStore::create(&storage, NewLink::new("aaaaaa", "https://a.example"))
        .await
        .unwrap();
    let b = LinkStore::create(&storage, NewLink::new("bbbbbb", "https://b.example"))
        .await
        .unwrap();

    for _ in 0..3 {
        ClickStore::create(&storage, new_click(a.id)).await.unwrap();
    }
    let click = ClickStore::create(&storage, new_click(b.id)).await.unwrap();
    assert_eq!(click.link_id, b.id);
    assert_eq!(click.referrer.as_deref(), Some("https://ref.example"));

    assert_eq!(storage.count_by_link_id(a.id).await.unwrap(), 3);
    assert_eq!(storage.count_by_link_id(b.id).await.unwrap(), 1);
}

#[tokio::test]
async fn test_data_survives_reopen() {
    let dir = TempDir::new().unwrap();
    {
        let storage = sqlite_storage(&dir).await;
        LinkStore::create(&storage, NewLink::new("keep01", "https://keep.example"))
            .await
            .unwrap();
    }

    let storage = sqlite_storage(&dir).await;
    let link = storage.find_by_shortcode("keep01").await.unwrap();
    assert_eq!(link.long_url, "https://keep.example");
}

#[tokio::test]
async fn test_migrations_roll_back_and_reapply() {
    let dir = TempDir::new().unwrap();
    let db_path = dir.path().join("migrate_test.db");
    let db_url = format!("sqlite://{}?mode=rwc", db_path.display());

    let db = connect_sqlite(&db_url).await.unwrap();
    run_migrations(&db).await.unwrap();
    Migrator::down(&db, None).await.unwrap();
    Migrator::up(&db, None).await.unwrap();
    drop(db);

    let storage = sqlite_storage(&dir).await;
    let link = LinkStore::create(&storage, NewLink::new("mig001", "https://m.example"))
        .await
        .unwrap();
    ClickStore::create(&storage, new_click(link.id)).await.unwrap();
    assert_eq!(storage.count_by_link_id(link.id).await.unwrap(), 1);
}

#[tokio::test]
async fn test_factory_selects_backend() {
    let memory = StorageFactory::create(&DatabaseConfig {
        database_url: "memory://".into(),
        pool_size: 1,
    })
    .await
    .unwrap();
    assert_eq!(memory.backend_name, "memory");

    let dir = TempDir::new().unwrap();
    let path = dir.path().join("factory.db");
    let sqlite = StorageFactory::create(&DatabaseConfig {
        database_url: path.display().to_string(),
        pool_size: 1,
    })
    .await
    .unwrap();
    assert_eq!(sqlite.backend_name, "sqlite");

    assert!(
        StorageFactory::create(&DatabaseConfig {
            database_url: "redis://localhost".into(),
            pool_size: 1,
        })
        .await
        .is_err()
    );
}

#[tokio::test]
async fn test_link_service_over_sqlite() {
    let dir = TempDir::new().unwrap();
    let storage = Arc::new(sqlite_storage(&dir).await);
    let storage = urlshortener::storage::Storage::from_backend(storage, "sqlite");
    let service = LinkService::new(&storage, &ShortcodeConfig::default());

    let link = service.create_link("https://example.com").await.unwrap();
    ClickStore::create(storage.clicks.as_ref(), new_click(link.id))
        .await
        .unwrap();

    let stats = service.get_link_stats(&link.shortcode).await.unwrap();
    assert_eq!(stats.total_clicks, 1);
}
