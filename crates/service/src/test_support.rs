#![cfg(test)]
use configs::DatabaseConfig;
use migration::MigratorTrait;
use models::db::connect_with_config;
use sea_orm::DatabaseConnection;
use tokio::sync::OnceCell;
use uuid::Uuid;

use crate::services::{
    fish_pond_service::{self, PondInput},
    lab_box_service::{self, LabBoxInput},
    site_service::{self, SiteInput},
    store_service::{self, StoreInput},
};

// A shared server database is migrated once per test process; in-memory
// sqlite databases are private to their connection and migrate every time.
static MIGRATED: OnceCell<()> = OnceCell::const_new();

fn test_config() -> DatabaseConfig {
    let url = std::env::var("TEST_DATABASE_URL").unwrap_or_else(|_| "sqlite::memory:".to_string());
    DatabaseConfig { url, min_connections: 1, ..Default::default() }
}

pub async fn get_db() -> Result<DatabaseConnection, anyhow::Error> {
    let cfg = test_config();
    let db = connect_with_config(&cfg).await?;
    if cfg.url.contains(":memory:") {
        migration::Migrator::up(&db, None).await?;
    } else {
        MIGRATED
            .get_or_try_init(|| async { migration::Migrator::up(&db, None).await })
            .await?;
    }
    Ok(db)
}

/// A database with a real connection pool, for tests that need concurrent
/// writers: `TEST_DATABASE_URL` when set, otherwise a fresh sqlite file.
pub async fn pooled_db() -> Result<DatabaseConnection, anyhow::Error> {
    if std::env::var("TEST_DATABASE_URL").is_ok() {
        let cfg = DatabaseConfig { max_connections: 8, ..test_config() };
        let db = connect_with_config(&cfg).await?;
        MIGRATED
            .get_or_try_init(|| async { migration::Migrator::up(&db, None).await })
            .await?;
        return Ok(db);
    }
    let path = std::env::temp_dir().join(format!("hatchery_test_{}.db", Uuid::new_v4()));
    let cfg = DatabaseConfig {
        url: format!("sqlite://{}?mode=rwc", path.display()),
        min_connections: 1,
        max_connections: 8,
        ..Default::default()
    };
    let db = connect_with_config(&cfg).await?;
    migration::Migrator::up(&db, None).await?;
    Ok(db)
}

pub async fn seed_site(db: &DatabaseConnection) -> Result<models::site::Model, anyhow::Error> {
    let input = SiteInput { name: format!("site_{}", Uuid::new_v4()), location: Some("Lake shore".into()), description: None };
    Ok(site_service::create_site(db, input).await?)
}

pub async fn seed_store(db: &DatabaseConnection, site_id: Uuid, quantity: f64) -> Result<models::store::Model, anyhow::Error> {
    let input = StoreInput {
        site_id,
        name: format!("store_{}", Uuid::new_v4()),
        feed_type: "grower pellet 2mm".into(),
        unit: None,
        quantity: Some(quantity),
        reorder_level: None,
    };
    Ok(store_service::create_store(db, input).await?)
}

pub async fn seed_pond(db: &DatabaseConnection, site_id: Uuid) -> Result<models::fish_pond::Model, anyhow::Error> {
    let input = PondInput {
        site_id,
        name: format!("pond_{}", Uuid::new_v4()),
        area_m2: 400.0,
        depth_m: Some(1.2),
        species: Some("tilapia".into()),
        fish_count: Some(2000),
        status: None,
    };
    Ok(fish_pond_service::create_pond(db, input).await?)
}

pub async fn seed_lab_box(db: &DatabaseConnection, site_id: Uuid) -> Result<models::lab_box::Model, anyhow::Error> {
    let input = LabBoxInput {
        site_id,
        code: format!("B-{}", &Uuid::new_v4().to_string()[..8]),
        species: Some("catfish".into()),
        stage: None,
        stock_count: Some(10_000),
    };
    Ok(lab_box_service::create_lab_box(db, input).await?)
}
