/// Schema constraints: foreign keys, cascades and unique indexes
pub mod schema_tests;

/// Transaction handling around stock balances
pub mod transaction_tests;

use anyhow::Result;
use chrono::Utc;
use configs::DatabaseConfig;
use migration::MigratorTrait;
use sea_orm::{ActiveModelTrait, DatabaseConnection, Set};
use uuid::Uuid;

use crate::{db::connect_with_config, fish_pond, site, store};

/// Fresh migrated database: `TEST_DATABASE_URL` when set, otherwise in-memory sqlite.
pub(crate) async fn setup_test_db() -> Result<DatabaseConnection> {
    let url = std::env::var("TEST_DATABASE_URL").unwrap_or_else(|_| "sqlite::memory:".to_string());
    let cfg = DatabaseConfig { url, min_connections: 1, ..Default::default() };
    let db = connect_with_config(&cfg).await?;
    migration::Migrator::up(&db, None).await?;
    Ok(db)
}

pub(crate) async fn seed_site(db: &DatabaseConnection) -> Result<site::Model> {
    let now = Utc::now().into();
    let am = site::ActiveModel {
        id: Set(Uuid::new_v4()),
        name: Set(format!("site_{}", Uuid::new_v4())),
        location: Set(None),
        description: Set(None),
        created_at: Set(now),
        updated_at: Set(now),
    };
    Ok(am.insert(db).await?)
}

pub(crate) async fn seed_store(db: &DatabaseConnection, site_id: Uuid, quantity: f64) -> Result<store::Model> {
    let now = Utc::now().into();
    let am = store::ActiveModel {
        id: Set(Uuid::new_v4()),
        site_id: Set(site_id),
        name: Set("Main feed shed".into()),
        feed_type: Set("starter crumble".into()),
        unit: Set(store::DEFAULT_UNIT.into()),
        quantity: Set(quantity),
        reorder_level: Set(0.0),
        created_at: Set(now),
        updated_at: Set(now),
    };
    Ok(am.insert(db).await?)
}

pub(crate) async fn seed_pond(db: &DatabaseConnection, site_id: Uuid) -> Result<fish_pond::Model> {
    let now = Utc::now().into();
    let am = fish_pond::ActiveModel {
        id: Set(Uuid::new_v4()),
        site_id: Set(site_id),
        name: Set("Pond A".into()),
        area_m2: Set(250.0),
        depth_m: Set(Some(1.5)),
        species: Set(Some("tilapia".into())),
        fish_count: Set(1200),
        status: Set("active".into()),
        created_at: Set(now),
        updated_at: Set(now),
    };
    Ok(am.insert(db).await?)
}
