use anyhow::Result;
use chrono::Utc;
use sea_orm::{ActiveModelTrait, EntityTrait, Set};
use uuid::Uuid;

use super::{seed_pond, seed_site, seed_store, setup_test_db};
use crate::{cage, feeding, lab_box, site};

fn lab_box_row(site_id: Uuid, code: &str) -> lab_box::ActiveModel {
    let now = Utc::now().into();
    lab_box::ActiveModel {
        id: Set(Uuid::new_v4()),
        site_id: Set(site_id),
        code: Set(code.to_string()),
        species: Set(None),
        stage: Set("egg".into()),
        stock_count: Set(5000),
        created_at: Set(now),
        updated_at: Set(now),
    }
}

/// Site rows survive while children point at them
#[tokio::test]
async fn test_site_delete_is_restricted_by_children() -> Result<()> {
    if std::env::var("SKIP_DB_TESTS").is_ok() {
        return Ok(());
    }
    let db = setup_test_db().await?;

    let s = seed_site(&db).await?;
    let _pond = seed_pond(&db, s.id).await?;

    let res = site::Entity::delete_by_id(s.id).exec(&db).await;
    assert!(res.is_err(), "site delete must fail while a pond references it");
    assert!(site::Entity::find_by_id(s.id).one(&db).await?.is_some());
    Ok(())
}

/// Deleting a pond takes its cages and their feeding history with it
#[tokio::test]
async fn test_pond_delete_cascades_to_cages_and_feedings() -> Result<()> {
    if std::env::var("SKIP_DB_TESTS").is_ok() {
        return Ok(());
    }
    let db = setup_test_db().await?;

    let s = seed_site(&db).await?;
    let pond = seed_pond(&db, s.id).await?;
    let st = seed_store(&db, s.id, 100.0).await?;
    let now = Utc::now().into();

    let c = cage::ActiveModel {
        id: Set(Uuid::new_v4()),
        pond_id: Set(pond.id),
        name: Set("Cage 1".into()),
        species: Set(None),
        fish_count: Set(300),
        created_at: Set(now),
        updated_at: Set(now),
    }
    .insert(&db)
    .await?;

    let f = feeding::ActiveModel {
        id: Set(Uuid::new_v4()),
        lab_box_id: Set(None),
        pond_id: Set(None),
        cage_id: Set(Some(c.id)),
        store_id: Set(st.id),
        quantity: Set(2.5),
        fed_at: Set(now),
        notes: Set(None),
        created_at: Set(now),
        updated_at: Set(now),
    }
    .insert(&db)
    .await?;
    assert_eq!(f.target()?, crate::target::Target::Cage(c.id));

    crate::fish_pond::Entity::delete_by_id(pond.id).exec(&db).await?;

    assert!(cage::Entity::find_by_id(c.id).one(&db).await?.is_none());
    assert!(feeding::Entity::find_by_id(f.id).one(&db).await?.is_none());
    Ok(())
}

/// Lab box codes are unique per site, not globally
#[tokio::test]
async fn test_lab_box_code_unique_per_site() -> Result<()> {
    if std::env::var("SKIP_DB_TESTS").is_ok() {
        return Ok(());
    }
    let db = setup_test_db().await?;

    let a = seed_site(&db).await?;
    let b = seed_site(&db).await?;

    lab_box_row(a.id, "B-01").insert(&db).await?;
    assert!(lab_box_row(a.id, "B-01").insert(&db).await.is_err());
    lab_box_row(b.id, "B-01").insert(&db).await?;
    Ok(())
}

/// Feeding rows keep their store alive
#[tokio::test]
async fn test_store_referenced_by_feeding_cannot_be_deleted() -> Result<()> {
    if std::env::var("SKIP_DB_TESTS").is_ok() {
        return Ok(());
    }
    let db = setup_test_db().await?;

    let s = seed_site(&db).await?;
    let pond = seed_pond(&db, s.id).await?;
    let st = seed_store(&db, s.id, 50.0).await?;
    let now = Utc::now().into();
    feeding::ActiveModel {
        id: Set(Uuid::new_v4()),
        lab_box_id: Set(None),
        pond_id: Set(Some(pond.id)),
        cage_id: Set(None),
        store_id: Set(st.id),
        quantity: Set(1.0),
        fed_at: Set(now),
        notes: Set(Some("morning ration".into())),
        created_at: Set(now),
        updated_at: Set(now),
    }
    .insert(&db)
    .await?;

    assert!(crate::store::Entity::delete_by_id(st.id).exec(&db).await.is_err());
    Ok(())
}
