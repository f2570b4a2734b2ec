use anyhow::Result;
use sea_orm::{ActiveModelTrait, EntityTrait, IntoActiveModel, Set, TransactionTrait};

use super::{seed_site, seed_store, setup_test_db};
use crate::store;

/// Committed balance changes are visible afterwards
#[tokio::test]
async fn test_transaction_commit() -> Result<()> {
    if std::env::var("SKIP_DB_TESTS").is_ok() {
        return Ok(());
    }
    let db = setup_test_db().await?;
    let s = seed_site(&db).await?;
    let st = seed_store(&db, s.id, 40.0).await?;

    let txn = db.begin().await?;
    let mut am = st.clone().into_active_model();
    am.quantity = Set(35.5);
    am.update(&txn).await?;
    txn.commit().await?;

    let found = store::Entity::find_by_id(st.id).one(&db).await?.expect("store exists");
    assert_eq!(found.quantity, 35.5);
    Ok(())
}

/// Rolled back balance changes leave the stored quantity untouched
#[tokio::test]
async fn test_transaction_rollback() -> Result<()> {
    if std::env::var("SKIP_DB_TESTS").is_ok() {
        return Ok(());
    }
    let db = setup_test_db().await?;
    let s = seed_site(&db).await?;
    let st = seed_store(&db, s.id, 40.0).await?;

    let txn = db.begin().await?;
    let mut am = st.clone().into_active_model();
    am.quantity = Set(0.0);
    am.update(&txn).await?;
    txn.rollback().await?;

    let found = store::Entity::find_by_id(st.id).one(&db).await?.expect("store exists");
    assert_eq!(found.quantity, 40.0);
    assert!(!found.is_low());
    Ok(())
}
