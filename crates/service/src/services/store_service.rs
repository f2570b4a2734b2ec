use uuid::Uuid;
use chrono::Utc;
use sea_orm::{
    sea_query::Expr, ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, Set, TransactionTrait,
};
use serde::Deserialize;
use tracing::info;

use models::{feeding, site, store};
use crate::{errors::{db_err, ServiceError}, stock};
use common::pagination::Pagination;

#[derive(Clone, Debug, Deserialize)]
pub struct StoreInput {
    pub site_id: Uuid,
    pub name: String,
    pub feed_type: String,
    /// Defaults to `kg`
    #[serde(default)]
    pub unit: Option<String>,
    /// Opening balance, defaults to 0
    #[serde(default)]
    pub quantity: Option<f64>,
    #[serde(default)]
    pub reorder_level: Option<f64>,
}

/// `quantity` here is a stock-take correction; day-to-day movements go
/// through feedings and `restock`.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct StorePatch {
    pub name: Option<String>,
    pub feed_type: Option<String>,
    pub unit: Option<String>,
    pub quantity: Option<f64>,
    pub reorder_level: Option<f64>,
}

#[derive(Clone, Copy, Debug, Default, Deserialize)]
pub struct StoreFilter {
    pub site_id: Option<Uuid>,
    /// `true`: only stores at or below their reorder level; `false`: only the others
    pub low_stock: Option<bool>,
}

#[derive(Clone, Copy, Debug, Deserialize)]
pub struct RestockInput {
    pub quantity: f64,
}

/// Create a store after checking its site.
pub async fn create_store(db: &DatabaseConnection, input: StoreInput) -> Result<store::Model, ServiceError> {
    let name = store::validate_name(&input.name)?;
    let feed_type = store::validate_feed_type(&input.feed_type)?;
    let unit = store::validate_unit(input.unit.as_deref().unwrap_or(store::DEFAULT_UNIT))?;
    let quantity = store::validate_quantity("quantity", input.quantity.unwrap_or(0.0))?;
    let reorder_level = store::validate_quantity("reorder_level", input.reorder_level.unwrap_or(0.0))?;

    if site::Entity::find_by_id(input.site_id).one(db).await.map_err(db_err)?.is_none() {
        return Err(ServiceError::not_found("site"));
    }

    let now = Utc::now().into();
    let am = store::ActiveModel {
        id: Set(Uuid::new_v4()),
        site_id: Set(input.site_id),
        name: Set(name),
        feed_type: Set(feed_type),
        unit: Set(unit),
        quantity: Set(quantity),
        reorder_level: Set(reorder_level),
        created_at: Set(now),
        updated_at: Set(now),
    };
    let created = am.insert(db).await.map_err(db_err)?;
    info!(id = %created.id, site_id = %created.site_id, quantity = created.quantity, "store_created");
    Ok(created)
}

/// Get store by id.
pub async fn get_store(db: &DatabaseConnection, id: Uuid) -> Result<Option<store::Model>, ServiceError> {
    store::Entity::find_by_id(id).one(db).await.map_err(db_err)
}

/// Update store fields.
pub async fn update_store(db: &DatabaseConnection, id: Uuid, patch: StorePatch) -> Result<store::Model, ServiceError> {
    let mut am: store::ActiveModel = store::Entity::find_by_id(id)
        .one(db).await.map_err(db_err)?
        .ok_or_else(|| ServiceError::not_found("store"))?
        .into();
    if let Some(n) = patch.name { am.name = Set(store::validate_name(&n)?); }
    if let Some(f) = patch.feed_type { am.feed_type = Set(store::validate_feed_type(&f)?); }
    if let Some(u) = patch.unit { am.unit = Set(store::validate_unit(&u)?); }
    if let Some(q) = patch.quantity {
        let q = store::validate_quantity("quantity", q)?;
        info!(id = %id, quantity = q, "store_stock_take");
        am.quantity = Set(q);
    }
    if let Some(r) = patch.reorder_level { am.reorder_level = Set(store::validate_quantity("reorder_level", r)?); }
    am.updated_at = Set(Utc::now().into());
    am.update(db).await.map_err(db_err)
}

/// Delete a store; refused while feeding records draw from it.
pub async fn delete_store(db: &DatabaseConnection, id: Uuid) -> Result<bool, ServiceError> {
    let refs = feeding::Entity::find().filter(feeding::Column::StoreId.eq(id)).count(db).await.map_err(db_err)?;
    if refs > 0 {
        return Err(ServiceError::Conflict(format!("store is referenced by {refs} feeding records")));
    }
    let res = store::Entity::delete_by_id(id).exec(db).await.map_err(db_err)?;
    Ok(res.rows_affected > 0)
}

/// List stores with optional site / low-stock filters and pagination.
pub async fn list_stores(db: &DatabaseConnection, filter: StoreFilter, opts: Pagination) -> Result<Vec<store::Model>, ServiceError> {
    let (page_idx, per_page) = opts.normalize();
    let mut select = store::Entity::find();
    if let Some(sid) = filter.site_id { select = select.filter(store::Column::SiteId.eq(sid)); }
    match filter.low_stock {
        Some(true) => select = select.filter(Expr::col(store::Column::Quantity).lte(Expr::col(store::Column::ReorderLevel))),
        Some(false) => select = select.filter(Expr::col(store::Column::Quantity).gt(Expr::col(store::Column::ReorderLevel))),
        None => {}
    }
    select
        .order_by_asc(store::Column::Name)
        .paginate(db, per_page)
        .fetch_page(page_idx)
        .await
        .map_err(db_err)
}

/// Record a feed delivery.
pub async fn restock_store(db: &DatabaseConnection, id: Uuid, input: RestockInput) -> Result<store::Model, ServiceError> {
    let txn = db.begin().await.map_err(db_err)?;
    let updated = stock::restock(&txn, id, input.quantity).await?;
    txn.commit().await.map_err(db_err)?;
    info!(id = %id, added = input.quantity, balance = updated.quantity, "store_restocked");
    Ok(updated)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::feeding_service::{create_feeding, FeedingInput};
    use crate::test_support::{get_db, seed_pond, seed_site, seed_store};

    #[tokio::test]
    async fn store_crud_service() -> Result<(), anyhow::Error> {
        if std::env::var("SKIP_DB_TESTS").is_ok() { return Ok(()); }
        let db = get_db().await?;
        let s = seed_site(&db).await?;

        let st = create_store(&db, StoreInput {
            site_id: s.id,
            name: "Shed 1".into(),
            feed_type: "fry powder".into(),
            unit: None,
            quantity: Some(12.34567),
            reorder_level: Some(2.0),
        }).await?;
        assert_eq!(st.unit, "kg");
        assert_eq!(st.quantity, 12.346);

        let updated = update_store(&db, st.id, StorePatch { name: Some("Shed 2".into()), quantity: Some(1.5), ..Default::default() }).await?;
        assert_eq!(updated.name, "Shed 2");
        assert_eq!(updated.quantity, 1.5);
        assert!(updated.is_low());

        let low = list_stores(&db, StoreFilter { site_id: Some(s.id), low_stock: Some(true) }, Pagination::default()).await?;
        assert_eq!(low.len(), 1);
        let ok = list_stores(&db, StoreFilter { site_id: Some(s.id), low_stock: Some(false) }, Pagination::default()).await?;
        assert!(ok.is_empty());

        assert!(delete_store(&db, st.id).await?);
        assert!(get_store(&db, st.id).await?.is_none());
        Ok(())
    }

    #[tokio::test]
    async fn store_requires_existing_site() -> Result<(), anyhow::Error> {
        if std::env::var("SKIP_DB_TESTS").is_ok() { return Ok(()); }
        let db = get_db().await?;
        let err = create_store(&db, StoreInput {
            site_id: Uuid::new_v4(),
            name: "Orphan".into(),
            feed_type: "pellet".into(),
            unit: None,
            quantity: None,
            reorder_level: None,
        }).await.unwrap_err();
        assert!(matches!(err, ServiceError::NotFound(_)));
        Ok(())
    }

    #[tokio::test]
    async fn negative_opening_balance_is_rejected() -> Result<(), anyhow::Error> {
        if std::env::var("SKIP_DB_TESTS").is_ok() { return Ok(()); }
        let db = get_db().await?;
        let s = seed_site(&db).await?;
        let err = create_store(&db, StoreInput {
            site_id: s.id,
            name: "Neg".into(),
            feed_type: "pellet".into(),
            unit: None,
            quantity: Some(-1.0),
            reorder_level: None,
        }).await.unwrap_err();
        assert!(matches!(err, ServiceError::Model(_)));
        Ok(())
    }

    #[tokio::test]
    async fn store_in_use_cannot_be_deleted() -> Result<(), anyhow::Error> {
        if std::env::var("SKIP_DB_TESTS").is_ok() { return Ok(()); }
        let db = get_db().await?;
        let s = seed_site(&db).await?;
        let pond = seed_pond(&db, s.id).await?;
        let st = seed_store(&db, s.id, 20.0).await?;
        create_feeding(&db, FeedingInput {
            lab_box_id: None,
            pond_id: Some(pond.id),
            cage_id: None,
            store_id: st.id,
            quantity: 1.0,
            fed_at: None,
            notes: None,
        }).await?;

        let err = delete_store(&db, st.id).await.unwrap_err();
        assert!(matches!(err, ServiceError::Conflict(_)));
        Ok(())
    }

    #[tokio::test]
    async fn restock_increments_balance() -> Result<(), anyhow::Error> {
        if std::env::var("SKIP_DB_TESTS").is_ok() { return Ok(()); }
        let db = get_db().await?;
        let s = seed_site(&db).await?;
        let st = seed_store(&db, s.id, 0.0).await?;
        let after = restock_store(&db, st.id, RestockInput { quantity: 250.0 }).await?;
        assert_eq!(after.quantity, 250.0);

        let missing = restock_store(&db, Uuid::new_v4(), RestockInput { quantity: 1.0 }).await.unwrap_err();
        assert!(matches!(missing, ServiceError::NotFound(_)));
        Ok(())
    }
}
