//! Feeding records and the stock they draw.
//!
//! Every mutation runs in one transaction together with its ledger
//! adjustments (see [`crate::stock`]); a rejected debit leaves neither the
//! record nor any store balance changed.

use chrono::{DateTime, FixedOffset, Utc};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, IntoActiveModel,
    PaginatorTrait, QueryFilter, QueryOrder, Set, TransactionTrait,
};
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use common::pagination::Pagination;
use models::{feeding, store, target::Target, validate};

use crate::errors::{db_err, ServiceError};
use crate::services::targets::ensure_target_exists;
use crate::stock::{apply_adjustments, plan_adjustments, StockLine};

#[derive(Clone, Debug, Deserialize)]
pub struct FeedingInput {
    #[serde(default)]
    pub lab_box_id: Option<Uuid>,
    #[serde(default)]
    pub pond_id: Option<Uuid>,
    #[serde(default)]
    pub cage_id: Option<Uuid>,
    pub store_id: Uuid,
    pub quantity: f64,
    /// Defaults to now
    #[serde(default)]
    pub fed_at: Option<DateTime<FixedOffset>>,
    #[serde(default)]
    pub notes: Option<String>,
}

/// The fed target is fixed once recorded; store and quantity may change.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct FeedingPatch {
    pub store_id: Option<Uuid>,
    pub quantity: Option<f64>,
    pub fed_at: Option<DateTime<FixedOffset>>,
    pub notes: Option<String>,
}

#[derive(Clone, Copy, Debug, Default, Deserialize)]
pub struct FeedingFilter {
    pub lab_box_id: Option<Uuid>,
    pub pond_id: Option<Uuid>,
    pub cage_id: Option<Uuid>,
    pub store_id: Option<Uuid>,
}

/// A feeding mutation together with the store rows it changed.
#[derive(Clone, Debug, Serialize)]
pub struct FeedingOutcome {
    pub feeding: feeding::Model,
    pub stores: Vec<store::Model>,
}

fn line_of(f: &feeding::Model) -> StockLine {
    StockLine { store_id: f.store_id, quantity: f.quantity }
}

/// Record a feeding and debit its store.
pub async fn create_feeding(db: &DatabaseConnection, input: FeedingInput) -> Result<FeedingOutcome, ServiceError> {
    let target = Target::from_columns(input.lab_box_id, input.pond_id, input.cage_id)?;
    let quantity = feeding::validate_quantity(input.quantity)?;
    let notes = validate::optional_text("notes", input.notes.as_deref(), 1000)?;

    ensure_target_exists(db, target).await?;

    // the debit must be the transaction's first statement: a sqlite transaction
    // that has already read cannot wait for the write lock and fails as busy
    let txn = db.begin().await.map_err(db_err)?;
    let plan = plan_adjustments(None, Some(StockLine { store_id: input.store_id, quantity }));
    let stores = apply_adjustments(&txn, &plan).await?;

    let (lab_box_id, pond_id, cage_id) = target.columns();
    let now: DateTime<FixedOffset> = Utc::now().into();
    let am = feeding::ActiveModel {
        id: Set(Uuid::new_v4()),
        lab_box_id: Set(lab_box_id),
        pond_id: Set(pond_id),
        cage_id: Set(cage_id),
        store_id: Set(input.store_id),
        quantity: Set(quantity),
        fed_at: Set(input.fed_at.unwrap_or(now)),
        notes: Set(notes),
        created_at: Set(now),
        updated_at: Set(now),
    };
    let created = am.insert(&txn).await.map_err(db_err)?;
    txn.commit().await.map_err(db_err)?;

    info!(id = %created.id, target = target.kind(), store_id = %created.store_id, quantity = created.quantity, "feeding_recorded");
    Ok(FeedingOutcome { feeding: created, stores })
}

/// Get feeding by id.
pub async fn get_feeding(db: &DatabaseConnection, id: Uuid) -> Result<Option<feeding::Model>, ServiceError> {
    feeding::Entity::find_by_id(id).one(db).await.map_err(db_err)
}

/// Edit a feeding; the store balance follows the change in quantity or store.
pub async fn update_feeding(db: &DatabaseConnection, id: Uuid, patch: FeedingPatch) -> Result<FeedingOutcome, ServiceError> {
    let quantity = patch.quantity.map(feeding::validate_quantity).transpose()?;
    let notes = match patch.notes.as_deref() {
        Some(n) => Some(validate::optional_text("notes", Some(n), 1000)?),
        None => None,
    };

    let txn = db.begin().await.map_err(db_err)?;
    let existing = feeding::Entity::find_by_id(id)
        .one(&txn).await.map_err(db_err)?
        .ok_or_else(|| ServiceError::not_found("feeding"))?;

    let previous = line_of(&existing);
    let next = StockLine {
        store_id: patch.store_id.unwrap_or(existing.store_id),
        quantity: quantity.unwrap_or(existing.quantity),
    };
    let stores = apply_adjustments(&txn, &plan_adjustments(Some(previous), Some(next))).await?;

    let mut am = existing.into_active_model();
    am.store_id = Set(next.store_id);
    am.quantity = Set(next.quantity);
    if let Some(at) = patch.fed_at { am.fed_at = Set(at); }
    if let Some(n) = notes { am.notes = Set(n); }
    am.updated_at = Set(Utc::now().into());
    let updated = am.update(&txn).await.map_err(db_err)?;
    txn.commit().await.map_err(db_err)?;

    info!(id = %updated.id, store_id = %updated.store_id, quantity = updated.quantity, "feeding_updated");
    Ok(FeedingOutcome { feeding: updated, stores })
}

/// Delete a feeding and return its quantity to the store.
///
/// `None` when no such record exists.
pub async fn delete_feeding(db: &DatabaseConnection, id: Uuid) -> Result<Option<FeedingOutcome>, ServiceError> {
    let txn = db.begin().await.map_err(db_err)?;
    let Some(existing) = feeding::Entity::find_by_id(id).one(&txn).await.map_err(db_err)? else {
        return Ok(None);
    };
    let stores = apply_adjustments(&txn, &plan_adjustments(Some(line_of(&existing)), None)).await?;
    feeding::Entity::delete_by_id(id).exec(&txn).await.map_err(db_err)?;
    txn.commit().await.map_err(db_err)?;

    info!(id = %existing.id, store_id = %existing.store_id, quantity = existing.quantity, "feeding_deleted");
    Ok(Some(FeedingOutcome { feeding: existing, stores }))
}

/// List feedings, newest first.
pub async fn list_feedings(db: &DatabaseConnection, filter: FeedingFilter, opts: Pagination) -> Result<Vec<feeding::Model>, ServiceError> {
    let (page_idx, per_page) = opts.normalize();
    let mut select = feeding::Entity::find();
    if let Some(v) = filter.lab_box_id { select = select.filter(feeding::Column::LabBoxId.eq(v)); }
    if let Some(v) = filter.pond_id { select = select.filter(feeding::Column::PondId.eq(v)); }
    if let Some(v) = filter.cage_id { select = select.filter(feeding::Column::CageId.eq(v)); }
    if let Some(v) = filter.store_id { select = select.filter(feeding::Column::StoreId.eq(v)); }
    select
        .order_by_desc(feeding::Column::FedAt)
        .order_by_desc(feeding::Column::CreatedAt)
        .paginate(db, per_page)
        .fetch_page(page_idx)
        .await
        .map_err(db_err)
}
