//! Feed-stock ledger.
//!
//! Every feeding record draws its `quantity` from one store. Creating a record
//! debits the store, deleting it credits the store back, and editing it applies
//! the difference (or moves the draw to another store). The balance lives in
//! `store.quantity`; it never goes below zero.
//!
//! Planning is pure (`plan_adjustments`) so the arithmetic can be tested on its
//! own. Applying runs inside the caller's transaction: each adjustment is a single
//! guarded `UPDATE ... WHERE quantity >= -delta`, so two concurrent feedings can
//! not both spend the last bag.

use chrono::Utc;
use models::{store, validate::round_quantity};
use sea_orm::{
    sea_query::Expr, ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, IntoActiveModel,
    QueryFilter, Set,
};
use serde::Serialize;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::errors::{db_err, ServiceError};

/// What a feeding record takes out of a store.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct StockLine {
    pub store_id: Uuid,
    pub quantity: f64,
}

/// Signed change to one store's balance. Negative values consume stock.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct Adjustment {
    pub store_id: Uuid,
    pub delta: f64,
}

impl Adjustment {
    fn debit(line: StockLine) -> Self {
        Self { store_id: line.store_id, delta: -line.quantity }
    }

    fn credit(line: StockLine) -> Self {
        Self { store_id: line.store_id, delta: line.quantity }
    }
}

/// Adjustments that turn the `previous` draw into the `next` one.
///
/// Credits come before debits so that moving a record between stores never
/// fails on the store being credited.
pub fn plan_adjustments(previous: Option<StockLine>, next: Option<StockLine>) -> Vec<Adjustment> {
    match (previous, next) {
        (None, None) => Vec::new(),
        (None, Some(n)) => vec![Adjustment::debit(n)],
        (Some(p), None) => vec![Adjustment::credit(p)],
        (Some(p), Some(n)) if p.store_id == n.store_id => {
            let delta = round_quantity(p.quantity - n.quantity);
            if delta == 0.0 {
                Vec::new()
            } else {
                vec![Adjustment { store_id: p.store_id, delta }]
            }
        }
        (Some(p), Some(n)) => vec![Adjustment::credit(p), Adjustment::debit(n)],
    }
}

/// Apply `adjustments` in order and return the resulting store rows.
///
/// Must run inside a transaction: an error part-way leaves earlier updates for
/// the caller's rollback.
pub async fn apply_adjustments<C: ConnectionTrait>(conn: &C, adjustments: &[Adjustment]) -> Result<Vec<store::Model>, ServiceError> {
    let mut touched = Vec::with_capacity(adjustments.len());
    for adj in adjustments {
        touched.push(apply_one(conn, *adj).await?);
    }
    Ok(touched)
}

async fn apply_one<C: ConnectionTrait>(conn: &C, adj: Adjustment) -> Result<store::Model, ServiceError> {
    let res = store::Entity::update_many()
        .col_expr(store::Column::Quantity, Expr::col(store::Column::Quantity).add(adj.delta))
        .col_expr(store::Column::UpdatedAt, Expr::value(chrono::DateTime::<chrono::FixedOffset>::from(Utc::now())))
        .filter(store::Column::Id.eq(adj.store_id))
        .filter(store::Column::Quantity.gte(-adj.delta))
        .exec(conn)
        .await
        .map_err(db_err)?;

    let current = store::Entity::find_by_id(adj.store_id)
        .one(conn)
        .await
        .map_err(db_err)?
        .ok_or_else(|| ServiceError::not_found("store"))?;

    if res.rows_affected == 0 {
        warn!(store_id = %adj.store_id, available = current.quantity, requested = -adj.delta, "stock_adjustment_rejected");
        return Err(ServiceError::InsufficientStock {
            store_id: adj.store_id,
            available: current.quantity,
            requested: -adj.delta,
        });
    }

    // 浮点累加误差：统一回写到克级精度
    let rounded = round_quantity(current.quantity);
    let current = if rounded != current.quantity {
        let mut am = current.into_active_model();
        am.quantity = Set(rounded);
        am.update(conn).await.map_err(db_err)?
    } else {
        current
    };

    debug!(store_id = %adj.store_id, delta = adj.delta, balance = current.quantity, "stock_adjusted");
    Ok(current)
}

/// Add delivered feed to a store.
pub async fn restock<C: ConnectionTrait>(conn: &C, store_id: Uuid, quantity: f64) -> Result<store::Model, ServiceError> {
    let quantity = round_quantity(models::validate::positive("quantity", quantity)?);
    if quantity == 0.0 {
        return Err(ServiceError::Validation("quantity must be at least 0.001".into()));
    }
    apply_one(conn, Adjustment { store_id, delta: quantity }).await
}
