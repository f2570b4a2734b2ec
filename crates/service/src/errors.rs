use sea_orm::{DbErr, SqlErr};
use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("validation error: {0}")]
    Validation(String),
    #[error("not found: {0}")]
    NotFound(String),
    #[error("conflict: {0}")]
    Conflict(String),
    #[error("insufficient stock in store {store_id}: available {available}, requested {requested}")]
    InsufficientStock { store_id: Uuid, available: f64, requested: f64 },
    #[error("database error: {0}")]
    Db(String),
    #[error("model error: {0}")]
    Model(#[from] models::errors::ModelError),
}

impl ServiceError {
    pub fn not_found(entity: &str) -> Self { Self::NotFound(format!("{} not found", entity)) }

    /// True for errors caused by the request rather than the backend.
    pub fn is_client_error(&self) -> bool {
        !matches!(self, ServiceError::Db(_) | ServiceError::Model(models::errors::ModelError::Db(_)))
    }
}

/// Constraint violations become `Conflict`; everything else is a backend failure.
pub(crate) fn db_err(e: DbErr) -> ServiceError {
    match e.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(msg)) => ServiceError::Conflict(format!("duplicate value: {msg}")),
        Some(SqlErr::ForeignKeyConstraintViolation(msg)) => ServiceError::Conflict(format!("referenced record: {msg}")),
        _ => ServiceError::Db(e.to_string()),
    }
}
