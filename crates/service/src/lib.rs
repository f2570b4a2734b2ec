//! Service layer providing business-oriented operations on top of models.
//! - Separates business logic from data access.
//! - Reuses validation and entity definitions in `models` crate.
//! - Keeps feed-store balances consistent with feeding records (`stock`).

pub mod errors;
pub mod runtime;
pub mod stock;
pub mod services;
#[cfg(test)]
pub mod test_support;

pub use common::pagination::Pagination;
