//! Shared building blocks for the hatchery workspace: logging setup,
//! startup environment checks, pagination and small response types.

pub mod types;
pub mod utils;
pub mod pagination;
pub mod env;
pub mod admin_http;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn health_type_ok() {
        let h = types::Health { status: "ok" };
        assert_eq!(h.status, "ok");
    }
}
