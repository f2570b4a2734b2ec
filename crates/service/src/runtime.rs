//! Runtime environment helpers
//!
//! Thin wrapper around `common::env` so binary crates can prepare the
//! working directories without depending directly on `common`.

/// Warn about a missing dashboard directory and make sure `data_dir` exists.
pub async fn ensure_env(static_dir: &str, data_dir: &str) -> anyhow::Result<()> {
    common::env::ensure_static_dir(static_dir).await;
    common::env::ensure_data_dir(data_dir).await
}
