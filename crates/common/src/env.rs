//! Environment/runtime helpers
//!
//! Sanity checks to ensure expected directories exist at startup.

use tracing::warn;

/// Warn when the static dashboard directory is missing; the API still serves.
pub async fn ensure_static_dir(static_dir: &str) -> bool {
    if tokio::fs::metadata(static_dir).await.is_err() {
        warn!(%static_dir, "dashboard assets directory not found; static assets will 404");
        return false;
    }
    true
}

/// Ensure the local data directory exists (sqlite files live there in dev setups).
pub async fn ensure_data_dir(data_dir: &str) -> anyhow::Result<()> {
    tokio::fs::create_dir_all(data_dir)
        .await
        .map_err(|e| anyhow::anyhow!("cannot create {data_dir}: {e}"))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn missing_static_dir_is_reported() {
        assert!(!ensure_static_dir("/definitely/not/a/real/dir").await);
    }

    #[tokio::test]
    async fn data_dir_is_created() -> anyhow::Result<()> {
        let dir = std::env::temp_dir().join(format!("hatchery-data-{}", std::process::id()));
        let path = dir.to_string_lossy().to_string();
        ensure_data_dir(&path).await?;
        assert!(tokio::fs::metadata(&path).await?.is_dir());
        tokio::fs::remove_dir_all(&path).await?;
        Ok(())
    }
}
