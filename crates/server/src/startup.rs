use std::net::SocketAddr;

use axum::Router;
use configs::AppConfig;
use migration::MigratorTrait;
use tower_http::cors::CorsLayer;
use tracing::{info, warn};

use crate::{
    errors::StartupError,
    events::EventHub,
    metrics,
    routes,
    state::ServerState,
};

fn build_cors() -> CorsLayer {
    CorsLayer::very_permissive()
}

/// Connect, migrate and assemble the router for `cfg`.
pub async fn build_app(cfg: &AppConfig) -> Result<Router, StartupError> {
    service::runtime::ensure_env(&cfg.server.static_dir, "data")
        .await
        .map_err(|e| StartupError::Runtime(e.to_string()))?;

    let db = models::db::connect_with_config(&cfg.database)
        .await
        .map_err(|e| StartupError::Database(e.to_string()))?;
    if cfg.database.auto_migrate {
        migration::Migrator::up(&db, None)
            .await
            .map_err(|e| StartupError::Database(format!("migration failed: {e}")))?;
        info!("database migrations applied");
    } else {
        warn!("auto_migrate disabled; expecting an up-to-date schema");
    }

    let state = ServerState::new(db, EventHub::new(cfg.events.channel_capacity));
    Ok(routes::build_router(state, build_cors(), &cfg.server.static_dir))
}

/// Public entry: build the app for an already loaded config and serve it
pub async fn run(cfg: AppConfig) -> anyhow::Result<()> {
    let app = build_app(&cfg).await?;

    if let Some(admin_addr) = cfg.server.admin_addr.as_deref() {
        common::admin_http::spawn_admin_server(admin_addr, metrics::encode_metrics);
    }

    let addr: SocketAddr = cfg
        .server
        .bind_addr()
        .parse()
        .map_err(|e| StartupError::InvalidConfig(format!("bind address: {e}")))?;
    info!(%addr, static_dir = %cfg.server.static_dir, "starting hatchery server");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn run_serves_the_config_it_is_given() -> anyhow::Result<()> {
        if std::env::var("SKIP_DB_TESTS").is_ok() { return Ok(()); }
        let mut cfg = AppConfig::default();
        cfg.database.url = "sqlite::memory:".into();
        cfg.server.static_dir = "/nonexistent-dashboard".into();
        cfg.server.host = "not a host".into();

        // the app builds from `cfg`; only its unusable bind address stops the server
        let err = match run(cfg).await {
            Ok(()) => anyhow::bail!("server started on an invalid address"),
            Err(e) => e,
        };
        assert!(err.to_string().contains("bind address"), "{err}");
        Ok(())
    }
}
