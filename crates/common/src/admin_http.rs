//! Lightweight admin HTTP server spawner
//!
//! Exposes `/healthz` and `/metrics` endpoints, with metrics provided by caller.

use axum::http::StatusCode;
use axum::{routing::get, Router};
use tokio::net::TcpListener;
use tracing::{error, info};

async fn healthz() -> &'static str { "OK" }

/// Spawn an admin HTTP server exposing healthz and metrics endpoints
/// on the current tokio runtime. The metrics are provided by the caller.
pub fn spawn_admin_server(addr: &str, metrics_fn: fn() -> (StatusCode, String)) -> tokio::task::JoinHandle<()> {
    let addr = addr.to_string();
    tokio::spawn(async move {
        let router = Router::new()
            .route("/healthz", get(healthz))
            .route("/metrics", get(move || async move { metrics_fn() }));
        let listener = match TcpListener::bind(&addr).await {
            Ok(l) => l,
            Err(e) => {
                error!(%addr, error = %e, "admin server bind failed");
                return;
            }
        };
        info!(%addr, "admin server listening");
        if let Err(e) = axum::serve(listener, router).await {
            error!(%addr, error = %e, "admin server stopped");
        }
    })
}
