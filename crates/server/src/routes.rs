use axum::{
    routing::{get, post},
    Json, Router,
};
use tower_http::{
    cors::CorsLayer,
    services::{ServeDir, ServeFile},
    trace::{DefaultMakeSpan, DefaultOnFailure, DefaultOnRequest, DefaultOnResponse, TraceLayer},
};
use tracing::Level;
use utoipa::OpenApi;

use common::types::Health;

use crate::{metrics, openapi::ApiDoc, state::ServerState, ws};

pub mod cages;
pub mod feedings;
pub mod fish_ponds;
pub mod lab_boxes;
pub mod medications;
pub mod sites;
pub mod stores;
pub mod water_changes;

#[utoipa::path(
    get, path = "/health", tag = "health",
    responses((status = 200, description = "OK", body = crate::openapi::HealthResponse))
)]
pub async fn health() -> Json<Health> {
    Json(Health { status: "ok" })
}

async fn metrics_text() -> (axum::http::StatusCode, String) {
    metrics::encode_metrics()
}

async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}

fn api_routes() -> Router<ServerState> {
    Router::new()
        .route("/sites", get(sites::list).post(sites::create))
        .route("/sites/:id", get(sites::get).put(sites::update).delete(sites::delete))
        .route("/sites/:id/overview", get(sites::overview))
        .route("/stores", get(stores::list).post(stores::create))
        .route("/stores/:id", get(stores::get).put(stores::update).delete(stores::delete))
        .route("/stores/:id/restock", post(stores::restock))
        .route("/lab-boxes", get(lab_boxes::list).post(lab_boxes::create))
        .route("/lab-boxes/:id", get(lab_boxes::get).put(lab_boxes::update).delete(lab_boxes::delete))
        .route("/fish-ponds", get(fish_ponds::list).post(fish_ponds::create))
        .route("/fish-ponds/:id", get(fish_ponds::get).put(fish_ponds::update).delete(fish_ponds::delete))
        .route("/cages", get(cages::list).post(cages::create))
        .route("/cages/:id", get(cages::get).put(cages::update).delete(cages::delete))
        .route("/feedings", get(feedings::list).post(feedings::create))
        .route("/feedings/:id", get(feedings::get).put(feedings::update).delete(feedings::delete))
        .route("/water-changes", get(water_changes::list).post(water_changes::create))
        .route("/water-changes/:id", get(water_changes::get).put(water_changes::update).delete(water_changes::delete))
        .route("/medications", get(medications::list).post(medications::create))
        .route("/medications/:id", get(medications::get).put(medications::update).delete(medications::delete))
        .route("/ws", get(ws::handler))
}

/// Build the full application router: JSON API, live updates, docs and the dashboard fallback
pub fn build_router(state: ServerState, cors: CorsLayer, static_dir: &str) -> Router {
    let dashboard = ServeDir::new(static_dir)
        .fallback(ServeFile::new(format!("{}/index.html", static_dir.trim_end_matches('/'))));

    Router::new()
        .route("/health", get(health))
        .route("/metrics", get(metrics_text))
        .route("/api-docs/openapi.json", get(openapi_json))
        .merge(api_routes())
        .fallback_service(dashboard)
        .with_state(state)
        .layer(cors)
        .layer(
            TraceLayer::new_for_http()
                // 每次请求创建 span，包含方法和路径等，日志级别为 INFO
                .make_span_with(
                    DefaultMakeSpan::new()
                        .level(Level::INFO)
                        .include_headers(false),
                )
                .on_request(
                    DefaultOnRequest::new()
                        .level(Level::INFO),
                )
                // 响应返回时打点，包含状态码与耗时
                .on_response(
                    DefaultOnResponse::new()
                        .level(Level::INFO)
                        .include_headers(false),
                )
                .on_failure(
                    DefaultOnFailure::new()
                        .level(Level::ERROR),
                )
        )
}
