//! Feeding records. Each mutation answers with the record and the store rows
//! whose balance it moved, and announces both on the event hub.

use axum::{extract::State, http::StatusCode, Json};
use models::feeding;
use service::{
    services::feeding_service::{self, FeedingFilter, FeedingInput, FeedingOutcome, FeedingPatch},
    Pagination,
};
use tracing::info;
use uuid::Uuid;

use crate::{
    errors::JsonApiError,
    extract::{ApiJson, ApiPath, ApiQuery},
    events::{Action, EventHub, Topic},
    metrics::{FEEDINGS_RECORDED_TOTAL, FEED_DISPATCHED_TOTAL},
    state::ServerState,
};

fn announce(events: &EventHub, action: Action, outcome: &FeedingOutcome) {
    match action {
        Action::Deleted => { events.deleted(Topic::Feeding, outcome.feeding.id); }
        _ => { events.publish(Topic::Feeding, action, outcome.feeding.id, Some(&outcome.feeding)); }
    }
    for s in &outcome.stores {
        events.store_changed(Action::Updated, s);
    }
}

#[utoipa::path(
    get, path = "/feedings", tag = "feedings",
    params(
        ("lab_box_id" = Option<Uuid>, Query, description = "Only feedings of this lab box"),
        ("pond_id" = Option<Uuid>, Query, description = "Only feedings of this pond"),
        ("cage_id" = Option<Uuid>, Query, description = "Only feedings of this cage"),
        ("store_id" = Option<Uuid>, Query, description = "Only feedings drawn from this store"),
        ("page" = Option<u32>, Query, description = "1-based page"),
        ("per_page" = Option<u32>, Query, description = "Page size, 1..=100")
    ),
    responses((status = 200, description = "List OK, newest first"))
)]
pub async fn list(
    State(state): State<ServerState>,
    ApiQuery(filter): ApiQuery<FeedingFilter>,
    ApiQuery(page): ApiQuery<Pagination>,
) -> Result<Json<Vec<feeding::Model>>, JsonApiError> {
    Ok(Json(feeding_service::list_feedings(&state.db, filter, page).await?))
}

#[utoipa::path(
    post, path = "/feedings", tag = "feedings",
    request_body = crate::openapi::FeedingInputDoc,
    responses(
        (status = 200, description = "Recorded; body holds the feeding and the debited store"),
        (status = 400, description = "Validation Error"),
        (status = 404, description = "Target or store Not Found"),
        (status = 409, description = "Insufficient Stock")
    )
)]
pub async fn create(State(state): State<ServerState>, ApiJson(input): ApiJson<FeedingInput>) -> Result<Json<FeedingOutcome>, JsonApiError> {
    let outcome = feeding_service::create_feeding(&state.db, input).await?;
    FEEDINGS_RECORDED_TOTAL.inc();
    FEED_DISPATCHED_TOTAL.inc_by(outcome.feeding.quantity);
    announce(&state.events, Action::Created, &outcome);
    Ok(Json(outcome))
}

#[utoipa::path(
    get, path = "/feedings/{id}", tag = "feedings",
    params(("id" = Uuid, Path, description = "Feeding ID")),
    responses((status = 200, description = "OK"), (status = 404, description = "Not Found"))
)]
pub async fn get(State(state): State<ServerState>, ApiPath(id): ApiPath<Uuid>) -> Result<Json<feeding::Model>, JsonApiError> {
    feeding_service::get_feeding(&state.db, id).await?
        .map(Json)
        .ok_or_else(|| JsonApiError::not_found("feeding"))
}

#[utoipa::path(
    put, path = "/feedings/{id}", tag = "feedings",
    params(("id" = Uuid, Path, description = "Feeding ID")),
    request_body = crate::openapi::FeedingPatchDoc,
    responses(
        (status = 200, description = "Updated; body holds the feeding and every store it moved"),
        (status = 400, description = "Validation Error"),
        (status = 404, description = "Not Found"),
        (status = 409, description = "Insufficient Stock")
    )
)]
pub async fn update(State(state): State<ServerState>, ApiPath(id): ApiPath<Uuid>, ApiJson(patch): ApiJson<FeedingPatch>) -> Result<Json<FeedingOutcome>, JsonApiError> {
    let outcome = feeding_service::update_feeding(&state.db, id, patch).await?;
    announce(&state.events, Action::Updated, &outcome);
    Ok(Json(outcome))
}

#[utoipa::path(
    delete, path = "/feedings/{id}", tag = "feedings",
    params(("id" = Uuid, Path, description = "Feeding ID")),
    responses((status = 204, description = "Deleted; quantity returned to the store"), (status = 404, description = "Not Found"))
)]
pub async fn delete(State(state): State<ServerState>, ApiPath(id): ApiPath<Uuid>) -> Result<StatusCode, JsonApiError> {
    let outcome = feeding_service::delete_feeding(&state.db, id).await?
        .ok_or_else(|| JsonApiError::not_found("feeding"))?;
    info!(%id, restored = outcome.feeding.quantity, "feeding_deleted_stock_restored");
    announce(&state.events, Action::Deleted, &outcome);
    Ok(StatusCode::NO_CONTENT)
}
