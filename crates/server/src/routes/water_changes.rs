use axum::{extract::State, http::StatusCode, Json};
use models::water_change;
use service::{
    services::water_change_service::{self, WaterChangeFilter, WaterChangeInput, WaterChangePatch},
    Pagination,
};
use uuid::Uuid;

use crate::{errors::JsonApiError, extract::{ApiJson, ApiPath, ApiQuery}, events::{Action, Topic}, state::ServerState};

#[utoipa::path(
    get, path = "/water-changes", tag = "water_changes",
    params(
        ("lab_box_id" = Option<Uuid>, Query, description = "Only changes of this lab box"),
        ("pond_id" = Option<Uuid>, Query, description = "Only changes of this pond"),
        ("page" = Option<u32>, Query, description = "1-based page"),
        ("per_page" = Option<u32>, Query, description = "Page size, 1..=100")
    ),
    responses((status = 200, description = "List OK, newest first"))
)]
pub async fn list(
    State(state): State<ServerState>,
    ApiQuery(filter): ApiQuery<WaterChangeFilter>,
    ApiQuery(page): ApiQuery<Pagination>,
) -> Result<Json<Vec<water_change::Model>>, JsonApiError> {
    Ok(Json(water_change_service::list_water_changes(&state.db, filter, page).await?))
}

#[utoipa::path(
    post, path = "/water-changes", tag = "water_changes",
    request_body = crate::openapi::WaterChangeInputDoc,
    responses(
        (status = 200, description = "Recorded"),
        (status = 400, description = "Validation Error"),
        (status = 404, description = "Target Not Found")
    )
)]
pub async fn create(State(state): State<ServerState>, ApiJson(input): ApiJson<WaterChangeInput>) -> Result<Json<water_change::Model>, JsonApiError> {
    let m = water_change_service::create_water_change(&state.db, input).await?;
    state.events.publish(Topic::WaterChange, Action::Created, m.id, Some(&m));
    Ok(Json(m))
}

#[utoipa::path(
    get, path = "/water-changes/{id}", tag = "water_changes",
    params(("id" = Uuid, Path, description = "Water change ID")),
    responses((status = 200, description = "OK"), (status = 404, description = "Not Found"))
)]
pub async fn get(State(state): State<ServerState>, ApiPath(id): ApiPath<Uuid>) -> Result<Json<water_change::Model>, JsonApiError> {
    water_change_service::get_water_change(&state.db, id).await?
        .map(Json)
        .ok_or_else(|| JsonApiError::not_found("water_change"))
}

#[utoipa::path(
    put, path = "/water-changes/{id}", tag = "water_changes",
    params(("id" = Uuid, Path, description = "Water change ID")),
    request_body = crate::openapi::WaterChangePatchDoc,
    responses(
        (status = 200, description = "Updated"),
        (status = 400, description = "Validation Error"),
        (status = 404, description = "Not Found")
    )
)]
pub async fn update(State(state): State<ServerState>, ApiPath(id): ApiPath<Uuid>, ApiJson(patch): ApiJson<WaterChangePatch>) -> Result<Json<water_change::Model>, JsonApiError> {
    let m = water_change_service::update_water_change(&state.db, id, patch).await?;
    state.events.publish(Topic::WaterChange, Action::Updated, m.id, Some(&m));
    Ok(Json(m))
}

#[utoipa::path(
    delete, path = "/water-changes/{id}", tag = "water_changes",
    params(("id" = Uuid, Path, description = "Water change ID")),
    responses((status = 204, description = "Deleted"), (status = 404, description = "Not Found"))
)]
pub async fn delete(State(state): State<ServerState>, ApiPath(id): ApiPath<Uuid>) -> Result<StatusCode, JsonApiError> {
    if !water_change_service::delete_water_change(&state.db, id).await? {
        return Err(JsonApiError::not_found("water_change"));
    }
    state.events.deleted(Topic::WaterChange, id);
    Ok(StatusCode::NO_CONTENT)
}
