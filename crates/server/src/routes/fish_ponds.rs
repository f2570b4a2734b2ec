use axum::{extract::State, http::StatusCode, Json};
use models::fish_pond;
use service::{
    services::fish_pond_service::{self, PondFilter, PondInput, PondPatch},
    Pagination,
};
use uuid::Uuid;

use crate::{errors::JsonApiError, extract::{ApiJson, ApiPath, ApiQuery}, events::{Action, Topic}, state::ServerState};

#[utoipa::path(
    get, path = "/fish-ponds", tag = "fish_ponds",
    params(
        ("site_id" = Option<Uuid>, Query, description = "Only ponds of this site"),
        ("status" = Option<String>, Query, description = "active, fallow or maintenance"),
        ("page" = Option<u32>, Query, description = "1-based page"),
        ("per_page" = Option<u32>, Query, description = "Page size, 1..=100")
    ),
    responses((status = 200, description = "List OK"), (status = 400, description = "Unknown status"))
)]
pub async fn list(
    State(state): State<ServerState>,
    ApiQuery(filter): ApiQuery<PondFilter>,
    ApiQuery(page): ApiQuery<Pagination>,
) -> Result<Json<Vec<fish_pond::Model>>, JsonApiError> {
    Ok(Json(fish_pond_service::list_ponds(&state.db, filter, page).await?))
}

#[utoipa::path(
    post, path = "/fish-ponds", tag = "fish_ponds",
    request_body = crate::openapi::PondInputDoc,
    responses(
        (status = 200, description = "Created"),
        (status = 400, description = "Validation Error"),
        (status = 404, description = "Site Not Found")
    )
)]
pub async fn create(State(state): State<ServerState>, ApiJson(input): ApiJson<PondInput>) -> Result<Json<fish_pond::Model>, JsonApiError> {
    let m = fish_pond_service::create_pond(&state.db, input).await?;
    state.events.publish(Topic::FishPond, Action::Created, m.id, Some(&m));
    Ok(Json(m))
}

#[utoipa::path(
    get, path = "/fish-ponds/{id}", tag = "fish_ponds",
    params(("id" = Uuid, Path, description = "Pond ID")),
    responses((status = 200, description = "OK"), (status = 404, description = "Not Found"))
)]
pub async fn get(State(state): State<ServerState>, ApiPath(id): ApiPath<Uuid>) -> Result<Json<fish_pond::Model>, JsonApiError> {
    fish_pond_service::get_pond(&state.db, id).await?
        .map(Json)
        .ok_or_else(|| JsonApiError::not_found("fish_pond"))
}

#[utoipa::path(
    put, path = "/fish-ponds/{id}", tag = "fish_ponds",
    params(("id" = Uuid, Path, description = "Pond ID")),
    request_body = crate::openapi::PondPatchDoc,
    responses(
        (status = 200, description = "Updated"),
        (status = 400, description = "Validation Error"),
        (status = 404, description = "Not Found")
    )
)]
pub async fn update(State(state): State<ServerState>, ApiPath(id): ApiPath<Uuid>, ApiJson(patch): ApiJson<PondPatch>) -> Result<Json<fish_pond::Model>, JsonApiError> {
    let m = fish_pond_service::update_pond(&state.db, id, patch).await?;
    state.events.publish(Topic::FishPond, Action::Updated, m.id, Some(&m));
    Ok(Json(m))
}

#[utoipa::path(
    delete, path = "/fish-ponds/{id}", tag = "fish_ponds",
    params(("id" = Uuid, Path, description = "Pond ID")),
    responses((status = 204, description = "Deleted with its cages and history"), (status = 404, description = "Not Found"))
)]
pub async fn delete(State(state): State<ServerState>, ApiPath(id): ApiPath<Uuid>) -> Result<StatusCode, JsonApiError> {
    if !fish_pond_service::delete_pond(&state.db, id).await? {
        return Err(JsonApiError::not_found("fish_pond"));
    }
    state.events.deleted(Topic::FishPond, id);
    Ok(StatusCode::NO_CONTENT)
}
