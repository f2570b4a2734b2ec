use axum::{extract::State, http::StatusCode, Json};
use models::cage;
use service::{
    services::cage_service::{self, CageFilter, CageInput, CagePatch},
    Pagination,
};
use uuid::Uuid;

use crate::{errors::JsonApiError, extract::{ApiJson, ApiPath, ApiQuery}, events::{Action, Topic}, state::ServerState};

#[utoipa::path(
    get, path = "/cages", tag = "cages",
    params(
        ("pond_id" = Option<Uuid>, Query, description = "Only cages in this pond"),
        ("page" = Option<u32>, Query, description = "1-based page"),
        ("per_page" = Option<u32>, Query, description = "Page size, 1..=100")
    ),
    responses((status = 200, description = "List OK"))
)]
pub async fn list(
    State(state): State<ServerState>,
    ApiQuery(filter): ApiQuery<CageFilter>,
    ApiQuery(page): ApiQuery<Pagination>,
) -> Result<Json<Vec<cage::Model>>, JsonApiError> {
    Ok(Json(cage_service::list_cages(&state.db, filter, page).await?))
}

#[utoipa::path(
    post, path = "/cages", tag = "cages",
    request_body = crate::openapi::CageInputDoc,
    responses(
        (status = 200, description = "Created"),
        (status = 400, description = "Validation Error"),
        (status = 404, description = "Pond Not Found")
    )
)]
pub async fn create(State(state): State<ServerState>, ApiJson(input): ApiJson<CageInput>) -> Result<Json<cage::Model>, JsonApiError> {
    let m = cage_service::create_cage(&state.db, input).await?;
    state.events.publish(Topic::Cage, Action::Created, m.id, Some(&m));
    Ok(Json(m))
}

#[utoipa::path(
    get, path = "/cages/{id}", tag = "cages",
    params(("id" = Uuid, Path, description = "Cage ID")),
    responses((status = 200, description = "OK"), (status = 404, description = "Not Found"))
)]
pub async fn get(State(state): State<ServerState>, ApiPath(id): ApiPath<Uuid>) -> Result<Json<cage::Model>, JsonApiError> {
    cage_service::get_cage(&state.db, id).await?
        .map(Json)
        .ok_or_else(|| JsonApiError::not_found("cage"))
}

#[utoipa::path(
    put, path = "/cages/{id}", tag = "cages",
    params(("id" = Uuid, Path, description = "Cage ID")),
    request_body = crate::openapi::CagePatchDoc,
    responses(
        (status = 200, description = "Updated"),
        (status = 400, description = "Validation Error"),
        (status = 404, description = "Not Found")
    )
)]
pub async fn update(State(state): State<ServerState>, ApiPath(id): ApiPath<Uuid>, ApiJson(patch): ApiJson<CagePatch>) -> Result<Json<cage::Model>, JsonApiError> {
    let m = cage_service::update_cage(&state.db, id, patch).await?;
    state.events.publish(Topic::Cage, Action::Updated, m.id, Some(&m));
    Ok(Json(m))
}

#[utoipa::path(
    delete, path = "/cages/{id}", tag = "cages",
    params(("id" = Uuid, Path, description = "Cage ID")),
    responses((status = 204, description = "Deleted"), (status = 404, description = "Not Found"))
)]
pub async fn delete(State(state): State<ServerState>, ApiPath(id): ApiPath<Uuid>) -> Result<StatusCode, JsonApiError> {
    if !cage_service::delete_cage(&state.db, id).await? {
        return Err(JsonApiError::not_found("cage"));
    }
    state.events.deleted(Topic::Cage, id);
    Ok(StatusCode::NO_CONTENT)
}
