use axum::{extract::State, http::StatusCode, Json};
use models::lab_box;
use service::{
    services::lab_box_service::{self, LabBoxFilter, LabBoxInput, LabBoxPatch},
    Pagination,
};
use uuid::Uuid;

use crate::{errors::JsonApiError, extract::{ApiJson, ApiPath, ApiQuery}, events::{Action, Topic}, state::ServerState};

#[utoipa::path(
    get, path = "/lab-boxes", tag = "lab_boxes",
    params(
        ("site_id" = Option<Uuid>, Query, description = "Only boxes of this site"),
        ("stage" = Option<String>, Query, description = "egg, larva, fry or empty"),
        ("page" = Option<u32>, Query, description = "1-based page"),
        ("per_page" = Option<u32>, Query, description = "Page size, 1..=100")
    ),
    responses((status = 200, description = "List OK"), (status = 400, description = "Unknown stage"))
)]
pub async fn list(
    State(state): State<ServerState>,
    ApiQuery(filter): ApiQuery<LabBoxFilter>,
    ApiQuery(page): ApiQuery<Pagination>,
) -> Result<Json<Vec<lab_box::Model>>, JsonApiError> {
    Ok(Json(lab_box_service::list_lab_boxes(&state.db, filter, page).await?))
}

#[utoipa::path(
    post, path = "/lab-boxes", tag = "lab_boxes",
    request_body = crate::openapi::LabBoxInputDoc,
    responses(
        (status = 200, description = "Created"),
        (status = 400, description = "Validation Error"),
        (status = 404, description = "Site Not Found"),
        (status = 409, description = "Code already used at this site")
    )
)]
pub async fn create(State(state): State<ServerState>, ApiJson(input): ApiJson<LabBoxInput>) -> Result<Json<lab_box::Model>, JsonApiError> {
    let m = lab_box_service::create_lab_box(&state.db, input).await?;
    state.events.publish(Topic::LabBox, Action::Created, m.id, Some(&m));
    Ok(Json(m))
}

#[utoipa::path(
    get, path = "/lab-boxes/{id}", tag = "lab_boxes",
    params(("id" = Uuid, Path, description = "Lab box ID")),
    responses((status = 200, description = "OK"), (status = 404, description = "Not Found"))
)]
pub async fn get(State(state): State<ServerState>, ApiPath(id): ApiPath<Uuid>) -> Result<Json<lab_box::Model>, JsonApiError> {
    lab_box_service::get_lab_box(&state.db, id).await?
        .map(Json)
        .ok_or_else(|| JsonApiError::not_found("lab_box"))
}

#[utoipa::path(
    put, path = "/lab-boxes/{id}", tag = "lab_boxes",
    params(("id" = Uuid, Path, description = "Lab box ID")),
    request_body = crate::openapi::LabBoxPatchDoc,
    responses(
        (status = 200, description = "Updated"),
        (status = 400, description = "Validation Error"),
        (status = 404, description = "Not Found"),
        (status = 409, description = "Code already used at this site")
    )
)]
pub async fn update(State(state): State<ServerState>, ApiPath(id): ApiPath<Uuid>, ApiJson(patch): ApiJson<LabBoxPatch>) -> Result<Json<lab_box::Model>, JsonApiError> {
    let m = lab_box_service::update_lab_box(&state.db, id, patch).await?;
    state.events.publish(Topic::LabBox, Action::Updated, m.id, Some(&m));
    Ok(Json(m))
}

#[utoipa::path(
    delete, path = "/lab-boxes/{id}", tag = "lab_boxes",
    params(("id" = Uuid, Path, description = "Lab box ID")),
    responses((status = 204, description = "Deleted"), (status = 404, description = "Not Found"))
)]
pub async fn delete(State(state): State<ServerState>, ApiPath(id): ApiPath<Uuid>) -> Result<StatusCode, JsonApiError> {
    if !lab_box_service::delete_lab_box(&state.db, id).await? {
        return Err(JsonApiError::not_found("lab_box"));
    }
    state.events.deleted(Topic::LabBox, id);
    Ok(StatusCode::NO_CONTENT)
}
