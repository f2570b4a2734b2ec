use axum::{extract::State, http::StatusCode, Json};
use models::medication;
use service::{
    services::medication_service::{self, MedicationFilter, MedicationInput, MedicationPatch},
    Pagination,
};
use uuid::Uuid;

use crate::{errors::JsonApiError, extract::{ApiJson, ApiPath, ApiQuery}, events::{Action, Topic}, state::ServerState};

#[utoipa::path(
    get, path = "/medications", tag = "medications",
    params(
        ("lab_box_id" = Option<Uuid>, Query, description = "Only treatments of this lab box"),
        ("pond_id" = Option<Uuid>, Query, description = "Only treatments of this pond"),
        ("cage_id" = Option<Uuid>, Query, description = "Only treatments of this cage"),
        ("page" = Option<u32>, Query, description = "1-based page"),
        ("per_page" = Option<u32>, Query, description = "Page size, 1..=100")
    ),
    responses((status = 200, description = "List OK, newest first"))
)]
pub async fn list(
    State(state): State<ServerState>,
    ApiQuery(filter): ApiQuery<MedicationFilter>,
    ApiQuery(page): ApiQuery<Pagination>,
) -> Result<Json<Vec<medication::Model>>, JsonApiError> {
    Ok(Json(medication_service::list_medications(&state.db, filter, page).await?))
}

#[utoipa::path(
    post, path = "/medications", tag = "medications",
    request_body = crate::openapi::MedicationInputDoc,
    responses(
        (status = 200, description = "Recorded"),
        (status = 400, description = "Validation Error"),
        (status = 404, description = "Target Not Found")
    )
)]
pub async fn create(State(state): State<ServerState>, ApiJson(input): ApiJson<MedicationInput>) -> Result<Json<medication::Model>, JsonApiError> {
    let m = medication_service::create_medication(&state.db, input).await?;
    state.events.publish(Topic::Medication, Action::Created, m.id, Some(&m));
    Ok(Json(m))
}

#[utoipa::path(
    get, path = "/medications/{id}", tag = "medications",
    params(("id" = Uuid, Path, description = "Medication ID")),
    responses((status = 200, description = "OK"), (status = 404, description = "Not Found"))
)]
pub async fn get(State(state): State<ServerState>, ApiPath(id): ApiPath<Uuid>) -> Result<Json<medication::Model>, JsonApiError> {
    medication_service::get_medication(&state.db, id).await?
        .map(Json)
        .ok_or_else(|| JsonApiError::not_found("medication"))
}

#[utoipa::path(
    put, path = "/medications/{id}", tag = "medications",
    params(("id" = Uuid, Path, description = "Medication ID")),
    request_body = crate::openapi::MedicationPatchDoc,
    responses(
        (status = 200, description = "Updated"),
        (status = 400, description = "Validation Error"),
        (status = 404, description = "Not Found")
    )
)]
pub async fn update(State(state): State<ServerState>, ApiPath(id): ApiPath<Uuid>, ApiJson(patch): ApiJson<MedicationPatch>) -> Result<Json<medication::Model>, JsonApiError> {
    let m = medication_service::update_medication(&state.db, id, patch).await?;
    state.events.publish(Topic::Medication, Action::Updated, m.id, Some(&m));
    Ok(Json(m))
}

#[utoipa::path(
    delete, path = "/medications/{id}", tag = "medications",
    params(("id" = Uuid, Path, description = "Medication ID")),
    responses((status = 204, description = "Deleted"), (status = 404, description = "Not Found"))
)]
pub async fn delete(State(state): State<ServerState>, ApiPath(id): ApiPath<Uuid>) -> Result<StatusCode, JsonApiError> {
    if !medication_service::delete_medication(&state.db, id).await? {
        return Err(JsonApiError::not_found("medication"));
    }
    state.events.deleted(Topic::Medication, id);
    Ok(StatusCode::NO_CONTENT)
}
