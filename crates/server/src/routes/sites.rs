use axum::{extract::State, http::StatusCode, Json};
use models::site;
use service::{
    services::site_service::{self, SiteInput, SiteOverview, SitePatch},
    Pagination,
};
use tracing::info;
use uuid::Uuid;

use crate::{errors::JsonApiError, extract::{ApiJson, ApiPath, ApiQuery}, events::{Action, Topic}, state::ServerState};

#[utoipa::path(
    get, path = "/sites", tag = "sites",
    params(
        ("page" = Option<u32>, Query, description = "1-based page"),
        ("per_page" = Option<u32>, Query, description = "Page size, 1..=100")
    ),
    responses((status = 200, description = "List OK"), (status = 500, description = "List Failed"))
)]
pub async fn list(State(state): State<ServerState>, ApiQuery(page): ApiQuery<Pagination>) -> Result<Json<Vec<site::Model>>, JsonApiError> {
    Ok(Json(site_service::list_sites(&state.db, page).await?))
}

#[utoipa::path(
    post, path = "/sites", tag = "sites",
    request_body = crate::openapi::SiteInputDoc,
    responses(
        (status = 200, description = "Created"),
        (status = 400, description = "Validation Error"),
        (status = 409, description = "Name already used")
    )
)]
pub async fn create(State(state): State<ServerState>, ApiJson(input): ApiJson<SiteInput>) -> Result<Json<site::Model>, JsonApiError> {
    let m = site_service::create_site(&state.db, input).await?;
    state.events.publish(Topic::Site, Action::Created, m.id, Some(&m));
    Ok(Json(m))
}

#[utoipa::path(
    get, path = "/sites/{id}", tag = "sites",
    params(("id" = Uuid, Path, description = "Site ID")),
    responses((status = 200, description = "OK"), (status = 404, description = "Not Found"))
)]
pub async fn get(State(state): State<ServerState>, ApiPath(id): ApiPath<Uuid>) -> Result<Json<site::Model>, JsonApiError> {
    site_service::get_site(&state.db, id).await?
        .map(Json)
        .ok_or_else(|| JsonApiError::not_found("site"))
}

#[utoipa::path(
    put, path = "/sites/{id}", tag = "sites",
    params(("id" = Uuid, Path, description = "Site ID")),
    request_body = crate::openapi::SitePatchDoc,
    responses(
        (status = 200, description = "Updated"),
        (status = 400, description = "Validation Error"),
        (status = 404, description = "Not Found")
    )
)]
pub async fn update(State(state): State<ServerState>, ApiPath(id): ApiPath<Uuid>, ApiJson(patch): ApiJson<SitePatch>) -> Result<Json<site::Model>, JsonApiError> {
    let m = site_service::update_site(&state.db, id, patch).await?;
    state.events.publish(Topic::Site, Action::Updated, m.id, Some(&m));
    Ok(Json(m))
}

#[utoipa::path(
    delete, path = "/sites/{id}", tag = "sites",
    params(("id" = Uuid, Path, description = "Site ID")),
    responses(
        (status = 204, description = "Deleted"),
        (status = 404, description = "Not Found"),
        (status = 409, description = "Site still has lab boxes, ponds or stores")
    )
)]
pub async fn delete(State(state): State<ServerState>, ApiPath(id): ApiPath<Uuid>) -> Result<StatusCode, JsonApiError> {
    if !site_service::delete_site(&state.db, id).await? {
        return Err(JsonApiError::not_found("site"));
    }
    info!(%id, "site_deleted");
    state.events.deleted(Topic::Site, id);
    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    get, path = "/sites/{id}/overview", tag = "sites",
    params(("id" = Uuid, Path, description = "Site ID")),
    responses((status = 200, description = "Counts, fish total and low-stock stores"), (status = 404, description = "Not Found"))
)]
pub async fn overview(State(state): State<ServerState>, ApiPath(id): ApiPath<Uuid>) -> Result<Json<SiteOverview>, JsonApiError> {
    site_service::site_overview(&state.db, id).await?
        .map(Json)
        .ok_or_else(|| JsonApiError::not_found("site"))
}
