use axum::{extract::State, http::StatusCode, Json};
use models::store;
use service::{
    services::store_service::{self, RestockInput, StoreFilter, StoreInput, StorePatch},
    Pagination,
};
use tracing::info;
use uuid::Uuid;

use crate::{errors::JsonApiError, extract::{ApiJson, ApiPath, ApiQuery}, events::{Action, Topic}, state::ServerState};

#[utoipa::path(
    get, path = "/stores", tag = "stores",
    params(
        ("site_id" = Option<Uuid>, Query, description = "Only stores of this site"),
        ("low_stock" = Option<bool>, Query, description = "true: at or below reorder level"),
        ("page" = Option<u32>, Query, description = "1-based page"),
        ("per_page" = Option<u32>, Query, description = "Page size, 1..=100")
    ),
    responses((status = 200, description = "List OK"))
)]
pub async fn list(
    State(state): State<ServerState>,
    ApiQuery(filter): ApiQuery<StoreFilter>,
    ApiQuery(page): ApiQuery<Pagination>,
) -> Result<Json<Vec<store::Model>>, JsonApiError> {
    Ok(Json(store_service::list_stores(&state.db, filter, page).await?))
}

#[utoipa::path(
    post, path = "/stores", tag = "stores",
    request_body = crate::openapi::StoreInputDoc,
    responses(
        (status = 200, description = "Created"),
        (status = 400, description = "Validation Error"),
        (status = 404, description = "Site Not Found")
    )
)]
pub async fn create(State(state): State<ServerState>, ApiJson(input): ApiJson<StoreInput>) -> Result<Json<store::Model>, JsonApiError> {
    let m = store_service::create_store(&state.db, input).await?;
    state.events.store_changed(Action::Created, &m);
    Ok(Json(m))
}

#[utoipa::path(
    get, path = "/stores/{id}", tag = "stores",
    params(("id" = Uuid, Path, description = "Store ID")),
    responses((status = 200, description = "OK"), (status = 404, description = "Not Found"))
)]
pub async fn get(State(state): State<ServerState>, ApiPath(id): ApiPath<Uuid>) -> Result<Json<store::Model>, JsonApiError> {
    store_service::get_store(&state.db, id).await?
        .map(Json)
        .ok_or_else(|| JsonApiError::not_found("store"))
}

#[utoipa::path(
    put, path = "/stores/{id}", tag = "stores",
    params(("id" = Uuid, Path, description = "Store ID")),
    request_body = crate::openapi::StorePatchDoc,
    responses(
        (status = 200, description = "Updated"),
        (status = 400, description = "Validation Error"),
        (status = 404, description = "Not Found")
    )
)]
pub async fn update(State(state): State<ServerState>, ApiPath(id): ApiPath<Uuid>, ApiJson(patch): ApiJson<StorePatch>) -> Result<Json<store::Model>, JsonApiError> {
    let m = store_service::update_store(&state.db, id, patch).await?;
    state.events.store_changed(Action::Updated, &m);
    Ok(Json(m))
}

#[utoipa::path(
    delete, path = "/stores/{id}", tag = "stores",
    params(("id" = Uuid, Path, description = "Store ID")),
    responses(
        (status = 204, description = "Deleted"),
        (status = 404, description = "Not Found"),
        (status = 409, description = "Feeding records still draw from this store")
    )
)]
pub async fn delete(State(state): State<ServerState>, ApiPath(id): ApiPath<Uuid>) -> Result<StatusCode, JsonApiError> {
    if !store_service::delete_store(&state.db, id).await? {
        return Err(JsonApiError::not_found("store"));
    }
    info!(%id, "store_deleted");
    state.events.deleted(Topic::Store, id);
    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    post, path = "/stores/{id}/restock", tag = "stores",
    params(("id" = Uuid, Path, description = "Store ID")),
    request_body = crate::openapi::RestockInputDoc,
    responses(
        (status = 200, description = "Restocked"),
        (status = 400, description = "Quantity must be positive"),
        (status = 404, description = "Not Found")
    )
)]
pub async fn restock(State(state): State<ServerState>, ApiPath(id): ApiPath<Uuid>, ApiJson(input): ApiJson<RestockInput>) -> Result<Json<store::Model>, JsonApiError> {
    let m = store_service::restock_store(&state.db, id, input).await?;
    state.events.store_changed(Action::Restocked, &m);
    Ok(Json(m))
}
