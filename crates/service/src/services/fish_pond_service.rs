use uuid::Uuid;
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, Set,
};
use serde::Deserialize;
use tracing::info;

use models::{fish_pond, site, validate};
use crate::errors::{db_err, ServiceError};
use common::pagination::Pagination;

#[derive(Clone, Debug, Deserialize)]
pub struct PondInput {
    pub site_id: Uuid,
    pub name: String,
    pub area_m2: f64,
    #[serde(default)]
    pub depth_m: Option<f64>,
    #[serde(default)]
    pub species: Option<String>,
    #[serde(default)]
    pub fish_count: Option<i32>,
    /// Defaults to `active`
    #[serde(default)]
    pub status: Option<String>,
}

#[derive(Clone, Debug, Default, Deserialize)]
pub struct PondPatch {
    pub name: Option<String>,
    pub area_m2: Option<f64>,
    #[serde(default, deserialize_with = "common::utils::nullable::deserialize")]
    pub depth_m: Option<Option<f64>>,
    pub species: Option<String>,
    pub fish_count: Option<i32>,
    pub status: Option<String>,
}

#[derive(Clone, Debug, Default, Deserialize)]
pub struct PondFilter {
    pub site_id: Option<Uuid>,
    pub status: Option<String>,
}

/// Create a fish pond.
pub async fn create_pond(db: &DatabaseConnection, input: PondInput) -> Result<fish_pond::Model, ServiceError> {
    let name = fish_pond::validate_name(&input.name)?;
    let area_m2 = fish_pond::validate_area(input.area_m2)?;
    let depth_m = fish_pond::validate_depth(input.depth_m)?;
    let species = validate::optional_text("species", input.species.as_deref(), 128)?;
    let fish_count = validate::non_negative_count("fish_count", input.fish_count.unwrap_or(0))?;
    let status = fish_pond::validate_status(input.status.as_deref().unwrap_or("active"))?;

    if site::Entity::find_by_id(input.site_id).one(db).await.map_err(db_err)?.is_none() {
        return Err(ServiceError::not_found("site"));
    }

    let now = Utc::now().into();
    let am = fish_pond::ActiveModel {
        id: Set(Uuid::new_v4()),
        site_id: Set(input.site_id),
        name: Set(name),
        area_m2: Set(area_m2),
        depth_m: Set(depth_m),
        species: Set(species),
        fish_count: Set(fish_count),
        status: Set(status),
        created_at: Set(now),
        updated_at: Set(now),
    };
    let created = am.insert(db).await.map_err(db_err)?;
    info!(id = %created.id, name = %created.name, "fish_pond_created");
    Ok(created)
}

/// Get pond by id.
pub async fn get_pond(db: &DatabaseConnection, id: Uuid) -> Result<Option<fish_pond::Model>, ServiceError> {
    fish_pond::Entity::find_by_id(id).one(db).await.map_err(db_err)
}

/// Update pond.
pub async fn update_pond(db: &DatabaseConnection, id: Uuid, patch: PondPatch) -> Result<fish_pond::Model, ServiceError> {
    let mut am: fish_pond::ActiveModel = fish_pond::Entity::find_by_id(id)
        .one(db).await.map_err(db_err)?
        .ok_or_else(|| ServiceError::not_found("fish_pond"))?
        .into();
    if let Some(n) = patch.name { am.name = Set(fish_pond::validate_name(&n)?); }
    if let Some(a) = patch.area_m2 { am.area_m2 = Set(fish_pond::validate_area(a)?); }
    if let Some(d) = patch.depth_m { am.depth_m = Set(fish_pond::validate_depth(d)?); }
    if let Some(s) = patch.species { am.species = Set(validate::optional_text("species", Some(&s), 128)?); }
    if let Some(c) = patch.fish_count { am.fish_count = Set(validate::non_negative_count("fish_count", c)?); }
    if let Some(s) = patch.status { am.status = Set(fish_pond::validate_status(&s)?); }
    am.updated_at = Set(Utc::now().into());
    am.update(db).await.map_err(db_err)
}

/// Delete pond; cages and pond history cascade.
pub async fn delete_pond(db: &DatabaseConnection, id: Uuid) -> Result<bool, ServiceError> {
    let res = fish_pond::Entity::delete_by_id(id).exec(db).await.map_err(db_err)?;
    Ok(res.rows_affected > 0)
}

/// List ponds with optional filters and pagination.
pub async fn list_ponds(db: &DatabaseConnection, filter: PondFilter, opts: Pagination) -> Result<Vec<fish_pond::Model>, ServiceError> {
    let (page_idx, per_page) = opts.normalize();
    let mut select = fish_pond::Entity::find();
    if let Some(sid) = filter.site_id { select = select.filter(fish_pond::Column::SiteId.eq(sid)); }
    if let Some(status) = filter.status.as_deref() {
        select = select.filter(fish_pond::Column::Status.eq(fish_pond::validate_status(status)?));
    }
    select
        .order_by_asc(fish_pond::Column::Name)
        .paginate(db, per_page)
        .fetch_page(page_idx)
        .await
        .map_err(db_err)
}
