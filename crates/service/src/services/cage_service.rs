use uuid::Uuid;
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, Set,
};
use serde::Deserialize;
use tracing::info;

use models::{cage, fish_pond, validate};
use crate::errors::{db_err, ServiceError};
use common::pagination::Pagination;

#[derive(Clone, Debug, Deserialize)]
pub struct CageInput {
    pub pond_id: Uuid,
    pub name: String,
    #[serde(default)]
    pub species: Option<String>,
    #[serde(default)]
    pub fish_count: Option<i32>,
}

#[derive(Clone, Debug, Default, Deserialize)]
pub struct CagePatch {
    pub name: Option<String>,
    pub species: Option<String>,
    pub fish_count: Option<i32>,
}

#[derive(Clone, Copy, Debug, Default, Deserialize)]
pub struct CageFilter {
    pub pond_id: Option<Uuid>,
}

/// Create a cage inside an existing pond.
pub async fn create_cage(db: &DatabaseConnection, input: CageInput) -> Result<cage::Model, ServiceError> {
    let name = cage::validate_name(&input.name)?;
    let species = validate::optional_text("species", input.species.as_deref(), 128)?;
    let fish_count = validate::non_negative_count("fish_count", input.fish_count.unwrap_or(0))?;

    if fish_pond::Entity::find_by_id(input.pond_id).one(db).await.map_err(db_err)?.is_none() {
        return Err(ServiceError::not_found("fish_pond"));
    }

    let now = Utc::now().into();
    let am = cage::ActiveModel {
        id: Set(Uuid::new_v4()),
        pond_id: Set(input.pond_id),
        name: Set(name),
        species: Set(species),
        fish_count: Set(fish_count),
        created_at: Set(now),
        updated_at: Set(now),
    };
    let created = am.insert(db).await.map_err(db_err)?;
    info!(id = %created.id, pond_id = %created.pond_id, "cage_created");
    Ok(created)
}

/// Get cage by id.
pub async fn get_cage(db: &DatabaseConnection, id: Uuid) -> Result<Option<cage::Model>, ServiceError> {
    cage::Entity::find_by_id(id).one(db).await.map_err(db_err)
}

/// Update cage.
pub async fn update_cage(db: &DatabaseConnection, id: Uuid, patch: CagePatch) -> Result<cage::Model, ServiceError> {
    let mut am: cage::ActiveModel = cage::Entity::find_by_id(id)
        .one(db).await.map_err(db_err)?
        .ok_or_else(|| ServiceError::not_found("cage"))?
        .into();
    if let Some(n) = patch.name { am.name = Set(cage::validate_name(&n)?); }
    if let Some(s) = patch.species { am.species = Set(validate::optional_text("species", Some(&s), 128)?); }
    if let Some(c) = patch.fish_count { am.fish_count = Set(validate::non_negative_count("fish_count", c)?); }
    am.updated_at = Set(Utc::now().into());
    am.update(db).await.map_err(db_err)
}

/// Delete cage.
pub async fn delete_cage(db: &DatabaseConnection, id: Uuid) -> Result<bool, ServiceError> {
    let res = cage::Entity::delete_by_id(id).exec(db).await.map_err(db_err)?;
    Ok(res.rows_affected > 0)
}

/// List cages, optionally for one pond.
pub async fn list_cages(db: &DatabaseConnection, filter: CageFilter, opts: Pagination) -> Result<Vec<cage::Model>, ServiceError> {
    let (page_idx, per_page) = opts.normalize();
    let mut select = cage::Entity::find();
    if let Some(pid) = filter.pond_id { select = select.filter(cage::Column::PondId.eq(pid)); }
    select
        .order_by_asc(cage::Column::Name)
        .paginate(db, per_page)
        .fetch_page(page_idx)
        .await
        .map_err(db_err)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::fish_pond_service::delete_pond;
    use crate::test_support::{get_db, seed_pond, seed_site};

    #[tokio::test]
    async fn cage_crud_service() -> Result<(), anyhow::Error> {
        if std::env::var("SKIP_DB_TESTS").is_ok() { return Ok(()); }
        let db = get_db().await?;
        let s = seed_site(&db).await?;
        let pond = seed_pond(&db, s.id).await?;

        let c = create_cage(&db, CageInput { pond_id: pond.id, name: "Cage A".into(), species: None, fish_count: Some(250) }).await?;
        let updated = update_cage(&db, c.id, CagePatch { fish_count: Some(240), ..Default::default() }).await?;
        assert_eq!(updated.fish_count, 240);
        assert_eq!(updated.name, "Cage A");

        let in_pond = list_cages(&db, CageFilter { pond_id: Some(pond.id) }, Pagination::default()).await?;
        assert_eq!(in_pond.len(), 1);

        assert!(delete_cage(&db, c.id).await?);
        assert!(!delete_cage(&db, c.id).await?);
        Ok(())
    }

    #[tokio::test]
    async fn cages_follow_their_pond() -> Result<(), anyhow::Error> {
        if std::env::var("SKIP_DB_TESTS").is_ok() { return Ok(()); }
        let db = get_db().await?;
        let s = seed_site(&db).await?;
        let pond = seed_pond(&db, s.id).await?;
        let c = create_cage(&db, CageInput { pond_id: pond.id, name: "Cage B".into(), species: None, fish_count: None }).await?;

        delete_pond(&db, pond.id).await?;
        assert!(get_cage(&db, c.id).await?.is_none());

        let orphan = create_cage(&db, CageInput { pond_id: pond.id, name: "Cage C".into(), species: None, fish_count: None }).await;
        assert!(matches!(orphan, Err(ServiceError::NotFound(_))));
        Ok(())
    }
}
