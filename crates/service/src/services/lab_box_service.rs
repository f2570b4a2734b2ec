use uuid::Uuid;
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, Set,
};
use serde::Deserialize;
use tracing::info;

use models::{lab_box, site, validate};
use crate::errors::{db_err, ServiceError};
use common::pagination::Pagination;

#[derive(Clone, Debug, Deserialize)]
pub struct LabBoxInput {
    pub site_id: Uuid,
    pub code: String,
    #[serde(default)]
    pub species: Option<String>,
    /// Defaults to `egg`
    #[serde(default)]
    pub stage: Option<String>,
    #[serde(default)]
    pub stock_count: Option<i32>,
}

#[derive(Clone, Debug, Default, Deserialize)]
pub struct LabBoxPatch {
    pub code: Option<String>,
    pub species: Option<String>,
    pub stage: Option<String>,
    pub stock_count: Option<i32>,
}

#[derive(Clone, Debug, Default, Deserialize)]
pub struct LabBoxFilter {
    pub site_id: Option<Uuid>,
    pub stage: Option<String>,
}

async fn ensure_code_free(db: &DatabaseConnection, site_id: Uuid, code: &str, except: Option<Uuid>) -> Result<(), ServiceError> {
    let mut q = lab_box::Entity::find()
        .filter(lab_box::Column::SiteId.eq(site_id))
        .filter(lab_box::Column::Code.eq(code));
    if let Some(id) = except { q = q.filter(lab_box::Column::Id.ne(id)); }
    if q.one(db).await.map_err(db_err)?.is_some() {
        return Err(ServiceError::Conflict(format!("lab box code '{code}' already used at this site")));
    }
    Ok(())
}

/// Create a lab box.
pub async fn create_lab_box(db: &DatabaseConnection, input: LabBoxInput) -> Result<lab_box::Model, ServiceError> {
    let code = lab_box::validate_code(&input.code)?;
    let species = validate::optional_text("species", input.species.as_deref(), 128)?;
    let stage = lab_box::validate_stage(input.stage.as_deref().unwrap_or("egg"))?;
    let stock_count = validate::non_negative_count("stock_count", input.stock_count.unwrap_or(0))?;

    if site::Entity::find_by_id(input.site_id).one(db).await.map_err(db_err)?.is_none() {
        return Err(ServiceError::not_found("site"));
    }
    ensure_code_free(db, input.site_id, &code, None).await?;

    let now = Utc::now().into();
    let am = lab_box::ActiveModel {
        id: Set(Uuid::new_v4()),
        site_id: Set(input.site_id),
        code: Set(code),
        species: Set(species),
        stage: Set(stage),
        stock_count: Set(stock_count),
        created_at: Set(now),
        updated_at: Set(now),
    };
    let created = am.insert(db).await.map_err(db_err)?;
    info!(id = %created.id, code = %created.code, "lab_box_created");
    Ok(created)
}

/// Get lab box by id.
pub async fn get_lab_box(db: &DatabaseConnection, id: Uuid) -> Result<Option<lab_box::Model>, ServiceError> {
    lab_box::Entity::find_by_id(id).one(db).await.map_err(db_err)
}

/// Update lab box.
pub async fn update_lab_box(db: &DatabaseConnection, id: Uuid, patch: LabBoxPatch) -> Result<lab_box::Model, ServiceError> {
    let existing = lab_box::Entity::find_by_id(id)
        .one(db).await.map_err(db_err)?
        .ok_or_else(|| ServiceError::not_found("lab_box"))?;
    let site_id = existing.site_id;
    let mut am: lab_box::ActiveModel = existing.into();
    if let Some(c) = patch.code {
        let c = lab_box::validate_code(&c)?;
        ensure_code_free(db, site_id, &c, Some(id)).await?;
        am.code = Set(c);
    }
    if let Some(s) = patch.species { am.species = Set(validate::optional_text("species", Some(&s), 128)?); }
    if let Some(s) = patch.stage { am.stage = Set(lab_box::validate_stage(&s)?); }
    if let Some(n) = patch.stock_count { am.stock_count = Set(validate::non_negative_count("stock_count", n)?); }
    am.updated_at = Set(Utc::now().into());
    am.update(db).await.map_err(db_err)
}

/// Delete lab box; its feeding, water and medication history goes with it.
pub async fn delete_lab_box(db: &DatabaseConnection, id: Uuid) -> Result<bool, ServiceError> {
    let res = lab_box::Entity::delete_by_id(id).exec(db).await.map_err(db_err)?;
    Ok(res.rows_affected > 0)
}

/// List lab boxes by code with optional filters and pagination.
pub async fn list_lab_boxes(db: &DatabaseConnection, filter: LabBoxFilter, opts: Pagination) -> Result<Vec<lab_box::Model>, ServiceError> {
    let (page_idx, per_page) = opts.normalize();
    let mut select = lab_box::Entity::find();
    if let Some(sid) = filter.site_id { select = select.filter(lab_box::Column::SiteId.eq(sid)); }
    if let Some(stage) = filter.stage.as_deref() {
        select = select.filter(lab_box::Column::Stage.eq(lab_box::validate_stage(stage)?));
    }
    select
        .order_by_asc(lab_box::Column::Code)
        .paginate(db, per_page)
        .fetch_page(page_idx)
        .await
        .map_err(db_err)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{get_db, seed_site};

    #[tokio::test]
    async fn lab_box_crud_service() -> Result<(), anyhow::Error> {
        if std::env::var("SKIP_DB_TESTS").is_ok() { return Ok(()); }
        let db = get_db().await?;
        let s = seed_site(&db).await?;

        let b = create_lab_box(&db, LabBoxInput { site_id: s.id, code: "B-01".into(), species: None, stage: None, stock_count: Some(8000) }).await?;
        assert_eq!(b.stage, "egg");

        let updated = update_lab_box(&db, b.id, LabBoxPatch { stage: Some("Larva".into()), stock_count: Some(7400), ..Default::default() }).await?;
        assert_eq!(updated.stage, "larva");
        assert_eq!(updated.stock_count, 7400);

        let larvae = list_lab_boxes(&db, LabBoxFilter { site_id: Some(s.id), stage: Some("larva".into()) }, Pagination::default()).await?;
        assert_eq!(larvae.len(), 1);
        let eggs = list_lab_boxes(&db, LabBoxFilter { site_id: Some(s.id), stage: Some("egg".into()) }, Pagination::default()).await?;
        assert!(eggs.is_empty());

        assert!(delete_lab_box(&db, b.id).await?);
        assert!(get_lab_box(&db, b.id).await?.is_none());
        Ok(())
    }

    #[tokio::test]
    async fn duplicate_code_conflicts_within_site() -> Result<(), anyhow::Error> {
        if std::env::var("SKIP_DB_TESTS").is_ok() { return Ok(()); }
        let db = get_db().await?;
        let s = seed_site(&db).await?;
        create_lab_box(&db, LabBoxInput { site_id: s.id, code: "A1".into(), species: None, stage: None, stock_count: None }).await?;
        let b = create_lab_box(&db, LabBoxInput { site_id: s.id, code: "A2".into(), species: None, stage: None, stock_count: None }).await?;

        let err = create_lab_box(&db, LabBoxInput { site_id: s.id, code: "A1".into(), species: None, stage: None, stock_count: None }).await.unwrap_err();
        assert!(matches!(err, ServiceError::Conflict(_)));
        let err = update_lab_box(&db, b.id, LabBoxPatch { code: Some("A1".into()), ..Default::default() }).await.unwrap_err();
        assert!(matches!(err, ServiceError::Conflict(_)));
        // renaming to its own code is fine
        update_lab_box(&db, b.id, LabBoxPatch { code: Some("A2".into()), ..Default::default() }).await?;
        Ok(())
    }

    #[tokio::test]
    async fn invalid_stage_and_count_are_rejected() -> Result<(), anyhow::Error> {
        if std::env::var("SKIP_DB_TESTS").is_ok() { return Ok(()); }
        let db = get_db().await?;
        let s = seed_site(&db).await?;
        let bad_stage = create_lab_box(&db, LabBoxInput { site_id: s.id, code: "X".into(), species: None, stage: Some("adult".into()), stock_count: None }).await;
        assert!(matches!(bad_stage, Err(ServiceError::Model(_))));
        let bad_count = create_lab_box(&db, LabBoxInput { site_id: s.id, code: "Y".into(), species: None, stage: None, stock_count: Some(-3) }).await;
        assert!(matches!(bad_count, Err(ServiceError::Model(_))));
        Ok(())
    }
}
