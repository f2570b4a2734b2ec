use uuid::Uuid;
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, Set,
};
use serde::{Deserialize, Serialize};
use tracing::info;

use models::{cage, fish_pond, lab_box, site, store, validate};
use crate::errors::{db_err, ServiceError};
use common::pagination::Pagination;

#[derive(Clone, Debug, Deserialize)]
pub struct SiteInput {
    pub name: String,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}

/// Patch: absent fields keep their value, blank optional text clears it.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct SitePatch {
    pub name: Option<String>,
    pub location: Option<String>,
    pub description: Option<String>,
}

/// Dashboard summary of one site.
#[derive(Clone, Debug, Serialize)]
pub struct SiteOverview {
    pub site: site::Model,
    pub lab_boxes: u64,
    pub ponds: u64,
    pub cages: u64,
    pub stores: u64,
    /// Fish in ponds and cages plus stock held in lab boxes
    pub total_fish: i64,
    pub low_stock: Vec<store::Model>,
}

/// Create a site.
pub async fn create_site(db: &DatabaseConnection, input: SiteInput) -> Result<site::Model, ServiceError> {
    let name = site::validate_name(&input.name)?;
    let location = validate::optional_text("location", input.location.as_deref(), 256)?;
    let description = validate::optional_text("description", input.description.as_deref(), 4000)?;

    let now = Utc::now().into();
    let am = site::ActiveModel {
        id: Set(Uuid::new_v4()),
        name: Set(name),
        location: Set(location),
        description: Set(description),
        created_at: Set(now),
        updated_at: Set(now),
    };
    let created = am.insert(db).await.map_err(db_err)?;
    info!(id = %created.id, name = %created.name, "site_created");
    Ok(created)
}

/// Get site by id.
pub async fn get_site(db: &DatabaseConnection, id: Uuid) -> Result<Option<site::Model>, ServiceError> {
    site::Entity::find_by_id(id).one(db).await.map_err(db_err)
}

/// Update site fields.
pub async fn update_site(db: &DatabaseConnection, id: Uuid, patch: SitePatch) -> Result<site::Model, ServiceError> {
    let mut am: site::ActiveModel = site::Entity::find_by_id(id)
        .one(db).await.map_err(db_err)?
        .ok_or_else(|| ServiceError::not_found("site"))?
        .into();
    if let Some(n) = patch.name { am.name = Set(site::validate_name(&n)?); }
    if let Some(l) = patch.location { am.location = Set(validate::optional_text("location", Some(&l), 256)?); }
    if let Some(d) = patch.description { am.description = Set(validate::optional_text("description", Some(&d), 4000)?); }
    am.updated_at = Set(Utc::now().into());
    am.update(db).await.map_err(db_err)
}

/// Delete a site; refused while it still owns stores, lab boxes or ponds.
pub async fn delete_site(db: &DatabaseConnection, id: Uuid) -> Result<bool, ServiceError> {
    let children = store::Entity::find().filter(store::Column::SiteId.eq(id)).count(db).await.map_err(db_err)?
        + lab_box::Entity::find().filter(lab_box::Column::SiteId.eq(id)).count(db).await.map_err(db_err)?
        + fish_pond::Entity::find().filter(fish_pond::Column::SiteId.eq(id)).count(db).await.map_err(db_err)?;
    if children > 0 {
        return Err(ServiceError::Conflict(format!("site still owns {children} stores, lab boxes or ponds")));
    }
    let res = site::Entity::delete_by_id(id).exec(db).await.map_err(db_err)?;
    Ok(res.rows_affected > 0)
}

/// List sites by name with pagination.
pub async fn list_sites(db: &DatabaseConnection, opts: Pagination) -> Result<Vec<site::Model>, ServiceError> {
    let (page_idx, per_page) = opts.normalize();
    site::Entity::find()
        .order_by_asc(site::Column::Name)
        .paginate(db, per_page)
        .fetch_page(page_idx)
        .await
        .map_err(db_err)
}

/// Counts, fish totals and low stores for one site.
pub async fn site_overview(db: &DatabaseConnection, id: Uuid) -> Result<Option<SiteOverview>, ServiceError> {
    let Some(site) = get_site(db, id).await? else { return Ok(None); };

    let boxes = lab_box::Entity::find().filter(lab_box::Column::SiteId.eq(id)).all(db).await.map_err(db_err)?;
    let ponds = fish_pond::Entity::find().filter(fish_pond::Column::SiteId.eq(id)).all(db).await.map_err(db_err)?;
    let pond_ids: Vec<Uuid> = ponds.iter().map(|p| p.id).collect();
    let cages = if pond_ids.is_empty() {
        Vec::new()
    } else {
        cage::Entity::find().filter(cage::Column::PondId.is_in(pond_ids)).all(db).await.map_err(db_err)?
    };
    let stores = store::Entity::find()
        .filter(store::Column::SiteId.eq(id))
        .order_by_asc(store::Column::Name)
        .all(db)
        .await
        .map_err(db_err)?;

    let total_fish = ponds.iter().map(|p| p.fish_count as i64).sum::<i64>()
        + cages.iter().map(|c| c.fish_count as i64).sum::<i64>()
        + boxes.iter().map(|b| b.stock_count as i64).sum::<i64>();
    let store_count = stores.len() as u64;
    let low_stock = stores.into_iter().filter(|s| s.is_low()).collect();

    Ok(Some(SiteOverview {
        site,
        lab_boxes: boxes.len() as u64,
        ponds: ponds.len() as u64,
        cages: cages.len() as u64,
        stores: store_count,
        total_fish,
        low_stock,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::cage_service::{create_cage, CageInput};
    use crate::services::store_service::{update_store, StorePatch};
    use crate::test_support::{get_db, seed_lab_box, seed_pond, seed_site, seed_store};

    #[tokio::test]
    async fn site_crud_service() -> Result<(), anyhow::Error> {
        if std::env::var("SKIP_DB_TESTS").is_ok() { return Ok(()); }
        let db = get_db().await?;

        let name = format!("svc_site_{}", Uuid::new_v4());
        let s = create_site(&db, SiteInput { name: format!("  {name} "), location: Some("".into()), description: None }).await?;
        assert_eq!(s.name, name);
        assert_eq!(s.location, None);

        let found = get_site(&db, s.id).await?.unwrap();
        assert_eq!(found.id, s.id);

        let updated = update_site(&db, s.id, SitePatch { location: Some("Delta".into()), ..Default::default() }).await?;
        assert_eq!(updated.name, name);
        assert_eq!(updated.location.as_deref(), Some("Delta"));

        let page = list_sites(&db, Pagination::default()).await?;
        assert!(page.iter().any(|x| x.id == s.id));

        assert!(delete_site(&db, s.id).await?);
        assert!(get_site(&db, s.id).await?.is_none());
        assert!(!delete_site(&db, s.id).await?);
        Ok(())
    }

    #[tokio::test]
    async fn duplicate_site_name_conflicts() -> Result<(), anyhow::Error> {
        if std::env::var("SKIP_DB_TESTS").is_ok() { return Ok(()); }
        let db = get_db().await?;
        let name = format!("dup_{}", Uuid::new_v4());
        create_site(&db, SiteInput { name: name.clone(), location: None, description: None }).await?;
        let err = create_site(&db, SiteInput { name, location: None, description: None }).await.unwrap_err();
        assert!(matches!(err, ServiceError::Conflict(_)), "got {err}");
        Ok(())
    }

    #[tokio::test]
    async fn blank_name_is_rejected() -> Result<(), anyhow::Error> {
        if std::env::var("SKIP_DB_TESTS").is_ok() { return Ok(()); }
        let db = get_db().await?;
        let err = create_site(&db, SiteInput { name: "   ".into(), location: None, description: None }).await.unwrap_err();
        assert!(matches!(err, ServiceError::Model(_)));
        Ok(())
    }

    #[tokio::test]
    async fn site_with_children_cannot_be_deleted() -> Result<(), anyhow::Error> {
        if std::env::var("SKIP_DB_TESTS").is_ok() { return Ok(()); }
        let db = get_db().await?;
        let s = seed_site(&db).await?;
        seed_pond(&db, s.id).await?;
        let err = delete_site(&db, s.id).await.unwrap_err();
        assert!(matches!(err, ServiceError::Conflict(_)));
        Ok(())
    }

    #[tokio::test]
    async fn overview_counts_and_low_stock() -> Result<(), anyhow::Error> {
        if std::env::var("SKIP_DB_TESTS").is_ok() { return Ok(()); }
        let db = get_db().await?;
        let s = seed_site(&db).await?;
        let pond = seed_pond(&db, s.id).await?; // 2000 fish
        seed_lab_box(&db, s.id).await?; // 10_000 eggs
        create_cage(&db, CageInput { pond_id: pond.id, name: "C1".into(), species: None, fish_count: Some(150) }).await?;
        let full = seed_store(&db, s.id, 500.0).await?;
        let low = seed_store(&db, s.id, 4.0).await?;
        update_store(&db, low.id, StorePatch { reorder_level: Some(5.0), ..Default::default() }).await?;

        let o = site_overview(&db, s.id).await?.unwrap();
        assert_eq!(o.ponds, 1);
        assert_eq!(o.lab_boxes, 1);
        assert_eq!(o.cages, 1);
        assert_eq!(o.stores, 2);
        assert_eq!(o.total_fish, 12_150);
        assert_eq!(o.low_stock.len(), 1);
        assert_eq!(o.low_stock[0].id, low.id);
        assert_ne!(o.low_stock[0].id, full.id);

        assert!(site_overview(&db, Uuid::new_v4()).await?.is_none());
        Ok(())
    }
}
