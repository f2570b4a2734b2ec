use chrono::{DateTime, FixedOffset, Utc};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, Set,
};
use serde::Deserialize;
use tracing::info;
use uuid::Uuid;

use common::pagination::Pagination;
use models::{target::Target, validate, water_change};

use crate::errors::{db_err, ServiceError};
use crate::services::targets::ensure_target_exists;

#[derive(Clone, Debug, Deserialize)]
pub struct WaterChangeInput {
    #[serde(default)]
    pub lab_box_id: Option<Uuid>,
    #[serde(default)]
    pub pond_id: Option<Uuid>,
    pub volume_percent: f64,
    #[serde(default)]
    pub temperature_c: Option<f64>,
    #[serde(default)]
    pub ph: Option<f64>,
    #[serde(default)]
    pub changed_at: Option<DateTime<FixedOffset>>,
    #[serde(default)]
    pub reason: Option<String>,
}

#[derive(Clone, Debug, Default, Deserialize)]
pub struct WaterChangePatch {
    pub volume_percent: Option<f64>,
    /// `null` clears the reading
    #[serde(default, deserialize_with = "common::utils::nullable::deserialize")]
    pub temperature_c: Option<Option<f64>>,
    #[serde(default, deserialize_with = "common::utils::nullable::deserialize")]
    pub ph: Option<Option<f64>>,
    pub changed_at: Option<DateTime<FixedOffset>>,
    pub reason: Option<String>,
}

#[derive(Clone, Copy, Debug, Default, Deserialize)]
pub struct WaterChangeFilter {
    pub lab_box_id: Option<Uuid>,
    pub pond_id: Option<Uuid>,
}

/// Record a water change for a lab box or a pond.
pub async fn create_water_change(db: &DatabaseConnection, input: WaterChangeInput) -> Result<water_change::Model, ServiceError> {
    let target = water_change::validate_target(Target::from_columns(input.lab_box_id, input.pond_id, None)?)?;
    let volume_percent = water_change::validate_volume_percent(input.volume_percent)?;
    let temperature_c = water_change::validate_temperature(input.temperature_c)?;
    let ph = water_change::validate_ph(input.ph)?;
    let reason = validate::optional_text("reason", input.reason.as_deref(), 500)?;

    ensure_target_exists(db, target).await?;

    let (lab_box_id, pond_id, _) = target.columns();
    let now: DateTime<FixedOffset> = Utc::now().into();
    let am = water_change::ActiveModel {
        id: Set(Uuid::new_v4()),
        lab_box_id: Set(lab_box_id),
        pond_id: Set(pond_id),
        volume_percent: Set(volume_percent),
        temperature_c: Set(temperature_c),
        ph: Set(ph),
        changed_at: Set(input.changed_at.unwrap_or(now)),
        reason: Set(reason),
        created_at: Set(now),
        updated_at: Set(now),
    };
    let created = am.insert(db).await.map_err(db_err)?;
    info!(id = %created.id, target = target.kind(), volume_percent = created.volume_percent, "water_change_recorded");
    Ok(created)
}

/// Get water change by id.
pub async fn get_water_change(db: &DatabaseConnection, id: Uuid) -> Result<Option<water_change::Model>, ServiceError> {
    water_change::Entity::find_by_id(id).one(db).await.map_err(db_err)
}

/// Update water change.
pub async fn update_water_change(db: &DatabaseConnection, id: Uuid, patch: WaterChangePatch) -> Result<water_change::Model, ServiceError> {
    let mut am: water_change::ActiveModel = water_change::Entity::find_by_id(id)
        .one(db).await.map_err(db_err)?
        .ok_or_else(|| ServiceError::not_found("water_change"))?
        .into();
    if let Some(v) = patch.volume_percent { am.volume_percent = Set(water_change::validate_volume_percent(v)?); }
    if let Some(t) = patch.temperature_c { am.temperature_c = Set(water_change::validate_temperature(t)?); }
    if let Some(p) = patch.ph { am.ph = Set(water_change::validate_ph(p)?); }
    if let Some(at) = patch.changed_at { am.changed_at = Set(at); }
    if let Some(r) = patch.reason { am.reason = Set(validate::optional_text("reason", Some(&r), 500)?); }
    am.updated_at = Set(Utc::now().into());
    am.update(db).await.map_err(db_err)
}

/// Delete water change.
pub async fn delete_water_change(db: &DatabaseConnection, id: Uuid) -> Result<bool, ServiceError> {
    let res = water_change::Entity::delete_by_id(id).exec(db).await.map_err(db_err)?;
    Ok(res.rows_affected > 0)
}

/// List water changes, newest first.
pub async fn list_water_changes(db: &DatabaseConnection, filter: WaterChangeFilter, opts: Pagination) -> Result<Vec<water_change::Model>, ServiceError> {
    let (page_idx, per_page) = opts.normalize();
    let mut select = water_change::Entity::find();
    if let Some(v) = filter.lab_box_id { select = select.filter(water_change::Column::LabBoxId.eq(v)); }
    if let Some(v) = filter.pond_id { select = select.filter(water_change::Column::PondId.eq(v)); }
    select
        .order_by_desc(water_change::Column::ChangedAt)
        .paginate(db, per_page)
        .fetch_page(page_idx)
        .await
        .map_err(db_err)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::lab_box_service::delete_lab_box;
    use crate::test_support::{get_db, seed_lab_box, seed_pond, seed_site};

    fn box_change(lab_box_id: Uuid, volume_percent: f64) -> WaterChangeInput {
        WaterChangeInput {
            lab_box_id: Some(lab_box_id),
            pond_id: None,
            volume_percent,
            temperature_c: Some(26.5),
            ph: Some(7.2),
            changed_at: None,
            reason: None,
        }
    }

    #[tokio::test]
    async fn water_change_crud_service() -> Result<(), anyhow::Error> {
        if std::env::var("SKIP_DB_TESTS").is_ok() { return Ok(()); }
        let db = get_db().await?;
        let site = seed_site(&db).await?;
        let b = seed_lab_box(&db, site.id).await?;

        let w = create_water_change(&db, box_change(b.id, 30.0)).await?;
        assert_eq!(w.target()?, Target::LabBox(b.id));

        let updated = update_water_change(&db, w.id, WaterChangePatch { ph: Some(Some(6.8)), reason: Some("ammonia spike".into()), ..Default::default() }).await?;
        assert_eq!(updated.ph, Some(6.8));
        assert_eq!(updated.volume_percent, 30.0);

        let cleared = update_water_change(&db, w.id, WaterChangePatch { temperature_c: Some(None), ..Default::default() }).await?;
        assert_eq!(cleared.temperature_c, None);
        assert_eq!(cleared.ph, Some(6.8));

        let rows = list_water_changes(&db, WaterChangeFilter { lab_box_id: Some(b.id), pond_id: None }, Pagination::default()).await?;
        assert_eq!(rows.len(), 1);

        assert!(delete_water_change(&db, w.id).await?);
        assert!(get_water_change(&db, w.id).await?.is_none());
        Ok(())
    }

    #[tokio::test]
    async fn readings_out_of_range_are_rejected() -> Result<(), anyhow::Error> {
        if std::env::var("SKIP_DB_TESTS").is_ok() { return Ok(()); }
        let db = get_db().await?;
        let site = seed_site(&db).await?;
        let pond = seed_pond(&db, site.id).await?;
        let pond_change = |volume_percent: f64, ph: Option<f64>| WaterChangeInput {
            lab_box_id: None, pond_id: Some(pond.id), volume_percent, temperature_c: None, ph, changed_at: None, reason: None,
        };

        assert!(create_water_change(&db, pond_change(0.0, None)).await.is_err());
        assert!(create_water_change(&db, pond_change(120.0, None)).await.is_err());
        assert!(create_water_change(&db, pond_change(20.0, Some(15.0))).await.is_err());
        create_water_change(&db, pond_change(100.0, Some(14.0))).await?;
        Ok(())
    }

    #[tokio::test]
    async fn history_goes_with_the_lab_box() -> Result<(), anyhow::Error> {
        if std::env::var("SKIP_DB_TESTS").is_ok() { return Ok(()); }
        let db = get_db().await?;
        let site = seed_site(&db).await?;
        let b = seed_lab_box(&db, site.id).await?;
        let w = create_water_change(&db, box_change(b.id, 50.0)).await?;

        delete_lab_box(&db, b.id).await?;
        assert!(get_water_change(&db, w.id).await?.is_none());
        assert!(matches!(create_water_change(&db, box_change(b.id, 10.0)).await, Err(ServiceError::NotFound(_))));
        Ok(())
    }
}
