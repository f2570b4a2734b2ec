use chrono::{DateTime, FixedOffset, Utc};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, Set,
};
use serde::Deserialize;
use tracing::info;
use uuid::Uuid;

use common::pagination::Pagination;
use models::{medication, target::Target, validate};

use crate::errors::{db_err, ServiceError};
use crate::services::targets::ensure_target_exists;

#[derive(Clone, Debug, Deserialize)]
pub struct MedicationInput {
    #[serde(default)]
    pub lab_box_id: Option<Uuid>,
    #[serde(default)]
    pub pond_id: Option<Uuid>,
    #[serde(default)]
    pub cage_id: Option<Uuid>,
    pub medicine: String,
    pub dosage: f64,
    pub dosage_unit: String,
    #[serde(default)]
    pub administered_at: Option<DateTime<FixedOffset>>,
    #[serde(default)]
    pub withdrawal_days: Option<i32>,
    #[serde(default)]
    pub notes: Option<String>,
}

#[derive(Clone, Debug, Default, Deserialize)]
pub struct MedicationPatch {
    pub medicine: Option<String>,
    pub dosage: Option<f64>,
    pub dosage_unit: Option<String>,
    pub administered_at: Option<DateTime<FixedOffset>>,
    #[serde(default, deserialize_with = "common::utils::nullable::deserialize")]
    pub withdrawal_days: Option<Option<i32>>,
    pub notes: Option<String>,
}

#[derive(Clone, Copy, Debug, Default, Deserialize)]
pub struct MedicationFilter {
    pub lab_box_id: Option<Uuid>,
    pub pond_id: Option<Uuid>,
    pub cage_id: Option<Uuid>,
}

/// Record a treatment.
pub async fn create_medication(db: &DatabaseConnection, input: MedicationInput) -> Result<medication::Model, ServiceError> {
    let target = Target::from_columns(input.lab_box_id, input.pond_id, input.cage_id)?;
    let medicine = medication::validate_medicine(&input.medicine)?;
    let dosage = medication::validate_dosage(input.dosage)?;
    let dosage_unit = medication::validate_dosage_unit(&input.dosage_unit)?;
    let withdrawal_days = medication::validate_withdrawal_days(input.withdrawal_days)?;
    let notes = validate::optional_text("notes", input.notes.as_deref(), 1000)?;

    ensure_target_exists(db, target).await?;

    let (lab_box_id, pond_id, cage_id) = target.columns();
    let now: DateTime<FixedOffset> = Utc::now().into();
    let am = medication::ActiveModel {
        id: Set(Uuid::new_v4()),
        lab_box_id: Set(lab_box_id),
        pond_id: Set(pond_id),
        cage_id: Set(cage_id),
        medicine: Set(medicine),
        dosage: Set(dosage),
        dosage_unit: Set(dosage_unit),
        administered_at: Set(input.administered_at.unwrap_or(now)),
        withdrawal_days: Set(withdrawal_days),
        notes: Set(notes),
        created_at: Set(now),
        updated_at: Set(now),
    };
    let created = am.insert(db).await.map_err(db_err)?;
    info!(id = %created.id, target = target.kind(), medicine = %created.medicine, "medication_recorded");
    Ok(created)
}

/// Get medication by id.
pub async fn get_medication(db: &DatabaseConnection, id: Uuid) -> Result<Option<medication::Model>, ServiceError> {
    medication::Entity::find_by_id(id).one(db).await.map_err(db_err)
}

/// Update medication.
pub async fn update_medication(db: &DatabaseConnection, id: Uuid, patch: MedicationPatch) -> Result<medication::Model, ServiceError> {
    let mut am: medication::ActiveModel = medication::Entity::find_by_id(id)
        .one(db).await.map_err(db_err)?
        .ok_or_else(|| ServiceError::not_found("medication"))?
        .into();
    if let Some(m) = patch.medicine { am.medicine = Set(medication::validate_medicine(&m)?); }
    if let Some(d) = patch.dosage { am.dosage = Set(medication::validate_dosage(d)?); }
    if let Some(u) = patch.dosage_unit { am.dosage_unit = Set(medication::validate_dosage_unit(&u)?); }
    if let Some(at) = patch.administered_at { am.administered_at = Set(at); }
    if let Some(w) = patch.withdrawal_days { am.withdrawal_days = Set(medication::validate_withdrawal_days(w)?); }
    if let Some(n) = patch.notes { am.notes = Set(validate::optional_text("notes", Some(&n), 1000)?); }
    am.updated_at = Set(Utc::now().into());
    am.update(db).await.map_err(db_err)
}

/// Delete medication.
pub async fn delete_medication(db: &DatabaseConnection, id: Uuid) -> Result<bool, ServiceError> {
    let res = medication::Entity::delete_by_id(id).exec(db).await.map_err(db_err)?;
    Ok(res.rows_affected > 0)
}

/// List treatments, most recent first.
pub async fn list_medications(db: &DatabaseConnection, filter: MedicationFilter, opts: Pagination) -> Result<Vec<medication::Model>, ServiceError> {
    let (page_idx, per_page) = opts.normalize();
    let mut select = medication::Entity::find();
    if let Some(v) = filter.lab_box_id { select = select.filter(medication::Column::LabBoxId.eq(v)); }
    if let Some(v) = filter.pond_id { select = select.filter(medication::Column::PondId.eq(v)); }
    if let Some(v) = filter.cage_id { select = select.filter(medication::Column::CageId.eq(v)); }
    select
        .order_by_desc(medication::Column::AdministeredAt)
        .paginate(db, per_page)
        .fetch_page(page_idx)
        .await
        .map_err(db_err)
}
