use sea_orm::entity::prelude::*;
use uuid::Uuid;
use serde::{Deserialize, Serialize};

use crate::{errors::ModelError, fish_pond, lab_box, target::Target, validate};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "water_change")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub lab_box_id: Option<Uuid>,
    pub pond_id: Option<Uuid>,
    pub volume_percent: f64,
    pub temperature_c: Option<f64>,
    pub ph: Option<f64>,
    pub changed_at: DateTimeWithTimeZone,
    pub reason: Option<String>,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter)]
pub enum Relation { LabBox, Pond }

impl RelationTrait for Relation {
    fn def(&self) -> RelationDef {
        match self {
            Relation::LabBox => Entity::belongs_to(lab_box::Entity).from(Column::LabBoxId).to(lab_box::Column::Id).into(),
            Relation::Pond => Entity::belongs_to(fish_pond::Entity).from(Column::PondId).to(fish_pond::Column::Id).into(),
        }
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn target(&self) -> Result<Target, ModelError> {
        Target::from_columns(self.lab_box_id, self.pond_id, None)
    }
}

/// Water is changed in boxes and ponds; cages share their pond's water.
pub fn validate_target(target: Target) -> Result<Target, ModelError> {
    match target {
        Target::Cage(_) => Err(ModelError::Validation(
            "water changes apply to a lab box or a pond, not a cage".into(),
        )),
        t => Ok(t),
    }
}

pub fn validate_volume_percent(v: f64) -> Result<f64, ModelError> {
    let v = validate::in_range("volume_percent", v, 0.0, 100.0)?;
    if v == 0.0 {
        return Err(ModelError::invalid("volume_percent", "must be greater than 0"));
    }
    Ok(v)
}

pub fn validate_temperature(v: Option<f64>) -> Result<Option<f64>, ModelError> {
    v.map(|t| validate::in_range("temperature_c", t, -5.0, 50.0)).transpose()
}

pub fn validate_ph(v: Option<f64>) -> Result<Option<f64>, ModelError> {
    v.map(|p| validate::in_range("ph", p, 0.0, 14.0)).transpose()
}
