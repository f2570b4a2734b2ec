use sea_orm::entity::prelude::*;
use uuid::Uuid;
use serde::{Deserialize, Serialize};

use crate::{cage, errors::ModelError, fish_pond, lab_box, target::Target, validate};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "medication")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub lab_box_id: Option<Uuid>,
    pub pond_id: Option<Uuid>,
    pub cage_id: Option<Uuid>,
    pub medicine: String,
    pub dosage: f64,
    pub dosage_unit: String,
    pub administered_at: DateTimeWithTimeZone,
    pub withdrawal_days: Option<i32>,
    pub notes: Option<String>,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter)]
pub enum Relation { LabBox, Pond, Cage }

impl RelationTrait for Relation {
    fn def(&self) -> RelationDef {
        match self {
            Relation::LabBox => Entity::belongs_to(lab_box::Entity).from(Column::LabBoxId).to(lab_box::Column::Id).into(),
            Relation::Pond => Entity::belongs_to(fish_pond::Entity).from(Column::PondId).to(fish_pond::Column::Id).into(),
            Relation::Cage => Entity::belongs_to(cage::Entity).from(Column::CageId).to(cage::Column::Id).into(),
        }
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn target(&self) -> Result<Target, ModelError> {
        Target::from_columns(self.lab_box_id, self.pond_id, self.cage_id)
    }
}

pub fn validate_medicine(medicine: &str) -> Result<String, ModelError> {
    validate::required_text("medicine", medicine, 128)
}

pub fn validate_dosage(dosage: f64) -> Result<f64, ModelError> {
    validate::positive("dosage", dosage)
}

pub fn validate_dosage_unit(unit: &str) -> Result<String, ModelError> {
    validate::required_text("dosage_unit", unit, 16)
}

pub fn validate_withdrawal_days(days: Option<i32>) -> Result<Option<i32>, ModelError> {
    days.map(|d| validate::non_negative_count("withdrawal_days", d)).transpose()
}
