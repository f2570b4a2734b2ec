use sea_orm::entity::prelude::*;
use uuid::Uuid;
use serde::{Deserialize, Serialize};

use crate::{cage, errors::ModelError, fish_pond, lab_box, store, target::Target, validate};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "feeding")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub lab_box_id: Option<Uuid>,
    pub pond_id: Option<Uuid>,
    pub cage_id: Option<Uuid>,
    pub store_id: Uuid,
    pub quantity: f64,
    pub fed_at: DateTimeWithTimeZone,
    pub notes: Option<String>,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter)]
pub enum Relation { LabBox, Pond, Cage, Store }

impl RelationTrait for Relation {
    fn def(&self) -> RelationDef {
        match self {
            Relation::LabBox => Entity::belongs_to(lab_box::Entity).from(Column::LabBoxId).to(lab_box::Column::Id).into(),
            Relation::Pond => Entity::belongs_to(fish_pond::Entity).from(Column::PondId).to(fish_pond::Column::Id).into(),
            Relation::Cage => Entity::belongs_to(cage::Entity).from(Column::CageId).to(cage::Column::Id).into(),
            Relation::Store => Entity::belongs_to(store::Entity).from(Column::StoreId).to(store::Column::Id).into(),
        }
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn target(&self) -> Result<Target, ModelError> {
        Target::from_columns(self.lab_box_id, self.pond_id, self.cage_id)
    }
}

pub fn validate_quantity(quantity: f64) -> Result<f64, ModelError> {
    let q = validate::round_quantity(validate::positive("quantity", quantity)?);
    if q == 0.0 {
        return Err(ModelError::invalid("quantity", "must be at least 0.001"));
    }
    Ok(q)
}
