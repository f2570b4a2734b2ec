use sea_orm::entity::prelude::*;
use uuid::Uuid;
use serde::{Deserialize, Serialize};

use crate::{errors::ModelError, fish_pond, validate};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "cage")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub pond_id: Uuid,
    pub name: String,
    pub species: Option<String>,
    pub fish_count: i32,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter)]
pub enum Relation { Pond }

impl RelationTrait for Relation {
    fn def(&self) -> RelationDef {
        match self {
            Relation::Pond => Entity::belongs_to(fish_pond::Entity).from(Column::PondId).to(fish_pond::Column::Id).into(),
        }
    }
}

impl ActiveModelBehavior for ActiveModel {}

pub fn validate_name(name: &str) -> Result<String, ModelError> {
    validate::required_text("name", name, 128)
}
