use sea_orm::entity::prelude::*;
use uuid::Uuid;
use serde::{Deserialize, Serialize};

use crate::{errors::ModelError, site, validate};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "lab_box")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub site_id: Uuid,
    pub code: String,
    pub species: Option<String>,
    pub stage: String,
    pub stock_count: i32,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter)]
pub enum Relation { Site }

impl RelationTrait for Relation {
    fn def(&self) -> RelationDef {
        match self {
            Relation::Site => Entity::belongs_to(site::Entity).from(Column::SiteId).to(site::Column::Id).into(),
        }
    }
}

impl ActiveModelBehavior for ActiveModel {}

pub const STAGES: [&str; 4] = ["egg", "larva", "fry", "empty"];

pub fn validate_code(code: &str) -> Result<String, ModelError> {
    validate::required_text("code", code, 64)
}

pub fn validate_stage(stage: &str) -> Result<String, ModelError> {
    validate::one_of("stage", stage, &STAGES)
}
