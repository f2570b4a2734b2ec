use sea_orm::entity::prelude::*;
use uuid::Uuid;
use serde::{Deserialize, Serialize};

use crate::{errors::ModelError, site, validate};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "fish_pond")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub site_id: Uuid,
    pub name: String,
    pub area_m2: f64,
    pub depth_m: Option<f64>,
    pub species: Option<String>,
    pub fish_count: i32,
    pub status: String,
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

pub const STATUSES: [&str; 3] = ["active", "fallow", "maintenance"];

pub fn validate_name(name: &str) -> Result<String, ModelError> {
    validate::required_text("name", name, 128)
}

pub fn validate_status(status: &str) -> Result<String, ModelError> {
    validate::one_of("status", status, &STATUSES)
}

pub fn validate_area(area_m2: f64) -> Result<f64, ModelError> {
    validate::positive("area_m2", area_m2)
}

pub fn validate_depth(depth_m: Option<f64>) -> Result<Option<f64>, ModelError> {
    depth_m.map(|d| validate::positive("depth_m", d)).transpose()
}
