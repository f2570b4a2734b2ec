use sea_orm::entity::prelude::*;
use uuid::Uuid;
use serde::{Deserialize, Serialize};

use crate::{errors::ModelError, site, validate};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "store")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub site_id: Uuid,
    pub name: String,
    pub feed_type: String,
    pub unit: String,
    pub quantity: f64,
    pub reorder_level: f64,
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

pub const DEFAULT_UNIT: &str = "kg";

impl Model {
    /// At or below the reorder level.
    pub fn is_low(&self) -> bool {
        self.quantity <= self.reorder_level
    }
}

pub fn validate_name(name: &str) -> Result<String, ModelError> {
    validate::required_text("name", name, 128)
}

pub fn validate_feed_type(feed_type: &str) -> Result<String, ModelError> {
    validate::required_text("feed_type", feed_type, 64)
}

pub fn validate_unit(unit: &str) -> Result<String, ModelError> {
    validate::required_text("unit", unit, 16)
}

pub fn validate_quantity(field: &str, v: f64) -> Result<f64, ModelError> {
    validate::non_negative(field, v).map(validate::round_quantity)
}
