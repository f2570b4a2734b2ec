//! What a feeding, water change or medication was applied to.
//!
//! Tables store the target as three nullable FK columns so the database can
//! cascade deletes; `Target` is the checked in-memory form.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::ModelError;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "id", rename_all = "snake_case")]
pub enum Target {
    LabBox(Uuid),
    Pond(Uuid),
    Cage(Uuid),
}

impl Target {
    /// Exactly one of the columns must be set.
    pub fn from_columns(lab_box_id: Option<Uuid>, pond_id: Option<Uuid>, cage_id: Option<Uuid>) -> Result<Self, ModelError> {
        match (lab_box_id, pond_id, cage_id) {
            (Some(id), None, None) => Ok(Target::LabBox(id)),
            (None, Some(id), None) => Ok(Target::Pond(id)),
            (None, None, Some(id)) => Ok(Target::Cage(id)),
            (None, None, None) => Err(ModelError::Validation(
                "one of lab_box_id, pond_id or cage_id is required".into(),
            )),
            _ => Err(ModelError::Validation(
                "only one of lab_box_id, pond_id or cage_id may be set".into(),
            )),
        }
    }

    /// `(lab_box_id, pond_id, cage_id)`
    pub fn columns(self) -> (Option<Uuid>, Option<Uuid>, Option<Uuid>) {
        match self {
            Target::LabBox(id) => (Some(id), None, None),
            Target::Pond(id) => (None, Some(id), None),
            Target::Cage(id) => (None, None, Some(id)),
        }
    }

    pub fn kind(self) -> &'static str {
        match self {
            Target::LabBox(_) => "lab_box",
            Target::Pond(_) => "fish_pond",
            Target::Cage(_) => "cage",
        }
    }

    pub fn id(self) -> Uuid {
        match self {
            Target::LabBox(id) | Target::Pond(id) | Target::Cage(id) => id,
        }
    }
}
