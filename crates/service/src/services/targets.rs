use models::{cage, fish_pond, lab_box, target::Target};
use sea_orm::{ConnectionTrait, EntityTrait};

use crate::errors::{db_err, ServiceError};

/// Fail with `NotFound` unless the row a record points at exists.
pub(crate) async fn ensure_target_exists<C: ConnectionTrait>(conn: &C, target: Target) -> Result<(), ServiceError> {
    let found = match target {
        Target::LabBox(id) => lab_box::Entity::find_by_id(id).one(conn).await.map_err(db_err)?.is_some(),
        Target::Pond(id) => fish_pond::Entity::find_by_id(id).one(conn).await.map_err(db_err)?.is_some(),
        Target::Cage(id) => cage::Entity::find_by_id(id).one(conn).await.map_err(db_err)?.is_some(),
    };
    if !found {
        return Err(ServiceError::not_found(target.kind()));
    }
    Ok(())
}
