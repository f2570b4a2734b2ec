use sea_orm::DatabaseConnection;

use crate::events::EventHub;

/// Shared handler state; cheap to clone per request.
#[derive(Clone)]
pub struct ServerState {
    pub db: DatabaseConnection,
    pub events: EventHub,
}

impl ServerState {
    pub fn new(db: DatabaseConnection, events: EventHub) -> Self {
        Self { db, events }
    }
}
