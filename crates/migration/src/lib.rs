//! Migrator registering entity-specific migrations in dependency order.
//! Indexes are applied last.
pub use sea_orm_migration::prelude::*;

mod m20240301_000001_create_site;
mod m20240301_000002_create_store;
mod m20240301_000003_create_lab_box;
mod m20240301_000004_create_fish_pond;
mod m20240301_000005_create_cage;
mod m20240301_000006_create_feeding;
mod m20240301_000007_create_water_change;
mod m20240301_000008_create_medication;
mod m20240301_000009_add_indexes;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20240301_000001_create_site::Migration),
            Box::new(m20240301_000002_create_store::Migration),
            Box::new(m20240301_000003_create_lab_box::Migration),
            Box::new(m20240301_000004_create_fish_pond::Migration),
            Box::new(m20240301_000005_create_cage::Migration),
            Box::new(m20240301_000006_create_feeding::Migration),
            Box::new(m20240301_000007_create_water_change::Migration),
            Box::new(m20240301_000008_create_medication::Migration),
            // Indexes should always be applied last
            Box::new(m20240301_000009_add_indexes::Migration),
        ]
    }
}
