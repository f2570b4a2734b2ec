//! Create `site` table.
//!
//! A site is a physical farm/hatchery location owning stores, lab boxes and ponds.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Site::Table)
                    .if_not_exists()
                    .col(uuid(Site::Id).primary_key())
                    .col(string_len(Site::Name, 128).unique_key().not_null())
                    .col(string_len_null(Site::Location, 256))
                    .col(text_null(Site::Description))
                    .col(timestamp_with_time_zone(Site::CreatedAt).not_null())
                    .col(timestamp_with_time_zone(Site::UpdatedAt).not_null())
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(Site::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum Site { Table, Id, Name, Location, Description, CreatedAt, UpdatedAt }
