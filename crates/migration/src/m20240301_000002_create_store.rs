//! Create `store` table.
//!
//! Feed stock kept at a site; `quantity` is the running balance.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Store::Table)
                    .if_not_exists()
                    .col(uuid(Store::Id).primary_key())
                    .col(uuid(Store::SiteId).not_null())
                    .col(string_len(Store::Name, 128).not_null())
                    .col(string_len(Store::FeedType, 64).not_null())
                    .col(string_len(Store::Unit, 16).not_null())
                    .col(double(Store::Quantity).not_null())
                    .col(double(Store::ReorderLevel).not_null())
                    .col(timestamp_with_time_zone(Store::CreatedAt).not_null())
                    .col(timestamp_with_time_zone(Store::UpdatedAt).not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_store_site")
                            .from(Store::Table, Store::SiteId)
                            .to(Site::Table, Site::Id)
                            .on_delete(ForeignKeyAction::Restrict)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(Store::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum Store { Table, Id, SiteId, Name, FeedType, Unit, Quantity, ReorderLevel, CreatedAt, UpdatedAt }

#[derive(DeriveIden)]
enum Site { Table, Id }
