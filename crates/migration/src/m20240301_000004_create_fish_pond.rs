//! Create `fish_pond` table.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(FishPond::Table)
                    .if_not_exists()
                    .col(uuid(FishPond::Id).primary_key())
                    .col(uuid(FishPond::SiteId).not_null())
                    .col(string_len(FishPond::Name, 128).not_null())
                    .col(double(FishPond::AreaM2).not_null())
                    .col(double_null(FishPond::DepthM))
                    .col(string_len_null(FishPond::Species, 128))
                    .col(integer(FishPond::FishCount).not_null())
                    .col(string_len(FishPond::Status, 16).not_null())
                    .col(timestamp_with_time_zone(FishPond::CreatedAt).not_null())
                    .col(timestamp_with_time_zone(FishPond::UpdatedAt).not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_fish_pond_site")
                            .from(FishPond::Table, FishPond::SiteId)
                            .to(Site::Table, Site::Id)
                            .on_delete(ForeignKeyAction::Restrict)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(FishPond::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum FishPond { Table, Id, SiteId, Name, AreaM2, DepthM, Species, FishCount, Status, CreatedAt, UpdatedAt }

#[derive(DeriveIden)]
enum Site { Table, Id }
