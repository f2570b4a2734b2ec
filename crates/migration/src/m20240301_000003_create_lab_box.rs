//! Create `lab_box` table.
//!
//! Incubation/rearing boxes in the laboratory; `stage` tracks egg → fry.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(LabBox::Table)
                    .if_not_exists()
                    .col(uuid(LabBox::Id).primary_key())
                    .col(uuid(LabBox::SiteId).not_null())
                    .col(string_len(LabBox::Code, 64).not_null())
                    .col(string_len_null(LabBox::Species, 128))
                    .col(string_len(LabBox::Stage, 16).not_null())
                    .col(integer(LabBox::StockCount).not_null())
                    .col(timestamp_with_time_zone(LabBox::CreatedAt).not_null())
                    .col(timestamp_with_time_zone(LabBox::UpdatedAt).not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_lab_box_site")
                            .from(LabBox::Table, LabBox::SiteId)
                            .to(Site::Table, Site::Id)
                            .on_delete(ForeignKeyAction::Restrict)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(LabBox::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum LabBox { Table, Id, SiteId, Code, Species, Stage, StockCount, CreatedAt, UpdatedAt }

#[derive(DeriveIden)]
enum Site { Table, Id }
