//! Create `water_change` table with optional water quality readings.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(WaterChange::Table)
                    .if_not_exists()
                    .col(uuid(WaterChange::Id).primary_key())
                    .col(uuid_null(WaterChange::LabBoxId))
                    .col(uuid_null(WaterChange::PondId))
                    .col(double(WaterChange::VolumePercent).not_null())
                    .col(double_null(WaterChange::TemperatureC))
                    .col(double_null(WaterChange::Ph))
                    .col(timestamp_with_time_zone(WaterChange::ChangedAt).not_null())
                    .col(text_null(WaterChange::Reason))
                    .col(timestamp_with_time_zone(WaterChange::CreatedAt).not_null())
                    .col(timestamp_with_time_zone(WaterChange::UpdatedAt).not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_water_change_lab_box")
                            .from(WaterChange::Table, WaterChange::LabBoxId)
                            .to(LabBox::Table, LabBox::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_water_change_fish_pond")
                            .from(WaterChange::Table, WaterChange::PondId)
                            .to(FishPond::Table, FishPond::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(WaterChange::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum WaterChange {
    Table,
    Id,
    LabBoxId,
    PondId,
    VolumePercent,
    TemperatureC,
    Ph,
    ChangedAt,
    Reason,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum LabBox { Table, Id }

#[derive(DeriveIden)]
enum FishPond { Table, Id }
