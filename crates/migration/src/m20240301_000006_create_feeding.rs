//! Create `feeding` table.
//!
//! One row per feeding event. Exactly one of the three target columns is set;
//! the service layer enforces that and keeps `store.quantity` in step.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Feeding::Table)
                    .if_not_exists()
                    .col(uuid(Feeding::Id).primary_key())
                    .col(uuid_null(Feeding::LabBoxId))
                    .col(uuid_null(Feeding::PondId))
                    .col(uuid_null(Feeding::CageId))
                    .col(uuid(Feeding::StoreId).not_null())
                    .col(double(Feeding::Quantity).not_null())
                    .col(timestamp_with_time_zone(Feeding::FedAt).not_null())
                    .col(text_null(Feeding::Notes))
                    .col(timestamp_with_time_zone(Feeding::CreatedAt).not_null())
                    .col(timestamp_with_time_zone(Feeding::UpdatedAt).not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_feeding_lab_box")
                            .from(Feeding::Table, Feeding::LabBoxId)
                            .to(LabBox::Table, LabBox::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_feeding_fish_pond")
                            .from(Feeding::Table, Feeding::PondId)
                            .to(FishPond::Table, FishPond::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_feeding_cage")
                            .from(Feeding::Table, Feeding::CageId)
                            .to(Cage::Table, Cage::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_feeding_store")
                            .from(Feeding::Table, Feeding::StoreId)
                            .to(Store::Table, Store::Id)
                            .on_delete(ForeignKeyAction::Restrict)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(Feeding::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum Feeding {
    Table,
    Id,
    LabBoxId,
    PondId,
    CageId,
    StoreId,
    Quantity,
    FedAt,
    Notes,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum LabBox { Table, Id }

#[derive(DeriveIden)]
enum FishPond { Table, Id }

#[derive(DeriveIden)]
enum Cage { Table, Id }

#[derive(DeriveIden)]
enum Store { Table, Id }
