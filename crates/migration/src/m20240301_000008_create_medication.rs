//! Create `medication` table.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Medication::Table)
                    .if_not_exists()
                    .col(uuid(Medication::Id).primary_key())
                    .col(uuid_null(Medication::LabBoxId))
                    .col(uuid_null(Medication::PondId))
                    .col(uuid_null(Medication::CageId))
                    .col(string_len(Medication::Medicine, 128).not_null())
                    .col(double(Medication::Dosage).not_null())
                    .col(string_len(Medication::DosageUnit, 16).not_null())
                    .col(timestamp_with_time_zone(Medication::AdministeredAt).not_null())
                    .col(integer_null(Medication::WithdrawalDays))
                    .col(text_null(Medication::Notes))
                    .col(timestamp_with_time_zone(Medication::CreatedAt).not_null())
                    .col(timestamp_with_time_zone(Medication::UpdatedAt).not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_medication_lab_box")
                            .from(Medication::Table, Medication::LabBoxId)
                            .to(LabBox::Table, LabBox::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_medication_fish_pond")
                            .from(Medication::Table, Medication::PondId)
                            .to(FishPond::Table, FishPond::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_medication_cage")
                            .from(Medication::Table, Medication::CageId)
                            .to(Cage::Table, Cage::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(Medication::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum Medication {
    Table,
    Id,
    LabBoxId,
    PondId,
    CageId,
    Medicine,
    Dosage,
    DosageUnit,
    AdministeredAt,
    WithdrawalDays,
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
