//! Create `cage` table. Cages float inside a pond and go with it on delete.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Cage::Table)
                    .if_not_exists()
                    .col(uuid(Cage::Id).primary_key())
                    .col(uuid(Cage::PondId).not_null())
                    .col(string_len(Cage::Name, 128).not_null())
                    .col(string_len_null(Cage::Species, 128))
                    .col(integer(Cage::FishCount).not_null())
                    .col(timestamp_with_time_zone(Cage::CreatedAt).not_null())
                    .col(timestamp_with_time_zone(Cage::UpdatedAt).not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_cage_fish_pond")
                            .from(Cage::Table, Cage::PondId)
                            .to(FishPond::Table, FishPond::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(Cage::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum Cage { Table, Id, PondId, Name, Species, FishCount, CreatedAt, UpdatedAt }

#[derive(DeriveIden)]
enum FishPond { Table, Id }
