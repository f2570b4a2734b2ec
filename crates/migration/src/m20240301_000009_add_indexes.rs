use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // LabBox: code is unique within a site
        manager
            .create_index(
                Index::create()
                    .name("uniq_lab_box_site_code")
                    .table(LabBox::Table)
                    .col(LabBox::SiteId)
                    .col(LabBox::Code)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // Store / FishPond: listed per site
        manager
            .create_index(
                Index::create()
                    .name("idx_store_site")
                    .table(Store::Table)
                    .col(Store::SiteId)
                    .to_owned(),
            )
            .await?;
        manager
            .create_index(
                Index::create()
                    .name("idx_fish_pond_site")
                    .table(FishPond::Table)
                    .col(FishPond::SiteId)
                    .to_owned(),
            )
            .await?;

        // Feeding: store lookups guard store deletion; history is read newest-first
        manager
            .create_index(
                Index::create()
                    .name("idx_feeding_store")
                    .table(Feeding::Table)
                    .col(Feeding::StoreId)
                    .to_owned(),
            )
            .await?;
        manager
            .create_index(
                Index::create()
                    .name("idx_feeding_fed_at")
                    .table(Feeding::Table)
                    .col(Feeding::FedAt)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_water_change_changed_at")
                    .table(WaterChange::Table)
                    .col(WaterChange::ChangedAt)
                    .to_owned(),
            )
            .await?;
        manager
            .create_index(
                Index::create()
                    .name("idx_medication_administered_at")
                    .table(Medication::Table)
                    .col(Medication::AdministeredAt)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(Index::drop().name("uniq_lab_box_site_code").table(LabBox::Table).to_owned())
            .await?;
        manager
            .drop_index(Index::drop().name("idx_store_site").table(Store::Table).to_owned())
            .await?;
        manager
            .drop_index(Index::drop().name("idx_fish_pond_site").table(FishPond::Table).to_owned())
            .await?;
        manager
            .drop_index(Index::drop().name("idx_feeding_store").table(Feeding::Table).to_owned())
            .await?;
        manager
            .drop_index(Index::drop().name("idx_feeding_fed_at").table(Feeding::Table).to_owned())
            .await?;
        manager
            .drop_index(Index::drop().name("idx_water_change_changed_at").table(WaterChange::Table).to_owned())
            .await?;
        manager
            .drop_index(Index::drop().name("idx_medication_administered_at").table(Medication::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum LabBox { Table, SiteId, Code }

#[derive(DeriveIden)]
enum Store { Table, SiteId }

#[derive(DeriveIden)]
enum FishPond { Table, SiteId }

#[derive(DeriveIden)]
enum Feeding { Table, StoreId, FedAt }

#[derive(DeriveIden)]
enum WaterChange { Table, ChangedAt }

#[derive(DeriveIden)]
enum Medication { Table, AdministeredAt }
