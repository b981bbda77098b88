//! Create tariff_plans table

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(TariffPlans::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(TariffPlans::Id)
                            .string_len(64)
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(TariffPlans::Name).string_len(100).not_null())
                    .col(ColumnDef::new(TariffPlans::Description).text())
                    .col(
                        ColumnDef::new(TariffPlans::Price)
                            .big_integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(TariffPlans::Currency)
                            .string_len(3)
                            .not_null()
                            .default("RUB"),
                    )
                    .col(
                        ColumnDef::new(TariffPlans::BillingPeriod)
                            .string_len(20)
                            .not_null()
                            .default("monthly"),
                    )
                    .col(
                        ColumnDef::new(TariffPlans::Features)
                            .text()
                            .not_null()
                            .default("[]"),
                    )
                    .col(
                        ColumnDef::new(TariffPlans::PublicationState)
                            .string_len(20)
                            .not_null()
                            .default("unpublished"),
                    )
                    .col(
                        ColumnDef::new(TariffPlans::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(TariffPlans::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        // Public catalogue reads filter on state and order by creation time
        manager
            .create_index(
                Index::create()
                    .name("idx_tariff_plans_state_created")
                    .table(TariffPlans::Table)
                    .col(TariffPlans::PublicationState)
                    .col(TariffPlans::CreatedAt)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(TariffPlans::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
pub enum TariffPlans {
    Table,
    Id,
    Name,
    Description,
    Price,
    Currency,
    BillingPeriod,
    Features,
    PublicationState,
    CreatedAt,
    UpdatedAt,
}
