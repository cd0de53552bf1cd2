use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(CommissionRates::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(CommissionRates::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(CommissionRates::CommissionRateId)
                            .string()
                            .not_null()
                            .unique_key(),
                    )
                    .col(
                        ColumnDef::new(CommissionRates::Rate)
                            .decimal_len(8, 4)
                            .not_null(),
                    )
                    .col(ColumnDef::new(CommissionRates::ZoneId).string().not_null())
                    .col(ColumnDef::new(CommissionRates::DivisionId).string())
                    .col(ColumnDef::new(CommissionRates::CircleId).string())
                    .col(ColumnDef::new(CommissionRates::ServiceTypeCode).string())
                    .col(
                        ColumnDef::new(CommissionRates::UpdatedAt)
                            .timestamp()
                            .default(SimpleExpr::Keyword(Keyword::CurrentTimestamp)),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(CommissionRates::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum CommissionRates {
    Table,
    Id,
    CommissionRateId,
    Rate,
    ZoneId,
    DivisionId,
    CircleId,
    ServiceTypeCode,
    UpdatedAt,
}
