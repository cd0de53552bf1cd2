use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(VendorConfiguration::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(VendorConfiguration::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(VendorConfiguration::BaseUrl)
                            .string()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(VendorConfiguration::ClientId)
                            .string()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(VendorConfiguration::ClientSecret)
                            .string()
                            .not_null(),
                    )
                    .col(ColumnDef::new(VendorConfiguration::AccessToken).string())
                    .col(ColumnDef::new(VendorConfiguration::TokenExpiry).timestamp())
                    .col(ColumnDef::new(VendorConfiguration::CompanyId).string())
                    .col(
                        ColumnDef::new(VendorConfiguration::Disabled)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(VendorConfiguration::SyncSchedule)
                            .string()
                            .not_null()
                            .default("Scheduled"),
                    )
                    .col(
                        ColumnDef::new(VendorConfiguration::UpdatedAt)
                            .timestamp()
                            .default(SimpleExpr::Keyword(Keyword::CurrentTimestamp)),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(VendorConfiguration::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum VendorConfiguration {
    Table,
    Id,
    BaseUrl,
    ClientId,
    ClientSecret,
    AccessToken,
    TokenExpiry,
    CompanyId,
    Disabled,
    SyncSchedule,
    UpdatedAt,
}
