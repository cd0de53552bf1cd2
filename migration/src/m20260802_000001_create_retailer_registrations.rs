use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(RetailerRegistrations::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(RetailerRegistrations::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(RetailerRegistrations::BusinessName)
                            .string()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(RetailerRegistrations::OwnerName)
                            .string()
                            .not_null(),
                    )
                    .col(ColumnDef::new(RetailerRegistrations::NidNumber).string().not_null())
                    .col(ColumnDef::new(RetailerRegistrations::BinNumber).string())
                    .col(ColumnDef::new(RetailerRegistrations::Phone).string().not_null())
                    .col(ColumnDef::new(RetailerRegistrations::Email).string())
                    .col(ColumnDef::new(RetailerRegistrations::Address).string().not_null())
                    .col(ColumnDef::new(RetailerRegistrations::ZoneId).string().not_null())
                    .col(
                        ColumnDef::new(RetailerRegistrations::DivisionId)
                            .string()
                            .not_null(),
                    )
                    .col(ColumnDef::new(RetailerRegistrations::CircleId).string().not_null())
                    .col(
                        ColumnDef::new(RetailerRegistrations::CommissionRateId)
                            .string()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(RetailerRegistrations::ServiceTypes)
                            .json()
                            .not_null(),
                    )
                    .col(ColumnDef::new(RetailerRegistrations::RetailerNumber).string())
                    .col(ColumnDef::new(RetailerRegistrations::RegistrationMessage).text())
                    .col(ColumnDef::new(RetailerRegistrations::NidDocumentUrl).string())
                    .col(ColumnDef::new(RetailerRegistrations::TradeLicenseUrl).string())
                    .col(ColumnDef::new(RetailerRegistrations::TinCertificateUrl).string())
                    .col(ColumnDef::new(RetailerRegistrations::LastResponse).text())
                    .col(
                        ColumnDef::new(RetailerRegistrations::CreatedAt)
                            .timestamp()
                            .not_null()
                            .default(SimpleExpr::Keyword(Keyword::CurrentTimestamp)),
                    )
                    .col(
                        ColumnDef::new(RetailerRegistrations::UpdatedAt)
                            .timestamp()
                            .default(SimpleExpr::Keyword(Keyword::CurrentTimestamp)),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(RetailerRegistrations::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum RetailerRegistrations {
    Table,
    Id,
    BusinessName,
    OwnerName,
    NidNumber,
    BinNumber,
    Phone,
    Email,
    Address,
    ZoneId,
    DivisionId,
    CircleId,
    CommissionRateId,
    ServiceTypes,
    RetailerNumber,
    RegistrationMessage,
    NidDocumentUrl,
    TradeLicenseUrl,
    TinCertificateUrl,
    LastResponse,
    CreatedAt,
    UpdatedAt,
}
