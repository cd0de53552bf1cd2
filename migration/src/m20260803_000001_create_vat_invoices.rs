use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(VatInvoices::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(VatInvoices::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(VatInvoices::InvoiceNumber)
                            .string()
                            .not_null()
                            .unique_key(),
                    )
                    .col(
                        ColumnDef::new(VatInvoices::InvoiceDate)
                            .timestamp()
                            .not_null(),
                    )
                    .col(ColumnDef::new(VatInvoices::OrderId).string().not_null())
                    .col(ColumnDef::new(VatInvoices::CustomerId).string())
                    .col(ColumnDef::new(VatInvoices::RetailerNumber).string().not_null())
                    .col(ColumnDef::new(VatInvoices::Branch).string())
                    .col(
                        ColumnDef::new(VatInvoices::ServiceTypeCode)
                            .string()
                            .not_null(),
                    )
                    .col(ColumnDef::new(VatInvoices::ZoneId).string().not_null())
                    .col(ColumnDef::new(VatInvoices::DivisionId).string().not_null())
                    .col(ColumnDef::new(VatInvoices::CircleId).string().not_null())
                    .col(
                        ColumnDef::new(VatInvoices::TxnAmount)
                            .decimal_len(14, 2)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(VatInvoices::TotalSdPercentage)
                            .decimal_len(8, 4)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(VatInvoices::TotalSdAmount)
                            .decimal_len(14, 2)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(VatInvoices::TotalDiscountAmount)
                            .decimal_len(14, 2)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(VatInvoices::TotalServiceChargesAmount)
                            .decimal_len(14, 2)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(VatInvoices::TotalAmount)
                            .decimal_len(14, 2)
                            .not_null(),
                    )
                    .col(ColumnDef::new(VatInvoices::PaymentMethod).string().not_null())
                    .col(
                        ColumnDef::new(VatInvoices::Status)
                            .string_len(20)
                            .not_null(),
                    )
                    .col(ColumnDef::new(VatInvoices::ChallanId).string())
                    .col(ColumnDef::new(VatInvoices::ReturnedAmount).decimal_len(14, 2))
                    .col(ColumnDef::new(VatInvoices::ReturnInvoiceNo).string())
                    .col(ColumnDef::new(VatInvoices::RawResponse).text())
                    .col(ColumnDef::new(VatInvoices::SyncedAt).timestamp())
                    .col(
                        ColumnDef::new(VatInvoices::CreatedAt)
                            .timestamp()
                            .not_null()
                            .default(SimpleExpr::Keyword(Keyword::CurrentTimestamp)),
                    )
                    .col(
                        ColumnDef::new(VatInvoices::UpdatedAt)
                            .timestamp()
                            .default(SimpleExpr::Keyword(Keyword::CurrentTimestamp)),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_vat_invoices_status")
                    .table(VatInvoices::Table)
                    .col(VatInvoices::Status)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_vat_invoices_invoice_date")
                    .table(VatInvoices::Table)
                    .col(VatInvoices::InvoiceDate)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(VatInvoices::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum VatInvoices {
    Table,
    Id,
    InvoiceNumber,
    InvoiceDate,
    OrderId,
    CustomerId,
    RetailerNumber,
    Branch,
    ServiceTypeCode,
    ZoneId,
    DivisionId,
    CircleId,
    TxnAmount,
    TotalSdPercentage,
    TotalSdAmount,
    TotalDiscountAmount,
    TotalServiceChargesAmount,
    TotalAmount,
    PaymentMethod,
    Status,
    ChallanId,
    ReturnedAmount,
    ReturnInvoiceNo,
    RawResponse,
    SyncedAt,
    CreatedAt,
    UpdatedAt,
}
