use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(RetailerBranches::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(RetailerBranches::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(RetailerBranches::RetailerId)
                            .integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(RetailerBranches::BranchName)
                            .string()
                            .not_null(),
                    )
                    .col(ColumnDef::new(RetailerBranches::Address).string().not_null())
                    .col(ColumnDef::new(RetailerBranches::Phone).string())
                    .col(ColumnDef::new(RetailerBranches::BranchNumber).string())
                    .col(ColumnDef::new(RetailerBranches::RegistrationMessage).text())
                    .col(ColumnDef::new(RetailerBranches::LastResponse).text())
                    .col(
                        ColumnDef::new(RetailerBranches::CreatedAt)
                            .timestamp()
                            .not_null()
                            .default(SimpleExpr::Keyword(Keyword::CurrentTimestamp)),
                    )
                    .col(
                        ColumnDef::new(RetailerBranches::UpdatedAt)
                            .timestamp()
                            .default(SimpleExpr::Keyword(Keyword::CurrentTimestamp)),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_retailer_branches_retailer")
                            .from(RetailerBranches::Table, RetailerBranches::RetailerId)
                            .to(RetailerRegistrations::Table, RetailerRegistrations::Id),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(RetailerBranches::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum RetailerBranches {
    Table,
    Id,
    RetailerId,
    BranchName,
    Address,
    Phone,
    BranchNumber,
    RegistrationMessage,
    LastResponse,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum RetailerRegistrations {
    Table,
    Id,
}
