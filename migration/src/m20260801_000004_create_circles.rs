use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Circles::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Circles::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(Circles::CircleId)
                            .string()
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(Circles::Name).string().not_null())
                    .col(ColumnDef::new(Circles::DivisionId).string().not_null())
                    .col(ColumnDef::new(Circles::ZoneId).string().not_null())
                    .col(
                        ColumnDef::new(Circles::UpdatedAt)
                            .timestamp()
                            .default(SimpleExpr::Keyword(Keyword::CurrentTimestamp)),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Circles::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Circles {
    Table,
    Id,
    CircleId,
    Name,
    DivisionId,
    ZoneId,
    UpdatedAt,
}
