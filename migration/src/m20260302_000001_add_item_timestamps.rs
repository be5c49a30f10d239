use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // SQLite only accepts one column per ALTER TABLE
        manager
            .alter_table(
                Table::alter()
                    .table(InvestmentItems::Table)
                    .add_column(
                        ColumnDef::new(InvestmentItems::CreatedAt)
                            .timestamp_with_time_zone()
                            .null(),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .alter_table(
                Table::alter()
                    .table(InvestmentItems::Table)
                    .add_column(
                        ColumnDef::new(InvestmentItems::UpdatedAt)
                            .timestamp_with_time_zone()
                            .null(),
                    )
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .alter_table(
                Table::alter()
                    .table(InvestmentItems::Table)
                    .drop_column(InvestmentItems::UpdatedAt)
                    .to_owned(),
            )
            .await?;

        manager
            .alter_table(
                Table::alter()
                    .table(InvestmentItems::Table)
                    .drop_column(InvestmentItems::CreatedAt)
                    .to_owned(),
            )
            .await
    }
}

#[derive(DeriveIden)]
enum InvestmentItems {
    Table,
    CreatedAt,
    UpdatedAt,
}
