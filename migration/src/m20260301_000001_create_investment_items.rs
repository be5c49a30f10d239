use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(InvestmentItems::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(InvestmentItems::Id)
                            .string_len(36)
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(InvestmentItems::Instrument).string().not_null())
                    .col(
                        ColumnDef::new(InvestmentItems::AnalysisPoints)
                            .json_binary()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(InvestmentItems::FollowUpDate)
                            .string()
                            .not_null()
                            .default(""),
                    )
                    .col(
                        ColumnDef::new(InvestmentItems::FollowUpTime)
                            .string()
                            .not_null()
                            .default(""),
                    )
                    .col(ColumnDef::new(InvestmentItems::Image).text().null())
                    .col(
                        ColumnDef::new(InvestmentItems::CreationDate)
                            .string_len(32)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(InvestmentItems::Status)
                            .string_len(16)
                            .not_null()
                            .default("followUp"),
                    )
                    // Execution stage
                    .col(ColumnDef::new(InvestmentItems::ExecutedDate).string().null())
                    .col(ColumnDef::new(InvestmentItems::OpenPrice).string().null())
                    .col(ColumnDef::new(InvestmentItems::OpenReason).text().null())
                    .col(ColumnDef::new(InvestmentItems::ExecutedFollowUpDate).string().null())
                    .col(ColumnDef::new(InvestmentItems::ExecutedFollowUpTime).string().null())
                    .col(ColumnDef::new(InvestmentItems::ExecutedImage).text().null())
                    .col(ColumnDef::new(InvestmentItems::ExecutedAnalysis).json_binary().null())
                    // Closed stage
                    .col(ColumnDef::new(InvestmentItems::ClosedDate).string().null())
                    .col(ColumnDef::new(InvestmentItems::ClosePrice).string().null())
                    .col(ColumnDef::new(InvestmentItems::CloseReason).text().null())
                    .col(ColumnDef::new(InvestmentItems::ClosedImage).text().null())
                    .col(ColumnDef::new(InvestmentItems::ClosedAnalysis).json_binary().null())
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_investment_items_status")
                    .table(InvestmentItems::Table)
                    .col(InvestmentItems::Status)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_investment_items_creation_date")
                    .table(InvestmentItems::Table)
                    .col(InvestmentItems::CreationDate)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(InvestmentItems::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum InvestmentItems {
    Table,
    Id,
    Instrument,
    AnalysisPoints,
    FollowUpDate,
    FollowUpTime,
    Image,
    CreationDate,
    Status,
    ExecutedDate,
    OpenPrice,
    OpenReason,
    ExecutedFollowUpDate,
    ExecutedFollowUpTime,
    ExecutedImage,
    ExecutedAnalysis,
    ClosedDate,
    ClosePrice,
    CloseReason,
    ClosedImage,
    ClosedAnalysis,
}
