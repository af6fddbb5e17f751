//! Create successful return table migration.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(SuccessfulReturn::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(SuccessfulReturn::Id)
                            .string_len(32)
                            .not_null()
                            .primary_key(),
                    )
                    // Snapshot columns only; the archive must survive the
                    // deletion of every row it refers to
                    .col(
                        ColumnDef::new(SuccessfulReturn::FoundItemId)
                            .string_len(32)
                            .not_null(),
                    )
                    .col(ColumnDef::new(SuccessfulReturn::Title).string_len(256).not_null())
                    .col(ColumnDef::new(SuccessfulReturn::Description).text().not_null())
                    .col(
                        ColumnDef::new(SuccessfulReturn::CategoryId)
                            .string_len(32)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(SuccessfulReturn::LocationId)
                            .string_len(32)
                            .not_null(),
                    )
                    .col(ColumnDef::new(SuccessfulReturn::DateFound).date().not_null())
                    .col(ColumnDef::new(SuccessfulReturn::FinderId).string_len(32).not_null())
                    .col(
                        ColumnDef::new(SuccessfulReturn::FinderName)
                            .string_len(256)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(SuccessfulReturn::FinderEmail)
                            .string_len(320)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(SuccessfulReturn::ClaimantId)
                            .string_len(32)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(SuccessfulReturn::ClaimantName)
                            .string_len(256)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(SuccessfulReturn::ClaimantEmail)
                            .string_len(320)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(SuccessfulReturn::AnswersProvided)
                            .json_binary()
                            .not_null(),
                    )
                    .col(ColumnDef::new(SuccessfulReturn::Justification).text().not_null())
                    .col(
                        ColumnDef::new(SuccessfulReturn::VerificationCode)
                            .string_len(8)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(SuccessfulReturn::DaysToFinalize)
                            .integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(SuccessfulReturn::FinalizedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .to_owned(),
            )
            .await?;

        // Index: found_item_id (orphaned claim attempts resolve their
        // display data through this lookup)
        manager
            .create_index(
                Index::create()
                    .name("idx_successful_return_found_item_id")
                    .table(SuccessfulReturn::Table)
                    .col(SuccessfulReturn::FoundItemId)
                    .to_owned(),
            )
            .await?;

        // Index: finalized_at (stats over recent windows)
        manager
            .create_index(
                Index::create()
                    .name("idx_successful_return_finalized_at")
                    .table(SuccessfulReturn::Table)
                    .col(SuccessfulReturn::FinalizedAt)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(SuccessfulReturn::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum SuccessfulReturn {
    Table,
    Id,
    FoundItemId,
    Title,
    Description,
    CategoryId,
    LocationId,
    DateFound,
    FinderId,
    FinderName,
    FinderEmail,
    ClaimantId,
    ClaimantName,
    ClaimantEmail,
    AnswersProvided,
    Justification,
    VerificationCode,
    DaysToFinalize,
    FinalizedAt,
}
