//! Create claim attempt table migration.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(ClaimAttempt::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(ClaimAttempt::Id)
                            .string_len(32)
                            .not_null()
                            .primary_key(),
                    )
                    // No foreign key: attempts outlive the found item as
                    // historical record once a claim is finalized
                    .col(
                        ColumnDef::new(ClaimAttempt::FoundItemId)
                            .string_len(32)
                            .not_null(),
                    )
                    .col(ColumnDef::new(ClaimAttempt::ClaimantId).string_len(32).not_null())
                    .col(
                        ColumnDef::new(ClaimAttempt::ClaimantName)
                            .string_len(256)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(ClaimAttempt::ClaimantEmail)
                            .string_len(320)
                            .not_null(),
                    )
                    .col(ColumnDef::new(ClaimAttempt::Answers).json_binary().not_null())
                    .col(
                        ColumnDef::new(ClaimAttempt::Success)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(ClaimAttempt::AttemptedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(ClaimAttempt::MarkedPotentialAt)
                            .timestamp_with_time_zone(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_claim_attempt_claimant")
                            .from(ClaimAttempt::Table, ClaimAttempt::ClaimantId)
                            .to(User::Table, User::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Unique index: (found_item_id, claimant_id) - the one-attempt rule.
        // A race between two submissions from the same user resolves to a
        // constraint violation on the loser.
        manager
            .create_index(
                Index::create()
                    .name("idx_claim_attempt_item_claimant")
                    .table(ClaimAttempt::Table)
                    .col(ClaimAttempt::FoundItemId)
                    .col(ClaimAttempt::ClaimantId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // Index: claimant_id (account deletion and "my claims" listing)
        manager
            .create_index(
                Index::create()
                    .name("idx_claim_attempt_claimant_id")
                    .table(ClaimAttempt::Table)
                    .col(ClaimAttempt::ClaimantId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(ClaimAttempt::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum ClaimAttempt {
    Table,
    Id,
    FoundItemId,
    ClaimantId,
    ClaimantName,
    ClaimantEmail,
    Answers,
    Success,
    AttemptedAt,
    MarkedPotentialAt,
}

#[derive(Iden)]
enum User {
    Table,
    Id,
}
