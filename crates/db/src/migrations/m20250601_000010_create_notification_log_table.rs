//! Create notification log table migration.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(NotificationLog::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(NotificationLog::Id)
                            .string_len(32)
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(NotificationLog::ItemId).string_len(32).not_null())
                    .col(ColumnDef::new(NotificationLog::Kind).string_len(32).not_null())
                    .col(
                        ColumnDef::new(NotificationLog::SentAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .to_owned(),
            )
            .await?;

        // Unique index: (item_id, kind) - the sweep idempotency ledger.
        // Re-running a sweep conflicts here instead of re-notifying.
        manager
            .create_index(
                Index::create()
                    .name("idx_notification_log_item_kind")
                    .table(NotificationLog::Table)
                    .col(NotificationLog::ItemId)
                    .col(NotificationLog::Kind)
                    .unique()
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(NotificationLog::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum NotificationLog {
    Table,
    Id,
    ItemId,
    Kind,
    SentAt,
}
