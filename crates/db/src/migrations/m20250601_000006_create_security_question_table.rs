//! Create security question table migration.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(SecurityQuestion::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(SecurityQuestion::Id)
                            .string_len(32)
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(SecurityQuestion::FoundItemId)
                            .string_len(32)
                            .not_null(),
                    )
                    .col(ColumnDef::new(SecurityQuestion::Question).text().not_null())
                    .col(ColumnDef::new(SecurityQuestion::Kind).string_len(16).not_null())
                    .col(ColumnDef::new(SecurityQuestion::ChoiceA).string_len(256))
                    .col(ColumnDef::new(SecurityQuestion::ChoiceB).string_len(256))
                    .col(ColumnDef::new(SecurityQuestion::ChoiceC).string_len(256))
                    .col(ColumnDef::new(SecurityQuestion::ChoiceD).string_len(256))
                    .col(ColumnDef::new(SecurityQuestion::Answer).string_len(256).not_null())
                    .col(ColumnDef::new(SecurityQuestion::CorrectChoice).string_len(1))
                    .col(
                        ColumnDef::new(SecurityQuestion::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_security_question_found_item")
                            .from(SecurityQuestion::Table, SecurityQuestion::FoundItemId)
                            .to(FoundItem::Table, FoundItem::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Index: found_item_id (questions are always fetched per item)
        manager
            .create_index(
                Index::create()
                    .name("idx_security_question_found_item_id")
                    .table(SecurityQuestion::Table)
                    .col(SecurityQuestion::FoundItemId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(SecurityQuestion::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum SecurityQuestion {
    Table,
    Id,
    FoundItemId,
    Question,
    Kind,
    ChoiceA,
    ChoiceB,
    ChoiceC,
    ChoiceD,
    Answer,
    CorrectChoice,
    CreatedAt,
}

#[derive(Iden)]
enum FoundItem {
    Table,
    Id,
}
