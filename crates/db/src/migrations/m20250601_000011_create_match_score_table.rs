//! Create match score table migration.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(MatchScore::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(MatchScore::Id)
                            .string_len(32)
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(MatchScore::LostItemId).string_len(32).not_null())
                    .col(ColumnDef::new(MatchScore::FoundItemId).string_len(32).not_null())
                    .col(ColumnDef::new(MatchScore::Score).double().not_null())
                    .col(ColumnDef::new(MatchScore::Breakdown).json_binary().not_null())
                    .col(
                        ColumnDef::new(MatchScore::ComputedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_match_score_lost_item")
                            .from(MatchScore::Table, MatchScore::LostItemId)
                            .to(LostItem::Table, LostItem::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_match_score_found_item")
                            .from(MatchScore::Table, MatchScore::FoundItemId)
                            .to(FoundItem::Table, FoundItem::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Unique index: (lost_item_id, found_item_id) - one cached score
        // per pair; batch recomputation updates in place
        manager
            .create_index(
                Index::create()
                    .name("idx_match_score_pair")
                    .table(MatchScore::Table)
                    .col(MatchScore::LostItemId)
                    .col(MatchScore::FoundItemId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // Index: found_item_id (the privacy gate looks up by found item)
        manager
            .create_index(
                Index::create()
                    .name("idx_match_score_found_item_id")
                    .table(MatchScore::Table)
                    .col(MatchScore::FoundItemId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(MatchScore::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum MatchScore {
    Table,
    Id,
    LostItemId,
    FoundItemId,
    Score,
    Breakdown,
    ComputedAt,
}

#[derive(Iden)]
enum LostItem {
    Table,
    Id,
}

#[derive(Iden)]
enum FoundItem {
    Table,
    Id,
}
