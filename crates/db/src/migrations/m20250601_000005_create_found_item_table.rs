//! Create found item table migration.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(FoundItem::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(FoundItem::Id).string_len(32).not_null().primary_key())
                    .col(ColumnDef::new(FoundItem::FinderId).string_len(32).not_null())
                    .col(ColumnDef::new(FoundItem::Title).string_len(256).not_null())
                    .col(ColumnDef::new(FoundItem::Description).text().not_null())
                    .col(ColumnDef::new(FoundItem::CategoryId).string_len(32).not_null())
                    .col(ColumnDef::new(FoundItem::LocationId).string_len(32).not_null())
                    .col(ColumnDef::new(FoundItem::Color).string_len(64))
                    .col(ColumnDef::new(FoundItem::Size).string_len(64))
                    .col(ColumnDef::new(FoundItem::DateFound).date().not_null())
                    .col(ColumnDef::new(FoundItem::TimeFound).string_len(64))
                    .col(ColumnDef::new(FoundItem::FinderName).string_len(256).not_null())
                    .col(ColumnDef::new(FoundItem::FinderEmail).string_len(320).not_null())
                    .col(ColumnDef::new(FoundItem::FinderPhone).string_len(32))
                    .col(ColumnDef::new(FoundItem::FinderNotes).text())
                    .col(
                        ColumnDef::new(FoundItem::CurrentLocation)
                            .string_len(256)
                            .not_null()
                            .default("Front Desk"),
                    )
                    .col(
                        ColumnDef::new(FoundItem::IsClaimed)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(FoundItem::PrivacyExpiresAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(FoundItem::FirstPotentialMarkedAt)
                            .timestamp_with_time_zone(),
                    )
                    .col(ColumnDef::new(FoundItem::ImageFilename).string_len(256))
                    .col(
                        ColumnDef::new(FoundItem::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(ColumnDef::new(FoundItem::UpdatedAt).timestamp_with_time_zone())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_found_item_finder")
                            .from(FoundItem::Table, FoundItem::FinderId)
                            .to(User::Table, User::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_found_item_category")
                            .from(FoundItem::Table, FoundItem::CategoryId)
                            .to(Category::Table, Category::Id),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_found_item_location")
                            .from(FoundItem::Table, FoundItem::LocationId)
                            .to(Location::Table, Location::Id),
                    )
                    .to_owned(),
            )
            .await?;

        // Index: finder_id (for the finder's listing)
        manager
            .create_index(
                Index::create()
                    .name("idx_found_item_finder_id")
                    .table(FoundItem::Table)
                    .col(FoundItem::FinderId)
                    .to_owned(),
            )
            .await?;

        // Index: is_claimed (listings and batch matching scan open items)
        manager
            .create_index(
                Index::create()
                    .name("idx_found_item_is_claimed")
                    .table(FoundItem::Table)
                    .col(FoundItem::IsClaimed)
                    .to_owned(),
            )
            .await?;

        // Index: privacy_expires_at (the hourly sweep scans the boundary)
        manager
            .create_index(
                Index::create()
                    .name("idx_found_item_privacy_expires_at")
                    .table(FoundItem::Table)
                    .col(FoundItem::PrivacyExpiresAt)
                    .to_owned(),
            )
            .await?;

        // Index: created_at (newest-first listings and tie-breaks)
        manager
            .create_index(
                Index::create()
                    .name("idx_found_item_created_at")
                    .table(FoundItem::Table)
                    .col(FoundItem::CreatedAt)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(FoundItem::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum FoundItem {
    Table,
    Id,
    FinderId,
    Title,
    Description,
    CategoryId,
    LocationId,
    Color,
    Size,
    DateFound,
    TimeFound,
    FinderName,
    FinderEmail,
    FinderPhone,
    FinderNotes,
    CurrentLocation,
    IsClaimed,
    PrivacyExpiresAt,
    FirstPotentialMarkedAt,
    ImageFilename,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum User {
    Table,
    Id,
}

#[derive(Iden)]
enum Category {
    Table,
    Id,
}

#[derive(Iden)]
enum Location {
    Table,
    Id,
}
