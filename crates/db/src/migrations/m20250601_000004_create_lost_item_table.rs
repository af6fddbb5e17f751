//! Create lost item table migration.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(LostItem::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(LostItem::Id).string_len(32).not_null().primary_key())
                    .col(ColumnDef::new(LostItem::OwnerId).string_len(32).not_null())
                    .col(ColumnDef::new(LostItem::Title).string_len(256).not_null())
                    .col(ColumnDef::new(LostItem::Description).text().not_null())
                    .col(ColumnDef::new(LostItem::CategoryId).string_len(32).not_null())
                    .col(ColumnDef::new(LostItem::LocationId).string_len(32).not_null())
                    .col(ColumnDef::new(LostItem::Color).string_len(64))
                    .col(ColumnDef::new(LostItem::Size).string_len(64))
                    .col(ColumnDef::new(LostItem::DateLost).date().not_null())
                    .col(ColumnDef::new(LostItem::TimeLost).string_len(64))
                    .col(ColumnDef::new(LostItem::OwnerName).string_len(256).not_null())
                    .col(ColumnDef::new(LostItem::OwnerEmail).string_len(320).not_null())
                    .col(ColumnDef::new(LostItem::OwnerPhone).string_len(32))
                    .col(ColumnDef::new(LostItem::AdditionalDetails).text())
                    .col(ColumnDef::new(LostItem::ImageFilename).string_len(256))
                    .col(
                        ColumnDef::new(LostItem::IsResolved)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(LostItem::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(ColumnDef::new(LostItem::UpdatedAt).timestamp_with_time_zone())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_lost_item_owner")
                            .from(LostItem::Table, LostItem::OwnerId)
                            .to(User::Table, User::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_lost_item_category")
                            .from(LostItem::Table, LostItem::CategoryId)
                            .to(Category::Table, Category::Id),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_lost_item_location")
                            .from(LostItem::Table, LostItem::LocationId)
                            .to(Location::Table, Location::Id),
                    )
                    .to_owned(),
            )
            .await?;

        // Index: owner_id (for the owner's listing)
        manager
            .create_index(
                Index::create()
                    .name("idx_lost_item_owner_id")
                    .table(LostItem::Table)
                    .col(LostItem::OwnerId)
                    .to_owned(),
            )
            .await?;

        // Index: is_resolved (batch matching scans unresolved items)
        manager
            .create_index(
                Index::create()
                    .name("idx_lost_item_is_resolved")
                    .table(LostItem::Table)
                    .col(LostItem::IsResolved)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(LostItem::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum LostItem {
    Table,
    Id,
    OwnerId,
    Title,
    Description,
    CategoryId,
    LocationId,
    Color,
    Size,
    DateLost,
    TimeLost,
    OwnerName,
    OwnerEmail,
    OwnerPhone,
    AdditionalDetails,
    ImageFilename,
    IsResolved,
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
