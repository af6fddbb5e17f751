//! Lost item repository.

use std::sync::Arc;

use crate::entities::{LostItem, lost_item};
use reclaim_common::{AppError, AppResult};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, ModelTrait, PaginatorTrait,
    QueryFilter, QueryOrder, QuerySelect,
};

/// Lost item repository for database operations.
#[derive(Clone)]
pub struct LostItemRepository {
    db: Arc<DatabaseConnection>,
}

impl LostItemRepository {
    /// Create a new lost item repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Find a lost item by ID.
    pub async fn find_by_id(&self, id: &str) -> AppResult<Option<lost_item::Model>> {
        LostItem::find_by_id(id)
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Find a lost item by ID, returning an error if not found.
    pub async fn get_by_id(&self, id: &str) -> AppResult<lost_item::Model> {
        self.find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Lost item {id}")))
    }

    /// Create a new lost item.
    pub async fn create(&self, model: lost_item::ActiveModel) -> AppResult<lost_item::Model> {
        model
            .insert(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Delete a lost item.
    ///
    /// Cached match scores for the item cascade away with the row.
    pub async fn delete(&self, id: &str) -> AppResult<()> {
        let item = self.find_by_id(id).await?;
        if let Some(i) = item {
            i.delete(self.db.as_ref())
                .await
                .map_err(|e| AppError::Database(e.to_string()))?;
        }
        Ok(())
    }

    /// Unresolved lost items reported by a user, newest first.
    pub async fn find_by_owner(&self, owner_id: &str) -> AppResult<Vec<lost_item::Model>> {
        LostItem::find()
            .filter(lost_item::Column::OwnerId.eq(owner_id))
            .filter(lost_item::Column::IsResolved.eq(false))
            .order_by_desc(lost_item::Column::CreatedAt)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// All unresolved lost items, newest first.
    ///
    /// This is the candidate set for match scoring.
    pub async fn find_unresolved(&self) -> AppResult<Vec<lost_item::Model>> {
        LostItem::find()
            .filter(lost_item::Column::IsResolved.eq(false))
            .order_by_desc(lost_item::Column::CreatedAt)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// IDs of a user's unresolved lost items.
    ///
    /// Used by the privacy gate to look up cached match scores without
    /// loading full rows.
    pub async fn find_unresolved_ids_by_owner(&self, owner_id: &str) -> AppResult<Vec<String>> {
        LostItem::find()
            .filter(lost_item::Column::OwnerId.eq(owner_id))
            .filter(lost_item::Column::IsResolved.eq(false))
            .select_only()
            .column(lost_item::Column::Id)
            .into_tuple::<String>()
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Count unresolved lost items.
    pub async fn count_unresolved(&self) -> AppResult<u64> {
        LostItem::find()
            .filter(lost_item::Column::IsResolved.eq(false))
            .count(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }
}
