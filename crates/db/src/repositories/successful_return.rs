//! Successful return repository.

use std::sync::Arc;

use crate::entities::{FoundItem, SuccessfulReturn, successful_return};
use reclaim_common::{AppError, AppResult};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, QuerySelect, TransactionTrait,
};

/// Successful return repository for database operations.
#[derive(Clone)]
pub struct SuccessfulReturnRepository {
    db: Arc<DatabaseConnection>,
}

impl SuccessfulReturnRepository {
    /// Create a new successful return repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Find a return by ID.
    pub async fn find_by_id(&self, id: &str) -> AppResult<Option<successful_return::Model>> {
        SuccessfulReturn::find_by_id(id)
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Find a return by ID, returning an error if not found.
    pub async fn get_by_id(&self, id: &str) -> AppResult<successful_return::Model> {
        self.find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Return {id}")))
    }

    /// Find the return archived for a given found item, if any.
    pub async fn find_by_found_item_id(
        &self,
        found_item_id: &str,
    ) -> AppResult<Option<successful_return::Model>> {
        SuccessfulReturn::find()
            .filter(successful_return::Column::FoundItemId.eq(found_item_id))
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Archived returns, most recent first.
    pub async fn list(&self, limit: u64, offset: u64) -> AppResult<Vec<successful_return::Model>> {
        SuccessfulReturn::find()
            .order_by_desc(successful_return::Column::FinalizedAt)
            .offset(offset)
            .limit(limit)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Archive a return and delete the listed item in one transaction.
    ///
    /// Either both happen or neither does; a half-archived item is never
    /// observable. Security questions and cached match scores cascade away
    /// with the item, claim attempts stay behind.
    pub async fn archive_and_delete_item(
        &self,
        model: successful_return::ActiveModel,
        found_item_id: &str,
    ) -> AppResult<successful_return::Model> {
        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        let archived = model
            .insert(&txn)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        FoundItem::delete_by_id(found_item_id)
            .exec(&txn)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        txn.commit()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(archived)
    }

    /// Count all archived returns.
    pub async fn count(&self) -> AppResult<u64> {
        SuccessfulReturn::find()
            .count(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Count returns finalized at or after the given instant.
    pub async fn count_finalized_since(
        &self,
        since: chrono::DateTime<chrono::Utc>,
    ) -> AppResult<u64> {
        SuccessfulReturn::find()
            .filter(successful_return::Column::FinalizedAt.gte(since))
            .count(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }
}
