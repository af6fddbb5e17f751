//! Security question repository.

use std::sync::Arc;

use crate::entities::{SecurityQuestion, security_question};
use reclaim_common::{AppError, AppResult};
use sea_orm::{
    ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder,
    TransactionTrait,
};

/// Security question repository for database operations.
#[derive(Clone)]
pub struct SecurityQuestionRepository {
    db: Arc<DatabaseConnection>,
}

impl SecurityQuestionRepository {
    /// Create a new security question repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Questions for a found item, in authoring order.
    pub async fn find_by_item(&self, found_item_id: &str) -> AppResult<Vec<security_question::Model>> {
        SecurityQuestion::find()
            .filter(security_question::Column::FoundItemId.eq(found_item_id))
            .order_by_asc(security_question::Column::Id)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Replace all questions for a found item in one transaction.
    ///
    /// Callers enforce the 2 to 5 question bound and the no-attempts-yet
    /// rule before getting here.
    pub async fn replace_for_item(
        &self,
        found_item_id: &str,
        models: Vec<security_question::ActiveModel>,
    ) -> AppResult<Vec<security_question::Model>> {
        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        SecurityQuestion::delete_many()
            .filter(security_question::Column::FoundItemId.eq(found_item_id))
            .exec(&txn)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        SecurityQuestion::insert_many(models)
            .exec(&txn)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        txn.commit()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        self.find_by_item(found_item_id).await
    }

    /// Count questions attached to a found item.
    pub async fn count_for_item(&self, found_item_id: &str) -> AppResult<u64> {
        SecurityQuestion::find()
            .filter(security_question::Column::FoundItemId.eq(found_item_id))
            .count(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }
}
