//! Claim attempt repository.

use std::sync::Arc;

use crate::entities::{ClaimAttempt, claim_attempt};
use reclaim_common::{AppError, AppResult};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, Set, SqlErr,
};

/// Claim attempt repository for database operations.
#[derive(Clone)]
pub struct ClaimAttemptRepository {
    db: Arc<DatabaseConnection>,
}

impl ClaimAttemptRepository {
    /// Create a new claim attempt repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Find a claim attempt by ID.
    pub async fn find_by_id(&self, id: &str) -> AppResult<Option<claim_attempt::Model>> {
        ClaimAttempt::find_by_id(id)
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Insert a claim attempt.
    ///
    /// One attempt per (item, claimant) is enforced by a unique index;
    /// when two submissions race, exactly one row survives and the loser
    /// surfaces here as `AlreadyAttempted`.
    pub async fn insert_attempt(
        &self,
        model: claim_attempt::ActiveModel,
    ) -> AppResult<claim_attempt::Model> {
        model.insert(self.db.as_ref()).await.map_err(|e| {
            if matches!(e.sql_err(), Some(SqlErr::UniqueConstraintViolation(_))) {
                AppError::AlreadyAttempted
            } else {
                AppError::Database(e.to_string())
            }
        })
    }

    /// Find the attempt a user made on an item, if any.
    pub async fn find_by_pair(
        &self,
        found_item_id: &str,
        claimant_id: &str,
    ) -> AppResult<Option<claim_attempt::Model>> {
        ClaimAttempt::find()
            .filter(claim_attempt::Column::FoundItemId.eq(found_item_id))
            .filter(claim_attempt::Column::ClaimantId.eq(claimant_id))
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// All attempts on an item, in arrival order.
    pub async fn find_by_item(&self, found_item_id: &str) -> AppResult<Vec<claim_attempt::Model>> {
        ClaimAttempt::find()
            .filter(claim_attempt::Column::FoundItemId.eq(found_item_id))
            .order_by_asc(claim_attempt::Column::AttemptedAt)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Successful attempts on an item, in arrival order.
    pub async fn find_successful_by_item(
        &self,
        found_item_id: &str,
    ) -> AppResult<Vec<claim_attempt::Model>> {
        ClaimAttempt::find()
            .filter(claim_attempt::Column::FoundItemId.eq(found_item_id))
            .filter(claim_attempt::Column::Success.eq(true))
            .order_by_asc(claim_attempt::Column::AttemptedAt)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Whether any attempt exists for an item.
    ///
    /// Question replacement is blocked once this turns true.
    pub async fn has_attempts(&self, found_item_id: &str) -> AppResult<bool> {
        let count = ClaimAttempt::find()
            .filter(claim_attempt::Column::FoundItemId.eq(found_item_id))
            .count(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(count > 0)
    }

    /// Mark an attempt successful and stamp when it was accepted.
    pub async fn mark_success(
        &self,
        id: &str,
        at: chrono::DateTime<chrono::Utc>,
    ) -> AppResult<claim_attempt::Model> {
        let attempt = self
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Claim attempt {id}")))?;

        let mut active: claim_attempt::ActiveModel = attempt.into();
        active.success = Set(true);
        active.marked_potential_at = Set(Some(at.into()));
        active
            .update(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Withdraw a prior acceptance of an attempt.
    pub async fn clear_success(&self, id: &str) -> AppResult<claim_attempt::Model> {
        let attempt = self
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Claim attempt {id}")))?;

        let mut active: claim_attempt::ActiveModel = attempt.into();
        active.success = Set(false);
        active.marked_potential_at = Set(None);
        active
            .update(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::Utc;
    use sea_orm::{DatabaseBackend, MockDatabase, MockExecResult};
    use std::sync::Arc;

    fn create_test_attempt(id: &str, item_id: &str, claimant_id: &str) -> claim_attempt::Model {
        claim_attempt::Model {
            id: id.to_string(),
            found_item_id: item_id.to_string(),
            claimant_id: claimant_id.to_string(),
            claimant_name: "Casey Claimant".to_string(),
            claimant_email: "casey@campus.edu".to_string(),
            answers: serde_json::json!({ "q1": "BLUE" }),
            success: false,
            attempted_at: Utc::now().into(),
            marked_potential_at: None,
        }
    }

    #[tokio::test]
    async fn test_insert_attempt() {
        let attempt = create_test_attempt("attempt1", "item1", "user1");

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[attempt.clone()]])
                .append_exec_results([MockExecResult {
                    last_insert_id: 0,
                    rows_affected: 1,
                }])
                .into_connection(),
        );

        let repo = ClaimAttemptRepository::new(db);

        let active = claim_attempt::ActiveModel {
            id: Set("attempt1".to_string()),
            found_item_id: Set("item1".to_string()),
            claimant_id: Set("user1".to_string()),
            ..Default::default()
        };

        let result = repo.insert_attempt(active).await.unwrap();
        assert_eq!(result.found_item_id, "item1");
        assert!(!result.success);
    }

    #[tokio::test]
    async fn test_find_by_pair_absent() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([Vec::<claim_attempt::Model>::new()])
                .into_connection(),
        );

        let repo = ClaimAttemptRepository::new(db);
        let result = repo.find_by_pair("item1", "user1").await.unwrap();

        assert!(result.is_none());
    }

    #[tokio::test]
    async fn test_mark_success_stamps_acceptance() {
        let attempt = create_test_attempt("attempt1", "item1", "user1");
        let accepted_at = Utc::now();
        let mut updated = attempt.clone();
        updated.success = true;
        updated.marked_potential_at = Some(accepted_at.into());

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[attempt], [updated]])
                .into_connection(),
        );

        let repo = ClaimAttemptRepository::new(db);
        let result = repo.mark_success("attempt1", accepted_at).await.unwrap();

        assert!(result.success);
        assert!(result.marked_potential_at.is_some());
    }

    #[tokio::test]
    async fn test_mark_success_missing_attempt() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([Vec::<claim_attempt::Model>::new()])
                .into_connection(),
        );

        let repo = ClaimAttemptRepository::new(db);
        let result = repo.mark_success("ghost", Utc::now()).await;

        assert!(matches!(result, Err(AppError::NotFound(_))));
    }
}
