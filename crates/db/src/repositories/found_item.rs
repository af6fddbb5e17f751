//! Found item repository.

use std::sync::Arc;

use crate::entities::{FoundItem, found_item};
use reclaim_common::{AppError, AppResult};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, DatabaseConnection, EntityTrait, ModelTrait,
    PaginatorTrait, QueryFilter, QueryOrder,
    sea_query::{Expr, Func},
};

/// Found item repository for database operations.
#[derive(Clone)]
pub struct FoundItemRepository {
    db: Arc<DatabaseConnection>,
}

impl FoundItemRepository {
    /// Create a new found item repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Find a found item by ID.
    pub async fn find_by_id(&self, id: &str) -> AppResult<Option<found_item::Model>> {
        FoundItem::find_by_id(id)
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Find a found item by ID, returning an error if not found.
    pub async fn get_by_id(&self, id: &str) -> AppResult<found_item::Model> {
        self.find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Found item {id}")))
    }

    /// Create a new found item.
    pub async fn create(&self, model: found_item::ActiveModel) -> AppResult<found_item::Model> {
        model
            .insert(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Delete a found item.
    ///
    /// Security questions and cached match scores cascade away with the
    /// row; claim attempts are kept as historical record.
    pub async fn delete(&self, id: &str) -> AppResult<()> {
        let item = self.find_by_id(id).await?;
        if let Some(i) = item {
            i.delete(self.db.as_ref())
                .await
                .map_err(|e| AppError::Database(e.to_string()))?;
        }
        Ok(())
    }

    /// Found items reported by a user, newest first.
    pub async fn find_by_finder(&self, finder_id: &str) -> AppResult<Vec<found_item::Model>> {
        FoundItem::find()
            .filter(found_item::Column::FinderId.eq(finder_id))
            .order_by_desc(found_item::Column::CreatedAt)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// All unclaimed found items, newest first.
    ///
    /// This is the candidate set for match scoring.
    pub async fn find_unclaimed(&self) -> AppResult<Vec<found_item::Model>> {
        FoundItem::find()
            .filter(found_item::Column::IsClaimed.eq(false))
            .order_by_desc(found_item::Column::CreatedAt)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Unclaimed found items matching optional listing filters, newest
    /// first. Text search matches title or description, case-insensitive.
    pub async fn find_unclaimed_filtered(
        &self,
        category_id: Option<&str>,
        location_id: Option<&str>,
        text: Option<&str>,
    ) -> AppResult<Vec<found_item::Model>> {
        let mut query = FoundItem::find().filter(found_item::Column::IsClaimed.eq(false));

        if let Some(category) = category_id {
            query = query.filter(found_item::Column::CategoryId.eq(category));
        }

        if let Some(location) = location_id {
            query = query.filter(found_item::Column::LocationId.eq(location));
        }

        if let Some(q) = text {
            let pattern = format!(
                "%{}%",
                q.to_lowercase().replace('%', "\\%").replace('_', "\\_")
            );
            query = query.filter(
                Condition::any()
                    .add(
                        Expr::expr(Func::lower(Expr::col(found_item::Column::Title)))
                            .like(&pattern),
                    )
                    .add(
                        Expr::expr(Func::lower(Expr::col(found_item::Column::Description)))
                            .like(&pattern),
                    ),
            );
        }

        query
            .order_by_desc(found_item::Column::CreatedAt)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Unclaimed items whose privacy window has ended.
    ///
    /// The hourly sweep notifies lost-item owners about these.
    pub async fn find_privacy_expired_unclaimed(
        &self,
        now: chrono::DateTime<chrono::Utc>,
    ) -> AppResult<Vec<found_item::Model>> {
        FoundItem::find()
            .filter(found_item::Column::IsClaimed.eq(false))
            .filter(found_item::Column::PrivacyExpiresAt.lte(now))
            .order_by_desc(found_item::Column::CreatedAt)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Unclaimed items whose competition window opened at or before the
    /// cutoff. The hourly sweep reminds the finder to decide.
    pub async fn find_decision_due(
        &self,
        cutoff: chrono::DateTime<chrono::Utc>,
    ) -> AppResult<Vec<found_item::Model>> {
        FoundItem::find()
            .filter(found_item::Column::IsClaimed.eq(false))
            .filter(found_item::Column::FirstPotentialMarkedAt.is_not_null())
            .filter(found_item::Column::FirstPotentialMarkedAt.lte(cutoff))
            .order_by_desc(found_item::Column::CreatedAt)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Stamp the competition-window anchor, only if it is not already set.
    ///
    /// Single conditional UPDATE so two concurrent accepts produce exactly
    /// one window start. Returns whether this call set the anchor.
    pub async fn set_first_potential_marked_at_if_null(
        &self,
        id: &str,
        at: chrono::DateTime<chrono::Utc>,
    ) -> AppResult<bool> {
        let result = FoundItem::update_many()
            .col_expr(
                found_item::Column::FirstPotentialMarkedAt,
                Expr::value(Some(at)),
            )
            .filter(found_item::Column::Id.eq(id))
            .filter(found_item::Column::FirstPotentialMarkedAt.is_null())
            .exec(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(result.rows_affected == 1)
    }

    /// Count all found items currently listed.
    pub async fn count_all(&self) -> AppResult<u64> {
        FoundItem::find()
            .count(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Count unclaimed found items.
    pub async fn count_unclaimed(&self) -> AppResult<u64> {
        FoundItem::find()
            .filter(found_item::Column::IsClaimed.eq(false))
            .count(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Count found items reported at or after the given instant.
    pub async fn count_created_since(
        &self,
        since: chrono::DateTime<chrono::Utc>,
    ) -> AppResult<u64> {
        FoundItem::find()
            .filter(found_item::Column::CreatedAt.gte(since))
            .count(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};
    use sea_orm::{DatabaseBackend, MockDatabase, MockExecResult};
    use std::sync::Arc;

    fn create_test_item(id: &str, title: &str) -> found_item::Model {
        let now = Utc::now();
        found_item::Model {
            id: id.to_string(),
            finder_id: "finder1".to_string(),
            title: title.to_string(),
            description: "Black laptop with stickers".to_string(),
            category_id: "cat1".to_string(),
            location_id: "loc1".to_string(),
            color: Some("Black".to_string()),
            size: None,
            date_found: now.date_naive(),
            time_found: None,
            finder_name: "Finn Finder".to_string(),
            finder_email: "finn@campus.edu".to_string(),
            finder_phone: None,
            finder_notes: None,
            current_location: "Front Desk".to_string(),
            is_claimed: false,
            privacy_expires_at: (now + Duration::days(3)).into(),
            first_potential_marked_at: None,
            image_filename: None,
            created_at: now.into(),
            updated_at: None,
        }
    }

    #[tokio::test]
    async fn test_set_anchor_when_unset() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_exec_results([MockExecResult {
                    last_insert_id: 0,
                    rows_affected: 1,
                }])
                .into_connection(),
        );

        let repo = FoundItemRepository::new(db);
        let stamped = repo
            .set_first_potential_marked_at_if_null("item1", Utc::now())
            .await
            .unwrap();

        assert!(stamped);
    }

    #[tokio::test]
    async fn test_set_anchor_noop_when_already_set() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_exec_results([MockExecResult {
                    last_insert_id: 0,
                    rows_affected: 0,
                }])
                .into_connection(),
        );

        let repo = FoundItemRepository::new(db);
        let stamped = repo
            .set_first_potential_marked_at_if_null("item1", Utc::now())
            .await
            .unwrap();

        assert!(!stamped);
    }

    #[tokio::test]
    async fn test_find_privacy_expired_unclaimed() {
        let item = create_test_item("item1", "Blue Backpack");

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[item.clone()]])
                .into_connection(),
        );

        let repo = FoundItemRepository::new(db);
        let result = repo
            .find_privacy_expired_unclaimed(Utc::now() + Duration::days(4))
            .await
            .unwrap();

        assert_eq!(result.len(), 1);
        assert_eq!(result[0].id, "item1");
    }

    #[tokio::test]
    async fn test_find_unclaimed_filtered_empty() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([Vec::<found_item::Model>::new()])
                .into_connection(),
        );

        let repo = FoundItemRepository::new(db);
        let result = repo
            .find_unclaimed_filtered(Some("cat1"), None, Some("backpack"))
            .await
            .unwrap();

        assert!(result.is_empty());
    }
}
