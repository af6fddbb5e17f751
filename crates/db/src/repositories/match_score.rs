//! Match score repository.

use std::sync::Arc;

use crate::entities::{MatchScore, match_score};
use reclaim_common::{AppError, AppResult};
use sea_orm::{
    ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder,
    QuerySelect, sea_query::OnConflict,
};

/// Repository for the (lost, found) pair score cache.
#[derive(Clone)]
pub struct MatchScoreRepository {
    db: Arc<DatabaseConnection>,
}

impl MatchScoreRepository {
    /// Create a new match score repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Upsert a batch of pair scores in one statement.
    ///
    /// Rescoring an existing pair overwrites its score, breakdown, and
    /// computation time; the pair key never changes.
    pub async fn upsert_many(&self, models: Vec<match_score::ActiveModel>) -> AppResult<()> {
        if models.is_empty() {
            return Ok(());
        }

        MatchScore::insert_many(models)
            .on_conflict(
                OnConflict::columns([
                    match_score::Column::LostItemId,
                    match_score::Column::FoundItemId,
                ])
                .update_columns([
                    match_score::Column::Score,
                    match_score::Column::Breakdown,
                    match_score::Column::ComputedAt,
                ])
                .to_owned(),
            )
            .exec(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }

    /// Cached scores for a lost item at or above a floor, best first.
    pub async fn find_for_lost(
        &self,
        lost_item_id: &str,
        min_score: f64,
    ) -> AppResult<Vec<match_score::Model>> {
        MatchScore::find()
            .filter(match_score::Column::LostItemId.eq(lost_item_id))
            .filter(match_score::Column::Score.gte(min_score))
            .order_by_desc(match_score::Column::Score)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Cached scores for a found item at or above a floor, best first.
    pub async fn find_for_found(
        &self,
        found_item_id: &str,
        min_score: f64,
    ) -> AppResult<Vec<match_score::Model>> {
        MatchScore::find()
            .filter(match_score::Column::FoundItemId.eq(found_item_id))
            .filter(match_score::Column::Score.gte(min_score))
            .order_by_desc(match_score::Column::Score)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Found item ids that score at or above the threshold against any of
    /// the given lost items.
    ///
    /// One query instead of one per listing row when gating a whole page.
    pub async fn find_high_confidence_found_ids(
        &self,
        lost_item_ids: &[String],
        threshold: f64,
    ) -> AppResult<Vec<String>> {
        if lost_item_ids.is_empty() {
            return Ok(Vec::new());
        }

        MatchScore::find()
            .select_only()
            .column(match_score::Column::FoundItemId)
            .distinct()
            .filter(match_score::Column::LostItemId.is_in(lost_item_ids.to_vec()))
            .filter(match_score::Column::Score.gte(threshold))
            .into_tuple::<String>()
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Whether any of the given lost items has a cached score at or above
    /// the threshold against the found item.
    ///
    /// This is the privacy gate's high-confidence check.
    pub async fn any_pair_at_or_above(
        &self,
        found_item_id: &str,
        lost_item_ids: &[String],
        threshold: f64,
    ) -> AppResult<bool> {
        if lost_item_ids.is_empty() {
            return Ok(false);
        }

        let count = MatchScore::find()
            .filter(match_score::Column::FoundItemId.eq(found_item_id))
            .filter(match_score::Column::LostItemId.is_in(lost_item_ids.to_vec()))
            .filter(match_score::Column::Score.gte(threshold))
            .count(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(count > 0)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::Utc;
    use sea_orm::{DatabaseBackend, MockDatabase};
    use std::sync::Arc;

    fn create_test_score(lost: &str, found: &str, score: f64) -> match_score::Model {
        match_score::Model {
            id: format!("{lost}-{found}"),
            lost_item_id: lost.to_string(),
            found_item_id: found.to_string(),
            score,
            breakdown: serde_json::json!({ "category": 0.30, "text": 0.25 }),
            computed_at: Utc::now().into(),
        }
    }

    #[tokio::test]
    async fn test_find_for_lost_orders_best_first() {
        let high = create_test_score("lost1", "found1", 0.85);
        let low = create_test_score("lost1", "found2", 0.62);

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[high.clone(), low.clone()]])
                .into_connection(),
        );

        let repo = MatchScoreRepository::new(db);
        let result = repo.find_for_lost("lost1", 0.6).await.unwrap();

        assert_eq!(result.len(), 2);
        assert!(result[0].score >= result[1].score);
    }

    #[tokio::test]
    async fn test_any_pair_short_circuits_without_lost_items() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres).into_connection(),
        );

        let repo = MatchScoreRepository::new(db);
        let result = repo.any_pair_at_or_above("found1", &[], 0.70).await.unwrap();

        assert!(!result);
    }
}
