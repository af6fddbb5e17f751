//! Aggregate counters for the dashboard.

use chrono::{Duration, Utc};
use serde::Serialize;

use reclaim_common::AppResult;
use reclaim_db::repositories::{
    CategoryRepository, FoundItemRepository, LocationRepository, LostItemRepository,
    SuccessfulReturnRepository,
};

const WEEK_DAYS: i64 = 7;

/// Dashboard totals.
///
/// Finalized items live in the returns archive, not the found item table,
/// so the "all time" and "this week" counters read both stores.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct StatsOverview {
    /// Everything ever handed in: live listings plus archived returns
    pub total_found: u64,
    /// Archived returns
    pub items_claimed: u64,
    /// Unclaimed found items currently on the board
    pub active_found: u64,
    /// Hand-ins in the last seven days, live and archived
    pub found_this_week: u64,
    /// Unresolved lost reports
    pub active_lost: u64,
    pub total_categories: u64,
    pub total_locations: u64,
}

/// Read-only counters over every store.
#[derive(Clone)]
pub struct StatsService {
    found_items: FoundItemRepository,
    lost_items: LostItemRepository,
    returns: SuccessfulReturnRepository,
    categories: CategoryRepository,
    locations: LocationRepository,
}

impl StatsService {
    /// Create a new stats service.
    #[must_use]
    pub const fn new(
        found_items: FoundItemRepository,
        lost_items: LostItemRepository,
        returns: SuccessfulReturnRepository,
        categories: CategoryRepository,
        locations: LocationRepository,
    ) -> Self {
        Self {
            found_items,
            lost_items,
            returns,
            categories,
            locations,
        }
    }

    /// Compute the dashboard totals.
    pub async fn overview(&self) -> AppResult<StatsOverview> {
        let week_ago = Utc::now() - Duration::days(WEEK_DAYS);

        let archived = self.returns.count().await?;
        let live = self.found_items.count_all().await?;

        Ok(StatsOverview {
            total_found: live + archived,
            items_claimed: archived,
            active_found: self.found_items.count_unclaimed().await?,
            found_this_week: self.found_items.count_created_since(week_ago).await?
                + self.returns.count_finalized_since(week_ago).await?,
            active_lost: self.lost_items.count_unresolved().await?,
            total_categories: self.categories.count().await?,
            total_locations: self.locations.count().await?,
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use maplit::btreemap;
    use sea_orm::{DatabaseBackend, MockDatabase, Value};
    use std::sync::Arc;

    fn count_row(n: i64) -> std::collections::BTreeMap<&'static str, Value> {
        btreemap! { "num_items" => Value::BigInt(Some(n)) }
    }

    #[tokio::test]
    async fn test_overview_merges_live_and_archived_counters() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([
                vec![count_row(5)], // archived returns
                vec![count_row(7)], // all found items
                vec![count_row(6)], // unclaimed
                vec![count_row(2)], // found this week, live
                vec![count_row(1)], // finalized this week
                vec![count_row(4)], // unresolved lost
                vec![count_row(3)], // categories
                vec![count_row(2)], // locations
            ])
            .into_connection();
        let db = Arc::new(db);

        let service = StatsService::new(
            FoundItemRepository::new(db.clone()),
            LostItemRepository::new(db.clone()),
            SuccessfulReturnRepository::new(db.clone()),
            CategoryRepository::new(db.clone()),
            LocationRepository::new(db),
        );

        let overview = service.overview().await.unwrap();
        assert_eq!(overview.total_found, 12);
        assert_eq!(overview.items_claimed, 5);
        assert_eq!(overview.active_found, 6);
        assert_eq!(overview.found_this_week, 3);
        assert_eq!(overview.active_lost, 4);
        assert_eq!(overview.total_categories, 3);
        assert_eq!(overview.total_locations, 2);
    }
}
