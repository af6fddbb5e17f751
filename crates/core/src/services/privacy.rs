//! Found item privacy gate.
//!
//! Freshly reported found items stay private for a few days so the real
//! owner, matched by score, gets a head start before the listing goes
//! campus-wide.

use std::collections::HashSet;

use chrono::{DateTime, Utc};
use serde::Serialize;

use reclaim_common::{AppResult, PrivacyConfig, PrivateListingPolicy};
use reclaim_db::entities::{found_item, user};
use reclaim_db::repositories::{LostItemRepository, MatchScoreRepository};

/// How much of a found item a viewer may see.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Visibility {
    /// Hidden while the privacy window runs
    Private,
    /// Listed, with finder contact, exact description and photo withheld
    PublicRedacted,
    /// Everything
    PublicFull,
}

/// A found item together with what the requesting viewer may see of it.
#[derive(Debug, Clone)]
pub struct GatedFoundItem {
    /// The underlying row
    pub item: found_item::Model,
    /// Redaction level for this viewer
    pub visibility: Visibility,
}

/// Visibility of one item for one viewer at one instant.
///
/// Pure in its inputs. The privacy expiry is stamped on the row at report
/// time and compared against `now` on every read, so the transition out of
/// `Private` is monotonic and never cached.
#[must_use]
pub fn visibility_for(
    item: &found_item::Model,
    now: DateTime<Utc>,
    is_finder: bool,
    high_confidence: bool,
) -> Visibility {
    if is_finder || high_confidence {
        return Visibility::PublicFull;
    }
    if now < item.privacy_expires_at.with_timezone(&Utc) {
        Visibility::Private
    } else {
        Visibility::PublicRedacted
    }
}

/// Decides what each viewer may see of private-period found items.
#[derive(Clone)]
pub struct PrivacyService {
    lost_items: LostItemRepository,
    match_scores: MatchScoreRepository,
    config: PrivacyConfig,
    high_confidence_threshold: f64,
}

impl PrivacyService {
    /// Create a new privacy service.
    #[must_use]
    pub const fn new(
        lost_items: LostItemRepository,
        match_scores: MatchScoreRepository,
        config: PrivacyConfig,
        high_confidence_threshold: f64,
    ) -> Self {
        Self {
            lost_items,
            match_scores,
            config,
            high_confidence_threshold,
        }
    }

    /// The configured listing shape for private items.
    #[must_use]
    pub const fn listing_policy(&self) -> PrivateListingPolicy {
        self.config.listing_policy
    }

    /// Whether the viewer owns an unresolved lost item with a cached
    /// high-confidence score against the found item.
    pub async fn is_high_confidence(
        &self,
        viewer_id: &str,
        found_item_id: &str,
    ) -> AppResult<bool> {
        let lost_ids = self.lost_items.find_unresolved_ids_by_owner(viewer_id).await?;
        self.match_scores
            .any_pair_at_or_above(found_item_id, &lost_ids, self.high_confidence_threshold)
            .await
    }

    /// Visibility of a single item for a viewer.
    pub async fn visibility_for_viewer(
        &self,
        item: &found_item::Model,
        viewer: &user::Model,
        now: DateTime<Utc>,
    ) -> AppResult<Visibility> {
        if viewer.id == item.finder_id {
            return Ok(Visibility::PublicFull);
        }
        let high_confidence = self.is_high_confidence(&viewer.id, &item.id).await?;
        Ok(visibility_for(item, now, false, high_confidence))
    }

    /// Gate a listing page for a viewer.
    ///
    /// The high-confidence item set is resolved in one query for the whole
    /// page. Under the `Exclude` policy private items are dropped; under
    /// `Stub` they stay in the result marked `Private` for the response
    /// layer to redact down to a placeholder.
    pub async fn gate_listing(
        &self,
        items: Vec<found_item::Model>,
        viewer: &user::Model,
        now: DateTime<Utc>,
    ) -> AppResult<Vec<GatedFoundItem>> {
        let lost_ids = self
            .lost_items
            .find_unresolved_ids_by_owner(&viewer.id)
            .await?;
        let high_confidence: HashSet<String> = self
            .match_scores
            .find_high_confidence_found_ids(&lost_ids, self.high_confidence_threshold)
            .await?
            .into_iter()
            .collect();

        let gated = items.into_iter().map(|item| {
            let visibility = visibility_for(
                &item,
                now,
                viewer.id == item.finder_id,
                high_confidence.contains(&item.id),
            );
            GatedFoundItem { item, visibility }
        });

        Ok(match self.config.listing_policy {
            PrivateListingPolicy::Exclude => gated
                .filter(|g| g.visibility != Visibility::Private)
                .collect(),
            PrivateListingPolicy::Stub => gated.collect(),
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::Duration;
    use sea_orm::{DatabaseBackend, MockDatabase};
    use std::sync::Arc;

    fn test_item(id: &str, finder_id: &str, expires_in_hours: i64) -> found_item::Model {
        let now = Utc::now();
        found_item::Model {
            id: id.to_string(),
            finder_id: finder_id.to_string(),
            title: "Black backpack".to_string(),
            description: "Nylon backpack with laptop sleeve".to_string(),
            category_id: "cat1".to_string(),
            location_id: "loc1".to_string(),
            color: Some("Black".to_string()),
            size: None,
            date_found: now.date_naive(),
            time_found: None,
            finder_name: "Finn Finder".to_string(),
            finder_email: "finn@campus.example".to_string(),
            finder_phone: None,
            finder_notes: None,
            current_location: "Front Desk".to_string(),
            is_claimed: false,
            privacy_expires_at: (now + Duration::hours(expires_in_hours)).into(),
            first_potential_marked_at: None,
            image_filename: None,
            created_at: now.into(),
            updated_at: None,
        }
    }

    fn test_viewer(id: &str) -> user::Model {
        let now = Utc::now();
        user::Model {
            id: id.to_string(),
            name: "Vera Viewer".to_string(),
            email: "vera@campus.example".to_string(),
            email_lower: "vera@campus.example".to_string(),
            phone: None,
            is_active: true,
            email_verified: true,
            created_at: now.into(),
            updated_at: None,
        }
    }

    fn service(db: sea_orm::DatabaseConnection, policy: PrivateListingPolicy) -> PrivacyService {
        let db = Arc::new(db);
        PrivacyService::new(
            LostItemRepository::new(db.clone()),
            MatchScoreRepository::new(db),
            PrivacyConfig {
                window_days: 3,
                listing_policy: policy,
            },
            0.70,
        )
    }

    #[test]
    fn test_private_within_window() {
        let item = test_item("found1", "finder1", 24);
        let vis = visibility_for(&item, Utc::now(), false, false);
        assert_eq!(vis, Visibility::Private);
    }

    #[test]
    fn test_redacted_after_window() {
        let item = test_item("found1", "finder1", -1);
        let vis = visibility_for(&item, Utc::now(), false, false);
        assert_eq!(vis, Visibility::PublicRedacted);
    }

    #[test]
    fn test_finder_always_sees_full() {
        let item = test_item("found1", "finder1", 24);
        assert_eq!(
            visibility_for(&item, Utc::now(), true, false),
            Visibility::PublicFull
        );
    }

    #[test]
    fn test_high_confidence_match_pierces_window() {
        let item = test_item("found1", "finder1", 24);
        assert_eq!(
            visibility_for(&item, Utc::now(), false, true),
            Visibility::PublicFull
        );
    }

    #[test]
    fn test_transition_is_monotonic() {
        let item = test_item("found1", "finder1", 1);
        let now = Utc::now();
        assert_eq!(visibility_for(&item, now, false, false), Visibility::Private);
        let later = now + Duration::hours(2);
        assert_eq!(
            visibility_for(&item, later, false, false),
            Visibility::PublicRedacted
        );
        let much_later = now + Duration::days(30);
        assert_eq!(
            visibility_for(&item, much_later, false, false),
            Visibility::PublicRedacted
        );
    }

    #[tokio::test]
    async fn test_gate_listing_excludes_private_items() {
        // Viewer has no lost items, so both gate queries return empty.
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([Vec::<reclaim_db::entities::lost_item::Model>::new()])
            .append_query_results([Vec::<reclaim_db::entities::match_score::Model>::new()])
            .into_connection();
        let service = service(db, PrivateListingPolicy::Exclude);

        let items = vec![test_item("fresh", "finder1", 24), test_item("aged", "finder1", -1)];
        let gated = service
            .gate_listing(items, &test_viewer("viewer1"), Utc::now())
            .await
            .unwrap();

        assert_eq!(gated.len(), 1);
        assert_eq!(gated[0].item.id, "aged");
        assert_eq!(gated[0].visibility, Visibility::PublicRedacted);
    }

    #[tokio::test]
    async fn test_gate_listing_stub_policy_keeps_private_items() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([Vec::<reclaim_db::entities::lost_item::Model>::new()])
            .append_query_results([Vec::<reclaim_db::entities::match_score::Model>::new()])
            .into_connection();
        let service = service(db, PrivateListingPolicy::Stub);

        let items = vec![test_item("fresh", "finder1", 24)];
        let gated = service
            .gate_listing(items, &test_viewer("viewer1"), Utc::now())
            .await
            .unwrap();

        assert_eq!(gated.len(), 1);
        assert_eq!(gated[0].visibility, Visibility::Private);
    }

    #[tokio::test]
    async fn test_gate_listing_grants_full_to_finder() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([Vec::<reclaim_db::entities::lost_item::Model>::new()])
            .append_query_results([Vec::<reclaim_db::entities::match_score::Model>::new()])
            .into_connection();
        let service = service(db, PrivateListingPolicy::Exclude);

        let items = vec![test_item("fresh", "viewer1", 24)];
        let gated = service
            .gate_listing(items, &test_viewer("viewer1"), Utc::now())
            .await
            .unwrap();

        assert_eq!(gated.len(), 1);
        assert_eq!(gated[0].visibility, Visibility::PublicFull);
    }
}
