//! Found item reporting and privacy-gated browsing.

use chrono::{Duration, NaiveDate, Utc};
use sea_orm::Set;
use serde::Deserialize;
use validator::Validate;

use reclaim_common::{AppError, AppResult, IdGenerator, PrivacyConfig, PrivateListingPolicy};
use reclaim_db::entities::{found_item, user};
use reclaim_db::repositories::FoundItemRepository;

use super::catalog::CatalogService;
use super::dispatch::NotificationDispatcher;
use super::matching::MatchingService;
use super::privacy::{GatedFoundItem, PrivacyService, Visibility};

/// Where handed-in items physically wait for pickup.
pub const HOLDING_LOCATION: &str = "Front Desk";

/// Input for reporting a found item.
#[derive(Debug, Deserialize, Validate)]
pub struct ReportFoundItemInput {
    /// Short item title
    #[validate(length(min = 1, max = 200))]
    pub title: String,
    /// Free-text description, fuel for the match scorer
    #[validate(length(min = 1, max = 5000))]
    pub description: String,
    /// Category id, or `other` with `custom_category`
    #[validate(length(min = 1))]
    pub category_id: String,
    /// Location id, or `other` with `custom_location`
    #[validate(length(min = 1))]
    pub location_id: String,
    /// New category name when `category_id` is `other`
    pub custom_category: Option<String>,
    /// New location name when `location_id` is `other`
    pub custom_location: Option<String>,
    /// Item color
    pub color: Option<String>,
    /// Item size
    pub size: Option<String>,
    /// Day the item was found
    pub date_found: NaiveDate,
    /// Free-text time of day
    pub time_found: Option<String>,
    /// Contact phone, on top of the identity headers
    pub phone: Option<String>,
    /// Condition notes, where exactly it lay, and so on
    pub finder_notes: Option<String>,
    /// Previously uploaded image reference
    pub image_filename: Option<String>,
}

/// Listing filters, all optional.
#[derive(Debug, Default, Deserialize)]
pub struct FoundItemFilters {
    pub category_id: Option<String>,
    pub location_id: Option<String>,
    /// Case-insensitive text search over title and description
    pub q: Option<String>,
}

/// Found item reporting, browsing, and removal.
#[derive(Clone)]
pub struct FoundItemService {
    found_items: FoundItemRepository,
    catalog: CatalogService,
    privacy: PrivacyService,
    matching: MatchingService,
    dispatcher: NotificationDispatcher,
    id_gen: IdGenerator,
    privacy_config: PrivacyConfig,
}

impl FoundItemService {
    /// Create a new found item service.
    #[must_use]
    pub const fn new(
        found_items: FoundItemRepository,
        catalog: CatalogService,
        privacy: PrivacyService,
        matching: MatchingService,
        dispatcher: NotificationDispatcher,
        id_gen: IdGenerator,
        privacy_config: PrivacyConfig,
    ) -> Self {
        Self {
            found_items,
            catalog,
            privacy,
            matching,
            dispatcher,
            id_gen,
            privacy_config,
        }
    }

    /// Report a found item.
    ///
    /// The item starts its privacy window immediately and owners of
    /// high-confidence lost item matches are notified. A scoring hiccup
    /// never fails the report itself.
    pub async fn report(
        &self,
        finder: &user::Model,
        input: ReportFoundItemInput,
    ) -> AppResult<found_item::Model> {
        input.validate()?;

        let category = self
            .catalog
            .resolve_category(&input.category_id, input.custom_category.as_deref())
            .await?;
        let location = self
            .catalog
            .resolve_location(&input.location_id, input.custom_location.as_deref())
            .await?;

        let now = Utc::now();
        let item = self
            .found_items
            .create(found_item::ActiveModel {
                id: Set(self.id_gen.generate()),
                finder_id: Set(finder.id.clone()),
                title: Set(input.title.trim().to_string()),
                description: Set(input.description.trim().to_string()),
                category_id: Set(category.id),
                location_id: Set(location.id),
                color: Set(input.color.filter(|c| !c.trim().is_empty())),
                size: Set(input.size.filter(|s| !s.trim().is_empty())),
                date_found: Set(input.date_found),
                time_found: Set(input.time_found),
                finder_name: Set(finder.name.clone()),
                finder_email: Set(finder.email.clone()),
                finder_phone: Set(input.phone.or_else(|| finder.phone.clone())),
                finder_notes: Set(input.finder_notes),
                current_location: Set(HOLDING_LOCATION.to_string()),
                is_claimed: Set(false),
                privacy_expires_at: Set(
                    (now + Duration::days(self.privacy_config.window_days)).into(),
                ),
                first_potential_marked_at: Set(None),
                image_filename: Set(input.image_filename),
                created_at: Set(now.into()),
                updated_at: Set(None),
            })
            .await?;

        match self.matching.score_new_found_item(&item).await {
            Ok(intents) => self.dispatcher.dispatch(intents).await,
            Err(e) => tracing::warn!(
                error = %e,
                item_id = %item.id,
                "Match scoring for new found item failed"
            ),
        }

        Ok(item)
    }

    /// Unclaimed items visible to the viewer, newest first.
    pub async fn list(
        &self,
        viewer: &user::Model,
        filters: &FoundItemFilters,
    ) -> AppResult<Vec<GatedFoundItem>> {
        let items = self
            .found_items
            .find_unclaimed_filtered(
                filters.category_id.as_deref(),
                filters.location_id.as_deref(),
                filters.q.as_deref(),
            )
            .await?;
        self.privacy.gate_listing(items, viewer, Utc::now()).await
    }

    /// One found item with its redaction level for the viewer.
    ///
    /// Under the `Exclude` policy a still-private item reads as absent.
    pub async fn get(&self, viewer: &user::Model, id: &str) -> AppResult<GatedFoundItem> {
        let item = self.found_items.get_by_id(id).await?;
        let visibility = self
            .privacy
            .visibility_for_viewer(&item, viewer, Utc::now())
            .await?;

        if visibility == Visibility::Private
            && self.privacy.listing_policy() == PrivateListingPolicy::Exclude
        {
            return Err(AppError::NotFound(format!("Found item {id}")));
        }

        Ok(GatedFoundItem { item, visibility })
    }

    /// Delete a found item, finder only.
    pub async fn delete(&self, id: &str, requester: &user::Model) -> AppResult<()> {
        let item = self.found_items.get_by_id(id).await?;
        if item.finder_id != requester.id {
            return Err(AppError::Unauthorized(
                "Only the finder can delete a found item".to_string(),
            ));
        }
        self.found_items.delete(&item.id).await
    }
}
