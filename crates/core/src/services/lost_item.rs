//! Lost item reports.
//!
//! Lost items are always private: they appear only in their owner's own
//! listing and feed the match scorer. There is no browse surface for them.

use chrono::{NaiveDate, Utc};
use sea_orm::Set;
use serde::Deserialize;
use validator::Validate;

use reclaim_common::{AppError, AppResult, IdGenerator};
use reclaim_db::entities::{lost_item, user};
use reclaim_db::repositories::LostItemRepository;

use super::catalog::CatalogService;

/// Input for reporting a lost item.
#[derive(Debug, Deserialize, Validate)]
pub struct ReportLostItemInput {
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
    /// Day the item was lost
    pub date_lost: NaiveDate,
    /// Free-text time of day
    pub time_lost: Option<String>,
    /// Contact phone, on top of the identity headers
    pub phone: Option<String>,
    /// Anything else worth knowing
    pub additional_details: Option<String>,
    /// Previously uploaded image reference
    pub image_filename: Option<String>,
}

/// Lost item reporting and owner listings.
#[derive(Clone)]
pub struct LostItemService {
    lost_items: LostItemRepository,
    catalog: CatalogService,
    id_gen: IdGenerator,
}

impl LostItemService {
    /// Create a new lost item service.
    #[must_use]
    pub const fn new(
        lost_items: LostItemRepository,
        catalog: CatalogService,
        id_gen: IdGenerator,
    ) -> Self {
        Self {
            lost_items,
            catalog,
            id_gen,
        }
    }

    /// Report a lost item for the calling user.
    pub async fn report(
        &self,
        owner: &user::Model,
        input: ReportLostItemInput,
    ) -> AppResult<lost_item::Model> {
        input.validate()?;

        let category = self
            .catalog
            .resolve_category(&input.category_id, input.custom_category.as_deref())
            .await?;
        let location = self
            .catalog
            .resolve_location(&input.location_id, input.custom_location.as_deref())
            .await?;

        self.lost_items
            .create(lost_item::ActiveModel {
                id: Set(self.id_gen.generate()),
                owner_id: Set(owner.id.clone()),
                title: Set(input.title.trim().to_string()),
                description: Set(input.description.trim().to_string()),
                category_id: Set(category.id),
                location_id: Set(location.id),
                color: Set(input.color.filter(|c| !c.trim().is_empty())),
                size: Set(input.size.filter(|s| !s.trim().is_empty())),
                date_lost: Set(input.date_lost),
                time_lost: Set(input.time_lost),
                owner_name: Set(owner.name.clone()),
                owner_email: Set(owner.email.clone()),
                owner_phone: Set(input.phone.or_else(|| owner.phone.clone())),
                additional_details: Set(input.additional_details),
                image_filename: Set(input.image_filename),
                is_resolved: Set(false),
                created_at: Set(Utc::now().into()),
                updated_at: Set(None),
            })
            .await
    }

    /// The caller's own unresolved lost items, newest first.
    pub async fn my_items(&self, owner: &user::Model) -> AppResult<Vec<lost_item::Model>> {
        self.lost_items.find_by_owner(&owner.id).await
    }

    /// A single lost item, owner only.
    ///
    /// Non-owners get `NotFound` so the endpoint does not confirm the
    /// report exists.
    pub async fn get(&self, id: &str, requester: &user::Model) -> AppResult<lost_item::Model> {
        let item = self.lost_items.get_by_id(id).await?;
        if item.owner_id != requester.id {
            return Err(AppError::NotFound(format!("Lost item {id}")));
        }
        Ok(item)
    }

    /// Delete a lost item, owner only. Cached match scores go with it.
    pub async fn delete(&self, id: &str, requester: &user::Model) -> AppResult<()> {
        let item = self.lost_items.get_by_id(id).await?;
        if item.owner_id != requester.id {
            return Err(AppError::Unauthorized(
                "Only the owner can delete a lost item".to_string(),
            ));
        }
        self.lost_items.delete(&item.id).await
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use sea_orm::{DatabaseBackend, MockDatabase};
    use std::sync::Arc;
    use reclaim_db::repositories::{CategoryRepository, LocationRepository};

    fn test_user(id: &str) -> user::Model {
        let now = Utc::now();
        user::Model {
            id: id.to_string(),
            name: "Olive Owner".to_string(),
            email: "olive@campus.example".to_string(),
            email_lower: "olive@campus.example".to_string(),
            phone: Some("330-555-0100".to_string()),
            is_active: true,
            email_verified: true,
            created_at: now.into(),
            updated_at: None,
        }
    }

    fn test_item(id: &str, owner_id: &str) -> lost_item::Model {
        let now = Utc::now();
        lost_item::Model {
            id: id.to_string(),
            owner_id: owner_id.to_string(),
            title: "Water bottle".to_string(),
            description: "Steel bottle with stickers".to_string(),
            category_id: "cat1".to_string(),
            location_id: "loc1".to_string(),
            color: None,
            size: None,
            date_lost: now.date_naive(),
            time_lost: None,
            owner_name: "Olive Owner".to_string(),
            owner_email: "olive@campus.example".to_string(),
            owner_phone: None,
            additional_details: None,
            image_filename: None,
            is_resolved: false,
            created_at: now.into(),
            updated_at: None,
        }
    }

    fn service(db: sea_orm::DatabaseConnection) -> LostItemService {
        let db = Arc::new(db);
        LostItemService::new(
            LostItemRepository::new(db.clone()),
            CatalogService::new(
                CategoryRepository::new(db.clone()),
                LocationRepository::new(db),
                IdGenerator::new(),
            ),
            IdGenerator::new(),
        )
    }

    #[tokio::test]
    async fn test_report_rejects_blank_title() {
        let db = MockDatabase::new(DatabaseBackend::Postgres).into_connection();
        let service = service(db);

        let input = ReportLostItemInput {
            title: String::new(),
            description: "Steel bottle".to_string(),
            category_id: "cat1".to_string(),
            location_id: "loc1".to_string(),
            custom_category: None,
            custom_location: None,
            color: None,
            size: None,
            date_lost: Utc::now().date_naive(),
            time_lost: None,
            phone: None,
            additional_details: None,
            image_filename: None,
        };

        let result = service.report(&test_user("owner1"), input).await;
        assert!(matches!(result, Err(AppError::Validation(_))));
    }

    #[tokio::test]
    async fn test_get_hides_other_owners_items() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![test_item("lost1", "owner1")]])
            .into_connection();
        let service = service(db);

        let result = service.get("lost1", &test_user("intruder")).await;
        assert!(matches!(result, Err(AppError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_delete_requires_ownership() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![test_item("lost1", "owner1")]])
            .into_connection();
        let service = service(db);

        let result = service.delete("lost1", &test_user("intruder")).await;
        assert!(matches!(result, Err(AppError::Unauthorized(_))));
    }
}
