//! Category and location lookups.
//!
//! Both are reference data created implicitly: reporting flows pass the
//! sentinel id `other` plus a custom name, and the catalog reuses an
//! existing row case-insensitively or creates one.

use chrono::Utc;
use sea_orm::Set;

use reclaim_common::{AppError, AppResult, IdGenerator};
use reclaim_db::entities::{category, location};
use reclaim_db::repositories::{CategoryRepository, LocationRepository};

/// Sentinel id that triggers find-or-create with a custom name.
const OTHER_SENTINEL: &str = "other";

/// Number of leading characters used for a generated location code.
const LOCATION_CODE_LEN: usize = 4;

/// Catalog lookups and implicit creation.
#[derive(Clone)]
pub struct CatalogService {
    categories: CategoryRepository,
    locations: LocationRepository,
    id_gen: IdGenerator,
}

impl CatalogService {
    /// Create a new catalog service.
    #[must_use]
    pub const fn new(
        categories: CategoryRepository,
        locations: LocationRepository,
        id_gen: IdGenerator,
    ) -> Self {
        Self {
            categories,
            locations,
            id_gen,
        }
    }

    /// All categories, alphabetically.
    pub async fn list_categories(&self) -> AppResult<Vec<category::Model>> {
        self.categories.find_all().await
    }

    /// All locations, alphabetically.
    pub async fn list_locations(&self) -> AppResult<Vec<location::Model>> {
        self.locations.find_all().await
    }

    /// Resolve a category reference from a report.
    ///
    /// `other` plus a custom name reuses or creates a row; any other id
    /// must already exist.
    pub async fn resolve_category(
        &self,
        category_id: &str,
        custom_name: Option<&str>,
    ) -> AppResult<category::Model> {
        if !category_id.eq_ignore_ascii_case(OTHER_SENTINEL) {
            return self.categories.get_by_id(category_id).await;
        }

        let name = custom_name.map(str::trim).unwrap_or_default();
        if name.is_empty() {
            return Err(AppError::Validation(
                "A custom category name is required when selecting \"other\"".to_string(),
            ));
        }

        if let Some(existing) = self.categories.find_by_name(name).await? {
            return Ok(existing);
        }

        self.categories
            .create(category::ActiveModel {
                id: Set(self.id_gen.generate()),
                name: Set(name.to_string()),
                name_lower: Set(name.to_lowercase()),
                description: Set(Some(format!("Custom category: {name}"))),
                created_at: Set(Utc::now().into()),
            })
            .await
    }

    /// Resolve a location reference from a report.
    pub async fn resolve_location(
        &self,
        location_id: &str,
        custom_name: Option<&str>,
    ) -> AppResult<location::Model> {
        if !location_id.eq_ignore_ascii_case(OTHER_SENTINEL) {
            return self.locations.get_by_id(location_id).await;
        }

        let name = custom_name.map(str::trim).unwrap_or_default();
        if name.is_empty() {
            return Err(AppError::Validation(
                "A custom location name is required when selecting \"other\"".to_string(),
            ));
        }

        if let Some(existing) = self.locations.find_by_name(name).await? {
            return Ok(existing);
        }

        let code: String = name
            .chars()
            .take(LOCATION_CODE_LEN)
            .collect::<String>()
            .to_uppercase();

        self.locations
            .create(location::ActiveModel {
                id: Set(self.id_gen.generate()),
                name: Set(name.to_string()),
                name_lower: Set(name.to_lowercase()),
                code: Set(code),
                description: Set(Some(format!("Custom location: {name}"))),
                created_at: Set(Utc::now().into()),
            })
            .await
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use sea_orm::{DatabaseBackend, MockDatabase, MockExecResult};
    use std::sync::Arc;

    fn test_category(id: &str, name: &str) -> category::Model {
        category::Model {
            id: id.to_string(),
            name: name.to_string(),
            name_lower: name.to_lowercase(),
            description: None,
            created_at: Utc::now().into(),
        }
    }

    fn test_location(id: &str, name: &str, code: &str) -> location::Model {
        location::Model {
            id: id.to_string(),
            name: name.to_string(),
            name_lower: name.to_lowercase(),
            code: code.to_string(),
            description: None,
            created_at: Utc::now().into(),
        }
    }

    fn service(db: sea_orm::DatabaseConnection) -> CatalogService {
        let db = Arc::new(db);
        CatalogService::new(
            CategoryRepository::new(db.clone()),
            LocationRepository::new(db),
            IdGenerator::new(),
        )
    }

    #[tokio::test]
    async fn test_resolve_category_by_id() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![test_category("cat1", "Electronics")]])
            .into_connection();
        let service = service(db);

        let resolved = service.resolve_category("cat1", None).await.unwrap();
        assert_eq!(resolved.name, "Electronics");
    }

    #[tokio::test]
    async fn test_resolve_category_other_without_name() {
        let db = MockDatabase::new(DatabaseBackend::Postgres).into_connection();
        let service = service(db);

        let result = service.resolve_category("other", Some("   ")).await;
        assert!(matches!(result, Err(AppError::Validation(_))));
    }

    #[tokio::test]
    async fn test_resolve_category_other_reuses_existing() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![test_category("cat9", "Board Games")]])
            .into_connection();
        let service = service(db);

        let resolved = service
            .resolve_category("other", Some("board games"))
            .await
            .unwrap();
        assert_eq!(resolved.id, "cat9");
    }

    #[tokio::test]
    async fn test_resolve_location_other_creates_with_code() {
        let created = test_location("loc9", "Rockwell Hall", "ROCK");
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([Vec::<location::Model>::new()])
            .append_query_results([vec![created]])
            .append_exec_results([MockExecResult {
                last_insert_id: 0,
                rows_affected: 1,
            }])
            .into_connection();
        let service = service(db);

        let resolved = service
            .resolve_location("other", Some("Rockwell Hall"))
            .await
            .unwrap();
        assert_eq!(resolved.code, "ROCK");
    }
}
