//! In-app notification queries.
//!
//! Ids are ULIDs, so ordering by id is ordering by creation time and
//! `until_id` gives cheap keyset pagination.

use reclaim_common::{AppError, AppResult};
use reclaim_db::entities::{notification, user};
use reclaim_db::repositories::NotificationRepository;

const DEFAULT_LIMIT: u64 = 50;
const MAX_LIMIT: u64 = 200;

/// Notification inbox for one user.
#[derive(Clone)]
pub struct NotificationService {
    notifications: NotificationRepository,
}

impl NotificationService {
    /// Create a new notification service.
    #[must_use]
    pub const fn new(notifications: NotificationRepository) -> Self {
        Self { notifications }
    }

    /// A page of the user's notifications, newest first.
    pub async fn list(
        &self,
        user: &user::Model,
        limit: Option<u64>,
        until_id: Option<&str>,
        unread_only: bool,
    ) -> AppResult<Vec<notification::Model>> {
        let limit = limit.unwrap_or(DEFAULT_LIMIT).min(MAX_LIMIT);
        self.notifications
            .page_for_user(&user.id, limit, until_id, unread_only)
            .await
    }

    /// Mark one notification read, owner only.
    ///
    /// A notification that exists but belongs to someone else reads as
    /// not found.
    pub async fn mark_read(&self, user: &user::Model, id: &str) -> AppResult<()> {
        if self.notifications.mark_read_for_user(id, &user.id).await? {
            Ok(())
        } else {
            Err(AppError::NotFound(format!("Notification {id}")))
        }
    }

    /// Mark every unread notification read; returns how many flipped.
    pub async fn mark_all_read(&self, user: &user::Model) -> AppResult<u64> {
        self.notifications.mark_all_read(&user.id).await
    }

    /// Unread count for the inbox badge.
    pub async fn unread_count(&self, user: &user::Model) -> AppResult<u64> {
        self.notifications.count_unread(&user.id).await
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::Utc;
    use sea_orm::{DatabaseBackend, MockDatabase, MockExecResult};
    use std::sync::Arc;
    use reclaim_db::entities::notification::NotificationKind;

    fn test_user(id: &str) -> user::Model {
        let now = Utc::now();
        user::Model {
            id: id.to_string(),
            name: "Nia Reader".to_string(),
            email: format!("{id}@campus.example"),
            email_lower: format!("{id}@campus.example"),
            phone: None,
            is_active: true,
            email_verified: true,
            created_at: now.into(),
            updated_at: None,
        }
    }

    fn test_notification(id: &str, user_id: &str) -> notification::Model {
        notification::Model {
            id: id.to_string(),
            user_id: user_id.to_string(),
            kind: NotificationKind::MatchFound,
            title: "Possible match".to_string(),
            body: "A found item resembles your report".to_string(),
            found_item_id: Some("found1".to_string()),
            is_read: false,
            created_at: Utc::now().into(),
        }
    }

    fn service(db: sea_orm::DatabaseConnection) -> NotificationService {
        NotificationService::new(NotificationRepository::new(Arc::new(db)))
    }

    #[tokio::test]
    async fn test_list_returns_the_page() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![
                test_notification("n2", "nia"),
                test_notification("n1", "nia"),
            ]])
            .into_connection();
        let service = service(db);

        let page = service
            .list(&test_user("nia"), None, None, false)
            .await
            .unwrap();
        assert_eq!(page.len(), 2);
        assert_eq!(page[0].id, "n2");
    }

    #[tokio::test]
    async fn test_mark_read_misses_someone_elses_row() {
        // The ownership filter keeps the update from touching anything
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_exec_results([MockExecResult {
                last_insert_id: 0,
                rows_affected: 0,
            }])
            .into_connection();
        let service = service(db);

        let result = service.mark_read(&test_user("nia"), "n1").await;
        assert!(matches!(result, Err(AppError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_mark_read_flips_an_owned_row() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_exec_results([MockExecResult {
                last_insert_id: 0,
                rows_affected: 1,
            }])
            .into_connection();
        let service = service(db);

        service.mark_read(&test_user("nia"), "n1").await.unwrap();
    }

    #[tokio::test]
    async fn test_mark_all_read_reports_how_many_flipped() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_exec_results([MockExecResult {
                last_insert_id: 0,
                rows_affected: 3,
            }])
            .into_connection();
        let service = service(db);

        let flipped = service.mark_all_read(&test_user("nia")).await.unwrap();
        assert_eq!(flipped, 3);
    }
}
