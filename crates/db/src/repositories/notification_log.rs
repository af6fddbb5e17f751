//! Notification ledger repository.

use std::sync::Arc;

use crate::entities::notification::NotificationKind;
use crate::entities::notification_log;
use reclaim_common::{AppError, AppResult};
use sea_orm::{ActiveModelTrait, DatabaseConnection, Set, SqlErr};

/// Repository for the sweep idempotency ledger.
#[derive(Clone)]
pub struct NotificationLogRepository {
    db: Arc<DatabaseConnection>,
}

impl NotificationLogRepository {
    /// Create a new notification ledger repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Record that a sweep is handling (item, kind).
    ///
    /// Returns `false` when the pair is already in the ledger, meaning
    /// another tick or instance got there first and the caller must not
    /// notify. The unique index makes this safe across instances.
    pub async fn record(
        &self,
        id: String,
        item_id: &str,
        kind: NotificationKind,
    ) -> AppResult<bool> {
        let model = notification_log::ActiveModel {
            id: Set(id),
            item_id: Set(item_id.to_string()),
            kind: Set(kind),
            sent_at: Set(chrono::Utc::now().into()),
        };

        match model.insert(self.db.as_ref()).await {
            Ok(_) => Ok(true),
            Err(e) if matches!(e.sql_err(), Some(SqlErr::UniqueConstraintViolation(_))) => {
                Ok(false)
            }
            Err(e) => Err(AppError::Database(e.to_string())),
        }
    }
}
