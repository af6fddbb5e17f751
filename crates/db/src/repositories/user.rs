//! User repository.

use std::sync::Arc;

use crate::entities::{User, user};
use reclaim_common::{AppError, AppResult};
use sea_orm::{ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter};

/// Storage for gateway-provisioned user rows.
#[derive(Clone)]
pub struct UserRepository {
    db: Arc<DatabaseConnection>,
}

impl UserRepository {
    /// Create a new user repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Find a user by ID.
    pub async fn find_by_id(&self, id: &str) -> AppResult<Option<user::Model>> {
        User::find_by_id(id)
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Insert a freshly provisioned user.
    pub async fn create(&self, model: user::ActiveModel) -> AppResult<user::Model> {
        model
            .insert(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Delete a user row, idempotently.
    ///
    /// Lost items, found items, notifications, and claim attempts cascade
    /// away with the row; archived returns keep their name snapshots.
    pub async fn delete(&self, id: &str) -> AppResult<()> {
        User::delete_many()
            .filter(user::Column::Id.eq(id))
            .exec(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }

    /// Everyone eligible for broadcast notifications.
    pub async fn find_active_verified(&self) -> AppResult<Vec<user::Model>> {
        User::find()
            .filter(user::Column::IsActive.eq(true))
            .filter(user::Column::EmailVerified.eq(true))
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }
}
