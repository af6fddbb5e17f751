//! Identity intake and account deletion.

use chrono::Utc;
use sea_orm::Set;

use reclaim_common::AppResult;
use reclaim_db::entities::user;
use reclaim_db::repositories::UserRepository;

/// Trusted identity fields forwarded by the gateway.
#[derive(Debug, Clone)]
pub struct Identity {
    pub id: String,
    pub email: String,
    pub name: String,
}

/// User provisioning keyed on the gateway identity.
#[derive(Clone)]
pub struct UserService {
    users: UserRepository,
}

impl UserService {
    /// Create a new user service.
    #[must_use]
    pub const fn new(users: UserRepository) -> Self {
        Self { users }
    }

    /// Resolve the calling identity to a user row, creating it on first
    /// contact.
    ///
    /// Identity arrives pre-verified from the gateway, so new rows start
    /// active and email-verified. Two first requests can race on the
    /// insert; the loser reads the surviving row.
    pub async fn ensure_user(&self, identity: &Identity) -> AppResult<user::Model> {
        if let Some(existing) = self.users.find_by_id(&identity.id).await? {
            return Ok(existing);
        }

        let created = self
            .users
            .create(user::ActiveModel {
                id: Set(identity.id.clone()),
                name: Set(identity.name.clone()),
                email: Set(identity.email.clone()),
                email_lower: Set(identity.email.to_lowercase()),
                phone: Set(None),
                is_active: Set(true),
                email_verified: Set(true),
                created_at: Set(Utc::now().into()),
                updated_at: Set(None),
            })
            .await;

        match created {
            Ok(user) => Ok(user),
            Err(e) => self.users.find_by_id(&identity.id).await?.ok_or(e),
        }
    }

    /// Delete the user row; lost items, found items, claim attempts, and
    /// notifications cascade away with it.
    pub async fn delete_account(&self, user_id: &str) -> AppResult<()> {
        self.users.delete(user_id).await
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use sea_orm::{DatabaseBackend, MockDatabase};
    use std::sync::Arc;

    fn existing_user(id: &str) -> user::Model {
        let now = Utc::now();
        user::Model {
            id: id.to_string(),
            name: "Sam Known".to_string(),
            email: "sam@campus.example".to_string(),
            email_lower: "sam@campus.example".to_string(),
            phone: None,
            is_active: true,
            email_verified: true,
            created_at: now.into(),
            updated_at: None,
        }
    }

    fn identity(id: &str) -> Identity {
        Identity {
            id: id.to_string(),
            email: "Sam@Campus.example".to_string(),
            name: "Sam Known".to_string(),
        }
    }

    #[tokio::test]
    async fn test_ensure_user_returns_the_existing_row() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![existing_user("sam")]])
            .into_connection();
        let service = UserService::new(UserRepository::new(Arc::new(db)));

        let user = service.ensure_user(&identity("sam")).await.unwrap();
        assert_eq!(user.id, "sam");
        assert_eq!(user.email_lower, "sam@campus.example");
    }

    #[tokio::test]
    async fn test_ensure_user_provisions_on_first_contact() {
        let mut created = existing_user("sam");
        created.email = "Sam@Campus.example".to_string();

        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([Vec::<user::Model>::new()])
            .append_query_results([vec![created]])
            .into_connection();
        let service = UserService::new(UserRepository::new(Arc::new(db)));

        let user = service.ensure_user(&identity("sam")).await.unwrap();
        assert_eq!(user.id, "sam");
        assert!(user.is_active);
        assert!(user.email_verified);
    }
}
