//! Notification intent dispatch.
//!
//! Domain services describe what should be announced as a list of
//! [`NotificationIntent`]s; the dispatcher turns them into in-app
//! notification rows and, when configured, emails. Dispatch never fails
//! the operation that produced the intents.

use chrono::Utc;
use sea_orm::Set;

use reclaim_common::IdGenerator;
use reclaim_db::entities::notification::{self, NotificationKind};
use reclaim_db::repositories::NotificationRepository;

use super::email::EmailService;

/// A notification waiting to be delivered.
#[derive(Debug, Clone)]
pub struct NotificationIntent {
    /// Recipient user id
    pub user_id: String,
    /// Recipient email, when an email copy should go out
    pub email: Option<String>,
    /// What happened
    pub kind: NotificationKind,
    /// Short subject line
    pub title: String,
    /// Full message body
    pub body: String,
    /// Related found item, if any
    pub found_item_id: Option<String>,
}

/// Delivers notification intents.
#[derive(Clone)]
pub struct NotificationDispatcher {
    notifications: NotificationRepository,
    email: EmailService,
    id_gen: IdGenerator,
}

impl NotificationDispatcher {
    /// Create a new dispatcher.
    #[must_use]
    pub const fn new(
        notifications: NotificationRepository,
        email: EmailService,
        id_gen: IdGenerator,
    ) -> Self {
        Self {
            notifications,
            email,
            id_gen,
        }
    }

    /// Deliver a batch of intents.
    ///
    /// In-app rows are written in one statement; emails go out on detached
    /// tasks. Failures are logged and swallowed, the triggering operation
    /// has already committed.
    pub async fn dispatch(&self, intents: Vec<NotificationIntent>) {
        if intents.is_empty() {
            return;
        }

        let now = Utc::now();
        let rows: Vec<notification::ActiveModel> = intents
            .iter()
            .map(|intent| notification::ActiveModel {
                id: Set(self.id_gen.generate()),
                user_id: Set(intent.user_id.clone()),
                kind: Set(intent.kind),
                title: Set(intent.title.clone()),
                body: Set(intent.body.clone()),
                found_item_id: Set(intent.found_item_id.clone()),
                is_read: Set(false),
                created_at: Set(now.into()),
            })
            .collect();

        if let Err(e) = self.notifications.insert_batch(rows).await {
            tracing::warn!(error = %e, count = intents.len(), "Failed to store in-app notifications");
        }

        if !self.email.is_enabled() {
            return;
        }

        for intent in intents {
            let Some(to) = intent.email else {
                continue;
            };
            let email = self.email.clone();
            tokio::spawn(async move {
                match email.send_plain(&to, &intent.title, &intent.body).await {
                    Ok(result) if !result.success => {
                        tracing::warn!(
                            to = %to,
                            error = result.error.as_deref().unwrap_or("unknown"),
                            "Email provider rejected notification"
                        );
                    }
                    Err(e) => {
                        tracing::warn!(to = %to, error = %e, "Failed to send notification email");
                    }
                    Ok(_) => {}
                }
            });
        }
    }
}
