//! Periodic sweeps over the found-item listings.
//!
//! Each sweep scans for items that crossed a time boundary since the last
//! tick, claims the (item, kind) pair in the notification ledger, and only
//! then notifies. A tick that finds nothing is silent.

use std::sync::Arc;

use chrono::{Duration, Utc};
use reclaim_common::{AppResult, ClaimsConfig, IdGenerator, SchedulerSettings};
use reclaim_core::{NotificationDispatcher, NotificationIntent};
use reclaim_db::entities::notification::NotificationKind;
use reclaim_db::entities::{found_item, user};
use reclaim_db::repositories::{
    ClaimAttemptRepository, FoundItemRepository, NotificationLogRepository, UserRepository,
};
use tokio::time::interval;

/// Executor trait for the periodic sweeps.
#[async_trait::async_trait]
pub trait SweepExecutor: Send + Sync {
    /// Announce items whose privacy window has expired.
    ///
    /// Returns how many items were announced this tick.
    async fn publish_expired_items(&self) -> AppResult<u64>;

    /// Remind finders whose competition window has closed to decide.
    ///
    /// Returns how many reminders went out this tick.
    async fn remind_due_decisions(&self) -> AppResult<u64>;
}

/// Run the sweep loops with the given settings.
pub async fn run_sweeps<E: SweepExecutor + 'static>(settings: SchedulerSettings, executor: Arc<E>) {
    if !settings.enabled {
        tracing::info!("Background sweeps are disabled");
        return;
    }

    let tick = std::time::Duration::from_secs(settings.tick_interval_secs);
    let executor_public = executor.clone();
    let executor_decision = executor;

    // Spawn the public listing sweep
    tokio::spawn(async move {
        let mut interval = interval(tick);
        loop {
            interval.tick().await;
            match executor_public.publish_expired_items().await {
                Ok(count) => {
                    if count > 0 {
                        tracing::info!(count, "Announced items past their privacy window");
                    }
                }
                Err(e) => {
                    tracing::error!(error = %e, "Public listing sweep failed");
                }
            }
        }
    });

    // Spawn the decision reminder sweep
    tokio::spawn(async move {
        let mut interval = interval(tick);
        loop {
            interval.tick().await;
            match executor_decision.remind_due_decisions().await {
                Ok(count) => {
                    if count > 0 {
                        tracing::info!(count, "Sent decision reminders");
                    }
                }
                Err(e) => {
                    tracing::error!(error = %e, "Decision reminder sweep failed");
                }
            }
        }
    });
}

/// Database-backed sweep executor.
#[derive(Clone)]
pub struct Sweeper {
    found_items: FoundItemRepository,
    claim_attempts: ClaimAttemptRepository,
    users: UserRepository,
    ledger: NotificationLogRepository,
    dispatcher: NotificationDispatcher,
    id_gen: IdGenerator,
    claims: ClaimsConfig,
}

impl Sweeper {
    /// Create a new sweeper.
    #[must_use]
    pub const fn new(
        found_items: FoundItemRepository,
        claim_attempts: ClaimAttemptRepository,
        users: UserRepository,
        ledger: NotificationLogRepository,
        dispatcher: NotificationDispatcher,
        id_gen: IdGenerator,
        claims: ClaimsConfig,
    ) -> Self {
        Self {
            found_items,
            claim_attempts,
            users,
            ledger,
            dispatcher,
            id_gen,
            claims,
        }
    }
}

#[async_trait::async_trait]
impl SweepExecutor for Sweeper {
    async fn publish_expired_items(&self) -> AppResult<u64> {
        let now = Utc::now();
        let due = self.found_items.find_privacy_expired_unclaimed(now).await?;

        let mut announced: u64 = 0;
        for item in due {
            // Items with a verified claimant are already in the decision
            // path and are not announced.
            let verified = self
                .claim_attempts
                .find_successful_by_item(&item.id)
                .await?;
            if !verified.is_empty() {
                continue;
            }

            if !self
                .ledger
                .record(self.id_gen.generate(), &item.id, NotificationKind::ItemPublic)
                .await?
            {
                continue;
            }

            let recipients = self.users.find_active_verified().await?;
            let intents: Vec<NotificationIntent> = recipients
                .iter()
                .filter(|u| u.id != item.finder_id)
                .map(|u| public_listing_intent(&item, u))
                .collect();

            self.dispatcher.dispatch(intents).await;
            announced += 1;
        }

        Ok(announced)
    }

    async fn remind_due_decisions(&self) -> AppResult<u64> {
        let cutoff = Utc::now() - Duration::days(self.claims.competition_window_days);
        let due = self.found_items.find_decision_due(cutoff).await?;

        let mut reminded: u64 = 0;
        for item in due {
            if !self
                .ledger
                .record(
                    self.id_gen.generate(),
                    &item.id,
                    NotificationKind::DecisionTime,
                )
                .await?
            {
                continue;
            }

            let intent = decision_reminder_intent(&item, self.claims.competition_window_days);
            self.dispatcher.dispatch(vec![intent]).await;
            reminded += 1;
        }

        Ok(reminded)
    }
}

fn public_listing_intent(item: &found_item::Model, recipient: &user::Model) -> NotificationIntent {
    NotificationIntent {
        user_id: recipient.id.clone(),
        email: Some(recipient.email.clone()),
        kind: NotificationKind::ItemPublic,
        title: format!("Now publicly listed: {}", item.title),
        body: format!(
            "\"{}\" is now publicly listed with its full description. If it \
             is yours, answer its security questions to claim it. The item \
             is held at the {}.",
            item.title, item.current_location
        ),
        found_item_id: Some(item.id.clone()),
    }
}

fn decision_reminder_intent(item: &found_item::Model, window_days: i64) -> NotificationIntent {
    NotificationIntent {
        user_id: item.finder_id.clone(),
        email: Some(item.finder_email.clone()),
        kind: NotificationKind::DecisionTime,
        title: format!("Time to decide: {}", item.title),
        body: format!(
            "The {}-day claim window for \"{}\" has closed. Review the claim \
             attempts and finalize the return with the rightful owner.",
            window_days, item.title
        ),
        found_item_id: Some(item.id.clone()),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use reclaim_core::EmailService;
    use reclaim_db::entities::{claim_attempt, notification_log};
    use reclaim_db::repositories::NotificationRepository;
    use sea_orm::{DatabaseBackend, MockDatabase, MockExecResult};

    fn test_user(id: &str, email: &str) -> user::Model {
        let now = Utc::now();
        user::Model {
            id: id.to_string(),
            name: "Campus User".to_string(),
            email: email.to_string(),
            email_lower: email.to_lowercase(),
            phone: None,
            is_active: true,
            email_verified: true,
            created_at: now.into(),
            updated_at: None,
        }
    }

    fn test_item(id: &str, anchor: Option<chrono::DateTime<Utc>>) -> found_item::Model {
        let now = Utc::now();
        found_item::Model {
            id: id.to_string(),
            finder_id: "finder1".to_string(),
            title: "Black umbrella".to_string(),
            description: "Compact umbrella with a wooden handle".to_string(),
            category_id: "cat1".to_string(),
            location_id: "loc1".to_string(),
            color: Some("Black".to_string()),
            size: None,
            date_found: (now - Duration::days(4)).date_naive(),
            time_found: None,
            finder_name: "Fin Der".to_string(),
            finder_email: "finder@campus.example".to_string(),
            finder_phone: None,
            finder_notes: None,
            current_location: "Front Desk".to_string(),
            is_claimed: false,
            privacy_expires_at: (now - Duration::days(1)).into(),
            first_potential_marked_at: anchor.map(Into::into),
            image_filename: None,
            created_at: (now - Duration::days(4)).into(),
            updated_at: None,
        }
    }

    fn verified_attempt(item_id: &str) -> claim_attempt::Model {
        let now = Utc::now();
        claim_attempt::Model {
            id: "attempt1".to_string(),
            found_item_id: item_id.to_string(),
            claimant_id: "casey".to_string(),
            claimant_name: "Casey Claimant".to_string(),
            claimant_email: "casey@campus.example".to_string(),
            answers: serde_json::json!({ "q1": "B" }),
            success: true,
            attempted_at: now.into(),
            marked_potential_at: Some(now.into()),
        }
    }

    fn ledger_row(item_id: &str, kind: NotificationKind) -> notification_log::Model {
        notification_log::Model {
            id: "log1".to_string(),
            item_id: item_id.to_string(),
            kind,
            sent_at: Utc::now().into(),
        }
    }

    fn sweeper(db: sea_orm::DatabaseConnection) -> Sweeper {
        let db = Arc::new(db);
        let dispatcher = NotificationDispatcher::new(
            NotificationRepository::new(db.clone()),
            EmailService::new(None),
            IdGenerator::new(),
        );
        Sweeper::new(
            FoundItemRepository::new(db.clone()),
            ClaimAttemptRepository::new(db.clone()),
            UserRepository::new(db.clone()),
            NotificationLogRepository::new(db),
            dispatcher,
            IdGenerator::new(),
            ClaimsConfig::default(),
        )
    }

    #[test]
    fn test_public_listing_intent_addresses_the_recipient() {
        let item = test_item("item1", None);
        let recipient = test_user("dana", "dana@campus.example");

        let intent = public_listing_intent(&item, &recipient);
        assert_eq!(intent.user_id, "dana");
        assert_eq!(intent.email.as_deref(), Some("dana@campus.example"));
        assert_eq!(intent.kind, NotificationKind::ItemPublic);
        assert_eq!(intent.found_item_id.as_deref(), Some("item1"));
        assert!(intent.body.contains("Front Desk"));
    }

    #[test]
    fn test_decision_reminder_names_the_window_length() {
        let item = test_item("item1", Some(Utc::now() - Duration::days(4)));

        let intent = decision_reminder_intent(&item, 3);
        assert_eq!(intent.user_id, "finder1");
        assert_eq!(intent.kind, NotificationKind::DecisionTime);
        assert!(intent.body.contains("3-day"));
    }

    #[tokio::test]
    async fn test_public_sweep_broadcasts_to_everyone_but_the_finder() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![test_item("item1", None)]])
            .append_query_results([Vec::<claim_attempt::Model>::new()])
            .append_query_results([vec![ledger_row("item1", NotificationKind::ItemPublic)]])
            .append_query_results([vec![
                test_user("finder1", "finder@campus.example"),
                test_user("dana", "dana@campus.example"),
                test_user("eli", "eli@campus.example"),
            ]])
            .append_exec_results([MockExecResult { last_insert_id: 0, rows_affected: 2 }])
            .into_connection();

        let announced = sweeper(db).publish_expired_items().await.unwrap();
        assert_eq!(announced, 1);
    }

    #[tokio::test]
    async fn test_public_sweep_skips_items_with_a_verified_claimant() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![test_item("item1", None)]])
            .append_query_results([vec![verified_attempt("item1")]])
            .into_connection();

        let announced = sweeper(db).publish_expired_items().await.unwrap();
        assert_eq!(announced, 0);
    }

    #[tokio::test]
    async fn test_decision_sweep_reminds_the_finder() {
        let anchor = Utc::now() - Duration::days(4);
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![test_item("item1", Some(anchor))]])
            .append_query_results([vec![ledger_row("item1", NotificationKind::DecisionTime)]])
            .append_exec_results([MockExecResult { last_insert_id: 0, rows_affected: 1 }])
            .into_connection();

        let reminded = sweeper(db).remind_due_decisions().await.unwrap();
        assert_eq!(reminded, 1);
    }

    #[tokio::test]
    async fn test_quiet_tick_when_nothing_is_due() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([Vec::<found_item::Model>::new()])
            .append_query_results([Vec::<found_item::Model>::new()])
            .into_connection();

        let sweeper = sweeper(db);
        assert_eq!(sweeper.publish_expired_items().await.unwrap(), 0);
        assert_eq!(sweeper.remind_due_decisions().await.unwrap(), 0);
    }

    #[test]
    fn test_default_settings_tick_hourly() {
        let settings = SchedulerSettings::default();
        assert!(settings.enabled);
        assert_eq!(settings.tick_interval_secs, 3600);
    }
}
