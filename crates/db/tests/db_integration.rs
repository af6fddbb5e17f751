//! Database integration tests.
//!
//! These tests require a running `PostgreSQL` instance.
//! Run with: `cargo test --test db_integration -- --ignored`
//!
//! Setup test database:
//!   docker-compose -f docker-compose.test.yml up -d test-db
//!
//! Environment variables:
//!   `TEST_DB_HOST` (default: localhost)
//!   `TEST_DB_PORT` (default: 5433)
//!   `TEST_DB_USER` (default: `reclaim_test`)
//!   `TEST_DB_PASSWORD` (default: `reclaim_test`)
//!   `TEST_DB_NAME` (default: `reclaim_test`)

#![allow(clippy::unwrap_used)]

use chrono::{Duration, Utc};
use reclaim_common::AppError;
use reclaim_db::entities::notification::NotificationKind;
use reclaim_db::entities::{
    category, claim_attempt, found_item, location, successful_return, user,
};
use reclaim_db::repositories::{
    ClaimAttemptRepository, FoundItemRepository, NotificationLogRepository,
    SuccessfulReturnRepository,
};
use reclaim_db::test_utils::{TestDatabase, TestDbConfig};
use sea_orm::{ActiveModelTrait, DatabaseConnection, Set};
use std::sync::Arc;

#[tokio::test]
#[ignore = "requires running PostgreSQL instance"]
async fn test_database_connection() {
    let config = TestDbConfig::default();
    let result = TestDatabase::with_config(config).await;
    assert!(result.is_ok(), "Failed to connect: {:?}", result.err());
}

#[tokio::test]
#[ignore = "requires running PostgreSQL instance"]
async fn test_database_cleanup() {
    let db = TestDatabase::new().await.expect("Failed to connect");
    let result = db.cleanup().await;
    assert!(result.is_ok(), "Cleanup failed: {:?}", result.err());
}

async fn seed_user(conn: &DatabaseConnection, id: &str, email: &str) -> user::Model {
    user::ActiveModel {
        id: Set(id.to_string()),
        name: Set(format!("User {id}")),
        email: Set(email.to_string()),
        email_lower: Set(email.to_lowercase()),
        phone: Set(None),
        is_active: Set(true),
        email_verified: Set(true),
        created_at: Set(Utc::now().into()),
        updated_at: Set(None),
    }
    .insert(conn)
    .await
    .unwrap()
}

async fn seed_catalog(conn: &DatabaseConnection) -> (category::Model, location::Model) {
    let cat = category::ActiveModel {
        id: Set("cat1".to_string()),
        name: Set("Electronics".to_string()),
        name_lower: Set("electronics".to_string()),
        description: Set(None),
        created_at: Set(Utc::now().into()),
    }
    .insert(conn)
    .await
    .unwrap();

    let loc = location::ActiveModel {
        id: Set("loc1".to_string()),
        name: Set("Library".to_string()),
        name_lower: Set("library".to_string()),
        code: Set("LIBR".to_string()),
        description: Set(None),
        created_at: Set(Utc::now().into()),
    }
    .insert(conn)
    .await
    .unwrap();

    (cat, loc)
}

async fn seed_found_item(
    conn: &DatabaseConnection,
    id: &str,
    finder: &user::Model,
) -> found_item::Model {
    let now = Utc::now();
    found_item::ActiveModel {
        id: Set(id.to_string()),
        finder_id: Set(finder.id.clone()),
        title: Set("Silver Water Bottle".to_string()),
        description: Set("Dented near the cap".to_string()),
        category_id: Set("cat1".to_string()),
        location_id: Set("loc1".to_string()),
        color: Set(Some("Silver".to_string())),
        size: Set(None),
        date_found: Set(now.date_naive()),
        time_found: Set(None),
        finder_name: Set(finder.name.clone()),
        finder_email: Set(finder.email.clone()),
        finder_phone: Set(None),
        finder_notes: Set(None),
        current_location: Set("Front Desk".to_string()),
        is_claimed: Set(false),
        privacy_expires_at: Set((now + Duration::days(3)).into()),
        first_potential_marked_at: Set(None),
        image_filename: Set(None),
        created_at: Set(now.into()),
        updated_at: Set(None),
    }
    .insert(conn)
    .await
    .unwrap()
}

fn attempt_model(id: &str, item_id: &str, claimant: &user::Model) -> claim_attempt::ActiveModel {
    claim_attempt::ActiveModel {
        id: Set(id.to_string()),
        found_item_id: Set(item_id.to_string()),
        claimant_id: Set(claimant.id.clone()),
        claimant_name: Set(claimant.name.clone()),
        claimant_email: Set(claimant.email.clone()),
        answers: Set(serde_json::json!({ "q1": "SILVER" })),
        success: Set(false),
        attempted_at: Set(Utc::now().into()),
        marked_potential_at: Set(None),
    }
}

#[tokio::test]
#[ignore = "requires running PostgreSQL instance"]
async fn test_one_attempt_per_claimant_enforced_by_index() {
    let db = TestDatabase::create_unique().await.unwrap();
    reclaim_db::migrate(db.connection()).await.unwrap();
    let conn = Arc::new(db.connection().clone());

    let finder = seed_user(&conn, "finder1", "finder@campus.edu").await;
    let claimant = seed_user(&conn, "claimant1", "claimant@campus.edu").await;
    seed_catalog(&conn).await;
    seed_found_item(&conn, "item1", &finder).await;

    let repo = ClaimAttemptRepository::new(conn);

    repo.insert_attempt(attempt_model("attempt1", "item1", &claimant))
        .await
        .unwrap();

    let second = repo
        .insert_attempt(attempt_model("attempt2", "item1", &claimant))
        .await;
    assert!(matches!(second, Err(AppError::AlreadyAttempted)));

    db.drop_database().await.unwrap();
}

#[tokio::test]
#[ignore = "requires running PostgreSQL instance"]
async fn test_window_anchor_is_set_exactly_once() {
    let db = TestDatabase::create_unique().await.unwrap();
    reclaim_db::migrate(db.connection()).await.unwrap();
    let conn = Arc::new(db.connection().clone());

    let finder = seed_user(&conn, "finder1", "finder@campus.edu").await;
    seed_catalog(&conn).await;
    seed_found_item(&conn, "item1", &finder).await;

    let repo = FoundItemRepository::new(conn);

    let first = repo
        .set_first_potential_marked_at_if_null("item1", Utc::now())
        .await
        .unwrap();
    assert!(first);

    let second = repo
        .set_first_potential_marked_at_if_null("item1", Utc::now() + Duration::hours(1))
        .await
        .unwrap();
    assert!(!second, "anchor must not move once set");

    db.drop_database().await.unwrap();
}

#[tokio::test]
#[ignore = "requires running PostgreSQL instance"]
async fn test_notification_ledger_deduplicates() {
    let db = TestDatabase::create_unique().await.unwrap();
    reclaim_db::migrate(db.connection()).await.unwrap();
    let conn = Arc::new(db.connection().clone());

    let repo = NotificationLogRepository::new(conn);

    let first = repo
        .record("log1".to_string(), "item1", NotificationKind::ItemPublic)
        .await
        .unwrap();
    assert!(first);

    let second = repo
        .record("log2".to_string(), "item1", NotificationKind::ItemPublic)
        .await
        .unwrap();
    assert!(!second, "same (item, kind) must be recorded once");

    // A different kind for the same item is a fresh entry
    let other_kind = repo
        .record("log3".to_string(), "item1", NotificationKind::DecisionTime)
        .await
        .unwrap();
    assert!(other_kind);

    db.drop_database().await.unwrap();
}

#[tokio::test]
#[ignore = "requires running PostgreSQL instance"]
async fn test_finalize_moves_item_into_archive() {
    let db = TestDatabase::create_unique().await.unwrap();
    reclaim_db::migrate(db.connection()).await.unwrap();
    let conn = Arc::new(db.connection().clone());

    let finder = seed_user(&conn, "finder1", "finder@campus.edu").await;
    let claimant = seed_user(&conn, "claimant1", "claimant@campus.edu").await;
    seed_catalog(&conn).await;
    let item = seed_found_item(&conn, "item1", &finder).await;

    let attempts = ClaimAttemptRepository::new(conn.clone());
    attempts
        .insert_attempt(attempt_model("attempt1", "item1", &claimant))
        .await
        .unwrap();

    let returns = SuccessfulReturnRepository::new(conn.clone());
    let archived = returns
        .archive_and_delete_item(
            successful_return::ActiveModel {
                id: Set("return1".to_string()),
                found_item_id: Set(item.id.clone()),
                title: Set(item.title.clone()),
                description: Set(item.description.clone()),
                category_id: Set(item.category_id.clone()),
                location_id: Set(item.location_id.clone()),
                date_found: Set(item.date_found),
                finder_id: Set(finder.id.clone()),
                finder_name: Set(finder.name.clone()),
                finder_email: Set(finder.email.clone()),
                claimant_id: Set(claimant.id.clone()),
                claimant_name: Set(claimant.name.clone()),
                claimant_email: Set(claimant.email.clone()),
                answers_provided: Set(serde_json::json!({ "q1": "SILVER" })),
                justification: Set("Answered every question correctly".to_string()),
                verification_code: Set("483920".to_string()),
                days_to_finalize: Set(3),
                finalized_at: Set(Utc::now().into()),
            },
            &item.id,
        )
        .await
        .unwrap();

    assert_eq!(archived.found_item_id, "item1");

    // The listing is gone, the attempt survives as historical record
    let items = FoundItemRepository::new(conn);
    assert!(items.find_by_id("item1").await.unwrap().is_none());
    let survivor = attempts.find_by_pair("item1", "claimant1").await.unwrap();
    assert!(survivor.is_some());

    db.drop_database().await.unwrap();
}

#[test]
fn test_config_from_env() {
    // Test that default config is valid
    let config = TestDbConfig::default();
    assert!(!config.host.is_empty());
    assert!(config.port > 0);
    assert!(!config.username.is_empty());
    assert!(!config.database.is_empty());
}

#[test]
fn test_database_url_format() {
    let config = TestDbConfig {
        host: "testhost".to_string(),
        port: 5432,
        username: "testuser".to_string(),
        password: "testpass".to_string(),
        database: "testdb".to_string(),
    };

    let url = config.database_url();
    assert!(url.starts_with("postgres://"));
    assert!(url.contains("testhost"));
    assert!(url.contains("5432"));
    assert!(url.contains("testuser"));
    assert!(url.contains("testdb"));
}

#[test]
fn test_postgres_url_format() {
    let config = TestDbConfig::default();
    let url = config.postgres_url();
    assert!(url.ends_with("/postgres"));
}
