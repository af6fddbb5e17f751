//! Database migrations.
//!
//! Schema migrations for the database.

#![allow(missing_docs)]

use sea_orm_migration::prelude::*;

mod m20250601_000001_create_user_table;
mod m20250601_000002_create_category_table;
mod m20250601_000003_create_location_table;
mod m20250601_000004_create_lost_item_table;
mod m20250601_000005_create_found_item_table;
mod m20250601_000006_create_security_question_table;
mod m20250601_000007_create_claim_attempt_table;
mod m20250601_000008_create_successful_return_table;
mod m20250601_000009_create_notification_table;
mod m20250601_000010_create_notification_log_table;
mod m20250601_000011_create_match_score_table;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20250601_000001_create_user_table::Migration),
            Box::new(m20250601_000002_create_category_table::Migration),
            Box::new(m20250601_000003_create_location_table::Migration),
            Box::new(m20250601_000004_create_lost_item_table::Migration),
            Box::new(m20250601_000005_create_found_item_table::Migration),
            Box::new(m20250601_000006_create_security_question_table::Migration),
            Box::new(m20250601_000007_create_claim_attempt_table::Migration),
            Box::new(m20250601_000008_create_successful_return_table::Migration),
            Box::new(m20250601_000009_create_notification_table::Migration),
            Box::new(m20250601_000010_create_notification_log_table::Migration),
            Box::new(m20250601_000011_create_match_score_table::Migration),
        ]
    }
}
