//! Notification ledger entity.
//!
//! Durable idempotency ledger for the background sweeps: one row per
//! (item, kind), enforced by a unique index. A sweep inserts here before
//! notifying; a conflict means another tick or instance already handled
//! the item and the sweep skips it.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use super::notification::NotificationKind;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "notification_log")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,

    pub item_id: String,

    pub kind: NotificationKind,

    pub sent_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
