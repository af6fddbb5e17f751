//! In-app notification entity.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Notification kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(32))")]
#[serde(rename_all = "snake_case")]
pub enum NotificationKind {
    /// A found item scored high against the recipient's lost item
    #[sea_orm(string_value = "match_found")]
    MatchFound,
    /// A found item left its private period
    #[sea_orm(string_value = "item_public")]
    ItemPublic,
    /// Finder: someone submitted a claim attempt
    #[sea_orm(string_value = "claim_received")]
    ClaimReceived,
    /// A first claim succeeded and the competition window opened
    #[sea_orm(string_value = "competition_opened")]
    CompetitionOpened,
    /// Claimant: the finder accepted this attempt
    #[sea_orm(string_value = "claim_accepted")]
    ClaimAccepted,
    /// Claimant: the finder cleared this attempt
    #[sea_orm(string_value = "claim_declined")]
    ClaimDeclined,
    /// Finder: the competition window expired, time to decide
    #[sea_orm(string_value = "decision_time")]
    DecisionTime,
    /// Claimant: the item was awarded to them
    #[sea_orm(string_value = "return_finalized")]
    ReturnFinalized,
    /// Finder: the handoff was archived
    #[sea_orm(string_value = "return_completed")]
    ReturnCompleted,
    /// Claimant: the item was awarded to someone else
    #[sea_orm(string_value = "claim_unsuccessful")]
    ClaimUnsuccessful,
}

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "notification")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,

    /// The user receiving the notification
    pub user_id: String,

    pub kind: NotificationKind,

    pub title: String,

    #[sea_orm(column_type = "Text")]
    pub body: String,

    /// Related found item, by id only; the item may have been deleted
    /// by the time the notification is read
    #[sea_orm(nullable)]
    pub found_item_id: Option<String>,

    #[sea_orm(default_value = false)]
    pub is_read: bool,

    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::UserId",
        to = "super::user::Column::Id",
        on_delete = "Cascade"
    )]
    User,
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
