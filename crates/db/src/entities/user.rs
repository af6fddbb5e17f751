//! User entity.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "user")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,

    /// Display name shown on reports and claims
    pub name: String,

    #[sea_orm(unique)]
    pub email: String,

    /// Lowercased email for case-insensitive lookup
    pub email_lower: String,

    #[sea_orm(nullable)]
    pub phone: Option<String>,

    /// Inactive accounts are excluded from broadcast notifications
    #[sea_orm(default_value = true)]
    pub is_active: bool,

    /// Only verified addresses receive broadcast notifications
    #[sea_orm(default_value = false)]
    pub email_verified: bool,

    pub created_at: DateTimeWithTimeZone,

    #[sea_orm(nullable)]
    pub updated_at: Option<DateTimeWithTimeZone>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::lost_item::Entity")]
    LostItems,

    #[sea_orm(has_many = "super::found_item::Entity")]
    FoundItems,

    #[sea_orm(has_many = "super::notification::Entity")]
    Notifications,

    #[sea_orm(has_many = "super::claim_attempt::Entity")]
    ClaimAttempts,
}

impl Related<super::lost_item::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::LostItems.def()
    }
}

impl Related<super::found_item::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::FoundItems.def()
    }
}

impl Related<super::notification::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Notifications.def()
    }
}

impl Related<super::claim_attempt::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ClaimAttempts.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
