//! Lost item entity.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "lost_item")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,

    /// The user who reported the loss
    pub owner_id: String,

    pub title: String,

    #[sea_orm(column_type = "Text")]
    pub description: String,

    pub category_id: String,

    pub location_id: String,

    #[sea_orm(nullable)]
    pub color: Option<String>,

    #[sea_orm(nullable)]
    pub size: Option<String>,

    /// Day the item was lost
    pub date_lost: Date,

    /// Free-text time of day ("afternoon", "around 14:30", ...)
    #[sea_orm(nullable)]
    pub time_lost: Option<String>,

    /// Contact details denormalized from the owner at report time
    pub owner_name: String,

    pub owner_email: String,

    #[sea_orm(nullable)]
    pub owner_phone: Option<String>,

    #[sea_orm(column_type = "Text", nullable)]
    pub additional_details: Option<String>,

    #[sea_orm(nullable)]
    pub image_filename: Option<String>,

    #[sea_orm(default_value = false)]
    pub is_resolved: bool,

    pub created_at: DateTimeWithTimeZone,

    #[sea_orm(nullable)]
    pub updated_at: Option<DateTimeWithTimeZone>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::OwnerId",
        to = "super::user::Column::Id",
        on_delete = "Cascade"
    )]
    Owner,

    #[sea_orm(
        belongs_to = "super::category::Entity",
        from = "Column::CategoryId",
        to = "super::category::Column::Id"
    )]
    Category,

    #[sea_orm(
        belongs_to = "super::location::Entity",
        from = "Column::LocationId",
        to = "super::location::Column::Id"
    )]
    Location,

    #[sea_orm(has_many = "super::match_score::Entity")]
    MatchScores,
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Owner.def()
    }
}

impl Related<super::category::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Category.def()
    }
}

impl Related<super::location::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Location.def()
    }
}

impl Related<super::match_score::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::MatchScores.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
