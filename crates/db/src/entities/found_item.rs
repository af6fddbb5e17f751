//! Found item entity.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "found_item")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,

    /// The user who reported the find
    pub finder_id: String,

    pub title: String,

    #[sea_orm(column_type = "Text")]
    pub description: String,

    pub category_id: String,

    pub location_id: String,

    #[sea_orm(nullable)]
    pub color: Option<String>,

    #[sea_orm(nullable)]
    pub size: Option<String>,

    /// Day the item was found
    pub date_found: Date,

    /// Free-text time of day
    #[sea_orm(nullable)]
    pub time_found: Option<String>,

    /// Contact details denormalized from the finder at report time
    pub finder_name: String,

    pub finder_email: String,

    #[sea_orm(nullable)]
    pub finder_phone: Option<String>,

    #[sea_orm(column_type = "Text", nullable)]
    pub finder_notes: Option<String>,

    /// Where the item is being held
    #[sea_orm(default_value = "Front Desk")]
    pub current_location: String,

    #[sea_orm(default_value = false)]
    pub is_claimed: bool,

    /// End of the private period, stamped at report time
    pub privacy_expires_at: DateTimeWithTimeZone,

    /// Set once, by the first accepted claim; anchors the competition
    /// window shared by all later claimants
    #[sea_orm(nullable)]
    pub first_potential_marked_at: Option<DateTimeWithTimeZone>,

    #[sea_orm(nullable)]
    pub image_filename: Option<String>,

    pub created_at: DateTimeWithTimeZone,

    #[sea_orm(nullable)]
    pub updated_at: Option<DateTimeWithTimeZone>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::FinderId",
        to = "super::user::Column::Id",
        on_delete = "Cascade"
    )]
    Finder,

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

    #[sea_orm(has_many = "super::security_question::Entity")]
    SecurityQuestions,

    #[sea_orm(has_many = "super::match_score::Entity")]
    MatchScores,
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Finder.def()
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

impl Related<super::security_question::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::SecurityQuestions.def()
    }
}

impl Related<super::match_score::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::MatchScores.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
