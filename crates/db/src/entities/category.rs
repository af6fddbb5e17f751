//! Category lookup entity.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "category")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,

    pub name: String,

    /// Lowercased name for case-insensitive find-or-create
    #[sea_orm(unique)]
    pub name_lower: String,

    #[sea_orm(column_type = "Text", nullable)]
    pub description: Option<String>,

    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::lost_item::Entity")]
    LostItems,

    #[sea_orm(has_many = "super::found_item::Entity")]
    FoundItems,
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

impl ActiveModelBehavior for ActiveModel {}
