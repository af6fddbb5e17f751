//! Match score pair cache entity.
//!
//! Persisted output of the batch scorer, one row per (lost, found) pair.
//! Rows cascade away with either item, so the cache never outlives the
//! records it describes.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "match_score")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,

    pub lost_item_id: String,

    pub found_item_id: String,

    pub score: f64,

    /// Per-factor contributions, for explaining the match to a user
    #[sea_orm(column_type = "JsonBinary")]
    pub breakdown: Json,

    pub computed_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::lost_item::Entity",
        from = "Column::LostItemId",
        to = "super::lost_item::Column::Id",
        on_delete = "Cascade"
    )]
    LostItem,

    #[sea_orm(
        belongs_to = "super::found_item::Entity",
        from = "Column::FoundItemId",
        to = "super::found_item::Column::Id",
        on_delete = "Cascade"
    )]
    FoundItem,
}

impl Related<super::lost_item::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::LostItem.def()
    }
}

impl Related<super::found_item::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::FoundItem.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
