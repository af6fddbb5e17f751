//! Claim attempt entity.
//!
//! One row per (found item, claimant) pair, enforced by a unique index.
//! There is deliberately no foreign key to the found item: attempts stay
//! behind as historical record after finalization deletes the listing, and
//! display data for such orphaned attempts is resolved from the
//! corresponding successful return.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "claim_attempt")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,

    pub found_item_id: String,

    pub claimant_id: String,

    /// Claimant identity denormalized at submission time
    pub claimant_name: String,

    pub claimant_email: String,

    /// Submitted answers, keyed by question id
    #[sea_orm(column_type = "JsonBinary")]
    pub answers: Json,

    #[sea_orm(default_value = false)]
    pub success: bool,

    pub attempted_at: DateTimeWithTimeZone,

    /// When the finder (or the scorer) accepted this attempt
    #[sea_orm(nullable)]
    pub marked_potential_at: Option<DateTimeWithTimeZone>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::ClaimantId",
        to = "super::user::Column::Id",
        on_delete = "Cascade"
    )]
    Claimant,
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Claimant.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
