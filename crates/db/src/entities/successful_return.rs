//! Successful return entity.
//!
//! Append-only archive created by finalization. Carries no foreign keys so
//! rows survive the deletion of the item, the finder or the claimant.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "successful_return")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,

    /// Id of the found item this archive replaced
    pub found_item_id: String,

    pub title: String,

    #[sea_orm(column_type = "Text")]
    pub description: String,

    pub category_id: String,

    pub location_id: String,

    pub date_found: Date,

    pub finder_id: String,

    pub finder_name: String,

    pub finder_email: String,

    pub claimant_id: String,

    pub claimant_name: String,

    pub claimant_email: String,

    /// The winning claimant's submitted answers, snapshotted
    #[sea_orm(column_type = "JsonBinary")]
    pub answers_provided: Json,

    /// The finder's stated reason for awarding the item
    #[sea_orm(column_type = "Text")]
    pub justification: String,

    /// Six-digit code read aloud at the in-person handoff
    pub verification_code: String,

    /// Whole days from the found date to finalization
    pub days_to_finalize: i32,

    pub finalized_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
