//! Security question entity.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Question kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
#[serde(rename_all = "snake_case")]
pub enum QuestionKind {
    /// Up to four fixed choices, one correct letter
    #[sea_orm(string_value = "multiple_choice")]
    MultipleChoice,
    /// Free-text answer compared case-insensitively
    #[sea_orm(string_value = "text")]
    Text,
}

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "security_question")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,

    pub found_item_id: String,

    #[sea_orm(column_type = "Text")]
    pub question: String,

    pub kind: QuestionKind,

    #[sea_orm(nullable)]
    pub choice_a: Option<String>,

    #[sea_orm(nullable)]
    pub choice_b: Option<String>,

    #[sea_orm(nullable)]
    pub choice_c: Option<String>,

    #[sea_orm(nullable)]
    pub choice_d: Option<String>,

    /// The correct answer value; for multiple choice this is the text of
    /// the correct option
    pub answer: String,

    /// Correct option letter (A-D), multiple choice only
    #[sea_orm(nullable)]
    pub correct_choice: Option<String>,

    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::found_item::Entity",
        from = "Column::FoundItemId",
        to = "super::found_item::Column::Id",
        on_delete = "Cascade"
    )]
    FoundItem,
}

impl Related<super::found_item::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::FoundItem.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
