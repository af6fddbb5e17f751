//! Security question authoring and claimant-facing retrieval.
//!
//! Finders attach 2 to 5 verification questions to a found item. Claimants
//! only ever see the prompts and choices; answers and correct letters stay
//! server side.

use chrono::{DateTime, Utc};
use sea_orm::Set;
use serde::{Deserialize, Serialize};

use reclaim_common::{AppError, AppResult, IdGenerator};
use reclaim_db::entities::security_question::{self, QuestionKind};
use reclaim_db::entities::user;
use reclaim_db::repositories::{
    ClaimAttemptRepository, FoundItemRepository, SecurityQuestionRepository,
};

use super::privacy::{PrivacyService, Visibility};

/// Fewest questions a finder may attach.
pub const MIN_QUESTIONS: usize = 2;
/// Most questions a finder may attach.
pub const MAX_QUESTIONS: usize = 5;

/// One question as authored by the finder.
#[derive(Debug, Deserialize)]
pub struct QuestionInput {
    /// Prompt shown to claimants
    pub question: String,
    /// Multiple choice or free text
    pub kind: QuestionKind,
    pub choice_a: Option<String>,
    pub choice_b: Option<String>,
    pub choice_c: Option<String>,
    pub choice_d: Option<String>,
    /// Expected answer, free-text questions only
    pub answer: Option<String>,
    /// Correct letter A-D, multiple choice only
    pub correct_choice: Option<String>,
}

/// Bulk create/replace request.
#[derive(Debug, Deserialize)]
pub struct SetQuestionsInput {
    pub found_item_id: String,
    pub questions: Vec<QuestionInput>,
}

/// A question as claimants see it. No answer fields exist on this type.
#[derive(Debug, Clone, Serialize)]
pub struct ClaimantQuestion {
    pub id: String,
    pub question: String,
    pub kind: QuestionKind,
    pub choice_a: Option<String>,
    pub choice_b: Option<String>,
    pub choice_c: Option<String>,
    pub choice_d: Option<String>,
}

impl From<security_question::Model> for ClaimantQuestion {
    fn from(model: security_question::Model) -> Self {
        Self {
            id: model.id,
            question: model.question,
            kind: model.kind,
            choice_a: model.choice_a,
            choice_b: model.choice_b,
            choice_c: model.choice_c,
            choice_d: model.choice_d,
        }
    }
}

/// Security question management.
#[derive(Clone)]
pub struct SecurityQuestionService {
    questions: SecurityQuestionRepository,
    found_items: FoundItemRepository,
    claim_attempts: ClaimAttemptRepository,
    privacy: PrivacyService,
    id_gen: IdGenerator,
}

impl SecurityQuestionService {
    /// Create a new security question service.
    #[must_use]
    pub const fn new(
        questions: SecurityQuestionRepository,
        found_items: FoundItemRepository,
        claim_attempts: ClaimAttemptRepository,
        privacy: PrivacyService,
        id_gen: IdGenerator,
    ) -> Self {
        Self {
            questions,
            found_items,
            claim_attempts,
            privacy,
            id_gen,
        }
    }

    /// Replace the question set for a found item, finder only.
    ///
    /// Locked once any claim attempt exists; attempts were graded against
    /// the old set and a swap would make them unreviewable.
    pub async fn set_questions(
        &self,
        finder: &user::Model,
        input: SetQuestionsInput,
    ) -> AppResult<Vec<security_question::Model>> {
        let item = self.found_items.get_by_id(&input.found_item_id).await?;
        if item.finder_id != finder.id {
            return Err(AppError::Unauthorized(
                "Only the finder can set security questions".to_string(),
            ));
        }

        let count = input.questions.len();
        if !(MIN_QUESTIONS..=MAX_QUESTIONS).contains(&count) {
            return Err(AppError::Validation(format!(
                "Between {MIN_QUESTIONS} and {MAX_QUESTIONS} questions are required, got {count}"
            )));
        }

        if self.claim_attempts.has_attempts(&item.id).await? {
            return Err(AppError::Conflict(
                "Questions cannot change once a claim attempt exists".to_string(),
            ));
        }

        let now = Utc::now();
        let models = input
            .questions
            .into_iter()
            .map(|q| self.build_question(&item.id, q, now))
            .collect::<AppResult<Vec<_>>>()?;

        self.questions.replace_for_item(&item.id, models).await
    }

    /// Questions for a found item as a prospective claimant sees them.
    ///
    /// Privacy-gated: while the item is still private to this viewer the
    /// questions are hidden too, as `NotFound`.
    pub async fn questions_for_claimant(
        &self,
        viewer: &user::Model,
        found_item_id: &str,
    ) -> AppResult<Vec<ClaimantQuestion>> {
        let item = self.found_items.get_by_id(found_item_id).await?;

        let visibility = self
            .privacy
            .visibility_for_viewer(&item, viewer, Utc::now())
            .await?;
        if visibility == Visibility::Private {
            return Err(AppError::NotFound(format!("Found item {found_item_id}")));
        }

        let questions = self.questions.find_by_item(&item.id).await?;
        Ok(questions.into_iter().map(ClaimantQuestion::from).collect())
    }

    fn build_question(
        &self,
        found_item_id: &str,
        input: QuestionInput,
        now: DateTime<Utc>,
    ) -> AppResult<security_question::ActiveModel> {
        let prompt = input.question.trim().to_string();
        if prompt.is_empty() {
            return Err(AppError::Validation(
                "Question text is required".to_string(),
            ));
        }

        let (choices, answer, correct_choice) = match input.kind {
            QuestionKind::MultipleChoice => {
                let choice_a = non_empty(input.choice_a);
                let choice_b = non_empty(input.choice_b);
                let choice_c = non_empty(input.choice_c);
                let choice_d = non_empty(input.choice_d);
                if choice_a.is_none() || choice_b.is_none() {
                    return Err(AppError::Validation(
                        "Multiple choice questions need at least choices A and B".to_string(),
                    ));
                }

                let letter = input
                    .correct_choice
                    .as_deref()
                    .map(|c| c.trim().to_uppercase())
                    .filter(|c| matches!(c.as_str(), "A" | "B" | "C" | "D"))
                    .ok_or_else(|| {
                        AppError::Validation(
                            "correct_choice must be one of A, B, C or D".to_string(),
                        )
                    })?;

                // The stored answer is the text of the correct option, so
                // grading and the archive read the same way for both kinds.
                let answer = match letter.as_str() {
                    "A" => choice_a.clone(),
                    "B" => choice_b.clone(),
                    "C" => choice_c.clone(),
                    _ => choice_d.clone(),
                }
                .ok_or_else(|| {
                    AppError::Validation(format!(
                        "correct_choice {letter} has no matching choice text"
                    ))
                })?;

                (
                    (choice_a, choice_b, choice_c, choice_d),
                    answer,
                    Some(letter),
                )
            }
            QuestionKind::Text => {
                let answer = non_empty(input.answer).ok_or_else(|| {
                    AppError::Validation("Text questions need an expected answer".to_string())
                })?;
                ((None, None, None, None), answer, None)
            }
        };

        Ok(security_question::ActiveModel {
            id: Set(self.id_gen.generate()),
            found_item_id: Set(found_item_id.to_string()),
            question: Set(prompt),
            kind: Set(input.kind),
            choice_a: Set(choices.0),
            choice_b: Set(choices.1),
            choice_c: Set(choices.2),
            choice_d: Set(choices.3),
            answer: Set(answer),
            correct_choice: Set(correct_choice),
            created_at: Set(now.into()),
        })
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
