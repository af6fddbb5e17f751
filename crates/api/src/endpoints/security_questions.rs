//! Security question endpoints.

use axum::{Json, Router, extract::State, routing::post};
use serde::Serialize;

use reclaim_common::AppResult;
use reclaim_core::SetQuestionsInput;
use reclaim_db::entities::security_question::{Model as SecurityQuestionModel, QuestionKind};

use crate::{extractors::CurrentUser, response::ApiResponse, state::AppState};

/// A stored question echoed back to its author.
///
/// The expected answer and the correct choice letter never leave the
/// server, not even toward the finder who set them.
#[derive(Serialize)]
pub struct SecurityQuestionResponse {
    pub id: String,
    pub found_item_id: String,
    pub question: String,
    pub kind: QuestionKind,
    pub choice_a: Option<String>,
    pub choice_b: Option<String>,
    pub choice_c: Option<String>,
    pub choice_d: Option<String>,
    pub created_at: String,
}

impl From<SecurityQuestionModel> for SecurityQuestionResponse {
    fn from(q: SecurityQuestionModel) -> Self {
        Self {
            id: q.id,
            found_item_id: q.found_item_id,
            question: q.question,
            kind: q.kind,
            choice_a: q.choice_a,
            choice_b: q.choice_b,
            choice_c: q.choice_c,
            choice_d: q.choice_d,
            created_at: q.created_at.to_rfc3339(),
        }
    }
}

async fn set_questions(
    CurrentUser(user): CurrentUser,
    State(state): State<AppState>,
    Json(input): Json<SetQuestionsInput>,
) -> AppResult<ApiResponse<Vec<SecurityQuestionResponse>>> {
    let questions = state
        .security_question_service
        .set_questions(&user, input)
        .await?;
    Ok(ApiResponse::ok(
        questions.into_iter().map(Into::into).collect(),
    ))
}

/// Create the security questions router.
pub fn router() -> Router<AppState> {
    Router::new().route("/", post(set_questions))
}
