//! Claim and finalization endpoints, nested under `/found-items`.

use axum::{
    Json, Router,
    extract::{Path, State},
    routing::{get, post},
};
use serde::{Deserialize, Serialize};
use tracing::info;

use reclaim_common::AppResult;
use reclaim_core::{FinalizeInput, FinalizeReceipt, GradeSummary, SubmitClaimInput};
use reclaim_db::entities::claim_attempt::Model as ClaimAttemptModel;

use crate::{extractors::CurrentUser, response::ApiResponse, state::AppState};

/// A claim attempt with the submitted answers.
///
/// Served to the claimant for their own submission and to the finder
/// when reviewing all attempts on an item.
#[derive(Serialize)]
pub struct ClaimAttemptResponse {
    pub id: String,
    pub found_item_id: String,
    pub claimant_id: String,
    pub claimant_name: String,
    pub claimant_email: String,
    pub answers: serde_json::Value,
    pub success: bool,
    pub attempted_at: String,
    pub marked_potential_at: Option<String>,
}

impl From<ClaimAttemptModel> for ClaimAttemptResponse {
    fn from(attempt: ClaimAttemptModel) -> Self {
        Self {
            id: attempt.id,
            found_item_id: attempt.found_item_id,
            claimant_id: attempt.claimant_id,
            claimant_name: attempt.claimant_name,
            claimant_email: attempt.claimant_email,
            answers: attempt.answers,
            success: attempt.success,
            attempted_at: attempt.attempted_at.to_rfc3339(),
            marked_potential_at: attempt.marked_potential_at.map(|at| at.to_rfc3339()),
        }
    }
}

/// What a submission produced.
#[derive(Serialize)]
pub struct SubmitClaimResponse {
    pub attempt: ClaimAttemptResponse,
    /// Per-question tally, scored mode only.
    pub graded: Option<GradeSummary>,
    /// True when this attempt started the item's competition window.
    pub window_opened: bool,
}

/// Accept or reject one attempt.
#[derive(Debug, Deserialize)]
pub struct DecisionRequest {
    pub accept: bool,
}

async fn submit(
    CurrentUser(user): CurrentUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(input): Json<SubmitClaimInput>,
) -> AppResult<ApiResponse<SubmitClaimResponse>> {
    let submission = state.claim_service.submit_claim(&user, &id, input).await?;
    Ok(ApiResponse::ok(SubmitClaimResponse {
        attempt: submission.attempt.into(),
        graded: submission.graded,
        window_opened: submission.window_opened,
    }))
}

async fn attempts(
    CurrentUser(user): CurrentUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<ApiResponse<Vec<ClaimAttemptResponse>>> {
    let attempts = state.claim_service.attempts_for_item(&user, &id).await?;
    Ok(ApiResponse::ok(
        attempts.into_iter().map(Into::into).collect(),
    ))
}

async fn decide(
    CurrentUser(user): CurrentUser,
    State(state): State<AppState>,
    Path((id, claimant_id)): Path<(String, String)>,
    Json(req): Json<DecisionRequest>,
) -> AppResult<ApiResponse<ClaimAttemptResponse>> {
    let attempt = state
        .claim_service
        .decide_attempt(&user, &id, &claimant_id, req.accept)
        .await?;
    Ok(ApiResponse::ok(attempt.into()))
}

async fn finalize(
    CurrentUser(user): CurrentUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(input): Json<FinalizeInput>,
) -> AppResult<ApiResponse<FinalizeReceipt>> {
    info!(user_id = %user.id, found_item_id = %id, "Finalizing return");

    let receipt = state.finalize_service.finalize(&user, &id, input).await?;
    Ok(ApiResponse::ok(receipt))
}

/// Create the claims router, merged into the found items subtree.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/{id}/claims", post(submit).get(attempts))
        .route("/{id}/claims/{claimant_id}/decision", post(decide))
        .route("/{id}/finalize", post(finalize))
}
