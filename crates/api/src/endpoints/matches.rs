//! Match scoring endpoints.

use std::collections::BTreeMap;

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    routing::{get, post},
};
use serde::{Deserialize, Serialize};

use reclaim_common::{AppError, AppResult};
use reclaim_core::BatchMatchPair;

use crate::{
    endpoints::{found_items::FoundItemResponse, lost_items::LostItemResponse},
    extractors::CurrentUser,
    response::ApiResponse,
    state::AppState,
};

/// Scoring knobs, both optional; the configured defaults apply.
#[derive(Debug, Default, Deserialize)]
pub struct MatchQuery {
    pub min_score: Option<f64>,
    pub top_k: Option<u64>,
}

/// Batch run knobs.
#[derive(Debug, Default, Deserialize)]
pub struct BatchMatchRequest {
    pub min_score: Option<f64>,
    pub limit: Option<u64>,
}

/// A found candidate for a lost item, shaped for the owner.
#[derive(Serialize)]
pub struct LostMatchResponse {
    pub found_item: FoundItemResponse,
    pub score: f64,
    pub breakdown: BTreeMap<String, f64>,
}

/// A lost candidate for a found item, shaped for the finder.
#[derive(Serialize)]
pub struct FoundMatchResponse {
    pub lost_item: LostItemResponse,
    pub score: f64,
    pub breakdown: BTreeMap<String, f64>,
}

async fn for_lost_item(
    CurrentUser(user): CurrentUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
    Query(query): Query<MatchQuery>,
) -> AppResult<ApiResponse<Vec<LostMatchResponse>>> {
    // Ownership check; candidates may carry finder contact details.
    state.lost_item_service.get(&id, &user).await?;

    let matches = state
        .matching_service
        .matches_for_lost(&id, query.min_score, query.top_k)
        .await?;
    Ok(ApiResponse::ok(
        matches
            .into_iter()
            .map(|m| LostMatchResponse {
                found_item: FoundItemResponse::for_viewer(m.found_item, m.visibility),
                score: m.outcome.score,
                breakdown: m.outcome.breakdown,
            })
            .collect(),
    ))
}

async fn for_found_item(
    CurrentUser(user): CurrentUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
    Query(query): Query<MatchQuery>,
) -> AppResult<ApiResponse<Vec<FoundMatchResponse>>> {
    // Candidate lost reports expose owner contact, so only the finder
    // may pull them.
    let gated = state.found_item_service.get(&user, &id).await?;
    if gated.item.finder_id != user.id {
        return Err(AppError::Unauthorized(
            "Only the finder can review matches for an item".to_string(),
        ));
    }

    let matches = state
        .matching_service
        .matches_for_found(&id, query.min_score, query.top_k)
        .await?;
    Ok(ApiResponse::ok(
        matches
            .into_iter()
            .map(|m| FoundMatchResponse {
                lost_item: m.lost_item.into(),
                score: m.outcome.score,
                breakdown: m.outcome.breakdown,
            })
            .collect(),
    ))
}

async fn run_batch(
    CurrentUser(user): CurrentUser,
    State(state): State<AppState>,
    body: Option<Json<BatchMatchRequest>>,
) -> AppResult<ApiResponse<Vec<BatchMatchPair>>> {
    let req = body.map(|Json(b)| b).unwrap_or_default();

    tracing::info!(user_id = %user.id, "Running batch match pass");

    let pairs = state
        .matching_service
        .run_batch(req.min_score, req.limit)
        .await?;
    Ok(ApiResponse::ok(pairs))
}

/// Create the matches router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/batch", post(run_batch))
        .route("/lost/{id}", get(for_lost_item))
        .route("/found/{id}", get(for_found_item))
}
