//! Dashboard statistics endpoint.

use axum::{Router, extract::State, routing::get};

use reclaim_common::AppResult;
use reclaim_core::StatsOverview;

use crate::{extractors::CurrentUser, response::ApiResponse, state::AppState};

async fn overview(
    CurrentUser(_user): CurrentUser,
    State(state): State<AppState>,
) -> AppResult<ApiResponse<StatsOverview>> {
    let stats = state.stats_service.overview().await?;
    Ok(ApiResponse::ok(stats))
}

/// Create the stats router.
pub fn router() -> Router<AppState> {
    Router::new().route("/stats", get(overview))
}
