//! Returns archive endpoints.

use axum::{
    Router,
    extract::{Path, Query, State},
    routing::get,
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use reclaim_common::AppResult;
use reclaim_db::entities::successful_return::Model as ReturnModel;

use crate::{extractors::CurrentUser, response::ApiResponse, state::AppState};

const MAX_PAGE: u64 = 100;

/// Archive pagination.
#[derive(Debug, Deserialize)]
pub struct ListReturnsQuery {
    /// Maximum results (default: 50, max: 100).
    #[serde(default = "default_limit")]
    pub limit: u64,
    #[serde(default)]
    pub offset: u64,
}

const fn default_limit() -> u64 {
    50
}

/// An archived return.
///
/// The archive is browsable by anyone on campus, so the winning
/// answers, the finder's justification and the handoff code stay
/// internal; contact emails are dropped too.
#[derive(Serialize)]
pub struct ReturnResponse {
    pub id: String,
    pub found_item_id: String,
    pub title: String,
    pub description: String,
    pub category_id: String,
    pub location_id: String,
    pub date_found: NaiveDate,
    pub finder_name: String,
    pub claimant_name: String,
    pub days_to_finalize: i32,
    pub finalized_at: String,
}

impl From<ReturnModel> for ReturnResponse {
    fn from(r: ReturnModel) -> Self {
        Self {
            id: r.id,
            found_item_id: r.found_item_id,
            title: r.title,
            description: r.description,
            category_id: r.category_id,
            location_id: r.location_id,
            date_found: r.date_found,
            finder_name: r.finder_name,
            claimant_name: r.claimant_name,
            days_to_finalize: r.days_to_finalize,
            finalized_at: r.finalized_at.to_rfc3339(),
        }
    }
}

async fn list(
    CurrentUser(_user): CurrentUser,
    State(state): State<AppState>,
    Query(query): Query<ListReturnsQuery>,
) -> AppResult<ApiResponse<Vec<ReturnResponse>>> {
    let returns = state
        .finalize_service
        .list_returns(query.limit.min(MAX_PAGE), query.offset)
        .await?;
    Ok(ApiResponse::ok(returns.into_iter().map(Into::into).collect()))
}

async fn get_return(
    CurrentUser(_user): CurrentUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<ApiResponse<ReturnResponse>> {
    let archived = state.finalize_service.get_return(&id).await?;
    Ok(ApiResponse::ok(archived.into()))
}

/// Create the returns router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list))
        .route("/{id}", get(get_return))
}
