//! Account endpoints.

use axum::{Router, extract::State, routing::delete};
use tracing::info;

use reclaim_common::AppResult;

use crate::{extractors::CurrentUser, response::ApiResponse, state::AppState};

/// Delete the calling user's account.
///
/// Lost reports, found reports, claim attempts and notifications
/// cascade away with the row. Archived returns keep their denormalized
/// name snapshots.
async fn delete_account(
    CurrentUser(user): CurrentUser,
    State(state): State<AppState>,
) -> AppResult<ApiResponse<()>> {
    info!(user_id = %user.id, "Deleting account");

    state.user_service.delete_account(&user.id).await?;
    Ok(ApiResponse::ok(()))
}

/// Create the account router.
pub fn router() -> Router<AppState> {
    Router::new().route("/account", delete(delete_account))
}
