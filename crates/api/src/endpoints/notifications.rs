//! Notification endpoints.

use axum::{
    Router,
    extract::{Path, Query, State},
    routing::{get, post},
};
use serde::{Deserialize, Serialize};

use reclaim_common::AppResult;
use reclaim_db::entities::notification::{Model as NotificationModel, NotificationKind};

use crate::{extractors::CurrentUser, response::ApiResponse, state::AppState};

/// List notifications request.
#[derive(Debug, Default, Deserialize)]
pub struct ListNotificationsQuery {
    /// Maximum results; the service clamps the upper bound.
    pub limit: Option<u64>,
    /// Cursor for pagination, before this id.
    pub until_id: Option<String>,
    /// Only unread notifications.
    #[serde(default)]
    pub unread_only: bool,
}

/// Notification response.
#[derive(Serialize)]
pub struct NotificationResponse {
    pub id: String,
    pub kind: NotificationKind,
    pub title: String,
    pub body: String,
    pub found_item_id: Option<String>,
    pub is_read: bool,
    pub created_at: String,
}

impl From<NotificationModel> for NotificationResponse {
    fn from(n: NotificationModel) -> Self {
        Self {
            id: n.id,
            kind: n.kind,
            title: n.title,
            body: n.body,
            found_item_id: n.found_item_id,
            is_read: n.is_read,
            created_at: n.created_at.to_rfc3339(),
        }
    }
}

/// Unread counter.
#[derive(Serialize)]
pub struct UnreadCountResponse {
    pub count: u64,
}

/// How many rows a bulk read-marking touched.
#[derive(Serialize)]
pub struct MarkAllReadResponse {
    pub updated: u64,
}

async fn list(
    CurrentUser(user): CurrentUser,
    State(state): State<AppState>,
    Query(query): Query<ListNotificationsQuery>,
) -> AppResult<ApiResponse<Vec<NotificationResponse>>> {
    let notifications = state
        .notification_service
        .list(
            &user,
            query.limit,
            query.until_id.as_deref(),
            query.unread_only,
        )
        .await?;
    Ok(ApiResponse::ok(
        notifications.into_iter().map(Into::into).collect(),
    ))
}

async fn unread_count(
    CurrentUser(user): CurrentUser,
    State(state): State<AppState>,
) -> AppResult<ApiResponse<UnreadCountResponse>> {
    let count = state.notification_service.unread_count(&user).await?;
    Ok(ApiResponse::ok(UnreadCountResponse { count }))
}

async fn mark_read(
    CurrentUser(user): CurrentUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<ApiResponse<()>> {
    state.notification_service.mark_read(&user, &id).await?;
    Ok(ApiResponse::ok(()))
}

async fn mark_all_read(
    CurrentUser(user): CurrentUser,
    State(state): State<AppState>,
) -> AppResult<ApiResponse<MarkAllReadResponse>> {
    let updated = state.notification_service.mark_all_read(&user).await?;
    Ok(ApiResponse::ok(MarkAllReadResponse { updated }))
}

/// Create the notifications router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list))
        .route("/unread-count", get(unread_count))
        .route("/{id}/read", post(mark_read))
        .route("/read-all", post(mark_all_read))
}
