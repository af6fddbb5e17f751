//! Lost item endpoints.

use axum::{
    Json, Router,
    extract::{Path, State},
    routing::{get, post},
};
use chrono::NaiveDate;
use serde::Serialize;

use reclaim_common::AppResult;
use reclaim_core::ReportLostItemInput;
use reclaim_db::entities::lost_item::Model as LostItemModel;

use crate::{extractors::CurrentUser, response::ApiResponse, state::AppState};

/// Lost item as its owner sees it.
///
/// Lost reports are only ever served to their owner, so nothing here
/// is redacted.
#[derive(Serialize)]
pub struct LostItemResponse {
    pub id: String,
    pub owner_id: String,
    pub title: String,
    pub description: String,
    pub category_id: String,
    pub location_id: String,
    pub color: Option<String>,
    pub size: Option<String>,
    pub date_lost: NaiveDate,
    pub time_lost: Option<String>,
    pub owner_name: String,
    pub owner_email: String,
    pub owner_phone: Option<String>,
    pub additional_details: Option<String>,
    pub image_filename: Option<String>,
    pub is_resolved: bool,
    pub created_at: String,
}

impl From<LostItemModel> for LostItemResponse {
    fn from(item: LostItemModel) -> Self {
        Self {
            id: item.id,
            owner_id: item.owner_id,
            title: item.title,
            description: item.description,
            category_id: item.category_id,
            location_id: item.location_id,
            color: item.color,
            size: item.size,
            date_lost: item.date_lost,
            time_lost: item.time_lost,
            owner_name: item.owner_name,
            owner_email: item.owner_email,
            owner_phone: item.owner_phone,
            additional_details: item.additional_details,
            image_filename: item.image_filename,
            is_resolved: item.is_resolved,
            created_at: item.created_at.to_rfc3339(),
        }
    }
}

async fn report(
    CurrentUser(user): CurrentUser,
    State(state): State<AppState>,
    Json(input): Json<ReportLostItemInput>,
) -> AppResult<ApiResponse<LostItemResponse>> {
    let item = state.lost_item_service.report(&user, input).await?;
    Ok(ApiResponse::ok(item.into()))
}

async fn my_items(
    CurrentUser(user): CurrentUser,
    State(state): State<AppState>,
) -> AppResult<ApiResponse<Vec<LostItemResponse>>> {
    let items = state.lost_item_service.my_items(&user).await?;
    Ok(ApiResponse::ok(items.into_iter().map(Into::into).collect()))
}

async fn get_item(
    CurrentUser(user): CurrentUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<ApiResponse<LostItemResponse>> {
    let item = state.lost_item_service.get(&id, &user).await?;
    Ok(ApiResponse::ok(item.into()))
}

async fn delete_item(
    CurrentUser(user): CurrentUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<ApiResponse<()>> {
    state.lost_item_service.delete(&id, &user).await?;
    Ok(ApiResponse::ok(()))
}

/// Create the lost items router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(report).get(my_items))
        .route("/{id}", get(get_item).delete(delete_item))
}
