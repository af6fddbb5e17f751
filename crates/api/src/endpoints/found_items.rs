//! Found item endpoints.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    routing::{get, post},
};
use chrono::NaiveDate;
use serde::Serialize;

use reclaim_common::AppResult;
use reclaim_core::{
    ClaimantQuestion, FoundItemFilters, ReportFoundItemInput, Visibility,
};
use reclaim_db::entities::found_item::Model as FoundItemModel;

use crate::{extractors::CurrentUser, response::ApiResponse, state::AppState};

/// Placeholder description served for still-private stubs.
const STUB_DESCRIPTION: &str = "Details withheld until the owner head-start window closes.";

/// Found item shaped for one viewer.
///
/// What survives into this struct depends on the redaction level the
/// privacy gate decided; `visibility` tells the client which shape it
/// received.
#[derive(Serialize)]
pub struct FoundItemResponse {
    pub id: String,
    pub title: String,
    pub description: Option<String>,
    pub category_id: String,
    pub location_id: String,
    pub color: Option<String>,
    pub size: Option<String>,
    pub date_found: Option<NaiveDate>,
    pub time_found: Option<String>,
    pub finder_id: Option<String>,
    pub finder_name: Option<String>,
    pub finder_email: Option<String>,
    pub finder_phone: Option<String>,
    pub finder_notes: Option<String>,
    pub current_location: Option<String>,
    pub image_filename: Option<String>,
    pub is_claimed: bool,
    pub privacy_expires_at: String,
    pub visibility: Visibility,
    pub created_at: String,
}

impl FoundItemResponse {
    /// Shape one row for a viewer at the given redaction level.
    ///
    /// `PublicFull` keeps everything. `PublicRedacted` withholds the
    /// finder's identity and contact details, the exact description,
    /// the holding desk and the photo. `Private` reduces the row to a
    /// stub of title, category and location with a fixed placeholder
    /// description.
    pub fn for_viewer(item: FoundItemModel, visibility: Visibility) -> Self {
        let mut resp = Self {
            id: item.id,
            title: item.title,
            description: Some(item.description),
            category_id: item.category_id,
            location_id: item.location_id,
            color: item.color,
            size: item.size,
            date_found: Some(item.date_found),
            time_found: item.time_found,
            finder_id: Some(item.finder_id),
            finder_name: Some(item.finder_name),
            finder_email: Some(item.finder_email),
            finder_phone: item.finder_phone,
            finder_notes: item.finder_notes,
            current_location: Some(item.current_location),
            image_filename: item.image_filename,
            is_claimed: item.is_claimed,
            privacy_expires_at: item.privacy_expires_at.to_rfc3339(),
            visibility,
            created_at: item.created_at.to_rfc3339(),
        };
        match visibility {
            Visibility::PublicFull => {}
            Visibility::PublicRedacted => resp.withhold_sensitive(),
            Visibility::Private => {
                resp.withhold_sensitive();
                resp.color = None;
                resp.size = None;
                resp.date_found = None;
                resp.time_found = None;
                resp.description = Some(STUB_DESCRIPTION.to_string());
            }
        }
        resp
    }

    fn withhold_sensitive(&mut self) {
        self.description = None;
        self.finder_id = None;
        self.finder_name = None;
        self.finder_email = None;
        self.finder_phone = None;
        self.finder_notes = None;
        self.current_location = None;
        self.image_filename = None;
    }
}

async fn report(
    CurrentUser(user): CurrentUser,
    State(state): State<AppState>,
    Json(input): Json<ReportFoundItemInput>,
) -> AppResult<ApiResponse<FoundItemResponse>> {
    let item = state.found_item_service.report(&user, input).await?;
    // The reporter is the finder and always sees the full row.
    Ok(ApiResponse::ok(FoundItemResponse::for_viewer(
        item,
        Visibility::PublicFull,
    )))
}

async fn list(
    CurrentUser(user): CurrentUser,
    State(state): State<AppState>,
    Query(filters): Query<FoundItemFilters>,
) -> AppResult<ApiResponse<Vec<FoundItemResponse>>> {
    let gated = state.found_item_service.list(&user, &filters).await?;
    Ok(ApiResponse::ok(
        gated
            .into_iter()
            .map(|g| FoundItemResponse::for_viewer(g.item, g.visibility))
            .collect(),
    ))
}

async fn get_item(
    CurrentUser(user): CurrentUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<ApiResponse<FoundItemResponse>> {
    let gated = state.found_item_service.get(&user, &id).await?;
    Ok(ApiResponse::ok(FoundItemResponse::for_viewer(
        gated.item,
        gated.visibility,
    )))
}

async fn delete_item(
    CurrentUser(user): CurrentUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<ApiResponse<()>> {
    state.found_item_service.delete(&id, &user).await?;
    Ok(ApiResponse::ok(()))
}

async fn questions(
    CurrentUser(user): CurrentUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<ApiResponse<Vec<ClaimantQuestion>>> {
    let questions = state
        .security_question_service
        .questions_for_claimant(&user, &id)
        .await?;
    Ok(ApiResponse::ok(questions))
}

/// Create the found items router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(report).get(list))
        .route("/{id}", get(get_item).delete(delete_item))
        .route("/{id}/questions", get(questions))
}
