//! Category and location lookup endpoints.

use axum::{Router, extract::State, routing::get};
use serde::Serialize;

use reclaim_common::AppResult;
use reclaim_db::entities::{category::Model as CategoryModel, location::Model as LocationModel};

use crate::{extractors::CurrentUser, response::ApiResponse, state::AppState};

/// Category response.
#[derive(Serialize)]
pub struct CategoryResponse {
    pub id: String,
    pub name: String,
    pub description: Option<String>,
}

impl From<CategoryModel> for CategoryResponse {
    fn from(c: CategoryModel) -> Self {
        Self {
            id: c.id,
            name: c.name,
            description: c.description,
        }
    }
}

/// Location response.
#[derive(Serialize)]
pub struct LocationResponse {
    pub id: String,
    pub name: String,
    pub code: String,
    pub description: Option<String>,
}

impl From<LocationModel> for LocationResponse {
    fn from(l: LocationModel) -> Self {
        Self {
            id: l.id,
            name: l.name,
            code: l.code,
            description: l.description,
        }
    }
}

async fn categories(
    CurrentUser(_user): CurrentUser,
    State(state): State<AppState>,
) -> AppResult<ApiResponse<Vec<CategoryResponse>>> {
    let categories = state.catalog_service.list_categories().await?;
    Ok(ApiResponse::ok(
        categories.into_iter().map(Into::into).collect(),
    ))
}

async fn locations(
    CurrentUser(_user): CurrentUser,
    State(state): State<AppState>,
) -> AppResult<ApiResponse<Vec<LocationResponse>>> {
    let locations = state.catalog_service.list_locations().await?;
    Ok(ApiResponse::ok(
        locations.into_iter().map(Into::into).collect(),
    ))
}

/// Create the catalog router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/categories", get(categories))
        .route("/locations", get(locations))
}
