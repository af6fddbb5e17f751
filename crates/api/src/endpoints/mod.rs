//! API endpoints.

mod account;
mod catalog;
mod claims;
mod found_items;
mod lost_items;
mod matches;
mod notifications;
mod returns;
mod security_questions;
mod stats;

use axum::Router;

use crate::state::AppState;

/// Create the API router.
///
/// Mounted under `/api` by the server binary; claim routes live inside
/// the found items subtree because claims address `/found-items/{id}`.
pub fn router() -> Router<AppState> {
    Router::new()
        .nest("/lost-items", lost_items::router())
        .nest("/found-items", found_items::router().merge(claims::router()))
        .nest("/security-questions", security_questions::router())
        .nest("/matches", matches::router())
        .nest("/notifications", notifications::router())
        .nest("/returns", returns::router())
        .merge(catalog::router())
        .merge(stats::router())
        .merge(account::router())
}
