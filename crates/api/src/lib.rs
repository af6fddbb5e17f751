//! HTTP API layer for reclaim.
//!
//! This crate provides the REST API over the lost-and-found core:
//!
//! - **Endpoints**: lost/found reports, security questions, claims,
//!   finalization, matching, notifications, returns archive, catalog,
//!   stats, account
//! - **Extractors**: header-based identity resolution
//! - **Response**: the uniform success envelope
//!
//! Built on Axum 0.8. Authentication is out of scope: the gateway in
//! front of this service injects `X-User-Id`, `X-User-Email` and
//! `X-User-Name` headers, and [`extractors::CurrentUser`] turns them
//! into a persisted user row.

pub mod endpoints;
pub mod extractors;
pub mod response;
pub mod state;

pub use endpoints::router;
pub use state::AppState;
