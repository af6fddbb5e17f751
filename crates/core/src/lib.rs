//! Domain services for the lost-and-found workflow.
//!
//! Everything is re-exported at the crate root; callers construct services
//! with their repositories and configuration at startup.

pub mod services;

pub use services::*;
