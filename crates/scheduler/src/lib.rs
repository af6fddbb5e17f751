//! Hourly background sweeps for reclaim.
//!
//! Two periodic jobs poll the database:
//!
//! - **Public listing sweep**: items whose privacy window has expired are
//!   announced to the whole campus as fully visible listings
//! - **Decision reminder sweep**: finders whose competition window has
//!   closed are reminded to pick the rightful owner and finalize
//!
//! Both sweeps are idempotent across ticks and across instances through
//! the notification ledger.

pub mod sweeps;

pub use sweeps::{SweepExecutor, Sweeper, run_sweeps};
