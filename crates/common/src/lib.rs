//! Common utilities and shared types for reclaim.
//!
//! This crate provides foundational components used across all reclaim
//! crates:
//!
//! - **Configuration**: Application settings via [`Config`], including the
//!   match weights and claim thresholds injected into the domain services
//! - **Error handling**: Unified error types via [`AppError`] and
//!   [`AppResult`]
//! - **ID Generation**: ULID-based identifiers and handoff verification
//!   codes via [`IdGenerator`]
//!
//! # Example
//!
//! ```no_run
//! use reclaim_common::{AppResult, Config, IdGenerator};
//!
//! fn example() -> AppResult<()> {
//!     let config = Config::load()?;
//!     let id_gen = IdGenerator::new();
//!     let id = id_gen.generate();
//!     println!("Generated ID: {}", id);
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod error;
pub mod id;

pub use config::{
    ClaimsConfig, Config, EmailSettings, MatchWeights, MatchingConfig, PrivacyConfig,
    PrivateListingPolicy, SchedulerSettings, VerificationMode,
};
pub use error::{AppError, AppResult};
pub use id::IdGenerator;
