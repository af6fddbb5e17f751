//! Application configuration.

use serde::Deserialize;
use std::path::Path;

use crate::error::{AppError, AppResult};

/// Application configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Server configuration.
    pub server: ServerConfig,
    /// Database configuration.
    pub database: DatabaseConfig,
    /// Match scoring configuration.
    #[serde(default)]
    pub matching: MatchingConfig,
    /// Privacy window configuration.
    #[serde(default)]
    pub privacy: PrivacyConfig,
    /// Claim verification configuration.
    #[serde(default)]
    pub claims: ClaimsConfig,
    /// Background sweep configuration.
    #[serde(default)]
    pub scheduler: SchedulerSettings,
    /// Outbound email configuration.
    #[serde(default)]
    pub email: EmailSettings,
}

/// Server configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Host to bind to.
    #[serde(default = "default_host")]
    pub host: String,
    /// Port to bind to.
    #[serde(default = "default_port")]
    pub port: u16,
    /// Public URL of this deployment, used when building links in emails.
    #[serde(default = "default_public_url")]
    pub public_url: String,
}

/// Database connection configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    /// `PostgreSQL` connection URL.
    pub url: String,
    /// Maximum number of connections in the pool.
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
    /// Minimum number of connections in the pool.
    #[serde(default = "default_min_connections")]
    pub min_connections: u32,
}

/// Weights and thresholds driving the match scorer and the claim engine.
///
/// The five factor weights must sum to 1.0; [`Config::validate`] enforces
/// this at load time so a misconfigured deployment fails on startup rather
/// than producing skewed scores.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct MatchWeights {
    /// Weight of category equality.
    #[serde(default = "default_category_weight")]
    pub category: f64,
    /// Weight of location equality.
    #[serde(default = "default_location_weight")]
    pub location: f64,
    /// Weight of color equality.
    #[serde(default = "default_color_weight")]
    pub color: f64,
    /// Weight of size equality.
    #[serde(default = "default_size_weight")]
    pub size: f64,
    /// Weight of description text similarity.
    #[serde(default = "default_text_weight")]
    pub text: f64,
    /// Score at or above which a lost/found pair counts as a
    /// high-confidence match, granting early visibility.
    #[serde(default = "default_high_confidence_threshold")]
    pub high_confidence_threshold: f64,
    /// Fraction of correct answers required for a scored claim to succeed.
    #[serde(default = "default_claim_success_threshold")]
    pub claim_success_threshold: f64,
}

impl Default for MatchWeights {
    fn default() -> Self {
        Self {
            category: default_category_weight(),
            location: default_location_weight(),
            color: default_color_weight(),
            size: default_size_weight(),
            text: default_text_weight(),
            high_confidence_threshold: default_high_confidence_threshold(),
            claim_success_threshold: default_claim_success_threshold(),
        }
    }
}

impl MatchWeights {
    /// Sum of the five factor weights.
    #[must_use]
    pub fn weight_sum(&self) -> f64 {
        self.category + self.location + self.color + self.size + self.text
    }
}

/// Match scoring configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct MatchingConfig {
    /// Factor weights and thresholds.
    #[serde(default)]
    pub weights: MatchWeights,
    /// Default minimum score for per-item match queries.
    #[serde(default = "default_min_score")]
    pub min_score: f64,
    /// Default number of candidates returned by per-item match queries.
    #[serde(default = "default_top_k")]
    pub top_k: u64,
    /// Default minimum score for batch matching.
    #[serde(default = "default_batch_min_score")]
    pub batch_min_score: f64,
    /// Default result cap for batch matching.
    #[serde(default = "default_batch_limit")]
    pub batch_limit: u64,
}

impl Default for MatchingConfig {
    fn default() -> Self {
        Self {
            weights: MatchWeights::default(),
            min_score: default_min_score(),
            top_k: default_top_k(),
            batch_min_score: default_batch_min_score(),
            batch_limit: default_batch_limit(),
        }
    }
}

/// How private-period found items appear to viewers without a qualifying
/// match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PrivateListingPolicy {
    /// Omit private items from listings entirely.
    Exclude,
    /// List a redacted stub: title, category and location only.
    Stub,
}

/// Privacy window configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct PrivacyConfig {
    /// Days a found item stays private after reporting.
    #[serde(default = "default_privacy_window_days")]
    pub window_days: i64,
    /// Listing shape for private items.
    #[serde(default = "default_listing_policy")]
    pub listing_policy: PrivateListingPolicy,
}

impl Default for PrivacyConfig {
    fn default() -> Self {
        Self {
            window_days: default_privacy_window_days(),
            listing_policy: default_listing_policy(),
        }
    }
}

/// How claim attempts are judged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VerificationMode {
    /// The engine grades submitted answers against the stored ones.
    Scored,
    /// Answers are stored unscored; the finder accepts an attempt manually.
    FinderAdjudicated,
}

/// Claim verification configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ClaimsConfig {
    /// Verification mode for this deployment.
    #[serde(default = "default_verification_mode")]
    pub mode: VerificationMode,
    /// Days competing claimants get after the first accepted claim.
    #[serde(default = "default_competition_window_days")]
    pub competition_window_days: i64,
    /// Minimum length of the finder's finalization justification.
    #[serde(default = "default_min_justification_chars")]
    pub min_justification_chars: usize,
}

impl Default for ClaimsConfig {
    fn default() -> Self {
        Self {
            mode: default_verification_mode(),
            competition_window_days: default_competition_window_days(),
            min_justification_chars: default_min_justification_chars(),
        }
    }
}

/// Background sweep configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct SchedulerSettings {
    /// Whether the hourly sweeps run at all.
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// Seconds between sweep ticks.
    #[serde(default = "default_tick_interval_secs")]
    pub tick_interval_secs: u64,
}

impl Default for SchedulerSettings {
    fn default() -> Self {
        Self {
            enabled: default_true(),
            tick_interval_secs: default_tick_interval_secs(),
        }
    }
}

/// Outbound email configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct EmailSettings {
    /// Whether outbound email is enabled.
    #[serde(default)]
    pub enabled: bool,
    /// Provider name: `smtp`, `sendgrid` or `mailgun`.
    #[serde(default = "default_email_provider")]
    pub provider: String,
    /// From address for all outbound mail.
    #[serde(default = "default_from_address")]
    pub from_address: String,
    /// Display name for the from address.
    #[serde(default = "default_from_name")]
    pub from_name: String,
    /// SMTP relay host.
    #[serde(default)]
    pub smtp_host: Option<String>,
    /// SMTP relay port.
    #[serde(default = "default_smtp_port")]
    pub smtp_port: u16,
    /// SMTP username.
    #[serde(default)]
    pub smtp_username: Option<String>,
    /// SMTP password.
    #[serde(default)]
    pub smtp_password: Option<String>,
    /// `SendGrid` API key.
    #[serde(default)]
    pub sendgrid_api_key: Option<String>,
    /// Mailgun API key.
    #[serde(default)]
    pub mailgun_api_key: Option<String>,
    /// Mailgun sending domain.
    #[serde(default)]
    pub mailgun_domain: Option<String>,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

const fn default_port() -> u16 {
    3000
}

fn default_public_url() -> String {
    "http://localhost:3000".to_string()
}

const fn default_max_connections() -> u32 {
    100
}

const fn default_min_connections() -> u32 {
    5
}

const fn default_category_weight() -> f64 {
    0.30
}

const fn default_location_weight() -> f64 {
    0.15
}

const fn default_color_weight() -> f64 {
    0.20
}

const fn default_size_weight() -> f64 {
    0.10
}

const fn default_text_weight() -> f64 {
    0.25
}

const fn default_high_confidence_threshold() -> f64 {
    0.70
}

// Two thirds, kept exact so two correct answers out of three pass.
const fn default_claim_success_threshold() -> f64 {
    2.0 / 3.0
}

const fn default_min_score() -> f64 {
    0.6
}

const fn default_top_k() -> u64 {
    10
}

const fn default_batch_min_score() -> f64 {
    0.3
}

const fn default_batch_limit() -> u64 {
    100
}

const fn default_privacy_window_days() -> i64 {
    3
}

const fn default_listing_policy() -> PrivateListingPolicy {
    PrivateListingPolicy::Exclude
}

const fn default_verification_mode() -> VerificationMode {
    VerificationMode::Scored
}

const fn default_competition_window_days() -> i64 {
    3
}

const fn default_min_justification_chars() -> usize {
    10
}

const fn default_true() -> bool {
    true
}

const fn default_tick_interval_secs() -> u64 {
    3600
}

fn default_email_provider() -> String {
    "smtp".to_string()
}

fn default_from_address() -> String {
    "noreply@reclaim.example".to_string()
}

fn default_from_name() -> String {
    "Campus Lost & Found".to_string()
}

const fn default_smtp_port() -> u16 {
    587
}

impl Config {
    /// Load configuration from files and environment variables.
    ///
    /// Configuration is loaded in the following order:
    /// 1. `config/default.toml`
    /// 2. `config/{environment}.toml` (based on `RECLAIM_ENV`)
    /// 3. Environment variables with `RECLAIM_` prefix
    pub fn load() -> AppResult<Self> {
        let env = std::env::var("RECLAIM_ENV").unwrap_or_else(|_| "development".to_string());

        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{env}")).required(false))
            .add_source(
                config::Environment::with_prefix("RECLAIM")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        let config: Self = config.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a specific file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> AppResult<Self> {
        let config = config::Config::builder()
            .add_source(config::File::from(path.as_ref()))
            .add_source(
                config::Environment::with_prefix("RECLAIM")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        let config: Self = config.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// Check cross-field constraints that serde cannot express.
    pub fn validate(&self) -> AppResult<()> {
        let sum = self.matching.weights.weight_sum();
        if (sum - 1.0).abs() > 1e-9 {
            return Err(AppError::Validation(format!(
                "match weights must sum to 1.0, got {sum}"
            )));
        }

        for (name, value) in [
            (
                "high_confidence_threshold",
                self.matching.weights.high_confidence_threshold,
            ),
            (
                "claim_success_threshold",
                self.matching.weights.claim_success_threshold,
            ),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(AppError::Validation(format!(
                    "{name} must be within [0, 1], got {value}"
                )));
            }
        }

        if self.privacy.window_days < 0 || self.claims.competition_window_days < 0 {
            return Err(AppError::Validation(
                "window lengths must not be negative".to_string(),
            ));
        }

        url::Url::parse(&self.server.public_url).map_err(|e| {
            AppError::Validation(format!("server.public_url is not a valid URL: {e}"))
        })?;

        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn base_config() -> Config {
        Config {
            server: ServerConfig {
                host: default_host(),
                port: default_port(),
                public_url: default_public_url(),
            },
            database: DatabaseConfig {
                url: "postgres://localhost/reclaim".to_string(),
                max_connections: default_max_connections(),
                min_connections: default_min_connections(),
            },
            matching: MatchingConfig::default(),
            privacy: PrivacyConfig::default(),
            claims: ClaimsConfig::default(),
            scheduler: SchedulerSettings::default(),
            email: EmailSettings::default(),
        }
    }

    #[test]
    fn default_weights_sum_to_one() {
        let config = base_config();
        assert!((config.matching.weights.weight_sum() - 1.0).abs() < 1e-9);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn skewed_weights_are_rejected() {
        let mut config = base_config();
        config.matching.weights.category = 0.9;
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("must sum to 1.0"));
    }

    #[test]
    fn out_of_range_threshold_is_rejected() {
        let mut config = base_config();
        config.matching.weights.high_confidence_threshold = 1.5;
        assert!(config.validate().is_err());
    }

    #[test]
    fn defaults_match_canonical_policy() {
        let config = base_config();
        assert_eq!(config.privacy.window_days, 3);
        assert_eq!(config.privacy.listing_policy, PrivateListingPolicy::Exclude);
        assert_eq!(config.claims.mode, VerificationMode::Scored);
        assert_eq!(config.claims.competition_window_days, 3);
        assert_eq!(config.claims.min_justification_chars, 10);
    }
}
