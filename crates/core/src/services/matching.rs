//! Match scoring between lost and found items.

use std::collections::{BTreeMap, HashSet};

use chrono::Utc;
use regex::Regex;
use sea_orm::Set;
use serde::Serialize;

use reclaim_common::{AppError, AppResult, IdGenerator, MatchWeights, MatchingConfig};
use reclaim_db::entities::{found_item, lost_item, match_score};
use reclaim_db::entities::notification::NotificationKind;
use reclaim_db::repositories::{FoundItemRepository, LostItemRepository, MatchScoreRepository};

use super::dispatch::NotificationIntent;
use super::privacy::{Visibility, visibility_for};

// Token pattern for text similarity
#[allow(clippy::unwrap_used)]
static TOKEN_RE: std::sync::LazyLock<Regex> =
    std::sync::LazyLock::new(|| Regex::new(r"[a-z0-9]+").unwrap());

/// A scored lost/found pair.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MatchOutcome {
    /// Weighted sum over all factors, in `[0, 1]`
    pub score: f64,
    /// Weighted contribution of each factor, keyed by factor name
    pub breakdown: BTreeMap<String, f64>,
}

/// Score one lost/found pair.
///
/// Factor similarities are weighted by the injected configuration; with
/// weights summing to 1 the result stays in `[0, 1]`. Missing or empty
/// fields contribute 0 to their factor. Symmetric in the attribute values
/// and fully deterministic.
#[must_use]
pub fn score(
    lost: &lost_item::Model,
    found: &found_item::Model,
    weights: &MatchWeights,
) -> MatchOutcome {
    let category = f64::from(u8::from(lost.category_id == found.category_id));
    let location = f64::from(u8::from(lost.location_id == found.location_id));
    let color = optional_eq(lost.color.as_deref(), found.color.as_deref());
    let size = optional_eq(lost.size.as_deref(), found.size.as_deref());
    let text = text_overlap(
        &lost.title,
        &lost.description,
        &found.title,
        &found.description,
    );

    let mut breakdown = BTreeMap::new();
    breakdown.insert("category".to_string(), weights.category * category);
    breakdown.insert("location".to_string(), weights.location * location);
    breakdown.insert("color".to_string(), weights.color * color);
    breakdown.insert("size".to_string(), weights.size * size);
    breakdown.insert("text".to_string(), weights.text * text);

    let score = breakdown.values().sum();
    MatchOutcome { score, breakdown }
}

/// Equality of optional free-text attributes, trimmed and case-insensitive.
/// Either side missing or blank contributes nothing.
fn optional_eq(a: Option<&str>, b: Option<&str>) -> f64 {
    match (a, b) {
        (Some(a), Some(b)) => {
            let a = a.trim();
            let b = b.trim();
            f64::from(u8::from(!a.is_empty() && a.eq_ignore_ascii_case(b)))
        }
        _ => 0.0,
    }
}

/// Token overlap coefficient over title plus description.
///
/// `|A ∩ B| / min(|A|, |B|)` on lowercased alphanumeric tokens; empty
/// token sets score 0.
fn text_overlap(a_title: &str, a_desc: &str, b_title: &str, b_desc: &str) -> f64 {
    let a = tokens(a_title, a_desc);
    let b = tokens(b_title, b_desc);
    if a.is_empty() || b.is_empty() {
        return 0.0;
    }

    let intersection = a.intersection(&b).count();
    #[allow(clippy::cast_precision_loss)]
    {
        intersection as f64 / a.len().min(b.len()) as f64
    }
}

fn tokens(title: &str, description: &str) -> HashSet<String> {
    let text = format!("{title} {description}").to_lowercase();
    TOKEN_RE
        .find_iter(&text)
        .map(|m| m.as_str().to_string())
        .collect()
}

/// A candidate found item for a lost item.
#[derive(Debug, Clone)]
pub struct LostItemMatch {
    /// The candidate
    pub found_item: found_item::Model,
    /// What the viewer may see of the candidate
    pub visibility: Visibility,
    /// The pair score
    pub outcome: MatchOutcome,
}

/// A candidate lost item for a found item.
#[derive(Debug, Clone)]
pub struct FoundItemMatch {
    /// The candidate
    pub lost_item: lost_item::Model,
    /// The pair score
    pub outcome: MatchOutcome,
}

/// One pair from a batch run.
#[derive(Debug, Clone, Serialize)]
pub struct BatchMatchPair {
    /// Lost side of the pair
    pub lost_item_id: String,
    /// Found side of the pair
    pub found_item_id: String,
    /// The pair score
    pub score: f64,
}

/// Scores lost/found pairs and maintains the score cache.
#[derive(Clone)]
pub struct MatchingService {
    lost_items: LostItemRepository,
    found_items: FoundItemRepository,
    match_scores: MatchScoreRepository,
    id_gen: IdGenerator,
    config: MatchingConfig,
}

impl MatchingService {
    /// Create a new matching service.
    #[must_use]
    pub const fn new(
        lost_items: LostItemRepository,
        found_items: FoundItemRepository,
        match_scores: MatchScoreRepository,
        id_gen: IdGenerator,
        config: MatchingConfig,
    ) -> Self {
        Self {
            lost_items,
            found_items,
            match_scores,
            id_gen,
            config,
        }
    }

    /// Ranked found candidates for a lost item, scored on the fly.
    ///
    /// Candidates the owner may not see yet are dropped: during the privacy
    /// window only pairs at or above the high-confidence threshold surface.
    pub async fn matches_for_lost(
        &self,
        lost_item_id: &str,
        min_score: Option<f64>,
        top_k: Option<u64>,
    ) -> AppResult<Vec<LostItemMatch>> {
        let lost = self.lost_items.get_by_id(lost_item_id).await?;
        let candidates = self.found_items.find_unclaimed().await?;
        let now = Utc::now();
        let min_score = min_score.unwrap_or(self.config.min_score);
        let top_k = top_k.unwrap_or(self.config.top_k) as usize;

        let mut scored: Vec<LostItemMatch> = candidates
            .into_iter()
            .map(|found| {
                let outcome = score(&lost, &found, &self.config.weights);
                let high_confidence =
                    outcome.score >= self.config.weights.high_confidence_threshold;
                let visibility = visibility_for(&found, now, false, high_confidence);
                LostItemMatch {
                    found_item: found,
                    visibility,
                    outcome,
                }
            })
            .filter(|m| m.outcome.score >= min_score && m.visibility != Visibility::Private)
            .collect();

        scored.sort_by(|a, b| {
            b.outcome
                .score
                .total_cmp(&a.outcome.score)
                .then_with(|| b.found_item.created_at.cmp(&a.found_item.created_at))
        });
        scored.truncate(top_k);

        self.cache_scores(scored.iter().map(|m| {
            (
                lost.id.clone(),
                m.found_item.id.clone(),
                m.outcome.clone(),
            )
        }))
        .await?;

        Ok(scored)
    }

    /// Ranked lost candidates for a found item, scored on the fly.
    pub async fn matches_for_found(
        &self,
        found_item_id: &str,
        min_score: Option<f64>,
        top_k: Option<u64>,
    ) -> AppResult<Vec<FoundItemMatch>> {
        let found = self.found_items.get_by_id(found_item_id).await?;
        let candidates = self.lost_items.find_unresolved().await?;
        let min_score = min_score.unwrap_or(self.config.min_score);
        let top_k = top_k.unwrap_or(self.config.top_k) as usize;

        let mut scored: Vec<FoundItemMatch> = candidates
            .into_iter()
            .map(|lost| {
                let outcome = score(&lost, &found, &self.config.weights);
                FoundItemMatch {
                    lost_item: lost,
                    outcome,
                }
            })
            .filter(|m| m.outcome.score >= min_score)
            .collect();

        scored.sort_by(|a, b| {
            b.outcome
                .score
                .total_cmp(&a.outcome.score)
                .then_with(|| b.lost_item.created_at.cmp(&a.lost_item.created_at))
        });
        scored.truncate(top_k);

        self.cache_scores(scored.iter().map(|m| {
            (
                m.lost_item.id.clone(),
                found.id.clone(),
                m.outcome.clone(),
            )
        }))
        .await?;

        Ok(scored)
    }

    /// Score every unresolved lost item against every unclaimed found item.
    ///
    /// All qualifying pairs are upserted into the cache; the returned list
    /// is sorted best first and truncated to the limit.
    pub async fn run_batch(
        &self,
        min_score: Option<f64>,
        limit: Option<u64>,
    ) -> AppResult<Vec<BatchMatchPair>> {
        let min_score = min_score.unwrap_or(self.config.batch_min_score);
        let limit = limit.unwrap_or(self.config.batch_limit) as usize;

        let lost_items = self.lost_items.find_unresolved().await?;
        let found_items = self.found_items.find_unclaimed().await?;

        let mut pairs = Vec::new();
        for lost in &lost_items {
            for found in &found_items {
                let outcome = score(lost, found, &self.config.weights);
                if outcome.score >= min_score {
                    pairs.push((lost.id.clone(), found.id.clone(), outcome));
                }
            }
        }

        self.cache_scores(pairs.iter().cloned()).await?;

        pairs.sort_by(|a, b| b.2.score.total_cmp(&a.2.score));
        pairs.truncate(limit);

        Ok(pairs
            .into_iter()
            .map(|(lost_item_id, found_item_id, outcome)| BatchMatchPair {
                lost_item_id,
                found_item_id,
                score: outcome.score,
            })
            .collect())
    }

    /// Score a just-reported found item against all unresolved lost items.
    ///
    /// Qualifying pairs land in the cache so the privacy gate can grant the
    /// owners early access; owners of high-confidence matches get a
    /// notification intent. The report itself has already committed, so
    /// callers dispatch these best-effort.
    pub async fn score_new_found_item(
        &self,
        found: &found_item::Model,
    ) -> AppResult<Vec<NotificationIntent>> {
        let lost_items = self.lost_items.find_unresolved().await?;

        let mut cached = Vec::new();
        let mut intents = Vec::new();
        for lost in &lost_items {
            let outcome = score(lost, found, &self.config.weights);
            if outcome.score >= self.config.batch_min_score {
                cached.push((lost.id.clone(), found.id.clone(), outcome.clone()));
            }
            if outcome.score >= self.config.weights.high_confidence_threshold {
                intents.push(compose_match_intent(lost, found, outcome.score));
            }
        }

        self.cache_scores(cached.into_iter()).await?;
        Ok(intents)
    }

    async fn cache_scores(
        &self,
        pairs: impl Iterator<Item = (String, String, MatchOutcome)>,
    ) -> AppResult<()> {
        let now = Utc::now();
        let models: Vec<match_score::ActiveModel> = pairs
            .map(|(lost_item_id, found_item_id, outcome)| {
                let breakdown = serde_json::to_value(&outcome.breakdown)
                    .map_err(|e| AppError::Internal(e.to_string()))?;
                Ok(match_score::ActiveModel {
                    id: Set(self.id_gen.generate()),
                    lost_item_id: Set(lost_item_id),
                    found_item_id: Set(found_item_id),
                    score: Set(outcome.score),
                    breakdown: Set(breakdown),
                    computed_at: Set(now.into()),
                })
            })
            .collect::<AppResult<_>>()?;

        self.match_scores.upsert_many(models).await
    }
}

fn compose_match_intent(
    lost: &lost_item::Model,
    found: &found_item::Model,
    score: f64,
) -> NotificationIntent {
    NotificationIntent {
        user_id: lost.owner_id.clone(),
        email: Some(lost.owner_email.clone()),
        kind: NotificationKind::MatchFound,
        title: format!("Possible match for your lost {}", lost.title),
        body: format!(
            "A newly reported found item \"{}\" looks similar to your lost item \
             \"{}\" ({}% match). Open the found listings and submit a claim if it \
             is yours.",
            found.title,
            lost.title,
            (score * 100.0).round()
        ),
        found_item_id: Some(found.id.clone()),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::Duration;
    use sea_orm::{DatabaseBackend, MockDatabase, MockExecResult};
    use std::sync::Arc;

    fn test_lost(title: &str, description: &str) -> lost_item::Model {
        let now = Utc::now();
        lost_item::Model {
            id: "lost1".to_string(),
            owner_id: "owner1".to_string(),
            title: title.to_string(),
            description: description.to_string(),
            category_id: "electronics".to_string(),
            location_id: "library".to_string(),
            color: Some("Black".to_string()),
            size: None,
            date_lost: now.date_naive(),
            time_lost: None,
            owner_name: "Olive Owner".to_string(),
            owner_email: "olive@campus.example".to_string(),
            owner_phone: None,
            additional_details: None,
            image_filename: None,
            is_resolved: false,
            created_at: now.into(),
            updated_at: None,
        }
    }

    fn test_found(title: &str, description: &str) -> found_item::Model {
        let now = Utc::now();
        found_item::Model {
            id: "found1".to_string(),
            finder_id: "finder1".to_string(),
            title: title.to_string(),
            description: description.to_string(),
            category_id: "electronics".to_string(),
            location_id: "gym".to_string(),
            color: Some("black".to_string()),
            size: None,
            date_found: now.date_naive(),
            time_found: None,
            finder_name: "Finn Finder".to_string(),
            finder_email: "finn@campus.example".to_string(),
            finder_phone: None,
            finder_notes: None,
            current_location: "Front Desk".to_string(),
            is_claimed: false,
            privacy_expires_at: (now - Duration::hours(1)).into(),
            first_potential_marked_at: None,
            image_filename: None,
            created_at: now.into(),
            updated_at: None,
        }
    }

    fn service(db: sea_orm::DatabaseConnection) -> MatchingService {
        let db = Arc::new(db);
        MatchingService::new(
            LostItemRepository::new(db.clone()),
            FoundItemRepository::new(db.clone()),
            MatchScoreRepository::new(db),
            IdGenerator::new(),
            MatchingConfig::default(),
        )
    }

    #[test]
    fn test_score_weighted_sum() {
        // Same category (0.30) and color (0.20), different location, no
        // size. Tokens {macbook, pro} vs {black, macbook} overlap on one
        // of two, so text adds 0.25 * 0.5.
        let lost = test_lost("MacBook Pro", "");
        let found = test_found("Black MacBook", "");
        let outcome = score(&lost, &found, &MatchWeights::default());

        assert!((outcome.score - 0.625).abs() < 1e-9);
        assert!((outcome.breakdown["category"] - 0.30).abs() < 1e-9);
        assert!((outcome.breakdown["location"]).abs() < 1e-9);
        assert!((outcome.breakdown["color"] - 0.20).abs() < 1e-9);
        assert!((outcome.breakdown["size"]).abs() < 1e-9);
        assert!((outcome.breakdown["text"] - 0.125).abs() < 1e-9);
    }

    #[test]
    fn test_score_identical_attributes_reach_one() {
        let mut lost = test_lost("Blue umbrella", "Compact blue umbrella");
        lost.size = Some("Compact".to_string());
        let mut found = test_found("Blue umbrella", "Compact blue umbrella");
        found.location_id = lost.location_id.clone();
        found.size = Some("compact".to_string());
        let outcome = score(&lost, &found, &MatchWeights::default());

        assert!((outcome.score - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_score_symmetric_in_attributes() {
        let lost_a = test_lost("Red scarf", "Wool scarf with fringes");
        let found_a = test_found("Scarf", "Found a red wool scarf");

        let mut lost_b = test_lost("Scarf", "Found a red wool scarf");
        lost_b.color = found_a.color.clone();
        lost_b.location_id = found_a.location_id.clone();
        let mut found_b = test_found("Red scarf", "Wool scarf with fringes");
        found_b.color = lost_a.color.clone();
        found_b.location_id = lost_a.location_id.clone();

        let forward = score(&lost_a, &found_a, &MatchWeights::default());
        let reversed = score(&lost_b, &found_b, &MatchWeights::default());
        assert!((forward.score - reversed.score).abs() < 1e-12);
    }

    #[test]
    fn test_score_deterministic() {
        let lost = test_lost("Keys", "Set of dorm keys on a carabiner");
        let found = test_found("Key bundle", "Keys on a black carabiner");
        let first = score(&lost, &found, &MatchWeights::default());
        let second = score(&lost, &found, &MatchWeights::default());
        assert_eq!(first, second);
    }

    #[test]
    fn test_missing_fields_contribute_zero() {
        let mut lost = test_lost("", "");
        lost.color = None;
        lost.category_id = "clothing".to_string();
        lost.location_id = "cafeteria".to_string();
        let found = test_found("Black MacBook", "Laptop");
        let outcome = score(&lost, &found, &MatchWeights::default());

        assert!(outcome.score.abs() < 1e-9);
    }

    #[test]
    fn test_blank_color_does_not_match_blank() {
        let mut lost = test_lost("Bottle", "");
        lost.color = Some("  ".to_string());
        let mut found = test_found("Bottle", "");
        found.color = Some("".to_string());
        let outcome = score(&lost, &found, &MatchWeights::default());

        assert!((outcome.breakdown["color"]).abs() < 1e-9);
    }

    #[test]
    fn test_custom_weights_are_honored() {
        let weights = MatchWeights {
            category: 1.0,
            location: 0.0,
            color: 0.0,
            size: 0.0,
            text: 0.0,
            ..MatchWeights::default()
        };
        let lost = test_lost("A", "");
        let found = test_found("B", "");
        let outcome = score(&lost, &found, &weights);

        assert!((outcome.score - 1.0).abs() < 1e-9);
    }

    #[tokio::test]
    async fn test_matches_for_lost_unknown_anchor() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([Vec::<lost_item::Model>::new()])
            .into_connection();
        let service = service(db);

        let result = service.matches_for_lost("missing", None, None).await;
        assert!(matches!(result, Err(AppError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_matches_for_lost_scores_and_caches() {
        let lost = test_lost("MacBook Pro", "");
        let found = test_found("Black MacBook", "");
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![lost]])
            .append_query_results([vec![found]])
            .append_exec_results([MockExecResult {
                last_insert_id: 0,
                rows_affected: 1,
            }])
            .into_connection();
        let service = service(db);

        let matches = service.matches_for_lost("lost1", None, None).await.unwrap();
        assert_eq!(matches.len(), 1);
        assert!((matches[0].outcome.score - 0.625).abs() < 1e-9);
        assert_eq!(matches[0].visibility, Visibility::PublicRedacted);
    }

    #[tokio::test]
    async fn test_matches_for_lost_hides_private_candidates() {
        let lost = test_lost("MacBook Pro", "");
        let mut found = test_found("Black MacBook", "");
        found.privacy_expires_at = (Utc::now() + Duration::days(2)).into();
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![lost]])
            .append_query_results([vec![found]])
            .into_connection();
        let service = service(db);

        // Score 0.625 is below the 0.70 confidence bar, so the still-private
        // candidate must not leak into the owner's match list.
        let matches = service.matches_for_lost("lost1", None, None).await.unwrap();
        assert!(matches.is_empty());
    }

    #[tokio::test]
    async fn test_score_new_found_item_notifies_high_confidence_owner() {
        let mut lost = test_lost("Black MacBook Pro", "Black MacBook Pro laptop");
        lost.location_id = "gym".to_string();
        let found = test_found("Black MacBook Pro", "Black MacBook Pro laptop");
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![lost]])
            .append_exec_results([MockExecResult {
                last_insert_id: 0,
                rows_affected: 1,
            }])
            .into_connection();
        let service = service(db);

        let intents = service.score_new_found_item(&found).await.unwrap();
        assert_eq!(intents.len(), 1);
        assert_eq!(intents[0].user_id, "owner1");
        assert_eq!(intents[0].kind, NotificationKind::MatchFound);
        assert_eq!(intents[0].found_item_id.as_deref(), Some("found1"));
    }
}
