//! Claim submission and finder adjudication.
//!
//! A found item moves from unclaimed through an open challenge to a
//! potential claimant, then finalization archives it. Rejected attempts
//! leave the item where it was.

use std::collections::HashMap;

use chrono::{Duration, Utc};
use sea_orm::Set;
use serde::{Deserialize, Serialize};

use reclaim_common::{AppError, AppResult, ClaimsConfig, IdGenerator, VerificationMode};
use reclaim_db::entities::notification::NotificationKind;
use reclaim_db::entities::security_question::QuestionKind;
use reclaim_db::entities::{claim_attempt, found_item, security_question, user};
use reclaim_db::repositories::{
    ClaimAttemptRepository, FoundItemRepository, SecurityQuestionRepository, UserRepository,
};

use super::dispatch::{NotificationDispatcher, NotificationIntent};

/// Answers keyed by question id.
#[derive(Debug, Deserialize)]
pub struct SubmitClaimInput {
    pub answers: HashMap<String, String>,
}

/// Grading result for one scored attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct GradeSummary {
    pub correct: usize,
    pub total: usize,
    pub passed: bool,
}

/// What a submission produced.
#[derive(Debug, Serialize)]
pub struct ClaimSubmission {
    /// The stored attempt, including its success flag
    pub attempt: claim_attempt::Model,
    /// Per-question tally, scored mode only
    pub graded: Option<GradeSummary>,
    /// True when this attempt started the item's competition window
    pub window_opened: bool,
}

/// Grade submitted answers against an item's question set.
///
/// Multiple choice compares the chosen letter with the stored correct
/// letter; free text compares trimmed uppercase strings. A question with
/// no submitted answer counts as wrong.
#[must_use]
pub fn grade_answers(
    questions: &[security_question::Model],
    answers: &HashMap<String, String>,
    pass_threshold: f64,
) -> GradeSummary {
    let total = questions.len();
    let correct = questions
        .iter()
        .filter(|q| {
            answers
                .get(&q.id)
                .is_some_and(|given| answer_is_correct(q, given))
        })
        .count();

    #[allow(clippy::cast_precision_loss)]
    let passed = total > 0 && (correct as f64) / (total as f64) >= pass_threshold;
    GradeSummary {
        correct,
        total,
        passed,
    }
}

fn answer_is_correct(question: &security_question::Model, given: &str) -> bool {
    let given = given.trim().to_uppercase();
    match question.kind {
        QuestionKind::MultipleChoice => question
            .correct_choice
            .as_deref()
            .is_some_and(|expected| given == expected.trim().to_uppercase()),
        QuestionKind::Text => given == question.answer.trim().to_uppercase(),
    }
}

/// Claim verification engine.
#[derive(Clone)]
pub struct ClaimService {
    claim_attempts: ClaimAttemptRepository,
    found_items: FoundItemRepository,
    questions: SecurityQuestionRepository,
    users: UserRepository,
    id_gen: IdGenerator,
    dispatcher: NotificationDispatcher,
    claims: ClaimsConfig,
    pass_threshold: f64,
}

impl ClaimService {
    /// Create a new claim service.
    #[must_use]
    #[allow(clippy::too_many_arguments)]
    pub const fn new(
        claim_attempts: ClaimAttemptRepository,
        found_items: FoundItemRepository,
        questions: SecurityQuestionRepository,
        users: UserRepository,
        id_gen: IdGenerator,
        dispatcher: NotificationDispatcher,
        claims: ClaimsConfig,
        pass_threshold: f64,
    ) -> Self {
        Self {
            claim_attempts,
            found_items,
            questions,
            users,
            id_gen,
            dispatcher,
            claims,
            pass_threshold,
        }
    }

    /// Submit a claim attempt on a found item.
    ///
    /// One attempt per user per item; the unique index backs this up when
    /// two submissions race. A successful attempt opens the item's
    /// competition window unless an earlier one already did.
    pub async fn submit_claim(
        &self,
        claimant: &user::Model,
        found_item_id: &str,
        input: SubmitClaimInput,
    ) -> AppResult<ClaimSubmission> {
        let now = Utc::now();

        let item = self
            .found_items
            .find_by_id(found_item_id)
            .await?
            .filter(|i| !i.is_claimed)
            .ok_or_else(|| AppError::NotFound(format!("Found item {found_item_id}")))?;

        if claimant.email.eq_ignore_ascii_case(&item.finder_email) {
            return Err(AppError::SelfClaim);
        }

        if self
            .claim_attempts
            .find_by_pair(&item.id, &claimant.id)
            .await?
            .is_some()
        {
            return Err(AppError::AlreadyAttempted);
        }

        if let Some(anchor) = item.first_potential_marked_at {
            let deadline = anchor.with_timezone(&Utc)
                + Duration::days(self.claims.competition_window_days);
            if now > deadline {
                return Err(AppError::ClaimWindowClosed);
            }
        }

        let questions = self.questions.find_by_item(&item.id).await?;
        if questions.is_empty() {
            return Err(AppError::BadRequest(
                "This item has no security questions to answer".to_string(),
            ));
        }

        let graded = match self.claims.mode {
            VerificationMode::Scored => {
                Some(grade_answers(&questions, &input.answers, self.pass_threshold))
            }
            VerificationMode::FinderAdjudicated => None,
        };
        let success = graded.is_some_and(|g| g.passed);

        let answers_json =
            serde_json::to_value(&input.answers).map_err(|e| AppError::Internal(e.to_string()))?;

        let attempt = self
            .claim_attempts
            .insert_attempt(claim_attempt::ActiveModel {
                id: Set(self.id_gen.generate()),
                found_item_id: Set(item.id.clone()),
                claimant_id: Set(claimant.id.clone()),
                claimant_name: Set(claimant.name.clone()),
                claimant_email: Set(claimant.email.clone()),
                answers: Set(answers_json),
                success: Set(success),
                attempted_at: Set(now.into()),
                marked_potential_at: Set(success.then(|| now.into())),
            })
            .await?;

        let mut window_opened = false;
        if success {
            window_opened = self
                .found_items
                .set_first_potential_marked_at_if_null(&item.id, now)
                .await?;
        }

        // The finder hears about every attempt; the claimant stays
        // anonymous until the finder reviews the answers.
        let mut intents = vec![attempt_received_intent(&item, success)];
        if window_opened {
            match self.competition_intents(&item, &claimant.id).await {
                Ok(more) => intents.extend(more),
                Err(e) => tracing::warn!(
                    error = %e,
                    item_id = %item.id,
                    "Failed to build competition window notifications"
                ),
            }
        }
        self.dispatcher.dispatch(intents).await;

        Ok(ClaimSubmission {
            attempt,
            graded,
            window_opened,
        })
    }

    /// All attempts on an item with their answers, finder only.
    pub async fn attempts_for_item(
        &self,
        finder: &user::Model,
        found_item_id: &str,
    ) -> AppResult<Vec<claim_attempt::Model>> {
        let item = self.found_items.get_by_id(found_item_id).await?;
        if item.finder_id != finder.id {
            return Err(AppError::Unauthorized(
                "Only the finder can review claim attempts".to_string(),
            ));
        }
        self.claim_attempts.find_by_item(&item.id).await
    }

    /// Accept or reject one attempt, finder only.
    ///
    /// Accepting stamps the attempt and, if no window is running yet,
    /// anchors the item's competition window. Rejecting clears the
    /// attempt's acceptance; the window anchor is never rewound.
    pub async fn decide_attempt(
        &self,
        finder: &user::Model,
        found_item_id: &str,
        claimant_id: &str,
        accept: bool,
    ) -> AppResult<claim_attempt::Model> {
        let item = self.found_items.get_by_id(found_item_id).await?;
        if item.finder_id != finder.id {
            return Err(AppError::Unauthorized(
                "Only the finder can decide on claim attempts".to_string(),
            ));
        }

        let attempt = self
            .claim_attempts
            .find_by_pair(&item.id, claimant_id)
            .await?
            .ok_or_else(|| {
                AppError::NotFound(format!("Claim attempt on {found_item_id} by {claimant_id}"))
            })?;

        let now = Utc::now();
        if accept {
            let updated = self.claim_attempts.mark_success(&attempt.id, now).await?;
            let window_opened = self
                .found_items
                .set_first_potential_marked_at_if_null(&item.id, now)
                .await?;

            let mut intents = vec![decision_intent(&item, &updated, true)];
            if window_opened {
                match self.competition_intents(&item, &updated.claimant_id).await {
                    Ok(more) => intents.extend(more),
                    Err(e) => tracing::warn!(
                        error = %e,
                        item_id = %item.id,
                        "Failed to build competition window notifications"
                    ),
                }
            }
            self.dispatcher.dispatch(intents).await;
            Ok(updated)
        } else {
            let updated = self.claim_attempts.clear_success(&attempt.id).await?;
            self.dispatcher
                .dispatch(vec![decision_intent(&item, &updated, false)])
                .await;
            Ok(updated)
        }
    }

    /// Competition window announcements for everyone who might still
    /// claim: active verified users minus the finder and the accepted
    /// claimant.
    async fn competition_intents(
        &self,
        item: &found_item::Model,
        accepted_claimant_id: &str,
    ) -> AppResult<Vec<NotificationIntent>> {
        let recipients = self.users.find_active_verified().await?;
        let window_days = self.claims.competition_window_days;

        Ok(recipients
            .into_iter()
            .filter(|u| u.id != item.finder_id && u.id != accepted_claimant_id)
            .map(|u| NotificationIntent {
                user_id: u.id,
                email: Some(u.email),
                kind: NotificationKind::CompetitionOpened,
                title: format!("Claim window open: {}", item.title),
                body: format!(
                    "Someone has been accepted as a potential claimant for \"{}\" \
                     ({}). If this item is actually yours, submit your own claim \
                     within {window_days} days before the return is finalized.",
                    item.title, item.current_location,
                ),
                found_item_id: Some(item.id.clone()),
            })
            .collect())
    }
}

fn attempt_received_intent(item: &found_item::Model, success: bool) -> NotificationIntent {
    let body = if success {
        format!(
            "Someone answered the verification questions for \"{}\" correctly. \
             You can finalize the return once the competition window closes.",
            item.title
        )
    } else {
        format!(
            "Someone attempted to claim \"{}\". Review the submitted answers \
             from your found item page.",
            item.title
        )
    };

    NotificationIntent {
        user_id: item.finder_id.clone(),
        email: Some(item.finder_email.clone()),
        kind: NotificationKind::ClaimReceived,
        title: format!("New claim attempt: {}", item.title),
        body,
        found_item_id: Some(item.id.clone()),
    }
}

fn decision_intent(
    item: &found_item::Model,
    attempt: &claim_attempt::Model,
    accepted: bool,
) -> NotificationIntent {
    if accepted {
        NotificationIntent {
            user_id: attempt.claimant_id.clone(),
            email: Some(attempt.claimant_email.clone()),
            kind: NotificationKind::ClaimAccepted,
            title: format!("Your claim was accepted: {}", item.title),
            body: format!(
                "The finder accepted your claim on \"{}\". Once the competition \
                 window closes the return will be finalized and you will receive \
                 pickup details.",
                item.title
            ),
            found_item_id: Some(item.id.clone()),
        }
    } else {
        NotificationIntent {
            user_id: attempt.claimant_id.clone(),
            email: Some(attempt.claimant_email.clone()),
            kind: NotificationKind::ClaimDeclined,
            title: format!("Your claim was not accepted: {}", item.title),
            body: format!(
                "The finder did not accept your claim on \"{}\" based on the \
                 answers you provided.",
                item.title
            ),
            found_item_id: Some(item.id.clone()),
        }
    }
}
