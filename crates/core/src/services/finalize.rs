//! Return finalization.
//!
//! Once the competition window has run its course the finder settles the
//! claim: the item row is archived into the returns table and deleted in
//! one transaction, and everyone involved hears about it.

use chrono::{Duration, Utc};
use sea_orm::Set;
use serde::{Deserialize, Serialize};

use reclaim_common::{AppError, AppResult, ClaimsConfig, IdGenerator};
use reclaim_db::entities::notification::NotificationKind;
use reclaim_db::entities::{claim_attempt, found_item, successful_return, user};
use reclaim_db::repositories::{
    ClaimAttemptRepository, FoundItemRepository, SuccessfulReturnRepository,
};

use super::dispatch::{NotificationDispatcher, NotificationIntent};

/// Finalization request from the finder.
#[derive(Debug, Deserialize)]
pub struct FinalizeInput {
    /// The accepted claimant being confirmed
    pub claimant_id: String,
    /// Why the finder believes this claimant is the owner
    pub justification: String,
}

/// Receipt both parties get after finalization.
#[derive(Debug, Serialize)]
pub struct FinalizeReceipt {
    pub return_id: String,
    /// Quoted at physical handoff; carries no other meaning
    pub verification_code: String,
}

/// Finalization and the returns archive.
#[derive(Clone)]
pub struct FinalizeService {
    found_items: FoundItemRepository,
    claim_attempts: ClaimAttemptRepository,
    returns: SuccessfulReturnRepository,
    id_gen: IdGenerator,
    dispatcher: NotificationDispatcher,
    claims: ClaimsConfig,
}

impl FinalizeService {
    /// Create a new finalize service.
    #[must_use]
    pub const fn new(
        found_items: FoundItemRepository,
        claim_attempts: ClaimAttemptRepository,
        returns: SuccessfulReturnRepository,
        id_gen: IdGenerator,
        dispatcher: NotificationDispatcher,
        claims: ClaimsConfig,
    ) -> Self {
        Self {
            found_items,
            claim_attempts,
            returns,
            id_gen,
            dispatcher,
            claims,
        }
    }

    /// Finalize a return to the given claimant, finder only.
    ///
    /// Allowed once the competition window has fully elapsed; exactly at
    /// the boundary counts as elapsed. The archive insert and the item
    /// delete commit together or not at all.
    pub async fn finalize(
        &self,
        finder: &user::Model,
        found_item_id: &str,
        input: FinalizeInput,
    ) -> AppResult<FinalizeReceipt> {
        let item = self.found_items.get_by_id(found_item_id).await?;
        if !finder.email.eq_ignore_ascii_case(&item.finder_email) {
            return Err(AppError::Unauthorized(
                "Only the finder can finalize a return".to_string(),
            ));
        }

        let justification = input.justification.trim().to_string();
        if justification.chars().count() < self.claims.min_justification_chars {
            return Err(AppError::Validation(format!(
                "Justification must be at least {} characters",
                self.claims.min_justification_chars
            )));
        }

        let attempt = self
            .claim_attempts
            .find_by_pair(&item.id, &input.claimant_id)
            .await?
            .ok_or_else(|| {
                AppError::NotFound(format!(
                    "Claim attempt on {found_item_id} by {}",
                    input.claimant_id
                ))
            })?;
        if !attempt.success {
            return Err(AppError::Validation(
                "Only an accepted claim can be finalized".to_string(),
            ));
        }

        let now = Utc::now();
        let anchor = item
            .first_potential_marked_at
            .or(attempt.marked_potential_at)
            .unwrap_or(attempt.attempted_at)
            .with_timezone(&Utc);
        let deadline = anchor + Duration::days(self.claims.competition_window_days);
        if now < deadline {
            return Err(AppError::TooEarly {
                remaining: deadline - now,
            });
        }

        let verification_code = self.id_gen.generate_verification_code();
        #[allow(clippy::cast_possible_truncation)]
        let days_to_finalize = (now.date_naive() - item.date_found).num_days() as i32;

        let archived = self
            .returns
            .archive_and_delete_item(
                successful_return::ActiveModel {
                    id: Set(self.id_gen.generate()),
                    found_item_id: Set(item.id.clone()),
                    title: Set(item.title.clone()),
                    description: Set(item.description.clone()),
                    category_id: Set(item.category_id.clone()),
                    location_id: Set(item.location_id.clone()),
                    date_found: Set(item.date_found),
                    finder_id: Set(item.finder_id.clone()),
                    finder_name: Set(item.finder_name.clone()),
                    finder_email: Set(item.finder_email.clone()),
                    claimant_id: Set(attempt.claimant_id.clone()),
                    claimant_name: Set(attempt.claimant_name.clone()),
                    claimant_email: Set(attempt.claimant_email.clone()),
                    answers_provided: Set(attempt.answers.clone()),
                    justification: Set(justification),
                    verification_code: Set(verification_code.clone()),
                    days_to_finalize: Set(days_to_finalize),
                    finalized_at: Set(now.into()),
                },
                &item.id,
            )
            .await?;

        let intents = self
            .finalize_intents(&item, &attempt, &verification_code)
            .await;
        self.dispatcher.dispatch(intents).await;

        Ok(FinalizeReceipt {
            return_id: archived.id,
            verification_code,
        })
    }

    /// Archived returns, newest first.
    pub async fn list_returns(
        &self,
        limit: u64,
        offset: u64,
    ) -> AppResult<Vec<successful_return::Model>> {
        self.returns.list(limit, offset).await
    }

    /// One archived return.
    pub async fn get_return(&self, id: &str) -> AppResult<successful_return::Model> {
        self.returns.get_by_id(id).await
    }

    /// Messages for the winner, the finder, and every losing claimant.
    async fn finalize_intents(
        &self,
        item: &found_item::Model,
        winner: &claim_attempt::Model,
        code: &str,
    ) -> Vec<NotificationIntent> {
        let mut intents = vec![
            NotificationIntent {
                user_id: winner.claimant_id.clone(),
                email: Some(winner.claimant_email.clone()),
                kind: NotificationKind::ReturnFinalized,
                title: format!("Your item is ready for pickup: {}", item.title),
                body: format!(
                    "The finder confirmed your claim on \"{}\". Pick it up at {} \
                     and quote verification code {code}. Finder contact: {} ({}).",
                    item.title, item.current_location, item.finder_name, item.finder_email,
                ),
                found_item_id: Some(item.id.clone()),
            },
            NotificationIntent {
                user_id: item.finder_id.clone(),
                email: Some(item.finder_email.clone()),
                kind: NotificationKind::ReturnCompleted,
                title: format!("Return completed: {}", item.title),
                body: format!(
                    "You confirmed {} as the owner of \"{}\". They will quote \
                     verification code {code} at handoff. Contact: {}.",
                    winner.claimant_name, item.title, winner.claimant_email,
                ),
                found_item_id: Some(item.id.clone()),
            },
        ];

        match self.claim_attempts.find_by_item(&item.id).await {
            Ok(attempts) => {
                intents.extend(
                    attempts
                        .into_iter()
                        .filter(|a| a.claimant_id != winner.claimant_id)
                        .map(|a| NotificationIntent {
                            user_id: a.claimant_id,
                            email: Some(a.claimant_email),
                            kind: NotificationKind::ClaimUnsuccessful,
                            title: format!("Claim closed: {}", item.title),
                            body: format!(
                                "\"{}\" was claimed by another user whose answers \
                                 were verified. Thank you for trying to recover it.",
                                item.title
                            ),
                            found_item_id: Some(item.id.clone()),
                        }),
                );
            }
            Err(e) => tracing::warn!(
                error = %e,
                item_id = %item.id,
                "Failed to list other claimants for closing notices"
            ),
        }

        intents
    }
}
