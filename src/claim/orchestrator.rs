use crate::{
    claim::{
        classifier::classify,
        http::ClaimApi,
        types::{ClaimOutcome, StoreEffect, Verdict},
    },
    pacing::Pacer,
    roster::{Roster, RosterError},
};

/// Drives the per-identity retry loop. Classifiable failures are absorbed
/// into the terminal outcome; only roster persistence failures propagate,
/// and those abort the whole run.
pub struct Orchestrator<'a> {
    api: &'a dyn ClaimApi,
    roster: &'a Roster,
    pacer: &'a dyn Pacer,
    max_retry: u32,
}

impl<'a> Orchestrator<'a> {
    pub fn new(
        api: &'a dyn ClaimApi,
        roster: &'a Roster,
        pacer: &'a dyn Pacer,
        max_retry: u32,
    ) -> Self {
        Self {
            api,
            roster,
            pacer,
            max_retry,
        }
    }

    pub async fn claim(&self, identity: &str) -> Result<ClaimOutcome, RosterError> {
        for attempt in 1..=self.max_retry {
            let result = self.api.claim_points(identity).await;
            let verdict = classify(&result, attempt, self.max_retry);
            tracing::debug!(
                target: "claim",
                identity = %identity,
                attempt = attempt,
                max_retry = self.max_retry,
                verdict = ?verdict,
                "claim_attempt_classified"
            );

            match verdict {
                Verdict::Retry => {
                    self.pacer.pause(self.pacer.retry_cooldown()).await;
                }
                Verdict::Settle {
                    outcome,
                    effect,
                    error_cooldown,
                } => {
                    // Store mutations apply exactly once per terminal
                    // outcome, and are durable before the wait begins.
                    self.apply_effect(identity, effect)?;
                    if error_cooldown {
                        self.pacer.pause(self.pacer.error_cooldown()).await;
                    }
                    return Ok(outcome);
                }
            }
        }

        tracing::warn!(
            target: "claim",
            identity = %identity,
            max_retry = self.max_retry,
            "claim_attempts_exhausted"
        );
        Ok(ClaimOutcome::Failed)
    }

    fn apply_effect(&self, identity: &str, effect: StoreEffect) -> Result<(), RosterError> {
        match effect {
            StoreEffect::None => Ok(()),
            StoreEffect::MarkUsed => {
                let newly_marked = self.roster.mark_used(identity)?;
                tracing::debug!(
                    target: "claim",
                    identity = %identity,
                    newly_marked = newly_marked,
                    "identity_marked_used"
                );
                Ok(())
            }
            StoreEffect::RemovePending => {
                self.roster.remove_pending(identity)?;
                tracing::debug!(
                    target: "claim",
                    identity = %identity,
                    "identity_removed_from_pending"
                );
                Ok(())
            }
        }
    }
}
