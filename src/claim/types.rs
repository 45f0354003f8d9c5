/// Parsed success-path payload of one claim attempt. Numeric fields that
/// the endpoint omits parse as zero; a payload that does not match the
/// expected envelope at all parses as `ClaimReply::default()`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClaimReply {
    pub success: bool,
    pub message: Option<String>,
    pub claimed_points: u64,
    pub total_points: u64,
}

/// Terminal classification of one identity's claim sequence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClaimOutcome {
    /// The reward was claimed; carries the claimed amount and running total.
    Success { claimed: u64, total: u64 },
    /// The endpoint reported the reward as already claimed.
    AlreadyClaimed,
    /// The identity does not exist upstream and was dropped from pending.
    Removed,
    /// The attempt sequence ended without a claim.
    Failed,
    /// The identity was in the used set; no request was issued.
    Skipped,
}

/// Persisted-state mutation a settled attempt carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreEffect {
    None,
    MarkUsed,
    RemovePending,
}

/// Classifier instruction for the current attempt: re-issue the request
/// after the retry cooldown, or settle with a terminal outcome.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verdict {
    Retry,
    Settle {
        outcome: ClaimOutcome,
        effect: StoreEffect,
        error_cooldown: bool,
    },
}
