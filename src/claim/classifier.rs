use crate::claim::{
    error::{ClaimError, ClaimErrorKind},
    types::{ClaimOutcome, ClaimReply, StoreEffect, Verdict},
};

#[derive(Debug, Clone, Copy)]
enum ApiRule {
    NotFound,
    Unauthorized,
    AlreadyClaimed,
}

/// Structured API error messages are matched by case-insensitive substring,
/// top to bottom, first match wins. The order is load-bearing: "not found"
/// outranks "unauthorized" outranks "already claimed".
const API_MESSAGE_RULES: &[(&str, ApiRule)] = &[
    ("not found", ApiRule::NotFound),
    ("unauthorized", ApiRule::Unauthorized),
    ("already claimed", ApiRule::AlreadyClaimed),
];

/// Maps one attempt's raw result to a verdict: retry, or settle with a
/// terminal outcome plus its store mutation and cooldown directive.
pub fn classify(
    result: &Result<ClaimReply, ClaimError>,
    attempt: u32,
    max_retry: u32,
) -> Verdict {
    match result {
        Ok(reply) => classify_reply(reply),
        Err(err) => classify_error(err, attempt, max_retry),
    }
}

fn classify_reply(reply: &ClaimReply) -> Verdict {
    if reply.success {
        return Verdict::Settle {
            outcome: ClaimOutcome::Success {
                claimed: reply.claimed_points,
                total: reply.total_points,
            },
            effect: StoreEffect::MarkUsed,
            error_cooldown: false,
        };
    }

    let message = reply.message.as_deref().unwrap_or("").to_lowercase();
    if message.contains("already claimed") {
        return Verdict::Settle {
            outcome: ClaimOutcome::AlreadyClaimed,
            effect: StoreEffect::MarkUsed,
            error_cooldown: false,
        };
    }

    // Unrecognized success-path payload: terminal for the whole attempt
    // sequence, no cooldown.
    Verdict::Settle {
        outcome: ClaimOutcome::Failed,
        effect: StoreEffect::None,
        error_cooldown: false,
    }
}

fn classify_error(err: &ClaimError, attempt: u32, max_retry: u32) -> Verdict {
    if err.kind == ClaimErrorKind::Transport {
        // Transport failures settle on first occurrence instead of consuming
        // the remaining attempt slots. TODO: revisit whether these should
        // retry like unauthorized rejections once the endpoint's failure
        // modes are better understood.
        return Verdict::Settle {
            outcome: ClaimOutcome::Failed,
            effect: StoreEffect::None,
            error_cooldown: true,
        };
    }

    let message = err.message.to_lowercase();
    for (needle, rule) in API_MESSAGE_RULES {
        if !message.contains(needle) {
            continue;
        }
        return match rule {
            ApiRule::NotFound => Verdict::Settle {
                outcome: ClaimOutcome::Removed,
                effect: StoreEffect::RemovePending,
                error_cooldown: false,
            },
            ApiRule::Unauthorized => {
                if attempt < max_retry {
                    Verdict::Retry
                } else {
                    Verdict::Settle {
                        outcome: ClaimOutcome::Failed,
                        effect: StoreEffect::None,
                        error_cooldown: true,
                    }
                }
            }
            ApiRule::AlreadyClaimed => Verdict::Settle {
                outcome: ClaimOutcome::AlreadyClaimed,
                effect: StoreEffect::MarkUsed,
                error_cooldown: false,
            },
        };
    }

    Verdict::Settle {
        outcome: ClaimOutcome::Failed,
        effect: StoreEffect::None,
        error_cooldown: true,
    }
}
