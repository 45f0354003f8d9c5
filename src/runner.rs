use std::collections::HashSet;

use anyhow::Result;

use crate::{
    claim::{
        http::{ClaimApi, HttpClaimApi},
        orchestrator::Orchestrator,
        types::ClaimOutcome,
    },
    config::{Config, DelayConfig},
    pacing::{Pacer, TokioPacer},
    roster::{Roster, RosterError},
};

/// Batch counters, process-lifetime scoped, reported once at the end.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BatchStats {
    pub processed: u64,
    pub successful: u64,
    pub failed: u64,
    pub skipped: u64,
}

impl BatchStats {
    fn record(&mut self, outcome: &ClaimOutcome) {
        match outcome {
            ClaimOutcome::Success { .. } => self.successful += 1,
            ClaimOutcome::Failed => self.failed += 1,
            // Already-claimed, dropped, and previously-processed identities
            // all land in the non-error bucket of the three-way surface.
            ClaimOutcome::AlreadyClaimed | ClaimOutcome::Removed | ClaimOutcome::Skipped => {
                self.skipped += 1
            }
        }
    }
}

/// Wires the production transport, roster, and pacer, then runs the batch.
pub async fn run(config: &Config, cookie: String) -> Result<BatchStats> {
    print_header(&config.delay);

    let api = HttpClaimApi::new(&config.claim, cookie);
    let roster = Roster::new(config.files.pending.clone(), config.files.used.clone());
    let pacer = TokioPacer::new(config.delay.clone());

    let runner = BatchRunner::new(&api, &roster, &pacer, config.claim.max_retry);
    Ok(runner.run().await?)
}

pub struct BatchRunner<'a> {
    api: &'a dyn ClaimApi,
    roster: &'a Roster,
    pacer: &'a dyn Pacer,
    max_retry: u32,
}

impl<'a> BatchRunner<'a> {
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

    /// Iterates the pending list in order, one identity in flight at a
    /// time, and aggregates the terminal outcomes.
    pub async fn run(&self) -> Result<BatchStats, RosterError> {
        let pending = self.roster.load_pending()?;
        let used: HashSet<String> = self.roster.load_used()?.into_iter().collect();
        let mut stats = BatchStats::default();

        if pending.is_empty() {
            println!(
                "[error] no pending identities in {}",
                self.roster.pending_path().display()
            );
            tracing::warn!(target: "runner", "pending_list_empty");
            print_summary(&stats);
            return Ok(stats);
        }

        tracing::info!(
            target: "runner",
            pending = pending.len(),
            used = used.len(),
            "batch_started"
        );

        let orchestrator = Orchestrator::new(self.api, self.roster, self.pacer, self.max_retry);
        let total = pending.len();

        for (index, identity) in pending.iter().enumerate() {
            println!("[{:>3}/{}] processing @{}", index + 1, total, identity);

            if used.contains(identity) {
                let outcome = ClaimOutcome::Skipped;
                report_outcome(identity, &outcome);
                stats.record(&outcome);
                continue;
            }

            let outcome = orchestrator.claim(identity).await?;
            stats.processed += 1;
            stats.record(&outcome);
            report_outcome(identity, &outcome);

            if index + 1 < total {
                self.pacer.pause(self.pacer.between_identities()).await;
            }
        }

        tracing::info!(
            target: "runner",
            processed = stats.processed,
            successful = stats.successful,
            failed = stats.failed,
            skipped = stats.skipped,
            "batch_finished"
        );
        print_summary(&stats);
        Ok(stats)
    }
}

fn print_header(delay: &DelayConfig) {
    println!("{}", "=".repeat(60));
    println!("pointclaim — batch reward claimer");
    println!(
        "delay {}-{}s | error cooldown {}s | retry cooldown {}s",
        delay.min_s, delay.max_s, delay.on_error_s, delay.retry_s
    );
    println!("{}", "=".repeat(60));
}

fn report_outcome(identity: &str, outcome: &ClaimOutcome) {
    match outcome {
        ClaimOutcome::Success { claimed, total } => {
            println!("[ok] @{identity} claimed +{claimed} points (total {total})");
        }
        ClaimOutcome::AlreadyClaimed => {
            println!("[skip] @{identity} already claimed");
        }
        ClaimOutcome::Removed => {
            println!("[removed] @{identity} not found, dropped from pending");
        }
        ClaimOutcome::Failed => {
            println!("[fail] @{identity} claim failed");
        }
        ClaimOutcome::Skipped => {
            println!("[skip] @{identity} previously processed");
        }
    }
}

fn print_summary(stats: &BatchStats) {
    println!("{}", "=".repeat(60));
    println!(
        "summary: {} processed | {} success | {} failed | {} skipped",
        stats.processed, stats.successful, stats.failed, stats.skipped
    );
    println!("{}", "=".repeat(60));
}
