use pointclaim::{
    claim::error::transport_error,
    runner::{BatchRunner, BatchStats},
};

use crate::support::{
    BETWEEN, ERROR_COOLDOWN, RecordingPacer, ScriptedClaimApi, Workspace, message_reply,
    success_reply,
};

const MAX_RETRY: u32 = 3;

#[tokio::test]
async fn given_used_identity_when_batch_runs_then_no_request_and_no_delay() {
    let workspace = Workspace::new(&["alice"], &["alice"]);
    let api = ScriptedClaimApi::new(vec![]);
    let pacer = RecordingPacer::new();
    let runner = BatchRunner::new(&api, &workspace.roster, &pacer, MAX_RETRY);

    let stats = runner.run().await.expect("batch should complete");

    assert_eq!(
        stats,
        BatchStats {
            processed: 0,
            successful: 0,
            failed: 0,
            skipped: 1,
        },
    );
    assert_eq!(api.call_count(), 0, "used identities never reach the network");
    assert!(pacer.recorded().is_empty());
}

#[tokio::test]
async fn given_success_then_already_claimed_when_batch_runs_then_stats_and_files_match() {
    let workspace = Workspace::new(&["alice", "bob"], &[]);
    let api = ScriptedClaimApi::new(vec![
        Ok(success_reply(10, 10)),
        Ok(message_reply("already claimed")),
    ]);
    let pacer = RecordingPacer::new();
    let runner = BatchRunner::new(&api, &workspace.roster, &pacer, MAX_RETRY);

    let stats = runner.run().await.expect("batch should complete");

    assert_eq!(
        stats,
        BatchStats {
            processed: 2,
            successful: 1,
            failed: 0,
            skipped: 1,
        },
    );
    assert_eq!(
        workspace.roster.load_used().expect("used should load"),
        vec!["alice", "bob"],
    );
    assert_eq!(
        workspace.roster.load_pending().expect("pending should load"),
        vec!["alice", "bob"],
        "pending list is untouched by success and already-claimed outcomes",
    );
    assert_eq!(
        pacer.recorded(),
        vec![BETWEEN],
        "exactly one inter-identity delay, none after the last identity",
    );
}

#[tokio::test]
async fn given_transport_error_when_batch_runs_then_identity_counts_as_failed() {
    let workspace = Workspace::new(&["carol"], &[]);
    let api = ScriptedClaimApi::new(vec![Err(transport_error("connect timeout"))]);
    let pacer = RecordingPacer::new();
    let runner = BatchRunner::new(&api, &workspace.roster, &pacer, MAX_RETRY);

    let stats = runner.run().await.expect("batch should complete");

    assert_eq!(
        stats,
        BatchStats {
            processed: 1,
            successful: 0,
            failed: 1,
            skipped: 0,
        },
    );
    assert_eq!(api.call_count(), 1, "no retry after a transport error");
    assert_eq!(pacer.recorded(), vec![ERROR_COOLDOWN]);
    assert_eq!(
        workspace.roster.load_pending().expect("pending should load"),
        vec!["carol"],
    );
    assert!(workspace.roster.load_used().expect("used should load").is_empty());
}

#[tokio::test]
async fn given_empty_pending_list_when_batch_runs_then_zero_stats_and_no_requests() {
    let workspace = Workspace::new(&[], &[]);
    let api = ScriptedClaimApi::new(vec![]);
    let pacer = RecordingPacer::new();
    let runner = BatchRunner::new(&api, &workspace.roster, &pacer, MAX_RETRY);

    let stats = runner.run().await.expect("empty batch is not a crash");

    assert_eq!(stats, BatchStats::default());
    assert_eq!(api.call_count(), 0);
    assert!(pacer.recorded().is_empty());
}

#[tokio::test]
async fn given_mixed_skip_and_claim_when_batch_runs_then_delay_only_follows_claims() {
    let workspace = Workspace::new(&["alice", "bob"], &["alice"]);
    let api = ScriptedClaimApi::new(vec![Ok(success_reply(5, 15))]);
    let pacer = RecordingPacer::new();
    let runner = BatchRunner::new(&api, &workspace.roster, &pacer, MAX_RETRY);

    let stats = runner.run().await.expect("batch should complete");

    assert_eq!(
        stats,
        BatchStats {
            processed: 1,
            successful: 1,
            failed: 0,
            skipped: 1,
        },
    );
    assert_eq!(api.call_count(), 1);
    assert!(
        pacer.recorded().is_empty(),
        "skips delay nothing, and the last identity has no trailing delay",
    );
}
