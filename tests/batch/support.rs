use std::{
    collections::VecDeque,
    path::PathBuf,
    sync::{
        Mutex,
        atomic::{AtomicUsize, Ordering},
    },
    time::Duration,
};

use async_trait::async_trait;
use uuid::Uuid;

use pointclaim::{
    claim::{error::ClaimError, http::ClaimApi, types::ClaimReply},
    pacing::Pacer,
    roster::Roster,
};

pub const BETWEEN: Duration = Duration::from_secs(13);
pub const RETRY_COOLDOWN: Duration = Duration::from_secs(7);
pub const ERROR_COOLDOWN: Duration = Duration::from_secs(11);

/// Scripted transport: hands out the queued per-call results in order and
/// records every call.
pub struct ScriptedClaimApi {
    replies: Mutex<VecDeque<Result<ClaimReply, ClaimError>>>,
    calls: AtomicUsize,
}

impl ScriptedClaimApi {
    pub fn new(replies: Vec<Result<ClaimReply, ClaimError>>) -> Self {
        Self {
            replies: Mutex::new(replies.into()),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ClaimApi for ScriptedClaimApi {
    async fn claim_points(&self, _identity: &str) -> Result<ClaimReply, ClaimError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.replies
            .lock()
            .expect("replies lock should not be poisoned")
            .pop_front()
            .expect("a scripted reply should exist for every issued call")
    }
}

/// Pacer that records requested waits instead of sleeping. The three wait
/// sources use distinct durations so recordings identify which cooldown
/// fired.
pub struct RecordingPacer {
    waits: Mutex<Vec<Duration>>,
}

impl RecordingPacer {
    pub fn new() -> Self {
        Self {
            waits: Mutex::new(Vec::new()),
        }
    }

    pub fn recorded(&self) -> Vec<Duration> {
        self.waits
            .lock()
            .expect("waits lock should not be poisoned")
            .clone()
    }
}

#[async_trait]
impl Pacer for RecordingPacer {
    fn between_identities(&self) -> Duration {
        BETWEEN
    }

    fn retry_cooldown(&self) -> Duration {
        RETRY_COOLDOWN
    }

    fn error_cooldown(&self) -> Duration {
        ERROR_COOLDOWN
    }

    async fn pause(&self, duration: Duration) {
        self.waits
            .lock()
            .expect("waits lock should not be poisoned")
            .push(duration);
    }
}

/// Per-test roster directory, removed on drop.
pub struct Workspace {
    dir: PathBuf,
    pub roster: Roster,
}

impl Workspace {
    pub fn new(pending: &[&str], used: &[&str]) -> Self {
        let dir = std::env::temp_dir().join(format!("pointclaim-batch-test-{}", Uuid::now_v7()));
        std::fs::create_dir_all(&dir).expect("temp dir should be created");
        let roster = Roster::new(dir.join("pending.txt"), dir.join("used.txt"));
        std::fs::write(roster.pending_path(), pending.join("\n")).expect("pending should be written");
        std::fs::write(roster.used_path(), used.join("\n")).expect("used should be written");
        Self { dir, roster }
    }
}

impl Drop for Workspace {
    fn drop(&mut self) {
        let _ = std::fs::remove_dir_all(&self.dir);
    }
}

pub fn success_reply(claimed: u64, total: u64) -> ClaimReply {
    ClaimReply {
        success: true,
        message: None,
        claimed_points: claimed,
        total_points: total,
    }
}

pub fn message_reply(message: &str) -> ClaimReply {
    ClaimReply {
        success: false,
        message: Some(message.to_string()),
        claimed_points: 0,
        total_points: 0,
    }
}
