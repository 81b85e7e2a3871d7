//! # VoteLedger
//!
//! Tracks at most one live vote per (voter, target) pair and turns vote
//! submissions into counter deltas. The ledger is the source of truth;
//! the denormalized counters on posts/comments are derived from it.

use std::sync::Arc;

use dashmap::DashMap;
use domains::{AppError, BoardStore, Result, VoteTarget, VOTE_DOWN, VOTE_NONE, VOTE_UP};
use tokio::sync::Mutex;
use uuid::Uuid;

/// Outcome of a single vote transition, including the net counter deltas
/// the caller must forward to the counter maintainer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VoteOutcome {
    pub old_value: i16,
    pub new_value: i16,
    pub up_delta: i64,
    pub down_delta: i64,
}

impl VoteOutcome {
    pub fn is_noop(&self) -> bool {
        self.up_delta == 0 && self.down_delta == 0
    }
}

/// Applies idempotent vote-state transitions against the store.
///
/// Double application of a delta by two racing requests from the *same*
/// voter is the primary correctness risk here, so the read-decide-write
/// sequence for a (voter, target) pair runs under a per-key async lock.
/// Votes by different users on the same target are allowed to interleave;
/// the store's atomic counter primitive bounds the damage there.
pub struct VoteLedger {
    store: Arc<dyn BoardStore>,
    key_locks: DashMap<(Uuid, Uuid), Arc<Mutex<()>>>,
}

impl VoteLedger {
    pub fn new(store: Arc<dyn BoardStore>) -> Self {
        Self {
            store,
            key_locks: DashMap::new(),
        }
    }

    /// Applies `new_value` as the voter's vote on the target, returning the
    /// transition that took place. Repeating a call with the same value is a
    /// no-op (deltas 0,0); the ledger row is inserted, updated, or deleted
    /// before this returns.
    pub async fn apply(
        &self,
        voter_id: Uuid,
        target: VoteTarget,
        new_value: i16,
    ) -> Result<VoteOutcome> {
        if !matches!(new_value, VOTE_DOWN | VOTE_NONE | VOTE_UP) {
            return Err(AppError::validation(format!(
                "vote value must be -1, 0, or 1, got {new_value}"
            )));
        }

        let lock = self
            .key_locks
            .entry((voter_id, target.id))
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone();
        let _guard = lock.lock().await;

        let old_value = self.store.vote_value(voter_id, target).await?.unwrap_or(VOTE_NONE);

        if old_value == new_value {
            return Ok(VoteOutcome {
                old_value,
                new_value,
                up_delta: 0,
                down_delta: 0,
            });
        }

        if new_value == VOTE_NONE {
            self.store.delete_vote(voter_id, target).await?;
        } else {
            // Insert and vote-flip share one upsert path in the store.
            self.store.put_vote(voter_id, target, new_value).await?;
        }

        let outcome = VoteOutcome {
            old_value,
            new_value,
            up_delta: polarity_delta(old_value, new_value, VOTE_UP),
            down_delta: polarity_delta(old_value, new_value, VOTE_DOWN),
        };

        tracing::debug!(
            voter = %voter_id,
            target = %target.id,
            kind = target.kind.as_str(),
            old = old_value,
            new = new_value,
            "vote transition applied"
        );

        Ok(outcome)
    }
}

/// Net change to the counter of one polarity: +1 if the new vote gained that
/// polarity, -1 if the old vote lost it, 0 otherwise. Reproduces the full
/// nine-row transition table.
fn polarity_delta(old: i16, new: i16, polarity: i16) -> i64 {
    (new == polarity) as i64 - (old == polarity) as i64
}
