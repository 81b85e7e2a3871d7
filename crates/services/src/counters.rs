//! # CounterMaintainer
//!
//! Applies vote deltas to the denormalized upvote/downvote counters on the
//! voted-upon entity. Counters are a derived cache over the vote ledger and
//! are never written directly by clients.

use std::sync::Arc;

use domains::{BoardStore, Result, VoteTarget};

/// Counter state after a vote transition, returned so callers can build the
/// response without a redundant read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CounterState {
    pub upvotes: i64,
    pub downvotes: i64,
}

pub struct CounterMaintainer {
    store: Arc<dyn BoardStore>,
}

impl CounterMaintainer {
    pub fn new(store: Arc<dyn BoardStore>) -> Self {
        Self { store }
    }

    /// Applies the deltas through the store's atomic clamped-increment
    /// primitive. When both deltas are zero (a no-op vote transition) no
    /// write is issued at all; the current counters are read back instead.
    pub async fn apply(
        &self,
        target: VoteTarget,
        up_delta: i64,
        down_delta: i64,
    ) -> Result<CounterState> {
        let (upvotes, downvotes) = if up_delta == 0 && down_delta == 0 {
            self.store.counters(target).await?
        } else {
            self.store.adjust_counters(target, up_delta, down_delta).await?
        };
        Ok(CounterState { upvotes, downvotes })
    }
}
