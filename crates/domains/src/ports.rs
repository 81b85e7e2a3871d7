//! # Core Traits (Ports)
//!
//! Any adapter must implement these traits to be used by the binary.
//! The store is the only shared mutable resource in the system; every method
//! is a potentially-blocking I/O call.

use std::collections::HashMap;

use async_trait::async_trait;
use uuid::Uuid;

use crate::error::Result;
use crate::models::{AuthenticatedUser, Comment, Post, TargetKind, VoteTarget};

/// Requested store-native ordering for post listings. `new` and `best` are
/// pushed down to the store so listing stays scalable; the `hot` ranking
/// re-sorts a bounded recent candidate set in memory instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PostOrder {
    NewestFirst,
    BestFirst,
}

/// Data persistence contract for posts, comments, and the vote ledger.
#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
#[async_trait]
pub trait BoardStore: Send + Sync {
    // Post operations
    async fn insert_post(&self, post: &Post) -> Result<()>;
    async fn post(&self, id: Uuid) -> Result<Option<Post>>;
    async fn posts_by_campus(&self, campus: &str, order: PostOrder, limit: i64) -> Result<Vec<Post>>;
    /// Removes the post, its comments, and every vote on any of them.
    async fn delete_post(&self, id: Uuid) -> Result<()>;
    /// Bumps the denormalized `comment_count`. Comments are append-only in
    /// this core, so there is no decrement counterpart.
    async fn increment_comment_count(&self, post_id: Uuid) -> Result<()>;

    // Comment operations
    async fn insert_comment(&self, comment: &Comment) -> Result<()>;
    async fn comment(&self, id: Uuid) -> Result<Option<Comment>>;
    async fn comments_for_post(&self, post_id: Uuid) -> Result<Vec<Comment>>;

    // Vote ledger operations. A row's absence means "no vote"; zero values
    // are never stored.
    async fn vote_value(&self, voter_id: Uuid, target: VoteTarget) -> Result<Option<i16>>;
    /// Insert-or-replace the voter's live vote on the target.
    async fn put_vote(&self, voter_id: Uuid, target: VoteTarget, value: i16) -> Result<()>;
    async fn delete_vote(&self, voter_id: Uuid, target: VoteTarget) -> Result<()>;
    /// Batched lookup of one voter's live votes across many targets of one
    /// kind. Used to annotate listings without an N+1 read per row.
    async fn votes_by_voter(
        &self,
        voter_id: Uuid,
        kind: TargetKind,
        target_ids: &[Uuid],
    ) -> Result<HashMap<Uuid, i16>>;

    // Denormalized counters
    /// Atomically applies `max(0, current + delta)` to each counter and
    /// returns the result. Adapters must not implement this as a plain
    /// read-then-write.
    async fn adjust_counters(
        &self,
        target: VoteTarget,
        up_delta: i64,
        down_delta: i64,
    ) -> Result<(i64, i64)>;
    /// Current `(upvotes, downvotes)` for the target.
    async fn counters(&self, target: VoteTarget) -> Result<(i64, i64)>;
}

/// Batched profile enrichment (author avatars) for response construction.
#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
#[async_trait]
pub trait ProfileDirectory: Send + Sync {
    /// Avatar URLs for the given user ids. Users without an avatar are
    /// simply absent from the returned map.
    async fn avatar_urls(&self, user_ids: &[Uuid]) -> Result<HashMap<Uuid, String>>;
}

/// Session verification contract; the identity layer is out of scope, the
/// board only needs to turn an opaque bearer token into a principal.
#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
pub trait SessionVerifier: Send + Sync {
    fn verify(&self, token: &str) -> Result<AuthenticatedUser>;
}
