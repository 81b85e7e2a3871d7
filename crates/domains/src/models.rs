//! # Domain Models
//!
//! These structs represent the core entities of the Quadboard community board.
//! We use UUID v7 for time-ordered, globally unique identification. All
//! serialized shapes are camelCase to match the documented wire format.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// The principal attached to every request. Issued by the identity layer
/// after .edu verification; the board core treats it as opaque input.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthenticatedUser {
    pub id: Uuid,
    /// Campus slug derived from the verified email domain (e.g., "umich.edu").
    pub campus: String,
    pub display_name: String,
}

/// A top-level submission on the campus board.
///
/// `upvote_count` / `downvote_count` are denormalized from the vote ledger
/// and must never be written by clients; they are maintained exclusively as
/// a side effect of vote transitions. `campus` is fixed at creation from the
/// author's verified email domain.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    pub id: Uuid,
    pub author_id: Uuid,
    pub author_display_name: String,
    pub campus: String,
    pub title: String,
    pub body_text: Option<String>,
    /// Optional category tag (e.g., "Housing", "Events").
    pub flair: Option<String>,
    pub upvote_count: i64,
    pub downvote_count: i64,
    pub comment_count: i64,
    pub created_at: DateTime<Utc>,
}

impl Post {
    /// Net score used by the `best` ordering and as the numerator of the
    /// hot score.
    pub fn score(&self) -> i64 {
        self.upvote_count - self.downvote_count
    }
}

/// A reply attached to a post, optionally nested under another comment of
/// the **same** post. Comments form a forest; `parent_id = None` means the
/// comment is a root (attaches directly to the post).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
    pub id: Uuid,
    pub post_id: Uuid,
    pub author_id: Uuid,
    pub author_display_name: String,
    pub body_text: String,
    pub parent_id: Option<Uuid>,
    pub upvote_count: i64,
    pub downvote_count: i64,
    pub created_at: DateTime<Utc>,
}

impl Comment {
    pub fn score(&self) -> i64 {
        self.upvote_count - self.downvote_count
    }
}

/// The two kinds of entities that can be voted on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TargetKind {
    Post,
    Comment,
}

impl TargetKind {
    /// Stable storage tag, also used in log fields.
    pub fn as_str(&self) -> &'static str {
        match self {
            TargetKind::Post => "post",
            TargetKind::Comment => "comment",
        }
    }
}

/// Identifies a votable entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct VoteTarget {
    pub kind: TargetKind,
    pub id: Uuid,
}

impl VoteTarget {
    pub fn post(id: Uuid) -> Self {
        Self { kind: TargetKind::Post, id }
    }

    pub fn comment(id: Uuid) -> Self {
        Self { kind: TargetKind::Comment, id }
    }
}

/// A live ledger row: at most one per (voter, target) pair. A value of 0 is
/// never stored; "no vote" is the absence of the row.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Vote {
    pub voter_id: Uuid,
    pub target_id: Uuid,
    pub target_kind: TargetKind,
    /// Either +1 (upvote) or -1 (downvote) once stored.
    pub value: i16,
}

/// Upvote value on the wire.
pub const VOTE_UP: i16 = 1;
/// Downvote value on the wire.
pub const VOTE_DOWN: i16 = -1;
/// "Clear my vote" on the wire; stored as row absence, never as a zero row.
pub const VOTE_NONE: i16 = 0;

/// Maximum nesting depth at which clients should offer a reply composer.
/// Storage accepts unbounded depth; this is a client rendering guard only.
pub const MAX_REPLY_DEPTH: usize = 4;

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_post() -> Post {
        Post {
            id: Uuid::now_v7(),
            author_id: Uuid::now_v7(),
            author_display_name: "Ada".to_string(),
            campus: "umich.edu".to_string(),
            title: "Lost calculator in the Dude".to_string(),
            body_text: None,
            flair: Some("Lost & Found".to_string()),
            upvote_count: 7,
            downvote_count: 2,
            comment_count: 0,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn post_score_is_net_of_counters() {
        assert_eq!(sample_post().score(), 5);
    }

    #[test]
    fn post_serializes_camel_case() {
        let json = serde_json::to_value(sample_post()).unwrap();
        assert!(json.get("upvoteCount").is_some());
        assert!(json.get("authorDisplayName").is_some());
        assert!(json.get("upvote_count").is_none());
    }

    #[test]
    fn target_kind_round_trips_through_tag() {
        assert_eq!(TargetKind::Post.as_str(), "post");
        assert_eq!(TargetKind::Comment.as_str(), "comment");
        let v: TargetKind = serde_json::from_str("\"comment\"").unwrap();
        assert_eq!(v, TargetKind::Comment);
    }
}
