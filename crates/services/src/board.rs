//! # BoardService
//!
//! Orchestrates the vote ledger, counter maintainer, ranking engine, and
//! comment-tree builder into the campus board's operation surface. All
//! operations take the authenticated principal and enforce campus scoping,
//! ownership, and validation bounds before touching the store.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::Utc;
use domains::{
    AppError, AuthenticatedUser, BoardStore, Comment, Post, PostOrder, ProfileDirectory, Result,
    TargetKind, VoteTarget, VOTE_NONE,
};
use serde::Serialize;
use uuid::Uuid;

use crate::comment_tree::{self, CommentNode, CommentSort};
use crate::counters::CounterMaintainer;
use crate::ranking::{self, PostSort, HOT_CANDIDATE_LIMIT};
use crate::vote_ledger::VoteLedger;

/// Title must be 1..=200 characters.
pub const TITLE_MAX_LEN: usize = 200;
/// Post body is optional but capped at 5000 characters.
pub const POST_BODY_MAX_LEN: usize = 5000;
/// Comment body must be 1..=2000 characters.
pub const COMMENT_BODY_MAX_LEN: usize = 2000;

/// Page size for `new`/`best` listings pushed down to the store.
const LIST_LIMIT: i64 = 50;

/// A post annotated for one viewer: their own live vote (0 when none) and
/// the author's avatar, batch-resolved.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PostView {
    #[serde(flatten)]
    pub post: Post,
    pub user_vote: i16,
    pub author_avatar_url: Option<String>,
}

/// A comment subtree annotated for one viewer.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CommentView {
    #[serde(flatten)]
    pub comment: Comment,
    pub user_vote: i16,
    pub author_avatar_url: Option<String>,
    pub replies: Vec<CommentView>,
}

/// Single-post response: the post plus its full comment forest.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PostDetail {
    #[serde(flatten)]
    pub post: PostView,
    pub comments: Vec<CommentView>,
}

/// Authoritative counter state after a vote, echoed to the caller.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct VoteReceipt {
    pub upvotes: i64,
    pub downvotes: i64,
    pub user_vote: i16,
}

/// Input for `create_post`; campus is always taken from the principal,
/// never from the caller.
#[derive(Debug, Clone)]
pub struct NewPost {
    pub title: String,
    pub body_text: Option<String>,
    pub flair: Option<String>,
}

#[derive(Debug, Clone)]
pub struct NewComment {
    pub body_text: String,
    pub parent_id: Option<Uuid>,
}

pub struct BoardService {
    store: Arc<dyn BoardStore>,
    profiles: Arc<dyn ProfileDirectory>,
    ledger: VoteLedger,
    counters: CounterMaintainer,
}

impl BoardService {
    pub fn new(store: Arc<dyn BoardStore>, profiles: Arc<dyn ProfileDirectory>) -> Self {
        Self {
            ledger: VoteLedger::new(store.clone()),
            counters: CounterMaintainer::new(store.clone()),
            store,
            profiles,
        }
    }

    /// Lists the viewer's campus posts under the given strategy, annotated
    /// with the viewer's own votes and author avatars (both batched).
    pub async fn list_posts(&self, user: &AuthenticatedUser, sort: PostSort) -> Result<Vec<PostView>> {
        let posts = match sort {
            // Store-native orderings keep these scalable.
            PostSort::New => {
                self.store
                    .posts_by_campus(&user.campus, PostOrder::NewestFirst, LIST_LIMIT)
                    .await?
            }
            PostSort::Best => {
                self.store
                    .posts_by_campus(&user.campus, PostOrder::BestFirst, LIST_LIMIT)
                    .await?
            }
            // Hot re-ranks a bounded recent candidate set in memory; posts
            // older than the cutoff never surface here.
            PostSort::Hot => {
                let candidates = self
                    .store
                    .posts_by_campus(&user.campus, PostOrder::NewestFirst, HOT_CANDIDATE_LIMIT)
                    .await?;
                ranking::rank(candidates, PostSort::Hot, Utc::now())
            }
        };

        let ids: Vec<Uuid> = posts.iter().map(|p| p.id).collect();
        let votes = self
            .store
            .votes_by_voter(user.id, TargetKind::Post, &ids)
            .await?;
        let author_ids: Vec<Uuid> = dedup(posts.iter().map(|p| p.author_id));
        let avatars = self.profiles.avatar_urls(&author_ids).await?;

        Ok(posts
            .into_iter()
            .map(|post| PostView {
                user_vote: votes.get(&post.id).copied().unwrap_or(VOTE_NONE),
                author_avatar_url: avatars.get(&post.author_id).cloned(),
                post,
            })
            .collect())
    }

    /// Fetches one post with its full comment forest. The viewer's votes on
    /// the post and on every comment are resolved in one batch per kind, and
    /// avatars for all distinct authors in one batch — no per-row lookups.
    pub async fn get_post(
        &self,
        user: &AuthenticatedUser,
        post_id: Uuid,
        comment_sort: CommentSort,
    ) -> Result<PostDetail> {
        let post = self.visible_post(user, post_id).await?;
        let comments = self.store.comments_for_post(post_id).await?;

        let comment_ids: Vec<Uuid> = comments.iter().map(|c| c.id).collect();
        let comment_votes = self
            .store
            .votes_by_voter(user.id, TargetKind::Comment, &comment_ids)
            .await?;
        let post_vote = self
            .store
            .vote_value(user.id, VoteTarget::post(post_id))
            .await?
            .unwrap_or(VOTE_NONE);

        let author_ids: Vec<Uuid> = dedup(
            std::iter::once(post.author_id).chain(comments.iter().map(|c| c.author_id)),
        );
        let avatars = self.profiles.avatar_urls(&author_ids).await?;

        let forest = comment_tree::build_forest(comments, comment_sort);
        let comments = forest
            .into_iter()
            .map(|node| annotate_node(node, &comment_votes, &avatars))
            .collect();

        Ok(PostDetail {
            post: PostView {
                user_vote: post_vote,
                author_avatar_url: avatars.get(&post.author_id).cloned(),
                post,
            },
            comments,
        })
    }

    pub async fn create_post(&self, user: &AuthenticatedUser, input: NewPost) -> Result<Post> {
        let title = input.title.trim();
        if title.is_empty() || title.chars().count() > TITLE_MAX_LEN {
            return Err(AppError::validation(format!(
                "title must be 1-{TITLE_MAX_LEN} characters"
            )));
        }
        if let Some(body) = &input.body_text {
            if body.chars().count() > POST_BODY_MAX_LEN {
                return Err(AppError::validation(format!(
                    "body must be at most {POST_BODY_MAX_LEN} characters"
                )));
            }
        }

        let post = Post {
            id: Uuid::now_v7(),
            author_id: user.id,
            author_display_name: user.display_name.clone(),
            campus: user.campus.clone(),
            title: title.to_string(),
            body_text: input.body_text,
            flair: input.flair,
            upvote_count: 0,
            downvote_count: 0,
            comment_count: 0,
            created_at: Utc::now(),
        };
        self.store.insert_post(&post).await?;
        tracing::info!(post = %post.id, campus = %post.campus, "post created");
        Ok(post)
    }

    /// Creates a comment on a post of the viewer's campus. A `parent_id`
    /// must name an existing comment of the **same** post; anything else is
    /// `NotFound`. Bumps the post's denormalized `comment_count`.
    pub async fn create_comment(
        &self,
        user: &AuthenticatedUser,
        post_id: Uuid,
        input: NewComment,
    ) -> Result<Comment> {
        let body = input.body_text.trim();
        if body.is_empty() || body.chars().count() > COMMENT_BODY_MAX_LEN {
            return Err(AppError::validation(format!(
                "comment body must be 1-{COMMENT_BODY_MAX_LEN} characters"
            )));
        }

        self.visible_post(user, post_id).await?;

        if let Some(parent_id) = input.parent_id {
            let parent = self
                .store
                .comment(parent_id)
                .await?
                .ok_or_else(|| AppError::not_found("comment", parent_id))?;
            if parent.post_id != post_id {
                // A parent from another post would silently graft threads
                // together; reject it the same way as a missing parent.
                return Err(AppError::not_found("comment", parent_id));
            }
        }

        let comment = Comment {
            id: Uuid::now_v7(),
            post_id,
            author_id: user.id,
            author_display_name: user.display_name.clone(),
            body_text: body.to_string(),
            parent_id: input.parent_id,
            upvote_count: 0,
            downvote_count: 0,
            created_at: Utc::now(),
        };
        self.store.insert_comment(&comment).await?;
        self.store.increment_comment_count(post_id).await?;
        tracing::info!(comment = %comment.id, post = %post_id, "comment created");
        Ok(comment)
    }

    /// Applies the viewer's vote on a post or comment and answers with the
    /// authoritative counters. Ledger first, then counters; identical
    /// repeated votes are no-ops and issue no counter write.
    pub async fn vote(
        &self,
        user: &AuthenticatedUser,
        target: VoteTarget,
        value: i16,
    ) -> Result<VoteReceipt> {
        match target.kind {
            TargetKind::Post => {
                self.visible_post(user, target.id).await?;
            }
            TargetKind::Comment => {
                let comment = self
                    .store
                    .comment(target.id)
                    .await?
                    .ok_or_else(|| AppError::not_found("comment", target.id))?;
                // Comment visibility follows its post's campus.
                self.visible_post(user, comment.post_id).await?;
            }
        }

        let outcome = self.ledger.apply(user.id, target, value).await?;
        let state = self
            .counters
            .apply(target, outcome.up_delta, outcome.down_delta)
            .await?;

        Ok(VoteReceipt {
            upvotes: state.upvotes,
            downvotes: state.downvotes,
            user_vote: outcome.new_value,
        })
    }

    /// Author-only post deletion; cascades to comments and votes.
    pub async fn delete_post(&self, user: &AuthenticatedUser, post_id: Uuid) -> Result<()> {
        let post = self.visible_post(user, post_id).await?;
        if post.author_id != user.id {
            return Err(AppError::Forbidden("only the author may delete a post".into()));
        }
        self.store.delete_post(post_id).await?;
        tracing::info!(post = %post_id, "post deleted");
        Ok(())
    }

    /// Fetches a post and enforces campus scoping: a post from another
    /// campus is reported as missing, not as forbidden, so existence does
    /// not leak across the tenancy boundary.
    async fn visible_post(&self, user: &AuthenticatedUser, post_id: Uuid) -> Result<Post> {
        let post = self
            .store
            .post(post_id)
            .await?
            .ok_or_else(|| AppError::not_found("post", post_id))?;
        if post.campus != user.campus {
            return Err(AppError::not_found("post", post_id));
        }
        Ok(post)
    }
}

fn annotate_node(
    node: CommentNode,
    votes: &HashMap<Uuid, i16>,
    avatars: &HashMap<Uuid, String>,
) -> CommentView {
    let replies = node
        .replies
        .into_iter()
        .map(|child| annotate_node(child, votes, avatars))
        .collect();
    CommentView {
        user_vote: votes.get(&node.comment.id).copied().unwrap_or(VOTE_NONE),
        author_avatar_url: avatars.get(&node.comment.author_id).cloned(),
        comment: node.comment,
        replies,
    }
}

fn dedup(ids: impl Iterator<Item = Uuid>) -> Vec<Uuid> {
    let mut seen = std::collections::HashSet::new();
    ids.filter(|id| seen.insert(*id)).collect()
}
