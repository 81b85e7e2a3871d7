//! # MemoryStore
//!
//! In-memory implementation of the store ports. Backs the integration test
//! suite and the dev fallback when the binary is built without
//! `db-postgres`. One `RwLock` over the whole state keeps the counter
//! adjustments and cascading deletes atomic with respect to each other.

use std::collections::HashMap;

use async_trait::async_trait;
use domains::{
    AppError, BoardStore, Comment, Post, PostOrder, ProfileDirectory, Result, TargetKind,
    VoteTarget,
};
use tokio::sync::RwLock;
use uuid::Uuid;

#[derive(Default)]
struct MemoryState {
    posts: HashMap<Uuid, Post>,
    comments: HashMap<Uuid, Comment>,
    /// Live ledger rows keyed by (voter, kind, target).
    votes: HashMap<(Uuid, TargetKind, Uuid), i16>,
    avatars: HashMap<Uuid, String>,
}

#[derive(Default)]
pub struct MemoryStore {
    state: RwLock<MemoryState>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers an avatar for a user; test/dev convenience mirroring the
    /// profile directory the marketplace side would provide.
    pub async fn set_avatar(&self, user_id: Uuid, url: impl Into<String>) {
        self.state.write().await.avatars.insert(user_id, url.into());
    }
}

impl MemoryState {
    fn counters_mut(&mut self, target: VoteTarget) -> Result<(&mut i64, &mut i64)> {
        match target.kind {
            TargetKind::Post => self
                .posts
                .get_mut(&target.id)
                .map(|p| (&mut p.upvote_count, &mut p.downvote_count))
                .ok_or_else(|| AppError::not_found("post", target.id)),
            TargetKind::Comment => self
                .comments
                .get_mut(&target.id)
                .map(|c| (&mut c.upvote_count, &mut c.downvote_count))
                .ok_or_else(|| AppError::not_found("comment", target.id)),
        }
    }
}

#[async_trait]
impl BoardStore for MemoryStore {
    async fn insert_post(&self, post: &Post) -> Result<()> {
        self.state.write().await.posts.insert(post.id, post.clone());
        Ok(())
    }

    async fn post(&self, id: Uuid) -> Result<Option<Post>> {
        Ok(self.state.read().await.posts.get(&id).cloned())
    }

    async fn posts_by_campus(&self, campus: &str, order: PostOrder, limit: i64) -> Result<Vec<Post>> {
        let state = self.state.read().await;
        let mut posts: Vec<Post> = state
            .posts
            .values()
            .filter(|p| p.campus == campus)
            .cloned()
            .collect();
        match order {
            PostOrder::NewestFirst => posts.sort_by(|a, b| b.created_at.cmp(&a.created_at)),
            PostOrder::BestFirst => posts.sort_by(|a, b| {
                b.score()
                    .cmp(&a.score())
                    .then_with(|| b.created_at.cmp(&a.created_at))
            }),
        }
        posts.truncate(limit.max(0) as usize);
        Ok(posts)
    }

    async fn delete_post(&self, id: Uuid) -> Result<()> {
        let mut state = self.state.write().await;
        state.posts.remove(&id);
        let comment_ids: Vec<Uuid> = state
            .comments
            .values()
            .filter(|c| c.post_id == id)
            .map(|c| c.id)
            .collect();
        for cid in &comment_ids {
            state.comments.remove(cid);
        }
        state.votes.retain(|(_, kind, target), _| match kind {
            TargetKind::Post => *target != id,
            TargetKind::Comment => !comment_ids.contains(target),
        });
        Ok(())
    }

    async fn increment_comment_count(&self, post_id: Uuid) -> Result<()> {
        let mut state = self.state.write().await;
        let post = state
            .posts
            .get_mut(&post_id)
            .ok_or_else(|| AppError::not_found("post", post_id))?;
        post.comment_count += 1;
        Ok(())
    }

    async fn insert_comment(&self, comment: &Comment) -> Result<()> {
        self.state
            .write()
            .await
            .comments
            .insert(comment.id, comment.clone());
        Ok(())
    }

    async fn comment(&self, id: Uuid) -> Result<Option<Comment>> {
        Ok(self.state.read().await.comments.get(&id).cloned())
    }

    async fn comments_for_post(&self, post_id: Uuid) -> Result<Vec<Comment>> {
        let state = self.state.read().await;
        let mut comments: Vec<Comment> = state
            .comments
            .values()
            .filter(|c| c.post_id == post_id)
            .cloned()
            .collect();
        comments.sort_by(|a, b| a.created_at.cmp(&b.created_at));
        Ok(comments)
    }

    async fn vote_value(&self, voter_id: Uuid, target: VoteTarget) -> Result<Option<i16>> {
        Ok(self
            .state
            .read()
            .await
            .votes
            .get(&(voter_id, target.kind, target.id))
            .copied())
    }

    async fn put_vote(&self, voter_id: Uuid, target: VoteTarget, value: i16) -> Result<()> {
        self.state
            .write()
            .await
            .votes
            .insert((voter_id, target.kind, target.id), value);
        Ok(())
    }

    async fn delete_vote(&self, voter_id: Uuid, target: VoteTarget) -> Result<()> {
        self.state
            .write()
            .await
            .votes
            .remove(&(voter_id, target.kind, target.id));
        Ok(())
    }

    async fn votes_by_voter(
        &self,
        voter_id: Uuid,
        kind: TargetKind,
        target_ids: &[Uuid],
    ) -> Result<HashMap<Uuid, i16>> {
        let state = self.state.read().await;
        Ok(target_ids
            .iter()
            .filter_map(|id| {
                state
                    .votes
                    .get(&(voter_id, kind, *id))
                    .map(|value| (*id, *value))
            })
            .collect())
    }

    async fn adjust_counters(
        &self,
        target: VoteTarget,
        up_delta: i64,
        down_delta: i64,
    ) -> Result<(i64, i64)> {
        let mut state = self.state.write().await;
        let (up, down) = state.counters_mut(target)?;
        // Clamp at zero independently; drift must never go negative.
        *up = (*up + up_delta).max(0);
        *down = (*down + down_delta).max(0);
        Ok((*up, *down))
    }

    async fn counters(&self, target: VoteTarget) -> Result<(i64, i64)> {
        let mut state = self.state.write().await;
        let (up, down) = state.counters_mut(target)?;
        Ok((*up, *down))
    }
}

#[async_trait]
impl ProfileDirectory for MemoryStore {
    async fn avatar_urls(&self, user_ids: &[Uuid]) -> Result<HashMap<Uuid, String>> {
        let state = self.state.read().await;
        Ok(user_ids
            .iter()
            .filter_map(|id| state.avatars.get(id).map(|url| (*id, url.clone())))
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn post(campus: &str) -> Post {
        Post {
            id: Uuid::now_v7(),
            author_id: Uuid::now_v7(),
            author_display_name: "Ada".into(),
            campus: campus.into(),
            title: "hello".into(),
            body_text: None,
            flair: None,
            upvote_count: 0,
            downvote_count: 0,
            comment_count: 0,
            created_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn adjust_counters_clamps_at_zero() {
        let store = MemoryStore::new();
        let p = post("umich.edu");
        store.insert_post(&p).await.unwrap();

        let (up, down) = store
            .adjust_counters(VoteTarget::post(p.id), -5, 2)
            .await
            .unwrap();
        assert_eq!((up, down), (0, 2));
    }

    #[tokio::test]
    async fn listing_filters_by_campus() {
        let store = MemoryStore::new();
        store.insert_post(&post("umich.edu")).await.unwrap();
        store.insert_post(&post("osu.edu")).await.unwrap();

        let posts = store
            .posts_by_campus("umich.edu", PostOrder::NewestFirst, 50)
            .await
            .unwrap();
        assert_eq!(posts.len(), 1);
        assert_eq!(posts[0].campus, "umich.edu");
    }

    #[tokio::test]
    async fn delete_post_cascades_to_comments_and_votes() {
        let store = MemoryStore::new();
        let p = post("umich.edu");
        store.insert_post(&p).await.unwrap();

        let c = Comment {
            id: Uuid::now_v7(),
            post_id: p.id,
            author_id: Uuid::now_v7(),
            author_display_name: "Grace".into(),
            body_text: "hi".into(),
            parent_id: None,
            upvote_count: 0,
            downvote_count: 0,
            created_at: Utc::now(),
        };
        store.insert_comment(&c).await.unwrap();

        let voter = Uuid::now_v7();
        store.put_vote(voter, VoteTarget::post(p.id), 1).await.unwrap();
        store.put_vote(voter, VoteTarget::comment(c.id), -1).await.unwrap();

        store.delete_post(p.id).await.unwrap();

        assert!(store.post(p.id).await.unwrap().is_none());
        assert!(store.comment(c.id).await.unwrap().is_none());
        assert!(store.vote_value(voter, VoteTarget::post(p.id)).await.unwrap().is_none());
        assert!(store
            .vote_value(voter, VoteTarget::comment(c.id))
            .await
            .unwrap()
            .is_none());
    }
}
