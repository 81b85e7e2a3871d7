//! # PostgresStore
//!
//! sqlx-backed implementation of the store ports. The vote ledger maps to a
//! `votes` table with a primary key on (voter, kind, target) so the
//! insert-or-flip path is a single `ON CONFLICT` upsert, and counter
//! maintenance is an atomic clamped `UPDATE ... RETURNING` rather than a
//! read-then-write.

use std::collections::HashMap;

use async_trait::async_trait;
use domains::{
    AppError, BoardStore, Comment, Post, PostOrder, ProfileDirectory, Result, TargetKind,
    VoteTarget,
};
use sqlx::postgres::{PgPool, PgPoolOptions, PgRow};
use sqlx::Row;
use uuid::Uuid;

pub struct PostgresStore {
    pool: PgPool,
}

impl PostgresStore {
    /// Connects and runs pending migrations.
    pub async fn connect(database_url: &str, max_connections: u32) -> anyhow::Result<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .connect(database_url)
            .await?;
        sqlx::migrate!("./migrations").run(&pool).await?;
        Ok(Self { pool })
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

fn row_to_post(row: &PgRow) -> Result<Post> {
    Ok(Post {
        id: row.try_get("id").map_err(AppError::store)?,
        author_id: row.try_get("author_id").map_err(AppError::store)?,
        author_display_name: row
            .try_get("author_display_name")
            .map_err(AppError::store)?,
        campus: row.try_get("campus").map_err(AppError::store)?,
        title: row.try_get("title").map_err(AppError::store)?,
        body_text: row.try_get("body_text").map_err(AppError::store)?,
        flair: row.try_get("flair").map_err(AppError::store)?,
        upvote_count: row.try_get("upvote_count").map_err(AppError::store)?,
        downvote_count: row.try_get("downvote_count").map_err(AppError::store)?,
        comment_count: row.try_get("comment_count").map_err(AppError::store)?,
        created_at: row.try_get("created_at").map_err(AppError::store)?,
    })
}

fn row_to_comment(row: &PgRow) -> Result<Comment> {
    Ok(Comment {
        id: row.try_get("id").map_err(AppError::store)?,
        post_id: row.try_get("post_id").map_err(AppError::store)?,
        author_id: row.try_get("author_id").map_err(AppError::store)?,
        author_display_name: row
            .try_get("author_display_name")
            .map_err(AppError::store)?,
        body_text: row.try_get("body_text").map_err(AppError::store)?,
        parent_id: row.try_get("parent_id").map_err(AppError::store)?,
        upvote_count: row.try_get("upvote_count").map_err(AppError::store)?,
        downvote_count: row.try_get("downvote_count").map_err(AppError::store)?,
        created_at: row.try_get("created_at").map_err(AppError::store)?,
    })
}

fn counters_table(kind: TargetKind) -> &'static str {
    match kind {
        TargetKind::Post => "posts",
        TargetKind::Comment => "comments",
    }
}

#[async_trait]
impl BoardStore for PostgresStore {
    async fn insert_post(&self, post: &Post) -> Result<()> {
        sqlx::query(
            "INSERT INTO posts (id, author_id, author_display_name, campus, title, body_text, flair, \
             upvote_count, downvote_count, comment_count, created_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)",
        )
        .bind(post.id)
        .bind(post.author_id)
        .bind(&post.author_display_name)
        .bind(&post.campus)
        .bind(&post.title)
        .bind(&post.body_text)
        .bind(&post.flair)
        .bind(post.upvote_count)
        .bind(post.downvote_count)
        .bind(post.comment_count)
        .bind(post.created_at)
        .execute(&self.pool)
        .await
        .map_err(AppError::store)?;
        Ok(())
    }

    async fn post(&self, id: Uuid) -> Result<Option<Post>> {
        let row = sqlx::query("SELECT * FROM posts WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::store)?;
        row.as_ref().map(row_to_post).transpose()
    }

    async fn posts_by_campus(&self, campus: &str, order: PostOrder, limit: i64) -> Result<Vec<Post>> {
        let query = match order {
            PostOrder::NewestFirst => {
                "SELECT * FROM posts WHERE campus = $1 ORDER BY created_at DESC LIMIT $2"
            }
            PostOrder::BestFirst => {
                "SELECT * FROM posts WHERE campus = $1 \
                 ORDER BY (upvote_count - downvote_count) DESC, created_at DESC LIMIT $2"
            }
        };
        let rows = sqlx::query(query)
            .bind(campus)
            .bind(limit)
            .fetch_all(&self.pool)
            .await
            .map_err(AppError::store)?;
        rows.iter().map(row_to_post).collect()
    }

    /// Cascading delete inside one transaction so a failure cannot leave
    /// orphaned comments or dangling ledger rows behind.
    async fn delete_post(&self, id: Uuid) -> Result<()> {
        let mut tx = self.pool.begin().await.map_err(AppError::store)?;

        sqlx::query(
            "DELETE FROM votes WHERE target_kind = 'comment' \
             AND target_id IN (SELECT id FROM comments WHERE post_id = $1)",
        )
        .bind(id)
        .execute(&mut *tx)
        .await
        .map_err(AppError::store)?;

        sqlx::query("DELETE FROM votes WHERE target_kind = 'post' AND target_id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await
            .map_err(AppError::store)?;

        sqlx::query("DELETE FROM comments WHERE post_id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await
            .map_err(AppError::store)?;

        sqlx::query("DELETE FROM posts WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await
            .map_err(AppError::store)?;

        tx.commit().await.map_err(AppError::store)?;
        Ok(())
    }

    async fn increment_comment_count(&self, post_id: Uuid) -> Result<()> {
        sqlx::query("UPDATE posts SET comment_count = comment_count + 1 WHERE id = $1")
            .bind(post_id)
            .execute(&self.pool)
            .await
            .map_err(AppError::store)?;
        Ok(())
    }

    async fn insert_comment(&self, comment: &Comment) -> Result<()> {
        sqlx::query(
            "INSERT INTO comments (id, post_id, author_id, author_display_name, body_text, \
             parent_id, upvote_count, downvote_count, created_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)",
        )
        .bind(comment.id)
        .bind(comment.post_id)
        .bind(comment.author_id)
        .bind(&comment.author_display_name)
        .bind(&comment.body_text)
        .bind(comment.parent_id)
        .bind(comment.upvote_count)
        .bind(comment.downvote_count)
        .bind(comment.created_at)
        .execute(&self.pool)
        .await
        .map_err(AppError::store)?;
        Ok(())
    }

    async fn comment(&self, id: Uuid) -> Result<Option<Comment>> {
        let row = sqlx::query("SELECT * FROM comments WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::store)?;
        row.as_ref().map(row_to_comment).transpose()
    }

    async fn comments_for_post(&self, post_id: Uuid) -> Result<Vec<Comment>> {
        let rows = sqlx::query("SELECT * FROM comments WHERE post_id = $1 ORDER BY created_at ASC")
            .bind(post_id)
            .fetch_all(&self.pool)
            .await
            .map_err(AppError::store)?;
        rows.iter().map(row_to_comment).collect()
    }

    async fn vote_value(&self, voter_id: Uuid, target: VoteTarget) -> Result<Option<i16>> {
        let row = sqlx::query(
            "SELECT value FROM votes WHERE voter_id = $1 AND target_kind = $2 AND target_id = $3",
        )
        .bind(voter_id)
        .bind(target.kind.as_str())
        .bind(target.id)
        .fetch_optional(&self.pool)
        .await
        .map_err(AppError::store)?;
        row.map(|r| r.try_get::<i16, _>("value").map_err(AppError::store))
            .transpose()
    }

    async fn put_vote(&self, voter_id: Uuid, target: VoteTarget, value: i16) -> Result<()> {
        // The primary key on (voter, kind, target) makes insert and
        // vote-flip a single atomic upsert.
        sqlx::query(
            "INSERT INTO votes (voter_id, target_kind, target_id, value) VALUES ($1, $2, $3, $4) \
             ON CONFLICT (voter_id, target_kind, target_id) DO UPDATE SET value = EXCLUDED.value",
        )
        .bind(voter_id)
        .bind(target.kind.as_str())
        .bind(target.id)
        .bind(value)
        .execute(&self.pool)
        .await
        .map_err(AppError::store)?;
        Ok(())
    }

    async fn delete_vote(&self, voter_id: Uuid, target: VoteTarget) -> Result<()> {
        sqlx::query(
            "DELETE FROM votes WHERE voter_id = $1 AND target_kind = $2 AND target_id = $3",
        )
        .bind(voter_id)
        .bind(target.kind.as_str())
        .bind(target.id)
        .execute(&self.pool)
        .await
        .map_err(AppError::store)?;
        Ok(())
    }

    async fn votes_by_voter(
        &self,
        voter_id: Uuid,
        kind: TargetKind,
        target_ids: &[Uuid],
    ) -> Result<HashMap<Uuid, i16>> {
        if target_ids.is_empty() {
            return Ok(HashMap::new());
        }
        let rows = sqlx::query(
            "SELECT target_id, value FROM votes \
             WHERE voter_id = $1 AND target_kind = $2 AND target_id = ANY($3)",
        )
        .bind(voter_id)
        .bind(kind.as_str())
        .bind(target_ids)
        .fetch_all(&self.pool)
        .await
        .map_err(AppError::store)?;

        rows.iter()
            .map(|row| {
                Ok((
                    row.try_get("target_id").map_err(AppError::store)?,
                    row.try_get("value").map_err(AppError::store)?,
                ))
            })
            .collect()
    }

    async fn adjust_counters(
        &self,
        target: VoteTarget,
        up_delta: i64,
        down_delta: i64,
    ) -> Result<(i64, i64)> {
        let query = format!(
            "UPDATE {table} SET \
             upvote_count = GREATEST(0, upvote_count + $1), \
             downvote_count = GREATEST(0, downvote_count + $2) \
             WHERE id = $3 RETURNING upvote_count, downvote_count",
            table = counters_table(target.kind)
        );
        let row = sqlx::query(&query)
            .bind(up_delta)
            .bind(down_delta)
            .bind(target.id)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::store)?
            .ok_or_else(|| AppError::not_found(target.kind.as_str(), target.id))?;
        Ok((
            row.try_get("upvote_count").map_err(AppError::store)?,
            row.try_get("downvote_count").map_err(AppError::store)?,
        ))
    }

    async fn counters(&self, target: VoteTarget) -> Result<(i64, i64)> {
        let query = format!(
            "SELECT upvote_count, downvote_count FROM {table} WHERE id = $1",
            table = counters_table(target.kind)
        );
        let row = sqlx::query(&query)
            .bind(target.id)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::store)?
            .ok_or_else(|| AppError::not_found(target.kind.as_str(), target.id))?;
        Ok((
            row.try_get("upvote_count").map_err(AppError::store)?,
            row.try_get("downvote_count").map_err(AppError::store)?,
        ))
    }
}

#[async_trait]
impl ProfileDirectory for PostgresStore {
    async fn avatar_urls(&self, user_ids: &[Uuid]) -> Result<HashMap<Uuid, String>> {
        if user_ids.is_empty() {
            return Ok(HashMap::new());
        }
        let rows = sqlx::query(
            "SELECT id, avatar_url FROM users WHERE id = ANY($1) AND avatar_url IS NOT NULL",
        )
        .bind(user_ids)
        .fetch_all(&self.pool)
        .await
        .map_err(AppError::store)?;

        rows.iter()
            .map(|row| {
                Ok((
                    row.try_get("id").map_err(AppError::store)?,
                    row.try_get("avatar_url").map_err(AppError::store)?,
                ))
            })
            .collect()
    }
}
