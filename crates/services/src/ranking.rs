//! # RankingEngine
//!
//! Post ordering strategies for board listings. `new` and `best` map onto
//! store-native orderings; `hot` is a time-decayed score computed at request
//! time over a bounded candidate set of recent posts.

use chrono::{DateTime, Utc};
use domains::{AppError, Post, Result};

/// Listing strategies accepted by `GET /posts?sort=`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PostSort {
    New,
    Best,
    #[default]
    Hot,
}

impl PostSort {
    pub fn parse(s: &str) -> Result<Self> {
        match s {
            "new" => Ok(PostSort::New),
            "best" => Ok(PostSort::Best),
            "hot" => Ok(PostSort::Hot),
            other => Err(AppError::validation(format!(
                "unknown sort '{other}', expected one of new|best|hot"
            ))),
        }
    }
}

/// How many most-recent posts are considered for the `hot` ordering. A post
/// older than this cutoff never surfaces under `hot` regardless of score;
/// this bounded approximation is deliberate and keeps the re-sort in memory.
pub const HOT_CANDIDATE_LIMIT: i64 = 50;

/// Hours added to the age before decay, so brand-new posts do not divide by
/// (near) zero and a small early score cannot dominate the board.
const HOT_AGE_OFFSET_HOURS: f64 = 2.0;
const HOT_DECAY_EXPONENT: f64 = 1.5;

/// Time-decayed popularity: `(upvotes - downvotes) / (age_hours + 2)^1.5`.
/// Ages are clamped at zero to tolerate minor clock skew on `created_at`.
pub fn hot_score(post: &Post, now: DateTime<Utc>) -> f64 {
    let age_hours = (now - post.created_at).num_seconds().max(0) as f64 / 3600.0;
    post.score() as f64 / (age_hours + HOT_AGE_OFFSET_HOURS).powf(HOT_DECAY_EXPONENT)
}

/// Orders `posts` by the given strategy without mutating the caller's data.
/// Ties under `best` and `hot` fall back to recency (newest first); sorting
/// is stable beyond that.
pub fn rank(mut posts: Vec<Post>, sort: PostSort, now: DateTime<Utc>) -> Vec<Post> {
    match sort {
        PostSort::New => posts.sort_by(|a, b| b.created_at.cmp(&a.created_at)),
        PostSort::Best => posts.sort_by(|a, b| {
            b.score()
                .cmp(&a.score())
                .then_with(|| b.created_at.cmp(&a.created_at))
        }),
        PostSort::Hot => posts.sort_by(|a, b| {
            hot_score(b, now)
                .total_cmp(&hot_score(a, now))
                .then_with(|| b.created_at.cmp(&a.created_at))
        }),
    }
    posts
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use uuid::Uuid;

    fn post(up: i64, down: i64, age_hours: i64, now: DateTime<Utc>) -> Post {
        Post {
            id: Uuid::now_v7(),
            author_id: Uuid::now_v7(),
            author_display_name: "Ada".into(),
            campus: "umich.edu".into(),
            title: "t".into(),
            body_text: None,
            flair: None,
            upvote_count: up,
            downvote_count: down,
            comment_count: 0,
            created_at: now - Duration::hours(age_hours),
        }
    }

    #[test]
    fn parse_accepts_the_three_strategies() {
        assert_eq!(PostSort::parse("new").unwrap(), PostSort::New);
        assert_eq!(PostSort::parse("best").unwrap(), PostSort::Best);
        assert_eq!(PostSort::parse("hot").unwrap(), PostSort::Hot);
        assert!(PostSort::parse("rising").is_err());
    }

    #[test]
    fn hot_decay_beats_raw_score() {
        let now = Utc::now();
        // A: score 10, 1h old -> 10 / 3^1.5 ~= 1.925
        // B: score 12, 10h old -> 12 / 12^1.5 ~= 0.289
        let a = post(10, 0, 1, now);
        let b = post(12, 0, 10, now);
        assert!((hot_score(&a, now) - 1.9245).abs() < 1e-3);
        assert!((hot_score(&b, now) - 0.2887).abs() < 1e-3);

        let ranked = rank(vec![b.clone(), a.clone()], PostSort::Hot, now);
        assert_eq!(ranked[0].id, a.id);
        assert_eq!(ranked[1].id, b.id);
    }

    #[test]
    fn best_orders_by_net_score_then_recency() {
        let now = Utc::now();
        let low = post(3, 1, 1, now);
        let high = post(9, 2, 5, now);
        let tied_old = post(7, 0, 8, now);
        let tied_new = post(7, 0, 2, now);

        let ranked = rank(
            vec![low.clone(), tied_old.clone(), high.clone(), tied_new.clone()],
            PostSort::Best,
            now,
        );
        let ids: Vec<_> = ranked.iter().map(|p| p.id).collect();
        assert_eq!(ids, vec![high.id, tied_new.id, tied_old.id, low.id]);
    }

    #[test]
    fn new_orders_by_created_at_descending() {
        let now = Utc::now();
        let old = post(100, 0, 9, now);
        let recent = post(0, 5, 1, now);
        let ranked = rank(vec![old.clone(), recent.clone()], PostSort::New, now);
        assert_eq!(ranked[0].id, recent.id);
    }

    #[test]
    fn negative_age_is_clamped() {
        let now = Utc::now();
        let future = post(4, 0, -1, now);
        // age clamps to 0 -> 4 / 2^1.5
        assert!((hot_score(&future, now) - 4.0 / 2.0_f64.powf(1.5)).abs() < 1e-9);
    }

    #[test]
    fn rank_returns_same_set() {
        let now = Utc::now();
        let posts = vec![post(1, 0, 1, now), post(2, 0, 2, now), post(3, 0, 3, now)];
        let ranked = rank(posts.clone(), PostSort::Hot, now);
        assert_eq!(ranked.len(), posts.len());
    }
}
