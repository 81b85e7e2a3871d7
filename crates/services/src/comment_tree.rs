//! # CommentTreeBuilder
//!
//! Rebuilds the threaded comment forest from the flat rows the store hands
//! back. Parent/child links are ids, not references, so reconstruction is an
//! index-then-attach pass with a per-level recursive sort.

use std::collections::HashMap;
use std::collections::HashSet;

use domains::{AppError, Comment, Result};
use uuid::Uuid;

/// Comment sort selector; the `hot` strategy is posts-only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CommentSort {
    New,
    #[default]
    Best,
}

impl CommentSort {
    pub fn parse(s: &str) -> Result<Self> {
        match s {
            "new" => Ok(CommentSort::New),
            "best" => Ok(CommentSort::Best),
            other => Err(AppError::validation(format!(
                "unknown comment sort '{other}', expected best|new"
            ))),
        }
    }
}

/// A comment with its direct replies attached; replies are themselves sorted
/// by the same strategy, recursively.
#[derive(Debug, Clone)]
pub struct CommentNode {
    pub comment: Comment,
    pub replies: Vec<CommentNode>,
}

impl CommentNode {
    /// Total number of comments in this subtree, the node itself included.
    pub fn subtree_len(&self) -> usize {
        1 + self.replies.iter().map(CommentNode::subtree_len).sum::<usize>()
    }
}

/// Builds the forest for one post's comments.
///
/// A comment whose `parent_id` references a comment that is not in the input
/// (e.g., the parent was removed) is promoted to a root rather than dropped;
/// every input comment appears in the output exactly once. The same sort is
/// applied uniformly to the siblings at every level.
pub fn build_forest(comments: Vec<Comment>, sort: CommentSort) -> Vec<CommentNode> {
    let known: HashSet<Uuid> = comments.iter().map(|c| c.id).collect();

    let mut roots: Vec<Comment> = Vec::new();
    let mut children: HashMap<Uuid, Vec<Comment>> = HashMap::new();
    for comment in comments {
        match comment.parent_id {
            Some(parent) if known.contains(&parent) => {
                children.entry(parent).or_default().push(comment)
            }
            // Top-level, or orphaned by a missing parent: both are roots.
            _ => roots.push(comment),
        }
    }

    attach_level(roots, &mut children, sort)
}

fn attach_level(
    mut level: Vec<Comment>,
    children: &mut HashMap<Uuid, Vec<Comment>>,
    sort: CommentSort,
) -> Vec<CommentNode> {
    sort_siblings(&mut level, sort);
    level
        .into_iter()
        .map(|comment| {
            let replies = children
                .remove(&comment.id)
                .map(|kids| attach_level(kids, children, sort))
                .unwrap_or_default();
            CommentNode { comment, replies }
        })
        .collect()
}

fn sort_siblings(siblings: &mut [Comment], sort: CommentSort) {
    match sort {
        CommentSort::New => siblings.sort_by(|a, b| b.created_at.cmp(&a.created_at)),
        CommentSort::Best => siblings.sort_by(|a, b| {
            b.score()
                .cmp(&a.score())
                .then_with(|| b.created_at.cmp(&a.created_at))
        }),
    }
}
