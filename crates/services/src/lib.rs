//! # services
//!
//! The domain logic of the Quadboard community board: vote-state transitions
//! with derived counter maintenance, the three post-ranking strategies, the
//! threaded comment-tree builder, and the `BoardService` facade that ties
//! them together behind the port traits of `domains`.

pub mod board;
pub mod comment_tree;
pub mod counters;
pub mod ranking;
pub mod vote_ledger;

pub use board::{BoardService, NewComment, NewPost, PostDetail, PostView, VoteReceipt};
pub use comment_tree::{build_forest, CommentNode, CommentSort};
pub use counters::{CounterMaintainer, CounterState};
pub use ranking::{hot_score, rank, PostSort, HOT_CANDIDATE_LIMIT};
pub use vote_ledger::{VoteLedger, VoteOutcome};
