//! Shared handler state.

use std::sync::Arc;

use domains::SessionVerifier;
use services::BoardService;

/// State shared across all handlers. Adapters are behind trait objects so
/// the binary decides the concrete store/auth wiring at assembly time.
#[derive(Clone)]
pub struct ApiState {
    pub board: Arc<BoardService>,
    pub sessions: Arc<dyn SessionVerifier>,
}

impl ApiState {
    pub fn new(board: Arc<BoardService>, sessions: Arc<dyn SessionVerifier>) -> Self {
        Self { board, sessions }
    }
}
