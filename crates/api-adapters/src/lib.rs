//! # api-adapters
//!
//! The web routing and orchestration layer for Quadboard (feature
//! `web-axum`): JSON handlers over `BoardService`, the `Viewer` session
//! extractor, and error-to-status mapping.

#[cfg(feature = "web-axum")]
pub mod error;
#[cfg(feature = "web-axum")]
pub mod extract;
#[cfg(feature = "web-axum")]
pub mod handlers;
#[cfg(feature = "web-axum")]
pub mod middleware;
#[cfg(feature = "web-axum")]
pub mod state;

#[cfg(feature = "web-axum")]
pub use state::ApiState;

#[cfg(feature = "web-axum")]
use axum::routing::{get, post};
#[cfg(feature = "web-axum")]
use axum::Router;

/// Builds the board router. Mounted at the root; the binary may nest it
/// under a prefix (e.g., /api/v1) if needed.
#[cfg(feature = "web-axum")]
pub fn router(state: ApiState) -> Router {
    Router::new()
        .route("/posts", get(handlers::list_posts).post(handlers::create_post))
        .route(
            "/posts/{id}",
            get(handlers::get_post).delete(handlers::delete_post),
        )
        .route("/posts/{id}/vote", post(handlers::vote_post))
        .route("/posts/{id}/comments", post(handlers::create_comment))
        .route("/comments/{id}/vote", post(handlers::vote_comment))
        .route("/health", get(handlers::health))
        .layer(middleware::trace_layer())
        .layer(middleware::cors_policy())
        .with_state(state)
}
