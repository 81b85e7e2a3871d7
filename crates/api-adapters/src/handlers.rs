//! # Board API Handlers
//!
//! JSON handlers mapping the HTTP surface onto `BoardService`. Validation
//! of shapes happens here (query/body deserialization); domain bounds and
//! scoping are enforced by the service before any store mutation.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use domains::{Comment, Post, VoteTarget};
use serde::Deserialize;
use serde_json::json;
use services::{CommentSort, NewComment, NewPost, PostSort};
use uuid::Uuid;

use crate::error::ApiError;
use crate::extract::Viewer;
use crate::state::ApiState;

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    sort: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct DetailQuery {
    /// Comment ordering: `best` (default) or `new`.
    comments: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct CreatePostBody {
    title: String,
    body: Option<String>,
    flair: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct CreateCommentBody {
    body: String,
    #[serde(default, alias = "parentId")]
    parent_id: Option<Uuid>,
}

#[derive(Debug, Deserialize)]
pub struct VoteBody {
    vote: i16,
}

/// `GET /posts?sort={new|best|hot}`
pub async fn list_posts(
    State(state): State<ApiState>,
    Viewer(user): Viewer,
    Query(query): Query<ListQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let sort = match query.sort.as_deref() {
        Some(s) => PostSort::parse(s)?,
        None => PostSort::default(),
    };
    let posts = state.board.list_posts(&user, sort).await?;
    Ok(Json(posts))
}

/// `POST /posts`
pub async fn create_post(
    State(state): State<ApiState>,
    Viewer(user): Viewer,
    Json(body): Json<CreatePostBody>,
) -> Result<(StatusCode, Json<Post>), ApiError> {
    let post = state
        .board
        .create_post(
            &user,
            NewPost {
                title: body.title,
                body_text: body.body,
                flair: body.flair,
            },
        )
        .await?;
    Ok((StatusCode::CREATED, Json(post)))
}

/// `GET /posts/{id}` — the post plus its annotated comment forest.
pub async fn get_post(
    State(state): State<ApiState>,
    Viewer(user): Viewer,
    Path(post_id): Path<Uuid>,
    Query(query): Query<DetailQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let sort = match query.comments.as_deref() {
        Some(s) => CommentSort::parse(s)?,
        None => CommentSort::default(),
    };
    let detail = state.board.get_post(&user, post_id, sort).await?;
    Ok(Json(detail))
}

/// `DELETE /posts/{id}` — author only.
pub async fn delete_post(
    State(state): State<ApiState>,
    Viewer(user): Viewer,
    Path(post_id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    state.board.delete_post(&user, post_id).await?;
    Ok(Json(json!({ "success": true })))
}

/// `POST /posts/{id}/vote`
pub async fn vote_post(
    State(state): State<ApiState>,
    Viewer(user): Viewer,
    Path(post_id): Path<Uuid>,
    Json(body): Json<VoteBody>,
) -> Result<impl IntoResponse, ApiError> {
    let receipt = state
        .board
        .vote(&user, VoteTarget::post(post_id), body.vote)
        .await?;
    Ok(Json(receipt))
}

/// `POST /posts/{id}/comments`
pub async fn create_comment(
    State(state): State<ApiState>,
    Viewer(user): Viewer,
    Path(post_id): Path<Uuid>,
    Json(body): Json<CreateCommentBody>,
) -> Result<(StatusCode, Json<Comment>), ApiError> {
    let comment = state
        .board
        .create_comment(
            &user,
            post_id,
            NewComment {
                body_text: body.body,
                parent_id: body.parent_id,
            },
        )
        .await?;
    Ok((StatusCode::CREATED, Json(comment)))
}

/// `POST /comments/{id}/vote`
pub async fn vote_comment(
    State(state): State<ApiState>,
    Viewer(user): Viewer,
    Path(comment_id): Path<Uuid>,
    Json(body): Json<VoteBody>,
) -> Result<impl IntoResponse, ApiError> {
    let receipt = state
        .board
        .vote(&user, VoteTarget::comment(comment_id), body.vote)
        .await?;
    Ok(Json(receipt))
}

/// `GET /health` — unauthenticated liveness probe.
pub async fn health() -> impl IntoResponse {
    Json(json!({ "status": "ok" }))
}
