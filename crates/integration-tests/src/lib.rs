//! Shared fixtures for the integration suite: an in-memory store wired into
//! the real `BoardService`, session minting, and (with `web-axum`) a full
//! router plus request helpers.

use std::sync::Arc;

use auth_adapters::JwtSessions;
use domains::AuthenticatedUser;
use secrecy::SecretString;
use services::BoardService;
use storage_adapters::MemoryStore;
use uuid::Uuid;

pub struct TestBoard {
    pub store: Arc<MemoryStore>,
    pub board: Arc<BoardService>,
    pub sessions: Arc<JwtSessions>,
}

pub fn test_board() -> TestBoard {
    let store = Arc::new(MemoryStore::new());
    let board = Arc::new(BoardService::new(store.clone(), store.clone()));
    let sessions = Arc::new(JwtSessions::new(&SecretString::from("integration-secret")));
    TestBoard {
        store,
        board,
        sessions,
    }
}

pub fn student(name: &str, campus: &str) -> AuthenticatedUser {
    AuthenticatedUser {
        id: Uuid::now_v7(),
        campus: campus.into(),
        display_name: name.into(),
    }
}

#[cfg(feature = "web-axum")]
pub mod http {
    //! Router-level helpers built on `tower::ServiceExt::oneshot`.

    use super::TestBoard;
    use api_adapters::{router, ApiState};
    use axum::body::{to_bytes, Body};
    use axum::http::{header, Request, Response, StatusCode};
    use axum::Router;
    use domains::AuthenticatedUser;
    use serde_json::Value;
    use tower::ServiceExt;

    pub fn app(fixture: &TestBoard) -> Router {
        router(ApiState::new(fixture.board.clone(), fixture.sessions.clone()))
    }

    pub fn request(
        fixture: &TestBoard,
        user: &AuthenticatedUser,
        method: &str,
        uri: &str,
        body: Option<Value>,
    ) -> Request<Body> {
        let token = fixture.sessions.issue(user).expect("token issue");
        let builder = Request::builder()
            .method(method)
            .uri(uri)
            .header(header::AUTHORIZATION, format!("Bearer {token}"));
        match body {
            Some(value) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(value.to_string()))
                .expect("request"),
            None => builder.body(Body::empty()).expect("request"),
        }
    }

    /// Sends one request through a fresh clone of the router and decodes the
    /// JSON body, asserting the expected status along the way.
    pub async fn send(
        app: &Router,
        req: Request<Body>,
        expected: StatusCode,
    ) -> Value {
        let response: Response<_> = app.clone().oneshot(req).await.expect("infallible");
        assert_eq!(response.status(), expected, "unexpected status");
        let bytes = to_bytes(response.into_body(), usize::MAX).await.expect("body");
        if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).expect("json body")
        }
    }
}
