//! Vote endpoints over HTTP: receipts, idempotence, reversal, and the
//! documented failure codes.

use axum::http::StatusCode;
use integration_tests::http::{app, request, send};
use integration_tests::{student, test_board};
use serde_json::{json, Value};

async fn seeded_post(
    fixture: &integration_tests::TestBoard,
    router: &axum::Router,
    author: &domains::AuthenticatedUser,
) -> String {
    let created = send(
        router,
        request(
            fixture,
            author,
            "POST",
            "/posts",
            Some(json!({ "title": "Vote here" })),
        ),
        StatusCode::CREATED,
    )
    .await;
    created["id"].as_str().unwrap().to_string()
}

async fn cast(
    fixture: &integration_tests::TestBoard,
    router: &axum::Router,
    user: &domains::AuthenticatedUser,
    uri: &str,
    vote: i64,
) -> Value {
    send(
        router,
        request(fixture, user, "POST", uri, Some(json!({ "vote": vote }))),
        StatusCode::OK,
    )
    .await
}

#[tokio::test]
async fn post_vote_lifecycle_over_http() {
    let fixture = test_board();
    let router = app(&fixture);
    let ada = student("Ada", "umich.edu");
    let grace = student("Grace", "umich.edu");
    let post_id = seeded_post(&fixture, &router, &ada).await;
    let uri = format!("/posts/{post_id}/vote");

    let up = cast(&fixture, &router, &grace, &uri, 1).await;
    assert_eq!(up, json!({ "upvotes": 1, "downvotes": 0, "userVote": 1 }));

    // Idempotent repeat.
    let repeat = cast(&fixture, &router, &grace, &uri, 1).await;
    assert_eq!(repeat, up);

    // Reversal moves the count across.
    let flip = cast(&fixture, &router, &grace, &uri, -1).await;
    assert_eq!(flip, json!({ "upvotes": 0, "downvotes": 1, "userVote": -1 }));

    // Clearing empties the ledger row.
    let clear = cast(&fixture, &router, &grace, &uri, 0).await;
    assert_eq!(clear, json!({ "upvotes": 0, "downvotes": 0, "userVote": 0 }));
}

#[tokio::test]
async fn listing_reflects_votes_after_the_fact() {
    let fixture = test_board();
    let router = app(&fixture);
    let ada = student("Ada", "umich.edu");
    let post_id = seeded_post(&fixture, &router, &ada).await;

    cast(&fixture, &router, &ada, &format!("/posts/{post_id}/vote"), 1).await;

    let listed = send(
        &router,
        request(&fixture, &ada, "GET", "/posts?sort=best", None),
        StatusCode::OK,
    )
    .await;
    assert_eq!(listed[0]["upvoteCount"], 1);
    assert_eq!(listed[0]["userVote"], 1);
}

#[tokio::test]
async fn comment_vote_endpoint_mirrors_post_votes() {
    let fixture = test_board();
    let router = app(&fixture);
    let ada = student("Ada", "umich.edu");
    let post_id = seeded_post(&fixture, &router, &ada).await;

    let comment = send(
        &router,
        request(
            &fixture,
            &ada,
            "POST",
            &format!("/posts/{post_id}/comments"),
            Some(json!({ "body": "hot take" })),
        ),
        StatusCode::CREATED,
    )
    .await;
    let comment_id = comment["id"].as_str().unwrap();

    let receipt = cast(
        &fixture,
        &router,
        &ada,
        &format!("/comments/{comment_id}/vote"),
        -1,
    )
    .await;
    assert_eq!(receipt, json!({ "upvotes": 0, "downvotes": 1, "userVote": -1 }));
}

#[tokio::test]
async fn invalid_vote_values_are_400() {
    let fixture = test_board();
    let router = app(&fixture);
    let ada = student("Ada", "umich.edu");
    let post_id = seeded_post(&fixture, &router, &ada).await;

    for bad in [2, -2, 100] {
        send(
            &router,
            request(
                &fixture,
                &ada,
                "POST",
                &format!("/posts/{post_id}/vote"),
                Some(json!({ "vote": bad })),
            ),
            StatusCode::BAD_REQUEST,
        )
        .await;
    }
}

#[tokio::test]
async fn voting_on_missing_targets_is_404() {
    let fixture = test_board();
    let router = app(&fixture);
    let ada = student("Ada", "umich.edu");
    let ghost = uuid::Uuid::now_v7();

    send(
        &router,
        request(
            &fixture,
            &ada,
            "POST",
            &format!("/posts/{ghost}/vote"),
            Some(json!({ "vote": 1 })),
        ),
        StatusCode::NOT_FOUND,
    )
    .await;
    send(
        &router,
        request(
            &fixture,
            &ada,
            "POST",
            &format!("/comments/{ghost}/vote"),
            Some(json!({ "vote": 1 })),
        ),
        StatusCode::NOT_FOUND,
    )
    .await;
}
