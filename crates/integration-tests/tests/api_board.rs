//! End-to-end post flows over the HTTP surface.

use axum::http::StatusCode;
use integration_tests::http::{app, request, send};
use integration_tests::{student, test_board};
use serde_json::json;

#[tokio::test]
async fn create_list_get_delete_flow() {
    let fixture = test_board();
    let router = app(&fixture);
    let ada = student("Ada", "umich.edu");

    let created = send(
        &router,
        request(
            &fixture,
            &ada,
            "POST",
            "/posts",
            Some(json!({ "title": "Garage sale Saturday", "flair": "Events" })),
        ),
        StatusCode::CREATED,
    )
    .await;
    let post_id = created["id"].as_str().unwrap().to_string();

    let listed = send(
        &router,
        request(&fixture, &ada, "GET", "/posts?sort=new", None),
        StatusCode::OK,
    )
    .await;
    assert_eq!(listed.as_array().unwrap().len(), 1);
    assert_eq!(listed[0]["title"], "Garage sale Saturday");
    assert_eq!(listed[0]["userVote"], 0);

    let detail = send(
        &router,
        request(&fixture, &ada, "GET", &format!("/posts/{post_id}"), None),
        StatusCode::OK,
    )
    .await;
    assert_eq!(detail["id"], created["id"]);
    assert_eq!(detail["comments"], json!([]));

    let deleted = send(
        &router,
        request(&fixture, &ada, "DELETE", &format!("/posts/{post_id}"), None),
        StatusCode::OK,
    )
    .await;
    assert_eq!(deleted, json!({ "success": true }));

    send(
        &router,
        request(&fixture, &ada, "GET", &format!("/posts/{post_id}"), None),
        StatusCode::NOT_FOUND,
    )
    .await;
}

#[tokio::test]
async fn listings_are_invisible_across_campuses() {
    let fixture = test_board();
    let router = app(&fixture);
    let ada = student("Ada", "umich.edu");
    let eve = student("Eve", "osu.edu");

    let created = send(
        &router,
        request(
            &fixture,
            &ada,
            "POST",
            "/posts",
            Some(json!({ "title": "Michigan only" })),
        ),
        StatusCode::CREATED,
    )
    .await;
    let post_id = created["id"].as_str().unwrap();

    // The list endpoint returns nothing rather than an error.
    let listed = send(
        &router,
        request(&fixture, &eve, "GET", "/posts?sort=new", None),
        StatusCode::OK,
    )
    .await;
    assert_eq!(listed, json!([]));

    // Detail lookups across the boundary are hidden as 404.
    send(
        &router,
        request(&fixture, &eve, "GET", &format!("/posts/{post_id}"), None),
        StatusCode::NOT_FOUND,
    )
    .await;
}

#[tokio::test]
async fn default_listing_uses_hot_order() {
    let fixture = test_board();
    let router = app(&fixture);
    let ada = student("Ada", "umich.edu");

    for title in ["first", "second"] {
        send(
            &router,
            request(&fixture, &ada, "POST", "/posts", Some(json!({ "title": title }))),
            StatusCode::CREATED,
        )
        .await;
    }

    let listed = send(
        &router,
        request(&fixture, &ada, "GET", "/posts", None),
        StatusCode::OK,
    )
    .await;
    assert_eq!(listed.as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn oversized_body_is_rejected_with_400() {
    let fixture = test_board();
    let router = app(&fixture);
    let ada = student("Ada", "umich.edu");

    let body = send(
        &router,
        request(
            &fixture,
            &ada,
            "POST",
            "/posts",
            Some(json!({ "title": "ok", "body": "x".repeat(5001) })),
        ),
        StatusCode::BAD_REQUEST,
    )
    .await;
    assert!(body["error"].as_str().unwrap().contains("body"));
}
