//! Integration tests for the community feed.

mod helpers;

use axum::http::StatusCode;
use serde_json::json;

use helpers::{TestApp, id_of};

#[tokio::test]
async fn test_feed_is_public_but_writes_need_auth() {
    let app = TestApp::new().await;

    let feed = app.request("GET", "/api/posts", None, None).await;
    assert_eq!(feed.status, StatusCode::OK);
    assert_eq!(feed.data(), &json!([]));

    let authors = app.request("GET", "/api/posts/top-authors", None, None).await;
    assert_eq!(authors.status, StatusCode::OK);

    let anonymous = app
        .request(
            "POST",
            "/api/posts",
            Some(json!({ "title": "Hi", "content": "Hello" })),
            None,
        )
        .await;
    assert_eq!(anonymous.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_like_comment_and_rank() {
    let app = TestApp::new().await;
    let awa = app.viewer("Awa").await;
    let binta = app.viewer("Binta").await;

    let created = app
        .request(
            "POST",
            "/api/posts",
            Some(json!({ "title": "Quarterly report", "content": "Now online", "tags": ["q1"] })),
            Some(&awa.token),
        )
        .await;
    assert_eq!(created.status, StatusCode::CREATED);
    let post = created.data().clone();
    assert_eq!(post["author_name"], "Awa");
    let uri = format!("/api/posts/{}", id_of(&post));

    let liked = app
        .request("PUT", &format!("{uri}/like"), None, Some(&binta.token))
        .await;
    assert_eq!(liked.data()["likes"], json!([binta.id]));
    let unliked = app
        .request("PUT", &format!("{uri}/like"), None, Some(&binta.token))
        .await;
    assert_eq!(unliked.data()["likes"], json!([]));
    app.request("PUT", &format!("{uri}/like"), None, Some(&binta.token))
        .await;

    let comment = app
        .request(
            "POST",
            &format!("{uri}/comments"),
            Some(json!({ "content": "Thanks!" })),
            Some(&binta.token),
        )
        .await;
    assert_eq!(comment.status, StatusCode::CREATED);
    assert_eq!(comment.data()["content"], "Thanks!");

    let fetched = app.request("GET", &uri, None, None).await;
    assert_eq!(fetched.data()["comments"].as_array().unwrap().len(), 1);

    let authors = app.request("GET", "/api/posts/top-authors", None, None).await;
    let ranked = authors.data().as_array().unwrap();
    assert_eq!(ranked.len(), 1);
    assert_eq!(ranked[0]["name"], "Awa");
    assert_eq!(ranked[0]["total_likes"], 1);
    assert_eq!(ranked[0]["total_comments"], 1);
}

#[tokio::test]
async fn test_only_author_edits_and_admin_deletes() {
    let app = TestApp::new().await;
    let awa = app.viewer("Awa").await;
    let binta = app.viewer("Binta").await;
    let root = app.admin("Root").await;

    let post = app
        .request(
            "POST",
            "/api/posts",
            Some(json!({ "title": "Draft", "content": "..." })),
            Some(&awa.token),
        )
        .await
        .data()
        .clone();
    let uri = format!("/api/posts/{}", id_of(&post));

    let foreign_edit = app
        .request("PUT", &uri, Some(json!({ "title": "Mine" })), Some(&binta.token))
        .await;
    assert_eq!(foreign_edit.status, StatusCode::FORBIDDEN);

    let edit = app
        .request("PUT", &uri, Some(json!({ "title": "Final" })), Some(&awa.token))
        .await;
    assert_eq!(edit.data()["title"], "Final");

    let foreign_delete = app.request("DELETE", &uri, None, Some(&binta.token)).await;
    assert_eq!(foreign_delete.status, StatusCode::FORBIDDEN);

    let admin_delete = app.request("DELETE", &uri, None, Some(&root.token)).await;
    assert_eq!(admin_delete.status, StatusCode::OK);

    let gone = app.request("GET", &uri, None, None).await;
    assert_eq!(gone.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_missing_content_is_rejected() {
    let app = TestApp::new().await;
    let awa = app.viewer("Awa").await;

    let response = app
        .request("POST", "/api/posts", Some(json!({ "title": "Hi" })), Some(&awa.token))
        .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.body["details"]["content"], "content is required");
}

#[tokio::test]
async fn test_attachment_upload() {
    let app = TestApp::new().await;
    let awa = app.viewer("Awa").await;

    let uploaded = app
        .multipart(
            "/api/posts/upload",
            &awa.token,
            Some(("photo.png", "image/png", b"\x89PNG\r\n\x1a\n")),
            &[],
        )
        .await;
    assert_eq!(uploaded.status, StatusCode::CREATED, "{:?}", uploaded.body);
    assert_eq!(uploaded.data()["name"], "photo.png");
    assert_eq!(uploaded.data()["mime_type"], "image/png");

    let rejected = app
        .multipart(
            "/api/posts/upload",
            &awa.token,
            Some(("tool.exe", "application/x-msdownload", b"MZ")),
            &[],
        )
        .await;
    assert_eq!(rejected.status, StatusCode::BAD_REQUEST);
}
