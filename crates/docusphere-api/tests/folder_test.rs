//! Integration tests for the folder hierarchy.

mod helpers;

use axum::http::StatusCode;
use serde_json::json;

use helpers::{TestApp, id_of};

#[tokio::test]
async fn test_create_builds_paths() {
    let app = TestApp::new().await;
    let awa = app.viewer("Awa").await;

    let docs = app.mkdir(&awa, "Docs", None).await;
    let year = app.mkdir(&awa, "2024", Some(&id_of(&docs))).await;
    assert_eq!(docs["path"], "/Docs");
    assert_eq!(year["path"], "/Docs/2024");
    assert_eq!(year["is_public"], false);

    let blank = app
        .request(
            "POST",
            "/api/folders",
            Some(json!({ "name": "   " })),
            Some(&awa.token),
        )
        .await;
    assert_eq!(blank.status, StatusCode::BAD_REQUEST);

    let owned = app.request("GET", "/api/folders", None, Some(&awa.token)).await;
    assert_eq!(owned.data().as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn test_root_contents_only_show_visible_entries() {
    let app = TestApp::new().await;
    let awa = app.viewer("Awa").await;
    let binta = app.viewer("Binta").await;
    app.mkdir(&awa, "Private", None).await;
    let shared = app.mkdir(&awa, "Shared", None).await;

    let visibility = app
        .request(
            "PUT",
            &format!("/api/folders/{}", id_of(&shared)),
            Some(json!({ "is_public": true })),
            Some(&awa.token),
        )
        .await;
    assert_eq!(visibility.status, StatusCode::OK);

    let contents = app
        .request("GET", "/api/folders/contents", None, Some(&binta.token))
        .await;
    assert_eq!(contents.status, StatusCode::OK);
    let folders = contents.data()["folders"].as_array().unwrap();
    assert_eq!(folders.len(), 1);
    assert_eq!(folders[0]["name"], "Shared");
    assert!(contents.data()["folder"].is_null());
}

#[tokio::test]
async fn test_rename_rewrites_descendant_paths() {
    let app = TestApp::new().await;
    let awa = app.viewer("Awa").await;
    let docs = app.mkdir(&awa, "Docs", None).await;
    let year = app.mkdir(&awa, "2024", Some(&id_of(&docs))).await;
    let quarter = app.mkdir(&awa, "Q1", Some(&id_of(&year))).await;

    let renamed = app
        .request(
            "PUT",
            &format!("/api/folders/{}/rename", id_of(&docs)),
            Some(json!({ "name": "Archive" })),
            Some(&awa.token),
        )
        .await;
    assert_eq!(renamed.status, StatusCode::OK);
    assert_eq!(renamed.data()["path"], "/Archive");

    let contents = app
        .request(
            "GET",
            &format!("/api/folders/{}/contents", id_of(&quarter)),
            None,
            Some(&awa.token),
        )
        .await;
    assert_eq!(contents.data()["folder"]["path"], "/Archive/2024/Q1");
}

#[tokio::test]
async fn test_move_into_descendant_fails() {
    let app = TestApp::new().await;
    let awa = app.viewer("Awa").await;
    let docs = app.mkdir(&awa, "Docs", None).await;
    let year = app.mkdir(&awa, "2024", Some(&id_of(&docs))).await;

    let response = app
        .request(
            "PUT",
            &format!("/api/folders/{}/move", id_of(&docs)),
            Some(json!({ "target_folder_id": year["id"] })),
            Some(&awa.token),
        )
        .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.body["code"], "VALIDATION");

    let onto_itself = app
        .request(
            "PUT",
            &format!("/api/folders/{}/move", id_of(&docs)),
            Some(json!({ "target_folder_id": docs["id"] })),
            Some(&awa.token),
        )
        .await;
    assert_eq!(onto_itself.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_move_to_root_rewrites_paths() {
    let app = TestApp::new().await;
    let awa = app.viewer("Awa").await;
    let docs = app.mkdir(&awa, "Docs", None).await;
    let year = app.mkdir(&awa, "2024", Some(&id_of(&docs))).await;
    let quarter = app.mkdir(&awa, "Q1", Some(&id_of(&year))).await;

    let moved = app
        .request(
            "PUT",
            &format!("/api/folders/{}/move", id_of(&year)),
            Some(json!({ "target_folder_id": null })),
            Some(&awa.token),
        )
        .await;
    assert_eq!(moved.status, StatusCode::OK);
    assert_eq!(moved.data()["path"], "/2024");
    assert!(moved.data()["parent_id"].is_null());

    let contents = app
        .request(
            "GET",
            &format!("/api/folders/{}/contents", id_of(&quarter)),
            None,
            Some(&awa.token),
        )
        .await;
    assert_eq!(contents.data()["folder"]["path"], "/2024/Q1");
}

#[tokio::test]
async fn test_delete_reparents_children() {
    let app = TestApp::new().await;
    let awa = app.viewer("Awa").await;
    let docs = app.mkdir(&awa, "Docs", None).await;
    let year = app.mkdir(&awa, "2024", Some(&id_of(&docs))).await;
    let file = app.upload(&awa, "report.pdf", Some(&id_of(&docs))).await;

    let deleted = app
        .request(
            "DELETE",
            &format!("/api/folders/{}", id_of(&docs)),
            None,
            Some(&awa.token),
        )
        .await;
    assert_eq!(deleted.status, StatusCode::OK);

    let child = app
        .request(
            "GET",
            &format!("/api/folders/{}/contents", id_of(&year)),
            None,
            Some(&awa.token),
        )
        .await;
    assert_eq!(child.status, StatusCode::OK);
    assert!(child.data()["folder"]["parent_id"].is_null());
    assert_eq!(child.data()["folder"]["path"], "/2024");

    let file = app
        .request(
            "GET",
            &format!("/api/files/{}", id_of(&file)),
            None,
            Some(&awa.token),
        )
        .await;
    assert_eq!(file.status, StatusCode::OK);
    assert!(file.data()["parent_id"].is_null());

    let gone = app
        .request(
            "GET",
            &format!("/api/folders/{}/contents", id_of(&docs)),
            None,
            Some(&awa.token),
        )
        .await;
    assert_eq!(gone.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_folder_actions_are_recorded() {
    let app = TestApp::new().await;
    let awa = app.viewer("Awa").await;
    app.mkdir(&awa, "Docs", None).await;
    app.upload(&awa, "report.pdf", None).await;

    let all = app
        .request("GET", "/api/history?limit=10", None, Some(&awa.token))
        .await;
    assert_eq!(all.status, StatusCode::OK);
    assert_eq!(all.data()["total_items"], 2);
    assert_eq!(all.data()["page_size"], 10);

    let created = app
        .request(
            "GET",
            "/api/history?type=create_folder&target=folder",
            None,
            Some(&awa.token),
        )
        .await;
    let items = created.data()["items"].as_array().unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0]["action_type"], "create_folder");
}

#[tokio::test]
async fn test_clients_can_append_history() {
    let app = TestApp::new().await;
    let awa = app.viewer("Awa").await;
    let docs = app.mkdir(&awa, "Docs", None).await;

    let entry = app
        .request(
            "POST",
            "/api/history",
            Some(json!({
                "action_type": "archive",
                "target_type": "folder",
                "target_id": docs["id"],
                "details": "Archived \"Docs\"",
            })),
            Some(&awa.token),
        )
        .await;
    assert_eq!(entry.status, StatusCode::CREATED);
    assert_eq!(entry.data()["action_type"], "archive");

    let unknown = app
        .request(
            "POST",
            "/api/history",
            Some(json!({
                "action_type": "teleport",
                "target_type": "folder",
                "target_id": docs["id"],
                "details": "?",
            })),
            Some(&awa.token),
        )
        .await;
    assert_eq!(unknown.status, StatusCode::BAD_REQUEST);
}
