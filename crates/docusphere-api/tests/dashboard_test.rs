//! Integration tests for the dashboard aggregates.

mod helpers;

use axum::http::StatusCode;

use helpers::{PASSWORD, TestApp};

#[tokio::test]
async fn test_dashboard_requires_auth() {
    let app = TestApp::new().await;
    for uri in [
        "/api/statistics",
        "/api/storage/chart",
        "/api/activity/chart",
        "/api/login-history/chart",
    ] {
        let response = app.request("GET", uri, None, None).await;
        assert_eq!(response.status, StatusCode::UNAUTHORIZED, "{uri}");
    }
}

#[tokio::test]
async fn test_statistics_reflect_uploads() {
    let app = TestApp::new().await;
    let awa = app.viewer("Awa").await;
    let file = app.upload(&awa, "report.pdf", None).await;
    app.mkdir(&awa, "Docs", None).await;

    let stats = app
        .request("GET", "/api/statistics", None, Some(&awa.token))
        .await;
    assert_eq!(stats.status, StatusCode::OK);
    let data = stats.data();
    assert_eq!(data["total_files"], 1);
    assert_eq!(data["total_folders"], 1);
    assert_eq!(data["total_storage"], file["size"]);
    assert_eq!(data["file_types"]["application/pdf"], 1);
    assert_eq!(data["user_storage"][awa.id.to_string()], file["size"]);
}

#[tokio::test]
async fn test_charts_cover_fixed_windows() {
    let app = TestApp::new().await;
    let awa = app.viewer("Awa").await;
    app.upload(&awa, "report.pdf", None).await;

    let storage = app
        .request("GET", "/api/storage/chart", None, Some(&awa.token))
        .await;
    let months = storage.data().as_array().unwrap();
    assert_eq!(months.len(), 12);

    let activity = app
        .request("GET", "/api/activity/chart", None, Some(&awa.token))
        .await;
    let days = activity.data().as_array().unwrap();
    assert_eq!(days.len(), 7);
    let uploads: i64 = days.iter().map(|d| d["uploads"].as_i64().unwrap()).sum();
    assert_eq!(uploads, 1);
}

#[tokio::test]
async fn test_login_chart_success_rate() {
    let app = TestApp::new().await;
    let awa = app.viewer("Awa").await;

    let failed = app.login("awa@example.com", "wrong-password").await;
    assert_eq!(failed.status, StatusCode::UNAUTHORIZED);
    let ok = app.login("awa@example.com", PASSWORD).await;
    assert_eq!(ok.status, StatusCode::OK);
    let failed = app.login("nobody@example.com", PASSWORD).await;
    assert_eq!(failed.status, StatusCode::UNAUTHORIZED);

    let chart = app
        .request("GET", "/api/login-history/chart", None, Some(&awa.token))
        .await;
    assert_eq!(chart.status, StatusCode::OK);
    let data = chart.data();
    assert_eq!(data["success_rate"], 50.0);
    assert_eq!(data["login_attempts"].as_array().unwrap().len(), 7);
    let today = data["login_attempts"].as_array().unwrap().last().unwrap();
    assert_eq!(today["total"], 4);
    assert_eq!(today["failed"], 2);
}
