//! Integration tests for admin user management.

use axum::http::StatusCode;
use serde_json::json;

use sitecrew_core::types::id::UserId;

use crate::helpers::TestApp;

#[tokio::test]
async fn test_create_regular_user_creates_worker() {
    let app = TestApp::new().await;
    let (_, admin) = app.admin_session().await;

    let created = app
        .request(
            "POST",
            "/api/users",
            Some(json!({ "username": "ivan", "password": "s3cret", "name": "Ivan Petrov" })),
            &admin,
        )
        .await;
    assert_eq!(created.status, StatusCode::CREATED);
    assert_eq!(created.body["data"]["role"], "user");
    assert!(created.body["data"].get("password").is_none());

    let user_id = UserId::from(created.body["data"]["id"].as_str().expect("id"));
    let worker = app
        .state
        .stores
        .workers
        .find_by_user_id(&user_id)
        .await
        .expect("linked worker");
    assert_eq!(worker.position, "Employee");
    assert_eq!(worker.name, "Ivan Petrov");

    app.login("ivan", "s3cret").await;
}

#[tokio::test]
async fn test_duplicate_username_conflicts() {
    let app = TestApp::new().await;
    let (_, admin) = app.admin_session().await;
    let response = app
        .request(
            "POST",
            "/api/users",
            Some(json!({ "username": "BOSS", "password": "x", "name": "Impostor", "role": "admin" })),
            &admin,
        )
        .await;
    assert_eq!(response.status, StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_delete_user_revokes_sessions_and_unlinks_worker() {
    let app = TestApp::new().await;
    let (_, admin) = app.admin_session().await;
    let created = app
        .request(
            "POST",
            "/api/users",
            Some(json!({ "username": "ivan", "password": "s3cret", "name": "Ivan" })),
            &admin,
        )
        .await;
    let user_id = created.body["data"]["id"].as_str().expect("id").to_string();
    let user_session = app.login("ivan", "s3cret").await;

    let deleted = app
        .request("DELETE", &format!("/api/users/{user_id}"), None, &admin)
        .await;
    assert_eq!(deleted.status, StatusCode::OK);

    let me = app.request("GET", "/api/auth/me", None, &user_session).await;
    assert_eq!(me.status, StatusCode::UNAUTHORIZED);

    let workers = app.request("GET", "/api/workers", None, &admin).await;
    let workers = workers.body["data"].as_array().expect("workers").clone();
    assert_eq!(workers.len(), 1);
    assert!(workers[0].get("userId").is_none());
}

#[tokio::test]
async fn test_admin_cannot_delete_self() {
    let app = TestApp::new().await;
    let (admin_user, admin) = app.admin_session().await;
    let response = app
        .request(
            "DELETE",
            &format!("/api/users/{}", admin_user.id),
            None,
            &admin,
        )
        .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_update_keeps_password_when_blank() {
    let app = TestApp::new().await;
    let (_, admin) = app.admin_session().await;
    let created = app
        .request(
            "POST",
            "/api/users",
            Some(json!({ "username": "ivan", "password": "s3cret", "name": "Ivan" })),
            &admin,
        )
        .await;
    let user_id = created.body["data"]["id"].as_str().expect("id").to_string();

    let updated = app
        .request(
            "PUT",
            &format!("/api/users/{user_id}"),
            Some(json!({ "username": "ivan", "password": "", "name": "Ivan P.", "phone": "+7 900" })),
            &admin,
        )
        .await;
    assert_eq!(updated.status, StatusCode::OK);
    assert_eq!(updated.body["data"]["name"], "Ivan P.");

    app.login("ivan", "s3cret").await;
}

#[tokio::test]
async fn test_link_worker_to_user() {
    let app = TestApp::new().await;
    let (admin_user, admin) = app.admin_session().await;
    let worker = app
        .request(
            "POST",
            "/api/workers",
            Some(json!({ "name": "Sidorov", "position": "Crane operator" })),
            &admin,
        )
        .await;
    let worker_id = worker.body["data"]["id"].as_str().expect("id").to_string();

    let linked = app
        .request(
            "PUT",
            &format!("/api/workers/{worker_id}/user"),
            Some(json!({ "userId": admin_user.id.as_str() })),
            &admin,
        )
        .await;
    assert_eq!(linked.status, StatusCode::OK);
    assert_eq!(linked.body["data"]["userId"], admin_user.id.as_str());
}
