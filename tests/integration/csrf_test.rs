//! Integration tests for anti-forgery protection.

use axum::http::StatusCode;
use serde_json::json;

use sitecrew_core::traits::Repository;

use crate::helpers::TestApp;

fn worker_body() -> serde_json::Value {
    json!({ "name": "Ivanov", "position": "Fitter" })
}

#[tokio::test]
async fn test_missing_token_rejected_before_mutation() {
    let app = TestApp::new().await;
    let (_, admin) = app.admin_session().await;

    let response = app
        .send(
            "POST",
            "/api/workers",
            Some(worker_body()),
            &[("cookie", admin.cookie.as_str())],
        )
        .await;
    assert_eq!(response.status, StatusCode::FORBIDDEN);
    assert_eq!(response.body["error"], "CSRF");
    assert_eq!(app.state.stores.workers.count().await, 0);

    let events = app
        .state
        .stores
        .security_log
        .read_recent(1)
        .await
        .expect("events");
    assert_eq!(events[0].event, "csrf_failed");
}

#[tokio::test]
async fn test_wrong_token_rejected() {
    let app = TestApp::new().await;
    let (_, admin) = app.admin_session().await;

    let response = app
        .send(
            "DELETE",
            "/api/workers/anything",
            None,
            &[("cookie", admin.cookie.as_str()), ("x-csrf-token", "forged")],
        )
        .await;
    assert_eq!(response.status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_header_token_accepted() {
    let app = TestApp::new().await;
    let (_, admin) = app.admin_session().await;

    let response = app
        .request("POST", "/api/workers", Some(worker_body()), &admin)
        .await;
    assert_eq!(response.status, StatusCode::CREATED);
    assert_eq!(app.state.stores.workers.count().await, 1);
}

#[tokio::test]
async fn test_body_field_token_accepted() {
    let app = TestApp::new().await;
    let (_, admin) = app.admin_session().await;

    let mut body = worker_body();
    body["_csrf_token"] = json!(admin.csrf_token);
    let response = app
        .send(
            "POST",
            "/api/workers",
            Some(body),
            &[("cookie", admin.cookie.as_str())],
        )
        .await;
    assert_eq!(response.status, StatusCode::CREATED);
}

#[tokio::test]
async fn test_reads_and_login_need_no_token() {
    let app = TestApp::new().await;
    let (_, admin) = app.admin_session().await;

    let list = app
        .send("GET", "/api/workers", None, &[("cookie", admin.cookie.as_str())])
        .await;
    assert_eq!(list.status, StatusCode::OK);

    let relogin = app
        .send(
            "POST",
            "/api/auth/login",
            Some(json!({ "username": "boss", "password": "boss-pw" })),
            &[("cookie", admin.cookie.as_str())],
        )
        .await;
    assert_eq!(relogin.status, StatusCode::OK);
}

#[tokio::test]
async fn test_token_of_another_session_rejected() {
    let app = TestApp::new().await;
    let (_, admin) = app.admin_session().await;
    let other = app.login("boss", "boss-pw").await;
    assert_ne!(admin.csrf_token, other.csrf_token);

    let response = app
        .send(
            "POST",
            "/api/workers",
            Some(worker_body()),
            &[
                ("cookie", admin.cookie.as_str()),
                ("x-csrf-token", other.csrf_token.as_str()),
            ],
        )
        .await;
    assert_eq!(response.status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_form_post_with_token_field_creates_worker() {
    let app = TestApp::new().await;
    let (_, admin) = app.admin_session().await;

    let form = format!(
        "name=Ivanov+Ivan&position=Fitter&hourlyRate=350&_csrf_token={}",
        admin.csrf_token
    );
    let response = app
        .send_raw(
            "POST",
            "/api/workers",
            "application/x-www-form-urlencoded",
            form,
            &[("cookie", admin.cookie.as_str())],
        )
        .await;
    assert_eq!(response.status, StatusCode::CREATED, "{}", response.body);
    assert_eq!(response.body["data"]["name"], "Ivanov Ivan");
    assert_eq!(response.body["data"]["hourlyRate"], 350.0);
}

#[tokio::test]
async fn test_form_post_without_token_field_rejected() {
    let app = TestApp::new().await;
    let (_, admin) = app.admin_session().await;

    let response = app
        .send_raw(
            "POST",
            "/api/workers",
            "application/x-www-form-urlencoded",
            "name=Ivanov&position=Fitter".to_string(),
            &[("cookie", admin.cookie.as_str())],
        )
        .await;
    assert_eq!(response.status, StatusCode::FORBIDDEN);
    assert_eq!(app.state.stores.workers.count().await, 0);
}

#[tokio::test]
async fn test_form_login_needs_no_token() {
    let app = TestApp::new().await;
    app.create_user("ivan", "pw", sitecrew_entity::UserRole::User).await;

    let response = app
        .send_raw(
            "POST",
            "/api/auth/login",
            "application/x-www-form-urlencoded",
            "username=ivan&password=pw".to_string(),
            &[],
        )
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert!(response.set_cookie().is_some());
}
