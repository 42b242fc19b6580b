//! Integration tests for the login, session and logout flow.

use axum::http::StatusCode;
use serde_json::json;

use sitecrew_entity::UserRole;

use crate::helpers::TestApp;

#[tokio::test]
async fn test_login_sets_session_cookie() {
    let app = TestApp::new().await;
    app.create_user("ivan", "s3cret", UserRole::User).await;

    let response = app
        .send(
            "POST",
            "/api/auth/login",
            Some(json!({ "username": "IVAN", "password": "s3cret" })),
            &[],
        )
        .await;

    assert_eq!(response.status, StatusCode::OK);
    let cookie = response.set_cookie().expect("cookie");
    assert!(cookie.starts_with("session_token="));
    assert!(cookie.contains("HttpOnly"));
    assert!(cookie.contains("SameSite=Lax"));
    assert!(cookie.contains("Path=/"));
    assert!(!cookie.contains("Secure"));
    assert_eq!(response.body["data"]["user"]["username"], "ivan");
    assert!(response.body["data"]["user"].get("password").is_none());
    assert!(response.body["data"]["csrfToken"].as_str().is_some());
}

#[tokio::test]
async fn test_invalid_credentials_redirect() {
    let app = TestApp::new().await;
    app.create_user("ivan", "s3cret", UserRole::User).await;

    for username in ["ivan", "nobody"] {
        let response = app
            .send(
                "POST",
                "/api/auth/login",
                Some(json!({ "username": username, "password": "wrong" })),
                &[],
            )
            .await;
        assert_eq!(response.status, StatusCode::UNAUTHORIZED);
        assert_eq!(response.body["error"], "INVALID_CREDENTIALS");
        assert_eq!(
            response.body["details"]["redirect"],
            "/login?error=invalid_credentials"
        );
        assert!(response.set_cookie().is_none());
    }
}

#[tokio::test]
async fn test_lockout_after_five_failures() {
    let app = TestApp::new().await;
    app.create_user("ivan", "s3cret", UserRole::User).await;
    let from = [("x-forwarded-for", "203.0.113.9")];

    for _ in 0..4 {
        let response = app
            .send(
                "POST",
                "/api/auth/login",
                Some(json!({ "username": "ivan", "password": "bad" })),
                &from,
            )
            .await;
        assert_eq!(response.status, StatusCode::UNAUTHORIZED);
    }
    let fifth = app
        .send(
            "POST",
            "/api/auth/login",
            Some(json!({ "username": "ivan", "password": "bad" })),
            &from,
        )
        .await;
    assert_eq!(fifth.status, StatusCode::TOO_MANY_REQUESTS);
    assert!(fifth.body["details"]["locked_until"].is_string());

    let correct = app
        .send(
            "POST",
            "/api/auth/login",
            Some(json!({ "username": "ivan", "password": "s3cret" })),
            &from,
        )
        .await;
    assert_eq!(correct.status, StatusCode::TOO_MANY_REQUESTS);

    let elsewhere = app
        .send(
            "POST",
            "/api/auth/login",
            Some(json!({ "username": "ivan", "password": "s3cret" })),
            &[("x-forwarded-for", "198.51.100.1")],
        )
        .await;
    assert_eq!(elsewhere.status, StatusCode::OK);
}

#[tokio::test]
async fn test_me_requires_session() {
    let app = TestApp::new().await;
    let response = app.send("GET", "/api/auth/me", None, &[]).await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
    assert_eq!(response.body["details"]["redirect"], "/login");

    let bogus = app
        .send("GET", "/api/auth/me", None, &[("cookie", "session_token=forged")])
        .await;
    assert_eq!(bogus.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_me_and_logout() {
    let app = TestApp::new().await;
    app.create_user("ivan", "s3cret", UserRole::User).await;
    let session = app.login("ivan", "s3cret").await;

    let me = app.request("GET", "/api/auth/me", None, &session).await;
    assert_eq!(me.status, StatusCode::OK);
    assert_eq!(me.body["data"]["user"]["name"], "ivan name");
    assert_eq!(me.body["data"]["csrfToken"], session.csrf_token.as_str());

    let logout = app.request("POST", "/api/auth/logout", None, &session).await;
    assert_eq!(logout.status, StatusCode::OK);
    let cleared = logout.set_cookie().expect("cookie");
    assert!(cleared.starts_with("session_token=;"));
    assert!(cleared.contains("Max-Age=0"));

    let after = app.request("GET", "/api/auth/me", None, &session).await;
    assert_eq!(after.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_security_endpoints_report_logins() {
    let app = TestApp::new().await;
    let (_, admin) = app.admin_session().await;
    app.send(
        "POST",
        "/api/auth/login",
        Some(json!({ "username": "boss", "password": "nope" })),
        &[],
    )
    .await;

    let stats = app.request("GET", "/api/security/stats", None, &admin).await;
    assert_eq!(stats.status, StatusCode::OK);
    assert_eq!(stats.body["data"]["active_sessions"], 1);
    assert_eq!(stats.body["data"]["locked_attempts"], 0);

    let events = app
        .request("GET", "/api/security/events?limit=10", None, &admin)
        .await;
    assert_eq!(events.status, StatusCode::OK);
    let kinds: Vec<&str> = events.body["data"]
        .as_array()
        .expect("array")
        .iter()
        .filter_map(|e| e["event"].as_str())
        .collect();
    assert_eq!(kinds, vec!["login_failed", "login_success"]);
}

#[tokio::test]
async fn test_security_endpoints_are_admin_only() {
    let app = TestApp::new().await;
    app.create_user("ivan", "s3cret", UserRole::User).await;
    let session = app.login("ivan", "s3cret").await;
    let response = app.request("GET", "/api/security/stats", None, &session).await;
    assert_eq!(response.status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_profile_update_changes_login_but_not_role() {
    let app = TestApp::new().await;
    app.create_user("ivan", "s3cret", UserRole::User).await;
    let session = app.login("ivan", "s3cret").await;

    let updated = app
        .request(
            "PUT",
            "/api/auth/me",
            Some(json!({
                "username": "ivan.p",
                "name": "Ivan Petrov",
                "password": " new pass ",
                "phone": "+7 900 000",
                "role": "admin",
            })),
            &session,
        )
        .await;
    assert_eq!(updated.status, StatusCode::OK, "{}", updated.body);
    assert_eq!(updated.body["data"]["username"], "ivan.p");
    assert_eq!(updated.body["data"]["role"], "user");

    let me = app.request("GET", "/api/auth/me", None, &session).await;
    assert_eq!(me.body["data"]["user"]["name"], "Ivan Petrov");

    let old = app
        .send(
            "POST",
            "/api/auth/login",
            Some(json!({ "username": "ivan", "password": "s3cret" })),
            &[],
        )
        .await;
    assert_eq!(old.status, StatusCode::UNAUTHORIZED);
    app.login("ivan.p", " new pass ").await;
}

#[tokio::test]
async fn test_profile_update_keeps_blank_password_and_rejects_taken_login() {
    let app = TestApp::new().await;
    app.admin_session().await;
    app.create_user("ivan", "s3cret", UserRole::User).await;
    let session = app.login("ivan", "s3cret").await;

    let taken = app
        .request(
            "PUT",
            "/api/auth/me",
            Some(json!({ "username": "Boss", "name": "Ivan" })),
            &session,
        )
        .await;
    assert_eq!(taken.status, StatusCode::CONFLICT);

    let renamed = app
        .request(
            "PUT",
            "/api/auth/me",
            Some(json!({ "username": "ivan", "name": "Ivan I.", "password": "" })),
            &session,
        )
        .await;
    assert_eq!(renamed.status, StatusCode::OK);
    app.login("ivan", "s3cret").await;
}

#[tokio::test]
async fn test_profile_update_requires_csrf_token() {
    let app = TestApp::new().await;
    app.create_user("ivan", "s3cret", UserRole::User).await;
    let session = app.login("ivan", "s3cret").await;

    let response = app
        .send(
            "PUT",
            "/api/auth/me",
            Some(json!({ "username": "mallory", "name": "Mallory" })),
            &[("cookie", session.cookie.as_str())],
        )
        .await;
    assert_eq!(response.status, StatusCode::FORBIDDEN);
    let me = app.request("GET", "/api/auth/me", None, &session).await;
    assert_eq!(me.body["data"]["user"]["username"], "ivan");
}
