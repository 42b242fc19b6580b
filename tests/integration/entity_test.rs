//! Integration tests for worker, object and schedule endpoints.

use axum::http::StatusCode;
use serde_json::{Value, json};

use sitecrew_entity::UserRole;

use crate::helpers::{TestApp, TestSession};

async fn create(app: &TestApp, session: &TestSession, path: &str, body: Value) -> Value {
    let response = app.request("POST", path, Some(body), session).await;
    assert_eq!(response.status, StatusCode::CREATED, "{path}: {}", response.body);
    response.body["data"].clone()
}

struct Site {
    app: TestApp,
    admin: TestSession,
    worker_id: String,
    object_id: String,
}

async fn site() -> Site {
    let app = TestApp::new().await;
    let (admin_user, admin) = app.admin_session().await;
    let worker = create(
        &app,
        &admin,
        "/api/workers",
        json!({ "name": "Ivanov", "position": "Fitter", "hourlyRate": 12.5 }),
    )
    .await;
    let object = create(
        &app,
        &admin,
        "/api/objects",
        json!({
            "name": "Tower A",
            "address": "Main st. 1",
            "responsibleUserId": admin_user.id.as_str(),
        }),
    )
    .await;
    Site {
        worker_id: worker["id"].as_str().expect("id").to_string(),
        object_id: object["id"].as_str().expect("id").to_string(),
        app,
        admin,
    }
}

fn shift(site: &Site, start: &str, end: &str, lunch: i32) -> Value {
    json!({
        "date": "2024-05-06",
        "startTime": start,
        "endTime": end,
        "lunchBreakMinutes": lunch,
        "workerIds": [site.worker_id, site.worker_id],
        "objectIds": [site.object_id],
    })
}

#[tokio::test]
async fn test_worker_delete_fires() {
    let s = site().await;
    let path = format!("/api/workers/{}", s.worker_id);

    let deleted = s.app.request("DELETE", &path, None, &s.admin).await;
    assert_eq!(deleted.status, StatusCode::OK);

    let fetched = s.app.request("GET", &path, None, &s.admin).await;
    assert_eq!(fetched.status, StatusCode::OK);
    assert_eq!(fetched.body["data"]["isFired"], true);
}

#[tokio::test]
async fn test_worker_validation() {
    let s = site().await;
    let response = s
        .app
        .request(
            "POST",
            "/api/workers",
            Some(json!({ "name": "Petrov", "position": "Welder", "hourlyRate": -1.0 })),
            &s.admin,
        )
        .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_object_requires_existing_responsible_user() {
    let s = site().await;
    let response = s
        .app
        .request(
            "POST",
            "/api/objects",
            Some(json!({ "name": "Tower B", "address": "Side st. 2", "responsibleUserId": "ghost" })),
            &s.admin,
        )
        .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);

    let path = format!("/api/objects/{}", s.object_id);
    let fetched = s.app.request("GET", &path, None, &s.admin).await;
    assert_eq!(fetched.body["data"]["status"], "in_progress");
}

#[tokio::test]
async fn test_schedule_entry_records_creator_and_names() {
    let s = site().await;
    let entry = create(&s.app, &s.admin, "/api/schedule", shift(&s, "8:00", "17:00", 60)).await;

    assert_eq!(entry["startTime"], "08:00");
    assert_eq!(entry["createdByName"], "boss name");
    assert_eq!(entry["workedMinutes"], 480);
    let workers = entry["workers"].as_array().expect("workers");
    assert_eq!(workers.len(), 1);
    assert_eq!(workers[0]["name"], "Ivanov");
    assert_eq!(entry["objects"][0]["name"], "Tower A");

    let listed = s
        .app
        .request(
            "GET",
            &format!("/api/schedule?worker_id={}", s.worker_id),
            None,
            &s.admin,
        )
        .await;
    assert_eq!(listed.body["data"].as_array().expect("list").len(), 1);

    let other_day = s
        .app
        .request("GET", "/api/schedule?date=2024-05-07", None, &s.admin)
        .await;
    assert!(other_day.body["data"].as_array().expect("list").is_empty());
}

#[tokio::test]
async fn test_schedule_time_rules() {
    let s = site().await;
    for (start, end, lunch) in [("10:00", "09:00", 0), ("08:00", "09:00", 60), ("25:00", "26:00", 0)] {
        let response = s
            .app
            .request("POST", "/api/schedule", Some(shift(&s, start, end, lunch)), &s.admin)
            .await;
        assert_eq!(response.status, StatusCode::BAD_REQUEST, "{start}-{end}");
    }
    let listed = s.app.request("GET", "/api/schedule", None, &s.admin).await;
    assert!(listed.body["data"].as_array().expect("list").is_empty());
}

#[tokio::test]
async fn test_schedule_rejects_completed_object_and_fired_worker() {
    let s = site().await;
    let object_path = format!("/api/objects/{}", s.object_id);
    let object = s.app.request("GET", &object_path, None, &s.admin).await.body["data"].clone();
    let mut completed = object.clone();
    completed["status"] = json!("completed");
    let updated = s.app.request("PUT", &object_path, Some(completed), &s.admin).await;
    assert_eq!(updated.status, StatusCode::OK);

    let response = s
        .app
        .request("POST", "/api/schedule", Some(shift(&s, "08:00", "17:00", 60)), &s.admin)
        .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);

    let mut reopened = object;
    reopened["status"] = json!("in_progress");
    s.app.request("PUT", &object_path, Some(reopened), &s.admin).await;
    s.app
        .request("DELETE", &format!("/api/workers/{}", s.worker_id), None, &s.admin)
        .await;
    let response = s
        .app
        .request("POST", "/api/schedule", Some(shift(&s, "08:00", "17:00", 60)), &s.admin)
        .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_regular_user_can_manage_entities_but_not_users() {
    let s = site().await;
    s.app.create_user("ivan", "s3cret", UserRole::User).await;
    let user = s.app.login("ivan", "s3cret").await;

    let workers = s.app.request("GET", "/api/workers", None, &user).await;
    assert_eq!(workers.status, StatusCode::OK);
    let entry = s
        .app
        .request("POST", "/api/schedule", Some(shift(&s, "08:00", "12:00", 30)), &user)
        .await;
    assert_eq!(entry.status, StatusCode::CREATED);
    assert_eq!(entry.body["data"]["createdByName"], "ivan name");

    let users = s.app.request("GET", "/api/users", None, &user).await;
    assert_eq!(users.status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_missing_records_are_not_found() {
    let s = site().await;
    for path in ["/api/workers/nope", "/api/objects/nope", "/api/schedule/nope"] {
        let response = s.app.request("GET", path, None, &s.admin).await;
        assert_eq!(response.status, StatusCode::NOT_FOUND, "{path}");
    }
}

#[tokio::test]
async fn test_worker_list_filters_and_positions() {
    let s = site().await;
    create(
        &s.app,
        &s.admin,
        "/api/workers",
        json!({ "name": "Petrov Ivan", "position": "Welder" }),
    )
    .await;
    let fired = create(
        &s.app,
        &s.admin,
        "/api/workers",
        json!({ "name": "Sidorov", "position": "Crane operator" }),
    )
    .await;
    let path = format!("/api/workers/{}", fired["id"].as_str().expect("id"));
    s.app.request("DELETE", &path, None, &s.admin).await;

    let all = s.app.request("GET", "/api/workers", None, &s.admin).await;
    assert_eq!(all.body["data"].as_array().expect("list").len(), 3);

    let search = s
        .app
        .request("GET", "/api/workers?search=IVAN&status=active", None, &s.admin)
        .await;
    let names: Vec<&str> = search.body["data"]
        .as_array()
        .expect("list")
        .iter()
        .filter_map(|w| w["name"].as_str())
        .collect();
    assert_eq!(names, vec!["Ivanov", "Petrov Ivan"]);

    let welders = s
        .app
        .request("GET", "/api/workers?position=Welder", None, &s.admin)
        .await;
    assert_eq!(welders.body["data"].as_array().expect("list").len(), 1);

    let positions = s
        .app
        .request("GET", "/api/workers/positions?status=active", None, &s.admin)
        .await;
    assert_eq!(positions.status, StatusCode::OK);
    assert_eq!(positions.body["data"], json!(["Fitter", "Welder"]));
}

#[tokio::test]
async fn test_dashboard_counts() {
    let s = site().await;
    let today = chrono::Local::now().format("%Y-%m-%d").to_string();
    let mut entry = shift(&s, "08:00", "17:00", 60);
    entry["date"] = json!(today);
    create(&s.app, &s.admin, "/api/schedule", entry).await;
    create(&s.app, &s.admin, "/api/schedule", shift(&s, "08:00", "17:00", 60)).await;

    let done = create(
        &s.app,
        &s.admin,
        "/api/objects",
        json!({ "name": "Tower C", "address": "Side st. 3", "status": "completed" }),
    )
    .await;
    assert_eq!(done["status"], "completed");

    let response = s.app.request("GET", "/api/dashboard", None, &s.admin).await;
    assert_eq!(response.status, StatusCode::OK);
    let stats = &response.body["data"];
    assert_eq!(stats["date"], today.as_str());
    assert_eq!(stats["todayAssignments"], 1);
    assert_eq!(stats["activeWorkers"], 1);
    assert_eq!(stats["activeObjects"], 1);

    let anonymous = s.app.send("GET", "/api/dashboard", None, &[]).await;
    assert_eq!(anonymous.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_worker_update_keeps_user_link() {
    let s = site().await;
    let user = s.app.create_user("ivan", "pw", UserRole::Admin).await;
    let link_path = format!("/api/workers/{}/user", s.worker_id);
    let linked = s
        .app
        .request("PUT", &link_path, Some(json!({ "userId": user.id.as_str() })), &s.admin)
        .await;
    assert_eq!(linked.status, StatusCode::OK);

    let path = format!("/api/workers/{}", s.worker_id);
    let updated = s
        .app
        .request(
            "PUT",
            &path,
            Some(json!({ "name": "Ivanov", "position": "Foreman", "userId": null })),
            &s.admin,
        )
        .await;
    assert_eq!(updated.status, StatusCode::OK);
    assert_eq!(updated.body["data"]["position"], "Foreman");
    assert_eq!(updated.body["data"]["userId"], user.id.as_str());
}
