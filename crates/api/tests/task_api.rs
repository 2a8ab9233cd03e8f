//! HTTP-level integration tests for tasks and the status update policy.

mod common;

use axum::http::StatusCode;
use common::{
    body_json, create_project, create_task, get_auth, patch_json_auth, post_json_auth,
    post_raw_auth, register_and_login,
};
use serde_json::json;

#[tokio::test]
async fn task_defaults_and_forbidden_update() {
    let app = common::build_test_app();
    let alice = register_and_login(&app, "alice").await;
    let bob = register_and_login(&app, "bob").await;
    let project_id = create_project(&app, &alice, "P1", &[]).await;

    let response = post_json_auth(
        app.clone(),
        &format!("/api/v1/projects/{project_id}/tasks"),
        json!({ "title": "T1" }),
        &alice.token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let json = body_json(response).await;
    assert_eq!(json["data"]["status"], "to_do");
    assert_eq!(json["data"]["priority"], "medium");
    assert_eq!(json["data"]["project_id"], project_id);
    let task_id = json["data"]["id"].as_i64().unwrap();

    let response = patch_json_auth(
        app.clone(),
        &format!("/api/v1/tasks/{task_id}/status"),
        json!({ "status": "done" }),
        &bob.token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let response = get_auth(app, &format!("/api/v1/tasks/{task_id}"), &alice.token).await;
    assert_eq!(body_json(response).await["data"]["status"], "to_do");
}

#[tokio::test]
async fn non_member_cannot_list_or_create_tasks() {
    let app = common::build_test_app();
    let alice = register_and_login(&app, "alice").await;
    let bob = register_and_login(&app, "bob").await;
    let project_id = create_project(&app, &alice, "P1", &[]).await;
    let uri = format!("/api/v1/projects/{project_id}/tasks");

    let response = get_auth(app.clone(), &uri, &bob.token).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let response = post_json_auth(app, &uri, json!({ "title": "x" }), &bob.token).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn invalid_status_is_rejected_and_nothing_changes() {
    let app = common::build_test_app();
    let alice = register_and_login(&app, "alice").await;
    let project_id = create_project(&app, &alice, "P1", &[]).await;
    let task_id = create_task(&app, &alice, project_id, "T1").await;
    let uri = format!("/api/v1/tasks/{task_id}/status");

    let response = patch_json_auth(
        app.clone(),
        &uri,
        json!({ "status": "archived", "priority": "high" }),
        &alice.token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["code"], "VALIDATION_ERROR");
    assert!(json["error"].as_str().unwrap().contains("archived"));

    let response = get_auth(app, &format!("/api/v1/tasks/{task_id}"), &alice.token).await;
    let json = body_json(response).await;
    assert_eq!(json["data"]["status"], "to_do");
    assert_eq!(json["data"]["priority"], "medium");
}

#[tokio::test]
async fn priority_only_patch() {
    let app = common::build_test_app();
    let alice = register_and_login(&app, "alice").await;
    let project_id = create_project(&app, &alice, "P1", &[]).await;
    let task_id = create_task(&app, &alice, project_id, "T1").await;

    let response = patch_json_auth(
        app,
        &format!("/api/v1/tasks/{task_id}/status"),
        json!({ "priority": "high" }),
        &alice.token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["data"]["priority"], "high");
    assert_eq!(json["data"]["status"], "to_do");
    assert_eq!(json["data"]["title"], "T1");
    assert!(json["data"]["deadline"].is_null());
}

#[tokio::test]
async fn deadline_patch_accepts_dates() {
    let app = common::build_test_app();
    let alice = register_and_login(&app, "alice").await;
    let project_id = create_project(&app, &alice, "P1", &[]).await;
    let task_id = create_task(&app, &alice, project_id, "T1").await;
    let uri = format!("/api/v1/tasks/{task_id}/status");

    let response = patch_json_auth(
        app.clone(),
        &uri,
        json!({ "deadline": "2025-06-01" }),
        &alice.token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert!(json["data"]["deadline"]
        .as_str()
        .unwrap()
        .starts_with("2025-06-01T00:00:00"));

    let response = patch_json_auth(app, &uri, json!({ "deadline": "soon" }), &alice.token).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn missing_task_is_404() {
    let app = common::build_test_app();
    let alice = register_and_login(&app, "alice").await;

    let response = patch_json_auth(
        app.clone(),
        "/api/v1/tasks/77/status",
        json!({ "status": "done" }),
        &alice.token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = post_json_auth(
        app,
        "/api/v1/projects/77/tasks",
        json!({ "title": "T" }),
        &alice.token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn create_with_assignee_and_initial_comment() {
    let app = common::build_test_app();
    let alice = register_and_login(&app, "alice").await;
    let bob = register_and_login(&app, "bob").await;
    let project_id = create_project(&app, &alice, "P1", &[bob.id]).await;

    let response = post_json_auth(
        app.clone(),
        &format!("/api/v1/projects/{project_id}/tasks"),
        json!({
            "title": "T1",
            "priority": "low",
            "assigned_to": bob.id,
            "comment": "please take this",
        }),
        &alice.token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let task_id = body_json(response).await["data"]["id"].as_i64().unwrap();

    let response = get_auth(app, &format!("/api/v1/tasks/{task_id}"), &bob.token).await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["assigned_to"], bob.id);
    assert_eq!(json["data"]["assignee"]["username"], "bob");
    assert_eq!(json["data"]["comments"][0]["text"], "please take this");
    assert_eq!(json["data"]["comments"][0]["user"], "alice");
}

#[tokio::test]
async fn wrongly_typed_status_is_a_validation_error() {
    let app = common::build_test_app();
    let alice = register_and_login(&app, "alice").await;
    let project_id = create_project(&app, &alice, "P1", &[]).await;
    let task_id = create_task(&app, &alice, project_id, "T1").await;

    let response = patch_json_auth(
        app.clone(),
        &format!("/api/v1/tasks/{task_id}/status"),
        json!({ "status": 5 }),
        &alice.token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["code"], "VALIDATION_ERROR");
    assert!(json["error"].as_str().unwrap().contains("status"));

    let response = get_auth(app, &format!("/api/v1/tasks/{task_id}"), &alice.token).await;
    assert_eq!(body_json(response).await["data"]["status"], "to_do");
}

#[tokio::test]
async fn malformed_body_is_a_bad_request() {
    let app = common::build_test_app();
    let alice = register_and_login(&app, "alice").await;
    let project_id = create_project(&app, &alice, "P1", &[]).await;

    let response = post_raw_auth(
        app,
        &format!("/api/v1/projects/{project_id}/tasks"),
        "{\"title\": ",
        &alice.token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["code"], "BAD_REQUEST");
}

#[tokio::test]
async fn task_list_nests_assignee_and_comments() {
    let app = common::build_test_app();
    let alice = register_and_login(&app, "alice").await;
    let project_id = create_project(&app, &alice, "P1", &[]).await;
    let uri = format!("/api/v1/projects/{project_id}/tasks");

    let response = post_json_auth(
        app.clone(),
        &uri,
        json!({ "title": "T1", "assigned_to": alice.id, "comment": "kick-off" }),
        &alice.token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let response = get_auth(app, &uri, &alice.token).await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    let task = &json["data"][0];
    assert_eq!(task["title"], "T1");
    assert_eq!(task["assignee"]["username"], "alice");
    assert_eq!(task["comments"][0]["text"], "kick-off");
    assert_eq!(task["comments"][0]["user"], "alice");
}
