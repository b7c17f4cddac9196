mod common;

use axum::http::StatusCode;
use common::{assert_error_code, spawn_app};
use serde_json::json;
use uuid::Uuid;

#[tokio::test]
async fn missing_authorization_header_is_401() {
    let app = spawn_app().await;
    let (status, body) = app.get("/users/me", None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_error_code(&body, "MISSING_TOKEN");
}

#[tokio::test]
async fn wrong_scheme_is_missing_token() {
    let app = spawn_app().await;
    let req = axum::http::Request::builder()
        .method("GET")
        .uri("/users/me")
        .header("authorization", "Basic dXNlcjpwYXNz")
        .body(axum::body::Body::empty())
        .unwrap();
    let (status, body) = app.send(req).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_error_code(&body, "MISSING_TOKEN");
}

#[tokio::test]
async fn empty_bearer_token_is_invalid_token() {
    let app = spawn_app().await;
    // "Bearer " followed by nothing: header extraction passes, the
    // verification gate fails.
    let (status, body) = app.get("/users/me", Some("")).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_error_code(&body, "INVALID_TOKEN");
}

#[tokio::test]
async fn garbage_token_is_invalid_token() {
    let app = spawn_app().await;
    let (status, body) = app.get("/users/me", Some("not.a.jwt")).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_error_code(&body, "INVALID_TOKEN");
}

#[tokio::test]
async fn revoked_token_is_rejected_on_protected_routes() {
    let app = spawn_app().await;
    let (_, token) = app.register_and_login("frank@example.com", "frank").await;
    let org_id = app.create_org(&token, "Acme", "acme").await;

    let (status, _) = app.post("/auth/logout", Some(&token), json!({})).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, body) = app.get(&format!("/orgs/{org_id}"), Some(&token)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_error_code(&body, "INVALID_TOKEN");
}

#[tokio::test]
async fn org_routes_require_membership() {
    let app = spawn_app().await;
    let (_, owner_token) = app.register_and_login("grace@example.com", "grace").await;
    let org_id = app.create_org(&owner_token, "Hopper Inc", "hopper").await;

    let (_, outsider_token) = app
        .register_and_login("heidi@example.com", "heidi")
        .await;

    // Authenticated but not a member: 403, resolved before permissions.
    let (status, body) = app
        .get(&format!("/orgs/{org_id}/todos"), Some(&outsider_token))
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_error_code(&body, "NOT_MEMBER");

    // Nonexistent org behaves like any other non-membership.
    let (status, body) = app
        .get(&format!("/orgs/{}/todos", Uuid::new_v4()), Some(&owner_token))
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_error_code(&body, "NOT_MEMBER");
}

#[tokio::test]
async fn malformed_org_id_is_bad_request() {
    let app = spawn_app().await;
    let (_, token) = app.register_and_login("ivan@example.com", "ivan").await;

    let (status, body) = app.get("/orgs/not-a-uuid/todos", Some(&token)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_error_code(&body, "INVALID_REQUEST");
}

#[tokio::test]
async fn middleware_runs_in_order_auth_before_membership() {
    let app = spawn_app().await;
    let (_, token) = app.register_and_login("judy@example.com", "judy").await;
    let org_id = app.create_org(&token, "Judy Org", "judy-org").await;

    // A bad token on an org route fails at the auth gate, not the
    // membership gate.
    let (status, body) = app
        .get(&format!("/orgs/{org_id}/todos"), Some("tampered"))
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_error_code(&body, "INVALID_TOKEN");

    let (status, body) = app.get(&format!("/orgs/{org_id}/todos"), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_error_code(&body, "MISSING_TOKEN");
}
