//! Shared setup for task-service integration tests.
//!
//! Builds the full router over in-memory stores so tests exercise the
//! real middleware chain and handlers without external services.

#![allow(dead_code)]

use std::sync::Arc;

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use task_service::{
    build_router,
    config::TaskConfig,
    db::{
        InMemoryMembershipStore, InMemoryOrganizationStore, InMemoryTodoStore, InMemoryUserStore,
        MembershipStore, OrganizationStore, TodoStore, UserStore,
    },
    services::{
        AuthService, InMemoryRevocationStore, JwtService, MembershipService, OrganizationService,
        RevocationStore, TodoService,
    },
    AppState,
};
use tower::util::ServiceExt;
use uuid::Uuid;

pub struct TestApp {
    pub router: Router,
    pub state: AppState,
}

pub async fn spawn_app() -> TestApp {
    dotenvy::dotenv().ok();
    let mut config = TaskConfig::from_env().expect("Failed to load test configuration");
    config.log_level = "error".to_string();

    let users: Arc<dyn UserStore> = Arc::new(InMemoryUserStore::new());
    let orgs: Arc<dyn OrganizationStore> = Arc::new(InMemoryOrganizationStore::new());
    let memberships: Arc<dyn MembershipStore> = Arc::new(InMemoryMembershipStore::new());
    let todos: Arc<dyn TodoStore> = Arc::new(InMemoryTodoStore::new());
    let revocations: Arc<dyn RevocationStore> = Arc::new(InMemoryRevocationStore::new());

    let jwt = JwtService::new(&config.jwt).expect("Failed to create JWT service");

    let auth_service = AuthService::new(users.clone(), jwt.clone(), revocations);
    let org_service = OrganizationService::new(orgs.clone(), memberships.clone(), todos.clone());
    let membership_service = MembershipService::new(memberships.clone(), users.clone());
    let todo_service = TodoService::new(todos);

    let state = AppState {
        config,
        users,
        memberships,
        jwt,
        auth_service,
        org_service,
        membership_service,
        todo_service,
    };

    let router = build_router(state.clone()).expect("Failed to build router");
    TestApp { router, state }
}

impl TestApp {
    /// Fire a request and decode the response body as JSON. An empty
    /// body (204 responses) decodes to `Value::Null`.
    pub async fn send(&self, req: Request<Body>) -> (StatusCode, Value) {
        let response = self.router.clone().oneshot(req).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, body)
    }

    pub async fn get(&self, uri: &str, token: Option<&str>) -> (StatusCode, Value) {
        self.send(build_request("GET", uri, token, None)).await
    }

    pub async fn post(&self, uri: &str, token: Option<&str>, body: Value) -> (StatusCode, Value) {
        self.send(build_request("POST", uri, token, Some(body)))
            .await
    }

    pub async fn patch(&self, uri: &str, token: Option<&str>, body: Value) -> (StatusCode, Value) {
        self.send(build_request("PATCH", uri, token, Some(body)))
            .await
    }

    pub async fn delete(&self, uri: &str, token: Option<&str>) -> (StatusCode, Value) {
        self.send(build_request("DELETE", uri, token, None)).await
    }

    /// Register a user and log them in, returning `(user_id, token)`.
    pub async fn register_and_login(&self, email: &str, username: &str) -> (Uuid, String) {
        let (status, body) = self
            .post(
                "/auth/register",
                None,
                json!({
                    "email": email,
                    "username": username,
                    "password": "correct horse battery",
                }),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED, "register failed: {body}");
        let user_id = body["id"].as_str().unwrap().parse().unwrap();

        let (status, body) = self
            .post(
                "/auth/login",
                None,
                json!({ "identifier": username, "password": "correct horse battery" }),
            )
            .await;
        assert_eq!(status, StatusCode::OK, "login failed: {body}");
        (user_id, body["token"].as_str().unwrap().to_string())
    }

    /// Create an organization as the token holder, returning its id.
    pub async fn create_org(&self, token: &str, name: &str, slug: &str) -> Uuid {
        let (status, body) = self
            .post("/orgs", Some(token), json!({ "name": name, "slug": slug }))
            .await;
        assert_eq!(status, StatusCode::CREATED, "create org failed: {body}");
        body["id"].as_str().unwrap().parse().unwrap()
    }

    /// Add an existing user to an organization with the given role.
    pub async fn add_member(&self, token: &str, org_id: Uuid, user_id: Uuid, role: &str) {
        let (status, body) = self
            .post(
                &format!("/orgs/{org_id}/members"),
                Some(token),
                json!({ "user_id": user_id, "role": role }),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED, "add member failed: {body}");
    }

    /// Create a todo in the organization, returning its id.
    pub async fn create_todo(&self, token: &str, org_id: Uuid, title: &str) -> Uuid {
        let (status, body) = self
            .post(
                &format!("/orgs/{org_id}/todos"),
                Some(token),
                json!({ "title": title }),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED, "create todo failed: {body}");
        body["id"].as_str().unwrap().parse().unwrap()
    }
}

pub fn build_request(
    method: &str,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    }
}

/// Assert an error body has the expected `code` field.
pub fn assert_error_code(body: &Value, expected: &str) {
    assert_eq!(
        body["code"].as_str(),
        Some(expected),
        "unexpected error body: {body}"
    );
}
