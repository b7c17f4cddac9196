pub mod config;
pub mod db;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod services;
pub mod utils;

use std::sync::Arc;

use axum::{
    extract::Request,
    handler::Handler,
    http::{header, HeaderValue, Method},
    middleware::{from_fn, from_fn_with_state, Next},
    routing::{get, post},
    Json, Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::{
    config::TaskConfig,
    db::{MembershipStore, UserStore},
    middleware::{auth_middleware, require_org_membership, require_permissions},
    models::Permission,
    services::{AuthService, JwtService, MembershipService, OrganizationService, TodoService},
};
use service_core::error::ApiError;

#[derive(Clone)]
pub struct AppState {
    pub config: TaskConfig,
    pub users: Arc<dyn UserStore>,
    pub memberships: Arc<dyn MembershipStore>,
    pub jwt: JwtService,
    pub auth_service: AuthService,
    pub org_service: OrganizationService,
    pub membership_service: MembershipService,
    pub todo_service: TodoService,
}

pub fn build_router(state: AppState) -> Result<Router, ApiError> {
    // Public routes: no token required.
    // Logout lives here rather than behind the auth layer: it checks the
    // token signature itself so that revoking twice stays idempotent.
    let public_routes = Router::new()
        .route("/auth/register", post(handlers::auth::register))
        .route("/auth/login", post(handlers::auth::login))
        .route("/auth/logout", post(handlers::auth::logout));

    // Routes requiring authentication only.
    let authed_routes = Router::new()
        .route("/users/me", get(handlers::auth::me))
        .route(
            "/orgs",
            post(handlers::org::create_organization).get(handlers::org::list_my_organizations),
        )
        .route_layer(from_fn_with_state(state.clone(), auth_middleware));

    // Organization-scoped routes: authentication, then membership
    // resolution, then the per-route permission gate.
    let org_routes = Router::new()
        .route(
            "/orgs/:org_id",
            get(handlers::org::get_organization
                .layer(from_fn(|req: Request, next: Next| {
                    require_permissions(&[Permission::OrgRead], req, next)
                })))
            .patch(handlers::org::update_organization.layer(from_fn(|req: Request, next: Next| {
                require_permissions(&[Permission::OrgUpdate], req, next)
            })))
            .delete(handlers::org::delete_organization.layer(from_fn(|req: Request, next: Next| {
                require_permissions(&[Permission::OrgDelete], req, next)
            }))),
        )
        .route(
            "/orgs/:org_id/members",
            get(handlers::membership::list_members
                .layer(from_fn(|req: Request, next: Next| {
                    require_permissions(&[Permission::OrgMembersRead], req, next)
                })))
            .post(handlers::membership::add_member.layer(from_fn(|req: Request, next: Next| {
                require_permissions(&[Permission::OrgMembersInvite], req, next)
            }))),
        )
        .route(
            "/orgs/:org_id/members/:user_id",
            axum::routing::patch(handlers::membership::update_member_role.layer(from_fn(
                |req: Request, next: Next| {
                    require_permissions(&[Permission::OrgMembersUpdateRole], req, next)
                },
            )))
            .delete(handlers::membership::remove_member.layer(from_fn(|req: Request, next: Next| {
                require_permissions(&[Permission::OrgMembersRemove], req, next)
            }))),
        )
        .route(
            "/orgs/:org_id/todos",
            get(handlers::todo::list_todos
                .layer(from_fn(|req: Request, next: Next| {
                    require_permissions(&[Permission::TodosRead], req, next)
                })))
            .post(handlers::todo::create_todo.layer(from_fn(|req: Request, next: Next| {
                require_permissions(&[Permission::TodosCreate], req, next)
            }))),
        )
        .route(
            "/orgs/:org_id/todos/:todo_id",
            // Update and delete authorize against the loaded todo inside
            // the handler (creator-or-permission), so no route gate here.
            get(handlers::todo::get_todo.layer(from_fn(|req: Request, next: Next| {
                require_permissions(&[Permission::TodosRead], req, next)
            })))
            .patch(handlers::todo::update_todo)
            .delete(handlers::todo::delete_todo),
        )
        .route(
            "/orgs/:org_id/todos/:todo_id/complete",
            post(handlers::todo::complete_todo),
        )
        .route_layer(from_fn_with_state(state.clone(), require_org_membership))
        .route_layer(from_fn_with_state(state.clone(), auth_middleware));

    let allowed_origins: Vec<HeaderValue> = state
        .config
        .security
        .allowed_origins
        .iter()
        .filter_map(|origin| match origin.parse::<HeaderValue>() {
            Ok(value) => Some(value),
            Err(e) => {
                tracing::error!(origin = %origin, error = %e, "skipping invalid CORS origin");
                None
            }
        })
        .collect();

    let app = Router::new()
        .route("/health", get(health_check))
        .merge(public_routes)
        .merge(authed_routes)
        .merge(org_routes)
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(allowed_origins)
                .allow_methods([
                    Method::GET,
                    Method::POST,
                    Method::PATCH,
                    Method::DELETE,
                    Method::OPTIONS,
                ])
                .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE]),
        );

    Ok(app)
}

/// Service health check.
pub async fn health_check(
    axum::extract::State(state): axum::extract::State<AppState>,
) -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "healthy",
        "service": state.config.service_name,
        "version": state.config.service_version,
    }))
}
