use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde::Deserialize;
use service_core::error::ApiError;
use uuid::Uuid;

use crate::{
    middleware::{require_creator_or_permission, AuthContext, OrgContext},
    models::{CreateTodoRequest, Permission, UpdateTodoRequest},
    utils::ValidatedJson,
    AppState,
};

#[derive(Deserialize)]
pub struct TodoPath {
    #[allow(dead_code)]
    org_id: Uuid,
    todo_id: Uuid,
}

pub async fn list_todos(
    State(state): State<AppState>,
    org: OrgContext,
) -> Result<impl IntoResponse, ApiError> {
    let todos = state.todo_service.list(org.organization_id).await?;
    Ok(Json(todos))
}

pub async fn create_todo(
    State(state): State<AppState>,
    auth: AuthContext,
    org: OrgContext,
    ValidatedJson(req): ValidatedJson<CreateTodoRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let todo = state
        .todo_service
        .create(org.organization_id, auth.user.id, req)
        .await?;
    Ok((StatusCode::CREATED, Json(todo)))
}

pub async fn get_todo(
    State(state): State<AppState>,
    org: OrgContext,
    Path(path): Path<TodoPath>,
) -> Result<impl IntoResponse, ApiError> {
    let todo = state
        .todo_service
        .get(org.organization_id, path.todo_id)
        .await?;
    Ok(Json(todo))
}

/// Update a todo. The creator may always edit their own item; everyone
/// else needs `todos:update`.
pub async fn update_todo(
    State(state): State<AppState>,
    auth: AuthContext,
    org: OrgContext,
    Path(path): Path<TodoPath>,
    ValidatedJson(req): ValidatedJson<UpdateTodoRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let todo = state
        .todo_service
        .get(org.organization_id, path.todo_id)
        .await?;
    require_creator_or_permission(&auth, &org, todo.created_by, Permission::TodosUpdate)?;

    let todo = state.todo_service.update(todo, req).await?;
    Ok(Json(todo))
}

/// Complete a todo: creator fallback or `todos:complete`.
pub async fn complete_todo(
    State(state): State<AppState>,
    auth: AuthContext,
    org: OrgContext,
    Path(path): Path<TodoPath>,
) -> Result<impl IntoResponse, ApiError> {
    let todo = state
        .todo_service
        .get(org.organization_id, path.todo_id)
        .await?;
    require_creator_or_permission(&auth, &org, todo.created_by, Permission::TodosComplete)?;

    let todo = state.todo_service.complete(todo).await?;
    Ok(Json(todo))
}

pub async fn delete_todo(
    State(state): State<AppState>,
    auth: AuthContext,
    org: OrgContext,
    Path(path): Path<TodoPath>,
) -> Result<impl IntoResponse, ApiError> {
    let todo = state
        .todo_service
        .get(org.organization_id, path.todo_id)
        .await?;
    require_creator_or_permission(&auth, &org, todo.created_by, Permission::TodosDelete)?;

    state
        .todo_service
        .delete(org.organization_id, path.todo_id)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}
