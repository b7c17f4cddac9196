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
    middleware::OrgContext,
    models::{AddMemberRequest, UpdateMemberRoleRequest},
    utils::ValidatedJson,
    AppState,
};

#[derive(Deserialize)]
pub struct MemberPath {
    #[allow(dead_code)]
    org_id: Uuid,
    user_id: Uuid,
}

pub async fn list_members(
    State(state): State<AppState>,
    org: OrgContext,
) -> Result<impl IntoResponse, ApiError> {
    let members = state.membership_service.list(org.organization_id).await?;
    Ok(Json(members))
}

pub async fn add_member(
    State(state): State<AppState>,
    org: OrgContext,
    ValidatedJson(req): ValidatedJson<AddMemberRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let membership = state
        .membership_service
        .add(org.organization_id, req.user_id, req.role)
        .await?;
    Ok((StatusCode::CREATED, Json(membership)))
}

pub async fn update_member_role(
    State(state): State<AppState>,
    org: OrgContext,
    Path(path): Path<MemberPath>,
    ValidatedJson(req): ValidatedJson<UpdateMemberRoleRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let membership = state
        .membership_service
        .update_role(org.organization_id, path.user_id, req.role)
        .await?;
    Ok(Json(membership))
}

pub async fn remove_member(
    State(state): State<AppState>,
    org: OrgContext,
    Path(path): Path<MemberPath>,
) -> Result<impl IntoResponse, ApiError> {
    state
        .membership_service
        .remove(org.organization_id, path.user_id)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}
