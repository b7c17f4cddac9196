use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use service_core::error::ApiError;

use crate::{
    middleware::{AuthContext, OrgContext},
    models::{CreateOrganizationRequest, UpdateOrganizationRequest},
    utils::ValidatedJson,
    AppState,
};

/// Create an organization; the caller becomes its first owner.
pub async fn create_organization(
    State(state): State<AppState>,
    auth: AuthContext,
    ValidatedJson(req): ValidatedJson<CreateOrganizationRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let organization = state.org_service.create(auth.user.id, req).await?;
    Ok((StatusCode::CREATED, Json(organization)))
}

/// Organizations the caller belongs to.
pub async fn list_my_organizations(
    State(state): State<AppState>,
    auth: AuthContext,
) -> Result<impl IntoResponse, ApiError> {
    let organizations = state.org_service.list_for_user(auth.user.id).await?;
    Ok(Json(organizations))
}

pub async fn get_organization(
    State(state): State<AppState>,
    org: OrgContext,
) -> Result<impl IntoResponse, ApiError> {
    let organization = state.org_service.get(org.organization_id).await?;
    Ok(Json(organization))
}

pub async fn update_organization(
    State(state): State<AppState>,
    org: OrgContext,
    ValidatedJson(req): ValidatedJson<UpdateOrganizationRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let organization = state
        .org_service
        .rename(org.organization_id, req.name)
        .await?;
    Ok(Json(organization))
}

pub async fn delete_organization(
    State(state): State<AppState>,
    org: OrgContext,
) -> Result<impl IntoResponse, ApiError> {
    state.org_service.delete(org.organization_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
