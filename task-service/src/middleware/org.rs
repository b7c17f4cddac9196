use axum::{
    extract::{FromRequestParts, Path, Request, State},
    http::request::Parts,
    middleware::Next,
    response::Response,
};
use serde::Deserialize;
use service_core::error::{ApiError, ErrorCode};
use uuid::Uuid;

use crate::{
    middleware::AuthContext,
    models::{Membership, Permission},
    AppState,
};

/// Request-scoped organization context: the resolved organization id, the
/// caller's membership row and the permission list derived from its role.
/// Constructed fresh per request by [`require_org_membership`].
#[derive(Debug, Clone)]
pub struct OrgContext {
    pub organization_id: Uuid,
    pub membership: Membership,
    pub permissions: &'static [Permission],
}

impl OrgContext {
    pub fn has(&self, permission: Permission) -> bool {
        self.permissions.contains(&permission)
    }
}

#[derive(Deserialize)]
pub struct OrgIdPath {
    org_id: Uuid,
}

/// Middleware for organization-scoped routes, layered after
/// [`super::auth_middleware`].
///
/// Resolves the route's organization id and the caller's membership,
/// derives the permission list and attaches the [`OrgContext`].
pub async fn require_org_membership(
    State(state): State<AppState>,
    path: Option<Path<OrgIdPath>>,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let Some(Path(OrgIdPath { org_id })) = path else {
        return Err(ApiError::new(
            ErrorCode::InvalidRequest,
            "Organization id is required",
        ));
    };

    let auth = req
        .extensions()
        .get::<AuthContext>()
        .cloned()
        .ok_or_else(|| ApiError::new(ErrorCode::MissingAuth, "Authentication required"))?;

    let membership = state
        .memberships
        .find_by_user_and_org(auth.user.id, org_id)
        .await
        .map_err(|e| ApiError::internal(anyhow::Error::new(e)))?
        .ok_or_else(|| {
            tracing::warn!(user_id = %auth.user.id, org_id = %org_id, "caller is not a member");
            ApiError::new(ErrorCode::NotMember, "Not a member of this organization")
        })?;

    let permissions = membership.role.permissions();

    req.extensions_mut().insert(OrgContext {
        organization_id: org_id,
        membership,
        permissions,
    });

    Ok(next.run(req).await)
}

#[axum::async_trait]
impl<S> FromRequestParts<S> for OrgContext
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts.extensions.get::<OrgContext>().cloned().ok_or_else(|| {
            ApiError::new(
                ErrorCode::MissingOrgContext,
                "Organization context missing from request",
            )
        })
    }
}
