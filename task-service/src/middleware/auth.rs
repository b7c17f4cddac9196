use axum::{
    extract::{FromRequestParts, Request, State},
    http::{header, request::Parts},
    middleware::Next,
    response::Response,
};
use service_core::error::{ApiError, ErrorCode};

use crate::{models::User, AppState};

/// Request-scoped authentication context: the resolved user and the raw
/// bearer token. Inserted by [`auth_middleware`], never shared across
/// requests.
#[derive(Debug, Clone)]
pub struct AuthContext {
    pub user: User,
    pub token: String,
}

/// Middleware gating every protected route.
///
/// Extracts the bearer token, verifies it (signature, expiry and
/// revocation), resolves the subject to a user and attaches the
/// [`AuthContext`]. A subject that no longer resolves is reported as
/// unauthorized, not as a 404, so a deleted account is indistinguishable
/// from an invalid token.
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let token = req
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .ok_or_else(|| {
            ApiError::new(ErrorCode::MissingToken, "Missing or malformed Authorization header")
        })?
        .to_string();

    // An empty token after the prefix falls through to verification and
    // fails there, with the same status as a missing header.
    let subject = state.auth_service.verify_token(&token).await?;

    let user = state
        .users
        .find_by_id(subject)
        .await
        .map_err(|e| ApiError::internal(anyhow::Error::new(e)))?
        .ok_or_else(|| ApiError::new(ErrorCode::InvalidToken, "Invalid token"))?;

    req.extensions_mut().insert(AuthContext { user, token });

    Ok(next.run(req).await)
}

#[axum::async_trait]
impl<S> FromRequestParts<S> for AuthContext
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<AuthContext>()
            .cloned()
            .ok_or_else(|| ApiError::new(ErrorCode::MissingAuth, "Authentication required"))
    }
}
