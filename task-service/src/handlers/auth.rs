use axum::{
    extract::State,
    http::{header, HeaderMap, StatusCode},
    response::IntoResponse,
    Json,
};
use service_core::error::{ApiError, ErrorCode};

use crate::{
    middleware::AuthContext,
    models::{LoginRequest, RegisterRequest},
    utils::ValidatedJson,
    AppState,
};

/// Register a new user.
pub async fn register(
    State(state): State<AppState>,
    ValidatedJson(req): ValidatedJson<RegisterRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let user = state.auth_service.register(req).await?;
    Ok((StatusCode::CREATED, Json(user)))
}

/// Login with username or email plus password.
pub async fn login(
    State(state): State<AppState>,
    ValidatedJson(req): ValidatedJson<LoginRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let res = state.auth_service.login(&req.identifier, &req.password).await?;
    Ok((StatusCode::OK, Json(res)))
}

/// Revoke the presented session token.
///
/// Deliberately not behind the verification middleware: revocation is
/// idempotent, so logging out with an already-revoked token succeeds
/// again instead of bouncing off the revocation check. Only the
/// signature is a precondition.
pub async fn logout(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<impl IntoResponse, ApiError> {
    let token = headers
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .ok_or_else(|| {
            ApiError::new(
                ErrorCode::MissingToken,
                "Missing or malformed Authorization header",
            )
        })?;

    state.auth_service.logout(token).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// The authenticated user's own profile.
pub async fn me(auth: AuthContext) -> impl IntoResponse {
    Json(auth.user)
}
