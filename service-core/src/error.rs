use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

/// Closed set of error codes exposed to API callers.
///
/// Every fallible operation in the services resolves to one of these; the
/// HTTP status is fixed per code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    // Authentication
    InvalidCredentials,
    InvalidToken,
    UnexpectedError,
    // Authorization / context extraction
    MissingToken,
    MissingAuth,
    MissingOrgContext,
    NotMember,
    MissingPermission,
    Forbidden,
    InvalidRequest,
    InternalError,
    // Membership mutation
    CannotChangeLastOwner,
    CannotRemoveLastOwner,
    MembershipNotFound,
    UserAlreadyMember,
    // Named resources
    NotFound,
}

impl ErrorCode {
    pub fn status(self) -> StatusCode {
        match self {
            ErrorCode::InvalidCredentials
            | ErrorCode::InvalidToken
            | ErrorCode::MissingToken
            | ErrorCode::MissingAuth => StatusCode::UNAUTHORIZED,
            ErrorCode::NotMember | ErrorCode::MissingPermission | ErrorCode::Forbidden => {
                StatusCode::FORBIDDEN
            }
            ErrorCode::InvalidRequest
            | ErrorCode::UserAlreadyMember
            | ErrorCode::CannotChangeLastOwner
            | ErrorCode::CannotRemoveLastOwner => StatusCode::BAD_REQUEST,
            ErrorCode::MembershipNotFound | ErrorCode::NotFound => StatusCode::NOT_FOUND,
            // MissingOrgContext means a permission guard ran without the org
            // layer underneath it, which is a wiring fault on our side.
            ErrorCode::MissingOrgContext
            | ErrorCode::InternalError
            | ErrorCode::UnexpectedError => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// API-facing error: a code from the closed set plus a caller-safe message.
///
/// The underlying cause (storage fault, crypto fault) is kept for logging
/// only and never serialized into the response body.
#[derive(Debug, Error)]
#[error("{code:?}: {message}")]
pub struct ApiError {
    pub code: ErrorCode,
    pub message: String,
    #[source]
    pub source: Option<anyhow::Error>,
}

impl ApiError {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            source: None,
        }
    }

    /// Wrap a storage or crypto fault without exposing its detail.
    pub fn internal(source: anyhow::Error) -> Self {
        Self {
            code: ErrorCode::InternalError,
            message: "Internal server error".to_string(),
            source: Some(source),
        }
    }

    /// Same as [`ApiError::internal`] but with the authentication-side code.
    pub fn unexpected(source: anyhow::Error) -> Self {
        Self {
            code: ErrorCode::UnexpectedError,
            message: "Unexpected error".to_string(),
            source: Some(source),
        }
    }
}

impl From<anyhow::Error> for ApiError {
    fn from(err: anyhow::Error) -> Self {
        ApiError::internal(err)
    }
}

#[derive(Serialize)]
struct ErrorBody {
    message: String,
    code: ErrorCode,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.code.status();
        if status.is_server_error() {
            match &self.source {
                Some(cause) => {
                    tracing::error!(code = ?self.code, error = %cause, "request failed")
                }
                None => tracing::error!(code = ?self.code, message = %self.message, "request failed"),
            }
        }

        (
            status,
            Json(ErrorBody {
                message: self.message,
                code: self.code,
            }),
        )
            .into_response()
    }
}
