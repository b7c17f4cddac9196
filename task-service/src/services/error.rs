use service_core::error::{ApiError, ErrorCode};
use thiserror::Error;

use crate::db::StoreError;

/// Authentication failures. Closed set: anything the stores or crypto
/// throw at us collapses into `Unexpected` before leaving the service.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Invalid token")]
    InvalidToken,

    #[error("Identifier already registered")]
    IdentifierTaken(&'static str),

    #[error("Unexpected error: {0}")]
    Unexpected(#[source] anyhow::Error),
}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        match err {
            // One code and one message for "no such user" and "wrong
            // password" so identifiers cannot be enumerated.
            AuthError::InvalidCredentials => {
                ApiError::new(ErrorCode::InvalidCredentials, "Invalid credentials")
            }
            AuthError::InvalidToken => ApiError::new(ErrorCode::InvalidToken, "Invalid token"),
            AuthError::IdentifierTaken(field) => ApiError::new(
                ErrorCode::InvalidRequest,
                format!("{} is already registered", field),
            ),
            AuthError::Unexpected(source) => ApiError::unexpected(source),
        }
    }
}

impl From<StoreError> for AuthError {
    fn from(err: StoreError) -> Self {
        AuthError::Unexpected(anyhow::Error::new(err))
    }
}

#[derive(Debug, Error)]
pub enum OrgError {
    #[error("Organization slug already in use")]
    SlugTaken,

    #[error("Organization not found")]
    NotFound,

    #[error("Storage error: {0}")]
    Store(#[source] anyhow::Error),
}

impl From<OrgError> for ApiError {
    fn from(err: OrgError) -> Self {
        match err {
            OrgError::SlugTaken => {
                ApiError::new(ErrorCode::InvalidRequest, "Organization slug already in use")
            }
            OrgError::NotFound => ApiError::new(ErrorCode::NotFound, "Organization not found"),
            OrgError::Store(source) => ApiError::internal(source),
        }
    }
}

impl From<StoreError> for OrgError {
    fn from(err: StoreError) -> Self {
        OrgError::Store(anyhow::Error::new(err))
    }
}

#[derive(Debug, Error)]
pub enum MembershipError {
    #[error("User is already a member of this organization")]
    AlreadyMember,

    #[error("Membership not found")]
    NotFound,

    #[error("User not found")]
    UserNotFound,

    #[error("Cannot change the role of the last owner")]
    CannotChangeLastOwner,

    #[error("Cannot remove the last owner")]
    CannotRemoveLastOwner,

    #[error("Storage error: {0}")]
    Store(#[source] anyhow::Error),
}

impl From<MembershipError> for ApiError {
    fn from(err: MembershipError) -> Self {
        match err {
            MembershipError::AlreadyMember => ApiError::new(
                ErrorCode::UserAlreadyMember,
                "User is already a member of this organization",
            ),
            MembershipError::NotFound => {
                ApiError::new(ErrorCode::MembershipNotFound, "Membership not found")
            }
            MembershipError::UserNotFound => ApiError::new(ErrorCode::NotFound, "User not found"),
            MembershipError::CannotChangeLastOwner => ApiError::new(
                ErrorCode::CannotChangeLastOwner,
                "Cannot change the role of the organization's last owner",
            ),
            MembershipError::CannotRemoveLastOwner => ApiError::new(
                ErrorCode::CannotRemoveLastOwner,
                "Cannot remove the organization's last owner",
            ),
            MembershipError::Store(source) => ApiError::internal(source),
        }
    }
}

#[derive(Debug, Error)]
pub enum TodoError {
    #[error("Todo not found")]
    NotFound,

    #[error("Storage error: {0}")]
    Store(#[source] anyhow::Error),
}

impl From<TodoError> for ApiError {
    fn from(err: TodoError) -> Self {
        match err {
            TodoError::NotFound => ApiError::new(ErrorCode::NotFound, "Todo not found"),
            TodoError::Store(source) => ApiError::internal(source),
        }
    }
}

impl From<StoreError> for TodoError {
    fn from(err: StoreError) -> Self {
        TodoError::Store(anyhow::Error::new(err))
    }
}
