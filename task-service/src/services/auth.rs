use std::sync::Arc;

use chrono::Utc;
use uuid::Uuid;

use crate::{
    db::UserStore,
    models::{LoginResponse, RegisterRequest, User, UserCredential},
    services::{AuthError, JwtService, RevocationStore},
    utils::{hash_password, verify_password, Password},
};

/// Orchestrates credential verification, token issuance and token
/// verification plus the revocation lookup.
#[derive(Clone)]
pub struct AuthService {
    users: Arc<dyn UserStore>,
    jwt: JwtService,
    revocations: Arc<dyn RevocationStore>,
}

impl AuthService {
    pub fn new(
        users: Arc<dyn UserStore>,
        jwt: JwtService,
        revocations: Arc<dyn RevocationStore>,
    ) -> Self {
        Self {
            users,
            jwt,
            revocations,
        }
    }

    pub async fn register(&self, req: RegisterRequest) -> Result<User, AuthError> {
        // Two independent existence checks; no ordering requirement, so
        // issue them concurrently and join.
        let (by_email, by_username) = tokio::try_join!(
            self.users.find_by_email(&req.email),
            self.users.find_by_username(&req.username),
        )?;

        if by_email.is_some() {
            return Err(AuthError::IdentifierTaken("Email"));
        }
        if by_username.is_some() {
            return Err(AuthError::IdentifierTaken("Username"));
        }

        let password_hash = hash_password(&Password::new(req.password))
            .map_err(AuthError::Unexpected)?;

        let user = User::new(req.email, req.username);
        self.users
            .save(UserCredential {
                user: user.clone(),
                password_hash,
            })
            .await?;

        tracing::info!(user_id = %user.id, "user registered");
        Ok(user)
    }

    /// Login with a username or email plus password.
    ///
    /// The identifier is treated as an email when it contains `@`. A
    /// missing account and a wrong password produce the identical
    /// failure.
    pub async fn login(&self, identifier: &str, password: &str) -> Result<LoginResponse, AuthError> {
        let credential = if identifier.contains('@') {
            self.users.find_by_email_with_password(identifier).await?
        } else {
            self.users.find_by_username_with_password(identifier).await?
        };

        let credential = credential.ok_or(AuthError::InvalidCredentials)?;

        verify_password(&Password::new(password.to_string()), &credential.password_hash)
            .map_err(|_| AuthError::InvalidCredentials)?;

        let token = self
            .jwt
            .issue(credential.user.id)
            .map_err(AuthError::Unexpected)?;

        tracing::info!(user_id = %credential.user.id, "user logged in");

        Ok(LoginResponse {
            token,
            token_type: "Bearer".to_string(),
            expires_in: self.jwt.access_token_expiry_seconds(),
            user: credential.user,
        })
    }

    /// Revoke a session token.
    ///
    /// Signature validity is a precondition, not a membership test:
    /// revoking an already-revoked token succeeds again (idempotent).
    pub async fn logout(&self, token: &str) -> Result<(), AuthError> {
        let claims = self.jwt.verify(token).map_err(|_| AuthError::InvalidToken)?;

        let remaining = claims.exp - Utc::now().timestamp();
        self.revocations
            .revoke(&claims.jti, remaining)
            .await
            .map_err(AuthError::Unexpected)?;

        tracing::info!(user_id = %claims.sub, "user logged out");
        Ok(())
    }

    /// Verify a session token and return its subject.
    ///
    /// Bad signature, expiry and revocation all collapse into the same
    /// externally visible failure, so a logged-out token is not
    /// distinguishable from a forged one.
    pub async fn verify_token(&self, token: &str) -> Result<Uuid, AuthError> {
        let claims = self.jwt.verify(token).map_err(|_| AuthError::InvalidToken)?;

        let revoked = self
            .revocations
            .is_revoked(&claims.jti)
            .await
            .map_err(AuthError::Unexpected)?;
        if revoked {
            return Err(AuthError::InvalidToken);
        }

        claims
            .sub
            .parse::<Uuid>()
            .map_err(|_| AuthError::InvalidToken)
    }
}
