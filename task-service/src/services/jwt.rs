use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::config::JwtConfig;

/// Token issuer/verifier for session tokens.
#[derive(Clone)]
pub struct JwtService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    access_token_expiry_minutes: i64,
}

/// Claims embedded in a session token. Verifiable data only: the subject
/// id, the timestamps and a token id for revocation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessTokenClaims {
    /// Subject (user ID)
    pub sub: String,
    /// Expiration time (Unix timestamp)
    pub exp: i64,
    /// Issued at (Unix timestamp)
    pub iat: i64,
    /// Token ID (revocation key)
    pub jti: String,
}

/// Coarse verification failure. Expiry is a distinguishable sub-case of
/// invalid; neither carries library detail.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenError {
    Expired,
    Invalid,
}

impl JwtService {
    pub fn new(config: &JwtConfig) -> Result<Self, anyhow::Error> {
        if config.secret.len() < 32 {
            return Err(anyhow::anyhow!(
                "JWT secret must be at least 32 bytes, got {}",
                config.secret.len()
            ));
        }

        Ok(Self {
            encoding_key: EncodingKey::from_secret(config.secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(config.secret.as_bytes()),
            access_token_expiry_minutes: config.access_token_expiry_minutes,
        })
    }

    /// Issue a signed session token for a subject.
    ///
    /// The embedded `jti` makes every issued token distinct even for the
    /// same subject within the same second.
    pub fn issue(&self, subject: Uuid) -> Result<String, anyhow::Error> {
        let now = Utc::now();
        let exp = now + Duration::minutes(self.access_token_expiry_minutes);

        let claims = AccessTokenClaims {
            sub: subject.to_string(),
            exp: exp.timestamp(),
            iat: now.timestamp(),
            jti: Uuid::new_v4().to_string(),
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| anyhow::anyhow!("Failed to encode session token: {}", e))
    }

    /// Verify signature and expiry, returning the claims.
    pub fn verify(&self, token: &str) -> Result<AccessTokenClaims, TokenError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = true;
        validation.leeway = 0;

        match decode::<AccessTokenClaims>(token, &self.decoding_key, &validation) {
            Ok(data) => Ok(data.claims),
            Err(e) => match e.kind() {
                jsonwebtoken::errors::ErrorKind::ExpiredSignature => Err(TokenError::Expired),
                _ => Err(TokenError::Invalid),
            },
        }
    }

    pub fn access_token_expiry_seconds(&self) -> i64 {
        self.access_token_expiry_minutes * 60
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_config(expiry_minutes: i64) -> JwtConfig {
        JwtConfig {
            secret: "0123456789abcdef0123456789abcdef".to_string(),
            access_token_expiry_minutes: expiry_minutes,
        }
    }

    #[test]
    fn short_secret_is_rejected() {
        let config = JwtConfig {
            secret: "tooshort".to_string(),
            access_token_expiry_minutes: 15,
        };
        assert!(JwtService::new(&config).is_err());
    }

    #[test]
    fn issue_then_verify_returns_subject() {
        let service = JwtService::new(&test_config(15)).unwrap();
        let subject = Uuid::new_v4();

        let token = service.issue(subject).unwrap();
        assert!(!token.is_empty());

        let claims = service.verify(&token).unwrap();
        assert_eq!(claims.sub, subject.to_string());
        assert!(!claims.jti.is_empty());
    }

    #[test]
    fn repeated_issues_produce_distinct_tokens() {
        let service = JwtService::new(&test_config(15)).unwrap();
        let subject = Uuid::new_v4();
        assert_ne!(service.issue(subject).unwrap(), service.issue(subject).unwrap());
    }

    #[test]
    fn tampered_token_is_invalid() {
        let service = JwtService::new(&test_config(15)).unwrap();
        let mut token = service.issue(Uuid::new_v4()).unwrap();
        token.pop();
        token.push('A');
        assert_eq!(service.verify(&token), Err(TokenError::Invalid));
    }

    #[test]
    fn token_from_other_key_is_invalid() {
        let issuer = JwtService::new(&test_config(15)).unwrap();
        let verifier = JwtService::new(&JwtConfig {
            secret: "ffffffffffffffffffffffffffffffff".to_string(),
            access_token_expiry_minutes: 15,
        })
        .unwrap();

        let token = issuer.issue(Uuid::new_v4()).unwrap();
        assert_eq!(verifier.verify(&token), Err(TokenError::Invalid));
    }

    #[test]
    fn expired_token_reports_expiry() {
        let service = JwtService::new(&test_config(-10)).unwrap();
        let token = service.issue(Uuid::new_v4()).unwrap();
        assert_eq!(service.verify(&token), Err(TokenError::Expired));
    }

    #[test]
    fn garbage_is_invalid_not_expired() {
        let service = JwtService::new(&test_config(15)).unwrap();
        assert_eq!(service.verify(""), Err(TokenError::Invalid));
        assert_eq!(service.verify("not.a.token"), Err(TokenError::Invalid));
    }
}
