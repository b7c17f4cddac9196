use serde::Deserialize;
use service_core::config as core_config;
use service_core::error::{ApiError, ErrorCode};
use std::env;

#[derive(Debug, Clone, Deserialize)]
pub struct TaskConfig {
    #[serde(flatten)]
    pub common: core_config::Config,
    pub environment: Environment,
    pub service_name: String,
    pub service_version: String,
    pub log_level: String,
    pub jwt: JwtConfig,
    pub security: SecurityConfig,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    Dev,
    Prod,
}

#[derive(Debug, Clone, Deserialize)]
pub struct JwtConfig {
    pub secret: String,
    pub access_token_expiry_minutes: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SecurityConfig {
    pub allowed_origins: Vec<String>,
}

impl TaskConfig {
    pub fn from_env() -> Result<Self, ApiError> {
        let common = core_config::Config::load()?;

        let env_str = env::var("ENVIRONMENT").unwrap_or_else(|_| "dev".to_string());
        let environment: Environment = env_str.parse().map_err(config_error)?;

        let is_prod = environment == Environment::Prod;

        let config = TaskConfig {
            common,
            environment,
            service_name: get_env("SERVICE_NAME", Some("task-service"), is_prod)?,
            service_version: get_env("SERVICE_VERSION", Some(env!("CARGO_PKG_VERSION")), is_prod)?,
            log_level: get_env("LOG_LEVEL", Some("info"), is_prod)?,
            jwt: JwtConfig {
                // No default in production; the dev fallback keeps local
                // runs and tests self-contained.
                secret: get_env(
                    "JWT_SECRET",
                    Some("dev-only-secret-0123456789abcdefghij"),
                    is_prod,
                )?,
                access_token_expiry_minutes: get_env(
                    "JWT_ACCESS_TOKEN_EXPIRY_MINUTES",
                    Some("15"),
                    is_prod,
                )?
                .parse()
                .map_err(|e: std::num::ParseIntError| config_error(e.to_string()))?,
            },
            security: SecurityConfig {
                allowed_origins: get_env(
                    "ALLOWED_ORIGINS",
                    Some("http://localhost:3000"),
                    is_prod,
                )?
                .split(',')
                .map(|s| s.trim().to_string())
                .collect(),
            },
        };

        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ApiError> {
        if self.common.port == 0 {
            return Err(config_error("PORT must be greater than 0".to_string()));
        }

        if self.jwt.access_token_expiry_minutes <= 0 {
            return Err(config_error(
                "JWT_ACCESS_TOKEN_EXPIRY_MINUTES must be positive".to_string(),
            ));
        }

        if self.jwt.secret.len() < 32 {
            return Err(config_error(
                "JWT_SECRET must be at least 32 bytes".to_string(),
            ));
        }

        if self.environment == Environment::Prod
            && self.security.allowed_origins.iter().any(|o| o == "*")
        {
            return Err(config_error(
                "Wildcard CORS origin not allowed in production".to_string(),
            ));
        }

        Ok(())
    }
}

fn get_env(key: &str, default: Option<&str>, is_prod: bool) -> Result<String, ApiError> {
    match env::var(key) {
        Ok(val) => Ok(val),
        Err(_) => {
            if is_prod {
                Err(config_error(format!(
                    "{} is required in production but not set",
                    key
                )))
            } else if let Some(def) = default {
                Ok(def.to_string())
            } else {
                Err(config_error(format!("{} is required but not set", key)))
            }
        }
    }
}

fn config_error(message: impl std::fmt::Display) -> ApiError {
    ApiError::new(ErrorCode::InternalError, format!("Configuration error: {}", message))
}

impl std::str::FromStr for Environment {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "dev" => Ok(Environment::Dev),
            "prod" => Ok(Environment::Prod),
            _ => Err(format!("Invalid environment: {}", s)),
        }
    }
}
