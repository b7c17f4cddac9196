use crate::error::{ApiError, ErrorCode};
use config::{Config as Cfg, File};
use serde::Deserialize;

/// Base configuration shared by every service binary.
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

impl Config {
    pub fn load() -> Result<Self, ApiError> {
        dotenvy::dotenv().ok();

        let config = Cfg::builder()
            .add_source(File::with_name("configuration").required(false))
            .add_source(config::Environment::with_prefix("APP").separator("__"))
            .build()
            .map_err(|e| config_error(e.into()))?;

        config.try_deserialize().map_err(|e| config_error(e.into()))
    }
}

fn config_error(err: anyhow::Error) -> ApiError {
    ApiError {
        code: ErrorCode::InternalError,
        message: "Configuration error".to_string(),
        source: Some(err),
    }
}
