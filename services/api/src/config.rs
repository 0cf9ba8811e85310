//! services/api/src/config.rs
//!
//! Defines the application's configuration structure and loading logic.
//!
//! All configuration is loaded from environment variables at startup. The
//! `.env` file is used for local development.

use std::net::SocketAddr;
use tracing::Level;

/// A custom error type for configuration loading failures.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing the environment variable {0}")]
    MissingVar(String),
    #[error("Invalid value for the environment variable {0}: {1}")]
    InvalidValue(String, String),
}

/// Holds all configuration loaded from the environment at startup.
#[derive(Clone, Debug)]
pub struct Config {
    pub bind_address: SocketAddr,
    /// API root of the upstream CMS backend, e.g. `https://cms.example.com/api`.
    pub upstream_base_url: String,
    /// Base URL persisted image paths are resolved against for display.
    /// Defaults to the API root when the backend serves its own media.
    pub upstream_public_url: String,
    /// Bearer credential attached to every upstream request. Credential
    /// lifecycle is out of scope here; this is just passed through.
    pub upstream_api_token: Option<String>,
    pub log_level: Level,
    pub allowed_origin: String,
    pub max_upload_bytes: usize,
}

impl Config {
    /// Loads configuration from environment variables.
    ///
    /// It will look for a `.env` file in the current directory for
    /// development, but this is skipped in test environments to ensure tests
    /// are hermetic.
    pub fn from_env() -> Result<Self, ConfigError> {
        if !cfg!(test) {
            dotenvy::dotenv().ok();
        }

        let bind_address_str =
            std::env::var("BIND_ADDRESS").unwrap_or_else(|_| "0.0.0.0:8080".to_string());
        let bind_address = bind_address_str
            .parse::<SocketAddr>()
            .map_err(|e| ConfigError::InvalidValue("BIND_ADDRESS".to_string(), e.to_string()))?;

        let upstream_base_url = std::env::var("UPSTREAM_BASE_URL")
            .map_err(|_| ConfigError::MissingVar("UPSTREAM_BASE_URL".to_string()))?;

        let upstream_public_url = std::env::var("UPSTREAM_PUBLIC_URL")
            .unwrap_or_else(|_| upstream_base_url.clone());

        let upstream_api_token = std::env::var("UPSTREAM_API_TOKEN").ok();

        let log_level_str = std::env::var("RUST_LOG").unwrap_or_else(|_| "INFO".to_string());
        let log_level = log_level_str.parse::<Level>().map_err(|_| {
            ConfigError::InvalidValue(
                "RUST_LOG".to_string(),
                format!("'{}' is not a valid log level", log_level_str),
            )
        })?;

        let allowed_origin = std::env::var("ALLOWED_ORIGIN")
            .unwrap_or_else(|_| "http://localhost:3000".to_string());

        let max_upload_bytes = match std::env::var("MAX_UPLOAD_BYTES") {
            Ok(raw) => raw.parse::<usize>().map_err(|e| {
                ConfigError::InvalidValue("MAX_UPLOAD_BYTES".to_string(), e.to_string())
            })?,
            Err(_) => 10 * 1024 * 1024,
        };

        Ok(Self {
            bind_address,
            upstream_base_url,
            upstream_public_url,
            upstream_api_token,
            log_level,
            allowed_origin,
            max_upload_bytes,
        })
    }
}
