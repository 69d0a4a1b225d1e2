//! Environment-driven configuration.
//!
//! Every value is read once at startup. Missing required variables and
//! unparsable values are reported as [`ConfigError`] so the binaries can
//! exit with a readable message instead of panicking.

use std::net::{IpAddr, Ipv4Addr};
use std::str::FromStr;

use axum::http::HeaderValue;

use crate::auth::jwt::JwtConfig;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),

    #[error("{name} has an invalid value '{value}'")]
    Invalid { name: &'static str, value: String },

    #[error("{name} must be at least {min} bytes long")]
    TooShort { name: &'static str, min: usize },
}

/// Read a required, non-empty variable.
pub fn required(name: &'static str) -> Result<String, ConfigError> {
    match std::env::var(name) {
        Ok(value) if !value.trim().is_empty() => Ok(value),
        _ => Err(ConfigError::Missing(name)),
    }
}

/// Read and parse an optional variable, falling back to `default` when unset.
pub fn parsed_or<T: FromStr>(name: &'static str, default: T) -> Result<T, ConfigError> {
    match std::env::var(name) {
        Ok(raw) => raw.trim().parse().map_err(|_| ConfigError::Invalid { name, value: raw }),
        Err(_) => Ok(default),
    }
}

/// Connection settings shared by the server and the `create-admin` tool.
#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
}

impl DatabaseConfig {
    /// `DATABASE_URL` (required) and `DB_MAX_CONNECTIONS` (default `20`).
    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            url: required("DATABASE_URL")?,
            max_connections: parsed_or("DB_MAX_CONNECTIONS", 20)?,
        })
    }
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: IpAddr,
    pub port: u16,
    /// Origins allowed by the CORS layer, validated as header values.
    pub cors_origins: Vec<HeaderValue>,
    pub request_timeout_secs: u64,
    /// Upper bound on draining the connection pool after the listener stops.
    pub shutdown_timeout_secs: u64,
    pub database: DatabaseConfig,
    pub jwt: JwtConfig,
}

impl ServerConfig {
    /// | Env Var                 | Default                 |
    /// |-------------------------|-------------------------|
    /// | `HOST`                  | `0.0.0.0`               |
    /// | `PORT`                  | `3000`                  |
    /// | `CORS_ORIGINS`          | `http://localhost:5173` |
    /// | `REQUEST_TIMEOUT_SECS`  | `30`                    |
    /// | `SHUTDOWN_TIMEOUT_SECS` | `30`                    |
    ///
    /// plus the variables read by [`DatabaseConfig::from_env`] and
    /// [`JwtConfig::from_env`].
    pub fn from_env() -> Result<Self, ConfigError> {
        let cors_raw = std::env::var("CORS_ORIGINS")
            .unwrap_or_else(|_| "http://localhost:5173".to_string());

        Ok(Self {
            host: parsed_or("HOST", IpAddr::V4(Ipv4Addr::UNSPECIFIED))?,
            port: parsed_or("PORT", 3000)?,
            cors_origins: parse_origins(&cors_raw)?,
            request_timeout_secs: parsed_or("REQUEST_TIMEOUT_SECS", 30)?,
            shutdown_timeout_secs: parsed_or("SHUTDOWN_TIMEOUT_SECS", 30)?,
            database: DatabaseConfig::from_env()?,
            jwt: JwtConfig::from_env()?,
        })
    }
}

/// Split a comma-separated origin list, skipping blanks.
fn parse_origins(raw: &str) -> Result<Vec<HeaderValue>, ConfigError> {
    raw.split(',')
        .map(str::trim)
        .filter(|origin| !origin.is_empty())
        .map(|origin| {
            HeaderValue::from_str(origin).map_err(|_| ConfigError::Invalid {
                name: "CORS_ORIGINS",
                value: origin.to_string(),
            })
        })
        .collect()
}
