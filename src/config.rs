use std::net::SocketAddr;

use thiserror::Error;

pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:3000";
pub const DEFAULT_JWT_SECRET: &str = "your-secret-key-change-in-production";
pub const DEFAULT_SESSION_EXPIRATION_DAYS: i64 = 365;

#[derive(Error, Debug, PartialEq)]
pub enum ConfigError {
    #[error("Invalid value for {name}: {value}")]
    InvalidValue { name: &'static str, value: String },
}

/// Server settings read from environment variables
#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    pub bind_addr: SocketAddr,
    /// Postgres store when set, in-memory store otherwise
    pub database_url: Option<String>,
    pub jwt_secret: String,
    pub session_expiration_days: i64,
    /// Player ids allowed to start and stop any game
    pub admins: Vec<String>,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let bind_addr = lookup("BIND_ADDR").unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string());
        let bind_addr = bind_addr.parse().map_err(|_| ConfigError::InvalidValue {
            name: "BIND_ADDR",
            value: bind_addr.clone(),
        })?;

        let session_expiration_days = match lookup("SESSION_EXPIRATION_DAYS") {
            Some(value) => value.parse().map_err(|_| ConfigError::InvalidValue {
                name: "SESSION_EXPIRATION_DAYS",
                value,
            })?,
            None => DEFAULT_SESSION_EXPIRATION_DAYS,
        };

        let admins = lookup("COBM_ADMINS")
            .map(|list| {
                list.split(',')
                    .map(str::trim)
                    .filter(|id| !id.is_empty())
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default();

        Ok(Self {
            bind_addr,
            database_url: lookup("DATABASE_URL").filter(|url| !url.is_empty()),
            jwt_secret: lookup("JWT_SECRET").unwrap_or_else(|| DEFAULT_JWT_SECRET.to_string()),
            session_expiration_days,
            admins,
        })
    }
}
