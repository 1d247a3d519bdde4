//! Application configuration module
//!
//! Handles loading and validating configuration from environment variables.

use crate::query::{DEFAULT_LIMIT, MAX_LIMIT};
use serde::Deserialize;
use std::net::Ipv4Addr;
use std::path::PathBuf;
use std::str::FromStr;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid configuration value: {0}")]
    InvalidValue(String),
}

/// Server configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub host: Ipv4Addr,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: Ipv4Addr::new(0, 0, 0, 0), // Bind to 0.0.0.0 for Docker
            port: 3000,
        }
    }
}

/// CORS configuration
#[derive(Debug, Clone, Deserialize)]
pub struct CorsConfig {
    pub allowed_origins: Vec<String>,
}

impl Default for CorsConfig {
    fn default() -> Self {
        Self {
            allowed_origins: vec!["http://localhost:8000".to_string()],
        }
    }
}

/// Longest accepted token lifetime: one year.
pub const MAX_TOKEN_TTL_HOURS: i64 = 24 * 366;

/// Admin login and token settings
#[derive(Debug, Clone, Deserialize)]
pub struct AuthConfig {
    pub jwt_secret: String,
    pub token_ttl_hours: i64,
    /// Phone number or username the admin logs in with.
    pub admin_identifier: String,
    pub admin_name: String,
    pub admin_password: String,
    pub bcrypt_cost: u32,
    /// Gate `/api/admin/*` behind a bearer token.
    pub required: bool,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            jwt_secret: "gym-admin-dev-secret-change-in-production".to_string(),
            token_ttl_hours: 24,
            admin_identifier: "admin".to_string(),
            admin_name: "Administrator".to_string(),
            admin_password: "admin123".to_string(),
            bcrypt_cost: bcrypt::DEFAULT_COST,
            required: false,
        }
    }
}

/// List paging limits
#[derive(Debug, Clone, Deserialize)]
pub struct PagingConfig {
    pub default_limit: usize,
    pub max_limit: usize,
}

impl Default for PagingConfig {
    fn default() -> Self {
        Self {
            default_limit: DEFAULT_LIMIT,
            max_limit: MAX_LIMIT,
        }
    }
}

/// Upload and seed-data settings
#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    pub upload_dir: PathBuf,
    pub max_upload_bytes: usize,
    /// Load demo records at startup.
    pub seed_data: bool,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            upload_dir: PathBuf::from("uploads"),
            max_upload_bytes: 5 * 1024 * 1024,
            seed_data: true,
        }
    }
}

/// Complete application settings
#[derive(Debug, Clone, Default)]
pub struct Settings {
    pub server: ServerConfig,
    pub cors: CorsConfig,
    pub auth: AuthConfig,
    pub paging: PagingConfig,
    pub storage: StorageConfig,
}

impl Settings {
    /// Load settings from environment variables
    pub fn load() -> Result<Self, ConfigError> {
        // Load .env file if it exists (ignore errors if file not found)
        let _ = dotenvy::dotenv();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build settings from any key lookup. Unset keys keep their defaults,
    /// set-but-malformed keys are an error.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let var = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let server = ServerConfig {
            host: parse_or(var("HOST"), "HOST", defaults.server.host)?,
            port: parse_or(var("PORT"), "PORT", defaults.server.port)?,
        };

        let cors = CorsConfig {
            allowed_origins: var("ALLOWED_ORIGINS")
                .map(|s| s.split(',').map(|s| s.trim().to_string()).collect())
                .unwrap_or(defaults.cors.allowed_origins),
        };

        let auth = AuthConfig {
            jwt_secret: var("JWT_SECRET").unwrap_or(defaults.auth.jwt_secret),
            token_ttl_hours: parse_or(
                var("TOKEN_TTL_HOURS"),
                "TOKEN_TTL_HOURS",
                defaults.auth.token_ttl_hours,
            )?,
            admin_identifier: var("ADMIN_IDENTIFIER").unwrap_or(defaults.auth.admin_identifier),
            admin_name: var("ADMIN_NAME").unwrap_or(defaults.auth.admin_name),
            admin_password: var("ADMIN_PASSWORD").unwrap_or(defaults.auth.admin_password),
            bcrypt_cost: parse_or(var("BCRYPT_COST"), "BCRYPT_COST", defaults.auth.bcrypt_cost)?,
            required: parse_flag(var("AUTH_REQUIRED"), "AUTH_REQUIRED", defaults.auth.required)?,
        };
        if !(1..=MAX_TOKEN_TTL_HOURS).contains(&auth.token_ttl_hours) {
            return Err(ConfigError::InvalidValue(format!(
                "TOKEN_TTL_HOURS must be between 1 and {}",
                MAX_TOKEN_TTL_HOURS
            )));
        }
        if !(4..=31).contains(&auth.bcrypt_cost) {
            return Err(ConfigError::InvalidValue(
                "BCRYPT_COST must be between 4 and 31".to_string(),
            ));
        }

        let paging = PagingConfig {
            default_limit: parse_or(
                var("DEFAULT_PAGE_SIZE"),
                "DEFAULT_PAGE_SIZE",
                defaults.paging.default_limit,
            )?,
            max_limit: parse_or(var("MAX_PAGE_SIZE"), "MAX_PAGE_SIZE", defaults.paging.max_limit)?,
        };
        if paging.default_limit == 0 || paging.max_limit < paging.default_limit {
            return Err(ConfigError::InvalidValue(
                "DEFAULT_PAGE_SIZE must be positive and not above MAX_PAGE_SIZE".to_string(),
            ));
        }

        let storage = StorageConfig {
            upload_dir: var("UPLOAD_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.storage.upload_dir),
            max_upload_bytes: parse_or(
                var("MAX_UPLOAD_BYTES"),
                "MAX_UPLOAD_BYTES",
                defaults.storage.max_upload_bytes,
            )?,
            seed_data: parse_flag(var("SEED_DATA"), "SEED_DATA", defaults.storage.seed_data)?,
        };

        Ok(Self {
            server,
            cors,
            auth,
            paging,
            storage,
        })
    }
}

fn parse_or<T: FromStr>(raw: Option<String>, key: &str, default: T) -> Result<T, ConfigError> {
    match raw {
        Some(raw) => raw
            .parse()
            .map_err(|_| ConfigError::InvalidValue(format!("{} has invalid value '{}'", key, raw))),
        None => Ok(default),
    }
}

fn parse_flag(raw: Option<String>, key: &str, default: bool) -> Result<bool, ConfigError> {
    match raw.as_deref().map(str::to_ascii_lowercase).as_deref() {
        None => Ok(default),
        Some("1" | "true" | "yes" | "on") => Ok(true),
        Some("0" | "false" | "no" | "off") => Ok(false),
        Some(other) => Err(ConfigError::InvalidValue(format!(
            "{} has invalid value '{}'",
            key, other
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn load(pairs: &[(&str, &str)]) -> Result<Settings, ConfigError> {
        let env: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Settings::from_lookup(|key| env.get(key).cloned())
    }

    #[test]
    fn test_default_server_config() {
        let config = ServerConfig::default();
        assert_eq!(config.host, Ipv4Addr::new(0, 0, 0, 0));
        assert_eq!(config.port, 3000);
    }

    #[test]
    fn test_empty_environment_uses_defaults() {
        let settings = load(&[]).unwrap();
        assert_eq!(settings.paging.default_limit, 10);
        assert_eq!(settings.paging.max_limit, 100);
        assert!(!settings.auth.required);
        assert!(settings.storage.seed_data);
    }

    #[test]
    fn test_overrides_are_applied() {
        let settings = load(&[
            ("PORT", "8080"),
            ("ALLOWED_ORIGINS", "http://a.test, http://b.test"),
            ("AUTH_REQUIRED", "true"),
            ("SEED_DATA", "0"),
            ("MAX_PAGE_SIZE", "50"),
        ])
        .unwrap();

        assert_eq!(settings.server.port, 8080);
        assert_eq!(settings.cors.allowed_origins, vec!["http://a.test", "http://b.test"]);
        assert!(settings.auth.required);
        assert!(!settings.storage.seed_data);
        assert_eq!(settings.paging.max_limit, 50);
    }

    #[test]
    fn test_malformed_values_are_rejected() {
        assert!(load(&[("PORT", "eighty")]).is_err());
        assert!(load(&[("AUTH_REQUIRED", "maybe")]).is_err());
        assert!(load(&[("DEFAULT_PAGE_SIZE", "200"), ("MAX_PAGE_SIZE", "100")]).is_err());
        assert!(load(&[("BCRYPT_COST", "2")]).is_err());
    }

    #[test]
    fn test_token_ttl_is_bounded() {
        assert!(load(&[("TOKEN_TTL_HOURS", "0")]).is_err());
        assert!(load(&[("TOKEN_TTL_HOURS", "10000000000")]).is_err());

        let settings = load(&[("TOKEN_TTL_HOURS", "8784")]).unwrap();
        assert_eq!(settings.auth.token_ttl_hours, MAX_TOKEN_TTL_HOURS);
    }
}
