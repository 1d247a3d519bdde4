//! Authentication module
//!
//! A single configured administrator logs in with an identifier and password
//! and receives a JWT bearer token.

mod jwt;
mod middleware;
mod password;

pub use jwt::{create_token, decode_token, Claims};
pub use middleware::{auth_middleware, CurrentAdmin};
pub use password::{hash_password, verify_password};

use crate::config::AuthConfig;
use crate::error::AppError;
use serde::Serialize;

/// Id reported for the administrator in tokens and activity logs.
pub const ADMIN_ID: i64 = 999;

const ADMIN_AVATAR: &str = "https://gw.alipayobjects.com/zos/rmsportal/KDpgvguMpGfqaHPjicRK.svg";

/// The administrator account, with its password already hashed.
#[derive(Debug, Clone)]
pub struct AdminAccount {
    pub id: i64,
    pub name: String,
    pub identifier: String,
    password_hash: String,
}

impl AdminAccount {
    pub fn from_config(config: &AuthConfig) -> Result<Self, AppError> {
        Ok(Self {
            id: ADMIN_ID,
            name: config.admin_name.clone(),
            identifier: config.admin_identifier.clone(),
            password_hash: hash_password(&config.admin_password, config.bcrypt_cost)?,
        })
    }

    /// Check a login attempt. Identifier comparison ignores surrounding space.
    pub fn verify(&self, identifier: &str, password: &str) -> Result<bool, AppError> {
        if identifier.trim() != self.identifier {
            return Ok(false);
        }
        verify_password(password, &self.password_hash)
    }

    pub fn profile(&self) -> AdminProfile {
        AdminProfile {
            id: self.id,
            name: self.name.clone(),
            mobile: self.identifier.clone(),
            avatar: ADMIN_AVATAR.to_string(),
            status: "active",
            access: "admin",
        }
    }
}

/// Public view of the administrator returned by login and `currentUser`.
#[derive(Debug, Clone, Serialize)]
pub struct AdminProfile {
    pub id: i64,
    pub name: String,
    pub mobile: String,
    pub avatar: String,
    pub status: &'static str,
    pub access: &'static str,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn account() -> AdminAccount {
        let config = AuthConfig {
            bcrypt_cost: 4,
            ..AuthConfig::default()
        };
        AdminAccount::from_config(&config).unwrap()
    }

    #[test]
    fn test_verify_accepts_configured_credentials() {
        let admin = account();
        assert!(admin.verify(" admin ", "admin123").unwrap());
        assert!(!admin.verify("admin", "admin124").unwrap());
        assert!(!admin.verify("root", "admin123").unwrap());
    }

    #[test]
    fn test_profile_does_not_leak_hash() {
        let profile = serde_json::to_value(account().profile()).unwrap();
        assert_eq!(profile["id"], ADMIN_ID);
        assert!(profile.get("password_hash").is_none());
    }
}
