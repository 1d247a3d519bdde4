//! JWT token management
//!
//! Handles creation and validation of admin access tokens.

use super::AdminAccount;
use crate::error::AppError;
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

/// JWT claims
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    /// Subject (admin ID)
    pub sub: i64,
    /// Display name
    pub name: String,
    /// Expiration time (Unix timestamp)
    pub exp: i64,
    /// Issued at (Unix timestamp)
    pub iat: i64,
}

/// Create an access token for the admin
pub fn create_token(secret: &str, ttl_hours: i64, admin: &AdminAccount) -> Result<String, AppError> {
    let now = Utc::now();
    let expires_at = Duration::try_hours(ttl_hours)
        .and_then(|ttl| now.checked_add_signed(ttl))
        .ok_or_else(|| AppError::Internal(format!("Token lifetime of {} hours is out of range", ttl_hours)))?;

    let claims = Claims {
        sub: admin.id,
        name: admin.name.clone(),
        exp: expires_at.timestamp(),
        iat: now.timestamp(),
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(|e| AppError::Internal(format!("Failed to create access token: {}", e)))
}

/// Decode and validate a JWT token
pub fn decode_token(secret: &str, token: &str) -> Result<Claims, AppError> {
    let token_data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )
    .map_err(|e| match e.kind() {
        jsonwebtoken::errors::ErrorKind::ExpiredSignature => {
            AppError::Unauthorized("Token expired".to_string())
        }
        jsonwebtoken::errors::ErrorKind::InvalidToken => {
            AppError::Unauthorized("Invalid token".to_string())
        }
        _ => AppError::Unauthorized(format!("Token validation failed: {}", e)),
    })?;

    Ok(token_data.claims)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AuthConfig;

    fn admin() -> AdminAccount {
        AdminAccount::from_config(&AuthConfig {
            bcrypt_cost: 4,
            ..AuthConfig::default()
        })
        .unwrap()
    }

    #[test]
    fn test_token_round_trips_subject() {
        let token = create_token("secret", 1, &admin()).unwrap();
        let claims = decode_token("secret", &token).unwrap();
        assert_eq!(claims.sub, super::super::ADMIN_ID);
        assert!(claims.exp > claims.iat);
    }

    #[test]
    fn test_lifetime_past_calendar_limit_is_an_error() {
        assert!(matches!(
            create_token("secret", 10_000_000_000, &admin()),
            Err(AppError::Internal(_))
        ));
        assert!(create_token("secret", i64::MAX, &admin()).is_err());
    }

    #[test]
    fn test_wrong_secret_is_unauthorized() {
        let token = create_token("secret", 1, &admin()).unwrap();
        assert!(matches!(
            decode_token("other", &token),
            Err(AppError::Unauthorized(_))
        ));
    }
}
