//! Authentication middleware
//!
//! Extracts and validates JWT tokens from requests.

use crate::auth::{decode_token, Claims};
use crate::error::AppError;
use crate::state::SharedState;
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;
use axum::{
    extract::{FromRequestParts, Request, State},
    middleware::Next,
    response::Response,
};
use std::convert::Infallible;

fn bearer_token(headers: &axum::http::HeaderMap) -> Result<&str, AppError> {
    let auth_header = headers
        .get(AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .ok_or_else(|| AppError::Unauthorized("Missing authorization header".to_string()))?;

    auth_header
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .ok_or_else(|| AppError::Unauthorized("Invalid authorization format".to_string()))
}

/// Reject requests without a valid bearer token
pub async fn auth_middleware(
    State(state): State<SharedState>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let token = bearer_token(request.headers())?;
    let claims = decode_token(&state.config.auth.jwt_secret, token)?;

    // Insert claims into request extensions for handlers to use
    request.extensions_mut().insert(claims);

    Ok(next.run(request).await)
}

/// Id of the admin performing the request.
///
/// Taken from verified claims when the middleware ran, from a bearer token
/// when one is present and valid, and otherwise the configured admin.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CurrentAdmin(pub i64);

impl FromRequestParts<SharedState> for CurrentAdmin {
    type Rejection = Infallible;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &SharedState,
    ) -> Result<Self, Self::Rejection> {
        if let Some(claims) = parts.extensions.get::<Claims>() {
            return Ok(Self(claims.sub));
        }

        let from_token = bearer_token(&parts.headers)
            .ok()
            .and_then(|token| decode_token(&state.config.auth.jwt_secret, token).ok())
            .map(|claims| claims.sub);

        Ok(Self(from_token.unwrap_or(state.admin.id)))
    }
}
