//! Authentication route handlers
//!
//! Provides login, logout and current-admin endpoints.

use super::{ok, Reply};
use crate::auth::{create_token, AdminProfile, CurrentAdmin};
use crate::error::AppError;
use crate::extract::{AppJson, RequestId};
use crate::state::SharedState;
use axum::extract::State;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::{info, warn};

// ============================================
// Request/Response Types
// ============================================

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    #[serde(alias = "username", alias = "phone")]
    pub identifier: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub access_token: String,
    pub token_type: &'static str,
    pub user: AdminProfile,
}

// ============================================
// Route Handlers
// ============================================

/// POST /api/auth/login
///
/// Authenticate with identifier and password, receive a JWT.
pub async fn login(
    State(state): State<SharedState>,
    request_id: RequestId,
    AppJson(req): AppJson<LoginRequest>,
) -> Reply<LoginResponse> {
    if !state.admin.verify(&req.identifier, &req.password)? {
        warn!("Rejected login attempt for '{}'", req.identifier);
        return Err(AppError::Unauthorized(
            "Invalid username or password".to_string(),
        ));
    }

    let auth = &state.config.auth;
    let access_token = create_token(&auth.jwt_secret, auth.token_ttl_hours, &state.admin)?;
    info!("Admin {} logged in", state.admin.id);

    ok(
        LoginResponse {
            access_token,
            token_type: "Bearer",
            user: state.admin.profile(),
        },
        request_id,
    )
}

/// POST /api/auth/logout
///
/// Tokens are stateless; the client drops its copy.
pub async fn logout(CurrentAdmin(admin_id): CurrentAdmin, request_id: RequestId) -> Reply<Value> {
    info!("Admin {} logged out", admin_id);
    ok(json!({}), request_id)
}

/// GET /api/auth/currentUser
pub async fn current_user(State(state): State<SharedState>, request_id: RequestId) -> Reply<AdminProfile> {
    ok(state.admin.profile(), request_id)
}
