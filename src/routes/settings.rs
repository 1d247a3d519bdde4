//! System settings route handlers

use super::{ok, Reply};
use crate::extract::{AppJson, RequestId};
use crate::state::SharedState;
use axum::extract::State;
use serde_json::{Map, Value};
use tracing::info;

/// GET /api/admin/settings
pub async fn get_settings(
    State(state): State<SharedState>,
    request_id: RequestId,
) -> Reply<Map<String, Value>> {
    ok(state.system_settings.get().await, request_id)
}

/// PUT /api/admin/settings
///
/// Shallow merge; the full document is returned.
pub async fn update_settings(
    State(state): State<SharedState>,
    request_id: RequestId,
    AppJson(patch): AppJson<Value>,
) -> Reply<Map<String, Value>> {
    let keys: Vec<String> = patch
        .as_object()
        .map(|m| m.keys().cloned().collect())
        .unwrap_or_default();

    let settings = state.system_settings.merge(patch).await?;
    info!("System settings updated: {}", keys.join(", "));
    ok(settings, request_id)
}
