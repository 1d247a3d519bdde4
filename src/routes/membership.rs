//! Membership card route handlers
//!
//! Issuing and revoking a card each append an activity log entry. The log
//! write is separate from the card write; a failed log is reported but does
//! not undo the card change.

use super::{fetch_page, ok, Reply};
use crate::auth::CurrentAdmin;
use crate::error::validation_error;
use crate::extract::{optional_json, AppJson, AppQuery, RequestId};
use crate::models::{
    IssueMembershipRequest, ListData, LogEntry, Membership, RevokeMembershipRequest,
};
use crate::query::ListQuery;
use crate::state::{AppState, SharedState};
use crate::store::RecordKey;
use axum::body::Bytes;
use axum::extract::{Path, State};
use tracing::{info, warn};
use validator::Validate;

async fn record_activity(state: &AppState, entry: LogEntry) {
    let message = entry.message.clone();
    if let Err(e) = state.logs.create(entry).await {
        warn!("Failed to record activity '{}': {}", message, e);
    }
}

/// GET /api/admin/memberships
pub async fn list_memberships(
    State(state): State<SharedState>,
    request_id: RequestId,
    AppQuery(query): AppQuery<ListQuery>,
) -> Reply<ListData<Membership>> {
    let data = fetch_page(state.memberships.as_ref(), &query, &state.config.paging).await?;
    ok(data, request_id)
}

/// POST /api/admin/memberships
pub async fn issue_membership(
    State(state): State<SharedState>,
    CurrentAdmin(admin_id): CurrentAdmin,
    request_id: RequestId,
    AppJson(payload): AppJson<IssueMembershipRequest>,
) -> Reply<Membership> {
    payload.validate()?;

    let member_key = payload
        .uid
        .as_ref()
        .map(RecordKey::from)
        .ok_or_else(|| validation_error("uid is required"))?;
    let type_key = payload
        .type_id
        .as_ref()
        .map(RecordKey::from)
        .ok_or_else(|| validation_error("type_id is required"))?;
    let member = state.members.get(&member_key).await?;
    let ty = state.membership_types.get(&type_key).await?;

    let card = state.memberships.create(payload.build(&member, &ty)?).await?;
    info!(
        "Membership {} issued to member {} ({}) by admin {}",
        card.id, member.id, ty.name, admin_id
    );

    record_activity(&state, LogEntry::membership_issued(&card, admin_id)).await;
    ok(card, request_id)
}

/// GET /api/admin/memberships/{id}
pub async fn get_membership(
    State(state): State<SharedState>,
    request_id: RequestId,
    Path(id): Path<String>,
) -> Reply<Membership> {
    ok(state.memberships.get(&RecordKey::new(id)).await?, request_id)
}

/// PUT /api/admin/memberships/{id}/revoke
pub async fn revoke_membership(
    State(state): State<SharedState>,
    CurrentAdmin(admin_id): CurrentAdmin,
    request_id: RequestId,
    Path(id): Path<String>,
    body: Bytes,
) -> Reply<Membership> {
    let payload: RevokeMembershipRequest = optional_json(&body)?;

    let card = state.memberships.update(&RecordKey::new(id), &payload).await?;
    info!("Membership {} revoked by admin {}", card.id, admin_id);

    record_activity(&state, LogEntry::membership_revoked(&card, admin_id)).await;
    ok(card, request_id)
}
