//! Member route handlers
//!
//! Members are addressed by numeric id or by their `uid` token.

use super::{done, fetch_page, ok, Reply};
use crate::extract::{AppJson, AppQuery, RequestId};
use crate::models::{CreateMemberRequest, ListData, Member, UpdateMemberRequest};
use crate::query::ListQuery;
use crate::state::SharedState;
use crate::store::RecordKey;
use axum::extract::{Path, State};
use tracing::info;
use validator::Validate;

/// GET /api/admin/users
pub async fn list_members(
    State(state): State<SharedState>,
    request_id: RequestId,
    AppQuery(query): AppQuery<ListQuery>,
) -> Reply<ListData<Member>> {
    let data = fetch_page(state.members.as_ref(), &query, &state.config.paging).await?;
    ok(data, request_id)
}

/// POST /api/admin/users
pub async fn create_member(
    State(state): State<SharedState>,
    request_id: RequestId,
    AppJson(payload): AppJson<CreateMemberRequest>,
) -> Reply<Member> {
    payload.validate()?;

    let member = state.members.create(payload.into_record()).await?;
    info!("Member registered: {} (id: {}, uid: {})", member.name, member.id, member.uid);
    ok(member, request_id)
}

/// GET /api/admin/users/{id}
pub async fn get_member(
    State(state): State<SharedState>,
    request_id: RequestId,
    Path(id): Path<String>,
) -> Reply<Member> {
    ok(state.members.get(&RecordKey::new(id)).await?, request_id)
}

/// PUT /api/admin/users/{id}
pub async fn update_member(
    State(state): State<SharedState>,
    request_id: RequestId,
    Path(id): Path<String>,
    AppJson(payload): AppJson<UpdateMemberRequest>,
) -> Reply<Member> {
    payload.validate()?;

    let member = state.members.update(&RecordKey::new(id), &payload).await?;
    info!("Member updated: {}", member.id);
    ok(member, request_id)
}

/// DELETE /api/admin/users/{id}
pub async fn delete_member(
    State(state): State<SharedState>,
    request_id: RequestId,
    Path(id): Path<String>,
) -> Reply<()> {
    let removed = state.members.delete(&RecordKey::new(id)).await?;
    info!("Member deleted: {} (uid: {})", removed.id, removed.uid);
    done(request_id)
}
