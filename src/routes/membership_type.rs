//! Membership type route handlers

use super::{done, fetch_page, ok, Reply};
use crate::extract::{AppJson, AppQuery, RequestId};
use crate::models::{
    CreateMembershipTypeRequest, ListData, MembershipType, UpdateMembershipTypeRequest,
};
use crate::query::ListQuery;
use crate::state::SharedState;
use crate::store::RecordKey;
use axum::extract::{Path, State};
use tracing::info;
use validator::Validate;

pub async fn list_types(
    State(state): State<SharedState>,
    request_id: RequestId,
    AppQuery(query): AppQuery<ListQuery>,
) -> Reply<ListData<MembershipType>> {
    let data = fetch_page(state.membership_types.as_ref(), &query, &state.config.paging).await?;
    ok(data, request_id)
}

pub async fn create_type(
    State(state): State<SharedState>,
    request_id: RequestId,
    AppJson(payload): AppJson<CreateMembershipTypeRequest>,
) -> Reply<MembershipType> {
    payload.validate()?;

    let ty = state.membership_types.create(payload.into_record()).await?;
    info!("Membership type created: {} (id: {})", ty.name, ty.id);
    ok(ty, request_id)
}

pub async fn get_type(
    State(state): State<SharedState>,
    request_id: RequestId,
    Path(id): Path<String>,
) -> Reply<MembershipType> {
    ok(state.membership_types.get(&RecordKey::new(id)).await?, request_id)
}

pub async fn update_type(
    State(state): State<SharedState>,
    request_id: RequestId,
    Path(id): Path<String>,
    AppJson(payload): AppJson<UpdateMembershipTypeRequest>,
) -> Reply<MembershipType> {
    payload.validate()?;

    let ty = state.membership_types.update(&RecordKey::new(id), &payload).await?;
    info!("Membership type updated: {}", ty.id);
    ok(ty, request_id)
}

/// Cards already issued keep their copied type name and sessions.
pub async fn delete_type(
    State(state): State<SharedState>,
    request_id: RequestId,
    Path(id): Path<String>,
) -> Reply<()> {
    let removed = state.membership_types.delete(&RecordKey::new(id)).await?;
    info!("Membership type deleted: {}", removed.id);
    done(request_id)
}
