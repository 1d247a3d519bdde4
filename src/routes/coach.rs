//! Coach route handlers

use super::{done, fetch_page, ok, Reply};
use crate::extract::{AppJson, AppQuery, RequestId};
use crate::models::{AvatarPatch, Coach, CreateCoachRequest, ListData, UpdateCoachRequest};
use crate::query::ListQuery;
use crate::state::SharedState;
use crate::store::RecordKey;
use crate::uploads::store_image_field;
use axum::extract::{multipart::MultipartRejection, Multipart, Path, State};
use tracing::info;
use validator::Validate;

/// GET /api/admin/coaches
pub async fn list_coaches(
    State(state): State<SharedState>,
    request_id: RequestId,
    AppQuery(query): AppQuery<ListQuery>,
) -> Reply<ListData<Coach>> {
    let data = fetch_page(state.coaches.as_ref(), &query, &state.config.paging).await?;
    ok(data, request_id)
}

/// POST /api/admin/coaches
pub async fn create_coach(
    State(state): State<SharedState>,
    request_id: RequestId,
    AppJson(payload): AppJson<CreateCoachRequest>,
) -> Reply<Coach> {
    payload.validate()?;

    let coach = state.coaches.create(payload.into_record()).await?;
    info!("Coach created: {} (id: {})", coach.name, coach.id);
    ok(coach, request_id)
}

/// GET /api/admin/coaches/{id}
pub async fn get_coach(
    State(state): State<SharedState>,
    request_id: RequestId,
    Path(id): Path<String>,
) -> Reply<Coach> {
    let coach = state.coaches.get(&RecordKey::new(id)).await?;
    ok(coach, request_id)
}

/// PUT /api/admin/coaches/{id}
pub async fn update_coach(
    State(state): State<SharedState>,
    request_id: RequestId,
    Path(id): Path<String>,
    AppJson(payload): AppJson<UpdateCoachRequest>,
) -> Reply<Coach> {
    payload.validate()?;

    let coach = state.coaches.update(&RecordKey::new(id), &payload).await?;
    info!("Coach updated: {}", coach.id);
    ok(coach, request_id)
}

/// DELETE /api/admin/coaches/{id}
pub async fn delete_coach(
    State(state): State<SharedState>,
    request_id: RequestId,
    Path(id): Path<String>,
) -> Reply<()> {
    let removed = state.coaches.delete(&RecordKey::new(id)).await?;
    info!("Coach deleted: {}", removed.id);
    done(request_id)
}

/// PUT /api/admin/coaches/{id}/avatar
///
/// Multipart body with the image in the `avatar` field.
pub async fn upload_avatar(
    State(state): State<SharedState>,
    request_id: RequestId,
    Path(id): Path<String>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Reply<Coach> {
    let multipart = multipart?;
    let key = RecordKey::new(id);
    // 404 before anything is written to disk
    state.coaches.get(&key).await?;

    let url = store_image_field(multipart, "avatar", &state.config.storage.upload_dir, "avatars").await?;
    let coach = state.coaches.update(&key, &AvatarPatch(url)).await?;
    info!("Coach {} avatar replaced with {}", coach.id, coach.avatar);
    ok(coach, request_id)
}
