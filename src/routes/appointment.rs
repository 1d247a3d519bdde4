//! Appointment route handlers

use super::{done, fetch_page, ok, Reply};
use crate::extract::{optional_json, AppJson, AppQuery, RequestId};
use crate::models::{
    Appointment, CancelAppointmentRequest, CreateAppointmentRequest, ListData,
    SystemSettings, UpdateAppointmentRequest,
};
use crate::query::ListQuery;
use crate::state::SharedState;
use crate::store::RecordKey;
use axum::body::Bytes;
use axum::extract::{Path, State};
use tracing::info;
use validator::Validate;

/// GET /api/admin/appointments
pub async fn list_appointments(
    State(state): State<SharedState>,
    request_id: RequestId,
    AppQuery(query): AppQuery<ListQuery>,
) -> Reply<ListData<Appointment>> {
    let data = fetch_page(state.appointments.as_ref(), &query, &state.config.paging).await?;
    ok(data, request_id)
}

/// POST /api/admin/appointments
///
/// Without an explicit end the slot lasts `appointment_duration` minutes
/// from the current system settings.
pub async fn create_appointment(
    State(state): State<SharedState>,
    request_id: RequestId,
    AppJson(payload): AppJson<CreateAppointmentRequest>,
) -> Reply<Appointment> {
    payload.validate()?;

    let minutes = state
        .system_settings
        .appointment_minutes()
        .await
        .unwrap_or_else(|| SystemSettings::default().appointment_duration);
    let appointment = state
        .appointments
        .create(payload.into_record(minutes)?)
        .await?;

    info!(
        "Appointment {} booked: coach {} for membership {} at {}",
        appointment.id, appointment.coach_id, appointment.membership_id, appointment.appointment_start
    );
    ok(appointment, request_id)
}

/// GET /api/admin/appointments/{id}
pub async fn get_appointment(
    State(state): State<SharedState>,
    request_id: RequestId,
    Path(id): Path<String>,
) -> Reply<Appointment> {
    ok(state.appointments.get(&RecordKey::new(id)).await?, request_id)
}

/// PUT /api/admin/appointments/{id}
pub async fn update_appointment(
    State(state): State<SharedState>,
    request_id: RequestId,
    Path(id): Path<String>,
    AppJson(payload): AppJson<UpdateAppointmentRequest>,
) -> Reply<Appointment> {
    let patch = payload.resolve()?;
    let key = RecordKey::new(id);
    patch.check_slot(&state.appointments.get(&key).await?)?;

    let appointment = state.appointments.update(&key, &patch).await?;
    info!("Appointment updated: {} ({:?})", appointment.id, appointment.status);
    ok(appointment, request_id)
}

/// PUT /api/admin/appointments/{id}/cancel
pub async fn cancel_appointment(
    State(state): State<SharedState>,
    request_id: RequestId,
    Path(id): Path<String>,
    body: Bytes,
) -> Reply<Appointment> {
    let payload: CancelAppointmentRequest = optional_json(&body)?;

    let appointment = state.appointments.update(&RecordKey::new(id), &payload).await?;
    info!("Appointment cancelled: {}", appointment.id);
    ok(appointment, request_id)
}

/// DELETE /api/admin/appointments/{id}
pub async fn delete_appointment(
    State(state): State<SharedState>,
    request_id: RequestId,
    Path(id): Path<String>,
) -> Reply<()> {
    let removed = state.appointments.delete(&RecordKey::new(id)).await?;
    info!("Appointment deleted: {}", removed.id);
    done(request_id)
}
