//! Coaching appointments

use crate::error::AppError;
use crate::query::time::parse_timestamp;
use crate::query::{Filter, ListQuery, Searchable};
use crate::store::{Patch, Record};
use chrono::{Duration, NaiveDateTime};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AppointmentStatus {
    Scheduled,
    Completed,
    Cancelled,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Appointment {
    pub id: i64,
    pub uid: String,
    pub membership_id: i64,
    pub coach_id: i64,
    pub appointment_start: NaiveDateTime,
    pub appointment_end: NaiveDateTime,
    pub status: AppointmentStatus,
    pub cancellation_note: Option<String>,
}

impl Record for Appointment {
    const KIND: &'static str = "Appointment";

    fn id(&self) -> i64 {
        self.id
    }

    fn set_id(&mut self, id: i64) {
        self.id = id;
    }

    fn uid(&self) -> Option<&str> {
        Some(&self.uid)
    }
}

impl Searchable for Appointment {
    const COLLECTION: &'static str = "appointments";

    fn filter(query: &ListQuery) -> Filter {
        Filter::builder(query)
            .number_eq("membership_id", &["membership_id"])
            .number_eq("coach_id", &["coach_id"])
            .exact("status", "status")
            .date_range("start_date", "end_date", "appointment_start")
            .build()
    }
}

fn parse_slot(field: &str, raw: &str) -> Result<NaiveDateTime, AppError> {
    parse_timestamp(raw)
        .ok_or_else(|| AppError::Validation(format!("{} '{}' is not a valid date", field, raw)))
}

fn check_slot(start: NaiveDateTime, end: NaiveDateTime) -> Result<(), AppError> {
    if end <= start {
        return Err(AppError::Validation(
            "appointment_end must be after appointment_start".to_string(),
        ));
    }
    Ok(())
}

/// Request to book an appointment
#[derive(Debug, Deserialize, Validate)]
pub struct CreateAppointmentRequest {
    #[validate(required(message = "membership_id is required"))]
    pub membership_id: Option<i64>,

    #[validate(required(message = "coach_id is required"))]
    pub coach_id: Option<i64>,

    #[validate(required(message = "appointment_start is required"))]
    pub appointment_start: Option<String>,

    /// Defaults to start plus the configured appointment duration.
    pub appointment_end: Option<String>,
}

impl CreateAppointmentRequest {
    /// Build the record; call after `validate()` succeeded.
    pub fn into_record(self, default_minutes: i64) -> Result<Appointment, AppError> {
        let start = parse_slot(
            "appointment_start",
            self.appointment_start.as_deref().unwrap_or_default(),
        )?;
        let end = match self.appointment_end.as_deref() {
            Some(raw) => parse_slot("appointment_end", raw)?,
            None => start
                .checked_add_signed(Duration::minutes(default_minutes.clamp(1, 24 * 60)))
                .ok_or_else(|| {
                    AppError::Validation("appointment_start is out of range".to_string())
                })?,
        };
        check_slot(start, end)?;

        Ok(Appointment {
            id: 0,
            uid: Uuid::new_v4().to_string(),
            membership_id: self.membership_id.unwrap_or_default(),
            coach_id: self.coach_id.unwrap_or_default(),
            appointment_start: start,
            appointment_end: end,
            status: AppointmentStatus::Scheduled,
            cancellation_note: None,
        })
    }
}

/// Partial appointment update. Slot strings are parsed up front by
/// [`UpdateAppointmentRequest::resolve`].
#[derive(Debug, Default, Deserialize)]
pub struct UpdateAppointmentRequest {
    pub coach_id: Option<i64>,
    pub appointment_start: Option<String>,
    pub appointment_end: Option<String>,
    pub status: Option<AppointmentStatus>,
    pub cancellation_note: Option<String>,
}

impl UpdateAppointmentRequest {
    pub fn resolve(self) -> Result<AppointmentPatch, AppError> {
        Ok(AppointmentPatch {
            coach_id: self.coach_id,
            appointment_start: self
                .appointment_start
                .as_deref()
                .map(|raw| parse_slot("appointment_start", raw))
                .transpose()?,
            appointment_end: self
                .appointment_end
                .as_deref()
                .map(|raw| parse_slot("appointment_end", raw))
                .transpose()?,
            status: self.status,
            cancellation_note: self.cancellation_note,
        })
    }
}

#[derive(Debug, Default)]
pub struct AppointmentPatch {
    pub coach_id: Option<i64>,
    pub appointment_start: Option<NaiveDateTime>,
    pub appointment_end: Option<NaiveDateTime>,
    pub status: Option<AppointmentStatus>,
    pub cancellation_note: Option<String>,
}

impl AppointmentPatch {
    /// Reject a patch that would leave `current` ending at or before its start.
    pub fn check_slot(&self, current: &Appointment) -> Result<(), AppError> {
        check_slot(
            self.appointment_start.unwrap_or(current.appointment_start),
            self.appointment_end.unwrap_or(current.appointment_end),
        )
    }
}

impl Patch<Appointment> for AppointmentPatch {
    fn apply(&self, appointment: &mut Appointment) {
        if let Some(coach_id) = self.coach_id {
            appointment.coach_id = coach_id;
        }
        if let Some(start) = self.appointment_start {
            appointment.appointment_start = start;
        }
        if let Some(end) = self.appointment_end {
            appointment.appointment_end = end;
        }
        if let Some(status) = self.status {
            appointment.status = status;
        }
        if let Some(note) = &self.cancellation_note {
            appointment.cancellation_note = Some(note.clone());
        }
    }
}

/// Request to cancel an appointment with an optional note.
#[derive(Debug, Default, Deserialize)]
pub struct CancelAppointmentRequest {
    #[serde(alias = "reason", alias = "cancellation_note")]
    pub note: Option<String>,
}

impl Patch<Appointment> for CancelAppointmentRequest {
    fn apply(&self, appointment: &mut Appointment) {
        appointment.status = AppointmentStatus::Cancelled;
        appointment.cancellation_note = self
            .note
            .as_deref()
            .map(str::trim)
            .filter(|n| !n.is_empty())
            .map(str::to_string);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn booking(start: &str, end: Option<&str>) -> CreateAppointmentRequest {
        CreateAppointmentRequest {
            membership_id: Some(1),
            coach_id: Some(2),
            appointment_start: Some(start.into()),
            appointment_end: end.map(str::to_string),
        }
    }

    #[test]
    fn test_end_defaults_to_configured_duration() {
        let appointment = booking("2025-04-15T16:00:00", None).into_record(45).unwrap();
        assert_eq!(
            appointment.appointment_end,
            parse_timestamp("2025-04-15T16:45:00").unwrap()
        );
        assert_eq!(appointment.status, AppointmentStatus::Scheduled);
    }

    #[test]
    fn test_default_end_past_calendar_limit_is_rejected() {
        let err = booking("+262142-12-31T23:59:59", None)
            .into_record(60)
            .unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[test]
    fn test_end_before_start_is_rejected() {
        let err = booking("2025-04-15T16:00:00", Some("2025-04-15T15:00:00"))
            .into_record(60)
            .unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[test]
    fn test_cancel_records_note() {
        let mut appointment = booking("2025-04-15T16:00:00", None).into_record(60).unwrap();
        CancelAppointmentRequest {
            note: Some("Member could not attend".into()),
        }
        .apply(&mut appointment);

        assert_eq!(appointment.status, AppointmentStatus::Cancelled);
        assert_eq!(
            appointment.cancellation_note.as_deref(),
            Some("Member could not attend")
        );
    }

    #[test]
    fn test_update_cannot_move_start_past_end() {
        let current = booking("2025-04-15T16:00:00", None).into_record(60).unwrap();

        let later_start = UpdateAppointmentRequest {
            appointment_start: Some("2025-04-15T18:00:00".into()),
            ..Default::default()
        }
        .resolve()
        .unwrap();
        assert!(later_start.check_slot(&current).is_err());

        let reversed = UpdateAppointmentRequest {
            appointment_start: Some("2025-04-15T12:00:00".into()),
            appointment_end: Some("2025-04-15T11:00:00".into()),
            ..Default::default()
        }
        .resolve()
        .unwrap();
        assert!(reversed.check_slot(&current).is_err());

        let moved = UpdateAppointmentRequest {
            appointment_start: Some("2025-04-15T16:30:00".into()),
            ..Default::default()
        }
        .resolve()
        .unwrap();
        assert!(moved.check_slot(&current).is_ok());
    }

    #[test]
    fn test_update_rejects_unparseable_slot() {
        let update = UpdateAppointmentRequest {
            appointment_start: Some("tomorrow-ish".into()),
            ..Default::default()
        };
        assert!(update.resolve().is_err());
    }
}
