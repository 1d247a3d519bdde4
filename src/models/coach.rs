//! Coach records and payloads

use super::ActiveStatus;
use crate::query::{Filter, ListQuery, SearchTarget, Searchable};
use crate::store::{Patch, Record};
use chrono::{NaiveDateTime, Utc};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

pub const DEFAULT_AVATAR: &str = "/static/avatars/default.svg";

static MOBILE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\+?[0-9][0-9 \-]{4,19}$").unwrap());

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Coach {
    pub id: i64,
    pub name: String,
    pub mobile: String,
    pub avatar: String,
    pub status: ActiveStatus,
    pub specialization: String,
    pub created_at: NaiveDateTime,
}

impl Record for Coach {
    const KIND: &'static str = "Coach";

    fn id(&self) -> i64 {
        self.id
    }

    fn set_id(&mut self, id: i64) {
        self.id = id;
    }
}

const COACH_SEARCH: &[SearchTarget] = &[
    SearchTarget::Field("name"),
    SearchTarget::Field("mobile"),
    SearchTarget::Field("specialization"),
];

impl Searchable for Coach {
    const COLLECTION: &'static str = "coaches";

    fn filter(query: &ListQuery) -> Filter {
        Filter::builder(query)
            .keyword("search", COACH_SEARCH)
            .exact("status", "status")
            .build()
    }
}

/// Phone numbers: digits with optional leading `+`, spaces and dashes.
pub fn validate_mobile(mobile: &str) -> Result<(), ValidationError> {
    if MOBILE_RE.is_match(mobile.trim()) {
        Ok(())
    } else {
        let mut err = ValidationError::new("invalid_mobile");
        err.message = Some("mobile must be a phone number".into());
        Err(err)
    }
}

/// Request to create a coach
#[derive(Debug, Deserialize, Validate)]
pub struct CreateCoachRequest {
    #[validate(
        required(message = "name is required"),
        length(min = 1, max = 64, message = "name must be between 1 and 64 characters")
    )]
    pub name: Option<String>,

    #[serde(alias = "phone")]
    #[validate(required(message = "mobile is required"), custom(function = "validate_mobile"))]
    pub mobile: Option<String>,

    #[serde(alias = "specialty")]
    #[validate(required(message = "specialization is required"))]
    pub specialization: Option<String>,

    pub avatar: Option<String>,
    pub status: Option<ActiveStatus>,
}

impl CreateCoachRequest {
    /// Build the record; call after `validate()` succeeded.
    pub fn into_record(self) -> Coach {
        Coach {
            id: 0,
            name: self.name.unwrap_or_default(),
            mobile: self.mobile.unwrap_or_default().trim().to_string(),
            avatar: self.avatar.unwrap_or_else(|| DEFAULT_AVATAR.to_string()),
            status: self.status.unwrap_or_default(),
            specialization: self.specialization.unwrap_or_default(),
            created_at: Utc::now().naive_utc(),
        }
    }
}

/// Partial coach update; absent fields stay as they are.
#[derive(Debug, Default, Deserialize, Validate)]
pub struct UpdateCoachRequest {
    #[validate(length(min = 1, max = 64, message = "name must be between 1 and 64 characters"))]
    pub name: Option<String>,

    #[serde(alias = "phone")]
    #[validate(custom(function = "validate_mobile"))]
    pub mobile: Option<String>,

    #[serde(alias = "specialty")]
    pub specialization: Option<String>,

    pub avatar: Option<String>,
    pub status: Option<ActiveStatus>,
}

impl Patch<Coach> for UpdateCoachRequest {
    fn apply(&self, coach: &mut Coach) {
        if let Some(name) = &self.name {
            coach.name = name.clone();
        }
        if let Some(mobile) = &self.mobile {
            coach.mobile = mobile.trim().to_string();
        }
        if let Some(specialization) = &self.specialization {
            coach.specialization = specialization.clone();
        }
        if let Some(avatar) = &self.avatar {
            coach.avatar = avatar.clone();
        }
        if let Some(status) = self.status {
            coach.status = status;
        }
    }
}

/// Replaces only the avatar path after an upload.
pub struct AvatarPatch(pub String);

impl Patch<Coach> for AvatarPatch {
    fn apply(&self, coach: &mut Coach) {
        coach.avatar = self.0.clone();
    }
}
