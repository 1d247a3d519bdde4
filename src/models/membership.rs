//! Membership types and issued membership cards

use super::{Member, Reference};
use crate::error::AppError;
use crate::query::time::parse_timestamp;
use crate::query::{Filter, ListQuery, SearchTarget, Searchable};
use crate::store::{Patch, Record};
use chrono::{Duration, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

// ============================================
// Membership types
// ============================================

/// A purchasable card template: session count, validity and leave allowance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MembershipType {
    pub id: i64,
    pub name: String,
    pub total_sessions: i64,
    pub validity_days: i64,
    pub max_leave_count: i64,
    pub max_leave_duration: i64,
    pub created_at: NaiveDateTime,
}

impl Record for MembershipType {
    const KIND: &'static str = "Membership type";

    fn id(&self) -> i64 {
        self.id
    }

    fn set_id(&mut self, id: i64) {
        self.id = id;
    }
}

const TYPE_SEARCH: &[SearchTarget] = &[SearchTarget::Field("name")];

impl Searchable for MembershipType {
    const COLLECTION: &'static str = "items";

    fn filter(query: &ListQuery) -> Filter {
        Filter::builder(query).keyword("search", TYPE_SEARCH).build()
    }
}

#[derive(Debug, Deserialize, Validate)]
pub struct CreateMembershipTypeRequest {
    #[validate(
        required(message = "name is required"),
        length(min = 1, max = 64, message = "name must be between 1 and 64 characters")
    )]
    pub name: Option<String>,

    #[validate(
        required(message = "total_sessions is required"),
        range(min = 0, message = "total_sessions must not be negative")
    )]
    pub total_sessions: Option<i64>,

    #[validate(
        required(message = "validity_days is required"),
        range(min = 1, message = "validity_days must be at least 1")
    )]
    pub validity_days: Option<i64>,

    #[validate(range(min = 0, message = "max_leave_count must not be negative"))]
    pub max_leave_count: Option<i64>,

    #[validate(range(min = 0, message = "max_leave_duration must not be negative"))]
    pub max_leave_duration: Option<i64>,
}

impl CreateMembershipTypeRequest {
    pub fn into_record(self) -> MembershipType {
        MembershipType {
            id: 0,
            name: self.name.unwrap_or_default(),
            total_sessions: self.total_sessions.unwrap_or_default(),
            validity_days: self.validity_days.unwrap_or(1),
            max_leave_count: self.max_leave_count.unwrap_or_default(),
            max_leave_duration: self.max_leave_duration.unwrap_or_default(),
            created_at: Utc::now().naive_utc(),
        }
    }
}

#[derive(Debug, Default, Deserialize, Validate)]
pub struct UpdateMembershipTypeRequest {
    #[validate(length(min = 1, max = 64, message = "name must be between 1 and 64 characters"))]
    pub name: Option<String>,
    #[validate(range(min = 0, message = "total_sessions must not be negative"))]
    pub total_sessions: Option<i64>,
    #[validate(range(min = 1, message = "validity_days must be at least 1"))]
    pub validity_days: Option<i64>,
    #[validate(range(min = 0, message = "max_leave_count must not be negative"))]
    pub max_leave_count: Option<i64>,
    #[validate(range(min = 0, message = "max_leave_duration must not be negative"))]
    pub max_leave_duration: Option<i64>,
}

impl Patch<MembershipType> for UpdateMembershipTypeRequest {
    fn apply(&self, ty: &mut MembershipType) {
        if let Some(name) = &self.name {
            ty.name = name.clone();
        }
        if let Some(total_sessions) = self.total_sessions {
            ty.total_sessions = total_sessions;
        }
        if let Some(validity_days) = self.validity_days {
            ty.validity_days = validity_days;
        }
        if let Some(max_leave_count) = self.max_leave_count {
            ty.max_leave_count = max_leave_count;
        }
        if let Some(max_leave_duration) = self.max_leave_duration {
            ty.max_leave_duration = max_leave_duration;
        }
    }
}

// ============================================
// Membership cards
// ============================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MembershipStatus {
    Active,
    Expired,
    Cancelled,
    Revoked,
}

/// A card issued to a member. Member and type names are copied in at
/// issue time and are not refreshed afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Membership {
    pub id: i64,
    pub uid: String,
    pub user_id: i64,
    pub type_id: i64,
    pub status: MembershipStatus,
    pub purchased_at: NaiveDateTime,
    pub expired_at: NaiveDateTime,
    pub total_sessions: i64,
    pub remaining_sessions: i64,
    pub notes: String,
    pub revoke_reason: Option<String>,
    pub user_name: String,
    pub user_phone: String,
    pub type_name: String,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl Record for Membership {
    const KIND: &'static str = "Membership";

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

const REVOKE_REASON_SEARCH: &[SearchTarget] = &[SearchTarget::Field("revoke_reason")];

impl Searchable for Membership {
    const COLLECTION: &'static str = "memberships";

    fn filter(query: &ListQuery) -> Filter {
        Filter::builder(query)
            .number_eq("user_id", &["user_id"])
            .number_eq("uid", &["user_id"])
            .number_eq("type_id", &["type_id"])
            .exact("status", "status")
            .keyword("revoke_reason", REVOKE_REASON_SEARCH)
            .number_range("remaining_sessions_min", "remaining_sessions_max", "remaining_sessions")
            .date_range("purchased_at_start", "purchased_at_end", "purchased_at")
            .date_range("expired_at_start", "expired_at_end", "expired_at")
            .build()
    }
}

/// Request to issue a card to a member.
#[derive(Debug, Deserialize, Validate)]
pub struct IssueMembershipRequest {
    /// Member id or uid.
    #[serde(alias = "user_id")]
    #[validate(required(message = "uid is required"))]
    pub uid: Option<Reference>,

    #[validate(required(message = "type_id is required"))]
    pub type_id: Option<Reference>,

    /// Start of validity; defaults to now.
    pub purchased_at: Option<String>,

    pub notes: Option<String>,
}

impl IssueMembershipRequest {
    pub fn purchased_at(&self) -> Result<NaiveDateTime, AppError> {
        match self.purchased_at.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
            Some(raw) => parse_timestamp(raw).ok_or_else(|| {
                AppError::Validation(format!("purchased_at '{}' is not a valid date", raw))
            }),
            None => Ok(Utc::now().naive_utc()),
        }
    }

    /// Build the card from the resolved member and type.
    pub fn build(
        &self,
        member: &Member,
        ty: &MembershipType,
    ) -> Result<Membership, AppError> {
        let purchased_at = self.purchased_at()?;
        let expired_at = Duration::try_days(ty.validity_days)
            .and_then(|validity| purchased_at.checked_add_signed(validity))
            .ok_or_else(|| {
                AppError::Validation(format!(
                    "validity of {} days is out of range",
                    ty.validity_days
                ))
            })?;
        let now = Utc::now().naive_utc();

        Ok(Membership {
            id: 0,
            uid: Uuid::new_v4().to_string(),
            user_id: member.id,
            type_id: ty.id,
            status: MembershipStatus::Active,
            purchased_at,
            expired_at,
            total_sessions: ty.total_sessions,
            remaining_sessions: ty.total_sessions,
            notes: self.notes.clone().unwrap_or_default(),
            revoke_reason: None,
            user_name: member.name.clone(),
            user_phone: member.mobile.clone(),
            type_name: ty.name.clone(),
            created_at: now,
            updated_at: now,
        })
    }
}

/// Request to revoke a card. The reason is optional free text.
#[derive(Debug, Default, Deserialize)]
pub struct RevokeMembershipRequest {
    pub reason: Option<String>,
}

impl RevokeMembershipRequest {
    pub fn reason(&self) -> Option<String> {
        self.reason
            .as_deref()
            .map(str::trim)
            .filter(|r| !r.is_empty())
            .map(str::to_string)
    }
}

impl Patch<Membership> for RevokeMembershipRequest {
    fn apply(&self, membership: &mut Membership) {
        membership.status = MembershipStatus::Revoked;
        membership.revoke_reason = self.reason();
        membership.updated_at = Utc::now().naive_utc();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ActiveStatus;
    use crate::query::{execute, Pagination};
    use serde_json::json;

    fn member() -> Member {
        Member {
            id: 1,
            uid: "7446e84a-8f3b-439a-b5c7-1fa621ecdd19".into(),
            name: "dhy".into(),
            mobile: "13541075247".into(),
            email: None,
            avatar: String::new(),
            status: ActiveStatus::Active,
            created_at: Utc::now().naive_utc(),
        }
    }

    fn monthly() -> MembershipType {
        MembershipType {
            id: 1,
            name: "Monthly".into(),
            total_sessions: 30,
            validity_days: 30,
            max_leave_count: 1,
            max_leave_duration: 7,
            created_at: Utc::now().naive_utc(),
        }
    }

    fn issue(purchased_at: Option<&str>) -> IssueMembershipRequest {
        IssueMembershipRequest {
            uid: Some(Reference::Number(1)),
            type_id: Some(Reference::Number(1)),
            purchased_at: purchased_at.map(str::to_string),
            notes: None,
        }
    }

    #[test]
    fn test_issue_denormalizes_member_and_type() {
        let card = issue(Some("2025-04-15T07:47:58")).build(&member(), &monthly()).unwrap();

        assert_eq!(card.status, MembershipStatus::Active);
        assert_eq!(card.user_name, "dhy");
        assert_eq!(card.type_name, "Monthly");
        assert_eq!(card.remaining_sessions, 30);
        assert_eq!(
            card.expired_at,
            parse_timestamp("2025-05-15T07:47:58").unwrap()
        );
    }

    #[test]
    fn test_issue_rejects_bad_start_date() {
        let err = issue(Some("someday")).build(&member(), &monthly()).unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[test]
    fn test_issue_requires_member_and_type() {
        let req: IssueMembershipRequest = serde_json::from_value(json!({"type_id": "3"})).unwrap();
        let errors = req.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("uid"));
    }

    #[test]
    fn test_revoke_forces_status_and_keeps_reason() {
        let mut card = issue(None).build(&member(), &monthly()).unwrap();
        RevokeMembershipRequest {
            reason: Some("  Issued twice ".into()),
        }
        .apply(&mut card);

        assert_eq!(card.status, MembershipStatus::Revoked);
        assert_eq!(card.revoke_reason.as_deref(), Some("Issued twice"));
    }

    #[test]
    fn test_remaining_sessions_range_filter() {
        let mut low = issue(None).build(&member(), &monthly()).unwrap();
        low.id = 1;
        low.remaining_sessions = 2;
        let mut high = low.clone();
        high.id = 2;
        high.remaining_sessions = 20;

        let query = ListQuery::from_pairs([
            ("remaining_sessions_min", "10"),
            ("remaining_sessions_max", "30"),
        ]);
        let page = execute(vec![low, high], &Membership::filter(&query), Pagination::default());
        assert_eq!(page.total, 1);
        assert_eq!(page.items[0].id, 2);
    }
}
