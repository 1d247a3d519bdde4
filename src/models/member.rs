//! Member (gym customer) records and payloads

use super::coach::{validate_mobile, DEFAULT_AVATAR};
use super::ActiveStatus;
use crate::query::{Filter, ListQuery, SearchTarget, Searchable};
use crate::store::{Patch, Record};
use chrono::{NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Member {
    pub id: i64,
    pub uid: String,
    pub name: String,
    pub mobile: String,
    pub email: Option<String>,
    pub avatar: String,
    pub status: ActiveStatus,
    pub created_at: NaiveDateTime,
}

impl Record for Member {
    const KIND: &'static str = "User";

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

const MEMBER_SEARCH: &[SearchTarget] = &[
    SearchTarget::Field("name"),
    SearchTarget::Field("mobile"),
    SearchTarget::Field("email"),
];

impl Searchable for Member {
    const COLLECTION: &'static str = "users";

    fn filter(query: &ListQuery) -> Filter {
        Filter::builder(query)
            .keyword("search", MEMBER_SEARCH)
            .exact("status", "status")
            .build()
    }
}

/// Compact member view embedded into contracts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MemberSummary {
    pub id: i64,
    pub uid: String,
    pub name: String,
    pub phone: String,
}

impl From<&Member> for MemberSummary {
    fn from(member: &Member) -> Self {
        Self {
            id: member.id,
            uid: member.uid.clone(),
            name: member.name.clone(),
            phone: member.mobile.clone(),
        }
    }
}

/// Request to register a member
#[derive(Debug, Deserialize, Validate)]
pub struct CreateMemberRequest {
    #[validate(
        required(message = "name is required"),
        length(min = 1, max = 64, message = "name must be between 1 and 64 characters")
    )]
    pub name: Option<String>,

    #[serde(alias = "phone")]
    #[validate(required(message = "mobile is required"), custom(function = "validate_mobile"))]
    pub mobile: Option<String>,

    #[validate(email(message = "email must be a valid address"))]
    pub email: Option<String>,

    pub avatar: Option<String>,
    pub status: Option<ActiveStatus>,
}

impl CreateMemberRequest {
    pub fn into_record(self) -> Member {
        Member {
            id: 0,
            uid: Uuid::new_v4().to_string(),
            name: self.name.unwrap_or_default(),
            mobile: self.mobile.unwrap_or_default().trim().to_string(),
            email: self.email,
            avatar: self.avatar.unwrap_or_else(|| DEFAULT_AVATAR.to_string()),
            status: self.status.unwrap_or_default(),
            created_at: Utc::now().naive_utc(),
        }
    }
}

#[derive(Debug, Default, Deserialize, Validate)]
pub struct UpdateMemberRequest {
    #[validate(length(min = 1, max = 64, message = "name must be between 1 and 64 characters"))]
    pub name: Option<String>,

    #[serde(alias = "phone")]
    #[validate(custom(function = "validate_mobile"))]
    pub mobile: Option<String>,

    #[validate(email(message = "email must be a valid address"))]
    pub email: Option<String>,

    pub avatar: Option<String>,
    pub status: Option<ActiveStatus>,
}

impl Patch<Member> for UpdateMemberRequest {
    fn apply(&self, member: &mut Member) {
        if let Some(name) = &self.name {
            member.name = name.clone();
        }
        if let Some(mobile) = &self.mobile {
            member.mobile = mobile.trim().to_string();
        }
        if let Some(email) = &self.email {
            member.email = Some(email.clone());
        }
        if let Some(avatar) = &self.avatar {
            member.avatar = avatar.clone();
        }
        if let Some(status) = self.status {
            member.status = status;
        }
    }
}
