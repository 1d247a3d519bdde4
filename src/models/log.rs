//! Activity log entries

use super::Membership;
use crate::query::{Filter, ListQuery, SearchTarget, Searchable};
use crate::store::Record;
use chrono::{NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Debug,
    Info,
    Warn,
    Error,
}

pub const MEMBERSHIP_LOG: &str = "membership";

/// One audit entry. `user_id` is the acting admin; the affected member, if
/// any, sits in `details.user_id`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogEntry {
    pub id: i64,
    pub timestamp: NaiveDateTime,
    pub level: LogLevel,
    pub log_type: String,
    pub message: String,
    pub user_id: i64,
    pub details: Value,
}

impl Record for LogEntry {
    const KIND: &'static str = "Log entry";

    fn id(&self) -> i64 {
        self.id
    }

    fn set_id(&mut self, id: i64) {
        self.id = id;
    }
}

const LOG_SEARCH: &[SearchTarget] = &[
    SearchTarget::Field("message"),
    SearchTarget::Serialized("details"),
];

impl Searchable for LogEntry {
    const COLLECTION: &'static str = "logs";

    fn filter(query: &ListQuery) -> Filter {
        Filter::builder(query)
            .exact("level", "level")
            .exact("log_type", "log_type")
            .number_eq("user_id", &["user_id", "details.user_id"])
            .date_range("start_date", "end_date", "timestamp")
            .keyword("search", LOG_SEARCH)
            .build()
    }
}

impl LogEntry {
    pub fn new(level: LogLevel, log_type: &str, message: String, actor_id: i64, details: Value) -> Self {
        Self {
            id: 0,
            timestamp: Utc::now().naive_utc(),
            level,
            log_type: log_type.to_string(),
            message,
            user_id: actor_id,
            details,
        }
    }

    pub fn membership_issued(membership: &Membership, admin_id: i64) -> Self {
        Self::new(
            LogLevel::Info,
            MEMBERSHIP_LOG,
            format!(
                "Membership created for user ID {} by admin ID {}",
                membership.user_id, admin_id
            ),
            admin_id,
            json!({
                "uid": membership.uid,
                "type_id": membership.type_id,
                "user_id": membership.user_id,
                "admin_id": admin_id,
                "start_date": membership.purchased_at,
                "total_sessions": membership.total_sessions,
            }),
        )
    }

    pub fn membership_revoked(membership: &Membership, admin_id: i64) -> Self {
        Self::new(
            LogLevel::Info,
            MEMBERSHIP_LOG,
            format!("Membership ID {} revoked by admin ID {}", membership.id, admin_id),
            admin_id,
            json!({
                "reason": membership.revoke_reason.clone().unwrap_or_default(),
                "user_id": membership.user_id,
                "admin_id": admin_id,
            }),
        )
    }
}
