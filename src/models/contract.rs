//! Signed member contracts (metadata plus a scanned image)

use super::MemberSummary;
use crate::query::{Filter, ListQuery, SearchTarget, Searchable};
use crate::store::Record;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Contract {
    pub id: i64,
    pub uid: String,
    pub title: String,
    pub description: String,
    pub contract_image: String,
    pub status: String,
    pub created_by: i64,
    pub user_id: i64,
    /// Member as it was when the contract was filed.
    pub user: Option<MemberSummary>,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl Record for Contract {
    const KIND: &'static str = "Contract";

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

const CONTRACT_SEARCH: &[SearchTarget] = &[
    SearchTarget::Field("title"),
    SearchTarget::Field("description"),
];

impl Searchable for Contract {
    const COLLECTION: &'static str = "contracts";

    fn filter(query: &ListQuery) -> Filter {
        Filter::builder(query)
            .exact("status", "status")
            .keyword("search", CONTRACT_SEARCH)
            .build()
    }
}

/// Contract metadata, sent in the query string next to the multipart image.
#[derive(Debug, Default, Deserialize, Validate)]
pub struct CreateContractParams {
    /// Member uid (or id) the contract belongs to.
    #[validate(required(message = "uid is required"), length(min = 1, message = "uid is required"))]
    pub uid: Option<String>,

    #[validate(
        required(message = "title is required"),
        length(min = 1, max = 128, message = "title must be between 1 and 128 characters")
    )]
    pub title: Option<String>,

    #[validate(
        required(message = "description is required"),
        length(min = 1, message = "description is required")
    )]
    pub description: Option<String>,
}

impl CreateContractParams {
    /// Build the record; call after `validate()` succeeded.
    pub fn into_record(self, member: MemberSummary, contract_image: String, created_by: i64) -> Contract {
        let now = Utc::now();
        Contract {
            id: 0,
            uid: Uuid::new_v4().to_string(),
            title: self.title.unwrap_or_default(),
            description: self.description.unwrap_or_default(),
            contract_image,
            status: "active".to_string(),
            created_by,
            user_id: member.id,
            user: Some(member),
            created_at: now,
            updated_at: Some(now),
        }
    }
}
