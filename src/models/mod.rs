//! Data models and DTOs (Data Transfer Objects)
//!
//! Contains the domain records, their request payloads, and the response
//! envelope shared by every endpoint.

pub mod appointment;
pub mod coach;
pub mod contract;
pub mod log;
pub mod member;
pub mod membership;
pub mod settings;

// Re-export commonly used types
pub use appointment::*;
pub use coach::*;
pub use contract::*;
pub use log::*;
pub use member::*;
pub use membership::*;
pub use settings::*;

use crate::extract::RequestId;
use crate::query::{Page, PageMeta};
use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};
use std::fmt;
use uuid::Uuid;

/// Universal response wrapper: `{ code, message, data, request_id }`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Envelope<T> {
    pub code: u16,
    #[serde(default)]
    pub message: String,
    #[serde(default = "Option::default")]
    pub data: Option<T>,
    #[serde(default)]
    pub request_id: String,
}

impl<T> Envelope<T> {
    pub fn success(data: T, request_id: RequestId) -> Self {
        Self {
            code: 200,
            message: "success".to_string(),
            data: Some(data),
            request_id: request_id.into_inner(),
        }
    }

    /// Success with `data: null`.
    pub fn empty(request_id: RequestId) -> Self {
        Self {
            code: 200,
            message: "success".to_string(),
            data: None,
            request_id: request_id.into_inner(),
        }
    }
}

impl Envelope<()> {
    pub fn failure(code: u16, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            data: None,
            request_id: Uuid::new_v4().to_string(),
        }
    }
}

/// List payload: `{ total, <collection>: [...] }`, plus `page`/`limit`/`pages`
/// for page-addressed endpoints.
#[derive(Debug, Clone)]
pub struct ListData<T> {
    pub collection: &'static str,
    pub total: usize,
    pub items: Vec<T>,
    pub meta: Option<PageMeta>,
}

impl<T> ListData<T> {
    pub fn new(collection: &'static str, page: Page<T>) -> Self {
        Self {
            collection,
            total: page.total,
            items: page.items,
            meta: None,
        }
    }

    pub fn with_meta(mut self, meta: PageMeta) -> Self {
        self.meta = Some(meta);
        self
    }
}

impl<T: Serialize> Serialize for ListData<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(None)?;
        map.serialize_entry("total", &self.total)?;
        map.serialize_entry(self.collection, &self.items)?;
        if let Some(meta) = &self.meta {
            map.serialize_entry("page", &meta.page)?;
            map.serialize_entry("limit", &meta.limit)?;
            map.serialize_entry("pages", &meta.pages)?;
        }
        map.end()
    }
}

/// `active` / `inactive` flag used by coaches and members.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActiveStatus {
    #[default]
    Active,
    Inactive,
}

/// A reference to another record sent either as a number or a string token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Reference {
    Number(i64),
    Text(String),
}

impl fmt::Display for Reference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Reference::Number(n) => write!(f, "{}", n),
            Reference::Text(s) => f.write_str(s),
        }
    }
}

impl From<&Reference> for crate::store::RecordKey {
    fn from(reference: &Reference) -> Self {
        crate::store::RecordKey::new(reference.to_string())
    }
}
