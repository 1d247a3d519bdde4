//! HTTP client for the admin API list endpoints.
//!
//! [`ApiClient::fetch_list`] is the table-facing entry point: it never fails,
//! it reports problems through a [`Notifier`] and hands back an empty
//! unsuccessful [`TableData`] instead.

mod normalize;
mod notify;
mod request;

pub use normalize::{ListPayload, TableData};
pub use notify::{Notifier, TracingNotifier};
pub use request::{ListRequest, DEFAULT_PAGE_SIZE};

use crate::models::Envelope;
use reqwest::{Client, RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;
use tracing::debug;

/// Errors that can occur when talking to the admin API.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Server answered with a non-200 envelope.
    #[error("API error {code}: {message}")]
    Api { code: u16, message: String },

    /// Body was not the expected JSON.
    #[error("Malformed response: {0}")]
    Decode(String),
}

#[derive(Debug, Serialize)]
struct LoginBody<'a> {
    identifier: &'a str,
    password: &'a str,
}

/// Token issued by `/api/auth/login`.
#[derive(Debug, Clone, Deserialize)]
pub struct LoginData {
    pub access_token: String,
    pub token_type: String,
    pub user: Value,
}

/// Admin API client
#[derive(Clone)]
pub struct ApiClient {
    http: Client,
    base_url: String,
    token: Option<String>,
    notifier: Arc<dyn Notifier>,
}

impl ApiClient {
    /// `base_url` is the server root, e.g. `http://localhost:3000`.
    pub fn new(base_url: impl Into<String>, notifier: Arc<dyn Notifier>) -> Self {
        Self {
            http: Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            token: None,
            notifier,
        }
    }

    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    fn authorized(&self, builder: RequestBuilder) -> RequestBuilder {
        match &self.token {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    /// Log in and keep the issued token for later requests.
    pub async fn login(&mut self, identifier: &str, password: &str) -> Result<LoginData, ClientError> {
        let response = self
            .http
            .post(format!("{}/api/auth/login", self.base_url))
            .json(&LoginBody { identifier, password })
            .send()
            .await?;

        let login: LoginData = unwrap_envelope(response).await?;
        self.token = Some(login.access_token.clone());
        Ok(login)
    }

    /// Fetch one page of a list endpoint, propagating failures.
    ///
    /// `path` is relative to the server root, e.g. `/api/admin/coaches`.
    pub async fn get_list(&self, path: &str, request: &ListRequest) -> Result<TableData, ClientError> {
        let params = request.to_query();
        debug!("GET {} {:?}", path, params);

        let response = self
            .authorized(self.http.get(format!("{}{}", self.base_url, path)))
            .query(&params)
            .send()
            .await?;

        let payload: ListPayload = unwrap_envelope(response).await?;
        payload
            .into_table()
            .ok_or_else(|| ClientError::Decode("list data carries no array".to_string()))
    }

    /// Fetch one page for a table. Failures are notified once and yield
    /// `{ data: [], success: false, total: 0 }`.
    pub async fn fetch_list(&self, path: &str, request: &ListRequest) -> TableData {
        match self.get_list(path, request).await {
            Ok(table) => table,
            Err(e) => {
                self.notifier.notify(&e.to_string());
                TableData::failure()
            }
        }
    }
}

/// Read an envelope and return its `data` when `code` is 200.
async fn unwrap_envelope<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, ClientError> {
    let status = response.status();
    let body = response.bytes().await?;

    let envelope: Envelope<T> = match serde_json::from_slice(&body) {
        Ok(envelope) => envelope,
        Err(e) if status == StatusCode::OK => return Err(ClientError::Decode(e.to_string())),
        Err(_) => {
            return Err(ClientError::Api {
                code: status.as_u16(),
                message: format!("HTTP {}", status),
            })
        }
    };

    if envelope.code != 200 {
        return Err(ClientError::Api {
            code: envelope.code,
            message: envelope.message,
        });
    }
    envelope
        .data
        .ok_or_else(|| ClientError::Decode("response has no data".to_string()))
}
