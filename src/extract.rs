//! Request extractors shared by the handlers.

use crate::error::AppError;
use axum::{extract::FromRequest, extract::FromRequestParts, http::request::Parts};
use serde::de::DeserializeOwned;
use std::convert::Infallible;
use uuid::Uuid;

/// Header set by the request-id middleware.
pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// Id of the current request, echoed into the response envelope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestId(String);

impl RequestId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

impl<S: Send + Sync> FromRequestParts<S> for RequestId {
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(parts
            .headers
            .get(REQUEST_ID_HEADER)
            .and_then(|v| v.to_str().ok())
            .filter(|v| !v.is_empty())
            .map(RequestId::new)
            .unwrap_or_else(RequestId::generate))
    }
}

/// JSON body extractor whose rejections become enveloped 400s.
#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(AppError))]
pub struct AppJson<T>(pub T);

/// Query-string extractor whose rejections become enveloped 400s.
#[derive(Debug, FromRequestParts)]
#[from_request(via(axum::extract::Query), rejection(AppError))]
pub struct AppQuery<T>(pub T);

/// Parse a JSON body that may be left out entirely. An empty or blank body
/// yields `T::default()`.
pub fn optional_json<T: DeserializeOwned + Default>(body: &[u8]) -> Result<T, AppError> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(T::default());
    }
    serde_json::from_slice(body)
        .map_err(|e| AppError::BadRequest(format!("Failed to parse the request body as JSON: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, Default, Deserialize, PartialEq)]
    struct Reason {
        reason: Option<String>,
    }

    #[test]
    fn test_optional_json_blank_body_is_default() {
        assert_eq!(optional_json::<Reason>(b"").unwrap(), Reason::default());
        assert_eq!(optional_json::<Reason>(b" \n").unwrap(), Reason::default());
    }

    #[test]
    fn test_optional_json_parses_or_rejects() {
        let parsed: Reason = optional_json(br#"{"reason":"moved away"}"#).unwrap();
        assert_eq!(parsed.reason.as_deref(), Some("moved away"));
        assert!(matches!(
            optional_json::<Reason>(b"{oops"),
            Err(AppError::BadRequest(_))
        ));
    }
}
