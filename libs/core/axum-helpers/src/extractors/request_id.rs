//! Request correlation id extractor.

use axum::{extract::FromRequestParts, http::request::Parts};
use std::convert::Infallible;
use std::fmt;
use uuid::Uuid;

/// Header carrying the correlation id, set by `SetRequestIdLayer` when absent.
pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// Correlation id of the current request.
///
/// Read from the `x-request-id` header; a fresh UUID v4 is generated when the
/// header is missing or not valid UTF-8, so extraction never fails.
///
/// # Example
/// ```ignore
/// use axum_helpers::extractors::RequestId;
///
/// async fn handler(request_id: RequestId) -> String {
///     format!("handling {request_id}")
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestId(pub String);

impl RequestId {
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

impl fmt::Display for RequestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl<S> FromRequestParts<S> for RequestId
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let id = parts
            .headers
            .get(REQUEST_ID_HEADER)
            .and_then(|value| value.to_str().ok())
            .map(str::trim)
            .filter(|value| !value.is_empty())
            .map(|value| RequestId(value.to_string()));

        Ok(id.unwrap_or_else(RequestId::generate))
    }
}
