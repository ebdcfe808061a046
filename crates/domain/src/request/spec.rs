//! Request specification type

use serde::{Deserialize, Serialize};
use url::Url;
use uuid::Uuid;

use super::{AUTHORIZATION, Headers, HttpMethod};
use crate::auth::AccessToken;
use crate::error::{DomainError, DomainResult};

/// Complete descriptor for an outgoing HTTP request.
///
/// `url` is either absolute or relative to the client's base URL.
/// A request that failed with 401 is kept as-is so it can be replayed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequestSpec {
    /// Correlates log lines for one logical call, including its replay.
    pub id: Uuid,
    /// HTTP method
    pub method: HttpMethod,
    /// Target URL or path
    pub url: String,
    /// HTTP headers
    #[serde(default)]
    pub headers: Headers,
    /// Serialized request body
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,
}

impl RequestSpec {
    /// Creates a request with no headers and no body.
    #[must_use]
    pub fn new(method: HttpMethod, url: impl Into<String>) -> Self {
        Self {
            id: Uuid::now_v7(),
            method,
            url: url.into(),
            headers: Headers::new(),
            body: None,
        }
    }

    /// Creates a GET request.
    #[must_use]
    pub fn get(url: impl Into<String>) -> Self {
        Self::new(HttpMethod::Get, url)
    }

    /// Creates a POST request.
    #[must_use]
    pub fn post(url: impl Into<String>) -> Self {
        Self::new(HttpMethod::Post, url)
    }

    /// Adds a header, replacing any previous value.
    #[must_use]
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.set(name, value);
        self
    }

    /// Serializes `value` as the JSON body.
    ///
    /// # Errors
    ///
    /// Returns an error if the value cannot be serialized.
    pub fn with_json<T: Serialize>(mut self, value: &T) -> serde_json::Result<Self> {
        self.body = Some(serde_json::to_string(value)?);
        Ok(self)
    }

    /// Sets `Authorization: Bearer <token>`.
    pub fn set_bearer(&mut self, token: &AccessToken) {
        self.headers.set(AUTHORIZATION, token.bearer());
    }

    /// Returns the `Authorization` header value, if any.
    #[must_use]
    pub fn authorization(&self) -> Option<&str> {
        self.headers.get(AUTHORIZATION)
    }

    /// Resolves the request URL against `base`.
    ///
    /// Absolute URLs are returned unchanged.
    ///
    /// # Errors
    ///
    /// Returns an error if the URL cannot be parsed or joined.
    pub fn resolve_url(&self, base: Option<&Url>) -> DomainResult<Url> {
        match Url::parse(&self.url) {
            Ok(url) => Ok(url),
            Err(url::ParseError::RelativeUrlWithoutBase) => base
                .ok_or_else(|| DomainError::InvalidUrl(format!("no base URL for {}", self.url)))?
                .join(self.url.trim_start_matches('/'))
                .map_err(|e| DomainError::InvalidUrl(format!("{e}: {}", self.url))),
            Err(e) => Err(DomainError::InvalidUrl(format!("{e}: {}", self.url))),
        }
    }
}
