//! Bearer token, storage key and refresh outcome types

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{DomainError, DomainResult};
use crate::response::ResponseSpec;

/// Backend error code meaning the presented token was rejected outright.
pub const TOKEN_NOT_VALID: &str = "token_not_valid";

/// Opaque bearer credential. Never empty.
#[derive(Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct AccessToken(String);

impl AccessToken {
    /// Wraps a raw token string.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::EmptyToken`] if the string is empty or whitespace.
    pub fn new(raw: impl Into<String>) -> DomainResult<Self> {
        let raw = raw.into();
        if raw.trim().is_empty() {
            return Err(DomainError::EmptyToken);
        }
        Ok(Self(raw))
    }

    /// Returns the raw token.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns the `Authorization` header value for this token.
    #[must_use]
    pub fn bearer(&self) -> String {
        format!("Bearer {}", self.0)
    }

    /// Returns a log-safe preview (first 8 chars + `...`).
    #[must_use]
    pub fn preview(&self) -> String {
        if self.0.len() > 12 {
            let cut = self
                .0
                .char_indices()
                .nth(8)
                .map_or(self.0.len(), |(i, _)| i);
            format!("{}...", &self.0[..cut])
        } else {
            self.0.clone()
        }
    }
}

// Keeps raw tokens out of debug logs.
impl fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("AccessToken").field(&self.preview()).finish()
    }
}

impl TryFrom<String> for AccessToken {
    type Error = DomainError;

    fn try_from(value: String) -> DomainResult<Self> {
        Self::new(value)
    }
}

impl From<AccessToken> for String {
    fn from(token: AccessToken) -> Self {
        token.0
    }
}

/// Fixed keys under which session state is persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StorageKey {
    /// The current bearer token.
    #[serde(rename = "access_token")]
    AccessToken,
    /// The signed-in account's session identifier.
    #[serde(rename = "pintalk_id")]
    SessionId,
}

impl StorageKey {
    /// Every key owned by a session; all are removed on teardown.
    pub const ALL: [Self; 2] = [Self::SessionId, Self::AccessToken];

    /// Returns the persisted key name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::AccessToken => "access_token",
            Self::SessionId => "pintalk_id",
        }
    }
}

impl fmt::Display for StorageKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result of one call to the refresh endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RefreshOutcome {
    /// The backend issued a new access token.
    Refreshed(AccessToken),
    /// The backend answered 204: the session needs no new token.
    NoRefreshNeeded,
    /// The refresh errored or returned no usable token.
    Failed,
}

impl RefreshOutcome {
    /// Interprets a refresh endpoint response.
    ///
    /// 204 means no refresh is needed; any other 2xx must carry a
    /// non-empty `access` field; everything else is a failure.
    #[must_use]
    pub fn from_response(response: &ResponseSpec) -> Self {
        #[derive(Deserialize)]
        struct RefreshBody {
            access: Option<String>,
        }

        if response.is_no_content() {
            return Self::NoRefreshNeeded;
        }
        if !response.is_success() {
            return Self::Failed;
        }
        response
            .json::<RefreshBody>()
            .ok()
            .and_then(|body| body.access)
            .and_then(|raw| AccessToken::new(raw).ok())
            .map_or(Self::Failed, Self::Refreshed)
    }
}

/// Client-side navigation target after a session is torn down.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Route {
    /// The login page, used when the backend reported an invalid token.
    Login,
    /// The generic not-found page, used for any other refresh failure.
    NotFound,
}

impl Route {
    /// Picks the redirect for a 401 whose refresh failed.
    #[must_use]
    pub fn for_failed_refresh(unauthorized: &ResponseSpec) -> Self {
        if unauthorized.error_code().as_deref() == Some(TOKEN_NOT_VALID) {
            Self::Login
        } else {
            Self::NotFound
        }
    }

    /// Returns the route path.
    #[must_use]
    pub const fn path(self) -> &'static str {
        match self {
            Self::Login => "/login",
            Self::NotFound => "/404",
        }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path())
    }
}
