//! Client-wide default headers.

use std::sync::{PoisonError, RwLock};

use pintalk_domain::request::AUTHORIZATION;
use pintalk_domain::{AccessToken, Headers};

/// Default headers applied to every request of one authenticated client.
///
/// Shared between the client and whoever bootstraps the session.
#[derive(Debug, Default)]
pub struct SessionContext {
    defaults: RwLock<Headers>,
}

impl SessionContext {
    /// Creates a context with no default headers.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a context carrying the JSON API headers
    /// (`Content-Type: application/json`, `Accept: application/json; version=1`).
    #[must_use]
    pub fn json_api() -> Self {
        Self::with_defaults(Headers::json_api())
    }

    /// Creates a context starting from the given defaults.
    #[must_use]
    pub const fn with_defaults(defaults: Headers) -> Self {
        Self {
            defaults: RwLock::new(defaults),
        }
    }

    /// Sets `Authorization: Bearer <token>` as a default header.
    ///
    /// Empty tokens are ignored.
    pub fn set_author_header(&self, token: &str) {
        let Ok(token) = AccessToken::new(token) else {
            return;
        };
        self.defaults
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .set(AUTHORIZATION, token.bearer());
    }

    /// Removes the default `Authorization` header.
    pub fn unset_author_header(&self) {
        self.defaults
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(AUTHORIZATION);
    }

    /// Returns the default `Authorization` value, if set.
    #[must_use]
    pub fn authorization(&self) -> Option<String> {
        self.defaults
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(AUTHORIZATION)
            .map(str::to_string)
    }

    /// Returns a snapshot of the default headers.
    #[must_use]
    pub fn default_headers(&self) -> Headers {
        self.defaults
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}
