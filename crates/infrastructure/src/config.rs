//! Client configuration.
//!
//! Values are layered with the `config` crate: built-in defaults, then an
//! optional `pintalk.toml`, then `PINTALK_*` environment variables
//! (`PINTALK_API_BASE_URL`, `PINTALK_TIMEOUT_MS`, `PINTALK_USER_AGENT`,
//! `PINTALK_TOKEN_FILE`).

use std::path::{Path, PathBuf};

use config::{Config, Environment, File};
use serde::Deserialize;
use thiserror::Error;
use url::Url;

/// Prefix for environment overrides.
pub const ENV_PREFIX: &str = "PINTALK";

const DEFAULT_TIMEOUT_MS: i64 = 30_000;
const DEFAULT_TOKEN_FILE: &str = ".pintalk/session.json";

/// Errors raised while loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A source could not be read or deserialized.
    #[error("configuration error: {0}")]
    Load(#[from] config::ConfigError),

    /// The API base URL is not an absolute URL.
    #[error("invalid API base URL {url:?}: {message}")]
    InvalidBaseUrl {
        /// The configured value.
        url: String,
        /// Why it was rejected.
        message: String,
    },
}

#[derive(Debug, Deserialize)]
struct RawConfig {
    api_base_url: String,
    timeout_ms: u64,
    user_agent: String,
    token_file: PathBuf,
}

/// Settings for the bare client and the session store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Backend base URL, always ending in `/`.
    pub api_base_url: Url,
    /// Per-request timeout.
    pub timeout_ms: u64,
    /// User-Agent header.
    pub user_agent: String,
    /// Where the file token store keeps the session.
    pub token_file: PathBuf,
}

impl ClientConfig {
    /// Creates a configuration with defaults for everything but the base URL.
    ///
    /// # Errors
    ///
    /// Returns an error if `api_base_url` is not an absolute URL.
    pub fn new(api_base_url: &str) -> Result<Self, ConfigError> {
        Ok(Self {
            api_base_url: normalize_base_url(api_base_url)?,
            timeout_ms: DEFAULT_TIMEOUT_MS.unsigned_abs(),
            user_agent: default_user_agent(),
            token_file: PathBuf::from(DEFAULT_TOKEN_FILE),
        })
    }

    /// Loads configuration from `file` (or `pintalk.toml` if present) and
    /// the process environment.
    ///
    /// # Errors
    ///
    /// Returns an error if no base URL is configured or a value is invalid.
    pub fn load(file: Option<&Path>) -> Result<Self, ConfigError> {
        Self::load_from(file, Environment::with_prefix(ENV_PREFIX))
    }

    /// Loads configuration from an explicit file and environment source.
    ///
    /// # Errors
    ///
    /// Returns an error if a source is unreadable, no base URL is
    /// configured, or a value is invalid.
    pub fn load_from(file: Option<&Path>, env: Environment) -> Result<Self, ConfigError> {
        let file = file.map_or_else(
            || File::with_name("pintalk").required(false),
            |path| File::from(path).required(true),
        );

        let raw: RawConfig = Config::builder()
            .set_default("timeout_ms", DEFAULT_TIMEOUT_MS)?
            .set_default("user_agent", default_user_agent())?
            .set_default("token_file", DEFAULT_TOKEN_FILE)?
            .add_source(file)
            .add_source(env)
            .build()?
            .try_deserialize()?;

        Ok(Self {
            api_base_url: normalize_base_url(&raw.api_base_url)?,
            timeout_ms: raw.timeout_ms,
            user_agent: raw.user_agent,
            token_file: raw.token_file,
        })
    }
}

fn default_user_agent() -> String {
    format!("Pintalk/{}", env!("CARGO_PKG_VERSION"))
}

/// Parses the base URL and makes sure it ends in `/`.
///
/// Without the trailing slash `Url::join` would replace the last path
/// segment instead of appending to it.
fn normalize_base_url(raw: &str) -> Result<Url, ConfigError> {
    let invalid = |message: String| ConfigError::InvalidBaseUrl {
        url: raw.to_string(),
        message,
    };

    let mut url = Url::parse(raw.trim()).map_err(|e| invalid(e.to_string()))?;
    if url.cannot_be_a_base() {
        return Err(invalid("URL cannot be a base".to_string()));
    }
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    Ok(url)
}
