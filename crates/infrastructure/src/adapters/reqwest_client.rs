//! Bare HTTP client implementation using reqwest.
//!
//! This adapter implements the `HttpClient` port with no middleware. It is
//! the transport under the authenticated client, and the client used for
//! the refresh call and for replays.

use std::time::{Duration, Instant};

use async_trait::async_trait;
use pintalk_application::{ClientResult, HttpClient, TransportError};
use pintalk_domain::request::{JSON_CONTENT_TYPE, VERSIONED_ACCEPT};
use pintalk_domain::{Header, Headers, HttpMethod, RequestSpec, ResponseSpec};
use reqwest::header::{ACCEPT, CONTENT_TYPE, HeaderMap, HeaderValue};
use reqwest::{Client, Method};
use tracing::trace;
use url::Url;

use crate::config::ClientConfig;

/// HTTP client implementation using reqwest.
///
/// Relative request URLs are resolved against the configured base URL.
/// Cookies are kept across calls so the refresh credential travels with
/// every request.
#[derive(Debug, Clone)]
pub struct ReqwestHttpClient {
    client: Client,
    base_url: Option<Url>,
    timeout_ms: u64,
}

impl ReqwestHttpClient {
    /// Creates a client from configuration.
    ///
    /// - Default headers: `Content-Type: application/json`,
    ///   `Accept: application/json; version=1`
    /// - Cookie store: enabled
    /// - Timeout and User-Agent: from `config`
    ///
    /// # Errors
    ///
    /// Returns an error if the client cannot be created.
    pub fn new(config: &ClientConfig) -> Result<Self, TransportError> {
        let client = Client::builder()
            .user_agent(config.user_agent.clone())
            .default_headers(Self::default_headers())
            .cookie_store(true)
            .timeout(Duration::from_millis(config.timeout_ms))
            .build()
            .map_err(|e| TransportError::Other(e.to_string()))?;

        Ok(Self {
            client,
            base_url: Some(config.api_base_url.clone()),
            timeout_ms: config.timeout_ms,
        })
    }

    /// Creates a client around a preconfigured reqwest client.
    #[must_use]
    pub const fn with_client(client: Client, base_url: Option<Url>, timeout_ms: u64) -> Self {
        Self {
            client,
            base_url,
            timeout_ms,
        }
    }

    /// Returns the base URL relative paths are joined to.
    #[must_use]
    pub const fn base_url(&self) -> Option<&Url> {
        self.base_url.as_ref()
    }

    fn default_headers() -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static(JSON_CONTENT_TYPE));
        headers.insert(ACCEPT, HeaderValue::from_static(VERSIONED_ACCEPT));
        headers
    }

    /// Converts domain `HttpMethod` to reqwest `Method`.
    const fn to_reqwest_method(method: HttpMethod) -> Method {
        match method {
            HttpMethod::Get => Method::GET,
            HttpMethod::Post => Method::POST,
            HttpMethod::Put => Method::PUT,
            HttpMethod::Patch => Method::PATCH,
            HttpMethod::Delete => Method::DELETE,
        }
    }

    /// Maps reqwest errors to `TransportError`.
    fn map_error(error: &reqwest::Error, timeout_ms: u64) -> TransportError {
        if error.is_timeout() {
            return TransportError::Timeout { timeout_ms };
        }

        if error.is_builder() {
            return TransportError::InvalidHeader(error.to_string());
        }

        if error.is_connect() {
            let message = error.to_string();
            if message.to_lowercase().contains("refused") {
                return TransportError::ConnectionRefused {
                    host: error
                        .url()
                        .and_then(Url::host_str)
                        .unwrap_or("unknown")
                        .to_string(),
                };
            }
            return TransportError::ConnectionFailed(message);
        }

        TransportError::Other(error.to_string())
    }

    fn collect_headers(headers: &HeaderMap) -> Headers {
        headers
            .iter()
            .map(|(k, v)| Header::new(k.as_str(), v.to_str().unwrap_or("<binary>")))
            .collect()
    }
}

#[async_trait]
impl HttpClient for ReqwestHttpClient {
    async fn execute(&self, request: RequestSpec) -> ClientResult<ResponseSpec> {
        let url = request
            .resolve_url(self.base_url.as_ref())
            .map_err(|e| TransportError::InvalidUrl(e.to_string()))?;

        let start = Instant::now();

        let mut builder = self
            .client
            .request(Self::to_reqwest_method(request.method), url);
        for header in request.headers.iter() {
            builder = builder.header(&header.name, &header.value);
        }
        if let Some(body) = request.body {
            builder = builder.body(body);
        }

        trace!(request_id = %request.id, "sending");
        let response = builder
            .send()
            .await
            .map_err(|e| Self::map_error(&e, self.timeout_ms))?;

        let status = response.status();
        let headers = Self::collect_headers(response.headers());
        let body = response
            .text()
            .await
            .map_err(|e| TransportError::Body(e.to_string()))?;

        Ok(ResponseSpec {
            status: status.as_u16(),
            status_text: status.canonical_reason().unwrap_or_default().to_string(),
            headers,
            body,
            duration: start.elapsed(),
        })
    }
}
