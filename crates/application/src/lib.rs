//! Pintalk Application - Ports, middleware and session use cases
//!
//! This crate defines the application layer with:
//! - Port traits (HTTP client, token store, navigator)
//! - The request/response middleware pipeline
//! - The authenticated client and its single-flight refresh coordinator
//! - Session bootstrap and teardown
//! - Application-level error handling

pub mod auth;
pub mod client;
pub mod error;
pub mod middleware;
pub mod ports;
pub mod use_cases;

#[cfg(test)]
pub(crate) mod testing;

pub use auth::{MemoryTokenStore, RefreshCoordinator, RefreshTicket, SessionContext};
pub use client::{AuthenticatedClient, AuthenticatedClientBuilder, REFRESH_PATH};
pub use error::{ClientError, ClientResult};
pub use middleware::{
    BearerAuth, DefaultHeaders, RefreshOnUnauthorized, RequestMiddleware, ResponseAction,
    ResponseMiddleware,
};
pub use ports::{HttpClient, Navigator, StorageError, TokenStore, TransportError};
pub use use_cases::{BeginSessionInput, SessionManager};
