//! Pintalk Domain - Core session client types
//!
//! This crate defines the domain model for the Pintalk session client:
//! request and response descriptors, bearer tokens, refresh outcomes
//! and the redirect routes taken when a session is torn down.
//! All types here are pure Rust with no I/O dependencies.

pub mod auth;
pub mod error;
pub mod request;
pub mod response;

pub use auth::{AccessToken, RefreshOutcome, Route, StorageKey, TOKEN_NOT_VALID};
pub use error::{DomainError, DomainResult};
pub use request::{Header, Headers, HttpMethod, RequestSpec};
pub use response::ResponseSpec;
