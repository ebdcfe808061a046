//! Port definitions (interfaces)
//!
//! Ports define the boundaries between the session core and external systems.
//! Each port is a trait implemented by adapters in the infrastructure layer.

mod http_client;
mod navigator;
mod token_store;

pub use http_client::{HttpClient, TransportError};
pub use navigator::Navigator;
pub use token_store::{StorageError, TokenStore};
