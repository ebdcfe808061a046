//! Session state and token refresh.
//!
//! This module provides:
//! - In-memory token storage
//! - The session context holding client-wide default headers
//! - The single-flight refresh coordinator

mod refresh;
mod session;
mod token_store;

pub use refresh::{RefreshCoordinator, RefreshTicket};
pub use session::SessionContext;
pub use token_store::MemoryTokenStore;
