//! Pintalk Infrastructure - Adapters and implementations
//!
//! This crate provides concrete implementations of the ports
//! defined in the application layer, plus configuration loading
//! and logging setup for binaries.

pub mod adapters;
pub mod config;
pub mod logging;
pub mod navigation;
pub mod persistence;

pub use adapters::ReqwestHttpClient;
pub use self::config::{ClientConfig, ConfigError};
pub use logging::init_tracing;
pub use navigation::{ChannelNavigator, TracingNavigator};
pub use persistence::FileTokenStore;
