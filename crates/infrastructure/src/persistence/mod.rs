//! Persistent session storage

mod token_repository;

pub use token_repository::FileTokenStore;
