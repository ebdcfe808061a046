//! Session credential domain types

mod types;

pub use types::{AccessToken, RefreshOutcome, Route, StorageKey, TOKEN_NOT_VALID};
