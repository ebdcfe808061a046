//! HTTP request domain types

mod header;
mod method;
mod spec;

pub use header::{AUTHORIZATION, Header, Headers, JSON_CONTENT_TYPE, VERSIONED_ACCEPT};
pub use method::HttpMethod;
pub use spec::RequestSpec;
