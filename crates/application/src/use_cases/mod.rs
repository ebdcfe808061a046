//! Application use cases (business logic orchestration).

mod session;

pub use session::*;
