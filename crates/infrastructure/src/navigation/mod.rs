//! Navigator adapters

mod channel;

pub use channel::{ChannelNavigator, TracingNavigator};
