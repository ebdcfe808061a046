//! Navigators that report forced redirects to the embedding front end.

use pintalk_application::Navigator;
use pintalk_domain::Route;
use tokio::sync::mpsc::{UnboundedReceiver, UnboundedSender, unbounded_channel};
use tracing::{debug, warn};

/// Navigator that only logs the redirect.
///
/// Suitable for headless use where there is no view to leave.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingNavigator;

impl Navigator for TracingNavigator {
    fn navigate(&self, route: Route) {
        warn!(%route, "navigation requested");
    }
}

/// Navigator that forwards every redirect over a channel.
///
/// The receiving side owns the actual view switch.
#[derive(Debug, Clone)]
pub struct ChannelNavigator {
    sender: UnboundedSender<Route>,
}

impl ChannelNavigator {
    /// Creates a navigator and the receiver its redirects arrive on.
    #[must_use]
    pub fn channel() -> (Self, UnboundedReceiver<Route>) {
        let (sender, receiver) = unbounded_channel();
        (Self { sender }, receiver)
    }
}

impl Navigator for ChannelNavigator {
    fn navigate(&self, route: Route) {
        if self.sender.send(route).is_err() {
            debug!(%route, "navigation receiver dropped");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_channel_navigator_forwards_routes() {
        let (navigator, mut receiver) = ChannelNavigator::channel();
        navigator.navigate(Route::Login);
        navigator.navigate(Route::NotFound);

        assert_eq!(receiver.try_recv().ok(), Some(Route::Login));
        assert_eq!(receiver.try_recv().ok(), Some(Route::NotFound));
        assert!(receiver.try_recv().is_err());
    }

    #[test]
    fn test_dropped_receiver_is_ignored() {
        let (navigator, receiver) = ChannelNavigator::channel();
        drop(receiver);
        navigator.navigate(Route::Login);
    }
}
