//! Navigation port

use pintalk_domain::Route;

/// Port for the client-side navigation triggered by session teardown.
///
/// Navigation is fire-and-forget: the embedding front end decides how
/// to leave the current view.
pub trait Navigator: Send + Sync {
    /// Navigates to `route`.
    fn navigate(&self, route: Route);
}
