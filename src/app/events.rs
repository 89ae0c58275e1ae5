//! Session change notifications.
//!
//! Every state transition publishes one [`SessionEvent`] on the session's
//! broadcast channel. Events are notifications, not state: a subscriber reacts
//! by re-reading [`CatalogSession::snapshot`](super::CatalogSession::snapshot).

use crate::domain::Theme;

/// A transition that just happened in a [`CatalogSession`](super::CatalogSession).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
    /// The trending list was replaced.
    TrendingLoaded {
        count: usize,
    },

    /// The trending fetch failed; the previous list was kept.
    TrendingFailed {
        message: String,
    },

    /// A search request was admitted.
    SearchStarted {
        query: String,
        page: u32,
    },

    /// A search response was applied.
    SearchCompleted {
        query: String,
        page: u32,
        total_pages: u32,
        added: usize,
    },

    /// A search request failed.
    ///
    /// `surfaced` is `false` for best-effort requests whose failure was not
    /// recorded in the session error.
    SearchFailed {
        query: String,
        page: u32,
        message: String,
        surfaced: bool,
    },

    /// A response arrived after a newer request or a reset and was dropped.
    SearchSuperseded {
        query: String,
        page: u32,
    },

    /// Search results and query were cleared.
    SearchReset,

    /// The favorites set changed; `count` is its new size.
    FavoritesChanged {
        count: usize,
    },

    ThemeChanged(Theme),

    /// Startup loading finished.
    BootstrapFinished {
        trending_loaded: bool,
        favorites: usize,
        restored_query: Option<String>,
    },
}
