//! View mode types for the session.
//!
//! A [`ViewMode`] names one of the item lists a presenter can show. Each mode
//! knows its heading, which snapshot list it reads, and what to say when that
//! list is empty.
//!
//! # Example
//!
//! ```rust
//! use marquee::app::ViewMode;
//!
//! assert_eq!(ViewMode::default(), ViewMode::Trending);
//! assert_eq!(ViewMode::Favorites.title(), "My Favorites");
//! ```

use super::state::SessionSnapshot;
use crate::domain::Item;

/// Item list selected for display.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ViewMode {
    /// Today's trending items.
    #[default]
    Trending,

    /// Accumulated results of the active search.
    Search,

    /// The favorites set, in insertion order.
    Favorites,
}

impl ViewMode {
    #[must_use]
    pub const fn title(self) -> &'static str {
        match self {
            Self::Trending => "Trending Movies",
            Self::Search => "Search Results",
            Self::Favorites => "My Favorites",
        }
    }

    /// Returns the list this mode displays.
    #[must_use]
    pub fn items(self, snapshot: &SessionSnapshot) -> &[Item] {
        match self {
            Self::Trending => &snapshot.trending_items,
            Self::Search => &snapshot.search_results,
            Self::Favorites => &snapshot.favorite_items,
        }
    }

    /// Message shown when [`items`](Self::items) is empty.
    #[must_use]
    pub fn empty_message(self, snapshot: &SessionSnapshot) -> &'static str {
        match self {
            Self::Trending if snapshot.trending_error.is_some() => "Trending movies are unavailable right now.",
            Self::Trending => "Nothing is trending yet.",
            Self::Search if snapshot.search_query.is_empty() => "Search for movies by title.",
            Self::Search if snapshot.is_loading => "Searching...",
            Self::Search => "No movies found. Try a different search term.",
            Self::Favorites => "No favorites yet. Add movies you love to see them here.",
        }
    }
}
