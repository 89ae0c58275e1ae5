//! Session state container and snapshot computation.
//!
//! This module defines [`SessionState`], the single in-memory source of truth for
//! one signed-in session, and [`SessionSnapshot`], the read-only copy handed to
//! callers for rendering.
//!
//! # Architecture
//!
//! `SessionState` groups three independent slices:
//!
//! - **Trending**: the trending list, replaced wholesale per fetch
//! - **Search**: the paginated [`SearchState`] machine
//! - **Favorites**: the [`FavoritesStore`] adapter over persistence
//!
//! plus the selected [`Theme`]. Snapshots are computed on demand and own their
//! data, so a caller never holds the session lock while rendering.
//!
//! # Example
//!
//! ```rust
//! use marquee::app::SessionState;
//! use marquee::storage::{MemoryStore, PersistenceBridge};
//! use std::sync::Arc;
//!
//! let bridge = PersistenceBridge::new(Arc::new(MemoryStore::default()));
//! let state = SessionState::new(bridge);
//! let snapshot = state.snapshot();
//! assert!(snapshot.search_results.is_empty());
//! assert_eq!(snapshot.current_page, 1);
//! ```

use super::favorites::FavoritesStore;
use super::search::SearchState;
use crate::domain::{Item, Theme};
use crate::storage::PersistenceBridge;
use serde::Serialize;

/// Message recorded in [`TrendingState::error`] when the trending fetch fails.
pub const TRENDING_FAILED_MESSAGE: &str = "Failed to load trending items";

/// Trending list state. Not paginated; each fetch replaces the list.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TrendingState {
    pub items: Vec<Item>,
    pub loading: bool,
    pub error: Option<String>,
}

impl TrendingState {
    pub fn begin(&mut self) {
        self.loading = true;
        self.error = None;
    }

    /// Replaces the list with a fresh page of items.
    pub fn apply(&mut self, items: Vec<Item>) {
        self.items = items;
        self.loading = false;
    }

    /// Records a failure; the previous list is kept.
    pub fn fail(&mut self) {
        self.error = Some(TRENDING_FAILED_MESSAGE.to_string());
        self.loading = false;
    }
}

/// Central state container for one session.
///
/// Mutated only through [`CatalogSession`](super::CatalogSession), which guards
/// it with a mutex that is never held across an await point.
#[derive(Debug, Clone)]
pub struct SessionState {
    pub trending: TrendingState,
    pub search: SearchState,
    pub favorites: FavoritesStore,
    pub theme: Theme,
}

impl SessionState {
    /// Creates an empty state whose favorites write through `persistence`.
    ///
    /// The theme starts at its default; callers restore the persisted one.
    #[must_use]
    pub fn new(persistence: PersistenceBridge) -> Self {
        Self {
            trending: TrendingState::default(),
            search: SearchState::new(),
            favorites: FavoritesStore::new(persistence),
            theme: Theme::default(),
        }
    }

    /// Copies the current state into an owned [`SessionSnapshot`].
    #[must_use]
    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            trending_items: self.trending.items.clone(),
            trending_error: self.trending.error.clone(),
            search_results: self.search.results.clone(),
            favorite_items: self.favorites.items().to_vec(),
            search_query: self.search.query.clone(),
            current_page: self.search.current_page,
            total_pages: self.search.total_pages,
            is_loading: self.search.loading,
            error: self.search.error.clone(),
            has_more: self.search.has_more(),
            theme: self.theme,
        }
    }
}

/// Owned, read-only view of a session for rendering.
///
/// `is_loading` and `error` describe the search slice; trending carries its
/// own error so a failed trending fetch never masks search results.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SessionSnapshot {
    pub trending_items: Vec<Item>,
    pub trending_error: Option<String>,
    pub search_results: Vec<Item>,
    pub favorite_items: Vec<Item>,
    pub search_query: String,
    pub current_page: u32,
    pub total_pages: u32,
    pub is_loading: bool,
    pub error: Option<String>,
    /// `true` when `current_page < total_pages`; drives the "load more" affordance.
    pub has_more: bool,
    pub theme: Theme,
}

impl SessionSnapshot {
    /// Returns `true` if `id` is in the favorites set.
    #[must_use]
    pub fn is_favorite(&self, id: u64) -> bool {
        self.favorite_items.iter().any(|item| item.id == id)
    }
}
