//! Search and pagination state machine.
//!
//! [`SearchState`] holds the active query, the accumulated result pages, the page
//! cursor, and the loading/error flags. Its methods are the only way the session
//! mutates search state, so each transition keeps the invariants below intact.
//!
//! # Invariants
//!
//! - `current_page` starts at 1 and advances by exactly 1 per successful append.
//! - A page-1 response replaces all results; a page-N response appends.
//! - A failed request leaves the results untouched.
//! - `loading` is the single admission gate for "load more".
//!
//! # Request tokens
//!
//! Each request takes a fresh generation number. A response is applied only if
//! its token is still the latest, so a slow response for a superseded query can
//! never overwrite newer results. [`SearchState::reset`] also takes a generation,
//! invalidating anything still in flight.

use crate::domain::{Item, ItemPage};

/// Message recorded in [`SearchState::error`] when a user search fails.
pub const SEARCH_FAILED_MESSAGE: &str = "Failed to search catalog";

/// Result of a search or load-more call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchOutcome {
    /// The response was applied to the session state.
    Applied {
        /// Page that was fetched.
        page: u32,
        /// Number of items the page contributed.
        added: usize,
        /// Total pages reported by the service.
        total_pages: u32,
    },
    /// The query was blank; the search state was reset instead.
    Reset,
    /// `load_more` was refused: a request is in flight or there are no more pages.
    Skipped,
    /// A newer request or a reset overtook this one; its response was dropped.
    Superseded,
}

/// A request admitted by [`SearchState::begin`] or [`SearchState::admit_next_page`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchTicket {
    pub token: u64,
    pub query: String,
    pub page: u32,
}

/// Mutable search state for one session.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchState {
    /// Active query; empty when no search is active.
    pub query: String,

    /// Result items in page order. Duplicates are kept if the service repeats items.
    pub results: Vec<Item>,

    /// 1-based page cursor of the last applied response.
    pub current_page: u32,

    /// Total pages reported by the service; 0 means unknown or empty.
    pub total_pages: u32,

    /// `true` while a request is outstanding.
    pub loading: bool,

    /// Message of the last failed user-initiated request.
    pub error: Option<String>,

    /// Generation of the latest admitted request.
    generation: u64,
}

impl Default for SearchState {
    fn default() -> Self {
        Self {
            query: String::new(),
            results: Vec::new(),
            current_page: 1,
            total_pages: 0,
            loading: false,
            error: None,
            generation: 0,
        }
    }
}

impl SearchState {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Clears results and query, rewinds the cursor, and invalidates in-flight requests.
    ///
    /// Idempotent: calling it on an already reset state leaves it reset.
    pub fn reset(&mut self) {
        self.results.clear();
        self.query.clear();
        self.current_page = 1;
        self.total_pages = 0;
        self.loading = false;
        self.generation = self.generation.wrapping_add(1);
    }

    /// Admits a request for `query` at `page` unconditionally.
    ///
    /// Sets `loading`, clears `error`, and returns the ticket whose token the
    /// response must present.
    pub fn begin(&mut self, query: &str, page: u32) -> SearchTicket {
        self.loading = true;
        self.error = None;
        self.generation = self.generation.wrapping_add(1);

        SearchTicket {
            token: self.generation,
            query: query.to_string(),
            page,
        }
    }

    /// Admits a request for the page after the cursor, if one is allowed.
    ///
    /// Returns `None` without touching state while a request is in flight or
    /// when `current_page >= total_pages` (which covers `total_pages == 0`).
    pub fn admit_next_page(&mut self) -> Option<SearchTicket> {
        if self.loading || self.current_page >= self.total_pages {
            return None;
        }
        let query = self.query.clone();
        let page = self.current_page + 1;
        Some(self.begin(&query, page))
    }

    /// Returns `true` if `token` belongs to the latest admitted request.
    #[must_use]
    pub const fn is_current(&self, token: u64) -> bool {
        self.generation == token
    }

    /// Applies a successful response.
    ///
    /// Returns the number of items added, or `None` if the ticket is stale and
    /// the response was dropped.
    pub fn apply(&mut self, ticket: &SearchTicket, response: ItemPage) -> Option<usize> {
        if !self.is_current(ticket.token) {
            return None;
        }

        let added = response.results.len();
        if ticket.page <= 1 {
            self.results = response.results;
        } else {
            self.results.extend(response.results);
        }

        self.current_page = ticket.page;
        self.total_pages = response.total_pages;
        self.query.clone_from(&ticket.query);
        self.loading = false;

        Some(added)
    }

    /// Records a failed request.
    ///
    /// When `message` is `None` the failure is best-effort: `loading` is cleared
    /// but `error` is left as it was. Returns `false` if the ticket is stale.
    pub fn fail(&mut self, ticket: &SearchTicket, message: Option<&str>) -> bool {
        if !self.is_current(ticket.token) {
            return false;
        }
        if let Some(message) = message {
            self.error = Some(message.to_string());
        }
        self.loading = false;
        true
    }

    /// Returns `true` when another page can be requested.
    #[must_use]
    pub const fn has_more(&self) -> bool {
        self.current_page < self.total_pages
    }
}
