//! Catalog session manager and bootstrap sequencer.
//!
//! [`CatalogSession`] is the one object a signed-in user interacts with. It owns
//! the [`SessionState`], talks to the remote catalog through [`CatalogApi`],
//! writes through the [`PersistenceBridge`], and publishes a [`SessionEvent`]
//! after every transition.
//!
//! # Concurrency
//!
//! State sits behind a `std::sync::Mutex` that is only locked inside
//! synchronous sections and never across an `.await`. Operations may be
//! started concurrently; they interleave only at the remote calls. A search
//! response is applied only if its request token is still the latest, so the
//! last-issued request wins regardless of arrival order.
//!
//! # Bootstrap
//!
//! [`CatalogSession::bootstrap`] runs once per session with a signed-in
//! identity. It loads trending items, loads persisted favorites, and replays the
//! last persisted search concurrently. Replaying the search is best-effort: its
//! failure is logged and reported in [`BootstrapReport`], never surfaced as a
//! session error.

use super::events::SessionEvent;
use super::search::{SearchOutcome, SearchTicket, SEARCH_FAILED_MESSAGE};
use super::state::{SessionSnapshot, SessionState, TRENDING_FAILED_MESSAGE};
use crate::api::CatalogApi;
use crate::domain::error::{CatalogError, Result};
use crate::domain::{DetailItem, Genre, Item, ItemPage, SessionIdentity, Theme};
use crate::storage::PersistenceBridge;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use tokio::sync::broadcast;
use tokio::task::JoinHandle;
use tracing::Instrument;

/// Buffered events per subscriber before the slowest one starts lagging.
const EVENT_CAPACITY: usize = 64;

/// Who started a search, which decides how its failure is handled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SearchOrigin {
    /// Started by the user; failures are recorded and returned.
    User,
    /// Replay of the persisted last search; failures are only logged.
    Restore,
}

/// What happened during [`CatalogSession::bootstrap`].
#[derive(Debug, Default)]
pub struct BootstrapReport {
    /// Number of trending items loaded, `None` if the fetch failed.
    pub trending: Option<usize>,

    /// Number of favorites loaded from persistence.
    pub favorites: usize,

    /// Persisted query that was replayed. `None` when nothing was stored or a
    /// newer search overtook the replay.
    pub restored_query: Option<String>,

    /// Why replaying the last search failed. Never mirrored into session state.
    pub restoration_error: Option<CatalogError>,
}

/// Session manager for one signed-in user.
///
/// # Example
///
/// ```rust,no_run
/// use marquee::app::CatalogSession;
/// use marquee::api::TmdbClient;
/// use marquee::domain::SessionIdentity;
/// use marquee::storage::{MemoryStore, PersistenceBridge};
/// use marquee::Config;
/// use std::sync::Arc;
///
/// # async fn run() -> marquee::Result<()> {
/// let api = Arc::new(TmdbClient::from_config(&Config::default())?);
/// let bridge = PersistenceBridge::new(Arc::new(MemoryStore::default()));
/// let session = CatalogSession::new(api, bridge);
///
/// session.bootstrap(Some(&SessionIdentity::new("user"))).await;
/// session.search("batman", 1).await?;
/// session.load_more().await?;
/// println!("{} results", session.snapshot().search_results.len());
/// # Ok(())
/// # }
/// ```
pub struct CatalogSession {
    api: Arc<dyn CatalogApi>,
    persistence: PersistenceBridge,
    state: Mutex<SessionState>,
    events: broadcast::Sender<SessionEvent>,
    bootstrapped: AtomicBool,
}

impl CatalogSession {
    /// Creates a session and restores the persisted theme.
    ///
    /// Favorites, trending items, and the last search are loaded by
    /// [`bootstrap`](Self::bootstrap), not here.
    #[must_use]
    pub fn new(api: Arc<dyn CatalogApi>, persistence: PersistenceBridge) -> Self {
        let mut state = SessionState::new(persistence.clone());
        state.theme = persistence.read_theme().unwrap_or_default();

        let (events, _) = broadcast::channel(EVENT_CAPACITY);

        Self {
            api,
            persistence,
            state: Mutex::new(state),
            events,
            bootstrapped: AtomicBool::new(false),
        }
    }

    /// Locks the state for a synchronous section.
    ///
    /// A poisoned lock is recovered: every mutation leaves the state consistent
    /// before it can panic.
    fn with_state<R>(&self, f: impl FnOnce(&mut SessionState) -> R) -> R {
        let mut guard = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        f(&mut guard)
    }

    fn publish(&self, event: SessionEvent) {
        tracing::trace!(event = ?event, "publishing session event");
        // Err only means nobody is subscribed.
        let _ = self.events.send(event);
    }

    /// Returns an owned copy of the current state.
    #[must_use]
    pub fn snapshot(&self) -> SessionSnapshot {
        self.with_state(|state| state.snapshot())
    }

    /// Subscribes to session events published from now on.
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<SessionEvent> {
        self.events.subscribe()
    }

    /// Returns `true` once [`bootstrap`](Self::bootstrap) has started.
    #[must_use]
    pub fn is_bootstrapped(&self) -> bool {
        self.bootstrapped.load(Ordering::SeqCst)
    }

    // ------------------------------------------------------------------
    // Search
    // ------------------------------------------------------------------

    /// Searches the catalog for `query` and applies page `page` of the results.
    ///
    /// A blank query resets the search instead and returns
    /// [`SearchOutcome::Reset`]. Page 0 is treated as page 1. Page 1 replaces
    /// the current results and is persisted as the last search; later pages
    /// append.
    ///
    /// # Errors
    ///
    /// Returns the catalog error if the request fails. The session error is
    /// set to a user-facing message and the previous results are kept.
    pub async fn search(&self, query: &str, page: u32) -> Result<SearchOutcome> {
        self.run_search(query, page, SearchOrigin::User).await
    }

    /// Fetches the page after the current one for the active query.
    ///
    /// Returns [`SearchOutcome::Skipped`] without a request while another
    /// search is in flight or when the last page has been reached.
    ///
    /// # Errors
    ///
    /// Same as [`search`](Self::search).
    pub async fn load_more(&self) -> Result<SearchOutcome> {
        let Some(ticket) = self.with_state(|state| state.search.admit_next_page()) else {
            tracing::debug!("load more skipped");
            return Ok(SearchOutcome::Skipped);
        };
        self.execute_search(ticket, SearchOrigin::User).await
    }

    /// Clears search results and query and drops any in-flight response.
    pub fn reset_search(&self) {
        self.with_state(|state| state.search.reset());
        tracing::debug!("search reset");
        self.publish(SessionEvent::SearchReset);
    }

    async fn run_search(&self, query: &str, page: u32, origin: SearchOrigin) -> Result<SearchOutcome> {
        if query.trim().is_empty() {
            self.reset_search();
            return Ok(SearchOutcome::Reset);
        }

        let page = page.max(1);
        let ticket = self.with_state(|state| state.search.begin(query, page));
        self.execute_search(ticket, origin).await
    }

    async fn execute_search(&self, ticket: SearchTicket, origin: SearchOrigin) -> Result<SearchOutcome> {
        let span = tracing::debug_span!(
            "search",
            query = %ticket.query,
            page = ticket.page,
            token = ticket.token,
            origin = ?origin
        );

        self.publish(SessionEvent::SearchStarted {
            query: ticket.query.clone(),
            page: ticket.page,
        });

        let response = self
            .api
            .search_catalog(&ticket.query, ticket.page)
            .instrument(span)
            .await;

        match response {
            Ok(response) => {
                let total_pages = response.total_pages;
                let Some(added) = self.with_state(|state| state.search.apply(&ticket, response)) else {
                    return Ok(self.superseded(&ticket));
                };

                if ticket.page == 1 {
                    if let Err(e) = self.persistence.write_last_search(&ticket.query) {
                        tracing::warn!(error = %e, "failed to persist last search");
                    }
                }

                tracing::debug!(query = %ticket.query, page = ticket.page, added = added, total_pages = total_pages, "search applied");
                self.publish(SessionEvent::SearchCompleted {
                    query: ticket.query.clone(),
                    page: ticket.page,
                    total_pages,
                    added,
                });

                Ok(SearchOutcome::Applied {
                    page: ticket.page,
                    added,
                    total_pages,
                })
            }
            Err(e) => {
                let message = match origin {
                    SearchOrigin::User => Some(SEARCH_FAILED_MESSAGE),
                    SearchOrigin::Restore => None,
                };
                let current = self.with_state(|state| {
                    let current = state.search.fail(&ticket, message);
                    if current && origin == SearchOrigin::Restore {
                        // The restored query stays visible even though its results did not load.
                        state.search.query.clone_from(&ticket.query);
                    }
                    current
                });
                if !current {
                    return Ok(self.superseded(&ticket));
                }

                tracing::warn!(query = %ticket.query, page = ticket.page, error = %e, "search failed");
                self.publish(SessionEvent::SearchFailed {
                    query: ticket.query.clone(),
                    page: ticket.page,
                    message: SEARCH_FAILED_MESSAGE.to_string(),
                    surfaced: origin == SearchOrigin::User,
                });
                Err(e)
            }
        }
    }

    fn superseded(&self, ticket: &SearchTicket) -> SearchOutcome {
        tracing::debug!(query = %ticket.query, page = ticket.page, token = ticket.token, "stale search response dropped");
        self.publish(SessionEvent::SearchSuperseded {
            query: ticket.query.clone(),
            page: ticket.page,
        });
        SearchOutcome::Superseded
    }

    // ------------------------------------------------------------------
    // Favorites
    // ------------------------------------------------------------------

    /// Adds `item` to favorites. Returns `false` if it was already present.
    pub fn add_favorite(&self, item: Item) -> bool {
        let (added, count) = self.with_state(|state| {
            let added = state.favorites.add(item);
            (added, state.favorites.len())
        });
        if added {
            self.publish(SessionEvent::FavoritesChanged { count });
        }
        added
    }

    /// Removes the favorite with `id`. Returns `false` if it was not present.
    pub fn remove_favorite(&self, id: u64) -> bool {
        let (removed, count) = self.with_state(|state| {
            let removed = state.favorites.remove(id);
            (removed, state.favorites.len())
        });
        if removed {
            self.publish(SessionEvent::FavoritesChanged { count });
        }
        removed
    }

    /// Flips membership of `item`. Returns whether it is now a favorite.
    pub fn toggle_favorite(&self, item: Item) -> bool {
        let (now_favorite, count) = self.with_state(|state| {
            let now_favorite = state.favorites.toggle(item);
            (now_favorite, state.favorites.len())
        });
        self.publish(SessionEvent::FavoritesChanged { count });
        now_favorite
    }

    #[must_use]
    pub fn is_favorite(&self, id: u64) -> bool {
        self.with_state(|state| state.favorites.is_favorite(id))
    }

    #[must_use]
    pub fn favorites(&self) -> Vec<Item> {
        self.with_state(|state| state.favorites.items().to_vec())
    }

    /// Removes every favorite and persists the empty set.
    pub fn clear_favorites(&self) {
        self.with_state(|state| state.favorites.clear());
        tracing::debug!("favorites cleared");
        self.publish(SessionEvent::FavoritesChanged { count: 0 });
    }

    /// Reloads favorites from persistence, replacing the in-memory set.
    pub fn load_favorites(&self) -> usize {
        let count = self.with_state(|state| state.favorites.load());
        self.publish(SessionEvent::FavoritesChanged { count });
        count
    }

    // ------------------------------------------------------------------
    // Trending and detail
    // ------------------------------------------------------------------

    /// Replaces the trending list with the first trending page.
    ///
    /// # Errors
    ///
    /// Returns the catalog error if the fetch fails. The trending error is set
    /// and the previous list is kept.
    pub async fn refresh_trending(&self) -> Result<usize> {
        self.with_state(|state| state.trending.begin());

        let response = self
            .api
            .fetch_trending(1)
            .instrument(tracing::debug_span!("refresh_trending"))
            .await;

        match response {
            Ok(page) => {
                let count = page.results.len();
                self.with_state(|state| state.trending.apply(page.results));
                tracing::debug!(count = count, "trending loaded");
                self.publish(SessionEvent::TrendingLoaded { count });
                Ok(count)
            }
            Err(e) => {
                self.with_state(|state| state.trending.fail());
                tracing::warn!(error = %e, "trending fetch failed");
                self.publish(SessionEvent::TrendingFailed {
                    message: TRENDING_FAILED_MESSAGE.to_string(),
                });
                Err(e)
            }
        }
    }

    /// Fetches the full record for one item. Session state is not touched.
    ///
    /// # Errors
    ///
    /// Returns the catalog error if the fetch fails.
    pub async fn item_detail(&self, id: u64) -> Result<DetailItem> {
        self.api
            .fetch_detail(id)
            .instrument(tracing::debug_span!("item_detail", id = id))
            .await
    }

    /// Lists the catalog genres.
    ///
    /// # Errors
    ///
    /// Returns the catalog error if the fetch fails.
    pub async fn genres(&self) -> Result<Vec<Genre>> {
        self.api.fetch_genres().instrument(tracing::debug_span!("genres")).await
    }

    /// Browses items in one genre. Session state is not touched.
    ///
    /// # Errors
    ///
    /// Returns the catalog error if the fetch fails.
    pub async fn discover(&self, genre_id: u32, page: u32) -> Result<ItemPage> {
        self.api
            .discover_by_genre(genre_id, page.max(1))
            .instrument(tracing::debug_span!("discover", genre_id = genre_id, page = page))
            .await
    }

    // ------------------------------------------------------------------
    // Theme
    // ------------------------------------------------------------------

    #[must_use]
    pub fn theme(&self) -> Theme {
        self.with_state(|state| state.theme)
    }

    /// Selects `theme` and persists it.
    pub fn set_theme(&self, theme: Theme) {
        self.with_state(|state| state.theme = theme);
        if let Err(e) = self.persistence.write_theme(theme) {
            tracing::warn!(error = %e, theme = theme.as_str(), "failed to persist theme");
        }
        self.publish(SessionEvent::ThemeChanged(theme));
    }

    /// Switches between light and dark. Returns the new theme.
    pub fn toggle_theme(&self) -> Theme {
        let theme = self.theme().toggled();
        self.set_theme(theme);
        theme
    }

    // ------------------------------------------------------------------
    // Bootstrap
    // ------------------------------------------------------------------

    /// Loads startup data once a user is signed in.
    ///
    /// Returns `None` without doing anything when `identity` is `None` or when
    /// the session was already bootstrapped. Otherwise the trending fetch, the
    /// favorites load, and the last-search replay run concurrently and the
    /// returned report describes each.
    pub async fn bootstrap(&self, identity: Option<&SessionIdentity>) -> Option<BootstrapReport> {
        let Some(identity) = identity else {
            tracing::debug!("bootstrap skipped, nobody signed in");
            return None;
        };
        if self.bootstrapped.swap(true, Ordering::SeqCst) {
            tracing::debug!("bootstrap skipped, already done");
            return None;
        }

        let span = tracing::info_span!("bootstrap", user = %identity.username);
        let report = async {
            let (trending, favorites, (restored_query, restoration_error)) = futures_util::join!(
                self.refresh_trending(),
                async { self.load_favorites() },
                self.restore_last_search(),
            );

            let report = BootstrapReport {
                trending: trending.ok(),
                favorites,
                restored_query,
                restoration_error,
            };

            tracing::info!(
                trending = ?report.trending,
                favorites = report.favorites,
                restored_query = ?report.restored_query,
                "bootstrap finished"
            );
            self.publish(SessionEvent::BootstrapFinished {
                trending_loaded: report.trending.is_some(),
                favorites: report.favorites,
                restored_query: report.restored_query.clone(),
            });
            report
        }
        .instrument(span)
        .await;

        Some(report)
    }

    /// Runs [`bootstrap`](Self::bootstrap) on a tokio task.
    ///
    /// Must be called from within a tokio runtime.
    pub fn spawn_bootstrap(self: &Arc<Self>, identity: SessionIdentity) -> JoinHandle<Option<BootstrapReport>> {
        let session = Arc::clone(self);
        tokio::spawn(async move { session.bootstrap(Some(&identity)).await })
    }

    async fn restore_last_search(&self) -> (Option<String>, Option<CatalogError>) {
        let Some(query) = self
            .persistence
            .read_last_search()
            .filter(|query| !query.trim().is_empty())
        else {
            return (None, None);
        };

        match self.run_search(&query, 1, SearchOrigin::Restore).await {
            Ok(SearchOutcome::Applied { .. }) => (Some(query), None),
            Ok(outcome) => {
                tracing::debug!(query = %query, outcome = ?outcome, "last search not restored");
                (None, None)
            }
            Err(e) => {
                tracing::warn!(query = %query, error = %e, "could not restore last search");
                (Some(query), Some(CatalogError::Restoration(e.to_string())))
            }
        }
    }
}

impl std::fmt::Debug for CatalogSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CatalogSession")
            .field("bootstrapped", &self.is_bootstrapped())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::storage::{KeyValueStore, MemoryStore, FAVORITES_KEY, LAST_SEARCH_KEY, THEME_KEY};
    use async_trait::async_trait;
    use std::collections::HashMap;
    use tokio::sync::oneshot;

    /// Scripted catalog: unscripted requests fail with a 500.
    #[derive(Default)]
    pub(crate) struct FakeApi {
        trending: Mutex<Option<Vec<Item>>>,
        pages: Mutex<HashMap<(String, u32), ItemPage>>,
        gates: Mutex<HashMap<(String, u32), oneshot::Receiver<()>>>,
        calls: Mutex<Vec<String>>,
    }

    impl FakeApi {
        pub(crate) fn with_trending(self, items: Vec<Item>) -> Self {
            *self.trending.lock().unwrap() = Some(items);
            self
        }

        pub(crate) fn with_page(self, query: &str, page: u32, total_pages: u32, ids: &[u64]) -> Self {
            let results = ids.iter().map(|id| Item::new(*id, format!("{query} {id}"))).collect();
            self.pages.lock().unwrap().insert(
                (query.to_string(), page),
                ItemPage {
                    page,
                    results,
                    total_pages,
                    total_results: u64::from(total_pages) * 20,
                },
            );
            self
        }

        /// Holds the response for `query`/`page` until the returned sender fires.
        pub(crate) fn gate(&self, query: &str, page: u32) -> oneshot::Sender<()> {
            let (tx, rx) = oneshot::channel();
            self.gates.lock().unwrap().insert((query.to_string(), page), rx);
            tx
        }

        pub(crate) fn calls(&self) -> Vec<String> {
            self.calls.lock().unwrap().clone()
        }

        fn unscripted() -> CatalogError {
            CatalogError::Api {
                status: 500,
                message: "unscripted".to_string(),
            }
        }
    }

    #[async_trait]
    impl CatalogApi for FakeApi {
        async fn fetch_trending(&self, page: u32) -> Result<ItemPage> {
            self.calls.lock().unwrap().push(format!("trending:{page}"));
            let items = self.trending.lock().unwrap().clone().ok_or_else(Self::unscripted)?;
            Ok(ItemPage {
                page,
                total_pages: 1,
                total_results: items.len() as u64,
                results: items,
            })
        }

        async fn search_catalog(&self, query: &str, page: u32) -> Result<ItemPage> {
            self.calls.lock().unwrap().push(format!("search:{query}:{page}"));
            let key = (query.to_string(), page);
            let gate = self.gates.lock().unwrap().remove(&key);
            if let Some(gate) = gate {
                let _ = gate.await;
            }
            self.pages.lock().unwrap().get(&key).cloned().ok_or_else(Self::unscripted)
        }

        async fn fetch_detail(&self, id: u64) -> Result<DetailItem> {
            self.calls.lock().unwrap().push(format!("detail:{id}"));
            Ok(DetailItem {
                item: Item::new(id, "detail"),
                runtime: Some(120),
                videos: None,
                credits: None,
            })
        }

        async fn fetch_genres(&self) -> Result<Vec<Genre>> {
            Ok(vec![Genre {
                id: 28,
                name: "Action".to_string(),
            }])
        }

        async fn discover_by_genre(&self, genre_id: u32, page: u32) -> Result<ItemPage> {
            self.calls.lock().unwrap().push(format!("discover:{genre_id}:{page}"));
            Err(Self::unscripted())
        }
    }

    fn session_with(api: FakeApi, store: MemoryStore) -> (Arc<FakeApi>, Arc<MemoryStore>, Arc<CatalogSession>) {
        let api = Arc::new(api);
        let store = Arc::new(store);
        let session = Arc::new(CatalogSession::new(api.clone(), PersistenceBridge::new(store.clone())));
        (api, store, session)
    }

    fn ids(items: &[Item]) -> Vec<u64> {
        items.iter().map(|item| item.id).collect()
    }

    async fn wait_for_call(api: &FakeApi, call: &str) {
        while !api.calls().iter().any(|c| c == call) {
            tokio::task::yield_now().await;
        }
    }

    #[tokio::test]
    async fn search_then_load_more_appends_pages() {
        let api = FakeApi::default()
            .with_page("batman", 1, 3, &[1, 2, 3])
            .with_page("batman", 2, 3, &[4, 5]);
        let (_, store, session) = session_with(api, MemoryStore::default());

        let outcome = session.search("batman", 1).await.unwrap();
        assert_eq!(
            outcome,
            SearchOutcome::Applied {
                page: 1,
                added: 3,
                total_pages: 3
            }
        );
        assert_eq!(store.get(LAST_SEARCH_KEY).unwrap().as_deref(), Some("batman"));

        session.load_more().await.unwrap();
        let snapshot = session.snapshot();
        assert_eq!(ids(&snapshot.search_results), vec![1, 2, 3, 4, 5]);
        assert_eq!(snapshot.current_page, 2);
        assert_eq!(snapshot.total_pages, 3);
        assert!(snapshot.has_more);
        assert!(!snapshot.is_loading);
    }

    #[tokio::test]
    async fn later_pages_do_not_overwrite_last_search() {
        let api = FakeApi::default()
            .with_page("batman", 1, 3, &[1])
            .with_page("batman", 2, 3, &[2]);
        let (_, store, session) = session_with(api, MemoryStore::default());

        session.search("batman", 1).await.unwrap();
        store.set(LAST_SEARCH_KEY, "something else").unwrap();
        session.load_more().await.unwrap();

        assert_eq!(store.get(LAST_SEARCH_KEY).unwrap().as_deref(), Some("something else"));
    }

    #[tokio::test]
    async fn blank_query_resets_without_fetching() {
        let api = FakeApi::default().with_page("batman", 1, 3, &[1, 2]);
        let (api, _, session) = session_with(api, MemoryStore::default());
        session.search("batman", 1).await.unwrap();

        assert_eq!(session.search("   ", 1).await.unwrap(), SearchOutcome::Reset);

        let snapshot = session.snapshot();
        assert!(snapshot.search_results.is_empty());
        assert_eq!(snapshot.search_query, "");
        assert_eq!(snapshot.current_page, 1);
        assert_eq!(snapshot.total_pages, 0);
        assert_eq!(api.calls(), vec!["search:batman:1"]);
    }

    #[tokio::test]
    async fn load_more_stops_at_last_page() {
        let api = FakeApi::default().with_page("dune", 1, 1, &[1]);
        let (api, _, session) = session_with(api, MemoryStore::default());
        session.search("dune", 1).await.unwrap();

        assert_eq!(session.load_more().await.unwrap(), SearchOutcome::Skipped);
        assert_eq!(api.calls().len(), 1);
        assert!(!session.snapshot().has_more);
    }

    #[tokio::test]
    async fn load_more_is_a_no_op_while_loading() {
        let api = FakeApi::default()
            .with_page("batman", 1, 3, &[1])
            .with_page("batman", 2, 3, &[2]);
        let (api, _, session) = session_with(api, MemoryStore::default());
        session.search("batman", 1).await.unwrap();

        let release = api.gate("batman", 2);
        let first = tokio::spawn({
            let session = session.clone();
            async move { session.load_more().await }
        });
        wait_for_call(&api, "search:batman:2").await;
        assert!(session.snapshot().is_loading);

        assert_eq!(session.load_more().await.unwrap(), SearchOutcome::Skipped);
        assert_eq!(api.calls().len(), 2);

        release.send(()).unwrap();
        assert!(matches!(first.await.unwrap().unwrap(), SearchOutcome::Applied { page: 2, .. }));
        assert_eq!(ids(&session.snapshot().search_results), vec![1, 2]);
    }

    #[tokio::test]
    async fn failed_search_keeps_results_and_reports_error() {
        let api = FakeApi::default().with_page("batman", 1, 3, &[1, 2]);
        let (_, _, session) = session_with(api, MemoryStore::default());
        session.search("batman", 1).await.unwrap();

        let err = session.load_more().await.unwrap_err();
        assert!(err.is_fetch_failure());

        let snapshot = session.snapshot();
        assert_eq!(ids(&snapshot.search_results), vec![1, 2]);
        assert_eq!(snapshot.current_page, 1);
        assert_eq!(snapshot.error.as_deref(), Some(SEARCH_FAILED_MESSAGE));
        assert!(!snapshot.is_loading);

        session.load_more().await.unwrap_err();
        assert_eq!(session.snapshot().current_page, 1, "retry keeps the cursor");
    }

    #[tokio::test]
    async fn stale_response_is_discarded() {
        let api = FakeApi::default()
            .with_page("bat", 1, 9, &[7, 8, 9])
            .with_page("batman", 1, 2, &[1, 2]);
        let (api, _, session) = session_with(api, MemoryStore::default());

        let release = api.gate("bat", 1);
        let slow = tokio::spawn({
            let session = session.clone();
            async move { session.search("bat", 1).await }
        });
        wait_for_call(&api, "search:bat:1").await;

        session.search("batman", 1).await.unwrap();
        release.send(()).unwrap();
        assert_eq!(slow.await.unwrap().unwrap(), SearchOutcome::Superseded);

        let snapshot = session.snapshot();
        assert_eq!(snapshot.search_query, "batman");
        assert_eq!(ids(&snapshot.search_results), vec![1, 2]);
        assert_eq!(snapshot.total_pages, 2);
    }

    #[tokio::test]
    async fn reset_drops_in_flight_response() {
        let api = FakeApi::default().with_page("dune", 1, 2, &[1]);
        let (api, _, session) = session_with(api, MemoryStore::default());

        let release = api.gate("dune", 1);
        let pending = tokio::spawn({
            let session = session.clone();
            async move { session.search("dune", 1).await }
        });
        wait_for_call(&api, "search:dune:1").await;

        session.reset_search();
        assert!(!session.snapshot().is_loading);
        release.send(()).unwrap();

        assert_eq!(pending.await.unwrap().unwrap(), SearchOutcome::Superseded);
        assert!(session.snapshot().search_results.is_empty());
    }

    #[tokio::test]
    async fn favorites_are_persisted() {
        let (_, store, session) = session_with(FakeApi::default(), MemoryStore::default());
        let mut events = session.subscribe();

        assert!(session.add_favorite(Item::new(42, "Dune")));
        assert!(!session.add_favorite(Item::new(42, "Dune")));
        assert!(session.is_favorite(42));
        assert!(store.get(FAVORITES_KEY).unwrap().unwrap().contains("\"id\":42"));
        assert_eq!(events.recv().await.unwrap(), SessionEvent::FavoritesChanged { count: 1 });

        assert!(session.remove_favorite(42));
        assert!(!session.is_favorite(42));
        assert_eq!(store.get(FAVORITES_KEY).unwrap().as_deref(), Some("[]"));
        assert_eq!(events.recv().await.unwrap(), SessionEvent::FavoritesChanged { count: 0 });
    }

    #[tokio::test]
    async fn favorites_are_independent_of_search_loading() {
        let api = FakeApi::default().with_page("dune", 1, 1, &[1]);
        let (api, _, session) = session_with(api, MemoryStore::default());

        let release = api.gate("dune", 1);
        let pending = tokio::spawn({
            let session = session.clone();
            async move { session.search("dune", 1).await }
        });
        wait_for_call(&api, "search:dune:1").await;

        assert!(session.toggle_favorite(Item::new(5, "Alien")));
        release.send(()).unwrap();
        pending.await.unwrap().unwrap();
        assert!(session.is_favorite(5));
    }

    #[tokio::test]
    async fn bootstrap_restores_everything() {
        let api = FakeApi::default()
            .with_trending(vec![Item::new(100, "Trending")])
            .with_page("dune", 1, 2, &[1, 2]);
        let store = MemoryStore::with_entries([
            (LAST_SEARCH_KEY, "dune"),
            (FAVORITES_KEY, r#"[{"id": 42, "title": "Dune"}]"#),
        ]);
        let (_, _, session) = session_with(api, store);

        let report = session
            .bootstrap(Some(&SessionIdentity::new("user")))
            .await
            .unwrap();
        assert_eq!(report.trending, Some(1));
        assert_eq!(report.favorites, 1);
        assert_eq!(report.restored_query.as_deref(), Some("dune"));
        assert!(report.restoration_error.is_none());

        let snapshot = session.snapshot();
        assert_eq!(ids(&snapshot.trending_items), vec![100]);
        assert_eq!(snapshot.search_query, "dune");
        assert_eq!(ids(&snapshot.search_results), vec![1, 2]);
        assert!(snapshot.is_favorite(42));
    }

    #[tokio::test]
    async fn restoration_failure_is_not_surfaced() {
        let api = FakeApi::default().with_trending(vec![]);
        let store = MemoryStore::with_entries([(LAST_SEARCH_KEY, "dune")]);
        let (_, _, session) = session_with(api, store);

        let report = session
            .bootstrap(Some(&SessionIdentity::new("user")))
            .await
            .unwrap();

        assert!(matches!(report.restoration_error, Some(CatalogError::Restoration(_))));
        let snapshot = session.snapshot();
        assert_eq!(snapshot.search_query, "dune");
        assert_eq!(snapshot.error, None);
        assert!(!snapshot.is_loading);
        assert!(snapshot.search_results.is_empty());
    }

    #[tokio::test]
    async fn overtaken_restore_is_not_reported() {
        let api = FakeApi::default()
            .with_trending(vec![])
            .with_page("dune", 1, 1, &[1])
            .with_page("alien", 1, 1, &[2]);
        let store = MemoryStore::with_entries([(LAST_SEARCH_KEY, "dune")]);
        let (api, _, session) = session_with(api, store);

        let release = api.gate("dune", 1);
        let bootstrap = session.spawn_bootstrap(SessionIdentity::new("user"));
        wait_for_call(&api, "search:dune:1").await;

        session.search("alien", 1).await.unwrap();
        release.send(()).unwrap();

        let report = bootstrap.await.unwrap().unwrap();
        assert_eq!(report.restored_query, None);
        assert!(report.restoration_error.is_none());
        assert_eq!(session.snapshot().search_query, "alien");
        assert_eq!(ids(&session.snapshot().search_results), vec![2]);
    }

    #[tokio::test]
    async fn favorite_edits_before_bootstrap_keep_stored_set() {
        let store = MemoryStore::with_entries([(FAVORITES_KEY, r#"[{"id":42}]"#)]);
        let (_, store, session) = session_with(FakeApi::default(), store);
        let mut events = session.subscribe();

        assert!(!session.remove_favorite(7));
        assert_eq!(store.get(FAVORITES_KEY).unwrap().as_deref(), Some(r#"[{"id":42}]"#));
        assert!(session.is_favorite(42));

        assert!(session.add_favorite(Item::new(7, "Se7en")));
        assert_eq!(events.recv().await.unwrap(), SessionEvent::FavoritesChanged { count: 2 });

        session.clear_favorites();
        assert!(session.favorites().is_empty());
        assert_eq!(store.get(FAVORITES_KEY).unwrap().as_deref(), Some("[]"));
    }

    #[tokio::test]
    async fn trending_failure_sets_trending_error() {
        let (_, _, session) = session_with(FakeApi::default(), MemoryStore::default());

        let report = session
            .bootstrap(Some(&SessionIdentity::new("user")))
            .await
            .unwrap();

        assert_eq!(report.trending, None);
        let snapshot = session.snapshot();
        assert!(snapshot.trending_items.is_empty());
        assert_eq!(snapshot.trending_error.as_deref(), Some(TRENDING_FAILED_MESSAGE));
        assert_eq!(snapshot.error, None);
    }

    #[tokio::test]
    async fn bootstrap_needs_identity_and_runs_once() {
        let api = FakeApi::default().with_trending(vec![Item::new(1, "A")]);
        let (api, _, session) = session_with(api, MemoryStore::default());

        assert!(session.bootstrap(None).await.is_none());
        assert!(!session.is_bootstrapped());
        assert!(api.calls().is_empty());

        let identity = SessionIdentity::new("user");
        assert!(session.spawn_bootstrap(identity.clone()).await.unwrap().is_some());
        assert!(session.bootstrap(Some(&identity)).await.is_none());
        assert_eq!(api.calls(), vec!["trending:1"]);
    }

    #[tokio::test]
    async fn blank_last_search_is_not_replayed() {
        let api = FakeApi::default().with_trending(vec![]);
        let store = MemoryStore::with_entries([(LAST_SEARCH_KEY, "  ")]);
        let (api, _, session) = session_with(api, store);

        let report = session
            .bootstrap(Some(&SessionIdentity::new("user")))
            .await
            .unwrap();
        assert_eq!(report.restored_query, None);
        assert_eq!(api.calls(), vec!["trending:1"]);
    }

    #[tokio::test]
    async fn theme_is_restored_and_persisted() {
        let store = MemoryStore::with_entries([(THEME_KEY, "dark")]);
        let (_, store, session) = session_with(FakeApi::default(), store);
        assert_eq!(session.theme(), Theme::Dark);

        assert_eq!(session.toggle_theme(), Theme::Light);
        assert_eq!(store.get(THEME_KEY).unwrap().as_deref(), Some("light"));
        assert_eq!(session.snapshot().theme, Theme::Light);
    }

    #[tokio::test]
    async fn detail_passes_through() {
        let (api, _, session) = session_with(FakeApi::default(), MemoryStore::default());
        let detail = session.item_detail(9).await.unwrap();
        assert_eq!(detail.item.id, 9);
        assert!(session.discover(28, 0).await.is_err());
        assert_eq!(api.calls(), vec!["detail:9", "discover:28:1"]);
    }
}
