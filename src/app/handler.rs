//! Event handling and session dispatch.
//!
//! This module translates user intents into [`CatalogSession`] calls and returns
//! what the shell should present next.
//!
//! # Architecture
//!
//! The handler follows a unidirectional data flow pattern:
//! 1. The shell turns input into an [`Event`]
//! 2. [`handle_event`] pattern-matches the event and calls the session
//! 3. The session mutates its state and publishes a session event
//! 4. Actions are collected and returned for presentation
//!
//! The returned `bool` reports whether the session snapshot changed, so a
//! presenter can skip redrawing when nothing did.
//!
//! # Example
//!
//! ```rust,no_run
//! use marquee::app::{handle_event, CatalogSession, Event};
//!
//! # async fn run(session: &CatalogSession) -> marquee::Result<()> {
//! let (changed, actions) = handle_event(session, Event::Search {
//!     query: "batman".to_string(),
//!     page: 1,
//! })
//! .await?;
//! # Ok(())
//! # }
//! ```

use super::actions::Action;
use super::modes::ViewMode;
use super::search::SearchOutcome;
use super::session::CatalogSession;
use crate::domain::error::Result;
use crate::domain::{Item, Theme};
use crate::infrastructure::trailer_url;

/// User intents accepted by [`handle_event`].
#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    /// Presents one of the session's item lists.
    Show(ViewMode),

    /// Reloads the trending list.
    RefreshTrending,

    /// Runs a search. A blank query clears the search instead.
    Search {
        query: String,
        page: u32,
    },

    /// Fetches the next page of the active search.
    LoadMore,

    /// Clears the active search.
    ResetSearch,

    AddFavorite(Item),
    RemoveFavorite(u64),

    /// Adds the item if absent, removes it otherwise.
    ToggleFavorite(Item),

    ClearFavorites,

    /// Fetches and presents the full record for one item.
    ShowDetail(u64),

    /// Opens the item's trailer, when it has one.
    PlayTrailer(u64),

    ListGenres,

    /// Browses one page of a genre.
    Discover {
        genre_id: u32,
        page: u32,
    },

    SetTheme(Theme),
    ToggleTheme,
}

/// Processes an event against the session and returns actions to present.
///
/// # Errors
///
/// Returns the catalog error of a failed remote call. Search and trending
/// failures have already been recorded in the session state when this
/// returns.
#[allow(clippy::too_many_lines)]
pub async fn handle_event(session: &CatalogSession, event: Event) -> Result<(bool, Vec<Action>)> {
    tracing::debug!(event = ?event, "handling event");

    match event {
        Event::Show(mode) => Ok((false, vec![Action::ShowView(mode)])),
        Event::RefreshTrending => {
            session.refresh_trending().await?;
            Ok((true, vec![Action::ShowView(ViewMode::Trending)]))
        }
        Event::Search { query, page } => match session.search(&query, page).await? {
            SearchOutcome::Applied { .. } | SearchOutcome::Reset => {
                Ok((true, vec![Action::ShowView(ViewMode::Search)]))
            }
            SearchOutcome::Skipped | SearchOutcome::Superseded => Ok((false, vec![])),
        },
        Event::LoadMore => match session.load_more().await? {
            SearchOutcome::Applied { .. } => Ok((true, vec![Action::ShowView(ViewMode::Search)])),
            SearchOutcome::Skipped if !session.snapshot().has_more => {
                Ok((false, vec![Action::Notify("No more results".to_string())]))
            }
            _ => Ok((false, vec![])),
        },
        Event::ResetSearch => {
            session.reset_search();
            Ok((true, vec![]))
        }
        Event::AddFavorite(item) => {
            let title = item.title.clone();
            if session.add_favorite(item) {
                Ok((true, vec![Action::Notify(format!("Added \"{title}\" to favorites"))]))
            } else {
                Ok((false, vec![Action::Notify(format!("\"{title}\" is already a favorite"))]))
            }
        }
        Event::RemoveFavorite(id) => {
            if session.remove_favorite(id) {
                Ok((true, vec![Action::Notify("Removed from favorites".to_string())]))
            } else {
                tracing::debug!(id = id, "remove requested for non-favorite");
                Ok((false, vec![Action::Notify(format!("Item {id} is not a favorite"))]))
            }
        }
        Event::ToggleFavorite(item) => {
            let title = item.title.clone();
            let message = if session.toggle_favorite(item) {
                format!("Added \"{title}\" to favorites")
            } else {
                format!("Removed \"{title}\" from favorites")
            };
            Ok((true, vec![Action::Notify(message)]))
        }
        Event::ClearFavorites => {
            session.clear_favorites();
            Ok((true, vec![Action::ShowView(ViewMode::Favorites)]))
        }
        Event::ShowDetail(id) => {
            let detail = session.item_detail(id).await?;
            Ok((false, vec![Action::ShowDetail(Box::new(detail))]))
        }
        Event::PlayTrailer(id) => {
            let detail = session.item_detail(id).await?;
            let action = detail.trailer().and_then(trailer_url).map_or_else(
                || Action::Notify("No trailer available".to_string()),
                Action::OpenUrl,
            );
            Ok((false, vec![action]))
        }
        Event::ListGenres => {
            let genres = session.genres().await?;
            Ok((false, vec![Action::ShowGenres(genres)]))
        }
        Event::Discover { genre_id, page } => {
            let page = session.discover(genre_id, page).await?;
            Ok((false, vec![Action::ShowDiscover { genre_id, page }]))
        }
        Event::SetTheme(theme) => {
            if session.theme() == theme {
                return Ok((false, vec![]));
            }
            session.set_theme(theme);
            Ok((true, vec![]))
        }
        Event::ToggleTheme => {
            let theme = session.toggle_theme();
            Ok((true, vec![Action::Notify(format!("Theme set to {}", theme.as_str()))]))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::session::tests::FakeApi;
    use crate::storage::{MemoryStore, PersistenceBridge};
    use std::sync::Arc;

    fn session(api: FakeApi) -> CatalogSession {
        CatalogSession::new(
            Arc::new(api),
            PersistenceBridge::new(Arc::new(MemoryStore::default())),
        )
    }

    #[tokio::test]
    async fn search_then_load_more_until_exhausted() {
        let session = session(
            FakeApi::default()
                .with_page("batman", 1, 2, &[1, 2])
                .with_page("batman", 2, 2, &[3]),
        );

        let (changed, actions) = handle_event(
            &session,
            Event::Search {
                query: "batman".to_string(),
                page: 1,
            },
        )
        .await
        .unwrap();
        assert!(changed);
        assert_eq!(actions, vec![Action::ShowView(ViewMode::Search)]);

        let (changed, _) = handle_event(&session, Event::LoadMore).await.unwrap();
        assert!(changed);
        assert_eq!(session.snapshot().search_results.len(), 3);

        let (changed, actions) = handle_event(&session, Event::LoadMore).await.unwrap();
        assert!(!changed);
        assert_eq!(actions, vec![Action::Notify("No more results".to_string())]);
    }

    #[tokio::test]
    async fn failed_search_propagates_error() {
        let session = session(FakeApi::default());
        let result = handle_event(
            &session,
            Event::Search {
                query: "nothing".to_string(),
                page: 1,
            },
        )
        .await;

        assert!(result.is_err());
        assert!(session.snapshot().error.is_some());
    }

    #[tokio::test]
    async fn favorites_report_whether_anything_changed() {
        let session = session(FakeApi::default());

        let (changed, _) = handle_event(&session, Event::AddFavorite(Item::new(42, "Dune")))
            .await
            .unwrap();
        assert!(changed);

        let (changed, _) = handle_event(&session, Event::AddFavorite(Item::new(42, "Dune")))
            .await
            .unwrap();
        assert!(!changed);

        let (changed, actions) = handle_event(&session, Event::RemoveFavorite(42)).await.unwrap();
        assert!(changed);
        assert_eq!(actions, vec![Action::Notify("Removed from favorites".to_string())]);

        handle_event(&session, Event::AddFavorite(Item::new(7, "Se7en"))).await.unwrap();
        let (changed, actions) = handle_event(&session, Event::ClearFavorites).await.unwrap();
        assert!(changed);
        assert_eq!(actions, vec![Action::ShowView(ViewMode::Favorites)]);
        assert!(session.favorites().is_empty());
    }

    #[tokio::test]
    async fn trailer_without_videos_notifies() {
        let session = session(FakeApi::default());
        let (_, actions) = handle_event(&session, Event::PlayTrailer(7)).await.unwrap();
        assert_eq!(actions, vec![Action::Notify("No trailer available".to_string())]);
    }

    #[tokio::test]
    async fn setting_current_theme_is_unchanged() {
        let session = session(FakeApi::default());
        let (changed, _) = handle_event(&session, Event::SetTheme(Theme::Light)).await.unwrap();
        assert!(!changed);

        let (changed, _) = handle_event(&session, Event::ToggleTheme).await.unwrap();
        assert!(changed);
        assert_eq!(session.theme(), Theme::Dark);
    }
}
