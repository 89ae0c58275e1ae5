//! Typed persistence bridge over a [`KeyValueStore`].
//!
//! The bridge owns the storage keys and the encoding of every persisted value:
//! the favorites set, the last search query, the theme preference, and the
//! signed-in user. Reads never fail: a missing, unreadable, or malformed value
//! is logged and reported as absent. Writes return their error so callers can
//! decide whether to log or propagate it.

use crate::domain::error::{CatalogError, Result};
use crate::domain::{Item, SessionIdentity, Theme};
use crate::storage::backend::KeyValueStore;
use std::sync::Arc;

/// Key holding the JSON array of favorited items.
pub const FAVORITES_KEY: &str = "marquee-favorites";

/// Key holding the last submitted search query as plain text.
pub const LAST_SEARCH_KEY: &str = "marquee-last-search";

/// Key holding `"light"` or `"dark"`.
pub const THEME_KEY: &str = "marquee-theme";

/// Key holding the JSON-encoded signed-in user.
pub const USER_KEY: &str = "marquee-user";

/// Typed read/write contract used by the session and the authenticator.
///
/// Cloning is cheap; clones share the same underlying store.
#[derive(Clone)]
pub struct PersistenceBridge {
    store: Arc<dyn KeyValueStore>,
}

impl PersistenceBridge {
    #[must_use]
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    /// Reads a raw value, mapping backend failures to `None`.
    fn read_raw(&self, key: &str) -> Option<String> {
        match self.store.get(key) {
            Ok(value) => value,
            Err(e) => {
                tracing::warn!(key = %key, error = %e, "storage read failed, treating as absent");
                None
            }
        }
    }

    /// Reads and decodes a JSON value, mapping malformed content to `None`.
    fn read_json<T: serde::de::DeserializeOwned>(&self, key: &str) -> Option<T> {
        let raw = self.read_raw(key)?;
        match serde_json::from_str(&raw) {
            Ok(value) => Some(value),
            Err(e) => {
                tracing::warn!(key = %key, error = %e, "stored value is malformed, treating as absent");
                None
            }
        }
    }

    /// Returns the persisted favorites, or an empty list if none are stored.
    #[must_use]
    pub fn read_favorites(&self) -> Vec<Item> {
        self.read_json(FAVORITES_KEY).unwrap_or_default()
    }

    /// Replaces the persisted favorites with `items`.
    ///
    /// # Errors
    ///
    /// Returns an error if encoding or the store write fails.
    pub fn write_favorites(&self, items: &[Item]) -> Result<()> {
        let json = serde_json::to_string(items)
            .map_err(|e| CatalogError::Storage(format!("failed to encode favorites: {e}")))?;
        self.store.set(FAVORITES_KEY, &json)
    }

    /// Returns the last persisted search query, if any.
    #[must_use]
    pub fn read_last_search(&self) -> Option<String> {
        self.read_raw(LAST_SEARCH_KEY)
    }

    /// Persists `query` as the last search.
    ///
    /// # Errors
    ///
    /// Returns an error if the store write fails.
    pub fn write_last_search(&self, query: &str) -> Result<()> {
        self.store.set(LAST_SEARCH_KEY, query)
    }

    /// Returns the persisted theme; unknown values read as absent.
    #[must_use]
    pub fn read_theme(&self) -> Option<Theme> {
        let raw = self.read_raw(THEME_KEY)?;
        let theme = Theme::from_name(&raw);
        if theme.is_none() {
            tracing::warn!(value = %raw, "stored theme is unknown, treating as absent");
        }
        theme
    }

    /// Persists the theme preference.
    ///
    /// # Errors
    ///
    /// Returns an error if the store write fails.
    pub fn write_theme(&self, theme: Theme) -> Result<()> {
        self.store.set(THEME_KEY, theme.as_str())
    }

    /// Returns the persisted signed-in user, if any.
    #[must_use]
    pub fn read_user(&self) -> Option<SessionIdentity> {
        self.read_json(USER_KEY)
    }

    /// Persists the signed-in user.
    ///
    /// # Errors
    ///
    /// Returns an error if encoding or the store write fails.
    pub fn write_user(&self, identity: &SessionIdentity) -> Result<()> {
        let json = serde_json::to_string(identity)
            .map_err(|e| CatalogError::Storage(format!("failed to encode user: {e}")))?;
        self.store.set(USER_KEY, &json)
    }

    /// Forgets the signed-in user.
    ///
    /// # Errors
    ///
    /// Returns an error if the store write fails.
    pub fn remove_user(&self) -> Result<()> {
        self.store.remove(USER_KEY)
    }
}

impl std::fmt::Debug for PersistenceBridge {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PersistenceBridge").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;

    struct BrokenStore;

    impl KeyValueStore for BrokenStore {
        fn get(&self, _key: &str) -> Result<Option<String>> {
            Err(CatalogError::Storage("disk on fire".to_string()))
        }

        fn set(&self, _key: &str, _value: &str) -> Result<()> {
            Err(CatalogError::Storage("disk on fire".to_string()))
        }

        fn remove(&self, _key: &str) -> Result<()> {
            Err(CatalogError::Storage("disk on fire".to_string()))
        }
    }

    fn bridge_with(entries: Vec<(&str, &str)>) -> PersistenceBridge {
        PersistenceBridge::new(Arc::new(MemoryStore::with_entries(entries)))
    }

    #[test]
    fn favorites_round_trip_through_store() {
        let bridge = bridge_with(vec![]);
        assert!(bridge.read_favorites().is_empty());

        bridge
            .write_favorites(&[Item::new(42, "Dune"), Item::new(7, "Se7en")])
            .unwrap();

        let ids: Vec<u64> = bridge.read_favorites().iter().map(|i| i.id).collect();
        assert_eq!(ids, vec![42, 7]);
    }

    #[test]
    fn corrupt_values_read_as_absent() {
        let bridge = bridge_with(vec![
            (FAVORITES_KEY, "[{\"id\": \"not a number\"}"),
            (THEME_KEY, "sepia"),
            (USER_KEY, "{}"),
        ]);

        assert!(bridge.read_favorites().is_empty());
        assert_eq!(bridge.read_theme(), None);
        assert_eq!(bridge.read_user(), None);
    }

    #[test]
    fn failing_backend_reads_as_absent_and_writes_report_errors() {
        let bridge = PersistenceBridge::new(Arc::new(BrokenStore));

        assert!(bridge.read_favorites().is_empty());
        assert_eq!(bridge.read_last_search(), None);
        assert!(bridge.write_last_search("dune").is_err());
        assert!(bridge.write_favorites(&[]).is_err());
    }

    #[test]
    fn user_and_theme_are_persisted() {
        let bridge = bridge_with(vec![]);
        bridge.write_user(&SessionIdentity::new("user")).unwrap();
        bridge.write_theme(Theme::Dark).unwrap();

        assert_eq!(bridge.read_user(), Some(SessionIdentity::new("user")));
        assert_eq!(bridge.read_theme(), Some(Theme::Dark));

        bridge.remove_user().unwrap();
        assert_eq!(bridge.read_user(), None);
    }
}
