//! Favorites store adapter.
//!
//! [`FavoritesStore`] mirrors the persisted favorites set in memory. Memory is
//! the source of truth for the running session; every mutation rewrites the
//! persisted set to match. A failed write is logged and does not roll back the
//! in-memory change, so storage converges again on the next mutation.
//!
//! A mutation on a store that was never loaded loads the persisted set first,
//! so an early edit can not overwrite favorites saved by an earlier session.

use crate::domain::Item;
use crate::storage::PersistenceBridge;
use std::collections::HashSet;

/// In-memory favorites set, kept in insertion order and unique by item id.
#[derive(Debug, Clone)]
pub struct FavoritesStore {
    items: Vec<Item>,
    persistence: PersistenceBridge,
    /// Set once the persisted set has been read into `items`.
    loaded: bool,
}

impl FavoritesStore {
    /// Creates an empty store writing through `persistence`.
    #[must_use]
    pub const fn new(persistence: PersistenceBridge) -> Self {
        Self {
            items: Vec::new(),
            persistence,
            loaded: false,
        }
    }

    /// Replaces the in-memory set with the persisted one.
    ///
    /// A stored list containing the same id twice keeps the first occurrence.
    /// Returns the number of favorites loaded.
    pub fn load(&mut self) -> usize {
        let mut seen = HashSet::new();
        self.items = self
            .persistence
            .read_favorites()
            .into_iter()
            .filter(|item| seen.insert(item.id))
            .collect();
        self.loaded = true;

        tracing::debug!(count = self.items.len(), "favorites loaded");
        self.items.len()
    }

    fn ensure_loaded(&mut self) {
        if !self.loaded {
            tracing::debug!("favorites edited before load, reading persisted set first");
            self.load();
        }
    }

    #[must_use]
    pub fn is_favorite(&self, id: u64) -> bool {
        self.items.iter().any(|item| item.id == id)
    }

    /// Adds `item`. Returns `false` without writing if its id is already present.
    pub fn add(&mut self, item: Item) -> bool {
        self.ensure_loaded();
        if self.is_favorite(item.id) {
            tracing::trace!(id = item.id, "already a favorite");
            return false;
        }

        tracing::debug!(id = item.id, title = %item.title, "adding favorite");
        self.items.push(item);
        self.persist();
        true
    }

    /// Removes the item with `id`. Returns `false` without writing if it was not a favorite.
    pub fn remove(&mut self, id: u64) -> bool {
        self.ensure_loaded();
        if !self.is_favorite(id) {
            tracing::trace!(id = id, "not a favorite");
            return false;
        }

        tracing::debug!(id = id, "removing favorite");
        self.items.retain(|item| item.id != id);
        self.persist();
        true
    }

    /// Adds `item` if absent, removes it otherwise. Returns whether it is now a favorite.
    pub fn toggle(&mut self, item: Item) -> bool {
        self.ensure_loaded();
        if self.is_favorite(item.id) {
            self.remove(item.id);
            false
        } else {
            self.add(item)
        }
    }

    /// Removes every favorite and persists the empty set.
    pub fn clear(&mut self) {
        self.items.clear();
        self.loaded = true;
        self.persist();
    }

    #[must_use]
    pub fn items(&self) -> &[Item] {
        &self.items
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    fn persist(&self) {
        if let Err(e) = self.persistence.write_favorites(&self.items) {
            tracing::warn!(error = %e, count = self.items.len(), "failed to persist favorites");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::{KeyValueStore, MemoryStore, FAVORITES_KEY};
    use std::sync::Arc;

    fn store() -> (Arc<MemoryStore>, FavoritesStore) {
        let kv = Arc::new(MemoryStore::default());
        let favorites = FavoritesStore::new(PersistenceBridge::new(kv.clone()));
        (kv, favorites)
    }

    fn persisted_ids(kv: &MemoryStore) -> Vec<u64> {
        let raw = kv.get(FAVORITES_KEY).unwrap().unwrap_or_default();
        let items: Vec<Item> = serde_json::from_str(&raw).unwrap_or_default();
        items.iter().map(|item| item.id).collect()
    }

    #[test]
    fn add_is_idempotent() {
        let (kv, mut favorites) = store();

        assert!(favorites.add(Item::new(42, "Dune")));
        assert!(!favorites.add(Item::new(42, "Dune (again)")));

        assert_eq!(favorites.len(), 1);
        assert!(favorites.is_favorite(42));
        assert_eq!(favorites.items()[0].title, "Dune");
        assert_eq!(persisted_ids(&kv), vec![42]);
    }

    #[test]
    fn remove_clears_membership_and_storage() {
        let (kv, mut favorites) = store();
        favorites.add(Item::new(42, "Dune"));
        favorites.add(Item::new(7, "Se7en"));

        assert!(favorites.remove(42));
        assert!(!favorites.remove(42));

        assert!(!favorites.is_favorite(42));
        assert_eq!(persisted_ids(&kv), vec![7]);
    }

    #[test]
    fn load_dedupes_first_id_wins() {
        let kv = Arc::new(MemoryStore::with_entries([(
            FAVORITES_KEY,
            r#"[{"id": 1, "title": "A"}, {"id": 2, "title": "B"}, {"id": 1, "title": "A again"}]"#,
        )]));
        let mut favorites = FavoritesStore::new(PersistenceBridge::new(kv));

        assert_eq!(favorites.load(), 2);
        assert_eq!(favorites.items()[0].title, "A");
    }

    #[test]
    fn edits_before_load_keep_persisted_favorites() {
        let kv = Arc::new(MemoryStore::with_entries([(FAVORITES_KEY, r#"[{"id": 1, "title": "A"}]"#)]));
        let mut favorites = FavoritesStore::new(PersistenceBridge::new(kv.clone()));

        assert!(favorites.add(Item::new(99, "Z")));
        assert_eq!(persisted_ids(&kv), vec![1, 99]);

        let mut favorites = FavoritesStore::new(PersistenceBridge::new(kv.clone()));
        assert!(favorites.remove(99));
        assert_eq!(persisted_ids(&kv), vec![1]);
    }

    #[test]
    fn removing_unknown_id_does_not_write() {
        let kv = Arc::new(MemoryStore::with_entries([(FAVORITES_KEY, r#"[{"id": 42, "title": "Dune"}]"#)]));
        let mut favorites = FavoritesStore::new(PersistenceBridge::new(kv.clone()));

        assert!(!favorites.remove(7));
        assert_eq!(
            kv.get(FAVORITES_KEY).unwrap().as_deref(),
            Some(r#"[{"id": 42, "title": "Dune"}]"#)
        );
        assert!(favorites.is_favorite(42));
    }

    #[test]
    fn toggle_flips_membership() {
        let (kv, mut favorites) = store();
        assert!(favorites.toggle(Item::new(5, "Alien")));
        assert!(!favorites.toggle(Item::new(5, "Alien")));
        assert!(favorites.is_empty());
        assert!(persisted_ids(&kv).is_empty());
    }

    #[test]
    fn clear_persists_empty_set() {
        let (kv, mut favorites) = store();
        favorites.add(Item::new(1, "A"));
        favorites.clear();
        assert!(favorites.is_empty());
        assert_eq!(kv.get(FAVORITES_KEY).unwrap().as_deref(), Some("[]"));
    }
}
