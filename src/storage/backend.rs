//! Key-value storage abstraction.
//!
//! This module defines the [`KeyValueStore`] trait: the narrow get/set/remove
//! contract the session needs from durable client-profile storage. Values are
//! opaque strings; typed encoding lives one layer up in
//! [`PersistenceBridge`](crate::storage::PersistenceBridge).
//!
//! # Design Philosophy
//!
//! The trait is deliberately minimal. No schema versioning, transactions, or
//! change notification are offered; callers treat a missing or unreadable value
//! as absent.

use crate::domain::error::Result;

/// Abstraction over durable keyed storage.
///
/// Implementations use interior mutability so one store can be shared behind an
/// `Arc` by the session and the authenticator. Calls are synchronous and return
/// once the write has been handed to the backend.
///
/// # Implementations
///
/// - [`JsonFileStore`](crate::storage::JsonFileStore): single JSON file with atomic writes
/// - [`MemoryStore`](crate::storage::MemoryStore): process-local map, for tests and ephemeral sessions
///
/// # Examples
///
/// ```
/// use marquee::storage::{KeyValueStore, MemoryStore};
///
/// let store = MemoryStore::default();
/// store.set("greeting", "hello")?;
/// assert_eq!(store.get("greeting")?.as_deref(), Some("hello"));
/// store.remove("greeting")?;
/// assert_eq!(store.get("greeting")?, None);
/// # Ok::<(), marquee::CatalogError>(())
/// ```
pub trait KeyValueStore: Send + Sync {
    /// Reads the raw value stored under `key`.
    ///
    /// Returns `Ok(None)` if nothing is stored.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend cannot be read.
    fn get(&self, key: &str) -> Result<Option<String>>;

    /// Stores `value` under `key`, replacing any previous value.
    ///
    /// # Errors
    ///
    /// Returns an error if the write fails.
    fn set(&self, key: &str, value: &str) -> Result<()>;

    /// Removes the value stored under `key`. Removing a missing key is a no-op.
    ///
    /// # Errors
    ///
    /// Returns an error if the write fails.
    fn remove(&self, key: &str) -> Result<()>;
}
