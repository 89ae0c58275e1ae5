//! Storage layer for persisted session data.
//!
//! This module provides the persistence side of the session: a minimal keyed
//! storage abstraction, two backends, and the typed bridge that encodes
//! favorites, the last search, the theme, and the signed-in user.
//!
//! # Modules
//!
//! - `backend`: [`KeyValueStore`] trait abstraction
//! - `json`: JSON file backend with atomic writes
//! - `memory`: in-process backend
//! - `bridge`: typed read/write contract over a store

pub mod backend;
pub mod bridge;
pub mod json;
pub mod memory;

pub use backend::KeyValueStore;
pub use bridge::{PersistenceBridge, FAVORITES_KEY, LAST_SEARCH_KEY, THEME_KEY, USER_KEY};
pub use json::JsonFileStore;
pub use memory::MemoryStore;
