//! Domain layer for the catalog session engine.
//!
//! This module contains the core domain types, independent of the HTTP client,
//! the storage backend, and any presentation layer.
//!
//! # Organization
//!
//! - [`error`]: Error types and result aliases
//! - [`item`]: Catalog items, detail records, and pages
//! - [`identity`]: Signed-in principal and theme preference
//!
//! # Examples
//!
//! ```
//! use marquee::domain::{Item, Result};
//!
//! fn pick() -> Result<Item> {
//!     Ok(Item::new(42, "The Hitchhiker's Guide to the Galaxy"))
//! }
//! # assert_eq!(pick().unwrap().id, 42);
//! ```

pub mod error;
pub mod identity;
pub mod item;

pub use error::{CatalogError, Result};
pub use identity::{SessionIdentity, Theme};
pub use item::{CastMember, Credits, DetailItem, Genre, Item, ItemPage, Video, VideoList};
