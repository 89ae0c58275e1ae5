//! Remote catalog API abstraction.
//!
//! This module defines the [`CatalogApi`] trait the session consumes. Every
//! operation is a request/response call that either yields decoded data or fails;
//! the session treats all failures the same way and never branches on status codes.

use crate::domain::error::Result;
use crate::domain::{DetailItem, Genre, ItemPage};
use async_trait::async_trait;

/// Abstraction over the remote paginated catalog service.
///
/// # Implementations
///
/// - [`TmdbClient`](crate::api::TmdbClient): HTTP client for TMDb-compatible services
///
/// Tests substitute scripted fakes.
#[async_trait]
pub trait CatalogApi: Send + Sync {
    /// Fetches one page of the trending list.
    ///
    /// # Errors
    ///
    /// Returns an error on transport, status, or decode failure.
    async fn fetch_trending(&self, page: u32) -> Result<ItemPage>;

    /// Runs a keyword search and returns the requested page.
    ///
    /// # Errors
    ///
    /// Returns an error on transport, status, or decode failure.
    async fn search_catalog(&self, query: &str, page: u32) -> Result<ItemPage>;

    /// Fetches the detail record of one item, including trailers and cast.
    ///
    /// # Errors
    ///
    /// Returns an error on transport, status, or decode failure.
    async fn fetch_detail(&self, id: u64) -> Result<DetailItem>;

    /// Lists the genres the catalog knows about.
    ///
    /// # Errors
    ///
    /// Returns an error on transport, status, or decode failure.
    async fn fetch_genres(&self) -> Result<Vec<Genre>>;

    /// Returns one page of items tagged with `genre_id`.
    ///
    /// # Errors
    ///
    /// Returns an error on transport, status, or decode failure.
    async fn discover_by_genre(&self, genre_id: u32, page: u32) -> Result<ItemPage>;
}
