//! Remote catalog API layer.
//!
//! - `client`: the [`CatalogApi`] trait consumed by the session
//! - `tmdb`: [`TmdbClient`], the reqwest implementation

pub mod client;
pub mod tmdb;

pub use client::CatalogApi;
pub use tmdb::TmdbClient;
