//! Error types for the catalog session engine.
//!
//! This module defines the centralized error type [`CatalogError`] and a type alias
//! [`Result`] used throughout the crate. All errors are implemented with `thiserror`.
//!
//! Errors fall into four categories, and each category is handled differently by
//! the session:
//!
//! - **Transient fetch failures** ([`CatalogError::Http`], [`CatalogError::Api`],
//!   [`CatalogError::Decode`]): surfaced to the user as a message, prior state kept.
//! - **Persistence failures** ([`CatalogError::Storage`], [`CatalogError::Io`]):
//!   reads degrade to "no data", writes are logged.
//! - **Best-effort failures** ([`CatalogError::Restoration`]): logged, never surfaced.
//! - **Setup failures** ([`CatalogError::Config`], [`CatalogError::Auth`]).

use thiserror::Error;

/// The main error type for catalog session operations.
///
/// # Examples
///
/// ```
/// use marquee::CatalogError;
///
/// fn validate() -> Result<(), CatalogError> {
///     Err(CatalogError::Config("api_key is empty".to_string()))
/// }
///
/// assert!(validate().is_err());
/// ```
#[derive(Debug, Error)]
pub enum CatalogError {
    /// Transport-level HTTP failure (connect, timeout, body read).
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The catalog service answered with a non-success status.
    #[error("API error ({status}): {message}")]
    Api {
        /// HTTP status code returned by the service.
        status: u16,
        /// Body or reason phrase returned with the status.
        message: String,
    },

    /// A payload could not be decoded as JSON.
    #[error("decode error: {0}")]
    Decode(#[from] serde_json::Error),

    /// Key-value storage operation failed.
    #[error("Storage error: {0}")]
    Storage(String),

    /// Filesystem or I/O operation failed.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration is invalid or missing.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Credentials were rejected.
    #[error("Authentication error: {0}")]
    Auth(String),

    /// Replaying the last persisted search at session start failed.
    ///
    /// Only ever recorded in a bootstrap report; never returned from a
    /// user-initiated action.
    #[error("last search restoration failed: {0}")]
    Restoration(String),
}

impl CatalogError {
    /// Returns `true` for failures of remote catalog calls.
    #[must_use]
    pub const fn is_fetch_failure(&self) -> bool {
        matches!(self, Self::Http(_) | Self::Api { .. } | Self::Decode(_))
    }

    /// Returns `true` for failures that are logged but never shown to the user.
    #[must_use]
    pub const fn is_best_effort(&self) -> bool {
        matches!(self, Self::Restoration(_))
    }
}

/// A specialized `Result` type for catalog operations.
pub type Result<T> = std::result::Result<T, CatalogError>;
