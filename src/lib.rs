//! Marquee: a catalog session engine for browsing and searching a movie catalog.
//!
//! Marquee provides:
//! - A trending list loaded at session start
//! - Paginated keyword search with "load more" accumulation
//! - A persisted favorites set
//! - Restoration of the last search when a signed-in session starts
//! - Light and dark theme preference
//!
//! # Architecture
//!
//! The crate follows a layered architecture pattern:
//!
//! ```text
//! ┌─────────────────────────────────────────────────────┐
//! │  CLI Shell (main.rs)                                │  ← Entry point
//! └─────────────────────────────────────────────────────┘
//!                        │
//! ┌─────────────────────────────────────────────────────┐
//! │  Application Layer (app/)                           │  ← State machine
//! │  - Session manager and bootstrap                    │  ← Business logic
//! │  - Search pagination                                │
//! │  - Favorites, events, snapshots                     │
//! └─────────────────────────────────────────────────────┘
//!         │                    │                    │
//! ┌───────────────┐   ┌───────────────┐   ┌───────────────┐
//! │ API Layer     │   │ Storage Layer │   │ Auth          │
//! │ (api/)        │   │ (storage/)    │   │ (auth.rs)     │
//! │ - CatalogApi  │   │ - JSON I/O    │   │ - Accounts    │
//! │ - TMDb client │   │ - Bridge      │   │ - Sign-in     │
//! └───────────────┘   └───────────────┘   └───────────────┘
//!         │                    │                    │
//! ┌─────────────────────────────────────────────────────┐
//! │  Infrastructure & Domain Layers                     │
//! │  - Platform paths, image URLs (infrastructure/)     │
//! │  - Error types (domain/error)                       │
//! │  - Item model (domain/item)                         │
//! └─────────────────────────────────────────────────────┘
//!                        │
//! ┌─────────────────────────────────────────────────────┐
//! │  Observability (observability/)                     │
//! │  - tracing subscriber, rotating log file            │
//! └─────────────────────────────────────────────────────┘
//! ```
//!
//! # Modules
//!
//! - [`app`]: Session state machine with event/action model
//! - [`api`]: Remote catalog trait and HTTP client
//! - [`auth`]: Sign-in gate
//! - [`domain`]: Core domain types (Item, errors)
//! - [`infrastructure`]: Platform paths and URL helpers
//! - [`storage`]: Key-value persistence and the typed bridge
//! - [`observability`]: Tracing setup
//!
//! # Configuration
//!
//! Configuration is read from `config.toml` in the platform config directory
//! (or a path given on the command line), then overridden by `MARQUEE_API_KEY`:
//!
//! ```toml
//! api_key = "your-tmdb-v3-key"
//! trace_level = "debug"
//! request_timeout_secs = 10
//!
//! [accounts]
//! user = "password"
//! ```
//!
//! # Initialization Flow
//!
//! 1. **Load** configuration and open the key-value store
//! 2. **Restore** the signed-in user, or sign in with credentials
//! 3. **Bootstrap** the session: trending, favorites, and the last search load
//!    concurrently
//! 4. **Dispatch** user events through [`handle_event`] and render snapshots
//!
//! # Examples
//!
//! ```rust,no_run
//! use marquee::storage::MemoryStore;
//! use marquee::{handle_event, initialize, Config, Event};
//! use std::sync::Arc;
//!
//! # async fn run() -> marquee::Result<()> {
//! let config = Config::load(None)?;
//! let (session, mut auth) = initialize(&config, Arc::new(MemoryStore::default()))?;
//!
//! let identity = auth.login("user", "password")?;
//! session.bootstrap(Some(&identity)).await;
//!
//! handle_event(&session, Event::Search { query: "dune".into(), page: 1 }).await?;
//! handle_event(&session, Event::LoadMore).await?;
//! # Ok(())
//! # }
//! ```

#![allow(clippy::multiple_crate_versions)]

pub mod api;
pub mod app;
pub mod auth;
pub mod domain;
pub mod infrastructure;
pub mod storage;

pub mod observability;

pub use app::{handle_event, Action, CatalogSession, Event, SessionEvent, SessionSnapshot, ViewMode};
pub use auth::Authenticator;
pub use domain::{CatalogError, Item, Result, SessionIdentity, Theme};

use api::TmdbClient;
use infrastructure::paths::{expand_tilde, get_data_dir, STORE_FILE};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use storage::{KeyValueStore, PersistenceBridge};

/// Environment variable overriding [`Config::api_key`].
pub const API_KEY_ENV: &str = "MARQUEE_API_KEY";

/// Name of the configuration file inside the platform config directory.
pub const CONFIG_FILE: &str = "config.toml";

/// Runtime configuration.
///
/// Every field has a default, so a config file only needs the keys it changes.
///
/// # Example
///
/// ```toml
/// api_base_url = "https://api.themoviedb.org/3"
/// api_key = "..."
/// data_dir = "~/.local/share/marquee"
/// trace_level = "debug"
/// ```
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Base URL of the catalog API, without a trailing slash.
    pub api_base_url: String,

    /// Catalog API key. Usually supplied through `MARQUEE_API_KEY`.
    pub api_key: String,

    /// Base URL for poster and backdrop images.
    pub image_base_url: String,

    /// Directory for the store and log files. Default: the platform data directory.
    pub data_dir: Option<PathBuf>,

    /// Per-request HTTP timeout. Default: 30
    pub request_timeout_secs: u64,

    /// Log filter directive (`trace`, `debug`, `info`, ...). Default: `"info"`
    pub trace_level: String,

    /// Username to password table accepted by [`Authenticator`].
    pub accounts: BTreeMap<String, String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_base_url: "https://api.themoviedb.org/3".to_string(),
            api_key: String::new(),
            image_base_url: "https://image.tmdb.org/t/p".to_string(),
            data_dir: None,
            request_timeout_secs: 30,
            trace_level: "info".to_string(),
            accounts: auth::default_accounts(),
        }
    }
}

impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("api_base_url", &self.api_base_url)
            .field("api_key", &if self.api_key.is_empty() { "<unset>" } else { "<redacted>" })
            .field("image_base_url", &self.image_base_url)
            .field("data_dir", &self.data_dir)
            .field("request_timeout_secs", &self.request_timeout_secs)
            .field("trace_level", &self.trace_level)
            .field("accounts", &self.accounts.keys().collect::<Vec<_>>())
            .finish()
    }
}

impl Config {
    /// Parses a TOML configuration file.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::Io`] if the file cannot be read and
    /// [`CatalogError::Config`] if it is not valid TOML for this struct.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let mut config: Self = toml::from_str(&content)
            .map_err(|e| CatalogError::Config(format!("{}: {e}", path.display())))?;

        if config.accounts.is_empty() {
            config.accounts = auth::default_accounts();
        }
        config.data_dir = config
            .data_dir
            .map(|dir| dir.to_str().map_or(dir.clone(), expand_tilde));

        Ok(config)
    }

    /// Builds configuration from a string map, falling back to defaults.
    ///
    /// # Parsing Rules
    ///
    /// - `request_timeout_secs`: String → `u64` (falls back to 30 on parse error)
    /// - `data_dir`: `~` is expanded
    /// - `accounts`: comma-separated `name:password` pairs
    /// - empty values are ignored
    ///
    /// # Example
    ///
    /// ```rust
    /// use std::collections::BTreeMap;
    /// use marquee::Config;
    ///
    /// let mut map = BTreeMap::new();
    /// map.insert("api_key".to_string(), "secret".to_string());
    /// map.insert("request_timeout_secs".to_string(), "5".to_string());
    ///
    /// let config = Config::from_map(&map);
    /// assert_eq!(config.api_key, "secret");
    /// assert_eq!(config.request_timeout_secs, 5);
    /// ```
    #[must_use]
    pub fn from_map(map: &BTreeMap<String, String>) -> Self {
        Self::default().with_overrides(map)
    }

    /// Applies the keys present in `map` on top of `self`. See [`Config::from_map`].
    #[must_use]
    pub fn with_overrides(mut self, map: &BTreeMap<String, String>) -> Self {
        let get = |key: &str| map.get(key).map(|v| v.trim()).filter(|v| !v.is_empty());

        if let Some(url) = get("api_base_url") {
            self.api_base_url = url.trim_end_matches('/').to_string();
        }
        if let Some(key) = get("api_key") {
            self.api_key = key.to_string();
        }
        if let Some(url) = get("image_base_url") {
            self.image_base_url = url.trim_end_matches('/').to_string();
        }
        if let Some(dir) = get("data_dir") {
            self.data_dir = Some(expand_tilde(dir));
        }
        if let Some(secs) = get("request_timeout_secs") {
            self.request_timeout_secs = secs.parse().unwrap_or(30);
        }
        if let Some(level) = get("trace_level") {
            self.trace_level = level.to_string();
        }
        if let Some(accounts) = get("accounts") {
            let parsed: BTreeMap<String, String> = accounts
                .split(',')
                .filter_map(|pair| pair.split_once(':'))
                .map(|(name, password)| (name.trim().to_string(), password.to_string()))
                .filter(|(name, _)| !name.is_empty())
                .collect();
            if !parsed.is_empty() {
                self.accounts = parsed;
            }
        }

        self
    }

    /// Overrides the API key from `MARQUEE_API_KEY` when it is set and non-empty.
    #[must_use]
    pub fn with_env(mut self) -> Self {
        if let Some(key) = std::env::var(API_KEY_ENV).ok().filter(|k| !k.trim().is_empty()) {
            self.api_key = key;
        }
        self
    }

    /// Loads configuration the way the CLI does.
    ///
    /// Reads `path` if given, else `config.toml` in the platform config
    /// directory if it exists, else defaults; then applies the environment.
    ///
    /// # Errors
    ///
    /// Returns an error if an explicit `path` cannot be read or parsed, or if
    /// the default file exists but is invalid.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let default_file = dirs::config_dir().map(|dir| dir.join("marquee").join(CONFIG_FILE));

        let config = match (path, default_file) {
            (Some(path), _) => Self::from_file(path)?,
            (None, Some(file)) if file.exists() => Self::from_file(&file)?,
            _ => Self::default(),
        };

        Ok(config.with_env())
    }

    /// Resolved directory for the store and log files.
    #[must_use]
    pub fn resolved_data_dir(&self) -> PathBuf {
        get_data_dir(self.data_dir.as_deref())
    }

    /// Path of the JSON key-value store file.
    #[must_use]
    pub fn store_path(&self) -> PathBuf {
        self.resolved_data_dir().join(STORE_FILE)
    }
}

/// Builds the persistence bridge over `store` and an authenticator that has
/// already restored any persisted sign-in.
///
/// Needs no catalog access, so signing in and out works without an API key.
///
/// # Example
///
/// ```rust
/// use marquee::storage::MemoryStore;
/// use marquee::{initialize_auth, Config};
/// use std::sync::Arc;
///
/// let (_, mut auth) = initialize_auth(&Config::default(), Arc::new(MemoryStore::default()));
/// assert!(auth.login("user", "password").is_ok());
/// ```
#[must_use]
pub fn initialize_auth(config: &Config, store: Arc<dyn KeyValueStore>) -> (PersistenceBridge, Authenticator) {
    let persistence = PersistenceBridge::new(store);

    let mut auth = Authenticator::new(config.accounts.clone(), persistence.clone());
    auth.restore();

    (persistence, auth)
}

/// Builds a catalog session writing through `persistence`.
///
/// The session is not bootstrapped; call [`CatalogSession::bootstrap`] with
/// the signed-in identity.
///
/// # Errors
///
/// Returns [`CatalogError::Config`] if the catalog client cannot be built,
/// for example because no API key is configured.
pub fn connect(config: &Config, persistence: PersistenceBridge) -> Result<Arc<CatalogSession>> {
    let api = Arc::new(TmdbClient::from_config(config)?);
    Ok(Arc::new(CatalogSession::new(api, persistence)))
}

/// Builds a session and an authenticator sharing `store`.
///
/// Shorthand for [`initialize_auth`] followed by [`connect`].
///
/// # Errors
///
/// Same as [`connect`].
///
/// # Example
///
/// ```rust,no_run
/// use marquee::storage::JsonFileStore;
/// use marquee::{initialize, Config};
/// use std::sync::Arc;
///
/// let config = Config::load(None)?;
/// let store = Arc::new(JsonFileStore::open(config.store_path())?);
/// let (session, auth) = initialize(&config, store)?;
/// assert!(!session.is_bootstrapped());
/// # Ok::<(), marquee::CatalogError>(())
/// ```
pub fn initialize(
    config: &Config,
    store: Arc<dyn KeyValueStore>,
) -> Result<(Arc<CatalogSession>, Authenticator)> {
    tracing::debug!(config = ?config, "initializing marquee session");

    let (persistence, auth) = initialize_auth(config, store);
    let session = connect(config, persistence)?;
    Ok((session, auth))
}
