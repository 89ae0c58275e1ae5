//! Application layer coordinating session state, events, and actions.
//!
//! This module sits between the shell (main.rs) and the api/storage layers. It
//! owns every rule about how the session changes.
//!
//! # Architecture
//!
//! ```text
//! User Input → Event → handle_event → CatalogSession → SessionState mutation
//!                                          │                    │
//!                               CatalogApi / PersistenceBridge  └→ SessionEvent broadcast
//! ```
//!
//! # Modules
//!
//! - [`actions`]: Output the handler asks the shell to present
//! - [`events`]: Notifications published after every state transition
//! - [`favorites`]: Favorites store adapter over persistence
//! - [`handler`]: Event processing and session dispatch
//! - [`modes`]: Item list selection for presentation
//! - [`search`]: Search and pagination state machine
//! - [`session`]: Session manager and bootstrap sequencer
//! - [`state`]: Central state container and snapshots

pub mod actions;
pub mod events;
pub mod favorites;
pub mod handler;
pub mod modes;
pub mod search;
pub mod session;
pub mod state;

pub use actions::Action;
pub use events::SessionEvent;
pub use favorites::FavoritesStore;
pub use handler::{handle_event, Event};
pub use modes::ViewMode;
pub use search::{SearchOutcome, SearchState, SearchTicket, SEARCH_FAILED_MESSAGE};
pub use session::{BootstrapReport, CatalogSession};
pub use state::{SessionSnapshot, SessionState, TrendingState, TRENDING_FAILED_MESSAGE};
