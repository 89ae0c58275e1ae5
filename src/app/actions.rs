//! Actions representing output to be presented by the shell.
//!
//! The event handler returns a `Vec<Action>` after processing each event. The
//! session state itself is read from a snapshot; actions only carry what does
//! not live in the snapshot, such as a fetched detail record or a one-off
//! notice.

use super::modes::ViewMode;
use crate::domain::{DetailItem, Genre, ItemPage};

/// Output produced by [`handle_event`](super::handle_event).
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    /// Present one of the session's item lists.
    ShowView(ViewMode),

    /// Present a fetched detail record.
    ShowDetail(Box<DetailItem>),

    /// Present the genre list.
    ShowGenres(Vec<Genre>),

    /// Present one page of a genre browse.
    ShowDiscover {
        genre_id: u32,
        page: ItemPage,
    },

    /// Open an external URL (trailers).
    OpenUrl(String),

    /// Show a short message to the user.
    Notify(String),
}
