//! Data directory resolution.
//!
//! The store file and the log file live in a per-user data directory:
//! `$XDG_DATA_HOME/marquee` on Linux, `~/Library/Application Support/marquee` on
//! macOS, `%APPDATA%\marquee` on Windows. A configured directory always wins.

use std::path::{Path, PathBuf};

/// Application directory name under the platform data directory.
const APP_DIR: &str = "marquee";

/// File name of the key-value store inside the data directory.
pub const STORE_FILE: &str = "store.json";

/// File name of the log file inside the data directory.
pub const LOG_FILE: &str = "marquee.log";

/// Returns the data directory, preferring `configured` when set.
///
/// Falls back to `./.marquee` when the platform exposes no data directory.
///
/// # Examples
///
/// ```
/// use marquee::infrastructure::get_data_dir;
/// use std::path::{Path, PathBuf};
///
/// let dir = get_data_dir(Some(Path::new("/tmp/custom")));
/// assert_eq!(dir, PathBuf::from("/tmp/custom"));
/// ```
#[must_use]
pub fn get_data_dir(configured: Option<&Path>) -> PathBuf {
    configured.map_or_else(
        || {
            dirs::data_dir().map_or_else(|| PathBuf::from(".marquee"), |dir| dir.join(APP_DIR))
        },
        Path::to_path_buf,
    )
}

/// Expands a leading `~` to the user's home directory.
///
/// Paths without a tilde, or systems without a home directory, are returned unchanged.
#[must_use]
pub fn expand_tilde(path: &str) -> PathBuf {
    let home = dirs::home_dir();
    match (path, home) {
        ("~", Some(home)) => home,
        (p, Some(home)) if p.starts_with("~/") => home.join(&p[2..]),
        (p, _) => PathBuf::from(p),
    }
}
