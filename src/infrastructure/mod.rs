//! Infrastructure layer for filesystem locations and URL helpers.

pub mod images;
pub mod paths;

pub use images::{image_url, trailer_url, DEFAULT_IMAGE_SIZE, PLACEHOLDER_IMAGE_URL};
pub use paths::{expand_tilde, get_data_dir, LOG_FILE, STORE_FILE};
