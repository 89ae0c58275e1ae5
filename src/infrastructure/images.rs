//! Image and trailer URL construction.
//!
//! Only URLs are built here; nothing is downloaded or decoded.

use crate::domain::Video;

/// Shown when an item has no poster or backdrop.
pub const PLACEHOLDER_IMAGE_URL: &str =
    "https://via.placeholder.com/500x750?text=No+Image+Available";

/// Default rendition size for posters.
pub const DEFAULT_IMAGE_SIZE: &str = "w500";

/// Builds the URL for an image path at a given rendition size (`w500`, `original`, ...).
///
/// Missing paths resolve to [`PLACEHOLDER_IMAGE_URL`].
///
/// # Examples
///
/// ```
/// use marquee::infrastructure::{image_url, PLACEHOLDER_IMAGE_URL};
///
/// let base = "https://image.tmdb.org/t/p";
/// assert_eq!(image_url(base, Some("/abc.jpg"), "w500"), "https://image.tmdb.org/t/p/w500/abc.jpg");
/// assert_eq!(image_url(base, None, "w500"), PLACEHOLDER_IMAGE_URL);
/// ```
#[must_use]
pub fn image_url(base_url: &str, path: Option<&str>, size: &str) -> String {
    match path.filter(|p| !p.is_empty()) {
        Some(path) => format!("{}/{size}{path}", base_url.trim_end_matches('/')),
        None => PLACEHOLDER_IMAGE_URL.to_string(),
    }
}

/// Returns a watch URL for a video hosted on YouTube, `None` for other sites.
#[must_use]
pub fn trailer_url(video: &Video) -> Option<String> {
    (video.site == "YouTube").then(|| format!("https://www.youtube.com/watch?v={}", video.key))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_path_uses_placeholder() {
        assert_eq!(image_url("https://img/", Some(""), "original"), PLACEHOLDER_IMAGE_URL);
    }

    #[test]
    fn only_youtube_videos_get_urls() {
        let mut video = Video {
            id: "1".to_string(),
            key: "n9xhJrPXop4".to_string(),
            name: "Trailer".to_string(),
            site: "YouTube".to_string(),
            kind: "Trailer".to_string(),
        };
        assert_eq!(
            trailer_url(&video).as_deref(),
            Some("https://www.youtube.com/watch?v=n9xhJrPXop4")
        );

        video.site = "Vimeo".to_string();
        assert_eq!(trailer_url(&video), None);
    }
}
