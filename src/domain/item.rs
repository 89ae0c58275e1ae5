//! Catalog item domain model.
//!
//! This module defines [`Item`], the record the catalog service returns for every
//! list endpoint, and [`DetailItem`], the richer record returned for a single item.
//! Items are created by deserializing API responses and are never mutated
//! afterwards; the same logical item may live independently in the trending list,
//! the search results, and the favorites set.

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

/// Number of minutes in one hour.
const MINUTES_PER_HOUR: u32 = 60;

/// A genre tag attached to an item.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Genre {
    pub id: u32,
    pub name: String,
}

/// A catalog entry as returned by list endpoints (trending, search, discover).
///
/// Field names follow the wire format so that stored favorites and API payloads
/// share one serialization.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Item {
    /// Unique identifier; the key for favorites membership.
    pub id: u64,

    #[serde(default)]
    pub title: String,

    #[serde(default)]
    pub poster_path: Option<String>,

    #[serde(default)]
    pub backdrop_path: Option<String>,

    /// Synopsis text.
    #[serde(default)]
    pub overview: String,

    /// `YYYY-MM-DD`, or empty when the service has no date.
    #[serde(default)]
    pub release_date: String,

    /// Average rating on a 0–10 scale.
    #[serde(default)]
    pub vote_average: f64,

    #[serde(default)]
    pub vote_count: u64,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub genre_ids: Option<Vec<u32>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub genres: Option<Vec<Genre>>,
}

impl Item {
    /// Creates an item with only an identifier and a title set.
    ///
    /// # Examples
    ///
    /// ```
    /// use marquee::Item;
    ///
    /// let item = Item::new(42, "Dune");
    /// assert_eq!(item.id, 42);
    /// assert!(item.poster_path.is_none());
    /// ```
    #[must_use]
    pub fn new(id: u64, title: impl Into<String>) -> Self {
        Self {
            id,
            title: title.into(),
            poster_path: None,
            backdrop_path: None,
            overview: String::new(),
            release_date: String::new(),
            vote_average: 0.0,
            vote_count: 0,
            genre_ids: None,
            genres: None,
        }
    }

    /// Returns the release year, or `None` when the date is missing or malformed.
    ///
    /// # Examples
    ///
    /// ```
    /// use marquee::Item;
    ///
    /// let mut item = Item::new(1, "Dune");
    /// item.release_date = "2021-09-15".to_string();
    /// assert_eq!(item.release_year(), Some(2021));
    /// ```
    #[must_use]
    pub fn release_year(&self) -> Option<i32> {
        NaiveDate::parse_from_str(&self.release_date, "%Y-%m-%d")
            .ok()
            .map(|date| date.year())
    }

    /// Formats the average rating with one decimal place, e.g. `"7.8"`.
    #[must_use]
    pub fn rating_label(&self) -> String {
        format!("{:.1}", self.vote_average)
    }
}

/// A trailer, teaser, or clip reference attached to a detailed item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Video {
    pub id: String,
    /// Provider-specific key (the YouTube video id for `site == "YouTube"`).
    pub key: String,
    pub name: String,
    pub site: String,
    #[serde(rename = "type")]
    pub kind: String,
}

/// Wrapper matching the `videos` object of the detail endpoint.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VideoList {
    #[serde(default)]
    pub results: Vec<Video>,
}

/// One credited cast member.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CastMember {
    pub id: u64,
    pub name: String,
    #[serde(default)]
    pub character: String,
    #[serde(default)]
    pub profile_path: Option<String>,
}

/// Wrapper matching the `credits` object of the detail endpoint.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credits {
    #[serde(default)]
    pub cast: Vec<CastMember>,
}

/// The detail variant of an [`Item`]: adds runtime, trailers, and cast.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DetailItem {
    #[serde(flatten)]
    pub item: Item,

    /// Runtime in minutes, when known.
    #[serde(default)]
    pub runtime: Option<u32>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub videos: Option<VideoList>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub credits: Option<Credits>,
}

impl DetailItem {
    /// Returns the first YouTube trailer, if the item has one.
    #[must_use]
    pub fn trailer(&self) -> Option<&Video> {
        self.videos
            .as_ref()?
            .results
            .iter()
            .find(|video| video.kind == "Trailer" && video.site == "YouTube")
    }

    /// Formats the runtime as `"2h 35m"`. Returns `None` for a missing or zero runtime.
    ///
    /// # Examples
    ///
    /// ```
    /// use marquee::domain::{DetailItem, Item};
    ///
    /// let detail = DetailItem { item: Item::new(1, "Dune"), runtime: Some(155), videos: None, credits: None };
    /// assert_eq!(detail.runtime_label().as_deref(), Some("2h 35m"));
    /// ```
    #[must_use]
    pub fn runtime_label(&self) -> Option<String> {
        let minutes = self.runtime.filter(|m| *m > 0)?;
        Some(format!(
            "{}h {}m",
            minutes / MINUTES_PER_HOUR,
            minutes % MINUTES_PER_HOUR
        ))
    }

    /// Returns the credited cast, or an empty slice when credits were not requested.
    #[must_use]
    pub fn cast(&self) -> &[CastMember] {
        self.credits.as_ref().map_or(&[], |credits| credits.cast.as_slice())
    }

    /// Returns the detail's genres.
    #[must_use]
    pub fn genres(&self) -> &[Genre] {
        self.item.genres.as_deref().unwrap_or(&[])
    }
}

/// One page of a paginated list endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemPage {
    pub page: u32,
    #[serde(default)]
    pub results: Vec<Item>,
    #[serde(default)]
    pub total_pages: u32,
    #[serde(default)]
    pub total_results: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    const DETAIL_JSON: &str = r#"{
        "id": 438631,
        "title": "Dune",
        "poster_path": "/d5NXSklXo0qyIYkgV94XAgMIckC.jpg",
        "backdrop_path": null,
        "overview": "Paul Atreides...",
        "release_date": "2021-09-15",
        "vote_average": 7.78,
        "vote_count": 10234,
        "genres": [{"id": 878, "name": "Science Fiction"}],
        "runtime": 155,
        "videos": {"results": [
            {"id": "a", "key": "abc", "name": "Teaser", "site": "YouTube", "type": "Teaser"},
            {"id": "b", "key": "n9xhJrPXop4", "name": "Official Trailer", "site": "YouTube", "type": "Trailer"}
        ]},
        "credits": {"cast": [
            {"id": 1190668, "name": "Timothée Chalamet", "character": "Paul Atreides", "profile_path": null}
        ]}
    }"#;

    #[test]
    fn list_item_tolerates_missing_optional_fields() {
        let item: Item = serde_json::from_str(r#"{"id": 7, "title": "Se7en"}"#).unwrap();
        assert_eq!(item.id, 7);
        assert!(item.release_date.is_empty());
        assert_eq!(item.release_year(), None);
        assert_eq!(item.rating_label(), "0.0");
    }

    #[test]
    fn detail_exposes_trailer_runtime_and_cast() {
        let detail: DetailItem = serde_json::from_str(DETAIL_JSON).unwrap();
        assert_eq!(detail.item.id, 438_631);
        assert_eq!(detail.item.release_year(), Some(2021));
        assert_eq!(detail.item.rating_label(), "7.8");
        assert_eq!(detail.trailer().map(|v| v.key.as_str()), Some("n9xhJrPXop4"));
        assert_eq!(detail.runtime_label().as_deref(), Some("2h 35m"));
        assert_eq!(detail.cast().len(), 1);
        assert_eq!(detail.genres()[0].name, "Science Fiction");
    }

    #[test]
    fn zero_runtime_has_no_label() {
        let detail = DetailItem {
            item: Item::new(1, "Short"),
            runtime: Some(0),
            videos: None,
            credits: None,
        };
        assert_eq!(detail.runtime_label(), None);
        assert!(detail.trailer().is_none());
        assert!(detail.cast().is_empty());
    }

    #[test]
    fn page_decodes_totals() {
        let page: ItemPage = serde_json::from_str(
            r#"{"page": 2, "results": [{"id": 1, "title": "A"}], "total_pages": 3, "total_results": 41}"#,
        )
        .unwrap();
        assert_eq!(page.page, 2);
        assert_eq!(page.total_pages, 3);
        assert_eq!(page.results.len(), 1);
    }
}
