//! HTTP client for TMDb-compatible catalog services.
//!
//! Requests are plain `GET`s against the v3 REST surface with the API key passed
//! as a query parameter. Responses are read as text and decoded with
//! `serde_json` so that status failures and decode failures stay distinguishable.

use crate::api::client::CatalogApi;
use crate::domain::error::{CatalogError, Result};
use crate::domain::{DetailItem, Genre, ItemPage};
use crate::Config;
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::time::Duration;
use tracing::Instrument;

/// Maximum number of body bytes carried into an [`CatalogError::Api`] message.
const MAX_ERROR_BODY_CHARS: usize = 200;

/// Response shape of the genre list endpoint.
#[derive(Debug, Deserialize)]
struct GenreList {
    #[serde(default)]
    genres: Vec<Genre>,
}

/// Catalog client backed by `reqwest`.
#[derive(Debug, Clone)]
pub struct TmdbClient {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl TmdbClient {
    /// Builds a client from configuration.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::Config`] if the API key is empty, or an HTTP error
    /// if the underlying client cannot be constructed.
    pub fn from_config(config: &Config) -> Result<Self> {
        if config.api_key.trim().is_empty() {
            return Err(CatalogError::Config(
                "api_key is empty; set it in the config file or MARQUEE_API_KEY".to_string(),
            ));
        }

        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()?;

        Ok(Self {
            http,
            base_url: config.api_base_url.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
        })
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str, params: &[(&str, String)]) -> Result<T> {
        let url = self.endpoint(path);

        let response = self
            .http
            .get(&url)
            .query(&[("api_key", self.api_key.as_str())])
            .query(params)
            .send()
            .instrument(tracing::debug_span!("catalog_request", url = %url))
            .await?;

        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            tracing::debug!(status = status.as_u16(), url = %url, "catalog request failed");
            return Err(CatalogError::Api {
                status: status.as_u16(),
                message: body.chars().take(MAX_ERROR_BODY_CHARS).collect(),
            });
        }

        tracing::trace!(status = status.as_u16(), bytes = body.len(), "catalog response received");
        Ok(serde_json::from_str(&body)?)
    }
}

#[async_trait]
impl CatalogApi for TmdbClient {
    async fn fetch_trending(&self, page: u32) -> Result<ItemPage> {
        self.get_json("trending/movie/day", &[("page", page.to_string())])
            .await
    }

    async fn search_catalog(&self, query: &str, page: u32) -> Result<ItemPage> {
        self.get_json(
            "search/movie",
            &[("query", query.to_string()), ("page", page.to_string())],
        )
        .await
    }

    async fn fetch_detail(&self, id: u64) -> Result<DetailItem> {
        self.get_json(
            &format!("movie/{id}"),
            &[("append_to_response", "videos,credits".to_string())],
        )
        .await
    }

    async fn fetch_genres(&self) -> Result<Vec<Genre>> {
        let list: GenreList = self.get_json("genre/movie/list", &[]).await?;
        Ok(list.genres)
    }

    async fn discover_by_genre(&self, genre_id: u32, page: u32) -> Result<ItemPage> {
        self.get_json(
            "discover/movie",
            &[("with_genres", genre_id.to_string()), ("page", page.to_string())],
        )
        .await
    }
}
