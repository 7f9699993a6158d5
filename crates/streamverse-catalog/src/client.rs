//! HTTP client for the catalog API.

use std::time::Duration;

use serde::de::DeserializeOwned;
use streamverse_shared::constants::{DEFAULT_CATALOG_BASE_URL, DEFAULT_IMAGE_BASE_URL};
use streamverse_shared::TitleId;
use tracing::debug;

use crate::error::{CatalogError, Result};
use crate::images::{self, ImageSize};
use crate::models::{MovieDetails, MovieSummary, Page};

/// Catalog endpoint and credentials.
#[derive(Debug, Clone)]
pub struct CatalogConfig {
    /// API root, e.g. `https://api.themoviedb.org/3`.
    pub base_url: String,
    /// Image CDN root, e.g. `https://image.tmdb.org/t/p`.
    pub image_base_url: String,
    /// Key sent as the `api_key` query parameter.
    pub api_key: String,
    pub timeout: Duration,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_CATALOG_BASE_URL.to_string(),
            image_base_url: DEFAULT_IMAGE_BASE_URL.to_string(),
            api_key: String::new(),
            timeout: Duration::from_secs(15),
        }
    }
}

#[derive(Clone)]
pub struct CatalogClient {
    http: reqwest::Client,
    config: CatalogConfig,
}

impl CatalogClient {
    pub fn new(config: CatalogConfig) -> Result<Self> {
        if !config.base_url.starts_with("http://") && !config.base_url.starts_with("https://") {
            return Err(CatalogError::InvalidUrl(config.base_url));
        }

        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .user_agent(concat!("streamverse/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self { http, config })
    }

    pub fn config(&self) -> &CatalogConfig {
        &self.config
    }

    // ------------------------------------------------------------------
    // Listings
    // ------------------------------------------------------------------

    pub async fn popular(&self) -> Result<Vec<MovieSummary>> {
        self.listing("/movie/popular", &[]).await
    }

    pub async fn trending(&self) -> Result<Vec<MovieSummary>> {
        self.listing("/trending/movie/week", &[]).await
    }

    pub async fn top_rated(&self) -> Result<Vec<MovieSummary>> {
        self.listing("/movie/top_rated", &[]).await
    }

    pub async fn discover_by_genre(&self, genre_id: u32) -> Result<Vec<MovieSummary>> {
        self.listing("/discover/movie", &[("with_genres", genre_id.to_string())])
            .await
    }

    /// Full-text title search.  A blank query returns no results without
    /// contacting the catalog.
    pub async fn search(&self, query: &str) -> Result<Vec<MovieSummary>> {
        let query = query.trim();
        if query.is_empty() {
            return Ok(Vec::new());
        }
        self.listing("/search/movie", &[("query", query.to_string())])
            .await
    }

    pub async fn similar(&self, id: TitleId) -> Result<Vec<MovieSummary>> {
        self.listing(&format!("/movie/{id}/similar"), &[]).await
    }

    // ------------------------------------------------------------------
    // Detail
    // ------------------------------------------------------------------

    pub async fn details(&self, id: TitleId) -> Result<MovieDetails> {
        self.get(
            &format!("/movie/{id}"),
            &[("append_to_response", "videos,credits".to_string())],
        )
        .await
    }

    // ------------------------------------------------------------------
    // Images
    // ------------------------------------------------------------------

    pub fn image_url(&self, size: ImageSize, path: Option<&str>) -> Option<String> {
        images::image_url(&self.config.image_base_url, size, path)
    }

    // ------------------------------------------------------------------
    // Helpers
    // ------------------------------------------------------------------

    async fn listing(&self, endpoint: &str, params: &[(&str, String)]) -> Result<Vec<MovieSummary>> {
        let page: Page<MovieSummary> = self.get(endpoint, params).await?;
        debug!(endpoint, count = page.results.len(), "catalog listing fetched");
        Ok(page.results)
    }

    async fn get<T: DeserializeOwned>(&self, endpoint: &str, params: &[(&str, String)]) -> Result<T> {
        let url = format!("{}{}", self.config.base_url.trim_end_matches('/'), endpoint);

        let resp = self
            .http
            .get(&url)
            .query(&[("api_key", self.config.api_key.as_str())])
            .query(params)
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            return Err(CatalogError::Status {
                status: status.as_u16(),
                endpoint: endpoint.to_string(),
            });
        }

        Ok(resp.json().await?)
    }
}
