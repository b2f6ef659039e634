//! TMDB (The Movie Database) API client
//!
//! Provides search, metadata, watch-provider catalogs, and the watch-region
//! reference list for movies and TV shows.
//! API docs: https://developer.themoviedb.org/docs

use anyhow::Result;
use indexmap::IndexMap;
use reqwest::StatusCode;
use serde::Deserialize;
use std::time::Duration;
use thiserror::Error;
use tracing::debug;

use crate::models::{
    MediaKind, ProviderCatalog, Region, SearchResult, TitleDetails, TitleKind,
};

/// TMDB API error types
#[derive(Error, Debug)]
pub enum TmdbError {
    #[error("Resource not found (404)")]
    NotFound,

    #[error("Rate limited (429), retries exhausted")]
    RateLimited,

    #[error("Server error: {0}")]
    ServerError(u16),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Request failed: {0}")]
    RequestFailed(#[from] reqwest::Error),
}

/// TMDB API client
pub struct TmdbClient {
    api_key: String,
    base_url: String,
    client: reqwest::Client,
    max_retries: u32,
}

impl TmdbClient {
    /// Create a new TMDB client with the given API key
    pub fn new(api_key: impl Into<String>) -> Self {
        Self::with_base_url(api_key, "https://api.themoviedb.org/3")
    }

    /// Create a client with a custom base URL (for testing)
    pub fn with_base_url(api_key: impl Into<String>, base_url: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: base_url.into(),
            client: reqwest::Client::builder()
                .timeout(Duration::from_secs(30))
                .build()
                .unwrap_or_default(),
            max_retries: 3,
        }
    }

    /// Make an authenticated GET request with retry logic for rate limits
    async fn get<T: for<'de> Deserialize<'de>>(&self, endpoint: &str) -> Result<T> {
        let url = format!("{}{}", self.base_url, endpoint);
        let mut retries = 0;

        loop {
            debug!("GET {}", url);
            let response = self
                .client
                .get(&url)
                .header("Authorization", format!("Bearer {}", self.api_key))
                .header("Accept", "application/json")
                .send()
                .await?;

            match response.status() {
                StatusCode::OK => {
                    let body = response.text().await?;
                    let parsed: T = serde_json::from_str(&body).map_err(|e| {
                        TmdbError::InvalidResponse(format!("JSON parse error: {}", e))
                    })?;
                    return Ok(parsed);
                }
                StatusCode::NOT_FOUND => {
                    return Err(TmdbError::NotFound.into());
                }
                StatusCode::TOO_MANY_REQUESTS => {
                    retries += 1;
                    if retries >= self.max_retries {
                        return Err(TmdbError::RateLimited.into());
                    }

                    // Get Retry-After header or default to exponential backoff
                    let wait_secs = response
                        .headers()
                        .get("Retry-After")
                        .and_then(|v| v.to_str().ok())
                        .and_then(|s| s.parse::<u64>().ok())
                        .unwrap_or(2u64.pow(retries));

                    debug!("rate limited, retry {} in {}s", retries, wait_secs);
                    tokio::time::sleep(Duration::from_secs(wait_secs)).await;
                    continue;
                }
                status => {
                    return Err(TmdbError::ServerError(status.as_u16()).into());
                }
            }
        }
    }

    /// Search for movies and TV shows
    pub async fn search(&self, query: &str) -> Result<Vec<SearchResult>> {
        let endpoint = format!(
            "/search/multi?query={}&page=1",
            urlencoding::encode(query)
        );

        let response: SearchResponse = self.get(&endpoint).await?;
        Ok(response.into_results())
    }

    /// Get trending content for the given window ("day" or "week")
    pub async fn trending(&self, window: &str) -> Result<Vec<SearchResult>> {
        let endpoint = format!("/trending/all/{}", window);
        let response: SearchResponse = self.get(&endpoint).await?;
        Ok(response.into_results())
    }

    /// Get title details (with recommendations) by kind and ID
    pub async fn title_details(&self, kind: MediaKind, id: u64) -> Result<TitleDetails> {
        let endpoint = format!(
            "/{}/{}?append_to_response=recommendations",
            kind.as_path(),
            id
        );

        match kind {
            MediaKind::Movie => {
                let response: MovieResponse = self.get(&endpoint).await?;
                Ok(response.into_details())
            }
            MediaKind::Tv => {
                let response: TvResponse = self.get(&endpoint).await?;
                Ok(response.into_details())
            }
        }
    }

    /// Get the per-country watch-provider catalog for a title
    pub async fn watch_providers(&self, kind: MediaKind, id: u64) -> Result<ProviderCatalog> {
        let endpoint = format!("/{}/{}/watch/providers", kind.as_path(), id);
        let response: WatchProvidersResponse = self.get(&endpoint).await?;
        Ok(response.into_catalog())
    }

    /// Get the country reference list for watch providers
    pub async fn watch_regions(&self) -> Result<Vec<Region>> {
        let response: RegionsResponse = self.get("/watch/providers/regions").await?;
        Ok(response.into_regions())
    }
}

// =============================================================================
// Response Structures (internal deserialization)
// =============================================================================

#[derive(Debug, Deserialize)]
struct SearchResponse {
    results: Vec<SearchResultRaw>,
}

impl SearchResponse {
    fn into_results(self) -> Vec<SearchResult> {
        self.results
            .into_iter()
            .filter_map(|r| r.into_search_result())
            .collect()
    }
}

#[derive(Debug, Deserialize)]
struct SearchResultRaw {
    id: u64,
    // Absent in recommendation lists nested under a movie/tv response
    media_type: Option<String>,
    // Movies use "title", TV uses "name"
    title: Option<String>,
    name: Option<String>,
    // Movies use "release_date", TV uses "first_air_date"
    release_date: Option<String>,
    first_air_date: Option<String>,
    overview: Option<String>,
    poster_path: Option<String>,
    vote_average: Option<f32>,
}

impl SearchResultRaw {
    fn into_search_result(self) -> Option<SearchResult> {
        let media_kind = match self.media_type.as_deref() {
            Some("movie") => MediaKind::Movie,
            Some("tv") => MediaKind::Tv,
            // Filter out "person" and other types
            Some(_) => return None,
            None if self.title.is_some() => MediaKind::Movie,
            None if self.name.is_some() => MediaKind::Tv,
            None => return None,
        };

        let title = self.title.or(self.name).unwrap_or_default();
        let date_str = self.release_date.or(self.first_air_date);
        let year = date_str.and_then(|d| extract_year(&d));

        Some(SearchResult {
            id: self.id,
            media_kind,
            title,
            year,
            overview: self.overview.unwrap_or_default(),
            poster_path: self.poster_path,
            vote_average: self.vote_average.unwrap_or(0.0),
        })
    }
}

#[derive(Debug, Deserialize)]
struct MovieResponse {
    id: u64,
    title: String,
    release_date: Option<String>,
    runtime: Option<u32>,
    genres: Vec<GenreRaw>,
    overview: Option<String>,
    vote_average: Option<f32>,
    poster_path: Option<String>,
    recommendations: Option<SearchResponse>,
}

impl MovieResponse {
    fn into_details(self) -> TitleDetails {
        let year = self.release_date.as_ref().and_then(|d| extract_year(d));

        TitleDetails {
            id: self.id,
            title: self.title,
            year,
            overview: self.overview.unwrap_or_default(),
            poster_path: self.poster_path,
            genres: self.genres.into_iter().map(|g| g.name).collect(),
            vote_average: self.vote_average.unwrap_or(0.0),
            recommendations: self
                .recommendations
                .map(|r| r.into_results())
                .unwrap_or_default(),
            kind: TitleKind::Movie {
                runtime: self.runtime.unwrap_or(0),
            },
        }
    }
}

#[derive(Debug, Deserialize)]
struct TvResponse {
    id: u64,
    name: String,
    first_air_date: Option<String>,
    number_of_seasons: Option<u32>,
    number_of_episodes: Option<u32>,
    genres: Vec<GenreRaw>,
    overview: Option<String>,
    vote_average: Option<f32>,
    poster_path: Option<String>,
    recommendations: Option<SearchResponse>,
}

impl TvResponse {
    fn into_details(self) -> TitleDetails {
        let year = self.first_air_date.as_ref().and_then(|d| extract_year(d));

        TitleDetails {
            id: self.id,
            title: self.name,
            year,
            overview: self.overview.unwrap_or_default(),
            poster_path: self.poster_path,
            genres: self.genres.into_iter().map(|g| g.name).collect(),
            vote_average: self.vote_average.unwrap_or(0.0),
            recommendations: self
                .recommendations
                .map(|r| r.into_results())
                .unwrap_or_default(),
            kind: TitleKind::Tv {
                seasons: self.number_of_seasons.unwrap_or(0),
                episodes: self.number_of_episodes.unwrap_or(0),
            },
        }
    }
}

#[derive(Debug, Deserialize)]
struct GenreRaw {
    name: String,
}

#[derive(Debug, Deserialize)]
struct WatchProvidersResponse {
    #[serde(default)]
    results: IndexMap<String, serde_json::Value>,
}

impl WatchProvidersResponse {
    /// Convert to a catalog, keeping upstream key order. A country entry
    /// that doesn't match the category structure contributes zero offers
    /// instead of failing the whole response.
    fn into_catalog(self) -> ProviderCatalog {
        self.results
            .into_iter()
            .map(|(code, value)| {
                let offers = serde_json::from_value(value).unwrap_or_default();
                (code, offers)
            })
            .collect()
    }
}

#[derive(Debug, Deserialize)]
struct RegionsResponse {
    #[serde(default)]
    results: Vec<RegionRaw>,
}

impl RegionsResponse {
    fn into_regions(self) -> Vec<Region> {
        self.results.into_iter().map(|r| r.into_region()).collect()
    }
}

#[derive(Debug, Deserialize)]
struct RegionRaw {
    iso_3166_1: String,
    native_name: Option<String>,
    english_name: Option<String>,
}

impl RegionRaw {
    fn into_region(self) -> Region {
        let RegionRaw {
            iso_3166_1,
            native_name,
            english_name,
        } = self;
        let native_name = native_name
            .or(english_name)
            .unwrap_or_else(|| iso_3166_1.clone());
        Region {
            iso_3166_1,
            native_name,
        }
    }
}

/// Extract year from a date string like "2022-03-04"
fn extract_year(date: &str) -> Option<u16> {
    if date.len() >= 4 {
        date[..4].parse().ok()
    } else {
        None
    }
}
