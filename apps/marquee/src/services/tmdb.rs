//! TMDB (The Movie Database) service client.
//!
//! Implements [`CatalogClient`] on top of the TMDB v3 API.

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::sync::Arc;
use std::time::Duration;

use crate::config::TmdbConfig;
use crate::error::{AppError, Result};
use crate::services::catalog::{
    CatalogClient, CatalogPage, ExploreParams, Genre, ItemDetail, ItemSummary, MediaKind,
};

/// Seconds to wait when TMDB rate limits us without a `Retry-After` header.
const DEFAULT_RETRY_AFTER_SECS: u32 = 10;

/// TMDB API client for fetching movie and TV show metadata.
pub struct TmdbClient {
    client: Client,
    api_key: String,
    base_url: String,
    image_base_url: String,
    poster_size: String,
    detail_poster_size: String,
    language: String,
    trending_window: String,
}

impl TmdbClient {
    /// Create a new TMDB client from configuration.
    ///
    /// Returns an error if the API key is missing or empty, or if the HTTP client cannot be built.
    pub fn new(config: &TmdbConfig) -> Result<Self> {
        let api_key = config
            .api_key
            .clone()
            .filter(|key| !key.trim().is_empty())
            .ok_or_else(|| AppError::Internal("TMDB API key cannot be empty".to_string()))?;

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| AppError::Internal(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            api_key,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            image_base_url: config.image_base_url.trim_end_matches('/').to_string(),
            poster_size: config.poster_size.clone(),
            detail_poster_size: config.detail_poster_size.clone(),
            language: config.language.clone(),
            trending_window: config.trending_window.clone(),
        })
    }

    /// Create a new TMDB client wrapped in Arc for shared access.
    pub fn new_shared(config: &TmdbConfig) -> Result<Arc<Self>> {
        Ok(Arc::new(Self::new(config)?))
    }

    /// Generate a poster URL for the given path and size.
    ///
    /// Common sizes: "w92", "w154", "w185", "w342", "w500", "w780", "original"
    pub fn poster_url(&self, path: &str, size: &str) -> String {
        format!("{}/{}{}", self.image_base_url, size, path)
    }

    fn summary_poster(&self, path: Option<&str>) -> Option<String> {
        path.map(|p| self.poster_url(p, &self.poster_size))
    }

    fn detail_poster(&self, path: Option<&str>) -> Option<String> {
        path.map(|p| self.poster_url(p, &self.detail_poster_size))
    }

    fn movie_summary(&self, movie: TmdbMovie) -> ItemSummary {
        ItemSummary {
            id: movie.id,
            kind: MediaKind::Movie,
            poster_url: self.summary_poster(movie.poster_path.as_deref()),
            title: movie.title,
            release_date: non_empty(movie.release_date),
            popularity: movie.popularity,
            vote_average: movie.vote_average,
            vote_count: movie.vote_count,
            genre_ids: movie.genre_ids,
        }
    }

    fn tv_summary(&self, show: TmdbTvShow) -> ItemSummary {
        ItemSummary {
            id: show.id,
            kind: MediaKind::Tv,
            poster_url: self.summary_poster(show.poster_path.as_deref()),
            title: show.name,
            release_date: non_empty(show.first_air_date),
            popularity: show.popularity,
            vote_average: show.vote_average,
            vote_count: show.vote_count,
            genre_ids: show.genre_ids,
        }
    }

    /// Fetch a results page and normalize it to catalog items.
    async fn fetch_page(
        &self,
        kind: MediaKind,
        path: &str,
        params: &[(&str, String)],
    ) -> Result<CatalogPage> {
        match kind {
            MediaKind::Movie => {
                let response: TmdbPage<TmdbMovie> = self.get_with_params(path, params).await?;
                Ok(CatalogPage {
                    page: response.page,
                    total_pages: response.total_pages,
                    total_results: response.total_results,
                    results: response
                        .results
                        .into_iter()
                        .map(|m| self.movie_summary(m))
                        .collect(),
                })
            }
            MediaKind::Tv => {
                let response: TmdbPage<TmdbTvShow> = self.get_with_params(path, params).await?;
                Ok(CatalogPage {
                    page: response.page,
                    total_pages: response.total_pages,
                    total_results: response.total_results,
                    results: response
                        .results
                        .into_iter()
                        .map(|s| self.tv_summary(s))
                        .collect(),
                })
            }
        }
    }

    /// Internal helper to perform GET requests with query parameters and deserialize JSON responses.
    ///
    /// The API key and language are appended to every request.
    async fn get_with_params<T>(&self, path: &str, params: &[(&str, String)]) -> Result<T>
    where
        T: for<'de> Deserialize<'de>,
    {
        let url = format!("{}{}", self.base_url, path);

        let response = self
            .client
            .get(&url)
            .query(&[("api_key", &self.api_key), ("language", &self.language)])
            .query(params)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    AppError::Timeout(format!("TMDB request to {}", path))
                } else {
                    AppError::ServiceUnavailable(format!("TMDB request to {} failed: {}", path, e))
                }
            })?;

        let status = response.status();

        if status == reqwest::StatusCode::UNAUTHORIZED {
            return Err(AppError::ServiceUnavailable(
                "TMDB API key is invalid or missing".to_string(),
            ));
        }

        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(AppError::NotFound(format!(
                "TMDB resource not found: {}",
                path
            )));
        }

        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            let retry_after = response
                .headers()
                .get(reqwest::header::RETRY_AFTER)
                .and_then(|v| v.to_str().ok())
                .and_then(|v| v.parse().ok())
                .unwrap_or(DEFAULT_RETRY_AFTER_SECS);
            return Err(AppError::RateLimited(retry_after));
        }

        if !status.is_success() {
            return Err(AppError::Internal(format!(
                "TMDB API {} returned error status: {}",
                path, status
            )));
        }

        response.json::<T>().await.map_err(|e| {
            AppError::Internal(format!(
                "Failed to parse TMDB response from {}: {}",
                path, e
            ))
        })
    }
}

#[async_trait]
impl CatalogClient for TmdbClient {
    async fn trending(&self, kind: MediaKind) -> Result<Vec<ItemSummary>> {
        tracing::debug!(kind = ?kind, window = %self.trending_window, "Fetching TMDB trending");

        let path = format!("/trending/{}/{}", kind.api_segment(), self.trending_window);
        let page = self.fetch_page(kind, &path, &[]).await?;
        Ok(page.results)
    }

    async fn explore(&self, kind: MediaKind, params: &ExploreParams) -> Result<CatalogPage> {
        tracing::debug!(
            kind = ?kind,
            sort_by = %params.sort_by(kind),
            page = params.page,
            "Exploring TMDB catalog"
        );

        let path = format!("/discover/{}", kind.api_segment());
        self.fetch_page(kind, &path, &params.to_params(kind)).await
    }

    async fn genres(&self, kind: MediaKind) -> Result<Vec<Genre>> {
        tracing::debug!(kind = ?kind, "Fetching TMDB genres");

        let path = format!("/genre/{}/list", kind.api_segment());
        let response: TmdbGenreList = self.get_with_params(&path, &[]).await?;
        Ok(response
            .genres
            .into_iter()
            .map(|g| Genre {
                id: g.id,
                name: g.name,
            })
            .collect())
    }

    async fn detail(&self, kind: MediaKind, id: u64) -> Result<ItemDetail> {
        tracing::debug!(kind = ?kind, id = %id, "Fetching TMDB details");

        let path = format!("/{}/{}", kind.api_segment(), id);
        let detail = match kind {
            MediaKind::Movie => {
                let m: TmdbMovieDetails = self.get_with_params(&path, &[]).await?;
                ItemDetail {
                    id: m.id,
                    kind,
                    poster_url: self.detail_poster(m.poster_path.as_deref()),
                    title: m.title,
                    release_date: non_empty(m.release_date),
                    popularity: m.popularity,
                    vote_average: m.vote_average,
                    vote_count: m.vote_count,
                    genres: m.genres.into_iter().map(Into::into).collect(),
                    runtime: m.runtime.filter(|r| *r > 0),
                    tagline: non_empty(m.tagline),
                    overview: m.overview.unwrap_or_default(),
                }
            }
            MediaKind::Tv => {
                let s: TmdbTvDetails = self.get_with_params(&path, &[]).await?;
                ItemDetail {
                    id: s.id,
                    kind,
                    poster_url: self.detail_poster(s.poster_path.as_deref()),
                    title: s.name,
                    release_date: non_empty(s.first_air_date),
                    popularity: s.popularity,
                    vote_average: s.vote_average,
                    vote_count: s.vote_count,
                    genres: s.genres.into_iter().map(Into::into).collect(),
                    runtime: s.episode_run_time.first().copied().filter(|r| *r > 0),
                    tagline: non_empty(s.tagline),
                    overview: s.overview.unwrap_or_default(),
                }
            }
        };

        Ok(detail)
    }

    async fn search(&self, kind: MediaKind, query: &str, page: u32) -> Result<CatalogPage> {
        tracing::debug!(kind = ?kind, query = %query, page = page, "Searching TMDB");

        let path = format!("/search/{}", kind.api_segment());
        let params = [("query", query.to_string()), ("page", page.to_string())];
        self.fetch_page(kind, &path, &params).await
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

// =============================================================================
// Response Types
// =============================================================================

/// Paginated results wrapper from TMDB API.
#[derive(Debug, Deserialize)]
pub struct TmdbPage<T> {
    pub results: Vec<T>,
    #[serde(default = "first_page")]
    pub page: u32,
    #[serde(default)]
    pub total_pages: u32,
    #[serde(default)]
    pub total_results: u64,
}

fn first_page() -> u32 {
    1
}

/// Movie list entry from TMDB.
#[derive(Debug, Deserialize)]
pub struct TmdbMovie {
    pub id: u64,
    pub title: String,
    pub release_date: Option<String>,
    pub poster_path: Option<String>,
    #[serde(default)]
    pub popularity: f64,
    #[serde(default)]
    pub vote_average: f64,
    #[serde(default)]
    pub vote_count: u64,
    #[serde(default)]
    pub genre_ids: Vec<u32>,
}

/// TV show list entry from TMDB.
#[derive(Debug, Deserialize)]
pub struct TmdbTvShow {
    pub id: u64,
    pub name: String,
    pub first_air_date: Option<String>,
    pub poster_path: Option<String>,
    #[serde(default)]
    pub popularity: f64,
    #[serde(default)]
    pub vote_average: f64,
    #[serde(default)]
    pub vote_count: u64,
    #[serde(default)]
    pub genre_ids: Vec<u32>,
}

/// Detailed movie information from TMDB.
#[derive(Debug, Deserialize)]
pub struct TmdbMovieDetails {
    pub id: u64,
    pub title: String,
    pub overview: Option<String>,
    pub release_date: Option<String>,
    pub poster_path: Option<String>,
    #[serde(default)]
    pub popularity: f64,
    #[serde(default)]
    pub vote_average: f64,
    #[serde(default)]
    pub vote_count: u64,
    pub runtime: Option<u32>,
    #[serde(default)]
    pub genres: Vec<TmdbGenre>,
    pub tagline: Option<String>,
}

/// Detailed TV show information from TMDB.
#[derive(Debug, Deserialize)]
pub struct TmdbTvDetails {
    pub id: u64,
    pub name: String,
    pub overview: Option<String>,
    pub first_air_date: Option<String>,
    pub poster_path: Option<String>,
    #[serde(default)]
    pub popularity: f64,
    #[serde(default)]
    pub vote_average: f64,
    #[serde(default)]
    pub vote_count: u64,
    #[serde(default)]
    pub episode_run_time: Vec<u32>,
    #[serde(default)]
    pub genres: Vec<TmdbGenre>,
    pub tagline: Option<String>,
}

/// Genre information from TMDB.
#[derive(Debug, Deserialize)]
pub struct TmdbGenre {
    pub id: u32,
    pub name: String,
}

impl From<TmdbGenre> for Genre {
    fn from(genre: TmdbGenre) -> Self {
        Genre {
            id: genre.id,
            name: genre.name,
        }
    }
}

/// Genre list response from TMDB.
#[derive(Debug, Deserialize)]
pub struct TmdbGenreList {
    pub genres: Vec<TmdbGenre>,
}
