//! Remote catalog abstraction.
//!
//! Pages talk to the movie metadata service through [`CatalogClient`] so the
//! HTTP implementation can be swapped for a scripted one in tests.

use async_trait::async_trait;
use listing_query::{GenreSet, ListingQuery, SortKey, SortingType};
use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Which half of the catalog a request targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaKind {
    Movie,
    Tv,
}

impl MediaKind {
    /// Path segment used by the metadata service (`movie`, `tv`).
    pub fn api_segment(&self) -> &'static str {
        match self {
            MediaKind::Movie => "movie",
            MediaKind::Tv => "tv",
        }
    }

    /// Path of the site's listing page for this kind.
    pub fn listing_path(&self) -> &'static str {
        match self {
            MediaKind::Movie => "/movies",
            MediaKind::Tv => "/tv",
        }
    }

    /// Site path of a single item's detail page.
    pub fn detail_path(&self, id: u64) -> String {
        format!("{}/{}", self.listing_path(), id)
    }

    pub fn label(&self) -> &'static str {
        match self {
            MediaKind::Movie => "Movies",
            MediaKind::Tv => "TV Shows",
        }
    }
}

/// Genre reference data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Genre {
    pub id: u32,
    pub name: String,
}

/// An item as it appears in grids and carousels.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ItemSummary {
    pub id: u64,
    pub kind: MediaKind,
    pub title: String,
    /// `YYYY-MM-DD`, when known
    pub release_date: Option<String>,
    pub poster_url: Option<String>,
    pub popularity: f64,
    pub vote_average: f64,
    pub vote_count: u64,
    pub genre_ids: Vec<u32>,
}

/// Full metadata for one item.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ItemDetail {
    pub id: u64,
    pub kind: MediaKind,
    pub title: String,
    pub release_date: Option<String>,
    pub poster_url: Option<String>,
    pub popularity: f64,
    pub vote_average: f64,
    pub vote_count: u64,
    pub genres: Vec<Genre>,
    /// Minutes; movies report a runtime, shows their typical episode length
    pub runtime: Option<u32>,
    pub tagline: Option<String>,
    pub overview: String,
}

/// One page of a paginated listing.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CatalogPage {
    pub results: Vec<ItemSummary>,
    pub page: u32,
    pub total_pages: u32,
    pub total_results: u64,
}

impl CatalogPage {
    pub fn empty() -> Self {
        Self {
            results: Vec::new(),
            page: 1,
            total_pages: 0,
            total_results: 0,
        }
    }
}

/// Filters for an explore listing, in catalog terms.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExploreParams {
    pub sorting_type: SortingType,
    pub rating_lower: Option<u8>,
    pub rating_higher: Option<u8>,
    pub genres: GenreSet,
    pub page: u32,
}

impl Default for ExploreParams {
    fn default() -> Self {
        Self::from_query(&ListingQuery::default())
    }
}

impl ExploreParams {
    /// Derives the request from the listing URL's state.
    pub fn from_query(query: &ListingQuery) -> Self {
        Self {
            sorting_type: query.sorting_type.unwrap_or_default(),
            rating_lower: query.rating_lower,
            rating_higher: query.rating_higher,
            genres: query.genres.clone().unwrap_or_default(),
            page: query.page_or_default(),
        }
    }

    /// Service-side sort parameter for `kind`.
    ///
    /// Release dates are called differently for movies and shows.
    pub fn sort_by(&self, kind: MediaKind) -> String {
        let field = match (self.sorting_type.key(), kind) {
            (SortKey::Popularity, _) => "popularity",
            (SortKey::Rating, _) => "vote_average",
            (SortKey::ReleaseDate, MediaKind::Movie) => "primary_release_date",
            (SortKey::ReleaseDate, MediaKind::Tv) => "first_air_date",
        };
        format!("{}.{}", field, self.sorting_type.direction().as_str())
    }

    /// Query parameters for the discover endpoint.
    pub fn to_params(&self, kind: MediaKind) -> Vec<(&'static str, String)> {
        let mut params = vec![
            ("sort_by", self.sort_by(kind)),
            ("page", self.page.to_string()),
        ];

        if let Some(lower) = self.rating_lower {
            params.push(("vote_average.gte", lower.to_string()));
        }
        if let Some(higher) = self.rating_higher {
            params.push(("vote_average.lte", higher.to_string()));
        }
        if !self.genres.is_empty() {
            params.push(("with_genres", self.genres.to_query_value()));
        }

        params
    }
}

/// Operations the site needs from the metadata service.
///
/// Implementations do not retry; a failed call is returned to the caller.
#[async_trait]
pub trait CatalogClient: Send + Sync {
    /// Currently popular items of one kind.
    async fn trending(&self, kind: MediaKind) -> Result<Vec<ItemSummary>>;

    /// Filtered, paginated listing.
    async fn explore(&self, kind: MediaKind, params: &ExploreParams) -> Result<CatalogPage>;

    /// Genre taxonomy for one kind.
    async fn genres(&self, kind: MediaKind) -> Result<Vec<Genre>>;

    /// Full record for one item.
    async fn detail(&self, kind: MediaKind, id: u64) -> Result<ItemDetail>;

    /// Free-text search.
    async fn search(&self, kind: MediaKind, query: &str, page: u32) -> Result<CatalogPage>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_empty_query_uses_defaults() {
        let params = ExploreParams::from_query(&ListingQuery::default());
        assert_eq!(params.sorting_type, SortingType::PopularityDesc);
        assert_eq!(params.page, 1);
        assert!(params.genres.is_empty());
        assert_eq!(
            params.to_params(MediaKind::Movie),
            vec![
                ("sort_by", "popularity.desc".to_string()),
                ("page", "1".to_string()),
            ]
        );
    }

    #[test]
    fn test_to_params_translates_filters() {
        let query = ListingQuery::read(
            "sortingType=vote_average.desc&ratingLower=5&ratingHigher=9&genres=28,12&page=1",
        );
        let params = ExploreParams::from_query(&query).to_params(MediaKind::Movie);
        assert_eq!(
            params,
            vec![
                ("sort_by", "vote_average.desc".to_string()),
                ("page", "1".to_string()),
                ("vote_average.gte", "5".to_string()),
                ("vote_average.lte", "9".to_string()),
                ("with_genres", "28,12".to_string()),
            ]
        );
    }

    #[test]
    fn test_release_date_sort_differs_per_kind() {
        let query = ListingQuery::read("sortingType=release_date.asc");
        let params = ExploreParams::from_query(&query);
        assert_eq!(params.sort_by(MediaKind::Movie), "primary_release_date.asc");
        assert_eq!(params.sort_by(MediaKind::Tv), "first_air_date.asc");
    }

    #[test]
    fn test_media_kind_paths() {
        assert_eq!(MediaKind::Movie.listing_path(), "/movies");
        assert_eq!(MediaKind::Tv.detail_path(1399), "/tv/1399");
        assert_eq!(MediaKind::Tv.api_segment(), "tv");
    }
}
