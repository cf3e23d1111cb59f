//! Catalog API endpoints: explore listings, genres, trending and details.

use askama::Template;
use axum::{
    extract::{Path, RawQuery, State},
    http::HeaderMap,
    Json,
};
use listing_query::{empty_values, ListingQuery};
use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result};
use crate::response::{negotiate, Negotiate};
use crate::services::{ExploreParams, Genre, ItemDetail, ItemSummary, MediaKind};
use crate::views::utils::{cards, ItemCard};
use crate::AppState;

// =============================================================================
// Request/Response Types
// =============================================================================

/// Kind segment of an API path (`/api/movies/...`, `/api/tv/...`).
#[derive(Debug, Clone, Copy, Deserialize)]
pub enum KindSegment {
    #[serde(rename = "movies")]
    Movies,
    #[serde(rename = "tv")]
    Tv,
}

impl From<KindSegment> for MediaKind {
    fn from(segment: KindSegment) -> Self {
        match segment {
            KindSegment::Movies => MediaKind::Movie,
            KindSegment::Tv => MediaKind::Tv,
        }
    }
}

/// One page of an explore listing.
#[derive(Debug, Clone, Serialize)]
pub struct ExploreResponse {
    /// The listing query the results were fetched for
    pub query: ListingQuery,
    pub page: u32,
    /// Page count offered to clients, capped at the display limit
    pub total_pages: u32,
    pub total_results: u64,
    pub results: Vec<ItemSummary>,
}

#[derive(Template)]
#[template(path = "partials/item_grid.html")]
pub struct ItemGridTemplate {
    pub items: Vec<ItemCard>,
}

// =============================================================================
// Handlers
// =============================================================================

/// GET /api/:kind/explore
///
/// Accepts the listing page's query string keys. Answers JSON, or the item
/// grid fragment when HTML is preferred.
pub async fn explore(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(kind): Path<KindSegment>,
    RawQuery(raw): RawQuery,
) -> Result<Negotiate<Json<ExploreResponse>, ItemGridTemplate>> {
    let kind = MediaKind::from(kind);
    let raw = raw.unwrap_or_default();

    let empty = empty_values(&raw);
    if !empty.is_empty() {
        return Err(AppError::BadRequest(format!(
            "Empty value for query keys: {}",
            empty.join(", ")
        )));
    }

    let query = ListingQuery::read(&raw);
    let page = state
        .catalog()
        .explore(kind, &ExploreParams::from_query(&query))
        .await?;

    let response = ExploreResponse {
        query,
        page: page.page,
        total_pages: page
            .total_pages
            .min(state.config().listing.max_display_pages),
        total_results: page.total_results,
        results: page.results,
    };

    Ok(negotiate(
        &headers,
        || Json(response.clone()),
        || ItemGridTemplate {
            items: cards(&response.results),
        },
    ))
}

/// GET /api/:kind/genres
pub async fn genres(
    State(state): State<AppState>,
    Path(kind): Path<KindSegment>,
) -> Result<Json<Vec<Genre>>> {
    let genres = state.catalog().genres(kind.into()).await?;
    Ok(Json(genres))
}

/// GET /api/:kind/trending
pub async fn trending(
    State(state): State<AppState>,
    Path(kind): Path<KindSegment>,
) -> Result<Json<Vec<ItemSummary>>> {
    let items = state.catalog().trending(kind.into()).await?;
    Ok(Json(items))
}

/// GET /api/:kind/:id
pub async fn detail(
    State(state): State<AppState>,
    Path((kind, id)): Path<(KindSegment, String)>,
) -> Result<Json<ItemDetail>> {
    let id = id
        .parse::<u64>()
        .map_err(|_| AppError::NotFound(format!("No item with id {}", id)))?;
    let item = state.catalog().detail(kind.into(), id).await?;
    Ok(Json(item))
}
