//! Search view

use askama::Template;
use axum::{
    extract::{Query, State},
    http::HeaderMap,
    response::{IntoResponse, Response},
};
use serde::Deserialize;

use crate::response::ContentNegotiation;
use crate::services::{MediaKind, Pagination};
use crate::AppState;

use super::utils::{cards, ItemCard};

#[derive(Template)]
#[template(path = "pages/search.html")]
pub struct SearchTemplate {
    pub active_page: String,
    pub results: SearchResults,
}

#[derive(Template)]
#[template(path = "partials/search_results.html")]
pub struct SearchResultsTemplate {
    pub results: SearchResults,
}

pub struct KindOption {
    pub value: &'static str,
    pub label: &'static str,
    pub selected: bool,
}

pub struct SearchResults {
    pub query: String,
    pub kinds: Vec<KindOption>,
    /// False until a non-empty query is submitted
    pub searched: bool,
    pub failed: bool,
    pub items: Vec<ItemCard>,
    pub total_results: u64,
    pub pagination: Option<Pagination>,
}

#[derive(Debug, Deserialize)]
pub struct SearchParams {
    pub query: Option<String>,
    pub kind: Option<String>,
    pub page: Option<String>,
}

impl SearchParams {
    /// Unknown kinds search movies.
    pub fn kind(&self) -> MediaKind {
        match self.kind.as_deref() {
            Some("tv") => MediaKind::Tv,
            _ => MediaKind::Movie,
        }
    }

    pub fn page(&self) -> u32 {
        self.page
            .as_deref()
            .and_then(|p| p.parse::<u32>().ok())
            .filter(|p| *p > 0)
            .unwrap_or(1)
    }

    pub fn query(&self) -> &str {
        self.query.as_deref().map(str::trim).unwrap_or("")
    }
}

/// Link to one page of a search.
pub fn search_href(query: &str, kind: MediaKind, page: u32) -> String {
    format!(
        "/search?query={}&kind={}&page={}",
        urlencoding::encode(query),
        kind.api_segment(),
        page
    )
}

/// Search page; HTMX requests get the results fragment only.
pub async fn page(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(params): Query<SearchParams>,
) -> Response {
    let kind = params.kind();
    let query = params.query().to_string();

    let mut results = SearchResults {
        kinds: [MediaKind::Movie, MediaKind::Tv]
            .into_iter()
            .map(|k| KindOption {
                value: k.api_segment(),
                label: k.label(),
                selected: k == kind,
            })
            .collect(),
        searched: !query.is_empty(),
        failed: false,
        items: Vec::new(),
        total_results: 0,
        pagination: None,
        query,
    };

    if results.searched {
        match state.catalog().search(kind, &results.query, params.page()).await {
            Ok(found) => {
                let total = found
                    .total_pages
                    .min(state.config().listing.max_display_pages);
                results.items = cards(&found.results);
                results.total_results = found.total_results;
                if !results.items.is_empty() {
                    results.pagination = Pagination::build(found.page, total, |n| {
                        search_href(&results.query, kind, n)
                    });
                }
            }
            Err(e) => {
                tracing::warn!(kind = ?kind, query = %results.query, error = %e, "Search failed");
                results.failed = true;
            }
        }
    }

    if headers.is_htmx() && !headers.is_history_restore() {
        SearchResultsTemplate { results }.into_response()
    } else {
        SearchTemplate {
            active_page: "search".to_string(),
            results,
        }
        .into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_search_href_encodes_query() {
        assert_eq!(
            search_href("star wars & more", MediaKind::Tv, 2),
            "/search?query=star%20wars%20%26%20more&kind=tv&page=2"
        );
    }

    #[test]
    fn test_params_defaults() {
        let params = SearchParams {
            query: Some("  alien ".to_string()),
            kind: Some("podcast".to_string()),
            page: Some("0".to_string()),
        };
        assert_eq!(params.query(), "alien");
        assert_eq!(params.kind(), MediaKind::Movie);
        assert_eq!(params.page(), 1);
    }
}
