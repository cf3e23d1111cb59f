//! Movies and TV listing views.
//!
//! A plain GET renders the whole page from the query string and registers a
//! page instance. HTMX requests from that page (filter submits, page links,
//! retries) carry the instance id and get the refreshed `#listing` fragment
//! back, along with the address bar update for the browser to apply.

use askama::Template;
use axum::{
    extract::{RawQuery, State},
    http::{HeaderMap, StatusCode, Uri},
    response::{IntoResponse, Redirect, Response},
};
use axum_extra::extract::Form;
use listing_query::{
    empty_values, FilterSettings, ListingQuery, QueryFields, RatingRange, SortingType, UpdateMode,
    UrlUpdate, RATING_MAX, RATING_MIN,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::response::ContentNegotiation;
use crate::services::{
    Completion, ExploreParams, ListingPage, ListingState, MediaKind, PageHandle, Pagination,
};
use crate::AppState;

use super::not_found_page;
use super::utils::{active_page, cards, ItemCard};

#[derive(Template)]
#[template(path = "pages/listing.html")]
pub struct ListingPageTemplate {
    pub active_page: String,
    pub listing: ListingView,
}

#[derive(Template)]
#[template(path = "partials/listing.html")]
pub struct ListingFragmentTemplate {
    pub listing: ListingView,
}

pub struct SortOption {
    pub value: &'static str,
    pub label: &'static str,
    pub selected: bool,
}

pub struct GenreOption {
    pub id: u32,
    pub name: String,
    pub checked: bool,
}

/// Everything the listing fragment renders.
pub struct ListingView {
    pub instance_id: String,
    pub title: &'static str,
    /// Current URL, used as the filter form's target
    pub href: String,
    pub items: Vec<ItemCard>,
    pub total_results: u64,
    pub empty: bool,
    pub failed: bool,
    pub retry_href: String,
    pub sort_options: Vec<SortOption>,
    pub rating_lower: u8,
    pub rating_higher: u8,
    pub rating_min: u8,
    pub rating_max: u8,
    pub genres: Vec<GenreOption>,
    /// Selected genre ids with no checkbox to carry them
    pub hidden_genres: Vec<u32>,
    pub pagination: Option<Pagination>,
}

impl ListingView {
    pub fn new(instance_id: Uuid, page: &ListingPage) -> Self {
        let settings = page.filter_settings();
        let failed = page.refresh_failed();

        Self {
            instance_id: instance_id.to_string(),
            title: page.kind().label(),
            href: page.href(),
            items: cards(page.items()),
            total_results: page.total_results(),
            empty: page.state() == ListingState::Empty && !failed,
            failed,
            retry_href: page.retry_href().unwrap_or_default(),
            sort_options: SortingType::ALL
                .into_iter()
                .map(|sorting| SortOption {
                    value: sorting.as_str(),
                    label: sorting.label(),
                    selected: sorting == settings.sorting_type,
                })
                .collect(),
            rating_lower: settings.rating.lower(),
            rating_higher: settings.rating.higher(),
            rating_min: RATING_MIN,
            rating_max: RATING_MAX,
            genres: page
                .genres()
                .iter()
                .map(|genre| GenreOption {
                    id: genre.id,
                    name: genre.name.clone(),
                    checked: settings.genres.contains(genre.id),
                })
                .collect(),
            hidden_genres: settings
                .genres
                .iter()
                .filter(|id| !page.genres().iter().any(|genre| genre.id == *id))
                .collect(),
            pagination: page.pagination(),
        }
    }
}

/// Filter form submission. `genres` repeats once per checked box.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterForm {
    pub sorting_type: Option<String>,
    pub rating_lower: Option<String>,
    pub rating_higher: Option<String>,
    #[serde(default)]
    pub genres: Vec<String>,
}

impl FilterForm {
    /// Unparseable values fall back to their defaults.
    pub fn settings(&self) -> FilterSettings {
        let sorting = self
            .sorting_type
            .as_deref()
            .and_then(|s| s.parse().ok())
            .unwrap_or_default();
        let bound = |value: &Option<String>, default: u8| {
            value
                .as_deref()
                .and_then(|v| v.trim().parse::<u8>().ok())
                .unwrap_or(default)
        };

        FilterSettings::new(
            sorting,
            RatingRange::new(
                bound(&self.rating_lower, RATING_MIN),
                bound(&self.rating_higher, RATING_MAX),
            ),
            self.genres
                .iter()
                .filter_map(|g| g.trim().parse::<u32>().ok())
                .collect(),
        )
    }
}

pub async fn movies(
    state: State<AppState>,
    headers: HeaderMap,
    uri: Uri,
    query: RawQuery,
) -> Response {
    show(MediaKind::Movie, state, headers, uri, query).await
}

pub async fn tv(state: State<AppState>, headers: HeaderMap, uri: Uri, query: RawQuery) -> Response {
    show(MediaKind::Tv, state, headers, uri, query).await
}

pub async fn filter_movies(
    state: State<AppState>,
    headers: HeaderMap,
    query: RawQuery,
    form: Form<FilterForm>,
) -> Response {
    filter(MediaKind::Movie, state, headers, query, form).await
}

pub async fn filter_tv(
    state: State<AppState>,
    headers: HeaderMap,
    query: RawQuery,
    form: Form<FilterForm>,
) -> Response {
    filter(MediaKind::Tv, state, headers, query, form).await
}

/// GET on a listing URL.
///
/// HTMX navigations move to the requested URL with a new history entry;
/// anything else gets a full server render.
async fn show(
    kind: MediaKind,
    State(state): State<AppState>,
    headers: HeaderMap,
    uri: Uri,
    RawQuery(raw): RawQuery,
) -> Response {
    let raw = raw.unwrap_or_default();

    if headers.is_htmx() && !headers.is_history_restore() {
        let requested = ListingQuery::read(&raw);
        return refresh(
            kind,
            &state,
            &headers,
            &raw,
            QueryFields::from_query(&requested),
            UpdateMode::Push,
        )
        .await;
    }

    render_page(kind, &state, uri.path(), &raw).await
}

/// POST of the filter form.
///
/// Filters replace the current history entry and return to page 1.
async fn filter(
    kind: MediaKind,
    State(state): State<AppState>,
    headers: HeaderMap,
    RawQuery(raw): RawQuery,
    Form(form): Form<FilterForm>,
) -> Response {
    let raw = raw.unwrap_or_default();
    let fields = form.settings().to_fields().page(1);

    if headers.is_htmx() {
        return refresh(kind, &state, &headers, &raw, fields, UpdateMode::Replace).await;
    }

    let target = ListingQuery::read(&raw).with(&fields);
    Redirect::to(&target.href(kind.listing_path())).into_response()
}

/// Server-side render of a listing URL.
async fn render_page(kind: MediaKind, state: &AppState, path: &str, raw: &str) -> Response {
    let empty = empty_values(raw);
    if !empty.is_empty() {
        tracing::debug!(kind = ?kind, keys = ?empty, "Listing query has empty values");
        return not_found_page(path);
    }

    let query = ListingQuery::read(raw);
    let params = ExploreParams::from_query(&query);
    let catalog = state.catalog();
    let (listing, genres) = tokio::join!(catalog.explore(kind, &params), catalog.genres(kind));

    let (listing, genres) = match (listing, genres) {
        (Ok(listing), Ok(genres)) => (listing, genres),
        (Err(e), _) | (_, Err(e)) => {
            tracing::warn!(kind = ?kind, query = %raw, error = %e, "Failed to render listing");
            return not_found_page(path);
        }
    };

    let page = ListingPage::from_initial(
        kind,
        query,
        genres,
        listing,
        state.config().listing.max_display_pages,
    );
    let (id, handle) = state.pages().insert(page).await;
    tracing::debug!(kind = ?kind, instance = %id, "Registered listing page instance");

    let page = handle.lock().await;
    ListingPageTemplate {
        active_page: active_page(kind),
        listing: ListingView::new(id, &page),
    }
    .into_response()
}

/// Applies `fields` to the requesting page instance, fetches, and returns
/// the fragment for whatever state the page ends up in.
async fn refresh(
    kind: MediaKind,
    state: &AppState,
    headers: &HeaderMap,
    raw: &str,
    fields: QueryFields,
    mode: UpdateMode,
) -> Response {
    let (id, handle, fresh) = match lookup(state, kind, headers).await {
        Some((id, handle)) => (id, handle, false),
        None => {
            let seed = headers.current_query().unwrap_or_else(|| raw.to_string());
            let (id, handle) = fresh_instance(kind, state, &seed).await;
            (id, handle, true)
        }
    };

    let (seq, target) = handle.lock().await.begin_fetch(fields, mode);
    let result = state
        .catalog()
        .explore(kind, &ExploreParams::from_query(&target))
        .await;

    let mut page = handle.lock().await;
    let url_update = match page.complete(seq, result) {
        Completion::Superseded => {
            return (StatusCode::NO_CONTENT, [("HX-Reswap", "none")]).into_response();
        }
        Completion::Applied(update) => Some(update),
        // A new instance has no previous results; leave the page as it is
        // and let the client show the retry.
        Completion::Failed(_) if fresh => {
            let retry = page.retry_href().unwrap_or_else(|| page.href());
            drop(page);
            state.pages().remove(&id).await;

            let trigger = serde_json::json!({ REFRESH_FAILED_EVENT: { "retry": retry } });
            return (
                StatusCode::NO_CONTENT,
                [
                    ("HX-Reswap", "none".to_string()),
                    ("HX-Trigger", trigger.to_string()),
                ],
            )
                .into_response();
        }
        Completion::Failed(_) => None,
    };

    let fragment = ListingFragmentTemplate {
        listing: ListingView::new(id, &page),
    };

    match url_update {
        Some(UrlUpdate::Push(href)) => ([("HX-Push-Url", href)], fragment).into_response(),
        Some(UrlUpdate::Replace(href)) => ([("HX-Replace-Url", href)], fragment).into_response(),
        None => fragment.into_response(),
    }
}

async fn lookup(state: &AppState, kind: MediaKind, headers: &HeaderMap) -> Option<(Uuid, PageHandle)> {
    let id = headers.page_instance()?;
    let handle = state.pages().get(&id).await?;
    let same_kind = handle.lock().await.kind() == kind;
    same_kind.then_some((id, handle))
}

/// Client-side event raised when a refresh fails with no results to re-render.
pub const REFRESH_FAILED_EVENT: &str = "listingRefreshFailed";

/// Starts a page instance for a request whose own instance is gone.
async fn fresh_instance(kind: MediaKind, state: &AppState, seed: &str) -> (Uuid, PageHandle) {
    let mut page = ListingPage::new(
        kind,
        ListingQuery::read(seed),
        state.config().listing.max_display_pages,
    );

    match state.catalog().genres(kind).await {
        Ok(genres) => page.set_genres(genres),
        Err(e) => tracing::warn!(kind = ?kind, error = %e, "Failed to fetch genres for new page instance"),
    }

    let (id, handle) = state.pages().insert(page).await;
    tracing::debug!(kind = ?kind, instance = %id, "Started listing page instance for unknown id");
    (id, handle)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_form_settings() {
        let form = FilterForm {
            sorting_type: Some("vote_average.desc".to_string()),
            rating_lower: Some("5".to_string()),
            rating_higher: Some("9".to_string()),
            genres: vec!["28".to_string(), "12".to_string()],
        };
        let query = ListingQuery::default().with(&form.settings().to_fields().page(1));
        assert_eq!(
            query.to_query_string(),
            "sortingType=vote_average.desc&ratingLower=5&ratingHigher=9&genres=28,12&page=1"
        );
    }

    #[test]
    fn test_form_malformed_values_use_defaults() {
        let form = FilterForm {
            sorting_type: Some("title.asc".to_string()),
            rating_lower: Some("".to_string()),
            rating_higher: Some("eleven".to_string()),
            genres: vec!["x".to_string()],
        };
        assert_eq!(form.settings(), FilterSettings::default());
    }
}
