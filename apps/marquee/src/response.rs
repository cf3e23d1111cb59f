//! Content negotiation and HTMX request helpers.
//!
//! API endpoints answer JSON by default and an HTML fragment when the caller
//! asks for HTML (browsers and HTMX requests), so the same handler can feed
//! both non-browser clients and the frontend.

use askama::Template;
use axum::{
    http::{header::ACCEPT, HeaderMap, StatusCode},
    response::{Html, IntoResponse, Response},
};
use uuid::Uuid;

/// Set by HTMX on every request it issues.
pub const HX_REQUEST: &str = "hx-request";
/// Set by HTMX when it re-fetches a page to restore history after a cache miss.
pub const HX_HISTORY_RESTORE_REQUEST: &str = "hx-history-restore-request";
/// Address bar URL of the page that issued an HTMX request.
pub const HX_CURRENT_URL: &str = "hx-current-url";
/// Identifies the listing page instance a request belongs to.
pub const PAGE_INSTANCE: &str = "x-page-instance";

/// A response that can be either JSON or HTML based on content negotiation.
pub enum Negotiate<J, H> {
    Json(J),
    Html(H),
}

impl<J, H> IntoResponse for Negotiate<J, H>
where
    J: IntoResponse,
    H: Template,
{
    fn into_response(self) -> Response {
        match self {
            Negotiate::Json(json) => json.into_response(),
            Negotiate::Html(template) => match template.render() {
                Ok(html) => Html(html).into_response(),
                Err(e) => {
                    tracing::error!("Template render error: {}", e);
                    (StatusCode::INTERNAL_SERVER_ERROR, "Template render error").into_response()
                }
            },
        }
    }
}

/// Check if the request prefers HTML based on the Accept header.
///
/// Returns true if:
/// - Accept header contains "text/html"
/// - Request has "HX-Request" header (HTMX request)
pub fn prefers_html(headers: &HeaderMap) -> bool {
    if headers.contains_key(HX_REQUEST) {
        return true;
    }

    headers
        .get(ACCEPT)
        .and_then(|v| v.to_str().ok())
        .map(|accept| accept.contains("text/html"))
        .unwrap_or(false)
}

/// Create a negotiated response based on the Accept header.
///
/// Both closures are used to avoid computing both responses when only one is needed.
pub fn negotiate<J, H, FJ, FH>(headers: &HeaderMap, json_fn: FJ, html_fn: FH) -> Negotiate<J, H>
where
    FJ: FnOnce() -> J,
    FH: FnOnce() -> H,
{
    if prefers_html(headers) {
        Negotiate::Html(html_fn())
    } else {
        Negotiate::Json(json_fn())
    }
}

/// Extension trait for HeaderMap to check content preferences.
pub trait ContentNegotiation {
    fn prefers_html(&self) -> bool;
    fn is_htmx(&self) -> bool;
    /// HTMX request that expects a full page rather than a fragment.
    fn is_history_restore(&self) -> bool;
    /// Listing page instance the request came from, if any.
    fn page_instance(&self) -> Option<Uuid>;
    /// Query string of the issuing page's address bar, without `?`.
    fn current_query(&self) -> Option<String>;
}

impl ContentNegotiation for HeaderMap {
    fn prefers_html(&self) -> bool {
        prefers_html(self)
    }

    fn is_htmx(&self) -> bool {
        self.contains_key(HX_REQUEST)
    }

    fn is_history_restore(&self) -> bool {
        self.contains_key(HX_HISTORY_RESTORE_REQUEST)
    }

    fn page_instance(&self) -> Option<Uuid> {
        self.get(PAGE_INSTANCE)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| Uuid::parse_str(v.trim()).ok())
    }

    fn current_query(&self) -> Option<String> {
        let url = self.get(HX_CURRENT_URL)?.to_str().ok()?;
        Some(url.split_once('?').map(|(_, q)| q).unwrap_or("").to_string())
    }
}
