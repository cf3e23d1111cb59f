//! HTML views for HTMX frontend
//!
//! This module contains route handlers that render Askama templates
//! for the HTMX-powered frontend.

pub mod detail;
pub mod home;
pub mod listing;
pub mod search;
pub mod utils;

use askama::Template;
use axum::{
    http::{StatusCode, Uri},
    response::{IntoResponse, Response},
    routing::get,
    Router,
};

use crate::AppState;

#[derive(Template)]
#[template(path = "pages/404.html")]
pub struct NotFoundTemplate {
    pub path: String,
    pub active_page: String,
}

/// 404 handler
pub async fn not_found(uri: Uri) -> impl IntoResponse {
    not_found_page(uri.path())
}

/// The 404 page for `path`.
pub fn not_found_page(path: &str) -> Response {
    (
        StatusCode::NOT_FOUND,
        NotFoundTemplate {
            path: path.to_string(),
            active_page: String::new(),
        },
    )
        .into_response()
}

/// Build the HTML routes for the frontend
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(home::page))
        .route("/movies", get(listing::movies).post(listing::filter_movies))
        .route("/movies/:id", get(detail::movie))
        .route("/tv", get(listing::tv).post(listing::filter_tv))
        .route("/tv/:id", get(detail::tv))
        .route("/search", get(search::page))
}
