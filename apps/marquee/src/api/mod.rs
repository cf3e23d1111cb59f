//! JSON API endpoint handlers for Marquee.

pub mod catalog;
pub mod search;

use axum::{routing::get, Router};

use crate::AppState;

/// Build the `/api` routes
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/search", get(search::search))
        .route("/:kind/explore", get(catalog::explore))
        .route("/:kind/genres", get(catalog::genres))
        .route("/:kind/trending", get(catalog::trending))
        .route("/:kind/:id", get(catalog::detail))
}
