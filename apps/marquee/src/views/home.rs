//! Home page view

use askama::Template;
use axum::{extract::State, response::IntoResponse};

use crate::error::Result;
use crate::services::{ItemSummary, MediaKind};
use crate::AppState;

use super::utils::{cards, ItemCard};

#[derive(Template)]
#[template(path = "pages/home.html")]
pub struct HomeTemplate {
    pub active_page: String,
    pub sections: Vec<TrendingSection>,
}

pub struct TrendingSection {
    pub title: &'static str,
    pub more_href: &'static str,
    pub items: Vec<ItemCard>,
    pub unavailable: bool,
}

impl TrendingSection {
    fn new(title: &'static str, kind: MediaKind, result: Result<Vec<ItemSummary>>) -> Self {
        let (items, unavailable) = match result {
            Ok(items) => (cards(&items), false),
            Err(e) => {
                tracing::warn!(kind = ?kind, error = %e, "Failed to load trending items");
                (Vec::new(), true)
            }
        };

        Self {
            title,
            more_href: kind.listing_path(),
            items,
            unavailable,
        }
    }
}

/// Render the home page
pub async fn page(State(state): State<AppState>) -> impl IntoResponse {
    let catalog = state.catalog();
    let (movies, shows) = tokio::join!(
        catalog.trending(MediaKind::Movie),
        catalog.trending(MediaKind::Tv)
    );

    HomeTemplate {
        active_page: "home".to_string(),
        sections: vec![
            TrendingSection::new("Trending movies", MediaKind::Movie, movies),
            TrendingSection::new("Trending TV shows", MediaKind::Tv, shows),
        ],
    }
}
