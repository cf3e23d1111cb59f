//! Item detail views

use askama::Template;
use axum::{
    extract::{Path, State},
    http::Uri,
    response::{IntoResponse, Response},
};

use crate::error::AppError;
use crate::services::{ItemDetail, MediaKind};
use crate::AppState;

use super::not_found_page;
use super::utils::{active_page, format_date, format_runtime, release_year, score_class, score_percent};

#[derive(Template)]
#[template(path = "pages/detail.html")]
pub struct DetailTemplate {
    pub active_page: String,
    pub item: DetailView,
}

pub struct DetailView {
    pub title: String,
    pub year: String,
    pub date: String,
    pub genres: String,
    pub runtime: String,
    pub score: u32,
    pub score_class: &'static str,
    pub vote_count: u64,
    pub tagline: String,
    pub overview: String,
    pub poster_url: Option<String>,
    pub back_href: &'static str,
    pub back_label: &'static str,
}

impl From<ItemDetail> for DetailView {
    fn from(item: ItemDetail) -> Self {
        let score = score_percent(item.vote_average);
        Self {
            year: release_year(item.release_date.as_deref()).unwrap_or_default(),
            date: format_date(item.release_date.as_deref()).unwrap_or_default(),
            genres: item
                .genres
                .iter()
                .map(|g| g.name.as_str())
                .collect::<Vec<_>>()
                .join(", "),
            runtime: item.runtime.map(format_runtime).unwrap_or_default(),
            score,
            score_class: score_class(score),
            vote_count: item.vote_count,
            tagline: item.tagline.unwrap_or_default(),
            overview: item.overview,
            poster_url: item.poster_url,
            back_href: item.kind.listing_path(),
            back_label: item.kind.label(),
            title: item.title,
        }
    }
}

pub async fn movie(state: State<AppState>, uri: Uri, id: Path<String>) -> Response {
    page(MediaKind::Movie, state, uri, id).await
}

pub async fn tv(state: State<AppState>, uri: Uri, id: Path<String>) -> Response {
    page(MediaKind::Tv, state, uri, id).await
}

async fn page(
    kind: MediaKind,
    State(state): State<AppState>,
    uri: Uri,
    Path(id): Path<String>,
) -> Response {
    let Ok(id) = id.parse::<u64>() else {
        return not_found_page(uri.path());
    };

    match state.catalog().detail(kind, id).await {
        Ok(item) => DetailTemplate {
            active_page: active_page(kind),
            item: item.into(),
        }
        .into_response(),
        Err(AppError::NotFound(_)) => not_found_page(uri.path()),
        Err(e) => {
            tracing::warn!(kind = ?kind, id = %id, error = %e, "Failed to load item details");
            not_found_page(uri.path())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::Genre;

    #[test]
    fn test_detail_view_formatting() {
        let view = DetailView::from(ItemDetail {
            id: 550,
            kind: MediaKind::Movie,
            title: "Fight Club".to_string(),
            release_date: Some("1999-10-15".to_string()),
            poster_url: None,
            popularity: 61.4,
            vote_average: 8.4,
            vote_count: 26280,
            genres: vec![
                Genre { id: 18, name: "Drama".to_string() },
                Genre { id: 53, name: "Thriller".to_string() },
            ],
            runtime: Some(139),
            tagline: Some("Mischief. Mayhem. Soap.".to_string()),
            overview: "An insomniac office worker...".to_string(),
        });

        assert_eq!(view.year, "1999");
        assert_eq!(view.date, "15/10/1999");
        assert_eq!(view.genres, "Drama, Thriller");
        assert_eq!(view.runtime, "2h 19m");
        assert_eq!(view.score, 84);
        assert_eq!(view.score_class, "score-high");
        assert_eq!(view.back_href, "/movies");
    }
}
