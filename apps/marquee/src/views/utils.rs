//! Shared view models and formatting helpers

use chrono::NaiveDate;

use crate::services::{ItemSummary, MediaKind};

/// A poster card in a grid or carousel.
#[derive(Debug, Clone)]
pub struct ItemCard {
    pub href: String,
    pub title: String,
    /// Empty when the release date is unknown
    pub year: String,
    pub poster_url: Option<String>,
    pub score: u32,
}

impl From<&ItemSummary> for ItemCard {
    fn from(item: &ItemSummary) -> Self {
        Self {
            href: item.kind.detail_path(item.id),
            title: item.title.clone(),
            year: release_year(item.release_date.as_deref()).unwrap_or_default(),
            poster_url: item.poster_url.clone(),
            score: score_percent(item.vote_average),
        }
    }
}

pub fn cards(items: &[ItemSummary]) -> Vec<ItemCard> {
    items.iter().map(ItemCard::from).collect()
}

/// Header navigation tab for a kind's pages (`movies`, `tv`).
pub fn active_page(kind: MediaKind) -> String {
    kind.listing_path().trim_start_matches('/').to_string()
}

/// Year part of a `YYYY-MM-DD` date.
pub fn release_year(date: Option<&str>) -> Option<String> {
    let date = date?;
    match NaiveDate::parse_from_str(date, "%Y-%m-%d") {
        Ok(parsed) => Some(parsed.format("%Y").to_string()),
        Err(_) if date.len() >= 4 && date.is_char_boundary(4) => Some(date[..4].to_string()),
        Err(_) => None,
    }
}

/// `YYYY-MM-DD` as `dd/mm/yyyy`.
pub fn format_date(date: Option<&str>) -> Option<String> {
    NaiveDate::parse_from_str(date?, "%Y-%m-%d")
        .ok()
        .map(|parsed| parsed.format("%d/%m/%Y").to_string())
}

/// Runtime in minutes as `2h 19m`.
pub fn format_runtime(minutes: u32) -> String {
    let hours = minutes / 60;
    let mins = minutes % 60;
    match (hours, mins) {
        (0, m) => format!("{}m", m),
        (h, 0) => format!("{}h", h),
        (h, m) => format!("{}h {}m", h, m),
    }
}

/// Vote average (0-10) as a 0-100 user score.
pub fn score_percent(vote_average: f64) -> u32 {
    if !vote_average.is_finite() {
        return 0;
    }
    (vote_average * 10.0).round().clamp(0.0, 100.0) as u32
}

/// CSS modifier for the score ring colour.
pub fn score_class(score: u32) -> &'static str {
    match score {
        70..=100 => "score-high",
        40..=69 => "score-mid",
        _ => "score-low",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_release_year() {
        assert_eq!(release_year(Some("1999-10-15")).as_deref(), Some("1999"));
        assert_eq!(release_year(Some("2024")).as_deref(), Some("2024"));
        assert_eq!(release_year(Some("")), None);
        assert_eq!(release_year(None), None);
    }

    #[test]
    fn test_format_date() {
        assert_eq!(format_date(Some("1999-10-15")).as_deref(), Some("15/10/1999"));
        assert_eq!(format_date(Some("soon")), None);
    }

    #[test]
    fn test_format_runtime() {
        assert_eq!(format_runtime(139), "2h 19m");
        assert_eq!(format_runtime(45), "45m");
        assert_eq!(format_runtime(120), "2h");
    }

    #[test]
    fn test_score_percent() {
        assert_eq!(score_percent(8.43), 84);
        assert_eq!(score_percent(0.0), 0);
        assert_eq!(score_percent(10.0), 100);
        assert_eq!(score_percent(f64::NAN), 0);
    }

    #[test]
    fn test_score_class() {
        assert_eq!(score_class(84), "score-high");
        assert_eq!(score_class(55), "score-mid");
        assert_eq!(score_class(12), "score-low");
    }

    #[test]
    fn test_card_links_to_detail_page() {
        let item = ItemSummary {
            id: 1399,
            kind: MediaKind::Tv,
            title: "Game of Thrones".to_string(),
            release_date: Some("2011-04-17".to_string()),
            poster_url: None,
            popularity: 1.0,
            vote_average: 8.4,
            vote_count: 100,
            genre_ids: vec![],
        };
        let card = ItemCard::from(&item);
        assert_eq!(card.href, "/tv/1399");
        assert_eq!(card.year, "2011");
        assert_eq!(card.score, 84);
    }
}
