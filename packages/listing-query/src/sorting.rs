use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Attribute a listing is ordered by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SortKey {
    Popularity,
    Rating,
    ReleaseDate,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SortDirection {
    Ascending,
    Descending,
}

impl SortDirection {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortDirection::Ascending => "asc",
            SortDirection::Descending => "desc",
        }
    }
}

/// Listing sort order as it appears in the `sortingType` query value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum SortingType {
    #[default]
    #[serde(rename = "popularity.desc")]
    PopularityDesc,
    #[serde(rename = "popularity.asc")]
    PopularityAsc,
    #[serde(rename = "vote_average.desc")]
    RatingDesc,
    #[serde(rename = "vote_average.asc")]
    RatingAsc,
    #[serde(rename = "release_date.desc")]
    ReleaseDateDesc,
    #[serde(rename = "release_date.asc")]
    ReleaseDateAsc,
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown sorting type: {0}")]
pub struct UnknownSortingType(pub String);

impl SortingType {
    /// Every sort order, in the order the filter form lists them.
    pub const ALL: [SortingType; 6] = [
        SortingType::PopularityDesc,
        SortingType::PopularityAsc,
        SortingType::RatingDesc,
        SortingType::RatingAsc,
        SortingType::ReleaseDateDesc,
        SortingType::ReleaseDateAsc,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SortingType::PopularityDesc => "popularity.desc",
            SortingType::PopularityAsc => "popularity.asc",
            SortingType::RatingDesc => "vote_average.desc",
            SortingType::RatingAsc => "vote_average.asc",
            SortingType::ReleaseDateDesc => "release_date.desc",
            SortingType::ReleaseDateAsc => "release_date.asc",
        }
    }

    /// Human readable label for the filter form.
    pub fn label(&self) -> &'static str {
        match self {
            SortingType::PopularityDesc => "Popularity descending",
            SortingType::PopularityAsc => "Popularity ascending",
            SortingType::RatingDesc => "Rating descending",
            SortingType::RatingAsc => "Rating ascending",
            SortingType::ReleaseDateDesc => "Release date descending",
            SortingType::ReleaseDateAsc => "Release date ascending",
        }
    }

    pub fn key(&self) -> SortKey {
        match self {
            SortingType::PopularityDesc | SortingType::PopularityAsc => SortKey::Popularity,
            SortingType::RatingDesc | SortingType::RatingAsc => SortKey::Rating,
            SortingType::ReleaseDateDesc | SortingType::ReleaseDateAsc => SortKey::ReleaseDate,
        }
    }

    pub fn direction(&self) -> SortDirection {
        match self {
            SortingType::PopularityDesc | SortingType::RatingDesc | SortingType::ReleaseDateDesc => {
                SortDirection::Descending
            }
            SortingType::PopularityAsc | SortingType::RatingAsc | SortingType::ReleaseDateAsc => {
                SortDirection::Ascending
            }
        }
    }
}

impl FromStr for SortingType {
    type Err = UnknownSortingType;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SortingType::ALL
            .into_iter()
            .find(|sorting| sorting.as_str() == s)
            .ok_or_else(|| UnknownSortingType(s.to_string()))
    }
}

impl fmt::Display for SortingType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
