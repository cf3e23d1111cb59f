use serde::Serialize;

use crate::query::{ListingQuery, QueryFields};
use crate::sorting::SortingType;

/// Lowest rating bound a listing can be filtered by.
pub const RATING_MIN: u8 = 0;
/// Highest rating bound a listing can be filtered by.
pub const RATING_MAX: u8 = 10;

/// Inclusive vote-average range, both bounds within `RATING_MIN..=RATING_MAX`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RatingRange {
    lower: u8,
    higher: u8,
}

impl RatingRange {
    /// Bounds are clamped to the valid range and swapped if given backwards.
    pub fn new(lower: u8, higher: u8) -> Self {
        let lower = lower.min(RATING_MAX);
        let higher = higher.min(RATING_MAX);
        if lower <= higher {
            Self { lower, higher }
        } else {
            Self {
                lower: higher,
                higher: lower,
            }
        }
    }

    pub fn lower(&self) -> u8 {
        self.lower
    }

    pub fn higher(&self) -> u8 {
        self.higher
    }

    /// True when the range does not constrain anything.
    pub fn is_full(&self) -> bool {
        self.lower == RATING_MIN && self.higher == RATING_MAX
    }
}

impl Default for RatingRange {
    fn default() -> Self {
        Self {
            lower: RATING_MIN,
            higher: RATING_MAX,
        }
    }
}

/// Selected genre identifiers.
///
/// Identifiers are unique. Selection order is kept so that a serialized
/// query string reads back exactly as written.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct GenreSet(Vec<u32>);

impl GenreSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an identifier, returning false if it was already selected.
    pub fn insert(&mut self, id: u32) -> bool {
        if self.0.contains(&id) {
            return false;
        }
        self.0.push(id);
        true
    }

    pub fn contains(&self, id: u32) -> bool {
        self.0.contains(&id)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = u32> + '_ {
        self.0.iter().copied()
    }

    /// Comma-separated form used in the `genres` query value.
    pub fn to_query_value(&self) -> String {
        self.0
            .iter()
            .map(u32::to_string)
            .collect::<Vec<_>>()
            .join(",")
    }

    /// Parses a comma-separated list. Any malformed entry rejects the whole value.
    pub fn parse(value: &str) -> Option<Self> {
        if value.is_empty() {
            return None;
        }
        value
            .split(',')
            .map(|part| part.trim().parse::<u32>().ok())
            .collect::<Option<GenreSet>>()
    }
}

impl FromIterator<u32> for GenreSet {
    fn from_iter<I: IntoIterator<Item = u32>>(iter: I) -> Self {
        let mut set = GenreSet::new();
        for id in iter {
            set.insert(id);
        }
        set
    }
}

/// User-chosen sort/rating/genre constraints for one listing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FilterSettings {
    pub sorting_type: SortingType,
    pub rating: RatingRange,
    pub genres: GenreSet,
}

impl FilterSettings {
    pub fn new(sorting_type: SortingType, rating: RatingRange, genres: GenreSet) -> Self {
        Self {
            sorting_type,
            rating,
            genres,
        }
    }

    /// Fills every field the query leaves out with its default.
    pub fn from_query(query: &ListingQuery) -> Self {
        Self {
            sorting_type: query.sorting_type.unwrap_or_default(),
            rating: RatingRange::new(
                query.rating_lower.unwrap_or(RATING_MIN),
                query.rating_higher.unwrap_or(RATING_MAX),
            ),
            genres: query.genres.clone().unwrap_or_default(),
        }
    }

    /// Field writes that put these settings in a query.
    ///
    /// Every filter field is named: rating bounds equal to their default
    /// and an empty genre selection are written as removals.
    pub fn to_fields(&self) -> QueryFields {
        let mut fields = QueryFields::new().sorting_type(self.sorting_type);

        fields = if self.rating.lower() == RATING_MIN {
            fields.clear_rating_lower()
        } else {
            fields.rating_lower(self.rating.lower())
        };

        fields = if self.rating.higher() == RATING_MAX {
            fields.clear_rating_higher()
        } else {
            fields.rating_higher(self.rating.higher())
        };

        fields.genres(self.genres.clone())
    }
}
