//! Typed view of a listing URL's query string.

use serde::Serialize;

use crate::filter::{GenreSet, RATING_MAX};
use crate::sorting::SortingType;

/// Query string keys understood by a listing page.
pub mod keys {
    pub const SORTING_TYPE: &str = "sortingType";
    pub const RATING_LOWER: &str = "ratingLower";
    pub const RATING_HIGHER: &str = "ratingHigher";
    pub const GENRES: &str = "genres";
    pub const PAGE: &str = "page";

    /// Serialization order.
    pub const ALL: [&str; 5] = [SORTING_TYPE, RATING_LOWER, RATING_HIGHER, GENRES, PAGE];
}

/// Filter and pagination fields present in a listing URL.
///
/// `None` means the key is absent and the default applies.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ListingQuery {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sorting_type: Option<SortingType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rating_lower: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rating_higher: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub genres: Option<GenreSet>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page: Option<u32>,
}

impl ListingQuery {
    /// Parses a raw query string (without the leading `?`).
    ///
    /// Unknown keys are ignored and malformed values are treated as absent,
    /// so this never fails. When a key repeats, the last value wins.
    pub fn read(query: &str) -> Self {
        let mut parsed = ListingQuery::default();

        for (key, value) in pairs(query) {
            match key.as_str() {
                keys::SORTING_TYPE => parsed.sorting_type = value.parse().ok(),
                keys::RATING_LOWER => parsed.rating_lower = parse_rating(&value),
                keys::RATING_HIGHER => parsed.rating_higher = parse_rating(&value),
                keys::GENRES => parsed.genres = GenreSet::parse(&value),
                keys::PAGE => parsed.page = value.parse::<u32>().ok().filter(|p| *p > 0),
                _ => continue,
            }

            if !value.is_empty() && parsed.field_is_none(&key) {
                tracing::debug!(key = %key, value = %value, "Ignoring malformed query value");
            }
        }

        parsed
    }

    /// Applies field writes in place.
    pub fn apply(&mut self, fields: &QueryFields) {
        fields.sorting_type.write(&mut self.sorting_type);
        fields.rating_lower.write(&mut self.rating_lower);
        fields.rating_higher.write(&mut self.rating_higher);
        fields.genres.write(&mut self.genres);
        fields.page.write(&mut self.page);
    }

    /// Returns a copy with the field writes applied.
    pub fn with(&self, fields: &QueryFields) -> Self {
        let mut next = self.clone();
        next.apply(fields);
        next
    }

    /// Current page, 1 when absent.
    pub fn page_or_default(&self) -> u32 {
        self.page.unwrap_or(1)
    }

    /// Canonical query string, keys in a fixed order, absent fields left out.
    pub fn to_query_string(&self) -> String {
        let mut parts = Vec::with_capacity(keys::ALL.len());

        if let Some(sorting) = self.sorting_type {
            parts.push(format!("{}={}", keys::SORTING_TYPE, sorting.as_str()));
        }
        if let Some(lower) = self.rating_lower {
            parts.push(format!("{}={}", keys::RATING_LOWER, lower));
        }
        if let Some(higher) = self.rating_higher {
            parts.push(format!("{}={}", keys::RATING_HIGHER, higher));
        }
        if let Some(genres) = self.genres.as_ref().filter(|g| !g.is_empty()) {
            parts.push(format!("{}={}", keys::GENRES, genres.to_query_value()));
        }
        if let Some(page) = self.page {
            parts.push(format!("{}={}", keys::PAGE, page));
        }

        parts.join("&")
    }

    /// Full link to `path` carrying this query.
    pub fn href(&self, path: &str) -> String {
        let query = self.to_query_string();
        if query.is_empty() {
            path.to_string()
        } else {
            format!("{}?{}", path, query)
        }
    }

    fn field_is_none(&self, key: &str) -> bool {
        match key {
            keys::SORTING_TYPE => self.sorting_type.is_none(),
            keys::RATING_LOWER => self.rating_lower.is_none(),
            keys::RATING_HIGHER => self.rating_higher.is_none(),
            keys::GENRES => self.genres.is_none(),
            keys::PAGE => self.page.is_none(),
            _ => false,
        }
    }
}

/// Recognized keys present in `query` with an empty value.
///
/// Server-rendered entry points treat any of these as a request for
/// something that does not exist.
pub fn empty_values(query: &str) -> Vec<&'static str> {
    let mut empty = Vec::new();
    for (key, value) in pairs(query) {
        if !value.is_empty() {
            continue;
        }
        if let Some(known) = keys::ALL.into_iter().find(|k| *k == key) {
            if !empty.contains(&known) {
                empty.push(known);
            }
        }
    }
    empty
}

fn parse_rating(value: &str) -> Option<u8> {
    value.parse::<u8>().ok().filter(|r| *r <= RATING_MAX)
}

/// Splits and percent-decodes `key=value` pairs. `+` decodes to a space.
fn pairs(query: &str) -> impl Iterator<Item = (String, String)> + '_ {
    query
        .trim_start_matches('?')
        .split('&')
        .filter(|pair| !pair.is_empty())
        .map(|pair| {
            let (key, value) = pair.split_once('=').unwrap_or((pair, ""));
            (decode(key), decode(value))
        })
}

fn decode(raw: &str) -> String {
    let spaced = raw.replace('+', " ");
    urlencoding::decode(&spaced)
        .map(|decoded| decoded.into_owned())
        .unwrap_or(spaced)
}

/// Pending write to one query field.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
enum FieldWrite<T> {
    #[default]
    Keep,
    Set(T),
    Remove,
}

impl<T: Clone> FieldWrite<T> {
    fn write(&self, slot: &mut Option<T>) {
        match self {
            FieldWrite::Keep => {}
            FieldWrite::Set(value) => *slot = Some(value.clone()),
            FieldWrite::Remove => *slot = None,
        }
    }
}

/// A set of named field writes for [`ListingQuery::apply`].
///
/// Fields that are not named keep their current value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryFields {
    sorting_type: FieldWrite<SortingType>,
    rating_lower: FieldWrite<u8>,
    rating_higher: FieldWrite<u8>,
    genres: FieldWrite<GenreSet>,
    page: FieldWrite<u32>,
}

impl QueryFields {
    pub fn new() -> Self {
        Self::default()
    }

    /// Names every field, making the result of applying these writes equal
    /// to `query` regardless of the starting point.
    pub fn from_query(query: &ListingQuery) -> Self {
        fn exact<T: Clone>(value: &Option<T>) -> FieldWrite<T> {
            match value {
                Some(v) => FieldWrite::Set(v.clone()),
                None => FieldWrite::Remove,
            }
        }

        Self {
            sorting_type: exact(&query.sorting_type),
            rating_lower: exact(&query.rating_lower),
            rating_higher: exact(&query.rating_higher),
            genres: match &query.genres {
                Some(genres) if !genres.is_empty() => FieldWrite::Set(genres.clone()),
                _ => FieldWrite::Remove,
            },
            page: exact(&query.page),
        }
    }

    pub fn sorting_type(mut self, sorting: SortingType) -> Self {
        self.sorting_type = FieldWrite::Set(sorting);
        self
    }

    pub fn rating_lower(mut self, lower: u8) -> Self {
        self.rating_lower = FieldWrite::Set(lower.min(RATING_MAX));
        self
    }

    pub fn clear_rating_lower(mut self) -> Self {
        self.rating_lower = FieldWrite::Remove;
        self
    }

    pub fn rating_higher(mut self, higher: u8) -> Self {
        self.rating_higher = FieldWrite::Set(higher.min(RATING_MAX));
        self
    }

    pub fn clear_rating_higher(mut self) -> Self {
        self.rating_higher = FieldWrite::Remove;
        self
    }

    /// An empty selection removes the `genres` key.
    pub fn genres(mut self, genres: GenreSet) -> Self {
        self.genres = if genres.is_empty() {
            FieldWrite::Remove
        } else {
            FieldWrite::Set(genres)
        };
        self
    }

    /// Page 0 is not a page; it removes the key instead.
    pub fn page(mut self, page: u32) -> Self {
        self.page = if page == 0 {
            FieldWrite::Remove
        } else {
            FieldWrite::Set(page)
        };
        self
    }

    pub fn is_empty(&self) -> bool {
        *self == QueryFields::default()
    }
}
