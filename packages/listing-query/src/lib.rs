//! Listing filter and pagination state, and its URL query string form.
//!
//! A listing page keeps its sort order, rating range, genre selection and
//! page number in the address bar so that a refresh or a shared link shows
//! the same results. This crate owns that mapping:
//!
//! - [`ListingQuery::read`] parses a query string into a typed partial
//!   record, ignoring unknown keys and dropping malformed values.
//! - [`QueryHistory::replace`] and [`QueryHistory::patch`] write fields and
//!   report whether the browser should replace or push a history entry.
//! - [`FilterSettings`] is the defaults-applied view the filter form edits.

mod filter;
mod history;
mod query;
mod sorting;

pub use filter::{FilterSettings, GenreSet, RatingRange, RATING_MAX, RATING_MIN};
pub use history::{QueryHistory, UpdateMode, UrlUpdate, MAX_HISTORY_ENTRIES};
pub use query::{empty_values, keys, ListingQuery, QueryFields};
pub use sorting::{SortDirection, SortKey, SortingType, UnknownSortingType};
