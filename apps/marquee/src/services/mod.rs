//! Application services for Marquee.

pub mod catalog;
pub mod listing;
pub mod registry;
pub mod tmdb;

pub use catalog::{
    CatalogClient, CatalogPage, ExploreParams, Genre, ItemDetail, ItemSummary, MediaKind,
};
pub use listing::{Completion, ListingPage, ListingState, PageLink, Pagination, RequestSeq};
pub use registry::{PageHandle, PageRegistry};
pub use tmdb::TmdbClient;
