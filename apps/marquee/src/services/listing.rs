//! Listing page state.
//!
//! A [`ListingPage`] is the server-side model behind one open movies or TV
//! listing in a browser tab. It owns the tab's query history, the items on
//! screen and the fetch lifecycle. Fetches are split in two short steps,
//! [`ListingPage::begin_fetch`] and [`ListingPage::complete`], so callers can
//! release the page lock while the catalog request is in flight.

use listing_query::{FilterSettings, ListingQuery, QueryFields, QueryHistory, UpdateMode, UrlUpdate};

use crate::error::AppError;
use crate::services::catalog::{CatalogPage, Genre, ItemSummary, MediaKind};

/// Where a listing is in its fetch lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListingState {
    /// Last fetch complete, items shown.
    Idle,
    /// A request is in flight; the previous items stay on screen.
    Fetching,
    /// Last fetch returned no items.
    Empty,
}

/// Identifies one fetch issued by a page. Later fetches get larger numbers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct RequestSeq(u64);

/// Result of handing a finished fetch back to its page.
#[derive(Debug)]
pub enum Completion {
    /// The response was the latest and is now on screen.
    Applied(UrlUpdate),
    /// The fetch failed; previous items are retained.
    Failed(AppError),
    /// A newer fetch was issued meanwhile; nothing changed.
    Superseded,
}

#[derive(Debug)]
struct PendingFetch {
    seq: RequestSeq,
    fields: QueryFields,
    mode: UpdateMode,
    target: ListingQuery,
}

/// State of one listing page instance.
#[derive(Debug)]
pub struct ListingPage {
    kind: MediaKind,
    history: QueryHistory,
    genres: Vec<Genre>,
    items: Vec<ItemSummary>,
    page: u32,
    total_pages: u32,
    total_results: u64,
    state: ListingState,
    latest_seq: u64,
    pending: Option<PendingFetch>,
    refresh_failed: bool,
    failed_target: Option<ListingQuery>,
    max_display_pages: u32,
}

impl ListingPage {
    /// A page with nothing fetched yet.
    pub fn new(kind: MediaKind, query: ListingQuery, max_display_pages: u32) -> Self {
        Self {
            kind,
            page: query.page_or_default(),
            history: QueryHistory::new(kind.listing_path(), query),
            genres: Vec::new(),
            items: Vec::new(),
            total_pages: 0,
            total_results: 0,
            state: ListingState::Idle,
            latest_seq: 0,
            pending: None,
            refresh_failed: false,
            failed_target: None,
            max_display_pages,
        }
    }

    /// A page populated by a server-side render.
    pub fn from_initial(
        kind: MediaKind,
        query: ListingQuery,
        genres: Vec<Genre>,
        page: CatalogPage,
        max_display_pages: u32,
    ) -> Self {
        let mut listing = Self::new(kind, query, max_display_pages);
        listing.genres = genres;
        listing.show(page);
        listing
    }

    /// Records a new fetch and returns its sequence number along with the
    /// query the fetch must use.
    ///
    /// The query history is not written until the fetch completes.
    pub fn begin_fetch(&mut self, fields: QueryFields, mode: UpdateMode) -> (RequestSeq, ListingQuery) {
        self.latest_seq += 1;
        let seq = RequestSeq(self.latest_seq);
        let target = self.history.preview(&fields);

        self.pending = Some(PendingFetch {
            seq,
            fields,
            mode,
            target: target.clone(),
        });
        self.state = ListingState::Fetching;

        (seq, target)
    }

    /// Hands back the outcome of the fetch identified by `seq`.
    ///
    /// Only the most recently issued fetch is applied; anything older is
    /// reported as superseded and leaves the page untouched.
    pub fn complete(&mut self, seq: RequestSeq, result: Result<CatalogPage, AppError>) -> Completion {
        let pending = match self.pending.take() {
            Some(pending) if pending.seq == seq => pending,
            other => {
                self.pending = other;
                tracing::debug!(kind = ?self.kind, seq = seq.0, latest = self.latest_seq, "Dropping superseded listing response");
                return Completion::Superseded;
            }
        };

        match result {
            Ok(page) => {
                let update = self.history.write(&pending.fields, pending.mode);
                self.show(page);
                self.refresh_failed = false;
                self.failed_target = None;
                Completion::Applied(update)
            }
            Err(e) => {
                tracing::warn!(
                    kind = ?self.kind,
                    target = %pending.target.href(self.history.path()),
                    error = %e,
                    "Listing refresh failed, keeping previous results"
                );
                self.state = self.settled_state();
                self.refresh_failed = true;
                self.failed_target = Some(pending.target);
                Completion::Failed(e)
            }
        }
    }

    fn show(&mut self, page: CatalogPage) {
        self.items = page.results;
        self.page = page.page.max(1);
        self.total_pages = page.total_pages;
        self.total_results = page.total_results;
        self.state = self.settled_state();
    }

    fn settled_state(&self) -> ListingState {
        if self.items.is_empty() {
            ListingState::Empty
        } else {
            ListingState::Idle
        }
    }

    pub fn kind(&self) -> MediaKind {
        self.kind
    }

    pub fn state(&self) -> ListingState {
        self.state
    }

    pub fn items(&self) -> &[ItemSummary] {
        &self.items
    }

    pub fn genres(&self) -> &[Genre] {
        &self.genres
    }

    pub fn set_genres(&mut self, genres: Vec<Genre>) {
        self.genres = genres;
    }

    /// Query currently reflected in the address bar.
    pub fn query(&self) -> &ListingQuery {
        self.history.read()
    }

    pub fn href(&self) -> String {
        self.history.href()
    }

    /// The filter form's values.
    pub fn filter_settings(&self) -> FilterSettings {
        FilterSettings::from_query(self.history.read())
    }

    pub fn total_results(&self) -> u64 {
        self.total_results
    }

    /// Page count offered to the user.
    pub fn displayed_total_pages(&self) -> u32 {
        self.total_pages.min(self.max_display_pages)
    }

    /// Current page, never past the displayed page count.
    pub fn current_page(&self) -> u32 {
        match self.displayed_total_pages() {
            0 => self.page,
            total => self.page.min(total),
        }
    }

    /// Whether the last refresh failed and a retry should be offered.
    pub fn refresh_failed(&self) -> bool {
        self.refresh_failed
    }

    /// Link that repeats the failed refresh.
    pub fn retry_href(&self) -> Option<String> {
        self.failed_target
            .as_ref()
            .map(|target| target.href(self.history.path()))
    }

    /// Pagination control for the current results, if one should be shown.
    pub fn pagination(&self) -> Option<Pagination> {
        if self.state == ListingState::Empty {
            return None;
        }

        let query = self.history.read();
        let path = self.history.path();
        Pagination::build(self.current_page(), self.displayed_total_pages(), |n| {
            query.with(&QueryFields::new().page(n)).href(path)
        })
    }
}

/// Pages shown on each side of the current one.
const SIBLINGS: u32 = 1;

/// One slot in the pagination control.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageLink {
    /// `None` for an ellipsis
    pub number: Option<u32>,
    pub href: String,
    pub current: bool,
}

impl PageLink {
    fn page(number: u32, href: String, current: bool) -> Self {
        Self {
            number: Some(number),
            href,
            current,
        }
    }

    fn gap() -> Self {
        Self {
            number: None,
            href: String::new(),
            current: false,
        }
    }

    pub fn is_gap(&self) -> bool {
        self.number.is_none()
    }
}

/// Pagination control model.
///
/// Always lists the first and last page and the pages next to the current
/// one. Longer runs of skipped pages collapse into an ellipsis; a run of
/// exactly one page shows that page instead.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pagination {
    pub current: u32,
    pub total: u32,
    pub links: Vec<PageLink>,
    pub prev_href: Option<String>,
    pub next_href: Option<String>,
}

impl Pagination {
    /// Returns `None` when there is at most one page.
    pub fn build(current: u32, total: u32, href: impl Fn(u32) -> String) -> Option<Self> {
        if total <= 1 {
            return None;
        }
        let current = current.clamp(1, total);

        let window_start = current.saturating_sub(SIBLINGS).max(1);
        let window_end = (current + SIBLINGS).min(total);

        let mut numbers = vec![1];
        numbers.extend(window_start..=window_end);
        numbers.push(total);
        numbers.sort_unstable();
        numbers.dedup();

        let mut links = Vec::with_capacity(numbers.len() + 2);
        let mut previous: Option<u32> = None;
        for number in numbers {
            if let Some(prev) = previous {
                match number - prev {
                    1 => {}
                    2 => links.push(PageLink::page(prev + 1, href(prev + 1), false)),
                    _ => links.push(PageLink::gap()),
                }
            }
            links.push(PageLink::page(number, href(number), number == current));
            previous = Some(number);
        }

        Some(Self {
            current,
            total,
            links,
            prev_href: (current > 1).then(|| href(current - 1)),
            next_href: (current < total).then(|| href(current + 1)),
        })
    }
}
