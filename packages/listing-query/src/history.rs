//! Per-page query store with browser-history semantics.

use crate::query::{ListingQuery, QueryFields};

/// How the address bar must change after a write.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UrlUpdate {
    /// Overwrite the current history entry.
    Replace(String),
    /// Add a new history entry.
    Push(String),
}

impl UrlUpdate {
    pub fn href(&self) -> &str {
        match self {
            UrlUpdate::Replace(href) | UrlUpdate::Push(href) => href,
        }
    }

    pub fn is_push(&self) -> bool {
        matches!(self, UrlUpdate::Push(_))
    }
}

/// Which history operation a pending change will use once it lands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdateMode {
    Replace,
    Push,
}

/// Entries kept per page; older ones are dropped first.
pub const MAX_HISTORY_ENTRIES: usize = 50;

/// The query state owned by a single listing page instance.
///
/// The current entry is what the page should display; `replace` rewrites it
/// in place while `patch` adds an entry after it, dropping any entries that
/// were ahead of the cursor. At most [`MAX_HISTORY_ENTRIES`] are kept.
#[derive(Debug, Clone)]
pub struct QueryHistory {
    path: String,
    entries: Vec<ListingQuery>,
    cursor: usize,
}

impl QueryHistory {
    pub fn new(path: impl Into<String>, initial: ListingQuery) -> Self {
        Self {
            path: path.into(),
            entries: vec![initial],
            cursor: 0,
        }
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    /// The current entry.
    pub fn read(&self) -> &ListingQuery {
        &self.entries[self.cursor]
    }

    /// Link to the current entry.
    pub fn href(&self) -> String {
        self.read().href(&self.path)
    }

    /// What the current entry would become after `fields`, without writing.
    pub fn preview(&self, fields: &QueryFields) -> ListingQuery {
        self.read().with(fields)
    }

    /// Overwrites the named fields of the current entry.
    pub fn replace(&mut self, fields: &QueryFields) -> UrlUpdate {
        self.entries[self.cursor].apply(fields);
        UrlUpdate::Replace(self.href())
    }

    /// Adds an entry equal to the current one with the named fields changed.
    pub fn patch(&mut self, fields: &QueryFields) -> UrlUpdate {
        let next = self.preview(fields);
        self.entries.truncate(self.cursor + 1);
        self.entries.push(next);
        if self.entries.len() > MAX_HISTORY_ENTRIES {
            let excess = self.entries.len() - MAX_HISTORY_ENTRIES;
            self.entries.drain(..excess);
        }
        self.cursor = self.entries.len() - 1;
        UrlUpdate::Push(self.href())
    }

    /// Dispatches to `replace` or `patch`.
    pub fn write(&mut self, fields: &QueryFields, mode: UpdateMode) -> UrlUpdate {
        match mode {
            UpdateMode::Replace => self.replace(fields),
            UpdateMode::Push => self.patch(fields),
        }
    }

    /// Steps to the previous entry, if any.
    pub fn back(&mut self) -> Option<&ListingQuery> {
        if self.cursor == 0 {
            return None;
        }
        self.cursor -= 1;
        Some(self.read())
    }

    /// Steps to the next entry, if any.
    pub fn forward(&mut self) -> Option<&ListingQuery> {
        if self.cursor + 1 >= self.entries.len() {
            return None;
        }
        self.cursor += 1;
        Some(self.read())
    }

    /// Number of entries recorded.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{FilterSettings, RatingRange, SortingType};

    fn filtered() -> QueryHistory {
        QueryHistory::new(
            "/movies",
            ListingQuery::read("sortingType=vote_average.desc&ratingLower=5&genres=28,12&page=1"),
        )
    }

    #[test]
    fn test_patch_pushes_and_preserves_other_fields() {
        let mut history = filtered();
        let update = history.patch(&QueryFields::new().page(3));

        assert!(update.is_push());
        assert_eq!(history.len(), 2);
        assert_eq!(
            update.href(),
            "/movies?sortingType=vote_average.desc&ratingLower=5&genres=28,12&page=3"
        );

        let current = history.read();
        assert_eq!(current.sorting_type, Some(SortingType::RatingDesc));
        assert_eq!(current.rating_lower, Some(5));
        assert_eq!(current.genres, Some([28, 12].into_iter().collect()));
        assert_eq!(current.page, Some(3));
    }

    #[test]
    fn test_replace_keeps_history_length() {
        let mut history = filtered();
        let settings = FilterSettings::new(
            SortingType::PopularityAsc,
            RatingRange::default(),
            Default::default(),
        );
        let update = history.replace(&settings.to_fields().page(1));

        assert!(!update.is_push());
        assert_eq!(history.len(), 1);
        assert_eq!(update.href(), "/movies?sortingType=popularity.asc&page=1");
    }

    #[test]
    fn test_read_after_write_returns_written_fields() {
        let mut history = QueryHistory::new("/tv", ListingQuery::default());
        let fields = QueryFields::new()
            .sorting_type(SortingType::ReleaseDateDesc)
            .rating_lower(2)
            .page(4);

        let update = history.replace(&fields);
        let reread = ListingQuery::read(update.href().split_once('?').unwrap().1);
        assert_eq!(&reread, history.read());

        let update = history.patch(&QueryFields::new().page(5));
        let reread = ListingQuery::read(update.href().split_once('?').unwrap().1);
        assert_eq!(&reread, history.read());
    }

    #[test]
    fn test_back_and_forward() {
        let mut history = filtered();
        history.patch(&QueryFields::new().page(2));
        history.patch(&QueryFields::new().page(3));

        assert_eq!(history.back().and_then(|q| q.page), Some(2));
        assert_eq!(history.back().and_then(|q| q.page), Some(1));
        assert!(history.back().is_none());
        assert_eq!(history.forward().and_then(|q| q.page), Some(2));
    }

    #[test]
    fn test_patch_after_back_drops_forward_entries() {
        let mut history = filtered();
        history.patch(&QueryFields::new().page(2));
        history.patch(&QueryFields::new().page(3));
        history.back();

        history.patch(&QueryFields::new().page(9));
        assert_eq!(history.len(), 3);
        assert!(history.forward().is_none());
        assert_eq!(history.read().page, Some(9));
    }

    #[test]
    fn test_patch_drops_oldest_entries_past_limit() {
        let mut history = filtered();
        for page in 2..=(MAX_HISTORY_ENTRIES as u32 + 10) {
            history.patch(&QueryFields::new().page(page));
        }

        assert_eq!(history.len(), MAX_HISTORY_ENTRIES);
        assert_eq!(history.read().page, Some(MAX_HISTORY_ENTRIES as u32 + 10));

        let mut oldest = None;
        while let Some(entry) = history.back() {
            oldest = entry.page;
        }
        assert_eq!(oldest, Some(11));
        assert_eq!(history.read().sorting_type, Some(SortingType::RatingDesc));
    }

    fn assert_reads_back(
        update: &UrlUpdate,
        history: &QueryHistory,
        settings: &FilterSettings,
        page: u32,
    ) -> ListingQuery {
        let (_, query) = update.href().split_once('?').unwrap();
        let reread = ListingQuery::read(query);

        assert_eq!(&reread, history.read(), "{}", update.href());
        assert_eq!(&FilterSettings::from_query(&reread), settings, "{}", update.href());
        assert_eq!(reread.page, Some(page), "{}", update.href());
        reread
    }

    #[test]
    fn test_round_trip_over_filter_combinations() {
        let genre_choices: [&[u32]; 3] = [&[], &[28], &[28, 12, 16]];
        let ratings = [(0, 0), (0, 5), (0, 10), (5, 5), (5, 10), (10, 10)];

        for sorting in SortingType::ALL {
            for (lower, higher) in ratings {
                for genres in genre_choices {
                    for page in [1, 500] {
                        let settings = FilterSettings::new(
                            sorting,
                            RatingRange::new(lower, higher),
                            genres.iter().copied().collect(),
                        );
                        let fields = settings.to_fields().page(page);

                        let mut history = QueryHistory::new(
                            "/movies",
                            ListingQuery::read("sortingType=popularity.asc&ratingLower=3&genres=99&page=7"),
                        );

                        let update = history.replace(&fields);
                        let reread = assert_reads_back(&update, &history, &settings, page);
                        assert_eq!(reread.rating_lower, (lower != 0).then_some(lower));
                        assert_eq!(reread.rating_higher, (higher != 10).then_some(higher));
                        assert_eq!(reread.genres.is_some(), !genres.is_empty());

                        history.patch(&QueryFields::new().page(page + 1));
                        let update = history.patch(&fields);
                        assert_reads_back(&update, &history, &settings, page);
                    }
                }
            }
        }
    }

    #[test]
    fn test_preview_does_not_write() {
        let history = filtered();
        let preview = history.preview(&QueryFields::new().page(8));
        assert_eq!(preview.page, Some(8));
        assert_eq!(history.read().page, Some(1));
    }
}
