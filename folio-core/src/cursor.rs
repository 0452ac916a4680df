//! Paging cursors and the entry listing state they drive.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

/// Paging action a backend offers for the current page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CursorAction {
    /// Load the next page after the current entries.
    AppendNext,
    /// Previous page.
    Prev,
    /// Next page.
    Next,
    /// First page.
    First,
    /// Last page.
    Last,
}

/// Opaque paging state returned by a backend with each page.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Cursor {
    /// Actions available from this page.
    #[serde(default)]
    pub actions: BTreeSet<CursorAction>,
    /// Backend data needed to perform the actions.
    #[serde(default)]
    pub data: Value,
    /// Backend metadata such as page counts.
    #[serde(default)]
    pub meta: Value,
}

impl Cursor {
    /// A cursor offering `actions`.
    #[must_use]
    pub fn new(actions: impl IntoIterator<Item = CursorAction>) -> Self {
        Self {
            actions: actions.into_iter().collect(),
            ..Self::default()
        }
    }

    /// Attach backend data.
    #[must_use]
    pub fn with_data(mut self, data: Value) -> Self {
        self.data = data;
        self
    }

    /// Attach backend metadata.
    #[must_use]
    pub fn with_meta(mut self, meta: Value) -> Self {
        self.meta = meta;
        self
    }

    /// Whether `action` is available.
    #[must_use]
    pub fn has(&self, action: CursorAction) -> bool {
        self.actions.contains(&action)
    }
}

/// What a collection listing shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "view", rename_all = "snake_case")]
pub enum ListingView {
    /// First page is being fetched.
    Loading,
    /// Entries are listed.
    Entries {
        /// A further page is being fetched.
        loading_more: bool,
    },
    /// Nothing to list.
    Empty,
}

/// Listing of a collection's entries, fetched page by page.
#[derive(Debug, Clone, Default)]
pub struct EntryListing {
    entries: Vec<Value>,
    cursor: Cursor,
    page: Option<u32>,
    fetching: bool,
}

impl EntryListing {
    /// An empty listing with nothing fetched.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Start fetching the first page, dropping everything listed.
    pub fn begin_first_page(&mut self) {
        self.entries.clear();
        self.cursor = Cursor::default();
        self.page = None;
        self.fetching = true;
    }

    /// Start performing a cursor action.
    ///
    /// Returns `false`, changing nothing, if the current cursor does not
    /// offer the action or a fetch is already running.
    pub fn request(&mut self, action: CursorAction) -> bool {
        if self.fetching || !self.cursor.has(action) {
            return false;
        }
        if action != CursorAction::AppendNext {
            self.entries.clear();
        }
        self.fetching = true;
        true
    }

    /// Store a fetched page and its cursor.
    ///
    /// The cursor is replaced wholesale. Pages fetched for
    /// [`CursorAction::AppendNext`] extend the list; others replace it.
    pub fn receive_page(&mut self, entries: Vec<Value>, cursor: Cursor) {
        let page = self.page.map_or(0, |p| p + 1);
        debug!(page, count = entries.len(), "Received entry page");
        self.entries.extend(entries);
        self.cursor = cursor;
        self.page = Some(page);
        self.fetching = false;
    }

    /// A fetch failed; keep what is listed.
    pub fn fetch_failed(&mut self) {
        self.fetching = false;
    }

    /// Listed entries.
    #[must_use]
    pub fn entries(&self) -> &[Value] {
        &self.entries
    }

    /// Cursor of the last received page.
    #[must_use]
    pub fn cursor(&self) -> &Cursor {
        &self.cursor
    }

    /// Index of the last received page, if any.
    #[must_use]
    pub fn page(&self) -> Option<u32> {
        self.page
    }

    /// What the listing shows.
    #[must_use]
    pub fn view(&self) -> ListingView {
        if self.fetching && self.page.is_none() {
            return ListingView::Loading;
        }
        if !self.entries.is_empty() || self.cursor.has(CursorAction::AppendNext) {
            ListingView::Entries {
                loading_more: self.fetching && self.page.is_some() && !self.entries.is_empty(),
            }
        } else {
            ListingView::Empty
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_cursor_serializes_snake_case_actions() {
        let cursor = Cursor::new([CursorAction::Next, CursorAction::AppendNext])
            .with_meta(json!({"page": 1}));
        let json = serde_json::to_value(&cursor).expect("serialize");
        assert_eq!(json["actions"], json!(["append_next", "next"]));
        let back: Cursor = serde_json::from_value(json).expect("deserialize");
        assert_eq!(back, cursor);
    }

    #[test]
    fn test_first_page_is_loading() {
        let mut listing = EntryListing::new();
        listing.begin_first_page();
        assert_eq!(listing.view(), ListingView::Loading);
    }

    #[test]
    fn test_empty_page_without_more() {
        let mut listing = EntryListing::new();
        listing.begin_first_page();
        listing.receive_page(Vec::new(), Cursor::default());
        assert_eq!(listing.view(), ListingView::Empty);
    }

    #[test]
    fn test_empty_page_with_append_next_lists() {
        let mut listing = EntryListing::new();
        listing.begin_first_page();
        listing.receive_page(Vec::new(), Cursor::new([CursorAction::AppendNext]));
        assert_eq!(listing.view(), ListingView::Entries { loading_more: false });
    }

    #[test]
    fn test_append_next_extends_and_replaces_cursor() {
        let mut listing = EntryListing::new();
        listing.begin_first_page();
        listing.receive_page(
            vec![json!({"title": "a"})],
            Cursor::new([CursorAction::AppendNext]).with_data(json!({"after": "a"})),
        );

        assert!(listing.request(CursorAction::AppendNext));
        assert_eq!(listing.view(), ListingView::Entries { loading_more: true });
        assert!(!listing.request(CursorAction::AppendNext), "already fetching");

        listing.receive_page(vec![json!({"title": "b"})], Cursor::default());
        assert_eq!(listing.entries().len(), 2);
        assert_eq!(listing.page(), Some(1));
        assert_eq!(listing.cursor(), &Cursor::default());
        assert!(!listing.request(CursorAction::AppendNext));
    }

    #[test]
    fn test_next_replaces_entries() {
        let mut listing = EntryListing::new();
        listing.begin_first_page();
        listing.receive_page(vec![json!(1), json!(2)], Cursor::new([CursorAction::Next]));
        assert!(!listing.request(CursorAction::Prev));
        assert!(listing.request(CursorAction::Next));
        listing.receive_page(vec![json!(3)], Cursor::new([CursorAction::Prev]));
        assert_eq!(listing.entries(), &[json!(3)]);
    }

    #[test]
    fn test_failed_fetch_keeps_entries() {
        let mut listing = EntryListing::new();
        listing.begin_first_page();
        listing.receive_page(vec![json!(1)], Cursor::new([CursorAction::AppendNext]));
        assert!(listing.request(CursorAction::AppendNext));
        listing.fetch_failed();
        assert_eq!(listing.view(), ListingView::Entries { loading_more: false });
        assert_eq!(listing.entries().len(), 1);
    }
}
