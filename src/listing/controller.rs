//! Client-side driver for infinite scrolling over a paginated listing.
//!
//! [`InfiniteList`] owns the cursor chain for one search. The consumer signals
//! "more space available" with [`InfiniteList::request_more`], performs the
//! returned [`FetchTicket`] and hands the outcome back to
//! [`InfiniteList::complete`]. Completions are matched against the ticket that
//! issued them, so a page fetched for an abandoned search is dropped instead of
//! being merged into the new one.

use std::collections::HashSet;

use async_trait::async_trait;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::error::ListingError;
use crate::listing::page::{Cursor, ListingItem, Page};
use crate::listing::query::{self, FilterSet};

/// Something able to produce the page after `cursor` for a canonical query.
#[async_trait]
pub trait PageFetcher: Send + Sync {
    type Item: ListingItem + Send;

    async fn fetch(
        &self,
        query: &str,
        cursor: Option<Cursor>,
    ) -> Result<Page<Self::Item>, ListingError>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListState {
    /// No fetch in flight and more pages may follow.
    Idle,
    FetchingFirstPage,
    FetchingNextPage,
    /// The last page carried no cursor.
    Exhausted,
    /// The last fetch failed; accumulated items are kept.
    Failed,
}

/// Identity of one issued fetch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchTicket {
    generation: u64,
    query: String,
    cursor: Option<Cursor>,
}

impl FetchTicket {
    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn cursor(&self) -> Option<Cursor> {
        self.cursor
    }
}

pub struct InfiniteList<T> {
    state: ListState,
    query: String,
    generation: u64,
    items: Vec<T>,
    seen: HashSet<Uuid>,
    pages_loaded: usize,
    next_cursor: Option<Cursor>,
    in_flight: Option<FetchTicket>,
    failed: Option<FetchTicket>,
    last_error: Option<ListingError>,
}

impl<T: ListingItem> InfiniteList<T> {
    pub fn new(filters: &FilterSet) -> Result<Self, ListingError> {
        Ok(Self {
            state: ListState::Idle,
            query: query::encode(filters)?,
            generation: 0,
            items: Vec::new(),
            seen: HashSet::new(),
            pages_loaded: 0,
            next_cursor: None,
            in_flight: None,
            failed: None,
            last_error: None,
        })
    }

    /// Start from a first page produced elsewhere (e.g. rendered by the server).
    pub fn with_first_page(filters: &FilterSet, page: Page<T>) -> Result<Self, ListingError> {
        let mut list = Self::new(filters)?;
        list.apply(page);
        Ok(list)
    }

    pub fn state(&self) -> ListState {
        self.state
    }

    /// Canonical query of the active search.
    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn items(&self) -> &[T] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn pages_loaded(&self) -> usize {
        self.pages_loaded
    }

    pub fn error(&self) -> Option<&ListingError> {
        self.last_error.as_ref()
    }

    pub fn is_fetching(&self) -> bool {
        self.in_flight.is_some()
    }

    /// The search finished and matched nothing, as opposed to having failed.
    pub fn is_empty_result(&self) -> bool {
        self.state == ListState::Exhausted && self.items.is_empty()
    }

    /// Signal that more space is available. Returns the fetch to perform, or
    /// `None` when a fetch is already running, the listing is exhausted or the
    /// last fetch failed (see [`InfiniteList::retry`]).
    pub fn request_more(&mut self) -> Option<FetchTicket> {
        if self.in_flight.is_some() || self.state != ListState::Idle {
            return None;
        }

        if self.pages_loaded == 0 {
            Some(self.issue(None))
        } else {
            let cursor = self.next_cursor?;
            Some(self.issue(Some(cursor)))
        }
    }

    /// Re-issue the fetch that failed.
    pub fn retry(&mut self) -> Option<FetchTicket> {
        if self.state != ListState::Failed || self.in_flight.is_some() {
            return None;
        }
        let failed = self.failed.take()?;
        self.last_error = None;
        Some(self.issue(failed.cursor))
    }

    fn issue(&mut self, cursor: Option<Cursor>) -> FetchTicket {
        let ticket = FetchTicket {
            generation: self.generation,
            query: self.query.clone(),
            cursor,
        };
        self.state = if self.pages_loaded == 0 {
            ListState::FetchingFirstPage
        } else {
            ListState::FetchingNextPage
        };
        self.in_flight = Some(ticket.clone());
        ticket
    }

    /// Fold the outcome of a fetch into the list. Returns `false` when the
    /// ticket is stale (the filters changed meanwhile) and nothing was applied.
    pub fn complete(
        &mut self,
        ticket: FetchTicket,
        result: Result<Page<T>, ListingError>,
    ) -> bool {
        if self.in_flight.as_ref() != Some(&ticket) {
            debug!(query = %ticket.query, "discarding stale listing page");
            return false;
        }
        self.in_flight = None;

        match result {
            Ok(page) => self.apply(page),
            Err(err) => {
                warn!(query = %ticket.query, error = %err, "listing fetch failed");
                self.state = ListState::Failed;
                self.failed = Some(ticket);
                self.last_error = Some(err);
            }
        }
        true
    }

    fn apply(&mut self, page: Page<T>) {
        for item in page.items {
            if self.seen.insert(item.id()) {
                self.items.push(item);
            }
        }
        self.pages_loaded += 1;
        self.next_cursor = page.cursor;
        self.state = if page.cursor.is_some() {
            ListState::Idle
        } else {
            ListState::Exhausted
        };
    }

    /// Switch to another search. A different canonical query discards every
    /// accumulated page and restarts the chain; returns whether it did.
    pub fn set_filters(&mut self, filters: &FilterSet) -> Result<bool, ListingError> {
        let query = query::encode(filters)?;
        if query == self.query {
            return Ok(false);
        }

        self.query = query;
        self.generation += 1;
        self.items.clear();
        self.seen.clear();
        self.pages_loaded = 0;
        self.next_cursor = None;
        self.in_flight = None;
        self.failed = None;
        self.last_error = None;
        self.state = ListState::Idle;
        Ok(true)
    }

    /// Request and await the next page in one step. Returns the resulting state.
    pub async fn load_more<F>(&mut self, fetcher: &F) -> ListState
    where
        F: PageFetcher<Item = T>,
    {
        if let Some(ticket) = self.request_more() {
            let result = fetcher.fetch(ticket.query(), ticket.cursor()).await;
            self.complete(ticket, result);
        }
        self.state
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::listing::query::FilterField;
    use chrono::{DateTime, Utc};

    #[derive(Debug, Clone, PartialEq)]
    struct Item(Uuid);

    impl ListingItem for Item {
        fn id(&self) -> Uuid {
            self.0
        }

        fn created_at(&self) -> DateTime<Utc> {
            Utc::now()
        }
    }

    fn page(ids: &[Uuid], more: bool) -> Page<Item> {
        Page::new(
            ids.iter().copied().map(Item).collect(),
            more.then(|| Cursor::new(*ids.last().unwrap())),
        )
    }

    fn ids(n: usize) -> Vec<Uuid> {
        (0..n).map(|_| Uuid::new_v4()).collect()
    }

    #[test]
    fn starts_idle_and_fetches_first_page() {
        let mut list: InfiniteList<Item> = InfiniteList::new(&FilterSet::new()).unwrap();
        assert_eq!(list.state(), ListState::Idle);

        let ticket = list.request_more().unwrap();
        assert_eq!(ticket.cursor(), None);
        assert_eq!(list.state(), ListState::FetchingFirstPage);
    }

    #[test]
    fn only_one_fetch_in_flight() {
        let ids = ids(2);
        let mut list = InfiniteList::with_first_page(&FilterSet::new(), page(&ids, true)).unwrap();

        let ticket = list.request_more().unwrap();
        assert_eq!(ticket.cursor(), Some(Cursor::new(ids[1])));
        assert_eq!(list.state(), ListState::FetchingNextPage);
        assert!(list.request_more().is_none());
    }

    #[test]
    fn seeded_last_page_is_exhausted() {
        let mut list =
            InfiniteList::with_first_page(&FilterSet::new(), page(&ids(1), false)).unwrap();
        assert_eq!(list.state(), ListState::Exhausted);
        assert!(list.request_more().is_none());
    }

    #[test]
    fn empty_result_is_not_failure() {
        let mut list: InfiniteList<Item> = InfiniteList::new(&FilterSet::new()).unwrap();
        let ticket = list.request_more().unwrap();
        list.complete(ticket, Ok(Page::empty()));

        assert!(list.is_empty_result());
        assert!(list.error().is_none());
    }

    #[test]
    fn failure_keeps_accumulated_items_and_allows_retry() {
        let first = ids(2);
        let second = ids(2);
        let mut list = InfiniteList::with_first_page(&FilterSet::new(), page(&first, true)).unwrap();
        let t = list.request_more().unwrap();
        list.complete(t, Ok(page(&second, true)));
        assert_eq!(list.len(), 4);

        let t = list.request_more().unwrap();
        assert_eq!(list.state(), ListState::FetchingNextPage);
        list.complete(t, Err(ListingError::DataUnavailable("offline".into())));

        assert_eq!(list.state(), ListState::Failed);
        assert_eq!(list.len(), 4);
        assert!(list.request_more().is_none());

        let retry = list.retry().unwrap();
        assert_eq!(retry.cursor(), Some(Cursor::new(second[1])));
        assert!(list.error().is_none());
    }

    #[test]
    fn overlapping_pages_are_deduplicated() {
        let a = ids(3);
        let mut list = InfiniteList::with_first_page(&FilterSet::new(), page(&a, true)).unwrap();
        let t = list.request_more().unwrap();
        let overlap = vec![a[2], Uuid::new_v4()];
        list.complete(t, Ok(page(&overlap, false)));

        assert_eq!(list.len(), 4);
        let unique: HashSet<_> = list.items().iter().map(|i| i.0).collect();
        assert_eq!(unique.len(), 4);
    }

    #[test]
    fn filter_change_resets_and_discards_stale_result() {
        let mut list: InfiniteList<Item> = InfiniteList::new(&FilterSet::new()).unwrap();
        let stale = list.request_more().unwrap();

        let remote = FilterSet::new()
            .with_values(FilterField::Type, ["remote"])
            .unwrap();
        assert!(list.set_filters(&remote).unwrap());
        assert_eq!(list.state(), ListState::Idle);
        assert_eq!(list.query(), "type=remote");

        assert!(!list.complete(stale, Ok(page(&ids(2), true))));
        assert!(list.is_empty());

        let fresh = list.request_more().unwrap();
        assert_eq!(fresh.query(), "type=remote");
        assert!(list.complete(fresh, Ok(page(&ids(1), false))));
        assert_eq!(list.len(), 1);
    }

    #[test]
    fn same_filters_do_not_reset() {
        let filters = FilterSet::new().with_title("rust").unwrap();
        let mut list = InfiniteList::with_first_page(&filters, page(&ids(2), true)).unwrap();
        assert!(!list.set_filters(&filters).unwrap());
        assert_eq!(list.len(), 2);
    }
}
