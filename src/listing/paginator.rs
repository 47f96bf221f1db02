use std::time::Duration;

use async_trait::async_trait;
use tracing::{debug, warn};

use crate::error::ListingError;
use crate::listing::page::{Cursor, ListingItem, Page};

/// Largest page a single request may ask for.
pub const MAX_PAGE_SIZE: u64 = 100;

/// Storage capability behind a listing.
///
/// Implementations return at most `limit` eligible items matching `filter`,
/// ordered by `created_at` descending then `id` descending (behind a ranking
/// count when the filter asks for one), strictly after the item named by
/// `after` in that order.
#[async_trait]
pub trait ListingSource: Send + Sync {
    type Filter: Send + Sync;
    type Item: ListingItem + Send;

    async fn find(
        &self,
        filter: &Self::Filter,
        limit: u64,
        after: Option<Cursor>,
    ) -> Result<Vec<Self::Item>, ListingError>;
}

/// Stateless cursor paginator over a [`ListingSource`].
pub struct Paginator<S> {
    source: S,
    page_size: u64,
    timeout: Duration,
}

impl<S: ListingSource> Paginator<S> {
    pub fn new(source: S, page_size: u64, timeout: Duration) -> Self {
        Self {
            source,
            page_size: page_size.clamp(1, MAX_PAGE_SIZE),
            timeout,
        }
    }

    /// Default page size used when a request does not specify one.
    pub fn page_size(&self) -> u64 {
        self.page_size
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    /// Fetch one page. A cursor is returned only when the page is full.
    pub async fn fetch_page(
        &self,
        filter: &S::Filter,
        cursor: Option<Cursor>,
        page_size: u64,
    ) -> Result<Page<S::Item>, ListingError> {
        if page_size == 0 {
            return Err(ListingError::validation("page size must be at least 1"));
        }
        let page_size = page_size.min(MAX_PAGE_SIZE);

        let mut items = tokio::time::timeout(
            self.timeout,
            self.source.find(filter, page_size, cursor),
        )
        .await
        .map_err(|_| {
            warn!(timeout_ms = self.timeout.as_millis() as u64, "listing fetch timed out");
            ListingError::DataUnavailable(format!(
                "storage did not answer within {}ms",
                self.timeout.as_millis()
            ))
        })??;

        items.truncate(page_size as usize);

        let next = if items.len() as u64 == page_size {
            items.last().map(|item| Cursor::new(item.id()))
        } else {
            None
        };

        debug!(
            count = items.len(),
            after = ?cursor.map(|c| c.to_string()),
            next = ?next.map(|c| c.to_string()),
            "fetched listing page"
        );

        Ok(Page::new(items, next))
    }
}
