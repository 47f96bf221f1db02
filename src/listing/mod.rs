//! Filtered, cursor-paginated listings of jobs and companies.
//!
//! `query` turns filters into their canonical query string, `paginator` serves
//! pages from a [`ListingSource`], and `controller` accumulates pages on the
//! consuming side.

pub mod controller;
pub mod fetcher;
pub mod page;
pub mod paginator;
pub mod query;

pub use controller::{FetchTicket, InfiniteList, ListState, PageFetcher};
pub use fetcher::HttpPageFetcher;
pub use page::{Cursor, ListingItem, Page};
pub use paginator::{ListingSource, MAX_PAGE_SIZE, Paginator};
pub use query::{FilterField, FilterSet, decode, encode};

pub use crate::error::ListingError;
