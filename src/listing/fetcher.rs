use std::marker::PhantomData;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::error::ListingError;
use crate::listing::controller::PageFetcher;
use crate::listing::page::{Cursor, ListingItem, Page};
use crate::listing::paginator::{ListingSource, Paginator};
use crate::listing::query::{self, FilterSet};

/// Fetches pages from a listing endpoint such as `/api/jobs`.
pub struct HttpPageFetcher<T> {
    client: reqwest::Client,
    endpoint: String,
    _item: PhantomData<fn() -> T>,
}

impl<T> HttpPageFetcher<T> {
    pub fn new(endpoint: impl Into<String>, timeout: Duration) -> Result<Self, ListingError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ListingError::DataUnavailable(format!("HTTP client: {e}")))?;

        Ok(Self::with_client(client, endpoint))
    }

    pub fn with_client(client: reqwest::Client, endpoint: impl Into<String>) -> Self {
        Self {
            client,
            endpoint: endpoint.into(),
            _item: PhantomData,
        }
    }

    /// Full request URL for a canonical query and an optional cursor.
    pub fn url(&self, query: &str, cursor: Option<Cursor>) -> String {
        let mut params = Vec::with_capacity(2);
        if let Some(cursor) = cursor {
            params.push(format!("cursor={cursor}"));
        }
        if !query.is_empty() {
            params.push(query.to_string());
        }

        if params.is_empty() {
            self.endpoint.clone()
        } else {
            format!("{}?{}", self.endpoint, params.join("&"))
        }
    }
}

#[async_trait]
impl<T> PageFetcher for HttpPageFetcher<T>
where
    T: ListingItem + DeserializeOwned + Send,
{
    type Item = T;

    async fn fetch(&self, query: &str, cursor: Option<Cursor>) -> Result<Page<T>, ListingError> {
        let url = self.url(query, cursor);
        debug!("Fetching listing page from {url}");

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| ListingError::DataUnavailable(format!("request failed: {e}")))?;

        let status = response.status();
        if status == StatusCode::BAD_REQUEST {
            let body = response.text().await.unwrap_or_default();
            return Err(ListingError::Validation(body));
        }
        if !status.is_success() {
            return Err(ListingError::DataUnavailable(format!("HTTP {status}")));
        }

        response
            .json::<Page<T>>()
            .await
            .map_err(|e| ListingError::DataUnavailable(format!("invalid page body: {e}")))
    }
}

/// Lets a controller page directly through a local [`Paginator`], e.g. when the
/// first pages are produced in-process.
#[async_trait]
impl<S> PageFetcher for Paginator<S>
where
    S: ListingSource<Filter = FilterSet>,
{
    type Item = S::Item;

    async fn fetch(
        &self,
        query: &str,
        cursor: Option<Cursor>,
    ) -> Result<Page<S::Item>, ListingError> {
        let filters = query::decode(query)?;
        self.fetch_page(&filters, cursor, self.page_size()).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::jobs::JobSummary;
    use uuid::Uuid;

    fn fetcher() -> HttpPageFetcher<JobSummary> {
        HttpPageFetcher::with_client(reqwest::Client::new(), "http://localhost:8080/api/jobs")
    }

    #[test]
    fn builds_first_page_url_without_cursor() {
        assert_eq!(
            fetcher().url("type=remote", None),
            "http://localhost:8080/api/jobs?type=remote"
        );
        assert_eq!(fetcher().url("", None), "http://localhost:8080/api/jobs");
    }

    #[test]
    fn puts_cursor_before_filters() {
        let id = Uuid::new_v4();
        assert_eq!(
            fetcher().url("location=Remote,NYC", Some(Cursor::new(id))),
            format!("http://localhost:8080/api/jobs?cursor={id}&location=Remote,NYC")
        );
    }
}
