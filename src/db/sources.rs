//! Storage-backed [`ListingSource`]s for the paginated endpoints.

use async_trait::async_trait;
use sea_orm::DatabaseConnection;

use crate::db::{companies, jobs};
use crate::error::ListingError;
use crate::listing::{Cursor, FilterSet, ListingSource};
use crate::models::companies::{CompanyFilter, CompanySummary};
use crate::models::jobs::JobSummary;

/// Eligible job postings.
#[derive(Clone)]
pub struct JobSource {
    db: DatabaseConnection,
}

impl JobSource {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl ListingSource for JobSource {
    type Filter = FilterSet;
    type Item = JobSummary;

    async fn find(
        &self,
        filter: &FilterSet,
        limit: u64,
        after: Option<Cursor>,
    ) -> Result<Vec<JobSummary>, ListingError> {
        jobs::find_job_page(&self.db, filter, limit, after).await
    }
}

/// Company directory.
#[derive(Clone)]
pub struct CompanySource {
    db: DatabaseConnection,
}

impl CompanySource {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl ListingSource for CompanySource {
    type Filter = CompanyFilter;
    type Item = CompanySummary;

    async fn find(
        &self,
        filter: &CompanyFilter,
        limit: u64,
        after: Option<Cursor>,
    ) -> Result<Vec<CompanySummary>, ListingError> {
        companies::find_company_page(&self.db, filter, limit, after).await
    }
}
