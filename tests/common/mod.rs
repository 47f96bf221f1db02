//! In-memory listing fixtures shared by the integration tests.

#![allow(dead_code)]

use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, TimeZone, Utc};
use uuid::Uuid;

use jobboard_backend::listing::{Cursor, FilterSet, ListingError, ListingSource, Paginator};
use jobboard_backend::models::companies::{
    CompanyCounts, CompanyFilter, CompanySort, CompanySummary,
};
use jobboard_backend::models::jobs::{CompanyBrief, JobSummary};

/// A job row as storage would hold it.
#[derive(Debug, Clone)]
pub struct StoredJob {
    pub summary: JobSummary,
    pub expired: bool,
    pub draft: bool,
}

impl StoredJob {
    pub fn id(&self) -> Uuid {
        self.summary.id
    }
}

pub fn at(minute: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 3, 1, 12, minute, 0).unwrap()
}

pub fn job(title: &str, job_type: &str, location: &str, created_at: DateTime<Utc>) -> StoredJob {
    StoredJob {
        summary: JobSummary {
            id: Uuid::new_v4(),
            title: title.to_string(),
            slug: title.to_lowercase().replace(' ', "-"),
            category: "engineering".to_string(),
            job_type: job_type.to_string(),
            location: location.to_string(),
            city: None,
            apply_link: "https://acme.test/apply".to_string(),
            featured: false,
            company: Some(CompanyBrief {
                name: "Acme".to_string(),
                logo: None,
            }),
            created_at,
        },
        expired: false,
        draft: false,
    }
}

/// Vec-backed job storage applying the same predicate and ordering as the
/// database source. Can be switched offline to simulate an outage.
#[derive(Default)]
pub struct MemoryJobSource {
    jobs: Mutex<Vec<StoredJob>>,
    offline: Mutex<bool>,
}

impl MemoryJobSource {
    pub fn new(jobs: Vec<StoredJob>) -> Self {
        Self {
            jobs: Mutex::new(jobs),
            offline: Mutex::new(false),
        }
    }

    pub fn set_offline(&self, offline: bool) {
        *self.offline.lock().unwrap() = offline;
    }

    /// Every eligible job matching `filter`, in listing order.
    pub fn expected(&self, filter: &FilterSet) -> Vec<JobSummary> {
        let mut matching: Vec<JobSummary> = self
            .jobs
            .lock()
            .unwrap()
            .iter()
            .filter(|job| matches(job, filter))
            .map(|job| job.summary.clone())
            .collect();
        matching.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        matching
    }
}

fn matches(job: &StoredJob, filter: &FilterSet) -> bool {
    let s = &job.summary;
    !job.expired
        && !job.draft
        && filter.title().is_none_or(|t| s.title.contains(t))
        && (filter.location().is_empty() || filter.location().contains(&s.location))
        && (filter.category().is_empty() || filter.category().contains(&s.category))
        && (filter.job_type().is_empty() || filter.job_type().contains(&s.job_type))
}

#[async_trait]
impl ListingSource for MemoryJobSource {
    type Filter = FilterSet;
    type Item = JobSummary;

    async fn find(
        &self,
        filter: &FilterSet,
        limit: u64,
        after: Option<Cursor>,
    ) -> Result<Vec<JobSummary>, ListingError> {
        if *self.offline.lock().unwrap() {
            return Err(ListingError::DataUnavailable("storage offline".into()));
        }

        let anchor = match after {
            Some(cursor) => {
                let jobs = self.jobs.lock().unwrap();
                let job = jobs
                    .iter()
                    .find(|j| j.id() == cursor.id())
                    .ok_or(ListingError::UnknownCursor)?;
                Some((job.summary.created_at, job.id()))
            }
            None => None,
        };

        Ok(self
            .expected(filter)
            .into_iter()
            .filter(|s| match anchor {
                Some(key) => (s.created_at, s.id) < key,
                None => true,
            })
            .take(limit as usize)
            .collect())
    }
}

pub fn paginator(jobs: Vec<StoredJob>, page_size: u64) -> Paginator<MemoryJobSource> {
    Paginator::new(MemoryJobSource::new(jobs), page_size, Duration::from_secs(1))
}

/// Vec-backed company directory ordered like the database source.
#[derive(Default)]
pub struct MemoryCompanySource {
    companies: Vec<CompanySummary>,
}

impl MemoryCompanySource {
    pub fn new(companies: Vec<CompanySummary>) -> Self {
        Self { companies }
    }

    fn key(company: &CompanySummary, sort: CompanySort) -> (u64, DateTime<Utc>, Uuid) {
        (
            company.count.ranked_by(sort).unwrap_or(0),
            company.created_at,
            company.id,
        )
    }

    /// Every company matching `filter`, in listing order.
    pub fn expected(&self, filter: &CompanyFilter) -> Vec<CompanySummary> {
        let mut matching: Vec<CompanySummary> = self
            .companies
            .iter()
            .filter(|c| filter.search().is_none_or(|s| c.name.contains(s)))
            .cloned()
            .collect();
        matching.sort_by(|a, b| Self::key(b, filter.sort).cmp(&Self::key(a, filter.sort)));
        matching
    }
}

#[async_trait]
impl ListingSource for MemoryCompanySource {
    type Filter = CompanyFilter;
    type Item = CompanySummary;

    async fn find(
        &self,
        filter: &CompanyFilter,
        limit: u64,
        after: Option<Cursor>,
    ) -> Result<Vec<CompanySummary>, ListingError> {
        let anchor = match after {
            Some(cursor) => {
                let company = self
                    .companies
                    .iter()
                    .find(|c| c.id == cursor.id())
                    .ok_or(ListingError::UnknownCursor)?;
                Some(Self::key(company, filter.sort))
            }
            None => None,
        };

        Ok(self
            .expected(filter)
            .into_iter()
            .filter(|c| anchor.is_none_or(|key| Self::key(c, filter.sort) < key))
            .take(limit as usize)
            .collect())
    }
}

pub fn company(name: &str, jobs: u64, reviews: u64, created_at: DateTime<Utc>) -> CompanySummary {
    CompanySummary {
        id: Uuid::new_v4(),
        name: name.to_string(),
        slug: name.to_lowercase(),
        logo: None,
        count: CompanyCounts { jobs, reviews },
        created_at,
    }
}

pub fn company_paginator(
    companies: Vec<CompanySummary>,
    page_size: u64,
) -> Paginator<MemoryCompanySource> {
    Paginator::new(
        MemoryCompanySource::new(companies),
        page_size,
        Duration::from_secs(1),
    )
}
