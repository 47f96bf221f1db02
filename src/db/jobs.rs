use sea_orm::*;
use uuid::Uuid;

use crate::db::{contains_literal, keyset_after};
use crate::error::ListingError;
use crate::listing::{Cursor, FilterSet};
use crate::models::companies;
use crate::models::jobs::{self, CreateJob, JobSummary};
use crate::models::saved_jobs;
use crate::slug;

/// Jobs that are neither expired nor drafts.
fn eligible() -> Condition {
    Condition::all()
        .add(jobs::Column::Expired.eq(false))
        .add(jobs::Column::Draft.eq(false))
}

/// Translate the listing filters into a predicate. Absent fields add nothing.
pub fn filter_condition(filter: &FilterSet) -> Condition {
    let mut condition = eligible();

    if let Some(title) = filter.title() {
        condition = condition.add(contains_literal((jobs::Entity, jobs::Column::Title), title));
    }
    if !filter.location().is_empty() {
        condition = condition.add(jobs::Column::Location.is_in(filter.location().to_vec()));
    }
    if !filter.category().is_empty() {
        condition = condition.add(jobs::Column::Category.is_in(filter.category().to_vec()));
    }
    if !filter.job_type().is_empty() {
        condition = condition.add(jobs::Column::JobType.is_in(filter.job_type().to_vec()));
    }

    condition
}

/// One page of eligible jobs matching `filter`, newest first, after `after`.
pub async fn find_job_page(
    db: &DatabaseConnection,
    filter: &FilterSet,
    limit: u64,
    after: Option<Cursor>,
) -> Result<Vec<JobSummary>, ListingError> {
    let anchor = match after {
        Some(cursor) => Some(
            jobs::Entity::find_by_id(cursor.id())
                .one(db)
                .await?
                .ok_or(ListingError::UnknownCursor)?,
        ),
        None => None,
    };

    let rows = job_page_query(filter, anchor.as_ref(), limit).all(db).await?;

    Ok(rows.into_iter().map(JobSummary::from).collect())
}

/// Page query: filters, keyset after `anchor`, newest first.
pub fn job_page_query(
    filter: &FilterSet,
    anchor: Option<&jobs::Model>,
    limit: u64,
) -> SelectTwo<jobs::Entity, companies::Entity> {
    let mut condition = filter_condition(filter);
    if let Some(anchor) = anchor {
        condition = condition.add(keyset_after(
            jobs::Column::CreatedAt,
            jobs::Column::Id,
            anchor.created_at,
            anchor.id,
        ));
    }

    jobs::Entity::find()
        .filter(condition)
        .find_also_related(companies::Entity)
        .order_by_desc(jobs::Column::CreatedAt)
        .order_by_desc(jobs::Column::Id)
        .limit(limit)
}

/// Number of jobs currently open.
pub async fn count_active_jobs(db: &DatabaseConnection) -> Result<u64, DbErr> {
    jobs::Entity::find().filter(eligible()).count(db).await
}

/// Fetch a job and its company by slug.
pub async fn get_job_by_slug(
    db: &DatabaseConnection,
    slug: &str,
) -> Result<Option<(jobs::Model, Option<companies::Model>)>, DbErr> {
    jobs::Entity::find()
        .filter(jobs::Column::Slug.eq(slug))
        .find_also_related(companies::Entity)
        .one(db)
        .await
}

async fn slug_taken(db: &DatabaseConnection, slug: &str) -> Result<bool, DbErr> {
    Ok(jobs::Entity::find()
        .filter(jobs::Column::Slug.eq(slug))
        .count(db)
        .await?
        > 0)
}

/// Insert a new job. The slug is derived from the title and company name
/// before the write.
pub async fn insert_job(
    db: &DatabaseConnection,
    input: CreateJob,
    company: &companies::Model,
    user_id: Uuid,
) -> Result<jobs::Model, DbErr> {
    let id = Uuid::new_v4();
    let mut job_slug = slug::job_slug(&input.title, &company.name);
    if job_slug.is_empty() || slug_taken(db, &job_slug).await? {
        job_slug = slug::disambiguate(&job_slug, id);
    }

    let new_job = jobs::ActiveModel {
        id: Set(id),
        title: Set(input.title),
        description: Set(input.description),
        slug: Set(job_slug),
        category: Set(input.category),
        job_type: Set(input.job_type),
        location: Set(input.location),
        city: Set(input.city),
        apply_link: Set(input.apply_link),
        featured: Set(false),
        expired: Set(false),
        draft: Set(input.draft),
        company_id: Set(company.id),
        user_id: Set(user_id),
        created_at: Set(chrono::Utc::now()),
    };

    new_job.insert(db).await
}

/// Bookmark or un-bookmark a job for a user. Returns `false` if no job has
/// that slug.
pub async fn set_saved(
    db: &DatabaseConnection,
    user_id: Uuid,
    slug: &str,
    save: bool,
) -> Result<bool, DbErr> {
    let Some(job) = jobs::Entity::find()
        .filter(jobs::Column::Slug.eq(slug))
        .one(db)
        .await?
    else {
        return Ok(false);
    };

    if save {
        let existing = saved_jobs::Entity::find_by_id((user_id, job.id)).one(db).await?;
        if existing.is_none() {
            saved_jobs::ActiveModel {
                user_id: Set(user_id),
                job_id: Set(job.id),
                created_at: Set(chrono::Utc::now()),
            }
            .insert(db)
            .await?;
        }
    } else {
        saved_jobs::Entity::delete_by_id((user_id, job.id))
            .exec(db)
            .await?;
    }

    Ok(true)
}

/// Jobs bookmarked by a user, most recently saved first.
pub async fn get_saved_jobs(
    db: &DatabaseConnection,
    user_id: Uuid,
) -> Result<Vec<JobSummary>, DbErr> {
    let rows = jobs::Entity::find()
        .inner_join(saved_jobs::Entity)
        .filter(saved_jobs::Column::UserId.eq(user_id))
        .find_also_related(companies::Entity)
        .order_by_desc(saved_jobs::Column::CreatedAt)
        .all(db)
        .await?;

    Ok(rows.into_iter().map(JobSummary::from).collect())
}
