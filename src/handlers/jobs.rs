use actix_web::{HttpRequest, HttpResponse, Responder, web};
use sea_orm::DatabaseConnection;
use validator::Validate;

use crate::auth::authorization::verify_company_owner;
use crate::auth::middleware::AuthenticatedUser;
use crate::cache::{self, CacheData, keys};
use crate::db::jobs as job_db;
use crate::error::ListingError;
use crate::handlers::{cache_of, validation_failed};
use crate::listing::{FilterSet, ListingSource, Page, Paginator, query};
use crate::models::PageParams;
use crate::models::jobs::{CreateJob, JobDetail, JobSummary, SaveJob};

/// GET /api/jobs?cursor&limit&title&location&category&type — one page of
/// open jobs matching the filters, newest first.
///
/// Pages are cached under the canonical filter query, so two requests that
/// spell the same filters differently share an entry.
pub async fn list_jobs<S>(
    req: HttpRequest,
    params: web::Query<PageParams>,
    paginator: web::Data<Paginator<S>>,
) -> Result<HttpResponse, ListingError>
where
    S: ListingSource<Filter = FilterSet, Item = JobSummary> + 'static,
{
    let filter = query::decode(req.query_string())?;
    let cursor = params.cursor()?;
    let limit = params.limit(paginator.page_size());
    let cache = cache_of(&req);
    let cache_key = keys::job_list(&query::encode(&filter)?, cursor, limit);

    if let Some(cache) = cache {
        match cache.get::<Page<JobSummary>>(&cache_key).await {
            Ok(Some(page)) => return Ok(HttpResponse::Ok().json(page)),
            Ok(None) => {}
            Err(e) => tracing::warn!("Cache error: {}", e),
        }
    }

    let page = paginator.fetch_page(&filter, cursor, limit).await?;

    if let Some(cache) = cache {
        let ttl = cache.config().job_list_ttl;
        if let Err(e) = cache.set(&cache_key, &page, Some(ttl)).await {
            tracing::warn!("Failed to cache job page: {}", e);
        }
    }

    Ok(HttpResponse::Ok().json(page))
}

/// GET /api/jobs/count — number of open jobs.
pub async fn count_jobs(db: web::Data<DatabaseConnection>) -> impl Responder {
    match job_db::count_active_jobs(db.get_ref()).await {
        Ok(count) => HttpResponse::Ok().json(serde_json::json!({ "total": count })),
        Err(e) => HttpResponse::InternalServerError().json(serde_json::json!({
            "error": format!("Failed to count jobs: {e}"),
        })),
    }
}

/// GET /api/jobs/{slug} — a single job with its company.
pub async fn get_job(
    db: web::Data<DatabaseConnection>,
    path: web::Path<String>,
) -> impl Responder {
    let slug = path.into_inner();
    match job_db::get_job_by_slug(db.get_ref(), &slug).await {
        Ok(Some((job, company))) => HttpResponse::Ok().json(JobDetail { job, company }),
        Ok(None) => HttpResponse::NotFound().json(serde_json::json!({
            "error": format!("Job {slug} not found"),
        })),
        Err(e) => HttpResponse::InternalServerError().json(serde_json::json!({
            "error": format!("Database error: {e}"),
        })),
    }
}

/// POST /api/jobs — post a job for a company the user owns.
pub async fn create_job(
    user: AuthenticatedUser,
    db: web::Data<DatabaseConnection>,
    cache: web::Data<CacheData>,
    body: web::Json<CreateJob>,
) -> impl Responder {
    let input = body.into_inner();
    if let Err(errors) = input.validate() {
        return validation_failed(errors);
    }

    let company = match verify_company_owner(db.get_ref(), input.company_id, user.0.id).await {
        Ok(company) => company,
        Err(response) => return response,
    };

    match job_db::insert_job(db.get_ref(), input, &company, user.0.id).await {
        Ok(job) => {
            tracing::info!(slug = %job.slug, company = %company.slug, "job posted");
            // Any cached listing page may now be stale.
            cache::warn_on_failure(
                "invalidate",
                keys::JOB_LIST_PATTERN,
                cache.delete_pattern(keys::JOB_LIST_PATTERN).await,
            );
            let key = keys::company(&company.slug);
            cache::warn_on_failure("invalidate", &key, cache.delete(&key).await);
            HttpResponse::Created().json(job)
        }
        Err(e) => HttpResponse::InternalServerError().json(serde_json::json!({
            "error": format!("Failed to create job: {e}"),
        })),
    }
}

/// PUT /api/jobs/save — bookmark (`save: true`) or un-bookmark a job.
pub async fn save_job(
    user: AuthenticatedUser,
    db: web::Data<DatabaseConnection>,
    body: web::Json<SaveJob>,
) -> impl Responder {
    let SaveJob { slug, save } = body.into_inner();
    let Some(slug) = slug.filter(|s| !s.is_empty()) else {
        return HttpResponse::BadRequest().json(serde_json::json!({
            "error": "Missing slug",
        }));
    };

    match job_db::set_saved(db.get_ref(), user.0.id, &slug, save).await {
        Ok(true) => HttpResponse::Ok().json(serde_json::json!({
            "slug": slug,
            "saved": save,
        })),
        Ok(false) => HttpResponse::NotFound().json(serde_json::json!({
            "error": format!("Job {slug} not found"),
        })),
        Err(e) => HttpResponse::InternalServerError().json(serde_json::json!({
            "error": format!("Failed to update saved jobs: {e}"),
        })),
    }
}

/// GET /api/jobs/saved — the caller's bookmarked jobs.
pub async fn get_saved_jobs(
    user: AuthenticatedUser,
    db: web::Data<DatabaseConnection>,
) -> impl Responder {
    match job_db::get_saved_jobs(db.get_ref(), user.0.id).await {
        Ok(jobs) => HttpResponse::Ok().json(jobs),
        Err(e) => HttpResponse::InternalServerError().json(serde_json::json!({
            "error": format!("Failed to fetch saved jobs: {e}"),
        })),
    }
}
