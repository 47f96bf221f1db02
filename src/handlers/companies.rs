use actix_web::{HttpResponse, Responder, web};
use sea_orm::DatabaseConnection;
use validator::Validate;

use crate::auth::middleware::AuthenticatedUser;
use crate::cache::{self, CacheData, keys};
use crate::db::companies as company_db;
use crate::error::ListingError;
use crate::handlers::validation_failed;
use crate::listing::{ListingSource, Paginator};
use crate::models::PageParams;
use crate::models::companies::{
    CompanyDetail, CompanyFilter, CompanySummary, CreateCompany, Model,
};

/// GET /api/companies?cursor&limit&search&sort — one page of the company
/// directory, newest first or ranked by `sort=jobs|reviews`.
pub async fn list_companies<S>(
    params: web::Query<PageParams>,
    filter: web::Query<CompanyFilter>,
    paginator: web::Data<Paginator<S>>,
) -> Result<HttpResponse, ListingError>
where
    S: ListingSource<Filter = CompanyFilter, Item = CompanySummary> + 'static,
{
    let filter = filter.into_inner();
    let cursor = params.cursor()?;
    let limit = params.limit(paginator.page_size());
    let page = paginator.fetch_page(&filter, cursor, limit).await?;
    Ok(HttpResponse::Ok().json(page))
}

/// GET /api/companies/{slug} — company page with its totals.
pub async fn get_company(
    db: web::Data<DatabaseConnection>,
    cache: web::Data<CacheData>,
    path: web::Path<String>,
) -> impl Responder {
    let slug = path.into_inner();
    let cache_key = keys::company(&slug);

    match cache.get::<CompanyDetail>(&cache_key).await {
        Ok(Some(detail)) => return HttpResponse::Ok().json(detail),
        Ok(None) => {}
        Err(e) => tracing::warn!("Cache error: {}", e),
    }

    let company = match company_by_slug(db.get_ref(), &slug).await {
        Ok(company) => company,
        Err(response) => return response,
    };

    match company_db::company_detail(db.get_ref(), company).await {
        Ok(detail) => {
            let ttl = cache.config().company_ttl;
            cache::warn_on_failure("set", &cache_key, cache.set(&cache_key, &detail, Some(ttl)).await);
            HttpResponse::Ok().json(detail)
        }
        Err(e) => HttpResponse::InternalServerError().json(serde_json::json!({
            "error": format!("Database error: {e}"),
        })),
    }
}

/// Company named by a path slug, or the 404/500 response to send instead.
pub(crate) async fn company_by_slug(
    db: &DatabaseConnection,
    slug: &str,
) -> Result<Model, HttpResponse> {
    match company_db::get_company_by_slug(db, slug).await {
        Ok(Some(company)) => Ok(company),
        Ok(None) => Err(HttpResponse::NotFound().json(serde_json::json!({
            "error": format!("Company {slug} not found"),
        }))),
        Err(e) => Err(HttpResponse::InternalServerError().json(serde_json::json!({
            "error": format!("Database error: {e}"),
        }))),
    }
}

/// POST /api/companies — register a company owned by the caller.
pub async fn create_company(
    user: AuthenticatedUser,
    db: web::Data<DatabaseConnection>,
    body: web::Json<CreateCompany>,
) -> impl Responder {
    let input = body.into_inner();
    if let Err(errors) = input.validate() {
        return validation_failed(errors);
    }

    match company_db::insert_company(db.get_ref(), input, user.0.id).await {
        Ok(company) => HttpResponse::Created().json(company),
        Err(e) => HttpResponse::InternalServerError().json(serde_json::json!({
            "error": format!("Failed to create company: {e}"),
        })),
    }
}
