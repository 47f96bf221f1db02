pub mod auth;
pub mod companies;
pub mod interviews;
pub mod jobs;
pub mod reviews;

use actix_web::{HttpRequest, HttpResponse, web};
use validator::ValidationErrors;

use crate::cache::CacheData;
use crate::db::sources::{CompanySource, JobSource};

pub fn init_routes(cfg: &mut web::ServiceConfig) {
    // ── Auth routes (protected by JWT via the AuthenticatedUser extractor) ──
    cfg.service(web::scope("/auth").route("/me", web::get().to(auth::me)));

    // ── Job routes (listing and detail are public) ──
    cfg.service(
        web::scope("/jobs")
            .route("", web::get().to(jobs::list_jobs::<JobSource>))
            .route("", web::post().to(jobs::create_job))
            .route("/count", web::get().to(jobs::count_jobs))
            .route("/saved", web::get().to(jobs::get_saved_jobs))
            .route("/save", web::put().to(jobs::save_job))
            .route("/{slug}", web::get().to(jobs::get_job)),
    );

    // ── Company routes ──
    cfg.service(
        web::scope("/companies")
            .route("", web::get().to(companies::list_companies::<CompanySource>))
            .route("", web::post().to(companies::create_company))
            .route("/{slug}", web::get().to(companies::get_company))
            .route("/{slug}/reviews", web::get().to(reviews::get_reviews))
            .route("/{slug}/reviews", web::post().to(reviews::create_review))
            .route("/{slug}/interviews", web::get().to(interviews::get_interviews))
            .route("/{slug}/interviews", web::post().to(interviews::create_interview)),
    );
}

/// 400 body for a request that failed field validation.
pub(crate) fn validation_failed(errors: ValidationErrors) -> HttpResponse {
    HttpResponse::BadRequest().json(serde_json::json!({
        "error": "Validation failed",
        "details": errors,
    }))
}

/// The redis cache, when the app was configured with one.
pub(crate) fn cache_of(req: &HttpRequest) -> Option<&CacheData> {
    req.app_data::<web::Data<CacheData>>().map(|data| data.get_ref())
}
