use actix_web::{HttpResponse, Responder, web};
use sea_orm::DatabaseConnection;
use validator::Validate;

use crate::auth::middleware::AuthenticatedUser;
use crate::cache::{self, CacheData, keys};
use crate::db::interviews as interview_db;
use crate::handlers::companies::company_by_slug;
use crate::handlers::validation_failed;
use crate::models::interviews::CreateInterview;

/// GET /api/companies/{slug}/interviews
pub async fn get_interviews(
    db: web::Data<DatabaseConnection>,
    path: web::Path<String>,
) -> impl Responder {
    let company = match company_by_slug(db.get_ref(), &path).await {
        Ok(company) => company,
        Err(response) => return response,
    };

    match interview_db::get_company_interviews(db.get_ref(), company.id).await {
        Ok(interviews) => HttpResponse::Ok().json(interviews),
        Err(e) => HttpResponse::InternalServerError().json(serde_json::json!({
            "error": format!("Failed to fetch interviews: {e}"),
        })),
    }
}

/// POST /api/companies/{slug}/interviews — share an interview experience.
pub async fn create_interview(
    user: AuthenticatedUser,
    db: web::Data<DatabaseConnection>,
    cache: web::Data<CacheData>,
    path: web::Path<String>,
    body: web::Json<CreateInterview>,
) -> impl Responder {
    let input = body.into_inner();
    if let Err(errors) = input.validate() {
        return validation_failed(errors);
    }

    let company = match company_by_slug(db.get_ref(), &path).await {
        Ok(company) => company,
        Err(response) => return response,
    };

    match interview_db::insert_interview(db.get_ref(), input, company.id, user.0.id).await {
        Ok(interview) => {
            let key = keys::company(&company.slug);
            cache::warn_on_failure("invalidate", &key, cache.delete(&key).await);
            HttpResponse::Created().json(interview)
        }
        Err(e) => HttpResponse::InternalServerError().json(serde_json::json!({
            "error": format!("Failed to create interview: {e}"),
        })),
    }
}
