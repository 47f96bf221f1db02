use actix_web::{HttpResponse, Responder, web};
use sea_orm::DatabaseConnection;
use validator::Validate;

use crate::auth::middleware::AuthenticatedUser;
use crate::cache::{self, CacheData, keys};
use crate::db::reviews as review_db;
use crate::handlers::companies::company_by_slug;
use crate::handlers::validation_failed;
use crate::models::reviews::CreateReview;

/// GET /api/companies/{slug}/reviews
pub async fn get_reviews(
    db: web::Data<DatabaseConnection>,
    path: web::Path<String>,
) -> impl Responder {
    let company = match company_by_slug(db.get_ref(), &path).await {
        Ok(company) => company,
        Err(response) => return response,
    };

    match review_db::get_company_reviews(db.get_ref(), company.id).await {
        Ok(reviews) => HttpResponse::Ok().json(reviews),
        Err(e) => HttpResponse::InternalServerError().json(serde_json::json!({
            "error": format!("Failed to fetch reviews: {e}"),
        })),
    }
}

/// POST /api/companies/{slug}/reviews
pub async fn create_review(
    user: AuthenticatedUser,
    db: web::Data<DatabaseConnection>,
    cache: web::Data<CacheData>,
    path: web::Path<String>,
    body: web::Json<CreateReview>,
) -> impl Responder {
    let input = body.into_inner();
    if let Err(errors) = input.validate() {
        return validation_failed(errors);
    }

    let company = match company_by_slug(db.get_ref(), &path).await {
        Ok(company) => company,
        Err(response) => return response,
    };

    match review_db::insert_review(db.get_ref(), input, company.id, user.0.id).await {
        Ok(review) => {
            let key = keys::company(&company.slug);
            cache::warn_on_failure("invalidate", &key, cache.delete(&key).await);
            HttpResponse::Created().json(review)
        }
        Err(e) => HttpResponse::InternalServerError().json(serde_json::json!({
            "error": format!("Failed to create review: {e}"),
        })),
    }
}
