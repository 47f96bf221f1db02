use actix_web::HttpResponse;
use sea_orm::DatabaseConnection;
use uuid::Uuid;

use crate::db::companies as company_db;
use crate::models::companies::Model;

/// Load a company and check that `user_id` created it.
pub async fn verify_company_owner(
    db: &DatabaseConnection,
    company_id: Uuid,
    user_id: Uuid,
) -> Result<Model, HttpResponse> {
    match company_db::get_company_by_id(db, company_id).await {
        Ok(Some(company)) if company.user_id == user_id => Ok(company),
        Ok(Some(_)) => Err(HttpResponse::Forbidden().json(serde_json::json!({
            "error": "You do not own this company",
        }))),
        Ok(None) => Err(HttpResponse::NotFound().json(serde_json::json!({
            "error": format!("Company {company_id} not found"),
        }))),
        Err(e) => Err(HttpResponse::InternalServerError().json(serde_json::json!({
            "error": format!("Database error: {e}"),
        }))),
    }
}
