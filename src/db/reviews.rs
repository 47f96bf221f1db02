use sea_orm::*;
use uuid::Uuid;

use crate::models::reviews::{self, CreateReview};

/// Reviews of a company, newest first.
pub async fn get_company_reviews(
    db: &DatabaseConnection,
    company_id: Uuid,
) -> Result<Vec<reviews::Model>, DbErr> {
    reviews::Entity::find()
        .filter(reviews::Column::CompanyId.eq(company_id))
        .order_by_desc(reviews::Column::CreatedAt)
        .all(db)
        .await
}

pub async fn insert_review(
    db: &DatabaseConnection,
    input: CreateReview,
    company_id: Uuid,
    user_id: Uuid,
) -> Result<reviews::Model, DbErr> {
    let new_review = reviews::ActiveModel {
        id: Set(Uuid::new_v4()),
        company_id: Set(company_id),
        user_id: Set(user_id),
        title: Set(input.title),
        content: Set(input.content),
        rating: Set(input.rating),
        pros: Set(input.pros),
        cons: Set(input.cons),
        status: Set(input.status),
        created_at: Set(chrono::Utc::now()),
    };

    new_review.insert(db).await
}
