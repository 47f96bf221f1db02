use sea_orm::*;
use uuid::Uuid;

use crate::models::interviews::{self, CreateInterview};

/// Interview experiences shared for a company, newest first.
pub async fn get_company_interviews(
    db: &DatabaseConnection,
    company_id: Uuid,
) -> Result<Vec<interviews::Model>, DbErr> {
    interviews::Entity::find()
        .filter(interviews::Column::CompanyId.eq(company_id))
        .order_by_desc(interviews::Column::CreatedAt)
        .all(db)
        .await
}

pub async fn insert_interview(
    db: &DatabaseConnection,
    input: CreateInterview,
    company_id: Uuid,
    user_id: Uuid,
) -> Result<interviews::Model, DbErr> {
    let new_interview = interviews::ActiveModel {
        id: Set(Uuid::new_v4()),
        company_id: Set(company_id),
        user_id: Set(user_id),
        title: Set(input.title),
        position: Set(input.position),
        year: Set(input.year),
        hr: Set(input.hr),
        technical: Set(input.technical),
        duration: Set(input.duration),
        difficulty: Set(input.difficulty),
        offer: Set(input.offer),
        rating: Set(input.rating),
        created_at: Set(chrono::Utc::now()),
    };

    new_interview.insert(db).await
}
