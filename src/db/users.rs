use sea_orm::*;

use crate::models::users::{self, CreateUserFromAuth};

/// Return the local user for a verified identity, creating it on first sight.
pub async fn find_or_create_from_auth(
    db: &DatabaseConnection,
    input: CreateUserFromAuth,
) -> Result<users::Model, DbErr> {
    if let Some(existing) = users::Entity::find_by_id(input.id).one(db).await? {
        return Ok(existing);
    }

    let new_user = users::ActiveModel {
        id: Set(input.id),
        email: Set(input.email),
        name: Set(input.name),
        image: Set(input.image),
        auth_provider: Set(input.auth_provider),
        created_at: Set(chrono::Utc::now()),
        updated_at: Set(None),
    };

    new_user.insert(db).await
}
