use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use validator::Validate;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, EnumIter, DeriveActiveEnum)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::None)")]
#[serde(rename_all = "snake_case")]
pub enum OfferOutcome {
    /// Received an offer and took it.
    #[sea_orm(string_value = "accepted")]
    Accepted,
    #[sea_orm(string_value = "declined")]
    Declined,
    /// No offer was made.
    #[sea_orm(string_value = "no")]
    No,
}

/// SeaORM entity for the `interviews` table (interview experiences).
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "interviews")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub company_id: Uuid,
    pub user_id: Uuid,
    pub title: String,
    #[sea_orm(column_type = "Text")]
    pub position: String,
    pub year: i32,
    #[sea_orm(column_type = "Text", nullable)]
    pub hr: Option<String>,
    #[sea_orm(column_type = "Text", nullable)]
    pub technical: Option<String>,
    /// Length of the hiring process in weeks.
    pub duration: i32,
    pub difficulty: i32,
    pub offer: OfferOutcome,
    pub rating: i32,
    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::companies::Entity",
        from = "Column::CompanyId",
        to = "super::companies::Column::Id"
    )]
    Company,
    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::UserId",
        to = "super::users::Column::Id"
    )]
    User,
}

impl Related<super::companies::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Company.def()
    }
}

impl Related<super::users::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

// ── DTOs ──

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateInterview {
    #[validate(length(min = 1, max = 200))]
    pub title: String,
    #[validate(length(min = 1))]
    pub position: String,
    #[validate(range(min = 1970, max = 2100))]
    pub year: i32,
    pub hr: Option<String>,
    pub technical: Option<String>,
    #[validate(range(min = 0, max = 52))]
    pub duration: i32,
    #[validate(range(min = 0, max = 5))]
    pub difficulty: i32,
    pub offer: OfferOutcome,
    #[validate(range(min = 0, max = 5))]
    pub rating: i32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_form_offer_values() {
        for (raw, outcome) in [
            ("accepted", OfferOutcome::Accepted),
            ("declined", OfferOutcome::Declined),
            ("no", OfferOutcome::No),
        ] {
            let parsed: OfferOutcome = serde_json::from_value(serde_json::json!(raw)).unwrap();
            assert_eq!(parsed, outcome);
        }
        assert!(serde_json::from_value::<OfferOutcome>(serde_json::json!("yes")).is_err());
    }

    #[test]
    fn difficulty_above_five_is_invalid() {
        let interview = CreateInterview {
            title: "Backend loop".into(),
            position: "Engineer".into(),
            year: 2025,
            hr: None,
            technical: Some("System design".into()),
            duration: 3,
            difficulty: 6,
            offer: OfferOutcome::Accepted,
            rating: 4,
        };
        assert!(interview.validate().is_err());
    }
}
