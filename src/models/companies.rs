use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::listing::ListingItem;

/// SeaORM entity for the `companies` table.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "companies")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub name: String,
    #[sea_orm(unique)]
    pub slug: String,
    pub logo: Option<String>,
    pub website: Option<String>,
    #[sea_orm(column_type = "Text", nullable)]
    pub description: Option<String>,
    pub user_id: Uuid,
    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::jobs::Entity")]
    Jobs,
    #[sea_orm(has_many = "super::reviews::Entity")]
    Reviews,
    #[sea_orm(has_many = "super::interviews::Entity")]
    Interviews,
    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::UserId",
        to = "super::users::Column::Id"
    )]
    User,
}

impl Related<super::jobs::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Jobs.def()
    }
}

impl Related<super::reviews::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Reviews.def()
    }
}

impl Related<super::interviews::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Interviews.def()
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
pub struct CreateCompany {
    #[validate(length(min = 1, max = 120, message = "name must be between 1 and 120 characters"))]
    pub name: String,
    #[validate(url)]
    pub logo: Option<String>,
    #[validate(url)]
    pub website: Option<String>,
    pub description: Option<String>,
}

/// Order of the company directory. Unknown values fall back to newest first.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CompanySort {
    /// Most open jobs first.
    Jobs,
    /// Most reviews first.
    Reviews,
    #[default]
    #[serde(other)]
    Newest,
}

/// Query of `GET /api/companies`: substring search on the company name and
/// the directory order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct CompanyFilter {
    pub search: Option<String>,
    #[serde(default)]
    pub sort: CompanySort,
}

impl CompanyFilter {
    pub fn search(&self) -> Option<&str> {
        self.search.as_deref().filter(|s| !s.is_empty())
    }
}

/// Number of records attached to a company.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompanyCounts {
    pub jobs: u64,
    pub reviews: u64,
}

impl CompanyCounts {
    /// The count a directory order ranks by, if any.
    pub fn ranked_by(&self, sort: CompanySort) -> Option<u64> {
        match sort {
            CompanySort::Newest => None,
            CompanySort::Jobs => Some(self.jobs),
            CompanySort::Reviews => Some(self.reviews),
        }
    }
}

/// Card shown in the company listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompanySummary {
    pub id: Uuid,
    pub name: String,
    pub slug: String,
    pub logo: Option<String>,
    #[serde(rename = "_count")]
    pub count: CompanyCounts,
    pub created_at: DateTimeUtc,
}

impl CompanySummary {
    pub fn new(m: Model, count: CompanyCounts) -> Self {
        Self {
            id: m.id,
            name: m.name,
            slug: m.slug,
            logo: m.logo,
            count,
            created_at: m.created_at,
        }
    }
}

impl ListingItem for CompanySummary {
    fn id(&self) -> Uuid {
        self.id
    }

    fn created_at(&self) -> DateTimeUtc {
        self.created_at
    }
}

/// Company page: the company plus its active jobs, reviews and interviews counts.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompanyDetail {
    #[serde(flatten)]
    pub company: Model,
    pub active_jobs: u64,
    pub reviews: u64,
    pub interviews: u64,
    pub average_rating: Option<f64>,
}
