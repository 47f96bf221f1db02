use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

use crate::listing::ListingItem;
use crate::listing::query::SEPARATOR;

/// SeaORM entity for the `jobs` table.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "jobs")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub title: String,
    #[sea_orm(column_type = "Text")]
    pub description: String,
    #[sea_orm(unique)]
    pub slug: String,
    pub category: String,
    #[sea_orm(column_name = "type")]
    #[serde(rename = "type")]
    pub job_type: String,
    pub location: String,
    pub city: Option<String>,
    #[sea_orm(column_type = "Text")]
    pub apply_link: String,
    pub featured: bool,
    pub expired: bool,
    pub draft: bool,
    pub company_id: Uuid,
    pub user_id: Uuid,
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
    #[sea_orm(has_many = "super::saved_jobs::Entity")]
    SavedJobs,
}

impl Related<super::companies::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Company.def()
    }
}

impl Related<super::saved_jobs::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::SavedJobs.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

// ── DTOs ──

/// Filterable columns must stay matchable by the listing filters, which
/// reserve the separator character.
fn no_separator(value: &str) -> Result<(), ValidationError> {
    if value.contains(SEPARATOR) {
        return Err(ValidationError::new("contains_separator"));
    }
    Ok(())
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateJob {
    #[validate(length(min = 1, max = 200, message = "title must be between 1 and 200 characters"))]
    pub title: String,
    #[validate(length(min = 1))]
    pub description: String,
    #[validate(length(min = 1), custom = "no_separator")]
    pub category: String,
    #[serde(rename = "type")]
    #[validate(length(min = 1), custom = "no_separator")]
    pub job_type: String,
    #[validate(length(min = 1), custom = "no_separator")]
    pub location: String,
    pub city: Option<String>,
    #[validate(url)]
    pub apply_link: String,
    pub company_id: Uuid,
    #[serde(default)]
    pub draft: bool,
}

/// Body of `PUT /api/jobs/save`.
#[derive(Debug, Clone, Deserialize)]
pub struct SaveJob {
    pub slug: Option<String>,
    #[serde(default)]
    pub save: bool,
}

/// Company fields shown on a job card.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompanyBrief {
    pub name: String,
    pub logo: Option<String>,
}

/// Card shown in the job listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobSummary {
    pub id: Uuid,
    pub title: String,
    pub slug: String,
    pub category: String,
    #[serde(rename = "type")]
    pub job_type: String,
    pub location: String,
    pub city: Option<String>,
    pub apply_link: String,
    pub featured: bool,
    pub company: Option<CompanyBrief>,
    pub created_at: DateTimeUtc,
}

impl From<(Model, Option<super::companies::Model>)> for JobSummary {
    fn from((job, company): (Model, Option<super::companies::Model>)) -> Self {
        Self {
            id: job.id,
            title: job.title,
            slug: job.slug,
            category: job.category,
            job_type: job.job_type,
            location: job.location,
            city: job.city,
            apply_link: job.apply_link,
            featured: job.featured,
            company: company.map(|c| CompanyBrief {
                name: c.name,
                logo: c.logo,
            }),
            created_at: job.created_at,
        }
    }
}

impl ListingItem for JobSummary {
    fn id(&self) -> Uuid {
        self.id
    }

    fn created_at(&self) -> DateTimeUtc {
        self.created_at
    }
}

/// Job page: the job plus the company that posted it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobDetail {
    #[serde(flatten)]
    pub job: Model,
    pub company: Option<super::companies::Model>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_job() -> CreateJob {
        CreateJob {
            title: "Rust engineer".into(),
            description: "Build things".into(),
            category: "engineering".into(),
            job_type: "full-time".into(),
            location: "Remote".into(),
            city: None,
            apply_link: "https://example.com/apply".into(),
            company_id: Uuid::new_v4(),
            draft: false,
        }
    }

    #[test]
    fn accepts_well_formed_job() {
        assert!(create_job().validate().is_ok());
    }

    #[test]
    fn rejects_separator_in_filterable_fields() {
        let mut job = create_job();
        job.location = "Berlin, DE".into();
        let errors = job.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("location"));
    }

    #[test]
    fn rejects_bad_apply_link() {
        let mut job = create_job();
        job.apply_link = "not a url".into();
        assert!(job.validate().is_err());
    }

    #[test]
    fn summary_uses_type_key() {
        let now = chrono::Utc::now();
        let summary = JobSummary {
            id: Uuid::new_v4(),
            title: "Rust engineer".into(),
            slug: "rust-engineer-at-acme".into(),
            category: "engineering".into(),
            job_type: "remote".into(),
            location: "Remote".into(),
            city: None,
            apply_link: "https://acme.test/apply".into(),
            featured: false,
            company: None,
            created_at: now,
        };
        let json = serde_json::to_value(&summary).unwrap();
        assert_eq!(json["type"], "remote");
    }
}
