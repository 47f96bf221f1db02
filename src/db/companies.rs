use std::collections::HashMap;

use sea_orm::sea_query::{Expr, Order};
use sea_orm::*;
use uuid::Uuid;

use crate::db::{contains_literal, keyset_after};
use crate::error::ListingError;
use crate::listing::Cursor;
use crate::models::companies::{
    self, CompanyCounts, CompanyDetail, CompanyFilter, CompanySort, CompanySummary, CreateCompany,
};
use crate::models::{interviews, jobs, reviews};
use crate::slug;

/// Open jobs of the current `companies` row.
const JOB_COUNT_SQL: &str = r#"(SELECT COUNT(*) FROM "jobs" WHERE "jobs"."company_id" = "companies"."id" AND "jobs"."expired" = FALSE AND "jobs"."draft" = FALSE)"#;

/// Reviews of the current `companies` row.
const REVIEW_COUNT_SQL: &str =
    r#"(SELECT COUNT(*) FROM "reviews" WHERE "reviews"."company_id" = "companies"."id")"#;

fn count_sql(sort: CompanySort) -> Option<&'static str> {
    match sort {
        CompanySort::Newest => None,
        CompanySort::Jobs => Some(JOB_COUNT_SQL),
        CompanySort::Reviews => Some(REVIEW_COUNT_SQL),
    }
}

/// One page of companies matching `filter`, in the filter's order, after `after`.
pub async fn find_company_page(
    db: &DatabaseConnection,
    filter: &CompanyFilter,
    limit: u64,
    after: Option<Cursor>,
) -> Result<Vec<CompanySummary>, ListingError> {
    let anchor = match after {
        Some(cursor) => {
            let company = companies::Entity::find_by_id(cursor.id())
                .one(db)
                .await?
                .ok_or(ListingError::UnknownCursor)?;
            let counts = company_counts(db, &[company.id])
                .await?
                .remove(&company.id)
                .unwrap_or_default();
            Some((company, counts))
        }
        None => None,
    };

    let rows = company_page_query(filter, anchor.as_ref(), limit)
        .all(db)
        .await?;

    let ids: Vec<Uuid> = rows.iter().map(|c| c.id).collect();
    let mut counts = company_counts(db, &ids).await?;

    Ok(rows
        .into_iter()
        .map(|c| {
            let count = counts.remove(&c.id).unwrap_or_default();
            CompanySummary::new(c, count)
        })
        .collect())
}

/// Page query: search, keyset after `anchor`, ordered by the requested count
/// (if any) then newest first.
pub fn company_page_query(
    filter: &CompanyFilter,
    anchor: Option<&(companies::Model, CompanyCounts)>,
    limit: u64,
) -> Select<companies::Entity> {
    let count_sql = count_sql(filter.sort);
    let mut condition = Condition::all();

    if let Some(search) = filter.search() {
        condition = condition.add(contains_literal(
            (companies::Entity, companies::Column::Name),
            search,
        ));
    }

    if let Some((company, counts)) = anchor {
        let newer = keyset_after(
            companies::Column::CreatedAt,
            companies::Column::Id,
            company.created_at,
            company.id,
        );
        condition = condition.add(match (count_sql, counts.ranked_by(filter.sort)) {
            (Some(sql), Some(rank)) => {
                let rank = rank as i64;
                Condition::any()
                    .add(Expr::expr(Expr::cust(sql)).lt(rank))
                    .add(
                        Condition::all()
                            .add(Expr::expr(Expr::cust(sql)).eq(rank))
                            .add(newer),
                    )
            }
            _ => newer,
        });
    }

    let mut query = companies::Entity::find().filter(condition);
    if let Some(sql) = count_sql {
        query = query.order_by(Expr::cust(sql), Order::Desc);
    }
    query
        .order_by_desc(companies::Column::CreatedAt)
        .order_by_desc(companies::Column::Id)
        .limit(limit)
}

/// Open jobs and reviews per company, for the given companies only.
pub async fn company_counts(
    db: &DatabaseConnection,
    ids: &[Uuid],
) -> Result<HashMap<Uuid, CompanyCounts>, DbErr> {
    let mut counts: HashMap<Uuid, CompanyCounts> = HashMap::new();
    if ids.is_empty() {
        return Ok(counts);
    }

    let job_owners: Vec<Uuid> = jobs::Entity::find()
        .select_only()
        .column(jobs::Column::CompanyId)
        .filter(jobs::Column::CompanyId.is_in(ids.to_vec()))
        .filter(jobs::Column::Expired.eq(false))
        .filter(jobs::Column::Draft.eq(false))
        .into_tuple()
        .all(db)
        .await?;
    for company_id in job_owners {
        counts.entry(company_id).or_default().jobs += 1;
    }

    let review_owners: Vec<Uuid> = reviews::Entity::find()
        .select_only()
        .column(reviews::Column::CompanyId)
        .filter(reviews::Column::CompanyId.is_in(ids.to_vec()))
        .into_tuple()
        .all(db)
        .await?;
    for company_id in review_owners {
        counts.entry(company_id).or_default().reviews += 1;
    }

    Ok(counts)
}

pub async fn get_company_by_slug(
    db: &DatabaseConnection,
    slug: &str,
) -> Result<Option<companies::Model>, DbErr> {
    companies::Entity::find()
        .filter(companies::Column::Slug.eq(slug))
        .one(db)
        .await
}

pub async fn get_company_by_id(
    db: &DatabaseConnection,
    id: Uuid,
) -> Result<Option<companies::Model>, DbErr> {
    companies::Entity::find_by_id(id).one(db).await
}

/// Company with its open job, review and interview totals and mean rating.
pub async fn company_detail(
    db: &DatabaseConnection,
    company: companies::Model,
) -> Result<CompanyDetail, DbErr> {
    let active_jobs = jobs::Entity::find()
        .filter(jobs::Column::CompanyId.eq(company.id))
        .filter(jobs::Column::Expired.eq(false))
        .filter(jobs::Column::Draft.eq(false))
        .count(db)
        .await?;

    let ratings: Vec<i32> = reviews::Entity::find()
        .select_only()
        .column(reviews::Column::Rating)
        .filter(reviews::Column::CompanyId.eq(company.id))
        .into_tuple()
        .all(db)
        .await?;

    let interviews = interviews::Entity::find()
        .filter(interviews::Column::CompanyId.eq(company.id))
        .count(db)
        .await?;

    Ok(CompanyDetail {
        company,
        active_jobs,
        reviews: ratings.len() as u64,
        interviews,
        average_rating: average(&ratings),
    })
}

fn average(ratings: &[i32]) -> Option<f64> {
    if ratings.is_empty() {
        return None;
    }
    let total: i64 = ratings.iter().map(|&r| i64::from(r)).sum();
    Some(total as f64 / ratings.len() as f64)
}

async fn slug_taken(db: &DatabaseConnection, slug: &str) -> Result<bool, DbErr> {
    Ok(get_company_by_slug(db, slug).await?.is_some())
}

/// Insert a company owned by `user_id`; the slug is derived from its name.
pub async fn insert_company(
    db: &DatabaseConnection,
    input: CreateCompany,
    user_id: Uuid,
) -> Result<companies::Model, DbErr> {
    let id = Uuid::new_v4();
    let mut company_slug = slug::slugify(&input.name);
    if company_slug.is_empty() || slug_taken(db, &company_slug).await? {
        company_slug = slug::disambiguate(&company_slug, id);
    }

    let new_company = companies::ActiveModel {
        id: Set(id),
        name: Set(input.name),
        slug: Set(company_slug),
        logo: Set(input.logo),
        website: Set(input.website),
        description: Set(input.description),
        user_id: Set(user_id),
        created_at: Set(chrono::Utc::now()),
    };

    new_company.insert(db).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn filter(search: Option<&str>, sort: CompanySort) -> CompanyFilter {
        CompanyFilter {
            search: search.map(str::to_string),
            sort,
        }
    }

    fn anchor() -> (companies::Model, CompanyCounts) {
        let company = companies::Model {
            id: Uuid::parse_str("0123abcd-0000-4000-8000-000000000000").unwrap(),
            name: "Acme".into(),
            slug: "acme".into(),
            logo: None,
            website: None,
            description: None,
            user_id: Uuid::new_v4(),
            created_at: Utc.with_ymd_and_hms(2025, 3, 1, 12, 0, 0).unwrap(),
        };
        (company, CompanyCounts { jobs: 4, reviews: 9 })
    }

    fn sql(filter: &CompanyFilter, anchor: Option<&(companies::Model, CompanyCounts)>) -> String {
        company_page_query(filter, anchor, 32)
            .build(DbBackend::Postgres)
            .to_string()
    }

    #[test]
    fn newest_first_by_default() {
        let q = sql(&filter(None, CompanySort::Newest), None);
        assert!(
            q.contains(r#"ORDER BY "companies"."created_at" DESC, "companies"."id" DESC"#),
            "{q}"
        );
        assert!(!q.contains("COUNT(*)"), "{q}");
        assert!(q.contains("LIMIT 32"), "{q}");
    }

    #[test]
    fn search_wildcards_are_matched_literally() {
        let q = sql(&filter(Some("a_b%"), CompanySort::Newest), None);
        assert!(q.contains(r#""companies"."name" LIKE"#), "{q}");
        assert!(q.contains("ESCAPE"), "{q}");
        assert!(!q.contains("'%a_b%%'"), "{q}");
    }

    #[test]
    fn job_sort_orders_and_resumes_on_open_job_count() {
        let anchor = anchor();
        let q = sql(&filter(None, CompanySort::Jobs), Some(&anchor));

        let order = format!(
            r#"ORDER BY {JOB_COUNT_SQL} DESC, "companies"."created_at" DESC, "companies"."id" DESC"#
        );
        assert!(q.contains(&order), "{q}");
        assert!(q.contains(&format!("{JOB_COUNT_SQL} < 4")), "{q}");
        assert!(q.contains(&format!("{JOB_COUNT_SQL} = 4")), "{q}");
        assert!(
            q.contains(&format!(r#""companies"."id" < '{}'"#, anchor.0.id)),
            "{q}"
        );
    }

    #[test]
    fn review_sort_orders_and_resumes_on_review_count() {
        let anchor = anchor();
        let q = sql(&filter(None, CompanySort::Reviews), Some(&anchor));

        assert!(q.contains(&format!("ORDER BY {REVIEW_COUNT_SQL} DESC")), "{q}");
        assert!(q.contains(&format!("{REVIEW_COUNT_SQL} < 9")), "{q}");
        assert!(!q.contains(JOB_COUNT_SQL), "{q}");
    }

    #[test]
    fn average_of_no_ratings_is_none() {
        assert_eq!(average(&[]), None);
        assert_eq!(average(&[4, 5]), Some(4.5));
    }
}
