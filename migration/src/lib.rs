pub use sea_orm_migration::prelude::*;

mod m20250301_000001_create_users_table;
mod m20250301_000002_create_companies_table;
mod m20250301_000003_create_jobs_table;
mod m20250301_000004_create_saved_jobs_table;
mod m20250302_000001_create_reviews_table;
mod m20250302_000002_create_interviews_table;
mod m20250305_000001_add_listing_indexes;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20250301_000001_create_users_table::Migration),
            Box::new(m20250301_000002_create_companies_table::Migration),
            Box::new(m20250301_000003_create_jobs_table::Migration),
            Box::new(m20250301_000004_create_saved_jobs_table::Migration),
            Box::new(m20250302_000001_create_reviews_table::Migration),
            Box::new(m20250302_000002_create_interviews_table::Migration),
            Box::new(m20250305_000001_add_listing_indexes::Migration),
        ]
    }
}
