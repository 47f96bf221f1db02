use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[derive(DeriveIden)]
enum Jobs {
    Table,
    Id,
    CompanyId,
    CreatedAt,
    Location,
    Category,
    Type,
}

#[derive(DeriveIden)]
enum Companies {
    Table,
    Id,
    CreatedAt,
}

#[derive(DeriveIden)]
enum Reviews {
    Table,
    CompanyId,
}

#[derive(DeriveIden)]
enum Interviews {
    Table,
    CompanyId,
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Keyset order for the job listing: created_at DESC, id DESC
        manager
            .create_index(
                Index::create()
                    .name("idx_jobs_created_at_id")
                    .table(Jobs::Table)
                    .col((Jobs::CreatedAt, IndexOrder::Desc))
                    .col((Jobs::Id, IndexOrder::Desc))
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_companies_created_at_id")
                    .table(Companies::Table)
                    .col((Companies::CreatedAt, IndexOrder::Desc))
                    .col((Companies::Id, IndexOrder::Desc))
                    .to_owned(),
            )
            .await?;

        for (name, column) in [
            ("idx_jobs_location", Jobs::Location),
            ("idx_jobs_category", Jobs::Category),
            ("idx_jobs_type", Jobs::Type),
            ("idx_jobs_company_id", Jobs::CompanyId),
        ] {
            manager
                .create_index(
                    Index::create()
                        .name(name)
                        .table(Jobs::Table)
                        .col(column)
                        .to_owned(),
                )
                .await?;
        }

        manager
            .create_index(
                Index::create()
                    .name("idx_reviews_company_id")
                    .table(Reviews::Table)
                    .col(Reviews::CompanyId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_interviews_company_id")
                    .table(Interviews::Table)
                    .col(Interviews::CompanyId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        for name in [
            "idx_jobs_created_at_id",
            "idx_companies_created_at_id",
            "idx_jobs_location",
            "idx_jobs_category",
            "idx_jobs_type",
            "idx_jobs_company_id",
            "idx_reviews_company_id",
            "idx_interviews_company_id",
        ] {
            manager
                .drop_index(Index::drop().name(name).to_owned())
                .await?;
        }

        Ok(())
    }
}
