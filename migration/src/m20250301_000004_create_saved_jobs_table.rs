use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

/// Join table between users and the jobs they bookmarked.
#[derive(DeriveIden)]
enum SavedJobs {
    Table,
    UserId,
    JobId,
    CreatedAt,
}

#[derive(DeriveIden)]
enum Jobs {
    Table,
    Id,
}

#[derive(DeriveIden)]
enum Users {
    Table,
    Id,
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(SavedJobs::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(SavedJobs::UserId).uuid().not_null())
                    .col(ColumnDef::new(SavedJobs::JobId).uuid().not_null())
                    .col(
                        ColumnDef::new(SavedJobs::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .primary_key(
                        Index::create()
                            .col(SavedJobs::UserId)
                            .col(SavedJobs::JobId),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_saved_jobs_user_id")
                            .from(SavedJobs::Table, SavedJobs::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_saved_jobs_job_id")
                            .from(SavedJobs::Table, SavedJobs::JobId)
                            .to(Jobs::Table, Jobs::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(SavedJobs::Table).to_owned())
            .await
    }
}
