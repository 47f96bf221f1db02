use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

/// Identifiers for the `interviews` table and its columns.
#[derive(DeriveIden)]
enum Interviews {
    Table,
    Id,
    CompanyId,
    UserId,
    Title,
    Position,
    Year,
    Hr,
    Technical,
    Duration,
    Difficulty,
    Offer,
    Rating,
    CreatedAt,
}

#[derive(DeriveIden)]
enum Companies {
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
                    .table(Interviews::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Interviews::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Interviews::CompanyId).uuid().not_null())
                    .col(ColumnDef::new(Interviews::UserId).uuid().not_null())
                    .col(ColumnDef::new(Interviews::Title).string().not_null())
                    .col(ColumnDef::new(Interviews::Position).text().not_null())
                    .col(ColumnDef::new(Interviews::Year).integer().not_null())
                    .col(ColumnDef::new(Interviews::Hr).text().null())
                    .col(ColumnDef::new(Interviews::Technical).text().null())
                    .col(ColumnDef::new(Interviews::Duration).integer().not_null())
                    .col(ColumnDef::new(Interviews::Difficulty).integer().not_null())
                    .col(ColumnDef::new(Interviews::Offer).string().not_null())
                    .col(ColumnDef::new(Interviews::Rating).integer().not_null())
                    .col(
                        ColumnDef::new(Interviews::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_interviews_company_id")
                            .from(Interviews::Table, Interviews::CompanyId)
                            .to(Companies::Table, Companies::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_interviews_user_id")
                            .from(Interviews::Table, Interviews::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Interviews::Table).to_owned())
            .await
    }
}
