use sea_orm_migration::prelude::*;

use crate::m20250123_000001_create_tables::Users;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // 外部学籍系统同步过来的学生名册
        manager
            .create_table(
                Table::create()
                    .table(ExternalStudents::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(ExternalStudents::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(ExternalStudents::ExternalId)
                            .string()
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(ExternalStudents::FirstName).string().not_null())
                    .col(ColumnDef::new(ExternalStudents::LastName).string().not_null())
                    .col(ColumnDef::new(ExternalStudents::Email).string().null())
                    .col(ColumnDef::new(ExternalStudents::GradeLevel).integer().null())
                    .col(ColumnDef::new(ExternalStudents::School).string().null())
                    .col(ColumnDef::new(ExternalStudents::Metadata).text().null())
                    .col(ColumnDef::new(ExternalStudents::UserId).big_integer().null())
                    .col(
                        ColumnDef::new(ExternalStudents::LastSyncedAt)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(ExternalStudents::CreatedAt)
                            .big_integer()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(ExternalStudents::Table, ExternalStudents::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_external_students_email")
                    .table(ExternalStudents::Table)
                    .col(ExternalStudents::Email)
                    .to_owned(),
            )
            .await?;

        // Webhook 事件去重
        manager
            .create_table(
                Table::create()
                    .table(WebhookEvents::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(WebhookEvents::EventId)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(WebhookEvents::ReceivedAt)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(WebhookEvents::RecordCount)
                            .integer()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        // 出站同步记录
        manager
            .create_table(
                Table::create()
                    .table(SyncRuns::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(SyncRuns::Id)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(SyncRuns::StartedAt).big_integer().not_null())
                    .col(ColumnDef::new(SyncRuns::FinishedAt).big_integer().null())
                    .col(ColumnDef::new(SyncRuns::Status).string().not_null())
                    .col(
                        ColumnDef::new(SyncRuns::RecordsSent)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(ColumnDef::new(SyncRuns::Error).text().null())
                    .col(ColumnDef::new(SyncRuns::TriggeredBy).big_integer().null())
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_sync_runs_started_at")
                    .table(SyncRuns::Table)
                    .col(SyncRuns::StartedAt)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(SyncRuns::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(WebhookEvents::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(ExternalStudents::Table).to_owned())
            .await?;
        Ok(())
    }
}

#[derive(DeriveIden)]
enum ExternalStudents {
    #[sea_orm(iden = "external_students")]
    Table,
    Id,
    ExternalId,
    FirstName,
    LastName,
    Email,
    GradeLevel,
    School,
    Metadata,
    UserId,
    LastSyncedAt,
    CreatedAt,
}

#[derive(DeriveIden)]
enum WebhookEvents {
    #[sea_orm(iden = "webhook_events")]
    Table,
    EventId,
    ReceivedAt,
    RecordCount,
}

#[derive(DeriveIden)]
enum SyncRuns {
    #[sea_orm(iden = "sync_runs")]
    Table,
    Id,
    StartedAt,
    FinishedAt,
    Status,
    RecordsSent,
    Error,
    TriggeredBy,
}
