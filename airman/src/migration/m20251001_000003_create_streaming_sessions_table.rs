use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(StreamingSessions::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(StreamingSessions::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(StreamingSessions::ChannelId)
                            .uuid()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(StreamingSessions::Status)
                            .string()
                            .not_null()
                            .default("idle"),
                    )
                    .col(
                        ColumnDef::new(StreamingSessions::SourceType)
                            .string()
                            .not_null()
                            .default("playlist"),
                    )
                    .col(
                        ColumnDef::new(StreamingSessions::CurrentProgramId)
                            .integer()
                            .null(),
                    )
                    .col(
                        ColumnDef::new(StreamingSessions::PlaylistPosition)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(StreamingSessions::StartedAt)
                            .timestamp_with_time_zone()
                            .null(),
                    )
                    .col(
                        ColumnDef::new(StreamingSessions::LastHeartbeat)
                            .timestamp_with_time_zone()
                            .null(),
                    )
                    .col(
                        ColumnDef::new(StreamingSessions::ErrorMessage)
                            .string()
                            .null(),
                    )
                    .col(
                        ColumnDef::new(StreamingSessions::Metadata)
                            .json()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(StreamingSessions::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(StreamingSessions::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .to_owned(),
            )
            .await?;

        // At most one session row per channel
        manager
            .create_index(
                Index::create()
                    .name("idx_streaming_sessions_channel")
                    .table(StreamingSessions::Table)
                    .col(StreamingSessions::ChannelId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(PlaylistExecutionLogs::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(PlaylistExecutionLogs::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(PlaylistExecutionLogs::SessionId)
                            .uuid()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(PlaylistExecutionLogs::ProgramId)
                            .integer()
                            .null(),
                    )
                    .col(
                        ColumnDef::new(PlaylistExecutionLogs::Status)
                            .string()
                            .not_null()
                            .default("playing"),
                    )
                    .col(
                        ColumnDef::new(PlaylistExecutionLogs::StartedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(PlaylistExecutionLogs::EndedAt)
                            .timestamp_with_time_zone()
                            .null(),
                    )
                    .col(
                        ColumnDef::new(PlaylistExecutionLogs::DurationSeconds)
                            .big_integer()
                            .null(),
                    )
                    .col(
                        ColumnDef::new(PlaylistExecutionLogs::ErrorMessage)
                            .string()
                            .null(),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_playlist_execution_logs_session")
                    .table(PlaylistExecutionLogs::Table)
                    .col(PlaylistExecutionLogs::SessionId)
                    .col(PlaylistExecutionLogs::StartedAt)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(StreamOutputs::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(StreamOutputs::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(StreamOutputs::ChannelId).uuid().not_null())
                    .col(ColumnDef::new(StreamOutputs::SessionId).uuid().null())
                    .col(ColumnDef::new(StreamOutputs::Protocol).string().not_null())
                    .col(ColumnDef::new(StreamOutputs::TargetUrl).string().not_null())
                    .col(
                        ColumnDef::new(StreamOutputs::IsActive)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(ColumnDef::new(StreamOutputs::BitrateKbps).integer().null())
                    .col(ColumnDef::new(StreamOutputs::Resolution).string().null())
                    .col(ColumnDef::new(StreamOutputs::LastStatus).string().null())
                    .col(
                        ColumnDef::new(StreamOutputs::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(StreamOutputs::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_stream_outputs_channel")
                    .table(StreamOutputs::Table)
                    .col(StreamOutputs::ChannelId)
                    .col(StreamOutputs::Protocol)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(StreamOutputs::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(PlaylistExecutionLogs::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(StreamingSessions::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum StreamingSessions {
    Table,
    Id,
    ChannelId,
    Status,
    SourceType,
    CurrentProgramId,
    PlaylistPosition,
    StartedAt,
    LastHeartbeat,
    ErrorMessage,
    Metadata,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum PlaylistExecutionLogs {
    Table,
    Id,
    SessionId,
    ProgramId,
    Status,
    StartedAt,
    EndedAt,
    DurationSeconds,
    ErrorMessage,
}

#[derive(DeriveIden)]
enum StreamOutputs {
    Table,
    Id,
    ChannelId,
    SessionId,
    Protocol,
    TargetUrl,
    IsActive,
    BitrateKbps,
    Resolution,
    LastStatus,
    CreatedAt,
    UpdatedAt,
}
