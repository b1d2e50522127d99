use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(ProgramSchedule::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(ProgramSchedule::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(ProgramSchedule::ChannelId).uuid().not_null())
                    .col(ColumnDef::new(ProgramSchedule::Title).string().not_null())
                    .col(
                        ColumnDef::new(ProgramSchedule::ProgramType)
                            .string()
                            .not_null()
                            .default("vod"),
                    )
                    .col(
                        ColumnDef::new(ProgramSchedule::StartTime)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(ProgramSchedule::DurationMinutes)
                            .integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(ProgramSchedule::AssetId).uuid().null())
                    .col(ColumnDef::new(ProgramSchedule::LiveUrl).string().null())
                    .col(
                        ColumnDef::new(ProgramSchedule::RepeatPattern)
                            .string()
                            .not_null()
                            .default("none"),
                    )
                    .col(
                        ColumnDef::new(ProgramSchedule::CreatedAt)
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
                    .name("idx_program_schedule_channel_time")
                    .table(ProgramSchedule::Table)
                    .col(ProgramSchedule::ChannelId)
                    .col(ProgramSchedule::StartTime)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(ProgramSchedule::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum ProgramSchedule {
    Table,
    Id,
    ChannelId,
    Title,
    ProgramType,
    StartTime,
    DurationMinutes,
    AssetId,
    LiveUrl,
    RepeatPattern,
    CreatedAt,
}
