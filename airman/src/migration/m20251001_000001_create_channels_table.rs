use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Channels::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Channels::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Channels::OwnerId).string().not_null())
                    .col(ColumnDef::new(Channels::Name).string().not_null())
                    .col(
                        ColumnDef::new(Channels::IsLive)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(Channels::ScheduleActive)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(Channels::Status)
                            .string()
                            .not_null()
                            .default("offline"),
                    )
                    .col(ColumnDef::new(Channels::HlsUrl).string().null())
                    .col(
                        ColumnDef::new(Channels::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(Channels::UpdatedAt)
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
                    .name("idx_channels_owner")
                    .table(Channels::Table)
                    .col(Channels::OwnerId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(VideoAssets::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(VideoAssets::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(VideoAssets::OwnerId).string().not_null())
                    .col(ColumnDef::new(VideoAssets::Title).string().not_null())
                    .col(ColumnDef::new(VideoAssets::FileUrl).string().not_null())
                    .col(ColumnDef::new(VideoAssets::HlsUrl).string().null())
                    .col(ColumnDef::new(VideoAssets::DurationMinutes).integer().null())
                    .col(
                        ColumnDef::new(VideoAssets::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(VideoAssets::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Channels::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Channels {
    Table,
    Id,
    OwnerId,
    Name,
    IsLive,
    ScheduleActive,
    Status,
    HlsUrl,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum VideoAssets {
    Table,
    Id,
    OwnerId,
    Title,
    FileUrl,
    HlsUrl,
    DurationMinutes,
    CreatedAt,
}
