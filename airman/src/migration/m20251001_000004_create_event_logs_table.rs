use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(EventLogs::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(EventLogs::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(EventLogs::ChannelId).uuid().not_null())
                    .col(ColumnDef::new(EventLogs::EventType).string().not_null())
                    .col(ColumnDef::new(EventLogs::Payload).json().not_null())
                    .col(
                        ColumnDef::new(EventLogs::CreatedAt)
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
                    .name("idx_event_logs_channel_type")
                    .table(EventLogs::Table)
                    .col(EventLogs::ChannelId)
                    .col(EventLogs::EventType)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(EventLogs::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum EventLogs {
    Table,
    Id,
    ChannelId,
    EventType,
    Payload,
    CreatedAt,
}
