pub use sea_orm_migration::prelude::*;

mod m20251001_000001_create_channels_table;
mod m20251001_000002_create_program_schedule_table;
mod m20251001_000003_create_streaming_sessions_table;
mod m20251001_000004_create_event_logs_table;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20251001_000001_create_channels_table::Migration),
            Box::new(m20251001_000002_create_program_schedule_table::Migration),
            Box::new(m20251001_000003_create_streaming_sessions_table::Migration),
            Box::new(m20251001_000004_create_event_logs_table::Migration),
        ]
    }
}
