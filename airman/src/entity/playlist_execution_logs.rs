use sea_orm::entity::prelude::*;

use api::session::{ExecutionLogEntry, LogStatus};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "playlist_execution_logs")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub session_id: Uuid,
    pub program_id: Option<i32>,
    pub status: String, // playing, completed, stopped, error
    pub started_at: DateTimeUtc,
    pub ended_at: Option<DateTimeUtc>,
    pub duration_seconds: Option<i64>,
    pub error_message: Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for ExecutionLogEntry {
    fn from(m: Model) -> Self {
        Self {
            id: m.id,
            session_id: m.session_id,
            program_id: m.program_id,
            status: m.status.parse().unwrap_or(LogStatus::Error),
            started_at: m.started_at,
            ended_at: m.ended_at,
            duration_seconds: m.duration_seconds,
            error_message: m.error_message,
        }
    }
}
