use anyhow::Result;
use chrono::{DateTime, Utc};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, QuerySelect, Set,
};
use uuid::Uuid;

use crate::entity::playlist_execution_logs::{self, Entity as ExecutionLogs};

use api::session::LogStatus;

pub struct ExecutionLogsService;

impl ExecutionLogsService {
    pub async fn open<C: ConnectionTrait>(
        db: &C,
        session_id: Uuid,
        program_id: Option<i32>,
        started_at: DateTime<Utc>,
    ) -> Result<playlist_execution_logs::Model> {
        let entry = playlist_execution_logs::ActiveModel {
            id: Set(Uuid::new_v4()),
            session_id: Set(session_id),
            program_id: Set(program_id),
            status: Set(LogStatus::Playing.to_string()),
            started_at: Set(started_at),
            ended_at: Set(None),
            duration_seconds: Set(None),
            error_message: Set(None),
        };
        Ok(entry.insert(db).await?)
    }

    /// Closes every entry of the session still marked playing. Returns how many were closed.
    pub async fn close_open<C: ConnectionTrait>(
        db: &C,
        session_id: Uuid,
        status: LogStatus,
        ended_at: DateTime<Utc>,
    ) -> Result<u64> {
        let open = ExecutionLogs::find()
            .filter(playlist_execution_logs::Column::SessionId.eq(session_id))
            .filter(playlist_execution_logs::Column::EndedAt.is_null())
            .all(db)
            .await?;

        let count = open.len() as u64;
        for entry in open {
            let duration = (ended_at - entry.started_at).num_seconds().max(0);
            let mut entry: playlist_execution_logs::ActiveModel = entry.into();
            entry.status = Set(status.to_string());
            entry.ended_at = Set(Some(ended_at));
            entry.duration_seconds = Set(Some(duration));
            entry.update(db).await?;
        }
        Ok(count)
    }

    pub async fn count_open<C: ConnectionTrait>(db: &C, session_id: Uuid) -> Result<u64> {
        Ok(ExecutionLogs::find()
            .filter(playlist_execution_logs::Column::SessionId.eq(session_id))
            .filter(playlist_execution_logs::Column::EndedAt.is_null())
            .count(db)
            .await?)
    }

    pub async fn list_for_session<C: ConnectionTrait>(
        db: &C,
        session_id: Uuid,
        limit: Option<u64>,
    ) -> Result<Vec<playlist_execution_logs::Model>> {
        let mut query = ExecutionLogs::find()
            .filter(playlist_execution_logs::Column::SessionId.eq(session_id))
            .order_by_desc(playlist_execution_logs::Column::StartedAt);

        if let Some(limit) = limit {
            query = query.limit(limit);
        }

        Ok(query.all(db).await?)
    }

    pub async fn list_for_programs<C: ConnectionTrait>(
        db: &C,
        program_ids: Vec<i32>,
    ) -> Result<Vec<playlist_execution_logs::Model>> {
        if program_ids.is_empty() {
            return Ok(vec![]);
        }
        Ok(ExecutionLogs::find()
            .filter(playlist_execution_logs::Column::ProgramId.is_in(program_ids))
            .order_by_desc(playlist_execution_logs::Column::StartedAt)
            .all(db)
            .await?)
    }

    pub async fn count_completed<C: ConnectionTrait>(db: &C, session_id: Uuid) -> Result<u64> {
        Ok(ExecutionLogs::find()
            .filter(playlist_execution_logs::Column::SessionId.eq(session_id))
            .filter(playlist_execution_logs::Column::Status.eq(LogStatus::Completed.to_string()))
            .count(db)
            .await?)
    }
}
