use anyhow::Result;
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, QueryOrder, Set,
};
use uuid::Uuid;

use crate::entity::program_schedule::{self, Entity as ProgramSchedule};

use api::request::AddProgram;
use api::schedule::ProgramEntry;

pub struct ScheduleService;

impl ScheduleService {
    /// Expects an already validated request
    pub async fn insert<C: ConnectionTrait>(
        db: &C,
        channel_id: Uuid,
        req: AddProgram,
    ) -> Result<program_schedule::Model> {
        let program = program_schedule::ActiveModel {
            channel_id: Set(channel_id),
            title: Set(req.title),
            program_type: Set(req.program_type.to_string()),
            start_time: Set(req.start_time),
            duration_minutes: Set(req.duration_minutes as i32),
            asset_id: Set(req.asset_id),
            live_url: Set(req.live_url),
            repeat_pattern: Set(req.repeat_pattern.unwrap_or_default().to_string()),
            created_at: Set(Utc::now()),
            ..Default::default()
        };
        Ok(program.insert(db).await?)
    }

    pub async fn delete<C: ConnectionTrait>(
        db: &C,
        channel_id: Uuid,
        program_id: i32,
    ) -> Result<u64> {
        let result = ProgramSchedule::delete_many()
            .filter(program_schedule::Column::ChannelId.eq(channel_id))
            .filter(program_schedule::Column::Id.eq(program_id))
            .exec(db)
            .await?;
        Ok(result.rows_affected)
    }

    pub async fn list<C: ConnectionTrait>(db: &C, channel_id: Uuid) -> Result<Vec<ProgramEntry>> {
        let programs = ProgramSchedule::find()
            .filter(program_schedule::Column::ChannelId.eq(channel_id))
            .order_by_asc(program_schedule::Column::StartTime)
            .order_by_asc(program_schedule::Column::Id)
            .all(db)
            .await?
            .into_iter()
            .map(ProgramEntry::from)
            .collect();
        Ok(programs)
    }
}
