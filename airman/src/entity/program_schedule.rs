use sea_orm::entity::prelude::*;

use api::schedule::ProgramEntry;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "program_schedule")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub channel_id: Uuid,
    pub title: String,
    pub program_type: String, // vod, live
    pub start_time: DateTimeUtc,
    pub duration_minutes: i32,
    pub asset_id: Option<Uuid>,
    pub live_url: Option<String>,
    pub repeat_pattern: String, // none, daily, weekly
    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for ProgramEntry {
    fn from(m: Model) -> Self {
        Self {
            id: m.id,
            channel_id: m.channel_id,
            title: m.title,
            program_type: m.program_type.parse().unwrap_or_default(),
            start_time: m.start_time,
            duration_minutes: m.duration_minutes.max(0) as u32,
            asset_id: m.asset_id,
            live_url: m.live_url,
            repeat_pattern: m.repeat_pattern.parse().unwrap_or_default(),
        }
    }
}
