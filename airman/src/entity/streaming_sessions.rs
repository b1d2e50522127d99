use sea_orm::entity::prelude::*;

use api::session::Session;

/// One row per channel, updated in place across start/stop cycles
#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "streaming_sessions")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    #[sea_orm(unique)]
    pub channel_id: Uuid,
    pub status: String,      // idle, active, error
    pub source_type: String, // playlist, live
    pub current_program_id: Option<i32>,
    pub playlist_position: i32,
    pub started_at: Option<DateTimeUtc>,
    pub last_heartbeat: Option<DateTimeUtc>,
    pub error_message: Option<String>,
    pub metadata: Json,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for Session {
    fn from(m: Model) -> Self {
        Self {
            id: m.id,
            channel_id: m.channel_id,
            status: m.status.parse().unwrap_or_default(),
            source_type: m.source_type.parse().unwrap_or_default(),
            current_program_id: m.current_program_id,
            playlist_position: m.playlist_position.max(0) as u32,
            started_at: m.started_at,
            last_heartbeat: m.last_heartbeat,
            error_message: m.error_message,
            metadata: serde_json::from_value(m.metadata).unwrap_or_default(),
            created_at: m.created_at,
            updated_at: m.updated_at,
        }
    }
}
