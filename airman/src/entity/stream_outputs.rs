use sea_orm::entity::prelude::*;

use api::session::StreamOutput;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "stream_outputs")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub channel_id: Uuid,
    pub session_id: Option<Uuid>,
    pub protocol: String, // hls, udp, rtmp, http
    pub target_url: String,
    pub is_active: bool,
    pub bitrate_kbps: Option<i32>,
    pub resolution: Option<String>,
    pub last_status: Option<String>,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for StreamOutput {
    fn from(m: Model) -> Self {
        Self {
            id: m.id,
            channel_id: m.channel_id,
            session_id: m.session_id,
            protocol: m.protocol.parse().unwrap_or_default(),
            target_url: m.target_url,
            is_active: m.is_active,
            bitrate_kbps: m.bitrate_kbps.map(|b| b.max(0) as u32),
            resolution: m.resolution,
            last_status: m.last_status,
        }
    }
}
