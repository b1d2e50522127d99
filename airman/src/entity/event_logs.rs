use sea_orm::entity::prelude::*;

use api::event::EventRecord;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "event_logs")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub channel_id: Uuid,
    pub event_type: String,
    pub payload: Json,
    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for EventRecord {
    fn from(m: Model) -> Self {
        Self {
            id: m.id,
            channel_id: m.channel_id,
            event_type: m.event_type,
            payload: m.payload,
            created_at: m.created_at,
        }
    }
}
