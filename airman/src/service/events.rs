use anyhow::Result;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, QuerySelect, Set,
};
use uuid::Uuid;

use crate::entity::event_logs::{self, Entity as EventLogs};

use api::event::{Event, EventType};

pub struct EventsService;

impl EventsService {
    pub async fn insert<C: ConnectionTrait>(db: &C, event: &Event) -> Result<event_logs::Model> {
        let record = event_logs::ActiveModel {
            id: Set(Uuid::new_v4()),
            channel_id: Set(event.channel_id),
            event_type: Set(event.r#type.to_string()),
            payload: Set(event.payload.clone()),
            created_at: Set(event.timestamp),
        };
        Ok(record.insert(db).await?)
    }

    pub async fn list<C: ConnectionTrait>(
        db: &C,
        channel_id: Uuid,
        limit: u64,
    ) -> Result<Vec<event_logs::Model>> {
        Ok(EventLogs::find()
            .filter(event_logs::Column::ChannelId.eq(channel_id))
            .order_by_desc(event_logs::Column::CreatedAt)
            .limit(limit)
            .all(db)
            .await?)
    }

    pub async fn count<C: ConnectionTrait>(
        db: &C,
        channel_id: Uuid,
        event_type: EventType,
    ) -> Result<u64> {
        Ok(EventLogs::find()
            .filter(event_logs::Column::ChannelId.eq(channel_id))
            .filter(event_logs::Column::EventType.eq(event_type.to_string()))
            .count(db)
            .await?)
    }
}
