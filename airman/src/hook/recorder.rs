use async_trait::async_trait;
use sea_orm::DatabaseConnection;
use tokio::sync::broadcast;
use tracing::{error, trace};

use api::event::Event;

use super::{next_event, EventHook};
use crate::service::events::EventsService;

/// Persists every event into `event_logs`
#[derive(Clone, Debug)]
pub struct EventRecorder {
    db: DatabaseConnection,
}

impl EventRecorder {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl EventHook for EventRecorder {
    async fn hook(&self, mut event_receiver: broadcast::Receiver<Event>) {
        while let Some(event) = next_event(&mut event_receiver).await {
            match EventsService::insert(&self.db, &event).await {
                Ok(record) => trace!(id = %record.id, event_type = record.event_type, "event recorded"),
                Err(err) => error!(
                    channel = %event.channel_id,
                    event_type = %event.r#type,
                    ?err,
                    "failed to record event"
                ),
            }
        }
    }
}
