use anyhow::Result;
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, Set,
};
use uuid::Uuid;

use crate::entity::streaming_sessions::{self, Entity as StreamingSessions};

use api::session::{SessionMetadata, SessionStatus, SourceType};

pub struct SessionsService;

impl SessionsService {
    pub async fn find_by_channel<C: ConnectionTrait>(
        db: &C,
        channel_id: Uuid,
    ) -> Result<Option<streaming_sessions::Model>> {
        Ok(StreamingSessions::find()
            .filter(streaming_sessions::Column::ChannelId.eq(channel_id))
            .one(db)
            .await?)
    }

    /// Reuses the channel's row when there is one, never creates a second.
    pub async fn activate<C: ConnectionTrait>(
        db: &C,
        channel_id: Uuid,
        current_program_id: Option<i32>,
        metadata: &SessionMetadata,
    ) -> Result<streaming_sessions::Model> {
        let now = Utc::now();
        let metadata = serde_json::to_value(metadata)?;
        match Self::find_by_channel(db, channel_id).await? {
            Some(existing) => {
                Self::update(db, existing, |session| {
                    session.status = Set(SessionStatus::Active.to_string());
                    session.source_type = Set(SourceType::Playlist.to_string());
                    session.current_program_id = Set(current_program_id);
                    session.playlist_position = Set(0);
                    session.started_at = Set(Some(now));
                    session.last_heartbeat = Set(Some(now));
                    session.error_message = Set(None);
                    session.metadata = Set(metadata);
                })
                .await
            }
            None => {
                let session = streaming_sessions::ActiveModel {
                    id: Set(Uuid::new_v4()),
                    channel_id: Set(channel_id),
                    status: Set(SessionStatus::Active.to_string()),
                    source_type: Set(SourceType::Playlist.to_string()),
                    current_program_id: Set(current_program_id),
                    playlist_position: Set(0),
                    started_at: Set(Some(now)),
                    last_heartbeat: Set(Some(now)),
                    error_message: Set(None),
                    metadata: Set(metadata),
                    created_at: Set(now),
                    updated_at: Set(now),
                };
                Ok(session.insert(db).await?)
            }
        }
    }

    pub async fn update<C, F>(
        db: &C,
        model: streaming_sessions::Model,
        f: F,
    ) -> Result<streaming_sessions::Model>
    where
        C: ConnectionTrait,
        F: FnOnce(&mut streaming_sessions::ActiveModel),
    {
        let mut session: streaming_sessions::ActiveModel = model.into();
        f(&mut session);
        session.updated_at = Set(Utc::now());
        Ok(session.update(db).await?)
    }

    pub fn metadata(model: &streaming_sessions::Model) -> SessionMetadata {
        serde_json::from_value(model.metadata.clone()).unwrap_or_default()
    }
}
