use anyhow::Result;
use chrono::Utc;
use sea_orm::{
    sea_query::Expr, ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter,
    QueryOrder, Set,
};
use uuid::Uuid;

use crate::entity::stream_outputs::{self, Entity as StreamOutputs};

use api::request::OutputConfig;
use api::session::Protocol;

pub struct OutputsService;

impl OutputsService {
    pub async fn insert<C: ConnectionTrait>(
        db: &C,
        channel_id: Uuid,
        session_id: Uuid,
        config: OutputConfig,
    ) -> Result<stream_outputs::Model> {
        let now = Utc::now();
        let output = stream_outputs::ActiveModel {
            id: Set(Uuid::new_v4()),
            channel_id: Set(channel_id),
            session_id: Set(Some(session_id)),
            protocol: Set(config.protocol.to_string()),
            target_url: Set(config.target_url),
            is_active: Set(true),
            bitrate_kbps: Set(config.bitrate.map(|b| b as i32)),
            resolution: Set(config.resolution),
            last_status: Set(Some("started".to_string())),
            created_at: Set(now),
            updated_at: Set(now),
        };
        Ok(output.insert(db).await?)
    }

    /// One row per (channel, protocol): a repeated transmit re-targets the existing output.
    pub async fn upsert_transmit<C: ConnectionTrait>(
        db: &C,
        channel_id: Uuid,
        session_id: Option<Uuid>,
        protocol: Protocol,
        target_url: String,
    ) -> Result<stream_outputs::Model> {
        let now = Utc::now();
        let existing = StreamOutputs::find()
            .filter(stream_outputs::Column::ChannelId.eq(channel_id))
            .filter(stream_outputs::Column::Protocol.eq(protocol.to_string()))
            .one(db)
            .await?;

        match existing {
            Some(output) => {
                let mut output: stream_outputs::ActiveModel = output.into();
                output.session_id = Set(session_id);
                output.target_url = Set(target_url);
                output.is_active = Set(true);
                output.last_status = Set(Some("transmitting".to_string()));
                output.updated_at = Set(now);
                Ok(output.update(db).await?)
            }
            None => {
                let output = stream_outputs::ActiveModel {
                    id: Set(Uuid::new_v4()),
                    channel_id: Set(channel_id),
                    session_id: Set(session_id),
                    protocol: Set(protocol.to_string()),
                    target_url: Set(target_url),
                    is_active: Set(true),
                    bitrate_kbps: Set(None),
                    resolution: Set(None),
                    last_status: Set(Some("transmitting".to_string())),
                    created_at: Set(now),
                    updated_at: Set(now),
                };
                Ok(output.insert(db).await?)
            }
        }
    }

    pub async fn deactivate_for_channel<C: ConnectionTrait>(db: &C, channel_id: Uuid) -> Result<u64> {
        let result = StreamOutputs::update_many()
            .col_expr(stream_outputs::Column::IsActive, Expr::value(false))
            .col_expr(stream_outputs::Column::LastStatus, Expr::value("stopped"))
            .col_expr(stream_outputs::Column::UpdatedAt, Expr::value(Utc::now()))
            .filter(stream_outputs::Column::ChannelId.eq(channel_id))
            .filter(stream_outputs::Column::IsActive.eq(true))
            .exec(db)
            .await?;
        Ok(result.rows_affected)
    }

    pub async fn list<C: ConnectionTrait>(
        db: &C,
        channel_id: Uuid,
    ) -> Result<Vec<stream_outputs::Model>> {
        Ok(StreamOutputs::find()
            .filter(stream_outputs::Column::ChannelId.eq(channel_id))
            .order_by_desc(stream_outputs::Column::UpdatedAt)
            .all(db)
            .await?)
    }
}
