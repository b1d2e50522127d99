use std::collections::HashMap;

use anyhow::Result;
use chrono::Utc;
use sea_orm::{
    sea_query::Expr, ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, Set,
};
use uuid::Uuid;

use crate::entity::channels::{self, Entity as Channels};
use crate::entity::video_assets::{self, Entity as VideoAssets};

use api::request::RegisterAsset;

pub const STATUS_OFFLINE: &str = "offline";
pub const STATUS_STREAMING: &str = "streaming";

pub struct ChannelsService;

impl ChannelsService {
    pub async fn create<C: ConnectionTrait>(
        db: &C,
        owner_id: String,
        name: String,
    ) -> Result<channels::Model> {
        let now = Utc::now();
        let channel = channels::ActiveModel {
            id: Set(Uuid::new_v4()),
            owner_id: Set(owner_id),
            name: Set(name),
            is_live: Set(false),
            schedule_active: Set(false),
            status: Set(STATUS_OFFLINE.to_string()),
            hls_url: Set(None),
            created_at: Set(now),
            updated_at: Set(now),
        };
        Ok(channel.insert(db).await?)
    }

    pub async fn get<C: ConnectionTrait>(db: &C, id: Uuid) -> Result<Option<channels::Model>> {
        Ok(Channels::find_by_id(id).one(db).await?)
    }

    /// Marks the channel as driven by its schedule. `hls_url` is kept when `None`.
    pub async fn set_on_air<C: ConnectionTrait>(
        db: &C,
        id: Uuid,
        hls_url: Option<String>,
    ) -> Result<()> {
        let mut update = Channels::update_many()
            .col_expr(channels::Column::IsLive, Expr::value(true))
            .col_expr(channels::Column::ScheduleActive, Expr::value(true))
            .col_expr(channels::Column::Status, Expr::value(STATUS_STREAMING))
            .col_expr(channels::Column::UpdatedAt, Expr::value(Utc::now()));
        if let Some(url) = hls_url {
            update = update.col_expr(channels::Column::HlsUrl, Expr::value(url));
        }
        update.filter(channels::Column::Id.eq(id)).exec(db).await?;
        Ok(())
    }

    pub async fn set_offline<C: ConnectionTrait>(db: &C, id: Uuid) -> Result<()> {
        Channels::update_many()
            .col_expr(channels::Column::IsLive, Expr::value(false))
            .col_expr(channels::Column::ScheduleActive, Expr::value(false))
            .col_expr(channels::Column::Status, Expr::value(STATUS_OFFLINE))
            .col_expr(channels::Column::UpdatedAt, Expr::value(Utc::now()))
            .filter(channels::Column::Id.eq(id))
            .exec(db)
            .await?;
        Ok(())
    }

    pub async fn set_live<C: ConnectionTrait>(db: &C, id: Uuid, is_live: bool) -> Result<()> {
        Channels::update_many()
            .col_expr(channels::Column::IsLive, Expr::value(is_live))
            .col_expr(channels::Column::UpdatedAt, Expr::value(Utc::now()))
            .filter(channels::Column::Id.eq(id))
            .exec(db)
            .await?;
        Ok(())
    }

    pub async fn register_asset<C: ConnectionTrait>(
        db: &C,
        owner_id: String,
        req: RegisterAsset,
    ) -> Result<video_assets::Model> {
        let asset = video_assets::ActiveModel {
            id: Set(Uuid::new_v4()),
            owner_id: Set(owner_id),
            title: Set(req.title),
            file_url: Set(req.file_url),
            hls_url: Set(req.hls_url),
            duration_minutes: Set(req.duration_minutes.map(|d| d as i32)),
            created_at: Set(Utc::now()),
        };
        Ok(asset.insert(db).await?)
    }

    pub async fn get_asset<C: ConnectionTrait>(
        db: &C,
        id: Uuid,
    ) -> Result<Option<video_assets::Model>> {
        Ok(VideoAssets::find_by_id(id).one(db).await?)
    }

    pub async fn get_assets<C: ConnectionTrait>(
        db: &C,
        ids: Vec<Uuid>,
    ) -> Result<HashMap<Uuid, api::schedule::VideoAsset>> {
        if ids.is_empty() {
            return Ok(HashMap::new());
        }
        let assets = VideoAssets::find()
            .filter(video_assets::Column::Id.is_in(ids))
            .all(db)
            .await?
            .into_iter()
            .map(|m| (m.id, m.into()))
            .collect();
        Ok(assets)
    }
}
