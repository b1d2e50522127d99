use uuid::Uuid;

use api::request::{AddProgram, CreateChannel, RegisterAsset};
use api::schedule::{Channel, ProgramEntry, ProgramType, VideoAsset};
use auth::claims::Claims;

use super::{db, Orchestrator};
use crate::entity::channels;
use crate::error::AppError;
use crate::result::Result;
use crate::service::{channels::ChannelsService, schedule::ScheduleService};

impl Orchestrator {
    /// The channel, if the caller owns it or is an administrator
    pub async fn authorize(&self, channel_id: Uuid, claims: &Claims) -> Result<channels::Model> {
        let channel = db(ChannelsService::get(&self.db, channel_id).await)?
            .ok_or(AppError::ChannelNotFound)?;
        if !claims.can_access(&channel.owner_id) {
            return Err(AppError::AccessDenied);
        }
        Ok(channel)
    }

    pub async fn create_channel(&self, owner: &Claims, req: CreateChannel) -> Result<Channel> {
        let name = req.name.trim();
        if name.is_empty() {
            return Err(AppError::bad_request("channel name is required"));
        }
        let channel =
            db(ChannelsService::create(&self.db, owner.sub.clone(), name.to_string()).await)?;
        Ok(channel.into())
    }

    pub async fn get_channel(&self, channel_id: Uuid, claims: &Claims) -> Result<Channel> {
        Ok(self.authorize(channel_id, claims).await?.into())
    }

    pub async fn register_asset(&self, owner: &Claims, req: RegisterAsset) -> Result<VideoAsset> {
        if req.title.trim().is_empty() || req.file_url.trim().is_empty() {
            return Err(AppError::bad_request("asset title and fileUrl are required"));
        }
        let asset = db(ChannelsService::register_asset(&self.db, owner.sub.clone(), req).await)?;
        Ok(asset.into())
    }

    pub async fn add_program(&self, channel_id: Uuid, req: AddProgram) -> Result<ProgramEntry> {
        if req.title.trim().is_empty() {
            return Err(AppError::bad_request("program title is required"));
        }
        if req.duration_minutes <= 0 || req.duration_minutes > i32::MAX as i64 {
            return Err(AppError::bad_request(
                "durationMinutes must be a positive number of minutes",
            ));
        }
        if let Some(asset_id) = req.asset_id {
            if db(ChannelsService::get_asset(&self.db, asset_id).await)?.is_none() {
                return Err(AppError::bad_request(format!("unknown asset {}", asset_id)));
            }
        }
        if req.program_type == ProgramType::Live && req.live_url.is_none() && req.asset_id.is_none()
        {
            return Err(AppError::bad_request(
                "live programs need a liveUrl or an asset",
            ));
        }
        let program = db(ScheduleService::insert(&self.db, channel_id, req).await)?;
        Ok(program.into())
    }

    /// Sessions and logs keep their reference to the deleted program
    pub async fn delete_program(&self, channel_id: Uuid, program_id: i32) -> Result<()> {
        match db(ScheduleService::delete(&self.db, channel_id, program_id).await)? {
            0 => Err(AppError::ProgramNotFound),
            _ => Ok(()),
        }
    }

    pub async fn list_programs(&self, channel_id: Uuid) -> Result<Vec<ProgramEntry>> {
        db(ScheduleService::list(&self.db, channel_id).await)
    }
}
