use serde_json::json;
use tracing::{info, warn};

use api::event::{EventType, ProviderEventKind, ProviderNotification};
use api::request::SourceSwitched;
use api::session::SourceType;

use super::{db, status_of, Orchestrator};
use crate::error::AppError;
use crate::result::Result;
use crate::service::{channels::ChannelsService, sessions::SessionsService};

impl Orchestrator {
    /// Applies a webhook sent by the transcoding provider. Nothing here calls back into it.
    pub async fn handle_provider_notification(&self, n: ProviderNotification) -> Result<()> {
        let channel_id = n.channel_id;
        db(ChannelsService::get(&self.db, channel_id).await)?.ok_or(AppError::ChannelNotFound)?;

        info!(channel = %channel_id, event = %n.event, "provider notification");
        self.emit(
            channel_id,
            EventType::ProviderNotification,
            json!({
                "event": n.event,
                "timestamp": n.timestamp,
                "data": n.data,
                "error": n.error,
            }),
        );

        match n.event {
            ProviderEventKind::StreamStarted => {
                let _guard = self.locks.acquire(channel_id).await;
                db(ChannelsService::set_on_air(&self.db, channel_id, None).await)
            }
            ProviderEventKind::StreamStopped => {
                let _guard = self.locks.acquire(channel_id).await;
                match db(SessionsService::find_by_channel(&self.db, channel_id).await)? {
                    Some(session) if status_of(&session).is_running() => {
                        let session_id = session.id;
                        self.stop_locally(channel_id, session).await?;
                        self.emit(
                            channel_id,
                            EventType::StreamStopped,
                            json!({ "sessionId": session_id, "reason": "provider" }),
                        );
                        Ok(())
                    }
                    _ => Ok(()),
                }
            }
            ProviderEventKind::LiveDisconnected => {
                self.fallback_to_playlist(channel_id).await.map(|_| ())
            }
            ProviderEventKind::SourceSwitched => {
                let switched: SourceSwitched = n
                    .data
                    .map(serde_json::from_value)
                    .transpose()
                    .map_err(AppError::bad_request)?
                    .ok_or_else(|| AppError::bad_request("source_switched needs data.sourceType"))?;
                match switched.source_type {
                    SourceType::Live => self.switch_to_live(channel_id).await.map(|_| ()),
                    SourceType::Playlist => self.fallback_to_playlist(channel_id).await.map(|_| ()),
                }
            }
            ProviderEventKind::Error => {
                let message = n
                    .error
                    .or_else(|| {
                        n.data
                            .as_ref()
                            .and_then(|d| d.get("message"))
                            .and_then(|m| m.as_str())
                            .map(str::to_string)
                    })
                    .unwrap_or_else(|| "transcoder reported an error".to_string());
                match self.report_error(channel_id, message).await {
                    Err(AppError::NoActiveSession) => {
                        warn!(channel = %channel_id, "provider error for an idle channel ignored");
                        Ok(())
                    }
                    other => other.map(|_| ()),
                }
            }
        }
    }
}
