//! Drives a channel through idle, playlist, live and error states.
//!
//! Every state-changing operation holds the channel lock for its whole
//! duration and follows the same order: resolve, call the transcoder,
//! then persist the result in one transaction. Local state is never
//! written before the transcoder accepted a command.

use std::{collections::HashMap, future::Future, sync::Arc, time::Duration};

use chrono::{DateTime, Utc};
use sea_orm::{DatabaseConnection, Set, TransactionTrait};
use serde_json::json;
use tokio::sync::broadcast;
use tracing::{debug, error, info, warn};
use uuid::Uuid;

use api::event::{Event, EventType};
use api::provider::{StartRequest, TransmitRequest};
use api::request::{OutputConfig, Transmit};
use api::response::{
    AdvanceResult, FallbackResult, HeartbeatResult, StartResult, StopResult, StreamHandle,
    SwitchResult, TransmitResult,
};
use api::schedule::{ProgramEntry, VideoAsset};
use api::session::{LogStatus, Protocol, Session, SessionStatus, SourceType};

use crate::config::Config;
use crate::entity::streaming_sessions;
use crate::error::AppError;
use crate::hook::{recorder::EventRecorder, webhook::WebHook, EventHook};
use crate::lock::ChannelLocks;
use crate::provider::Transcoder;
use crate::resolver::{playable, playable_url, playlist_items, Playable, Resolver};
use crate::result::Result;
use crate::service::{
    channels::ChannelsService, execution_logs::ExecutionLogsService, outputs::OutputsService,
    schedule::ScheduleService, sessions::SessionsService,
};
use crate::new_broadcast_channel;

mod monitor;
mod notify;
mod schedule;

#[derive(Clone)]
pub struct Orchestrator {
    db: DatabaseConnection,
    transcoder: Arc<dyn Transcoder>,
    resolver: Resolver,
    locks: ChannelLocks,
    event_sender: broadcast::Sender<Event>,
    provider_timeout: Duration,
    output_prefix: String,
}

impl Orchestrator {
    pub fn new(db: DatabaseConnection, transcoder: Arc<dyn Transcoder>, cfg: &Config) -> Self {
        let send = new_broadcast_channel!(64);

        let recorder = EventRecorder::new(db.clone());
        let recv = send.subscribe();
        tokio::spawn(async move {
            recorder.hook(recv).await;
        });

        if let Some(url) = cfg.webhook.url.clone() {
            match WebHook::new(url) {
                Ok(webhook) => {
                    let recv = send.subscribe();
                    tokio::spawn(async move {
                        webhook.hook(recv).await;
                    });
                }
                Err(err) => error!(?err, "event webhook disabled"),
            }
        }

        Self {
            db,
            transcoder,
            resolver: Resolver::new(cfg.schedule.tie_break, cfg.schedule.window_size),
            locks: ChannelLocks::default(),
            event_sender: send,
            provider_timeout: Duration::from_millis(cfg.provider.timeout),
            output_prefix: cfg.provider.output_prefix.clone(),
        }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<Event> {
        self.event_sender.subscribe()
    }

    pub fn resolver(&self) -> &Resolver {
        &self.resolver
    }

    /// Start playing the schedule. Returns the existing session untouched when already active.
    pub async fn start(
        &self,
        channel_id: Uuid,
        output: Option<OutputConfig>,
    ) -> Result<StartResult> {
        let _guard = self.locks.acquire(channel_id).await;
        let now = Utc::now();
        let entries = db(ScheduleService::list(&self.db, channel_id).await)?;

        if let Some(session) = db(SessionsService::find_by_channel(&self.db, channel_id).await)? {
            if status_of(&session) == SessionStatus::Active {
                info!(channel = %channel_id, session = %session.id, "stream already active");
                let session = Session::from(session);
                return Ok(StartResult {
                    session_id: session.id,
                    current_program: self.resolver.resolve(&entries, now).current,
                    stream: StreamHandle {
                        external_job_id: session.metadata.external_job_id,
                        hls_url: session.metadata.hls_url,
                        iframe_url: session.metadata.iframe_url,
                    },
                    already_active: true,
                });
            }
        }

        let window = self.playable_window(&entries, now).await?;
        let first = match window.first() {
            Some(first) => first.airing.clone(),
            None => {
                info!(channel = %channel_id, programs = entries.len(), "nothing to play");
                return Err(AppError::NoScheduledContent);
            }
        };
        let playlist = playlist_items(&window);

        let program_count = playlist.len();
        let started = self
            .call(
                "start",
                self.transcoder.start(StartRequest {
                    channel_id,
                    playlist,
                    output_path: format!("{}/{}", self.output_prefix, channel_id),
                }),
            )
            .await?;

        let metadata = api::session::SessionMetadata {
            external_job_id: Some(started.external_job_id.clone()),
            hls_url: non_empty(&started.hls_url),
            iframe_url: started.iframe_url.clone(),
            current_title: Some(first.program.title.clone()),
            program_type: Some(first.program.program_type),
            program_count: Some(program_count as u32),
            stopped_at: None,
            provider: None,
        };

        let persisted = async {
            let txn = self.db.begin().await?;
            let session =
                SessionsService::activate(&txn, channel_id, Some(first.program.id), &metadata)
                    .await?;
            ExecutionLogsService::close_open(&txn, session.id, LogStatus::Stopped, now).await?;
            ExecutionLogsService::open(&txn, session.id, Some(first.program.id), now).await?;
            if let Some(output) = output {
                OutputsService::insert(&txn, channel_id, session.id, output).await?;
            }
            ChannelsService::set_on_air(&txn, channel_id, metadata.hls_url.clone()).await?;
            txn.commit().await?;
            anyhow::Ok(session)
        }
        .await;
        let session = persisted.map_err(|err| inconsistency(channel_id, "start", err))?;

        info!(
            channel = %channel_id,
            session = %session.id,
            program = first.program.id,
            job = started.external_job_id,
            "stream started"
        );
        self.emit(
            channel_id,
            EventType::StreamStarted,
            json!({
                "sessionId": session.id,
                "programId": first.program.id,
                "title": first.program.title,
                "externalJobId": started.external_job_id,
                "hlsUrl": started.hls_url,
                "playlistSize": program_count,
            }),
        );

        Ok(StartResult {
            session_id: session.id,
            current_program: Some(first),
            stream: StreamHandle {
                external_job_id: Some(started.external_job_id),
                hls_url: metadata.hls_url,
                iframe_url: started.iframe_url,
            },
            already_active: false,
        })
    }

    /// Idempotent. Local cleanup happens even when the transcoder rejects the stop,
    /// the transcoder error is returned afterwards.
    pub async fn stop(&self, channel_id: Uuid) -> Result<StopResult> {
        let _guard = self.locks.acquire(channel_id).await;

        let session = match db(SessionsService::find_by_channel(&self.db, channel_id).await)? {
            Some(session) if status_of(&session).is_running() => session,
            _ => {
                debug!(channel = %channel_id, "stop on idle channel");
                return Ok(StopResult { stopped: false });
            }
        };

        let external = self
            .call("stop", self.transcoder.stop(channel_id))
            .await;
        let session_id = session.id;
        self.stop_locally(channel_id, session).await?;

        let provider_error = external.as_ref().err().map(AppError::message);
        self.emit(
            channel_id,
            EventType::StreamStopped,
            json!({ "sessionId": session_id, "providerError": provider_error }),
        );
        external?;

        info!(channel = %channel_id, session = %session_id, "stream stopped");
        Ok(StopResult { stopped: true })
    }

    /// Session to idle, open log closed, outputs deactivated, channel flags cleared
    async fn stop_locally(
        &self,
        channel_id: Uuid,
        session: streaming_sessions::Model,
    ) -> Result<()> {
        let now = Utc::now();
        let mut metadata = SessionsService::metadata(&session);
        metadata.stopped_at = Some(now);
        let metadata = serde_json::to_value(&metadata)?;

        let persisted = async {
            let txn = self.db.begin().await?;
            let session = SessionsService::update(&txn, session, |s| {
                s.status = Set(SessionStatus::Idle.to_string());
                s.source_type = Set(SourceType::Playlist.to_string());
                s.metadata = Set(metadata);
            })
            .await?;
            ExecutionLogsService::close_open(&txn, session.id, LogStatus::Stopped, now).await?;
            OutputsService::deactivate_for_channel(&txn, channel_id).await?;
            ChannelsService::set_offline(&txn, channel_id).await?;
            txn.commit().await?;
            anyhow::Ok(())
        }
        .await;
        persisted.map_err(|err| inconsistency(channel_id, "stop", err))
    }

    /// Moves to the next airing of the playlist window, wrapping to the first one.
    pub async fn advance_to_next(&self, channel_id: Uuid) -> Result<AdvanceResult> {
        let _guard = self.locks.acquire(channel_id).await;
        let session = self.running_session(channel_id).await?;
        let now = Utc::now();

        let entries = db(ScheduleService::list(&self.db, channel_id).await)?;
        let window = self.playable_window(&entries, now).await?;
        if window.is_empty() {
            return Err(AppError::NoScheduledContent);
        }
        let position = (session.playlist_position.max(0) as usize + 1) % window.len();
        let Playable { airing, media_url } = window[position].clone();

        let previous = session.current_program_id;
        let mut metadata = SessionsService::metadata(&session);
        metadata.current_title = Some(airing.program.title.clone());
        metadata.program_type = Some(airing.program.program_type);
        let metadata = serde_json::to_value(&metadata)?;

        let persisted = async {
            let txn = self.db.begin().await?;
            ExecutionLogsService::close_open(&txn, session.id, LogStatus::Completed, now).await?;
            ExecutionLogsService::open(&txn, session.id, Some(airing.program.id), now).await?;
            let session = SessionsService::update(&txn, session, |s| {
                s.status = Set(SessionStatus::Active.to_string());
                s.current_program_id = Set(Some(airing.program.id));
                s.playlist_position = Set(position as i32);
                s.error_message = Set(None);
                s.metadata = Set(metadata);
            })
            .await?;
            ChannelsService::set_on_air(&txn, channel_id, Some(media_url)).await?;
            txn.commit().await?;
            anyhow::Ok(session)
        }
        .await;
        let session = persisted.map_err(AppError::database)?;

        info!(
            channel = %channel_id,
            program = airing.program.id,
            position,
            "advanced to next program"
        );
        self.emit(
            channel_id,
            EventType::ProgramAdvanced,
            json!({
                "sessionId": session.id,
                "previousProgramId": previous,
                "programId": airing.program.id,
                "title": airing.program.title,
                "position": position,
            }),
        );

        Ok(AdvanceResult {
            program: airing,
            position: position as u32,
        })
    }

    /// Only the source changes, the playlist position is kept for a later fallback.
    pub async fn switch_to_live(&self, channel_id: Uuid) -> Result<SwitchResult> {
        let _guard = self.locks.acquire(channel_id).await;
        let session = self.running_session(channel_id).await?;

        let persisted = async {
            let txn = self.db.begin().await?;
            let session = SessionsService::update(&txn, session, |s| {
                s.source_type = Set(SourceType::Live.to_string());
            })
            .await?;
            ChannelsService::set_live(&txn, channel_id, true).await?;
            txn.commit().await?;
            anyhow::Ok(session)
        }
        .await;
        let session = Session::from(persisted.map_err(AppError::database)?);

        info!(channel = %channel_id, session = %session.id, "switched to live source");
        self.emit(
            channel_id,
            EventType::SwitchedToLive,
            json!({ "sessionId": session.id }),
        );
        Ok(SwitchResult { session })
    }

    /// Back to the schedule after the live source went away. The current
    /// program is re-resolved at this instant.
    pub async fn fallback_to_playlist(&self, channel_id: Uuid) -> Result<FallbackResult> {
        let _guard = self.locks.acquire(channel_id).await;
        let session = self.running_session(channel_id).await?;
        let now = Utc::now();

        let entries = db(ScheduleService::list(&self.db, channel_id).await)?;
        let current = self.resolver.resolve(&entries, now).current;
        let url = match &current {
            Some(airing) => self.program_url(&airing.program).await?,
            None => None,
        };
        let program_id = current.as_ref().map(|a| a.program.id);
        let changed = session.current_program_id != program_id;

        let mut metadata = SessionsService::metadata(&session);
        if let Some(airing) = &current {
            metadata.current_title = Some(airing.program.title.clone());
            metadata.program_type = Some(airing.program.program_type);
        }
        let metadata = serde_json::to_value(&metadata)?;

        let persisted = async {
            let txn = self.db.begin().await?;
            if changed {
                ExecutionLogsService::close_open(&txn, session.id, LogStatus::Completed, now)
                    .await?;
                if let Some(id) = program_id {
                    ExecutionLogsService::open(&txn, session.id, Some(id), now).await?;
                }
            }
            let session = SessionsService::update(&txn, session, |s| {
                s.status = Set(SessionStatus::Active.to_string());
                s.source_type = Set(SourceType::Playlist.to_string());
                s.current_program_id = Set(program_id);
                if program_id.is_some() {
                    s.playlist_position = Set(0);
                }
                s.metadata = Set(metadata);
            })
            .await?;
            ChannelsService::set_on_air(&txn, channel_id, url).await?;
            txn.commit().await?;
            anyhow::Ok(session)
        }
        .await;
        let session = Session::from(persisted.map_err(AppError::database)?);

        info!(channel = %channel_id, program = ?program_id, "fell back to playlist");
        self.emit(
            channel_id,
            EventType::FallbackToPlaylist,
            json!({
                "sessionId": session.id,
                "programId": program_id,
                "title": current.as_ref().map(|a| a.program.title.clone()),
            }),
        );
        Ok(FallbackResult {
            session,
            program: current,
        })
    }

    /// Informational only, playback keeps going. An idle channel has nothing
    /// to fail, so it stays idle and the report is refused.
    pub async fn report_error(&self, channel_id: Uuid, message: String) -> Result<Session> {
        if message.trim().is_empty() {
            return Err(AppError::bad_request("error message is required"));
        }
        let _guard = self.locks.acquire(channel_id).await;
        let session = self.running_session(channel_id).await?;

        let now = Utc::now();
        let session = SessionsService::update(&self.db, session, |s| {
            s.status = Set(SessionStatus::Error.to_string());
            s.error_message = Set(Some(message.clone()));
            s.last_heartbeat = Set(Some(now));
        })
        .await
        .map_err(AppError::database)?;

        warn!(channel = %channel_id, session = %session.id, error = %message, "stream error reported");
        self.emit(
            channel_id,
            EventType::StreamError,
            json!({ "sessionId": session.id, "message": message }),
        );
        Ok(session.into())
    }

    pub async fn heartbeat(
        &self,
        channel_id: Uuid,
        provider: Option<serde_json::Value>,
    ) -> Result<HeartbeatResult> {
        let _guard = self.locks.acquire(channel_id).await;
        let session = self.running_session(channel_id).await?;
        let now = Utc::now();

        let mut metadata = SessionsService::metadata(&session);
        if provider.is_some() {
            metadata.provider = provider;
        }
        let metadata = serde_json::to_value(&metadata)?;

        let session = SessionsService::update(&self.db, session, |s| {
            s.last_heartbeat = Set(Some(now));
            s.metadata = Set(metadata);
        })
        .await
        .map_err(AppError::database)?;

        debug!(channel = %channel_id, session = %session.id, "heartbeat");
        Ok(HeartbeatResult {
            session_id: session.id,
            last_heartbeat: now,
        })
    }

    /// Pushes the channel output to an extra destination.
    pub async fn transmit(&self, channel_id: Uuid, req: Transmit) -> Result<TransmitResult> {
        if matches!(req.protocol, Protocol::Udp | Protocol::Rtmp) && req.target.is_none() {
            return Err(AppError::bad_request(format!(
                "a target is required for {} output",
                req.protocol
            )));
        }
        let _guard = self.locks.acquire(channel_id).await;

        let transmitted = self
            .call(
                "transmit",
                self.transcoder.transmit(TransmitRequest {
                    channel_id,
                    protocol: req.protocol,
                    target: req.target.clone(),
                }),
            )
            .await?;
        let hls_url = non_empty(&transmitted.hls_url);
        let target = req
            .target
            .clone()
            .or(hls_url.clone())
            .unwrap_or_default();

        let persisted = async {
            let txn = self.db.begin().await?;
            ChannelsService::set_on_air(&txn, channel_id, hls_url.clone()).await?;
            let session = SessionsService::find_by_channel(&txn, channel_id).await?;
            let session_id = session.as_ref().map(|s| s.id);
            if let Some(session) = session.filter(|s| status_of(s).is_running()) {
                SessionsService::update(&txn, session, |s| {
                    s.status = Set(SessionStatus::Active.to_string());
                })
                .await?;
            }
            OutputsService::upsert_transmit(&txn, channel_id, session_id, req.protocol, target)
                .await?;
            txn.commit().await?;
            anyhow::Ok(())
        }
        .await;
        persisted.map_err(|err| inconsistency(channel_id, "transmit", err))?;

        info!(channel = %channel_id, protocol = %req.protocol, "transmission started");
        self.emit(
            channel_id,
            EventType::TransmissionStarted,
            json!({
                "protocol": req.protocol,
                "target": req.target,
                "hlsUrl": transmitted.hls_url,
            }),
        );

        Ok(TransmitResult {
            protocol: req.protocol,
            hls_url: transmitted.hls_url,
            iframe_url: transmitted.iframe_url,
        })
    }

    async fn running_session(&self, channel_id: Uuid) -> Result<streaming_sessions::Model> {
        match db(SessionsService::find_by_channel(&self.db, channel_id).await)? {
            Some(session) if status_of(&session).is_running() => Ok(session),
            _ => Err(AppError::NoActiveSession),
        }
    }

    /// The resolver window restricted to airings the provider can play
    async fn playable_window(
        &self,
        entries: &[ProgramEntry],
        now: DateTime<Utc>,
    ) -> Result<Vec<Playable>> {
        let window = self.resolver.window(entries, now);
        let ids = window.iter().filter_map(|a| a.program.asset_id).collect();
        let assets: HashMap<Uuid, VideoAsset> =
            db(ChannelsService::get_assets(&self.db, ids).await)?;
        Ok(playable(window, |p| {
            p.asset_id.and_then(|id| assets.get(&id))
        }))
    }

    async fn program_url(&self, program: &ProgramEntry) -> Result<Option<String>> {
        let asset = match program.asset_id {
            Some(id) => db(ChannelsService::get_asset(&self.db, id).await)?.map(VideoAsset::from),
            None => None,
        };
        Ok(playable_url(program, asset.as_ref()))
    }

    /// Transcoder call bounded by the configured timeout. A timeout counts as a provider error.
    async fn call<T, F>(&self, op: &'static str, fut: F) -> Result<T>
    where
        F: Future<Output = anyhow::Result<T>>,
    {
        match tokio::time::timeout(self.provider_timeout, fut).await {
            Ok(Ok(value)) => Ok(value),
            Ok(Err(err)) => {
                warn!(op, ?err, "transcoder call failed");
                Err(AppError::provider(err))
            }
            Err(_) => {
                warn!(op, timeout = ?self.provider_timeout, "transcoder call timed out");
                Err(AppError::provider(format!(
                    "transcoder {} timed out after {}ms",
                    op,
                    self.provider_timeout.as_millis()
                )))
            }
        }
    }

    /// Fire and forget
    fn emit(&self, channel_id: Uuid, r#type: EventType, payload: serde_json::Value) {
        if let Err(err) = self
            .event_sender
            .send(Event::new(channel_id, r#type, payload))
        {
            warn!(channel = %channel_id, event_type = %r#type, ?err, "failed to publish event");
        }
    }
}

fn status_of(session: &streaming_sessions::Model) -> SessionStatus {
    session.status.parse().unwrap_or_default()
}

fn non_empty(s: &str) -> Option<String> {
    (!s.is_empty()).then(|| s.to_string())
}

fn db<T>(result: anyhow::Result<T>) -> Result<T> {
    result.map_err(AppError::database)
}

fn inconsistency(channel_id: Uuid, op: &str, err: anyhow::Error) -> AppError {
    error!(
        channel = %channel_id,
        op,
        ?err,
        "transcoder accepted the command but local state was not saved"
    );
    AppError::PersistenceInconsistency(err.to_string())
}

fn elapsed_seconds(from: DateTime<Utc>, to: DateTime<Utc>) -> i64 {
    (to - from).num_seconds().max(0)
}
