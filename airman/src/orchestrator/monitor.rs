use std::collections::HashMap;

use chrono::Utc;
use tracing::{debug, warn};
use uuid::Uuid;

use api::event::{EventRecord, EventType};
use api::response::{
    CurrentProgram, CurrentView, ExecutionLogView, LogsView, PlaylistView, ScheduleItem,
    StatsView, StatusView,
};
use api::schedule::Airing;
use api::session::{ExecutionLogEntry, Session, StreamOutput};

use super::{db, elapsed_seconds, Orchestrator};
use crate::resolver::compute_progress;
use crate::result::Result;
use crate::service::{
    events::EventsService, execution_logs::ExecutionLogsService, outputs::OutputsService,
    schedule::ScheduleService, sessions::SessionsService,
};

pub const DEFAULT_LOG_LIMIT: u64 = 100;
const MAX_LOG_LIMIT: u64 = 1000;

impl Orchestrator {
    /// Read only. A channel that never streamed reports no session.
    pub async fn status(&self, channel_id: Uuid) -> Result<StatusView> {
        let now = Utc::now();
        let session =
            db(SessionsService::find_by_channel(&self.db, channel_id).await)?.map(Session::from);
        let entries = db(ScheduleService::list(&self.db, channel_id).await)?;
        let resolution = self.resolver.resolve(&entries, now);

        let provider = match &session {
            Some(s) if s.status.is_running() => {
                match tokio::time::timeout(
                    self.provider_timeout,
                    self.transcoder.status(channel_id),
                )
                .await
                {
                    Ok(Ok(status)) => Some(status),
                    Ok(Err(err)) => {
                        debug!(channel = %channel_id, ?err, "transcoder status unavailable");
                        None
                    }
                    Err(_) => {
                        debug!(channel = %channel_id, "transcoder status timed out");
                        None
                    }
                }
            }
            _ => None,
        };

        Ok(StatusView {
            session,
            current_program: resolution.current.map(|airing| with_progress(airing, now)),
            next_program: resolution.next,
            provider,
        })
    }

    pub async fn get_current(&self, channel_id: Uuid) -> Result<CurrentView> {
        let now = Utc::now();
        let entries = db(ScheduleService::list(&self.db, channel_id).await)?;
        let resolution = self.resolver.resolve(&entries, now);
        Ok(CurrentView {
            current: resolution.current.map(|airing| with_progress(airing, now)),
            next: resolution.next,
        })
    }

    pub async fn get_playlist(&self, channel_id: Uuid) -> Result<PlaylistView> {
        let now = Utc::now();
        let entries = db(ScheduleService::list(&self.db, channel_id).await)?;
        Ok(PlaylistView {
            current: self.resolver.resolve(&entries, now).current,
            past: self.resolver.past(&entries, now),
            upcoming: self.resolver.upcoming(&entries, now),
            total_count: entries.len(),
        })
    }

    /// Every program with how often and when it was last played
    pub async fn get_schedule(&self, channel_id: Uuid) -> Result<Vec<ScheduleItem>> {
        let entries = db(ScheduleService::list(&self.db, channel_id).await)?;
        let ids = entries.iter().map(|p| p.id).collect();
        let logs = ExecutionLogsService::list_for_programs(&self.db, ids)
            .await
            .unwrap_or_else(|err| {
                warn!(channel = %channel_id, ?err, "execution history unavailable");
                vec![]
            });

        // newest first, so the first entry seen per program is its last play
        let mut history: HashMap<i32, (u64, Option<ExecutionLogEntry>)> = HashMap::new();
        for log in logs {
            let Some(program_id) = log.program_id else {
                continue;
            };
            let slot = history.entry(program_id).or_default();
            slot.0 += 1;
            if slot.1.is_none() {
                slot.1 = Some(log.into());
            }
        }

        Ok(entries
            .into_iter()
            .map(|program| {
                let (execution_count, last) = history.remove(&program.id).unwrap_or_default();
                ScheduleItem {
                    program,
                    execution_count,
                    last_played: last.as_ref().map(|l| l.started_at),
                    last_status: last.map(|l| l.status),
                }
            })
            .collect())
    }

    /// Sessions, execution log and audit events, newest first. Unreadable parts come back empty.
    pub async fn get_logs(&self, channel_id: Uuid, limit: Option<u64>) -> Result<LogsView> {
        let limit = limit.unwrap_or(DEFAULT_LOG_LIMIT).clamp(1, MAX_LOG_LIMIT);

        let session = SessionsService::find_by_channel(&self.db, channel_id)
            .await
            .unwrap_or_else(|err| {
                warn!(channel = %channel_id, ?err, "session unavailable");
                None
            });

        let titles: HashMap<i32, String> = ScheduleService::list(&self.db, channel_id)
            .await
            .unwrap_or_default()
            .into_iter()
            .map(|p| (p.id, p.title))
            .collect();

        let executions: Vec<ExecutionLogView> = match &session {
            Some(session) => ExecutionLogsService::list_for_session(&self.db, session.id, Some(limit))
                .await
                .unwrap_or_else(|err| {
                    warn!(channel = %channel_id, ?err, "execution log unavailable");
                    vec![]
                }),
            None => vec![],
        }
        .into_iter()
        .map(|log| ExecutionLogView {
            program_title: log.program_id.and_then(|id| titles.get(&id).cloned()),
            entry: log.into(),
        })
        .collect();

        let events: Vec<EventRecord> = EventsService::list(&self.db, channel_id, limit)
            .await
            .unwrap_or_else(|err| {
                warn!(channel = %channel_id, ?err, "event log unavailable");
                vec![]
            })
            .into_iter()
            .map(EventRecord::from)
            .collect();

        Ok(LogsView {
            sessions: session.into_iter().map(Session::from).collect(),
            executions,
            events,
        })
    }

    /// Aggregated figures. Each part degrades to empty on read failure.
    pub async fn get_stats(&self, channel_id: Uuid) -> Result<StatsView> {
        let now = Utc::now();
        let session = SessionsService::find_by_channel(&self.db, channel_id)
            .await
            .unwrap_or_else(|err| {
                warn!(channel = %channel_id, ?err, "session unavailable");
                None
            })
            .map(Session::from);

        let (total_seconds, programs_played) = match &session {
            Some(session) => {
                let logs = ExecutionLogsService::list_for_session(&self.db, session.id, None)
                    .await
                    .unwrap_or_default();
                let seconds: i64 = logs
                    .iter()
                    .map(|log| {
                        log.duration_seconds
                            .unwrap_or_else(|| elapsed_seconds(log.started_at, now))
                    })
                    .sum();
                let played = ExecutionLogsService::count_completed(&self.db, session.id)
                    .await
                    .unwrap_or_default();
                (seconds, played)
            }
            None => (0, 0),
        };

        let error_count = EventsService::count(&self.db, channel_id, EventType::StreamError)
            .await
            .unwrap_or_default();

        let outputs: Vec<StreamOutput> = OutputsService::list(&self.db, channel_id)
            .await
            .unwrap_or_default()
            .into_iter()
            .map(StreamOutput::from)
            .collect();

        Ok(StatsView {
            is_active: session.as_ref().is_some_and(|s| s.status.is_running()),
            active_session: session.filter(|s| s.status.is_running()),
            total_streaming_minutes: total_seconds / 60,
            programs_played,
            error_count,
            active_outputs: outputs.iter().filter(|o| o.is_active).count(),
            outputs,
        })
    }
}

fn with_progress(airing: Airing, now: chrono::DateTime<Utc>) -> CurrentProgram {
    CurrentProgram {
        progress: compute_progress(&airing, now),
        airing,
    }
}
