use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::event::EventRecord;
use crate::provider::ProviderStatus;
use crate::schedule::{Airing, ProgramEntry, Progress};
use crate::session::{ExecutionLogEntry, LogStatus, Protocol, Session, StreamOutput};

/// Envelope wrapping every API reply
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct ApiResponse<T> {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<ApiError>,
}

impl<T> ApiResponse<T> {
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }
}

impl ApiResponse<()> {
    pub fn err(error: ApiError) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(error),
        }
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct ApiError {
    pub kind: String,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hint: Option<String>,
}

#[derive(Serialize, Deserialize, Clone, Debug)]
#[serde(rename_all = "camelCase")]
pub struct StreamHandle {
    pub external_job_id: Option<String>,
    pub hls_url: Option<String>,
    pub iframe_url: Option<String>,
}

#[derive(Serialize, Deserialize, Clone, Debug)]
#[serde(rename_all = "camelCase")]
pub struct StartResult {
    pub session_id: Uuid,
    pub current_program: Option<Airing>,
    pub stream: StreamHandle,
    /// Set when the channel was already on air and nothing was restarted
    pub already_active: bool,
}

#[derive(Serialize, Deserialize, Clone, Debug, Default)]
#[serde(rename_all = "camelCase")]
pub struct StopResult {
    /// False when the channel was already idle
    pub stopped: bool,
}

#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct AdvanceResult {
    pub program: Airing,
    pub position: u32,
}

#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct SwitchResult {
    pub session: Session,
}

#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct FallbackResult {
    pub session: Session,
    pub program: Option<Airing>,
}

#[derive(Serialize, Deserialize, Clone, Debug)]
#[serde(rename_all = "camelCase")]
pub struct TransmitResult {
    pub protocol: Protocol,
    pub hls_url: String,
    pub iframe_url: Option<String>,
}

#[derive(Serialize, Deserialize, Clone, Debug)]
#[serde(rename_all = "camelCase")]
pub struct HeartbeatResult {
    pub session_id: Uuid,
    pub last_heartbeat: DateTime<Utc>,
}

/// An airing together with how far into it we are
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct CurrentProgram {
    #[serde(flatten)]
    pub airing: Airing,
    pub progress: Progress,
}

#[derive(Serialize, Deserialize, Clone, Debug)]
#[serde(rename_all = "camelCase")]
pub struct StatusView {
    pub session: Option<Session>,
    pub current_program: Option<CurrentProgram>,
    pub next_program: Option<Airing>,
    pub provider: Option<ProviderStatus>,
}

#[derive(Serialize, Deserialize, Clone, Debug)]
#[serde(rename_all = "camelCase")]
pub struct CurrentView {
    pub current: Option<CurrentProgram>,
    pub next: Option<Airing>,
}

#[derive(Serialize, Deserialize, Clone, Debug)]
#[serde(rename_all = "camelCase")]
pub struct PlaylistView {
    pub current: Option<Airing>,
    pub past: Vec<Airing>,
    pub upcoming: Vec<Airing>,
    pub total_count: usize,
}

#[derive(Serialize, Deserialize, Clone, Debug)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleItem {
    #[serde(flatten)]
    pub program: ProgramEntry,
    pub execution_count: u64,
    pub last_played: Option<DateTime<Utc>>,
    pub last_status: Option<LogStatus>,
}

#[derive(Serialize, Deserialize, Clone, Debug)]
#[serde(rename_all = "camelCase")]
pub struct ExecutionLogView {
    #[serde(flatten)]
    pub entry: ExecutionLogEntry,
    pub program_title: Option<String>,
}

#[derive(Serialize, Deserialize, Clone, Debug, Default)]
pub struct LogsView {
    pub sessions: Vec<Session>,
    pub executions: Vec<ExecutionLogView>,
    pub events: Vec<EventRecord>,
}

#[derive(Serialize, Deserialize, Clone, Debug, Default)]
#[serde(rename_all = "camelCase")]
pub struct StatsView {
    pub is_active: bool,
    pub active_session: Option<Session>,
    pub total_streaming_minutes: i64,
    pub programs_played: u64,
    pub error_count: u64,
    pub active_outputs: usize,
    pub outputs: Vec<StreamOutput>,
}
