use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::schedule::ProgramType;
use crate::string_enum;

/// Session lifecycle status
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionStatus {
    #[default]
    Idle,
    /// Output is being driven by this channel's schedule or live source
    Active,
    /// A failure was reported, playback is not stopped
    Error,
}

string_enum!(SessionStatus {
    Idle => "idle",
    Active => "active",
    Error => "error",
});

impl SessionStatus {
    /// Whether the external provider is expected to be playing for this session.
    pub fn is_running(&self) -> bool {
        matches!(self, SessionStatus::Active | SessionStatus::Error)
    }
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceType {
    #[default]
    Playlist,
    Live,
}

string_enum!(SourceType {
    Playlist => "playlist",
    Live => "live",
});

/// Diagnostic context attached to a session
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SessionMetadata {
    /// Job id returned by the transcoding provider on start
    pub external_job_id: Option<String>,
    pub hls_url: Option<String>,
    pub iframe_url: Option<String>,
    pub current_title: Option<String>,
    pub program_type: Option<ProgramType>,
    pub program_count: Option<u32>,
    pub stopped_at: Option<DateTime<Utc>>,
    /// Provider payload reported through heartbeats, kept as received
    pub provider: Option<serde_json::Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    pub id: Uuid,
    pub channel_id: Uuid,
    pub status: SessionStatus,
    pub source_type: SourceType,
    /// Weak reference to the program being played
    pub current_program_id: Option<i32>,
    pub playlist_position: u32,
    pub started_at: Option<DateTime<Utc>>,
    pub last_heartbeat: Option<DateTime<Utc>>,
    pub error_message: Option<String>,
    pub metadata: SessionMetadata,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Execution log entry status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogStatus {
    /// Program is currently on air
    Playing,
    /// Program finished or was advanced past
    Completed,
    /// Playback was stopped by an operator
    Stopped,
    Error,
}

string_enum!(LogStatus {
    Playing => "playing",
    Completed => "completed",
    Stopped => "stopped",
    Error => "error",
});

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExecutionLogEntry {
    pub id: Uuid,
    pub session_id: Uuid,
    pub program_id: Option<i32>,
    pub status: LogStatus,
    pub started_at: DateTime<Utc>,
    pub ended_at: Option<DateTime<Utc>>,
    pub duration_seconds: Option<i64>,
    pub error_message: Option<String>,
}

/// Output transport accepted by the transcoding provider
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Protocol {
    #[default]
    Hls,
    Udp,
    Rtmp,
    Http,
}

string_enum!(Protocol {
    Hls => "hls",
    Udp => "udp",
    Rtmp => "rtmp",
    Http => "http",
});

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StreamOutput {
    pub id: Uuid,
    pub channel_id: Uuid,
    pub session_id: Option<Uuid>,
    pub protocol: Protocol,
    pub target_url: String,
    pub is_active: bool,
    pub bitrate_kbps: Option<u32>,
    pub resolution: Option<String>,
    pub last_status: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_running_status() {
        assert!(!SessionStatus::Idle.is_running());
        assert!(SessionStatus::Active.is_running());
        assert!(SessionStatus::Error.is_running());
    }

    #[test]
    fn test_metadata_tolerates_missing_fields() {
        let metadata: SessionMetadata =
            serde_json::from_str(r#"{"externalJobId":"job-1"}"#).unwrap();
        assert_eq!(metadata.external_job_id.as_deref(), Some("job-1"));
        assert_eq!(metadata.current_title, None);
    }
}
