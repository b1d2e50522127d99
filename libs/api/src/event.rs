use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::string_enum;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventType {
    StreamStarted,
    StreamStopped,
    ProgramAdvanced,
    SwitchedToLive,
    FallbackToPlaylist,
    StreamError,
    TransmissionStarted,
    /// Notification received from the transcoding provider
    ProviderNotification,
}

string_enum!(EventType {
    StreamStarted => "stream_started",
    StreamStopped => "stream_stopped",
    ProgramAdvanced => "program_advanced",
    SwitchedToLive => "switched_to_live",
    FallbackToPlaylist => "fallback_to_playlist",
    StreamError => "stream_error",
    TransmissionStarted => "transmission_started",
    ProviderNotification => "provider_notification",
});

/// Audit trail entry for a state-changing operation
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    pub channel_id: Uuid,
    pub r#type: EventType,
    pub payload: serde_json::Value,
    pub timestamp: DateTime<Utc>,
}

impl Event {
    pub fn new(channel_id: Uuid, r#type: EventType, payload: serde_json::Value) -> Self {
        Self {
            channel_id,
            r#type,
            payload,
            timestamp: Utc::now(),
        }
    }
}

/// Stored audit event
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventRecord {
    pub id: Uuid,
    pub channel_id: Uuid,
    pub event_type: String,
    pub payload: serde_json::Value,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProviderEventKind {
    StreamStarted,
    StreamStopped,
    LiveDisconnected,
    SourceSwitched,
    Error,
}

string_enum!(ProviderEventKind {
    StreamStarted => "stream_started",
    StreamStopped => "stream_stopped",
    LiveDisconnected => "live_disconnected",
    SourceSwitched => "source_switched",
    Error => "error",
});

/// Inbound webhook body posted by the transcoding provider
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProviderNotification {
    pub channel_id: Uuid,
    pub event: ProviderEventKind,
    pub timestamp: Option<DateTime<Utc>>,
    #[serde(default)]
    pub data: Option<serde_json::Value>,
    #[serde(default)]
    pub error: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_type_wire_name() {
        assert_eq!(
            serde_json::to_string(&EventType::FallbackToPlaylist).unwrap(),
            "\"fallback_to_playlist\""
        );
        assert_eq!(EventType::StreamError.as_str(), "stream_error");
    }

    #[test]
    fn test_provider_notification() {
        let notification: ProviderNotification = serde_json::from_str(
            r#"{"channelId":"00000000-0000-0000-0000-000000000000","event":"live_disconnected"}"#,
        )
        .unwrap();
        assert_eq!(notification.event, ProviderEventKind::LiveDisconnected);
        assert!(notification.data.is_none());
    }
}
