use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::schedule::{ProgramType, RepeatPattern};
use crate::session::{Protocol, SourceType};

#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct CreateChannel {
    pub name: String,
}

#[derive(Serialize, Deserialize, Clone, Debug)]
#[serde(rename_all = "camelCase")]
pub struct RegisterAsset {
    pub title: String,
    pub file_url: String,
    #[serde(default)]
    pub hls_url: Option<String>,
    #[serde(default)]
    pub duration_minutes: Option<u32>,
}

#[derive(Serialize, Deserialize, Clone, Debug)]
#[serde(rename_all = "camelCase")]
pub struct AddProgram {
    pub title: String,
    #[serde(rename = "type", default)]
    pub program_type: ProgramType,
    pub start_time: DateTime<Utc>,
    /// Signed so that non-positive values reach validation instead of failing to parse
    pub duration_minutes: i64,
    #[serde(default)]
    pub asset_id: Option<Uuid>,
    #[serde(default)]
    pub live_url: Option<String>,
    #[serde(default)]
    pub repeat_pattern: Option<RepeatPattern>,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct OutputConfig {
    #[serde(default)]
    pub protocol: Protocol,
    pub target_url: String,
    #[serde(default)]
    pub bitrate: Option<u32>,
    #[serde(default)]
    pub resolution: Option<String>,
}

#[derive(Serialize, Deserialize, Clone, Debug, Default)]
#[serde(rename_all = "camelCase")]
pub struct StartStream {
    #[serde(default)]
    pub output_config: Option<OutputConfig>,
}

#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct Transmit {
    pub protocol: Protocol,
    #[serde(default)]
    pub target: Option<String>,
}

#[derive(Serialize, Deserialize, Clone, Debug, Default)]
pub struct Heartbeat {
    #[serde(default)]
    pub metadata: Option<serde_json::Value>,
}

#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct ReportError {
    pub message: String,
}

#[derive(Serialize, Deserialize, Clone, Debug, Default)]
pub struct QueryLogs {
    #[serde(default)]
    pub limit: Option<u64>,
}

/// `data` carried by a provider `source_switched` notification
#[derive(Serialize, Deserialize, Clone, Debug)]
#[serde(rename_all = "camelCase")]
pub struct SourceSwitched {
    pub source_type: SourceType,
}
