//! Contract with the external transcoding provider.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::schedule::ProgramType;
use crate::session::Protocol;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaylistItem {
    pub r#type: ProgramType,
    pub media_url: String,
    pub duration_seconds: u64,
    pub title: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StartRequest {
    pub channel_id: Uuid,
    pub playlist: Vec<PlaylistItem>,
    pub output_path: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StartResponse {
    #[serde(default)]
    pub external_job_id: String,
    #[serde(default)]
    pub hls_url: String,
    #[serde(default)]
    pub iframe_url: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StopRequest {
    pub channel_id: Uuid,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransmitRequest {
    pub channel_id: Uuid,
    pub protocol: Protocol,
    pub target: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransmitResponse {
    #[serde(default)]
    pub hls_url: String,
    #[serde(default)]
    pub iframe_url: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProviderStatus {
    #[serde(default)]
    pub current_source: Option<String>,
    #[serde(default)]
    pub is_active: bool,
    /// Provider specific fields
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

/// Error body returned by the provider on a rejected call
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderErrorBody {
    #[serde(alias = "error")]
    pub message: String,
}
