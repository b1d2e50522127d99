use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::string_enum;

/// Kind of content a scheduled slot carries
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProgramType {
    /// Stored video asset
    #[default]
    Vod,
    /// Live feed
    Live,
}

string_enum!(ProgramType {
    Vod => "vod",
    Live => "live",
});

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RepeatPattern {
    #[default]
    None,
    Daily,
    Weekly,
}

string_enum!(RepeatPattern {
    None => "none",
    Daily => "daily",
    Weekly => "weekly",
});

impl RepeatPattern {
    pub fn period(&self) -> Option<Duration> {
        match self {
            RepeatPattern::None => None,
            RepeatPattern::Daily => Some(Duration::days(1)),
            RepeatPattern::Weekly => Some(Duration::weeks(1)),
        }
    }
}

/// One scheduled slot in a channel timeline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgramEntry {
    /// Insertion ordered identifier
    pub id: i32,
    pub channel_id: Uuid,
    pub title: String,
    #[serde(rename = "type")]
    pub program_type: ProgramType,
    pub start_time: DateTime<Utc>,
    pub duration_minutes: u32,
    /// Weak reference to a video asset
    pub asset_id: Option<Uuid>,
    /// Ingest URL for live entries
    pub live_url: Option<String>,
    pub repeat_pattern: RepeatPattern,
}

impl ProgramEntry {
    pub fn duration(&self) -> Duration {
        Duration::minutes(self.duration_minutes as i64)
    }

    /// Latest occurrence of this entry starting at or before `now`.
    pub fn occurrence_at_or_before(&self, now: DateTime<Utc>) -> Option<DateTime<Utc>> {
        if self.start_time > now {
            return None;
        }
        match self.repeat_pattern.period() {
            None => Some(self.start_time),
            Some(period) => {
                let cycles = (now - self.start_time).num_milliseconds() / period.num_milliseconds();
                Some(self.start_time + Duration::milliseconds(cycles * period.num_milliseconds()))
            }
        }
    }

    /// First occurrence of this entry starting strictly after `now`.
    pub fn occurrence_after(&self, now: DateTime<Utc>) -> Option<DateTime<Utc>> {
        if self.start_time > now {
            return Some(self.start_time);
        }
        let period = self.repeat_pattern.period()?;
        self.occurrence_at_or_before(now).map(|last| last + period)
    }
}

/// A program entry pinned to one concrete occurrence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Airing {
    pub program: ProgramEntry,
    pub starts_at: DateTime<Utc>,
}

impl Airing {
    pub fn ends_at(&self) -> DateTime<Utc> {
        self.starts_at + self.program.duration()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Progress {
    pub elapsed_ms: i64,
    pub duration_ms: i64,
    /// Always within [0, 100]
    pub percentage: f64,
    pub remaining_ms: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Channel {
    pub id: Uuid,
    pub owner_id: String,
    pub name: String,
    pub is_live: bool,
    pub schedule_active: bool,
    pub status: String,
    pub hls_url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoAsset {
    pub id: Uuid,
    pub owner_id: String,
    pub title: String,
    pub file_url: String,
    pub hls_url: Option<String>,
    pub duration_minutes: Option<u32>,
}
