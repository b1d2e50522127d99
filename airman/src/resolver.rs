//! Answers "what is on air now" and "what plays next" from a channel schedule.
//! Everything here is pure and cheap enough to run on every poll.

use std::cmp::Reverse;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use api::provider::PlaylistItem;
use api::schedule::{Airing, ProgramEntry, ProgramType, Progress, VideoAsset};

/// Which entry wins when two airings start at the same instant
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TieBreak {
    /// Greater id, the most recently inserted entry
    #[default]
    Latest,
    /// Smaller id
    Earliest,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Resolution {
    pub current: Option<Airing>,
    pub next: Option<Airing>,
}

#[derive(Debug, Clone, Copy)]
pub struct Resolver {
    tie_break: TieBreak,
    window_size: usize,
}

impl Resolver {
    pub fn new(tie_break: TieBreak, window_size: usize) -> Self {
        Self {
            tie_break,
            window_size: window_size.max(1),
        }
    }

    pub fn window_size(&self) -> usize {
        self.window_size
    }

    fn rank(&self, entry: &ProgramEntry) -> i64 {
        match self.tie_break {
            TieBreak::Latest => entry.id as i64,
            TieBreak::Earliest => -(entry.id as i64),
        }
    }

    /// Latest started airing as current, earliest future airing as next.
    pub fn resolve(&self, entries: &[ProgramEntry], now: DateTime<Utc>) -> Resolution {
        let current = entries
            .iter()
            .filter_map(|entry| {
                entry.occurrence_at_or_before(now).map(|starts_at| Airing {
                    program: entry.clone(),
                    starts_at,
                })
            })
            .max_by_key(|airing| (airing.starts_at, self.rank(&airing.program)));

        Resolution {
            current,
            next: self.upcoming(entries, now).into_iter().next(),
        }
    }

    /// Future airings, one per entry, in the order they will go on air.
    pub fn upcoming(&self, entries: &[ProgramEntry], now: DateTime<Utc>) -> Vec<Airing> {
        let mut upcoming: Vec<Airing> = entries
            .iter()
            .filter_map(|entry| {
                entry.occurrence_after(now).map(|starts_at| Airing {
                    program: entry.clone(),
                    starts_at,
                })
            })
            .collect();
        upcoming.sort_by_key(|airing| (airing.starts_at, Reverse(self.rank(&airing.program))));
        upcoming
    }

    /// Airings that already finished, most recent first. The current airing is excluded.
    pub fn past(&self, entries: &[ProgramEntry], now: DateTime<Utc>) -> Vec<Airing> {
        let current = self.resolve(entries, now).current;
        let mut past: Vec<Airing> = entries
            .iter()
            .filter_map(|entry| {
                entry.occurrence_at_or_before(now).map(|starts_at| Airing {
                    program: entry.clone(),
                    starts_at,
                })
            })
            .filter(|airing| Some(airing) != current.as_ref() && airing.ends_at() <= now)
            .collect();
        past.sort_by_key(|airing| Reverse((airing.starts_at, self.rank(&airing.program))));
        past
    }

    /// Ordered playlist handed to the provider and walked by advance:
    /// the current airing followed by upcoming ones.
    pub fn window(&self, entries: &[ProgramEntry], now: DateTime<Utc>) -> Vec<Airing> {
        let Resolution { current, .. } = self.resolve(entries, now);
        current
            .into_iter()
            .chain(self.upcoming(entries, now))
            .take(self.window_size)
            .collect()
    }
}

pub fn compute_progress(airing: &Airing, now: DateTime<Utc>) -> Progress {
    let duration_ms = airing.program.duration().num_milliseconds().max(0);
    let elapsed_ms = (now - airing.starts_at)
        .num_milliseconds()
        .clamp(0, duration_ms);
    let percentage = if duration_ms == 0 {
        100.0
    } else {
        (elapsed_ms as f64 * 100.0 / duration_ms as f64).clamp(0.0, 100.0)
    };
    Progress {
        elapsed_ms,
        duration_ms,
        percentage,
        remaining_ms: duration_ms - elapsed_ms,
    }
}

/// Live entries prefer their ingest URL, VOD entries the original file.
pub fn playable_url(entry: &ProgramEntry, asset: Option<&VideoAsset>) -> Option<String> {
    let asset_hls = asset.and_then(|a| a.hls_url.clone());
    let asset_file = asset.map(|a| a.file_url.clone());
    match entry.program_type {
        ProgramType::Live => entry.live_url.clone().or(asset_hls).or(asset_file),
        ProgramType::Vod => asset_file.or(asset_hls),
    }
    .filter(|url| !url.is_empty())
}

/// An airing together with the URL handed to the provider for it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Playable {
    pub airing: Airing,
    pub media_url: String,
}

/// Airings without a playable URL are left out. Playlist positions, execution
/// logs and the provider playlist all index into the returned list.
pub fn playable<'a, F>(window: Vec<Airing>, asset: F) -> Vec<Playable>
where
    F: Fn(&ProgramEntry) -> Option<&'a VideoAsset>,
{
    window
        .into_iter()
        .filter_map(|airing| {
            playable_url(&airing.program, asset(&airing.program))
                .map(|media_url| Playable { airing, media_url })
        })
        .collect()
}

pub fn playlist_items(playable: &[Playable]) -> Vec<PlaylistItem> {
    playable
        .iter()
        .map(|p| PlaylistItem {
            r#type: p.airing.program.program_type,
            media_url: p.media_url.clone(),
            duration_seconds: p.airing.program.duration_minutes as u64 * 60,
            title: p.airing.program.title.clone(),
        })
        .collect()
}
