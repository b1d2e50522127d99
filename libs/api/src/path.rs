use uuid::Uuid;

pub const CHANNELS: &str = "/api/channels";
pub const ASSETS: &str = "/api/assets";
pub const PROVIDER_WEBHOOK: &str = "/api/webhook/provider";

pub fn channel(id: Uuid) -> String {
    format!("/api/channels/{}", id)
}

pub fn programs(channel: Uuid) -> String {
    format!("/api/channels/{}/programs", channel)
}

pub fn program(channel: Uuid, program: i32) -> String {
    format!("/api/channels/{}/programs/{}", channel, program)
}

/// `action` is one of start, stop, next, live, fallback, transmit, heartbeat, error, status
pub fn stream(channel: Uuid, action: &str) -> String {
    format!("/api/channels/{}/stream/{}", channel, action)
}

pub fn playlist(channel: Uuid) -> String {
    format!("/api/channels/{}/playlist", channel)
}

pub fn current(channel: Uuid) -> String {
    format!("/api/channels/{}/current", channel)
}

pub fn schedule(channel: Uuid) -> String {
    format!("/api/channels/{}/schedule", channel)
}

pub fn logs(channel: Uuid) -> String {
    format!("/api/channels/{}/logs", channel)
}

pub fn stats(channel: Uuid) -> String {
    format!("/api/channels/{}/stats", channel)
}
