pub mod channels;
pub mod event_logs;
pub mod playlist_execution_logs;
pub mod program_schedule;
pub mod stream_outputs;
pub mod streaming_sessions;
pub mod video_assets;
