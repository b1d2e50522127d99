pub mod channels;
pub mod database;
pub mod events;
pub mod execution_logs;
pub mod outputs;
pub mod schedule;
pub mod sessions;
