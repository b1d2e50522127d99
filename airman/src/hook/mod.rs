use std::fmt::Debug;

use async_trait::async_trait;
use tokio::sync::broadcast;

use api::event::Event;

pub mod recorder;
pub mod webhook;

/// Background consumer of the audit event bus.
/// Implementations must never block or fail the operation that emitted the event.
#[async_trait]
pub trait EventHook: Debug {
    async fn hook(&self, event_receiver: broadcast::Receiver<Event>);
}

pub(crate) async fn next_event(receiver: &mut broadcast::Receiver<Event>) -> Option<Event> {
    loop {
        match receiver.recv().await {
            Ok(event) => return Some(event),
            Err(broadcast::error::RecvError::Lagged(skipped)) => {
                tracing::warn!(skipped, "event hook lagged behind, events dropped");
            }
            Err(broadcast::error::RecvError::Closed) => return None,
        }
    }
}
