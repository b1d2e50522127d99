use std::{collections::HashMap, sync::Arc};

use tokio::sync::{Mutex, OwnedMutexGuard};
use uuid::Uuid;

/// Per-channel mutual exclusion for state-changing operations.
#[derive(Clone, Default)]
pub struct ChannelLocks {
    locks: Arc<Mutex<HashMap<Uuid, Arc<Mutex<()>>>>>,
}

impl ChannelLocks {
    pub async fn acquire(&self, channel_id: Uuid) -> OwnedMutexGuard<()> {
        let lock = self
            .locks
            .lock()
            .await
            .entry(channel_id)
            .or_default()
            .clone();
        lock.lock_owned().await
    }
}
