//! Registry of live channel tasks.
//!
//! Channels are spawned fire-and-forget per accepted connection; the
//! registry keeps their join handles so shutdown can wait for every
//! channel to wind down instead of tearing the process out from under
//! them. Channels deregister themselves when they end.
//!
//! Registration is racy by nature: the spawned task can finish and call
//! [`ChannelRegistry::remove`] before the spawner has stored its handle
//! with [`ChannelRegistry::insert`]. The registry records such early
//! removals so the late-arriving handle is dropped instead of lingering
//! in the map as a dead entry.

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, PoisonError};

use tokio::task::JoinHandle;
use tracing::{debug, warn};

#[derive(Debug, Default)]
struct RegistryState {
    channels: HashMap<u64, JoinHandle<()>>,
    /// IDs whose task ended before its handle was inserted.
    finished_early: HashSet<u64>,
}

/// Tracks every running channel task by ID.
#[derive(Debug, Default)]
pub struct ChannelRegistry {
    state: Mutex<RegistryState>,
    next_id: AtomicU64,
}

impl ChannelRegistry {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocate a fresh channel ID.
    ///
    /// IDs are never reused within one process lifetime.
    pub fn next_id(&self) -> u64 {
        self.next_id.fetch_add(1, Ordering::Relaxed)
    }

    /// Track a spawned channel task under its ID.
    ///
    /// If the task already ended and deregistered itself before this call,
    /// the handle is dropped on the spot rather than stored as a dead
    /// entry.
    pub fn insert(&self, id: u64, handle: JoinHandle<()>) {
        let mut state = self.lock();
        if state.finished_early.remove(&id) {
            debug!(id, "channel ended before its handle was registered");
            drop(handle);
            return;
        }
        debug!(id, "channel registered");
        state.channels.insert(id, handle);
    }

    /// Stop tracking a channel, detaching its task.
    ///
    /// Called by the channel task itself when it ends. Returns `false` if
    /// the handle had not been inserted yet; the removal is remembered so
    /// the handle is discarded when it arrives.
    pub fn remove(&self, id: u64) -> bool {
        let mut state = self.lock();
        if state.channels.remove(&id).is_some() {
            debug!(id, "channel deregistered");
            true
        } else {
            state.finished_early.insert(id);
            false
        }
    }

    /// Number of channels currently tracked.
    #[must_use]
    pub fn len(&self) -> usize {
        self.lock().channels.len()
    }

    /// Whether no channels are tracked.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lock().channels.is_empty()
    }

    /// Wait for every tracked channel to finish.
    ///
    /// Handles are taken out of the registry before awaiting, so channels
    /// that deregister concurrently are not double-joined.
    pub async fn shutdown(&self) {
        let handles: Vec<(u64, JoinHandle<()>)> = {
            let mut state = self.lock();
            state.finished_early.clear();
            state.channels.drain().collect()
        };
        for (id, handle) in handles {
            if let Err(error) = handle.await {
                warn!(id, %error, "channel task did not finish cleanly");
            }
        }
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, RegistryState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
