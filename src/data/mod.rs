//! Feed adapters: the two interchangeable sources of market data, plus the
//! preference persistence that survives restarts.

mod live_stream;
mod preferences;
mod simulator;

pub use live_stream::LiveFeed;
pub use preferences::{SavedPreferences, load_preferences, save_preferences};
pub use simulator::SimulatedFeed;

use std::sync::{Arc, Mutex};

use tokio::sync::Notify;

use crate::store::SharedStore;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeedKind {
    Simulated,
    Live,
}

impl FeedKind {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Simulated => "simulated",
            Self::Live => "live",
        }
    }
}

/// Lifecycle of a feed's connection, surfaced in the status bar.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionPhase {
    Idle,
    Connecting,
    Streaming,
    Reconnecting,
}

/// A mounted feed. Exactly one exists at a time; `stop` is idempotent and
/// guarantees that no further store update is emitted once it returns.
pub trait FeedHandle: Send {
    fn kind(&self) -> FeedKind;
    fn phase(&self) -> ConnectionPhase;
    fn stop(&mut self);
}

/// Mount a feed of the given kind onto the store.
pub fn start_feed(kind: FeedKind, store: SharedStore) -> Box<dyn FeedHandle> {
    match kind {
        FeedKind::Simulated => Box::new(SimulatedFeed::start(store)),
        FeedKind::Live => Box::new(LiveFeed::start(store)),
    }
}

/// Write gate between a feed's background work and the store.
///
/// Every adapter-originated store write runs under the gate lock after
/// checking the flag, and `close()` clears the flag under that same lock.
/// A caller returning from `close` therefore knows that any late tick,
/// snapshot response or stream frame will observe a closed gate and turn
/// into a no-op.
pub(crate) struct FeedGate {
    open: Mutex<bool>,
    closed: Notify,
}

impl FeedGate {
    pub(crate) fn new() -> Arc<Self> {
        Arc::new(Self {
            open: Mutex::new(true),
            closed: Notify::new(),
        })
    }

    /// Run `write` unless the gate has been closed. Returns whether the
    /// write was delivered.
    pub(crate) fn apply(&self, write: impl FnOnce()) -> bool {
        let open = self.open.lock().unwrap();
        if !*open {
            return false;
        }
        write();
        true
    }

    pub(crate) fn is_open(&self) -> bool {
        *self.open.lock().unwrap()
    }

    /// Close the gate and wake any loop parked on `closed()`. Idempotent.
    pub(crate) fn close(&self) {
        let mut open = self.open.lock().unwrap();
        *open = false;
        self.closed.notify_waiters();
    }

    /// Resolves once the gate closes. `notify_waiters` only reaches tasks
    /// already parked here, so loops must also poll `is_open` each round.
    pub(crate) async fn closed(&self) {
        self.closed.notified().await
    }
}
