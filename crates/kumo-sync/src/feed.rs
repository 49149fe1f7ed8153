//! Status feed — the contract between a sync worker and its coordinator.
//!
//! The worker owns a [`StatusFeed`] and publishes a [`SyncStatus`] for every
//! observable change of an attempt. A [`StatusSubscription`] replays the
//! current status immediately (so a coordinator attached mid-sync observes
//! the in-flight attempt), then yields every subsequent update in publish
//! order.
//!
//! Cancellation is two-tiered; the stronger tier travels the other way:
//! the coordinator raises the feed's [`StopSignal`], the worker observes it
//! between work items and reports the resulting `Cancelled` terminal status
//! back through the feed.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use parking_lot::Mutex;
use tokio::sync::broadcast;
use tracing::error;

use kumo_types::SyncStatus;

/// Default broadcast capacity. Status updates are small and coordinators
/// drain them promptly; lag is logged and survived, not prevented.
const DEFAULT_CAPACITY: usize = 64;

/// Publisher side of a document's status stream. One per open document,
/// owned by the sync worker.
pub struct StatusFeed {
    latest: Mutex<LatestSlot>,
    stop: StopSignal,
}

/// Snapshot and sender live under one lock so a subscription's replay value
/// and its receiver are created atomically — no update can land between them.
struct LatestSlot {
    status: SyncStatus,
    tx: broadcast::Sender<SyncStatus>,
}

impl StatusFeed {
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity);
        Self {
            latest: Mutex::new(LatestSlot {
                status: SyncStatus::idle(),
                tx,
            }),
            stop: StopSignal::default(),
        }
    }

    /// Record `status` as current and fan it out to subscribers.
    pub fn publish(&self, status: SyncStatus) {
        let mut slot = self.latest.lock();
        slot.status = status.clone();
        // A send with no live receivers is fine; the snapshot still updates.
        let _ = slot.tx.send(status);
    }

    /// The most recently published status.
    pub fn latest(&self) -> SyncStatus {
        self.latest.lock().status.clone()
    }

    /// Subscribe with replay: the returned subscription yields the current
    /// status first, then every later update in publish order.
    pub fn subscribe(&self) -> StatusSubscription {
        let slot = self.latest.lock();
        StatusSubscription {
            replay: Some(slot.status.clone()),
            rx: slot.tx.subscribe(),
        }
    }

    /// Handle the coordinator uses to request a hard stop of the in-flight
    /// sync. The worker polls [`StopSignal::is_requested`] between work items.
    pub fn stop_signal(&self) -> StopSignal {
        self.stop.clone()
    }
}

impl Default for StatusFeed {
    fn default() -> Self {
        Self::new()
    }
}

/// Consumer side of a document's status stream.
pub struct StatusSubscription {
    replay: Option<SyncStatus>,
    rx: broadcast::Receiver<SyncStatus>,
}

impl StatusSubscription {
    /// Next status update, or `None` once the feed is gone.
    ///
    /// A lagged receiver logs how many updates it missed and resumes with
    /// the next available one.
    pub async fn next(&mut self) -> Option<SyncStatus> {
        if let Some(status) = self.replay.take() {
            return Some(status);
        }
        loop {
            match self.rx.recv().await {
                Ok(status) => return Some(status),
                Err(broadcast::error::RecvError::Lagged(skipped)) => {
                    error!(skipped, "status subscription lagged; resuming with next update");
                }
                Err(broadcast::error::RecvError::Closed) => return None,
            }
        }
    }
}

/// Cooperative hard-stop request for the sync worker.
///
/// Raising it does not end the attempt by itself — the worker notices,
/// winds down, and publishes a `Cancelled` terminal status.
#[derive(Clone, Debug, Default)]
pub struct StopSignal {
    requested: Arc<AtomicBool>,
}

impl StopSignal {
    pub fn request(&self) {
        self.requested.store(true, Ordering::Release);
    }

    pub fn is_requested(&self) -> bool {
        self.requested.load(Ordering::Acquire)
    }
}
