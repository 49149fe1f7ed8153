//! Coordinator tuning knobs.

use std::time::Duration;

use serde::Deserialize;

/// How often the close-wait loop re-polls when no wake signal arrives.
const DEFAULT_CLOSE_POLL_INTERVAL_MS: u64 = 50;

/// Progress is reported to the surface as `value` out of this many ticks.
const DEFAULT_PROGRESS_TICKS: u64 = 10_000;

/// Tunables for a [`SyncStatusCoordinator`](crate::SyncStatusCoordinator).
///
/// Every field has a default, so a partial config deserializes cleanly.
#[derive(Clone, Copy, Debug, Deserialize)]
#[serde(default)]
pub struct CoordinatorConfig {
    /// Upper bound, in milliseconds, on how stale the close-wait loop's view
    /// of sync state can get between wake signals.
    pub close_poll_interval_ms: u64,
    /// Tick scale for progress surfaces (`poll(progress * ticks, ticks)`).
    pub progress_ticks: u64,
}

impl Default for CoordinatorConfig {
    fn default() -> Self {
        Self {
            close_poll_interval_ms: DEFAULT_CLOSE_POLL_INTERVAL_MS,
            progress_ticks: DEFAULT_PROGRESS_TICKS,
        }
    }
}

impl CoordinatorConfig {
    pub fn close_poll_interval(&self) -> Duration {
        Duration::from_millis(self.close_poll_interval_ms)
    }
}
