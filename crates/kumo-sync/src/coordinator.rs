//! Per-document sync status coordination.
//!
//! [`SyncStatusCoordinator`] is the single owner of a document's sync-facing
//! UI state. A driver task feeds every status update (including the one
//! replayed at subscription time) into [`on_status_changed`], which mirrors
//! the worker's state, forwards progress to the surface, celebrates the
//! document's first successful cloud save, and hands terminal failures to
//! the [`RecoveryPolicy`].
//!
//! # Close protocol
//!
//! ```text
//! +----------+  syncing   +-----------------+  sync ended   +-------+
//! |   idle   |───────────▶|  close blocked  |──────────────▶| close |
//! +----------+            |  (allow_closing |               |  ok   |
//!      ▲                  |   waits, polls  |  wait         +-------+
//!      │    terminal      |   the surface)  |  cancelled    +-------+
//!      └──────────────────|                 |──────────────▶| close |
//!                         +-----------------+               | denied|
//!                                  │ "stop sync"            +-------+
//!                                  ▼
//!                         StopSignal → worker → Cancelled status → close ok
//! ```
//!
//! [`on_status_changed`]: SyncStatusCoordinator::on_status_changed

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use parking_lot::Mutex;
use tokio::sync::Notify;
use tracing::{debug, error, info};

use kumo_types::{DocumentId, SyncOutcome, SyncStatus};

use crate::config::CoordinatorConfig;
use crate::feed::{StatusSubscription, StopSignal};
use crate::policy::RecoveryPolicy;
use crate::ports::{
    Choice, Decision, DecisionPrompt, DocumentHost, ProgressRequest, ProgressSignal, ProgressSink,
    ProgressSurface, PromptRequest,
};

/// First-save celebration lifecycle. Determined once per coordinator,
/// consumed on the first syncing → succeeded transition.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum FirstSave {
    /// Haven't asked the host yet.
    Undetermined,
    /// The document has never completed a cloud save; celebrate the first.
    Pending,
    /// Celebrated, or the document was already saved before we attached.
    Done,
}

/// State owned by the status-event path. The progress surface lives here so
/// every exit path releases it through the same `Option::take`.
struct UiState {
    first_save: FirstSave,
    current_progress: f64,
    surface: Option<Box<dyn ProgressSurface>>,
    /// Set once a surface has been opened for the current attempt. The
    /// progress path only auto-opens an unseen surface — one the user
    /// cancelled away stays closed until the next attempt. The close wait
    /// re-opens regardless; closing is an explicit user action.
    surface_shown_this_attempt: bool,
    view_online_requested: bool,
}

/// Coordinates one document's sync status stream, close-blocking, and
/// failure recovery. Create via [`CoordinatorRegistry`] or construct
/// directly and drive with [`run`].
///
/// [`CoordinatorRegistry`]: crate::registry::CoordinatorRegistry
/// [`run`]: SyncStatusCoordinator::run
pub struct SyncStatusCoordinator {
    document_id: DocumentId,
    progress_ui: Arc<dyn ProgressSink>,
    prompt: Arc<dyn DecisionPrompt>,
    host: Arc<dyn DocumentHost>,
    policy: RecoveryPolicy,
    stop: StopSignal,
    config: CoordinatorConfig,
    /// Written with Release by the status path, read with Acquire by the
    /// close-wait loop on whatever task called `allow_closing`.
    is_syncing: AtomicBool,
    close_cancelled: AtomicBool,
    sync_ended: Notify,
    ui: Mutex<UiState>,
}

impl std::fmt::Debug for SyncStatusCoordinator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SyncStatusCoordinator")
            .field("document_id", &self.document_id)
            .field("is_syncing", &self.is_syncing)
            .field("close_cancelled", &self.close_cancelled)
            .finish_non_exhaustive()
    }
}

impl SyncStatusCoordinator {
    pub fn new(
        document_id: DocumentId,
        host: Arc<dyn DocumentHost>,
        prompt: Arc<dyn DecisionPrompt>,
        progress_ui: Arc<dyn ProgressSink>,
        stop: StopSignal,
        config: CoordinatorConfig,
    ) -> Self {
        Self {
            document_id,
            policy: RecoveryPolicy::new(host.clone(), prompt.clone()),
            progress_ui,
            prompt,
            host,
            stop,
            config,
            is_syncing: AtomicBool::new(false),
            close_cancelled: AtomicBool::new(false),
            sync_ended: Notify::new(),
            ui: Mutex::new(UiState {
                first_save: FirstSave::Undetermined,
                current_progress: 0.0,
                surface: None,
                surface_shown_this_attempt: false,
                view_online_requested: false,
            }),
        }
    }

    pub fn document_id(&self) -> DocumentId {
        self.document_id
    }

    /// Whether a sync attempt is currently in flight.
    pub fn is_syncing(&self) -> bool {
        self.is_syncing.load(Ordering::Acquire)
    }

    /// Whether the user cancelled a close-wait during the current document
    /// lifetime (the wait is suppressed from then on).
    pub fn close_was_cancelled(&self) -> bool {
        self.close_cancelled.load(Ordering::Acquire)
    }

    /// Whether the user asked to view the document online after the
    /// first-save celebration. Opening a browser is the host's business.
    pub fn view_online_requested(&self) -> bool {
        self.ui.lock().view_online_requested
    }

    /// Drive every update of `sub` into the coordinator until the feed ends.
    pub async fn run(self: Arc<Self>, mut sub: StatusSubscription) {
        while let Some(status) = sub.next().await {
            self.on_status_changed(&status).await;
        }
        debug!(document = %self.document_id, "status feed closed, coordinator driver exiting");
    }

    // ========================================================================
    // Status transitions
    // ========================================================================

    /// The core transition, invoked for every status update in stream order.
    pub async fn on_status_changed(&self, status: &SyncStatus) {
        let was_syncing = self.is_syncing.swap(status.is_syncing(), Ordering::AcqRel);

        self.determine_first_save().await;

        if status.is_syncing() {
            if !self.report_progress(status.progress()) {
                info!(document = %self.document_id, "stop requested from progress surface");
                self.stop.request();
            }
        } else {
            self.release_surface();
            self.sync_ended.notify_waiters();
            if was_syncing && status.outcome() == SyncOutcome::Succeeded {
                self.celebrate_first_save().await;
            }
        }

        if status.outcome() != SyncOutcome::Failed {
            return;
        }
        if let Some(sync_error) = status.error() {
            // Diagnostic record for every failure kind, independent of
            // whatever dialog the policy shows.
            error!(
                document = %self.document_id,
                kind = %sync_error.kind,
                "cloud sync failed: {}",
                sync_error.message
            );
            let recovery = self.policy.recover(sync_error).await;
            debug!(document = %self.document_id, ?recovery, "recovery completed");
        }
    }

    /// Forward `progress` to the surface, creating it lazily on the first
    /// report of a sync. Returns `false` only when the user asked to
    /// hard-stop the sync. No-op returning `true` outside an active sync.
    pub fn report_progress(&self, progress: f64) -> bool {
        if !self.is_syncing.load(Ordering::Acquire) {
            return true;
        }

        let mut ui = self.ui.lock();
        ui.current_progress = progress.clamp(0.0, 1.0);
        if ui.surface.is_none() && !ui.surface_shown_this_attempt {
            ui.surface = Some(self.progress_ui.begin(self.progress_request()));
            ui.surface_shown_this_attempt = true;
        }

        let ticks = self.config.progress_ticks;
        let value = (ui.current_progress * ticks as f64) as u64;
        let signal = match ui.surface.as_mut() {
            Some(surface) => surface.poll(value, ticks),
            None => ProgressSignal::Continue,
        };

        match signal {
            ProgressSignal::Continue => true,
            ProgressSignal::CancelWait => {
                ui.surface.take();
                self.close_cancelled.store(true, Ordering::Release);
                true
            }
            ProgressSignal::Stop => {
                ui.surface.take();
                false
            }
        }
    }

    /// Cooperative close gate. Waits while a sync is in flight and the wait
    /// has not been cancelled; returns whether it is safe to close.
    ///
    /// While waiting, a progress surface (cancel + stop) is kept alive and
    /// polled each iteration, so the user can cancel the wait or stop the
    /// sync even if the worker reports no progress. A stop request keeps the
    /// gate waiting for the worker's terminal status.
    ///
    /// No lost wakeup: both flags are re-read every iteration and the poll
    /// interval bounds how stale an iteration's view can be.
    pub async fn allow_closing(&self) -> bool {
        while self.is_syncing.load(Ordering::Acquire)
            && !self.close_cancelled.load(Ordering::Acquire)
        {
            self.poll_close_surface();
            tokio::select! {
                _ = self.sync_ended.notified() => {}
                _ = tokio::time::sleep(self.config.close_poll_interval()) => {}
            }
        }

        !self.is_syncing.load(Ordering::Acquire)
            || !self.close_cancelled.load(Ordering::Acquire)
    }

    // ========================================================================
    // Internal helpers
    // ========================================================================

    /// Ask the host once whether this document ever completed a cloud save.
    async fn determine_first_save(&self) {
        if self.ui.lock().first_save != FirstSave::Undetermined {
            return;
        }
        let count = self.host.saves_count().await;
        let mut ui = self.ui.lock();
        if ui.first_save == FirstSave::Undetermined {
            ui.first_save = if count == 0 {
                FirstSave::Pending
            } else {
                FirstSave::Done
            };
        }
    }

    /// One-time acknowledgement after the first successful cloud save.
    async fn celebrate_first_save(&self) {
        {
            let mut ui = self.ui.lock();
            if ui.first_save != FirstSave::Pending {
                return;
            }
            // Consumed before prompting so a later success can never re-enter.
            ui.first_save = FirstSave::Done;
        }

        if let Decision::Selected(Choice::ViewOnline) =
            self.prompt.choose(PromptRequest::SyncSucceeded).await
        {
            self.ui.lock().view_online_requested = true;
            info!(document = %self.document_id, "view-online requested after first cloud save");
        }
    }

    /// One close-wait iteration: ensure a surface exists and poll it at the
    /// last reported progress.
    fn poll_close_surface(&self) {
        let mut ui = self.ui.lock();
        // The sync may have ended between the loop check and taking the
        // lock; never create a surface for a finished attempt.
        if !self.is_syncing.load(Ordering::Acquire) {
            return;
        }
        if ui.surface.is_none() {
            ui.surface = Some(self.progress_ui.begin(self.progress_request()));
            ui.surface_shown_this_attempt = true;
        }

        let ticks = self.config.progress_ticks;
        let value = (ui.current_progress * ticks as f64) as u64;
        let signal = match ui.surface.as_mut() {
            Some(surface) => surface.poll(value, ticks),
            None => ProgressSignal::Continue,
        };

        match signal {
            ProgressSignal::Continue => {}
            ProgressSignal::CancelWait => {
                ui.surface.take();
                self.close_cancelled.store(true, Ordering::Release);
            }
            ProgressSignal::Stop => {
                ui.surface.take();
                info!(document = %self.document_id, "stop requested from close wait");
                self.stop.request();
            }
        }
    }

    /// Attempt-end cleanup. Idempotent: dropping the box is the release.
    fn release_surface(&self) {
        let mut ui = self.ui.lock();
        ui.surface.take();
        ui.surface_shown_this_attempt = false;
    }

    fn progress_request(&self) -> ProgressRequest {
        ProgressRequest {
            title: "Saving to cloud".to_string(),
            message: "The document is syncing with the cloud service.".to_string(),
            allow_cancel: true,
            allow_stop: true,
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
