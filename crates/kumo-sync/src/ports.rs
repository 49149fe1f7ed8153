//! Port traits at the coordinator's seams.
//!
//! Everything the coordinator needs from the outside world — the host
//! document, recovery dialogs, and the progress surface — enters through
//! these traits. Dialogs are modeled purely by the decision they return;
//! rendering belongs to the implementor.

use async_trait::async_trait;

use kumo_types::SaveMode;

// ============================================================================
// Document host
// ============================================================================

/// Operations the coordinator can ask of the owning document.
///
/// Save and reload operations kick off asynchronous machinery (a re-triggered
/// save produces a fresh status stream on the document's feed); the `Result`
/// only reports whether the request was accepted.
#[async_trait]
pub trait DocumentHost: Send + Sync {
    /// How many cloud saves this document has ever completed.
    async fn saves_count(&self) -> u64;

    /// Start a new cloud save in the given mode.
    async fn trigger_save(&self, mode: SaveMode) -> anyhow::Result<()>;

    /// Discard local state and reopen from the remote canonical copy.
    async fn reload_from_remote(&self) -> anyhow::Result<()>;

    /// Save to local storage only, leaving the remote copy untouched.
    async fn save_locally_only(&self) -> anyhow::Result<()>;

    /// Drop cached credentials so the next save re-authenticates.
    async fn revoke_credentials(&self);
}

// ============================================================================
// Decision prompts
// ============================================================================

/// Which quota the remote service reported as exhausted.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum QuotaKind {
    Projects,
    Storage,
}

/// A choice the UI should put in front of the user.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PromptRequest {
    /// One-time acknowledgement after a document's first successful sync.
    SyncSucceeded,
    /// Account quota exhausted: upgrade remotely or keep the save local.
    QuotaExceeded(QuotaKind),
    /// Remote copy moved ahead: keep the local version or discard it.
    VersionConflict,
    /// The remote project is gone: keep a local copy or save as new.
    MissingRemoteProject,
    /// Hold until the user finishes an action on the remote site.
    RemoteActionPending,
}

/// Options a prompt can come back with.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Choice {
    ViewOnline,
    UpgradePlan,
    SaveLocally,
    KeepLocal,
    DiscardLocal,
    SaveLocalCopy,
    SaveAsNew,
    Acknowledged,
}

/// What came back from a prompt. Dismissal is a first-class answer — every
/// consumer treats it as the non-primary branch.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Decision {
    Selected(Choice),
    Dismissed,
}

/// A notice that informs without asking.
#[derive(Clone, Copy, Debug)]
pub struct ErrorNotice<'a> {
    pub title: &'a str,
    pub message: &'a str,
    /// Raw worker message, attached for support/telemetry surfaces.
    pub diagnostic: Option<&'a str>,
}

/// Stand-in for every recovery dialog: present a choice, return the selected
/// option or the fact that the user dismissed it.
#[async_trait]
pub trait DecisionPrompt: Send + Sync {
    async fn choose(&self, request: PromptRequest) -> Decision;

    /// Show a failure notice. No decision comes back.
    async fn show_error_notice(&self, notice: ErrorNotice<'_>);
}

// ============================================================================
// Progress surface
// ============================================================================

/// What the user asked of a live progress surface.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ProgressSignal {
    /// Keep going.
    Continue,
    /// Stop blocking the close request; the sync itself continues.
    CancelWait,
    /// Hard-stop the sync operation now.
    Stop,
}

/// Parameters for opening a progress surface.
#[derive(Clone, Debug)]
pub struct ProgressRequest {
    pub title: String,
    pub message: String,
    pub allow_cancel: bool,
    pub allow_stop: bool,
}

/// A live, cancellable progress affordance. At most one exists per document;
/// dropping the box releases it, so release is exactly-once by construction.
pub trait ProgressSurface: Send {
    /// Report `value` out of `max` and collect any pending user response.
    /// Must not block.
    fn poll(&mut self, value: u64, max: u64) -> ProgressSignal;
}

/// Factory for progress surfaces.
pub trait ProgressSink: Send + Sync {
    fn begin(&self, request: ProgressRequest) -> Box<dyn ProgressSurface>;
}
