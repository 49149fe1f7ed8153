//! Error-kind → recovery action mapping.
//!
//! One table row per [`ErrorKind`]; the match is exhaustive with no wildcard,
//! so adding a kind refuses to compile until it gets an explicit entry
//! (`Cancelled` is the only deliberate no-op). Recovery actions that fail
//! fall back exactly once to a named alternative and never loop — a
//! re-triggered save produces a fresh status stream that re-enters the
//! coordinator, not this policy.

use std::sync::Arc;

use tracing::{error, warn};

use kumo_types::{ErrorKind, SaveMode, SyncError};

use crate::ports::{
    Choice, Decision, DecisionPrompt, DocumentHost, ErrorNotice, PromptRequest, QuotaKind,
};

/// What the policy did about a failure, for logs and tests.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Recovery {
    /// A new cloud save was triggered in the given mode.
    Resaved(SaveMode),
    /// The document was reloaded from the remote canonical copy.
    Reloaded,
    /// The document was saved to local storage only.
    SavedLocally,
    /// The user was informed; no automatic retry.
    NoticeShown,
    /// Deliberate no-op.
    None,
}

/// Maps a failed attempt's [`SyncError`] to one bounded recovery flow,
/// asking the user where the table requires a decision.
pub struct RecoveryPolicy {
    host: Arc<dyn DocumentHost>,
    prompt: Arc<dyn DecisionPrompt>,
}

impl RecoveryPolicy {
    pub fn new(host: Arc<dyn DocumentHost>, prompt: Arc<dyn DecisionPrompt>) -> Self {
        Self { host, prompt }
    }

    /// Execute the recovery row for `error.kind`.
    pub async fn recover(&self, error: &SyncError) -> Recovery {
        match error.kind {
            ErrorKind::Authorization => {
                // Stored credentials were rejected; a fresh save re-runs the
                // auth flow.
                self.host.revoke_credentials().await;
                self.resave(SaveMode::Normal).await
            }

            ErrorKind::ProjectLimitReached => self.quota_exceeded(QuotaKind::Projects).await,
            ErrorKind::StorageLimitReached => self.quota_exceeded(QuotaKind::Storage).await,

            ErrorKind::VersionConflict => {
                match self.prompt.choose(PromptRequest::VersionConflict).await {
                    Decision::Selected(Choice::KeepLocal) => {
                        self.resave(SaveMode::ForceSave).await
                    }
                    _ => {
                        if let Err(e) = self.host.reload_from_remote().await {
                            error!("reload from remote failed: {e:#}");
                        }
                        Recovery::Reloaded
                    }
                }
            }

            ErrorKind::RemoteProjectNotFound => {
                match self.prompt.choose(PromptRequest::MissingRemoteProject).await {
                    Decision::Selected(Choice::SaveLocalCopy) => {
                        self.save_locally_or(SaveMode::SaveAsNew).await
                    }
                    _ => self.resave(SaveMode::SaveAsNew).await,
                }
            }

            ErrorKind::NetworkFailure => {
                self.prompt
                    .show_error_notice(ErrorNotice {
                        title: "Connection issue",
                        message: "The cloud service could not be reached. \
                                  Your document is unchanged; save again once \
                                  you are back online.",
                        diagnostic: None,
                    })
                    .await;
                Recovery::NoticeShown
            }

            ErrorKind::UploadFailed | ErrorKind::ServerFailure | ErrorKind::ClientFailure => {
                self.prompt
                    .show_error_notice(ErrorNotice {
                        title: "Cloud save failed",
                        message: "Failed to save the document to the cloud.",
                        diagnostic: Some(&error.message),
                    })
                    .await;
                Recovery::NoticeShown
            }

            // User-initiated; handled where the cancellation originated.
            ErrorKind::Cancelled => Recovery::None,
        }
    }

    /// Quota rows: upgrade remotely (then resave) or keep the save local.
    async fn quota_exceeded(&self, kind: QuotaKind) -> Recovery {
        match self.prompt.choose(PromptRequest::QuotaExceeded(kind)).await {
            Decision::Selected(Choice::UpgradePlan) => {
                // Hold until the user finishes the upgrade on the remote
                // site; whatever the prompt comes back with, retry the save.
                let _ = self.prompt.choose(PromptRequest::RemoteActionPending).await;
                self.resave(SaveMode::Normal).await
            }
            _ => self.save_locally_or(SaveMode::Normal).await,
        }
    }

    /// Local-only save with a single bounded fallback to a cloud save.
    async fn save_locally_or(&self, fallback: SaveMode) -> Recovery {
        match self.host.save_locally_only().await {
            Ok(()) => Recovery::SavedLocally,
            Err(e) => {
                warn!("local save failed, falling back to cloud save: {e:#}");
                self.resave(fallback).await
            }
        }
    }

    async fn resave(&self, mode: SaveMode) -> Recovery {
        if let Err(e) = self.host.trigger_save(mode).await {
            error!(mode = ?mode, "failed to re-trigger cloud save: {e:#}");
        }
        Recovery::Resaved(mode)
    }
}

// ============================================================================
// Tests
// ============================================================================
