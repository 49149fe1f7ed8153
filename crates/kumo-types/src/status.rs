//! Sync attempt status and error values.
//!
//! A sync worker reports one [`SyncStatus`] per observable change of an
//! attempt: progress while uploading, then exactly one terminal outcome.
//! Failures arrive as data ([`SyncError`] inside a terminal status), never
//! as exceptions across the coordinator boundary.

use std::str::FromStr;

use serde::{Deserialize, Serialize};
use strum::EnumString;

/// Where a sync attempt currently stands.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, Default, EnumString)]
#[serde(rename_all = "lowercase")]
#[strum(ascii_case_insensitive)]
pub enum SyncOutcome {
    /// Still in flight (or no attempt has started yet).
    #[default]
    Pending,
    /// Terminal: the attempt completed and the remote copy is current.
    Succeeded,
    /// Terminal: the attempt ended with an error (see [`SyncStatus::error`]).
    Failed,
}

/// Why a sync attempt failed. Closed enumeration — every kind maps to
/// exactly one recovery row, and new kinds must be given an explicit entry.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, EnumString)]
#[serde(rename_all = "snake_case")]
#[strum(ascii_case_insensitive, serialize_all = "snake_case")]
pub enum ErrorKind {
    /// The stored credentials were rejected by the remote service.
    Authorization,
    /// The account has no room for another remote project.
    ProjectLimitReached,
    /// The account is out of remote storage.
    StorageLimitReached,
    /// The remote copy moved ahead of the local one.
    VersionConflict,
    /// The remote counterpart of this document no longer exists.
    RemoteProjectNotFound,
    /// Connectivity problem before or during the attempt.
    NetworkFailure,
    /// The payload upload itself failed.
    UploadFailed,
    /// The remote service reported an internal failure.
    ServerFailure,
    /// The client side of the transport failed.
    ClientFailure,
    /// The user stopped the attempt; handled at the point of cancellation.
    Cancelled,
}

impl ErrorKind {
    /// Parse from string (case-insensitive).
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(s: &str) -> Option<Self> {
        <Self as FromStr>::from_str(s).ok()
    }

    /// Convert to string representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::Authorization => "authorization",
            ErrorKind::ProjectLimitReached => "project_limit_reached",
            ErrorKind::StorageLimitReached => "storage_limit_reached",
            ErrorKind::VersionConflict => "version_conflict",
            ErrorKind::RemoteProjectNotFound => "remote_project_not_found",
            ErrorKind::NetworkFailure => "network_failure",
            ErrorKind::UploadFailed => "upload_failed",
            ErrorKind::ServerFailure => "server_failure",
            ErrorKind::ClientFailure => "client_failure",
            ErrorKind::Cancelled => "cancelled",
        }
    }
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A classified sync failure with the worker's raw message attached.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, thiserror::Error)]
#[error("{kind}: {message}")]
pub struct SyncError {
    /// Failure classification — drives recovery.
    pub kind: ErrorKind,
    /// Raw message from the worker, kept verbatim for diagnostics.
    pub message: String,
}

impl SyncError {
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

/// How a re-triggered save should behave.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, Default, EnumString)]
#[serde(rename_all = "snake_case")]
#[strum(ascii_case_insensitive)]
pub enum SaveMode {
    /// Regular save against the existing remote project.
    #[default]
    Normal,
    /// Overwrite the remote head even if it moved (conflict resolution).
    #[strum(serialize = "force_save", serialize = "force")]
    ForceSave,
    /// Create a fresh remote project and save into it.
    #[strum(serialize = "save_as_new", serialize = "new")]
    SaveAsNew,
}

/// One observation of a sync attempt.
///
/// Fields are private so the invariant *error is present iff outcome is
/// `Failed`* holds at every construction site; use the named constructors.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SyncStatus {
    is_syncing: bool,
    progress: f64,
    outcome: SyncOutcome,
    error: Option<SyncError>,
}

impl SyncStatus {
    /// No attempt in flight, nothing has completed. The feed's initial value.
    pub fn idle() -> Self {
        Self {
            is_syncing: false,
            progress: 0.0,
            outcome: SyncOutcome::Pending,
            error: None,
        }
    }

    /// An attempt is in flight at `progress` (clamped to [0, 1]).
    pub fn syncing(progress: f64) -> Self {
        Self {
            is_syncing: true,
            progress: progress.clamp(0.0, 1.0),
            outcome: SyncOutcome::Pending,
            error: None,
        }
    }

    /// Terminal: the attempt completed.
    pub fn succeeded() -> Self {
        Self {
            is_syncing: false,
            progress: 1.0,
            outcome: SyncOutcome::Succeeded,
            error: None,
        }
    }

    /// Terminal: the attempt failed with `error`.
    pub fn failed(error: SyncError) -> Self {
        Self {
            is_syncing: false,
            progress: 0.0,
            outcome: SyncOutcome::Failed,
            error: Some(error),
        }
    }

    /// Terminal: the user stopped the attempt.
    pub fn cancelled() -> Self {
        Self::failed(SyncError::new(ErrorKind::Cancelled, "sync stopped by user"))
    }

    pub fn is_syncing(&self) -> bool {
        self.is_syncing
    }

    /// Upload progress in [0, 1]. Meaningful only while syncing.
    pub fn progress(&self) -> f64 {
        self.progress
    }

    pub fn outcome(&self) -> SyncOutcome {
        self.outcome
    }

    /// Present iff `outcome` is [`SyncOutcome::Failed`].
    pub fn error(&self) -> Option<&SyncError> {
        self.error.as_ref()
    }
}

impl Default for SyncStatus {
    fn default() -> Self {
        Self::idle()
    }
}
