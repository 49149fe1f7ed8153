//! Cloud-sync status coordination for kumo documents.
//!
//! Sits between a document's background sync worker and the rest of the
//! application: mirrors the worker's status stream, forwards progress to the
//! UI, holds a "close document" request open until the sync reaches a safe
//! state, and drives a bounded recovery flow for every way a sync can fail.
//!
//! ```text
//!   sync worker                 coordinator                    UI layer
//!   ┌──────────┐   publish   ┌──────────────────────┐  poll  ┌──────────┐
//!   │ StatusFeed├───────────▶│ SyncStatusCoordinator│───────▶│ progress │
//!   └────┬─────┘             │  on_status_changed   │◀───────│ surface  │
//!        ▲                   │  allow_closing       │ cancel └──────────┘
//!        │ StopSignal        │        │ on Failed   │  stop
//!        └───────────────────┤        ▼             │
//!                            │  RecoveryPolicy ─────┼──▶ DocumentHost
//!                            └──────────────────────┘    (resave/reload)
//! ```
//!
//! Transport, wire format, dialog rendering, and token storage live behind
//! the port traits in [`ports`] — this crate owns only the control logic.

pub mod config;
pub mod coordinator;
pub mod feed;
pub mod policy;
pub mod ports;
pub mod registry;

#[cfg(test)]
pub(crate) mod test_support;

pub use config::CoordinatorConfig;
pub use coordinator::SyncStatusCoordinator;
pub use feed::{StatusFeed, StatusSubscription, StopSignal};
pub use policy::{Recovery, RecoveryPolicy};
pub use ports::{
    Choice, Decision, DecisionPrompt, DocumentHost, ErrorNotice, ProgressRequest, ProgressSignal,
    ProgressSink, ProgressSurface, PromptRequest, QuotaKind,
};
pub use registry::{CoordinatorRegistry, RegistryError};
