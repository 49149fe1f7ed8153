//! Shared status and identity types for kumo.
//!
//! This crate is the leaf foundation: typed document identities and the
//! status/error values a sync worker reports back to the coordinator. It has
//! **no internal kumo dependencies** — other crates build on it.
//!
//! # Key Types
//!
//! |----------------|---------------------------------------------------|
//! | Type           | Purpose                                           |
//! |----------------|---------------------------------------------------|
//! | [`DocumentId`] | Which open document (one sync stream per id)      |
//! | [`SyncStatus`] | One observation of an attempt (progress/outcome)  |
//! | [`SyncOutcome`]| Pending / Succeeded / Failed                      |
//! | [`SyncError`]  | Why an attempt failed (closed [`ErrorKind`])      |
//! | [`SaveMode`]   | How a re-triggered save should behave             |
//! |----------------|---------------------------------------------------|

pub mod ids;
pub mod status;

// Re-export primary types at crate root for convenience.
pub use ids::DocumentId;
pub use status::{ErrorKind, SaveMode, SyncError, SyncOutcome, SyncStatus};
