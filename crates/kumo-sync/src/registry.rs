//! Explicit per-document coordinator registry.
//!
//! One [`SyncStatusCoordinator`] per open document, created on open and
//! erased on close. Lookup is an explicit call on the registry the
//! application owns — there is no ambient per-document global.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::RwLock;
use tokio::task::JoinHandle;
use tracing::debug;

use kumo_types::DocumentId;

use crate::config::CoordinatorConfig;
use crate::coordinator::SyncStatusCoordinator;
use crate::feed::StatusFeed;
use crate::ports::{DecisionPrompt, DocumentHost, ProgressSink};

/// Registry errors.
#[derive(Debug, thiserror::Error)]
pub enum RegistryError {
    #[error("document {0} already has a coordinator")]
    AlreadyOpen(DocumentId),
    #[error("document {0} has no coordinator")]
    NotOpen(DocumentId),
}

struct Entry {
    coordinator: Arc<SyncStatusCoordinator>,
    driver: JoinHandle<()>,
}

/// Maps open documents to their coordinators and owns the driver tasks.
#[derive(Default)]
pub struct CoordinatorRegistry {
    inner: RwLock<HashMap<DocumentId, Entry>>,
}

impl CoordinatorRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a coordinator for `document_id`, subscribe it to `feed`
    /// (replay included), and spawn its driver task.
    ///
    /// Must be called from within a tokio runtime.
    pub fn open(
        &self,
        document_id: DocumentId,
        feed: &StatusFeed,
        host: Arc<dyn DocumentHost>,
        prompt: Arc<dyn DecisionPrompt>,
        progress_ui: Arc<dyn ProgressSink>,
        config: CoordinatorConfig,
    ) -> Result<Arc<SyncStatusCoordinator>, RegistryError> {
        let mut inner = self.inner.write();
        if inner.contains_key(&document_id) {
            return Err(RegistryError::AlreadyOpen(document_id));
        }

        let coordinator = Arc::new(SyncStatusCoordinator::new(
            document_id,
            host,
            prompt,
            progress_ui,
            feed.stop_signal(),
            config,
        ));
        let driver = tokio::spawn(coordinator.clone().run(feed.subscribe()));
        inner.insert(
            document_id,
            Entry {
                coordinator: coordinator.clone(),
                driver,
            },
        );
        debug!(document = %document_id, "coordinator registered");
        Ok(coordinator)
    }

    /// Explicit lookup.
    pub fn get(&self, document_id: DocumentId) -> Option<Arc<SyncStatusCoordinator>> {
        self.inner
            .read()
            .get(&document_id)
            .map(|entry| entry.coordinator.clone())
    }

    /// Erase the document's entry and end its driver task. Coordinator state
    /// dies with the document.
    pub fn close(&self, document_id: DocumentId) -> Result<(), RegistryError> {
        let entry = self
            .inner
            .write()
            .remove(&document_id)
            .ok_or(RegistryError::NotOpen(document_id))?;
        entry.driver.abort();
        debug!(document = %document_id, "coordinator removed");
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.inner.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.read().is_empty()
    }
}

// ============================================================================
// Tests
// ============================================================================
