//! Service context - dependency container for services
//!
//! Holds the shared time-series store and the shutdown handle. Every store
//! call made through the context is raced against shutdown.

use std::sync::Arc;

use presence_core::traits::{RepoResult, TimeSeriesStore};
use presence_core::{Point, Record, SeriesQuery};

use crate::runtime::Shutdown;

/// Service context containing all shared dependencies
#[derive(Clone)]
pub struct ServiceContext {
    store: Arc<dyn TimeSeriesStore>,
    shutdown: Shutdown,
}

impl ServiceContext {
    /// Create a context whose calls are never cancelled
    pub fn new(store: Arc<dyn TimeSeriesStore>) -> Self {
        Self {
            store,
            shutdown: Shutdown::never(),
        }
    }

    /// Attach a shutdown handle
    pub fn with_shutdown(mut self, shutdown: Shutdown) -> Self {
        self.shutdown = shutdown;
        self
    }

    /// Get the underlying store
    pub fn store(&self) -> &dyn TimeSeriesStore {
        self.store.as_ref()
    }

    pub fn shutdown(&self) -> &Shutdown {
        &self.shutdown
    }

    /// Append one point, cancelled on shutdown
    pub async fn write_point(&self, point: Point) -> RepoResult<()> {
        self.shutdown.guard(self.store.write_point(point)).await
    }

    /// Run one query, cancelled on shutdown
    pub async fn query(&self, query: &SeriesQuery) -> RepoResult<Vec<Record>> {
        self.shutdown.guard(self.store.query(query)).await
    }

    /// Store health, not subject to cancellation
    pub async fn health_check(&self) -> RepoResult<()> {
        self.store.health_check().await
    }
}

impl std::fmt::Debug for ServiceContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServiceContext")
            .field("store", &"TimeSeriesStore")
            .field("shutdown", &self.shutdown.is_triggered())
            .finish()
    }
}
