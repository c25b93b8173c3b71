//! In-process TimeSeriesStore
//!
//! Rows are kept exactly as a pivoted query would return them, and
//! `SeriesQuery` is evaluated directly, so the query semantics match the
//! InfluxDB backend: half-open time range, tag filters, stable time sort,
//! optional limit.

use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use parking_lot::RwLock;
use tracing::{debug, instrument};

use presence_core::traits::{RepoResult, TimeSeriesStore};
use presence_core::{Point, Record, SeriesQuery};

use super::error::StoreError;

/// Append-only in-memory store
#[derive(Default)]
pub struct MemoryStore {
    rows: RwLock<Vec<Record>>,
    unavailable: AtomicBool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a raw row, bypassing point encoding. Lets tests seed
    /// malformed data.
    pub fn insert_record(&self, record: Record) {
        self.rows.write().push(record);
    }

    /// Make every call fail with a store error until reset
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    pub fn len(&self) -> usize {
        self.rows.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.read().is_empty()
    }

    /// All rows of one measurement, in insertion order
    pub fn rows_for(&self, measurement: &str) -> Vec<Record> {
        self.rows
            .read()
            .iter()
            .filter(|r| r.measurement.as_deref() == Some(measurement))
            .cloned()
            .collect()
    }

    fn check_available(&self) -> Result<(), StoreError> {
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable);
        }
        Ok(())
    }
}

#[async_trait]
impl TimeSeriesStore for MemoryStore {
    #[instrument(skip(self, point), fields(measurement = %point.measurement))]
    async fn write_point(&self, point: Point) -> RepoResult<()> {
        self.check_available()?;
        if point.fields.is_empty() {
            return Err(StoreError::Encode(format!(
                "point for {} has no fields",
                point.measurement
            ))
            .into());
        }
        self.rows.write().push(Record::from_point(&point));
        Ok(())
    }

    #[instrument(skip(self, query), fields(measurement = %query.measurement))]
    async fn query(&self, query: &SeriesQuery) -> RepoResult<Vec<Record>> {
        self.check_available()?;

        let mut matched: Vec<Record> = self
            .rows
            .read()
            .iter()
            .filter(|r| query.matches(r))
            .cloned()
            .collect();

        // Stable, so equal timestamps keep insertion order
        if query.order.is_descending() {
            matched.sort_by(|a, b| b.time.cmp(&a.time));
        } else {
            matched.sort_by(|a, b| a.time.cmp(&b.time));
        }
        if let Some(limit) = query.limit {
            matched.truncate(limit);
        }

        debug!(rows = matched.len(), "Query returned");
        Ok(matched)
    }

    async fn health_check(&self) -> RepoResult<()> {
        self.check_available()?;
        Ok(())
    }
}
