//! # presence-store
//!
//! Event store layer implementing `TimeSeriesStore`.
//!
//! ## Overview
//!
//! - `InfluxStore` talks to InfluxDB v2 over HTTP: line protocol writes,
//!   Flux queries, annotated-CSV results.
//! - `MemoryStore` keeps points in process and evaluates `SeriesQuery`
//!   directly. Tests and local runs use it.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use presence_store::{InfluxConnection, InfluxStore};
//! use presence_core::traits::TimeSeriesStore;
//!
//! async fn example() -> Result<(), Box<dyn std::error::Error>> {
//!     let store = InfluxStore::new(InfluxConnection::from_env()?)?;
//!     store.health_check().await?;
//!     Ok(())
//! }
//! ```

pub mod client;
pub mod codec;
pub mod stores;

// Re-export commonly used types
pub use client::{create_http_client, InfluxConnection};
pub use stores::{InfluxStore, MemoryStore, StoreError};
