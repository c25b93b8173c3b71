//! `TimeSeriesStore` implementations

mod error;
mod influx;
mod memory;

pub use error::StoreError;
pub use influx::InfluxStore;
pub use memory::MemoryStore;
