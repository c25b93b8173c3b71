//! Wire formats spoken with InfluxDB v2
//!
//! - line protocol for writes
//! - Flux for queries
//! - annotated CSV for query results

mod annotated_csv;
mod flux;
mod line_protocol;

pub use annotated_csv::decode_annotated_csv;
pub use flux::{query_body, render_flux};
pub use line_protocol::encode_point;
