//! Time-series model - points written, records read, and structured queries

mod point;
mod query;
mod record;
pub mod schema;

pub use point::{FieldValue, Point};
pub use query::{SeriesQuery, SortOrder, TagFilter};
pub use record::Record;
