//! InfluxDB connection management

mod connection;

pub use connection::{create_http_client, InfluxConnection};
