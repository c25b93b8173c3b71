//! # presence-relay
//!
//! The relay process: polls the event store for voice transitions, hands them
//! to a notification sink, and serves the aggregate read API over Axum.

pub mod extractors;
pub mod handlers;
pub mod middleware;
pub mod response;
pub mod routes;
pub mod server;
pub mod sinks;
pub mod state;

pub use server::{create_app, run, serve};
pub use state::AppState;
