//! Integration test utilities for the relay
//!
//! Spins up the read API over an in-memory store and seeds it with
//! snapshots, rankings and voice events.

pub mod fixtures;
pub mod helpers;

pub use fixtures::*;
pub use helpers::*;
