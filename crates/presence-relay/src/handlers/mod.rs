//! Route handlers

pub mod guilds;
pub mod health;
