//! Axum extractors for request handling

mod path;
mod validated;

pub use path::{GuildIdPath, GuildUsernamePath};
pub use validated::ValidatedQuery;
