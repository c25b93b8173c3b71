//! # presence-core
//!
//! Domain layer containing presence entities, the time-series record and query
//! model, collaborator traits, and domain errors.
//! This crate has zero dependencies on infrastructure (store client, web framework, etc.).

pub mod entities;
pub mod error;
pub mod timeseries;
pub mod traits;
pub mod value_objects;

// Re-export commonly used types at crate root
pub use entities::{
    EventType, GuildRef, MeasurementKind, Member, PresenceAggregateSnapshot, PresenceStatus,
    RankEntry, VoiceRankFact, VoiceState, VoiceTransitionEvent, EMPTY_ONCALL_SENTINEL,
};
pub use error::DomainError;
pub use timeseries::{FieldValue, Point, Record, SeriesQuery, SortOrder, TagFilter};
pub use traits::{NotificationSink, RepoResult, RosterProvider, TimeSeriesStore};
pub use value_objects::{Snowflake, SnowflakeParseError};
