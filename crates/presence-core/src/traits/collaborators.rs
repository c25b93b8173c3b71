//! Collaborator traits (ports) - what the pipeline needs from the outside
//!
//! The roster and notifier stand in for the chat-platform clients; the store
//! is the append-only time-series backend. The domain layer defines these,
//! the infrastructure crates (or tests) provide the implementations.

use async_trait::async_trait;

use crate::entities::{GuildRef, Member, PresenceStatus, VoiceState, VoiceTransitionEvent};
use crate::error::DomainError;
use crate::timeseries::{Point, Record, SeriesQuery};
use crate::value_objects::Snowflake;

/// Result type for collaborator operations
pub type RepoResult<T> = Result<T, DomainError>;

// ============================================================================
// Roster Provider
// ============================================================================

/// Live guild membership and member state. Every call can fail on its own.
#[async_trait]
pub trait RosterProvider: Send + Sync {
    /// All guilds the observer can see
    async fn list_guilds(&self) -> RepoResult<Vec<GuildRef>>;

    /// Full member list of a guild, in roster order
    async fn list_members(&self, guild_id: Snowflake) -> RepoResult<Vec<Member>>;

    /// Current voice state, `None` if the member has never connected
    async fn voice_state(
        &self,
        guild_id: Snowflake,
        user_id: Snowflake,
    ) -> RepoResult<Option<VoiceState>>;

    /// Current online status
    async fn presence_status(
        &self,
        guild_id: Snowflake,
        user_id: Snowflake,
    ) -> RepoResult<PresenceStatus>;

    /// Resolve a channel's display name
    async fn channel_name(&self, channel_id: Snowflake) -> RepoResult<String>;
}

// ============================================================================
// Time-Series Store
// ============================================================================

#[async_trait]
pub trait TimeSeriesStore: Send + Sync {
    /// Append one point
    async fn write_point(&self, point: Point) -> RepoResult<()>;

    /// Run a structured query, rows pivoted so tags and fields share columns
    async fn query(&self, query: &SeriesQuery) -> RepoResult<Vec<Record>>;

    /// Check the backend is reachable
    async fn health_check(&self) -> RepoResult<()>;
}

// ============================================================================
// Notification Sink
// ============================================================================

#[async_trait]
pub trait NotificationSink: Send + Sync {
    /// Deliver one relayed transition
    async fn notify(&self, event: &VoiceTransitionEvent) -> RepoResult<()>;
}
