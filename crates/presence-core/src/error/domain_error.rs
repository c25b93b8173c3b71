//! Domain errors - error types for the domain layer

use thiserror::Error;

use crate::value_objects::Snowflake;

/// Domain layer errors
#[derive(Debug, Error)]
pub enum DomainError {
    // =========================================================================
    // Not Found Errors
    // =========================================================================
    #[error("No {measurement} snapshot for guild {guild_id} within the lookback window")]
    SnapshotNotFound {
        guild_id: Snowflake,
        measurement: &'static str,
    },

    #[error("Guild not found: {0}")]
    GuildNotFound(Snowflake),

    #[error("Channel not found: {0}")]
    ChannelNotFound(Snowflake),

    // =========================================================================
    // Data Integrity Errors
    // =========================================================================
    #[error("Record is missing required field: {0}")]
    MissingField(&'static str),

    #[error("Record field {field} is not a valid {expected}")]
    InvalidField {
        field: &'static str,
        expected: &'static str,
    },

    #[error("Unknown event type: {0}")]
    UnknownEventType(String),

    // =========================================================================
    // Collaborator Errors
    // =========================================================================
    #[error("Store error: {0}")]
    StoreError(String),

    #[error("Roster error: {0}")]
    RosterError(String),

    #[error("Notifier error: {0}")]
    NotifierError(String),

    // =========================================================================
    // Lifecycle
    // =========================================================================
    #[error("Operation cancelled")]
    Cancelled,
}

impl DomainError {
    /// Get an error code string for API responses
    pub fn code(&self) -> &'static str {
        match self {
            // Not Found
            Self::SnapshotNotFound { .. } => "SNAPSHOT_NOT_FOUND",
            Self::GuildNotFound(_) => "UNKNOWN_GUILD",
            Self::ChannelNotFound(_) => "UNKNOWN_CHANNEL",

            // Data Integrity
            Self::MissingField(_) => "MISSING_FIELD",
            Self::InvalidField { .. } => "INVALID_FIELD",
            Self::UnknownEventType(_) => "UNKNOWN_EVENT_TYPE",

            // Collaborators
            Self::StoreError(_) => "STORE_ERROR",
            Self::RosterError(_) => "ROSTER_ERROR",
            Self::NotifierError(_) => "NOTIFIER_ERROR",

            // Lifecycle
            Self::Cancelled => "CANCELLED",
        }
    }

    /// Check if this is a "not found" error
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            Self::SnapshotNotFound { .. }
                | Self::GuildNotFound(_)
                | Self::ChannelNotFound(_)
        )
    }

    /// Check if a record failed validation
    pub fn is_integrity(&self) -> bool {
        matches!(
            self,
            Self::MissingField(_) | Self::InvalidField { .. } | Self::UnknownEventType(_)
        )
    }

    /// Check if an external collaborator failed
    pub fn is_collaborator(&self) -> bool {
        matches!(
            self,
            Self::StoreError(_) | Self::RosterError(_) | Self::NotifierError(_)
        )
    }

    /// Check if the operation was aborted by shutdown
    pub fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled)
    }
}
