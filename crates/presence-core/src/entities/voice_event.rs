//! Voice transition events - one boolean state flip for one member

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::DomainError;
use crate::timeseries::schema::{fields, tags, VOICE_EVENTS};
use crate::timeseries::{Point, Record};
use crate::value_objects::Snowflake;

/// Kind of voice-state flag that changed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventType {
    /// Joined (`true`) or left (`false`) a voice channel
    Voice,
    Mute,
    Deafen,
    Webcam,
    Streaming,
}

impl EventType {
    /// Event types forwarded to the notification consumer
    pub const RELAYED: [EventType; 3] = [Self::Voice, Self::Webcam, Self::Streaming];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Voice => "voice",
            Self::Mute => "mute",
            Self::Deafen => "deafen",
            Self::Webcam => "webcam",
            Self::Streaming => "streaming",
        }
    }

    /// Mute and deafen are persisted but never relayed
    #[inline]
    pub fn is_relayed(&self) -> bool {
        Self::RELAYED.contains(self)
    }
}

impl std::fmt::Display for EventType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for EventType {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "voice" => Ok(Self::Voice),
            "mute" => Ok(Self::Mute),
            "deafen" => Ok(Self::Deafen),
            "webcam" => Ok(Self::Webcam),
            "streaming" => Ok(Self::Streaming),
            other => Err(DomainError::UnknownEventType(other.to_string())),
        }
    }
}

/// Immutable record of a single voice-state transition
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoiceTransitionEvent {
    pub user_id: Snowflake,
    pub username: String,
    pub display_name: String,
    pub guild_id: Snowflake,
    pub channel_id: Snowflake,
    pub channel_name: String,
    pub event_type: EventType,
    pub state: bool,
    pub timestamp: DateTime<Utc>,
}

impl VoiceTransitionEvent {
    /// Encode as a `voice_events` point
    pub fn to_point(&self) -> Point {
        Point::new(VOICE_EVENTS, self.timestamp)
            .tag(tags::USER_ID, self.user_id.to_string())
            .tag(tags::USERNAME, self.username.as_str())
            .tag(tags::USER_DISPLAY_NAME, self.display_name.as_str())
            .tag(tags::GUILD_ID, self.guild_id.to_string())
            .tag(tags::CHANNEL_ID, self.channel_id.to_string())
            .tag(tags::CHANNEL_NAME, self.channel_name.as_str())
            .tag(tags::EVENT_TYPE, self.event_type.as_str())
            .field(fields::STATE, self.state)
    }
}

impl TryFrom<&Record> for VoiceTransitionEvent {
    type Error = DomainError;

    /// Validate a `voice_events` row. Display and channel names are
    /// optional on read since empty tags are never written.
    fn try_from(record: &Record) -> Result<Self, Self::Error> {
        let username = record.require_str(tags::USERNAME)?.to_string();
        // Writers drop empty tags, so a missing name means it was empty.
        // Fall back instead of rejecting the row like other missing columns.
        let display_name = record
            .optional_str(tags::USER_DISPLAY_NAME)
            .unwrap_or(&username)
            .to_string();

        Ok(Self {
            user_id: record.require_snowflake(tags::USER_ID)?,
            display_name,
            username,
            guild_id: record.require_snowflake(tags::GUILD_ID)?,
            channel_id: record.require_snowflake(tags::CHANNEL_ID)?,
            channel_name: record
                .optional_str(tags::CHANNEL_NAME)
                .unwrap_or_default()
                .to_string(),
            event_type: record.require_str(tags::EVENT_TYPE)?.parse()?,
            state: record.require_bool(fields::STATE)?,
            timestamp: record.require_time()?,
        })
    }
}
