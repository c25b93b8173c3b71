//! Live member state - online status and voice connection

use serde::{Deserialize, Serialize};

use crate::value_objects::Snowflake;

/// Member online status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PresenceStatus {
    Online,
    /// Away from keyboard
    Idle,
    /// Do not disturb
    Dnd,
    /// Offline or invisible
    #[default]
    Offline,
}

impl PresenceStatus {
    /// Anything but offline counts as online
    #[must_use]
    pub fn is_online(&self) -> bool {
        !matches!(self, Self::Offline)
    }
}

impl std::fmt::Display for PresenceStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Online => write!(f, "online"),
            Self::Idle => write!(f, "idle"),
            Self::Dnd => write!(f, "dnd"),
            Self::Offline => write!(f, "offline"),
        }
    }
}

impl std::str::FromStr for PresenceStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "online" => Ok(Self::Online),
            "idle" => Ok(Self::Idle),
            "dnd" => Ok(Self::Dnd),
            "offline" | "invisible" => Ok(Self::Offline),
            _ => Err(format!("Invalid status: {s}")),
        }
    }
}

/// A member's voice connection at one instant
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct VoiceState {
    /// `None` when not connected
    pub channel_id: Option<Snowflake>,
    pub self_mute: bool,
    pub self_deaf: bool,
    pub self_video: bool,
    pub self_stream: bool,
}

impl VoiceState {
    /// Connected to `channel_id` with every flag cleared
    pub fn connected(channel_id: Snowflake) -> Self {
        Self {
            channel_id: Some(channel_id),
            ..Self::default()
        }
    }

    #[inline]
    pub fn is_connected(&self) -> bool {
        self.channel_id.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_is_online() {
        assert!(PresenceStatus::Online.is_online());
        assert!(PresenceStatus::Idle.is_online());
        assert!(PresenceStatus::Dnd.is_online());
        assert!(!PresenceStatus::Offline.is_online());
        assert_eq!(PresenceStatus::default(), PresenceStatus::Offline);
    }

    #[test]
    fn test_status_parse() {
        assert_eq!("DND".parse::<PresenceStatus>().unwrap(), PresenceStatus::Dnd);
        assert_eq!(
            "invisible".parse::<PresenceStatus>().unwrap(),
            PresenceStatus::Offline
        );
        assert!("away".parse::<PresenceStatus>().is_err());
        assert_eq!(PresenceStatus::Idle.to_string(), "idle");
    }

    #[test]
    fn test_voice_state_connected() {
        let state = VoiceState::connected(Snowflake::new(7));
        assert!(state.is_connected());
        assert!(!state.self_mute);
        assert!(!VoiceState::default().is_connected());
    }
}
