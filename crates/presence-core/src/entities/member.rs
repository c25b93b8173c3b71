//! Member entity - a user's membership in a guild, as the roster reports it

use serde::{Deserialize, Serialize};

use crate::value_objects::Snowflake;

/// Guild member with the three name sources the platform exposes
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Member {
    pub user_id: Snowflake,
    pub username: String,
    /// Guild-specific nickname
    pub nickname: Option<String>,
    /// Account-wide display name
    pub global_name: Option<String>,
    pub bot: bool,
}

impl Member {
    /// Create a member known only by username
    pub fn new(user_id: Snowflake, username: impl Into<String>) -> Self {
        Self {
            user_id,
            username: username.into(),
            nickname: None,
            global_name: None,
            bot: false,
        }
    }

    #[must_use]
    pub fn with_nickname(mut self, nickname: impl Into<String>) -> Self {
        self.nickname = Some(nickname.into());
        self
    }

    #[must_use]
    pub fn with_global_name(mut self, global_name: impl Into<String>) -> Self {
        self.global_name = Some(global_name.into());
        self
    }

    #[must_use]
    pub fn as_bot(mut self) -> Self {
        self.bot = true;
        self
    }

    /// Nickname, then global name, then username; first non-empty wins
    pub fn display_name(&self) -> &str {
        [self.nickname.as_deref(), self.global_name.as_deref()]
            .into_iter()
            .flatten()
            .find(|name| !name.is_empty())
            .unwrap_or(&self.username)
    }

    /// Check if member is a bot account
    #[inline]
    pub fn is_bot(&self) -> bool {
        self.bot
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn member() -> Member {
        Member::new(Snowflake::new(1), "U")
    }

    #[test]
    fn test_display_name_prefers_nickname() {
        let m = member().with_nickname("N").with_global_name("G");
        assert_eq!(m.display_name(), "N");
    }

    #[test]
    fn test_empty_nickname_falls_through() {
        let m = member().with_nickname("").with_global_name("G");
        assert_eq!(m.display_name(), "G");
    }

    #[test]
    fn test_username_fallback() {
        assert_eq!(member().display_name(), "U");
        assert_eq!(member().with_global_name("").display_name(), "U");
    }

    #[test]
    fn test_bot_flag() {
        assert!(!member().is_bot());
        assert!(member().as_bot().is_bot());
    }
}
