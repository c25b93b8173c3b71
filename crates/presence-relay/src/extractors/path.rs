//! Path parameter types
//!
//! Snowflake ids arrive as strings and are parsed here so a bad id is a 400,
//! not a routing miss.

use presence_core::Snowflake;
use serde::Deserialize;

use crate::response::ApiError;

fn parse_guild_id(raw: &str) -> Result<Snowflake, ApiError> {
    raw.parse()
        .map_err(|_| ApiError::invalid_path("Invalid guild_id format"))
}

/// `/guilds/:guild_id/...`
#[derive(Debug, Deserialize)]
pub struct GuildIdPath {
    pub guild_id: String,
}

impl GuildIdPath {
    pub fn guild_id(&self) -> Result<Snowflake, ApiError> {
        parse_guild_id(&self.guild_id)
    }
}

/// `/guilds/:guild_id/users/:username/...`
#[derive(Debug, Deserialize)]
pub struct GuildUsernamePath {
    pub guild_id: String,
    pub username: String,
}

impl GuildUsernamePath {
    pub fn guild_id(&self) -> Result<Snowflake, ApiError> {
        parse_guild_id(&self.guild_id)
    }

    pub fn username(&self) -> Result<&str, ApiError> {
        let name = self.username.trim();
        if name.is_empty() {
            return Err(ApiError::invalid_path("username must not be empty"));
        }
        Ok(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_guild_id_parsing() {
        let ok = GuildIdPath {
            guild_id: "175928847299117063".to_string(),
        };
        assert_eq!(ok.guild_id().unwrap(), Snowflake::new(175_928_847_299_117_063));

        let bad = GuildIdPath {
            guild_id: "general".to_string(),
        };
        assert_eq!(bad.guild_id().unwrap_err().error_code(), "INVALID_PATH_PARAMETER");
    }

    #[test]
    fn test_blank_username() {
        let path = GuildUsernamePath {
            guild_id: "1".to_string(),
            username: "  ".to_string(),
        };
        assert!(path.username().is_err());
    }
}
