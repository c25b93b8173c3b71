//! Application configuration structs
//!
//! Loads configuration from environment variables (and a `.env` file when
//! present). Everything is resolved once at startup; the pipeline itself only
//! ever sees the resolved values.

use presence_core::Snowflake;
use serde::Deserialize;
use std::env;
use std::str::FromStr;

/// Main application configuration
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub app: AppSettings,
    pub api: ServerConfig,
    pub influx: InfluxConfig,
    pub discord: DiscordConfig,
    pub schedule: ScheduleConfig,
    pub notify: NotifyConfig,
}

/// General application settings
#[derive(Debug, Clone, Deserialize)]
pub struct AppSettings {
    #[serde(default = "default_app_name")]
    pub name: String,
    #[serde(default)]
    pub env: Environment,
}

/// Environment type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    #[default]
    Development,
    Staging,
    Production,
}

impl Environment {
    #[must_use]
    pub fn is_production(&self) -> bool {
        matches!(self, Self::Production)
    }

    #[must_use]
    pub fn is_development(&self) -> bool {
        matches!(self, Self::Development)
    }
}

impl FromStr for Environment {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "production" => Ok(Self::Production),
            "staging" => Ok(Self::Staging),
            "development" => Ok(Self::Development),
            other => Err(format!("unknown environment '{other}'")),
        }
    }
}

/// HTTP read API bind address
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    pub port: u16,
}

impl ServerConfig {
    #[must_use]
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Time-series store connection
#[derive(Debug, Clone, Deserialize)]
pub struct InfluxConfig {
    pub url: String,
    pub token: String,
    pub org: String,
    pub bucket: String,
    #[serde(default = "default_influx_timeout")]
    pub timeout_secs: u64,
}

/// Chat-platform scoping: which guild is relayed and what is ignored
#[derive(Debug, Clone, Deserialize)]
pub struct DiscordConfig {
    pub guild_id: Snowflake,
    /// Members never recorded
    #[serde(default)]
    pub ignored_usernames: Vec<String>,
    /// Voice channels (by name) that do not count as on-call
    #[serde(default)]
    pub ignored_channels: Vec<String>,
    /// Channel excluded from cumulative voice time
    #[serde(default)]
    pub ignored_channel_id: Option<Snowflake>,
}

/// Loop periods and lookback
#[derive(Debug, Clone, Deserialize)]
pub struct ScheduleConfig {
    #[serde(default = "default_lookback_window")]
    pub lookback_window_secs: u64,
    #[serde(default = "default_poll_interval")]
    pub poll_interval_ms: u64,
    #[serde(default = "default_sample_interval")]
    pub sample_interval_secs: u64,
    #[serde(default = "default_rank_interval")]
    pub rank_interval_secs: u64,
}

impl Default for ScheduleConfig {
    fn default() -> Self {
        Self {
            lookback_window_secs: default_lookback_window(),
            poll_interval_ms: default_poll_interval(),
            sample_interval_secs: default_sample_interval(),
            rank_interval_secs: default_rank_interval(),
        }
    }
}

/// Detector to notifier hand-off
#[derive(Debug, Clone, Deserialize)]
pub struct NotifyConfig {
    #[serde(default = "default_queue_capacity")]
    pub queue_capacity: usize,
    /// JSON webhook; events are only logged when unset
    #[serde(default)]
    pub webhook_url: Option<String>,
}

impl Default for NotifyConfig {
    fn default() -> Self {
        Self {
            queue_capacity: default_queue_capacity(),
            webhook_url: None,
        }
    }
}

// Default value functions
fn default_app_name() -> String {
    "presence-relay".to_string()
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_influx_timeout() -> u64 {
    10
}

fn default_lookback_window() -> u64 {
    600 // 10 minutes
}

fn default_poll_interval() -> u64 {
    1000
}

fn default_sample_interval() -> u64 {
    30
}

fn default_rank_interval() -> u64 {
    300 // 5 minutes
}

fn default_queue_capacity() -> usize {
    200
}

/// Prefix `http://` when the URL carries no scheme
#[must_use]
pub fn normalize_url(url: &str) -> String {
    let url = url.trim().trim_end_matches('/');
    if url.starts_with("http://") || url.starts_with("https://") {
        url.to_string()
    } else {
        format!("http://{url}")
    }
}

/// Variable lookup, abstracted so tests can feed a map instead of the process env
struct Vars<F: Fn(&str) -> Option<String>>(F);

impl<F: Fn(&str) -> Option<String>> Vars<F> {
    /// Non-empty value or `None`
    fn get(&self, key: &str) -> Option<String> {
        (self.0)(key).filter(|v| !v.trim().is_empty())
    }

    fn required(&self, key: &'static str) -> Result<String, ConfigError> {
        self.get(key).ok_or(ConfigError::MissingVar(key))
    }

    fn parse<T: FromStr>(&self, key: &'static str) -> Result<Option<T>, ConfigError> {
        self.get(key)
            .map(|raw| {
                raw.trim()
                    .parse::<T>()
                    .map_err(|_| ConfigError::InvalidValue(key, raw.clone()))
            })
            .transpose()
    }

    fn parse_or(&self, key: &'static str, default: impl FnOnce() -> u64) -> Result<u64, ConfigError> {
        Ok(self.parse(key)?.unwrap_or_else(default))
    }

    /// Like `parse_or` but zero is rejected
    fn positive_or(
        &self,
        key: &'static str,
        default: impl FnOnce() -> u64,
    ) -> Result<u64, ConfigError> {
        match self.parse_or(key, default)? {
            0 => Err(ConfigError::InvalidValue(key, "0".to_string())),
            n => Ok(n),
        }
    }

    /// Comma-separated list, blanks dropped
    fn list(&self, key: &str) -> Vec<String> {
        self.get(key)
            .map(|s| {
                s.split(',')
                    .map(str::trim)
                    .filter(|s| !s.is_empty())
                    .map(String::from)
                    .collect()
            })
            .unwrap_or_default()
    }
}

impl AppConfig {
    /// Load configuration from environment variables
    ///
    /// # Errors
    /// Returns an error if required environment variables are missing or
    /// a value cannot be parsed
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration from an arbitrary variable source
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let vars = Vars(lookup);

        let queue_capacity = vars
            .parse::<usize>("NOTIFY_QUEUE_CAPACITY")?
            .unwrap_or_else(default_queue_capacity);
        if queue_capacity == 0 {
            return Err(ConfigError::InvalidValue(
                "NOTIFY_QUEUE_CAPACITY",
                "0".to_string(),
            ));
        }

        Ok(Self {
            app: AppSettings {
                name: vars.get("APP_NAME").unwrap_or_else(default_app_name),
                env: vars
                    .get("APP_ENV")
                    .map(|raw| {
                        raw.parse()
                            .map_err(|_| ConfigError::InvalidValue("APP_ENV", raw.clone()))
                    })
                    .transpose()?
                    .unwrap_or_default(),
            },
            api: ServerConfig {
                host: vars.get("API_HOST").unwrap_or_else(default_host),
                port: vars
                    .parse("API_PORT")?
                    .ok_or(ConfigError::MissingVar("API_PORT"))?,
            },
            influx: InfluxConfig {
                url: normalize_url(&vars.required("INFLUX_URL")?),
                token: vars.required("INFLUX_TOKEN")?,
                org: vars.required("INFLUX_ORG")?,
                bucket: vars.required("INFLUX_BUCKET")?,
                timeout_secs: vars.positive_or("INFLUX_TIMEOUT_SECS", default_influx_timeout)?,
            },
            discord: DiscordConfig {
                guild_id: vars
                    .parse("DISCORD_GUILD_ID")?
                    .ok_or(ConfigError::MissingVar("DISCORD_GUILD_ID"))?,
                ignored_usernames: vars.list("DISCORD_IGNORED_USERNAMES"),
                ignored_channels: vars.list("DISCORD_IGNORED_CHANNELS"),
                ignored_channel_id: vars.parse("DISCORD_IGNORED_CHANNEL_ID")?,
            },
            schedule: ScheduleConfig {
                lookback_window_secs: vars
                    .positive_or("LOOKBACK_WINDOW_SECS", default_lookback_window)?,
                poll_interval_ms: vars.positive_or("POLL_INTERVAL_MS", default_poll_interval)?,
                sample_interval_secs: vars
                    .positive_or("SAMPLE_INTERVAL_SECS", default_sample_interval)?,
                rank_interval_secs: vars.positive_or("RANK_INTERVAL_SECS", default_rank_interval)?,
            },
            notify: NotifyConfig {
                queue_capacity,
                webhook_url: vars.get("NOTIFY_WEBHOOK_URL"),
            },
        })
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingVar(&'static str),

    #[error("Invalid value for {0}: {1}")]
    InvalidValue(&'static str, String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn base_vars() -> HashMap<&'static str, &'static str> {
        HashMap::from([
            ("API_PORT", "8080"),
            ("INFLUX_URL", "localhost:8086"),
            ("INFLUX_TOKEN", "secret"),
            ("INFLUX_ORG", "home"),
            ("INFLUX_BUCKET", "discord"),
            ("DISCORD_GUILD_ID", "175928847299117063"),
        ])
    }

    fn load(vars: &HashMap<&'static str, &'static str>) -> Result<AppConfig, ConfigError> {
        AppConfig::from_lookup(|key| vars.get(key).map(|v| (*v).to_string()))
    }

    #[test]
    fn test_environment_is_production() {
        assert!(!Environment::Development.is_production());
        assert!(!Environment::Staging.is_production());
        assert!(Environment::Production.is_production());
    }

    #[test]
    fn test_environment_is_development() {
        assert!(Environment::Development.is_development());
        assert!(!Environment::Staging.is_development());
        assert!(!Environment::Production.is_development());
    }

    #[test]
    fn test_server_address() {
        let config = ServerConfig {
            host: "0.0.0.0".to_string(),
            port: 8080,
        };
        assert_eq!(config.address(), "0.0.0.0:8080");
    }

    #[test]
    fn test_normalize_url() {
        assert_eq!(normalize_url("localhost:8086"), "http://localhost:8086");
        assert_eq!(normalize_url("https://influx.example/"), "https://influx.example");
        assert_eq!(normalize_url("http://10.0.0.2:8086"), "http://10.0.0.2:8086");
    }

    #[test]
    fn test_defaults() {
        let config = load(&base_vars()).unwrap();

        assert_eq!(config.app.name, "presence-relay");
        assert_eq!(config.app.env, Environment::Development);
        assert_eq!(config.api.address(), "127.0.0.1:8080");
        assert_eq!(config.influx.url, "http://localhost:8086");
        assert_eq!(config.influx.timeout_secs, 10);
        assert_eq!(config.discord.guild_id, Snowflake::new(175928847299117063));
        assert!(config.discord.ignored_usernames.is_empty());
        assert!(config.discord.ignored_channel_id.is_none());
        assert_eq!(config.schedule.lookback_window_secs, 600);
        assert_eq!(config.schedule.poll_interval_ms, 1000);
        assert_eq!(config.schedule.sample_interval_secs, 30);
        assert_eq!(config.schedule.rank_interval_secs, 300);
        assert_eq!(config.notify.queue_capacity, 200);
        assert!(config.notify.webhook_url.is_none());
    }

    #[test]
    fn test_lists_are_trimmed() {
        let mut vars = base_vars();
        vars.insert("DISCORD_IGNORED_CHANNELS", " AFK , Music,, ");
        vars.insert("DISCORD_IGNORED_USERNAMES", "bot-one");
        let config = load(&vars).unwrap();

        assert_eq!(config.discord.ignored_channels, vec!["AFK", "Music"]);
        assert_eq!(config.discord.ignored_usernames, vec!["bot-one"]);
    }

    #[test]
    fn test_missing_required() {
        let mut vars = base_vars();
        vars.remove("INFLUX_TOKEN");
        assert!(matches!(load(&vars), Err(ConfigError::MissingVar("INFLUX_TOKEN"))));

        let mut vars = base_vars();
        vars.insert("DISCORD_GUILD_ID", "");
        assert!(matches!(
            load(&vars),
            Err(ConfigError::MissingVar("DISCORD_GUILD_ID"))
        ));
    }

    #[test]
    fn test_invalid_values() {
        let mut vars = base_vars();
        vars.insert("POLL_INTERVAL_MS", "soon");
        assert!(matches!(
            load(&vars),
            Err(ConfigError::InvalidValue("POLL_INTERVAL_MS", _))
        ));

        let mut vars = base_vars();
        vars.insert("NOTIFY_QUEUE_CAPACITY", "0");
        assert!(matches!(
            load(&vars),
            Err(ConfigError::InvalidValue("NOTIFY_QUEUE_CAPACITY", _))
        ));

        let mut vars = base_vars();
        vars.insert("APP_ENV", "prod-ish");
        assert!(matches!(load(&vars), Err(ConfigError::InvalidValue("APP_ENV", _))));

        let mut vars = base_vars();
        vars.insert("DISCORD_IGNORED_CHANNEL_ID", "afk");
        assert!(matches!(
            load(&vars),
            Err(ConfigError::InvalidValue("DISCORD_IGNORED_CHANNEL_ID", _))
        ));
    }
}
