//! Resolved settings for each pipeline component
//!
//! Built once from `AppConfig` at the process boundary. Components never
//! read the environment themselves.

use std::time::Duration;

use presence_common::AppConfig;
use presence_core::Snowflake;

/// Presence sampler settings
#[derive(Debug, Clone, Default)]
pub struct SamplerSettings {
    /// Voice channel names that do not count as on-call
    pub ignored_channels: Vec<String>,
}

impl SamplerSettings {
    pub fn is_ignored_channel(&self, name: &str) -> bool {
        self.ignored_channels.iter().any(|c| c == name)
    }
}

/// Voice event recorder settings
#[derive(Debug, Clone, Default)]
pub struct RecorderSettings {
    /// Members whose transitions are never written
    pub ignored_usernames: Vec<String>,
}

impl RecorderSettings {
    pub fn is_ignored_user(&self, username: &str) -> bool {
        self.ignored_usernames.iter().any(|u| u == username)
    }
}

/// Change detector settings
#[derive(Debug, Clone)]
pub struct DetectorSettings {
    /// The one guild whose transitions are relayed
    pub guild_id: Snowflake,
    pub poll_interval: Duration,
    pub queue_capacity: usize,
}

impl DetectorSettings {
    pub fn new(guild_id: Snowflake) -> Self {
        Self {
            guild_id,
            poll_interval: Duration::from_secs(1),
            queue_capacity: 200,
        }
    }
}

/// Aggregate query settings
#[derive(Debug, Clone, Copy)]
pub struct QuerySettings {
    /// Snapshots older than this are treated as absent
    pub lookback: chrono::Duration,
    /// Lookback for the published ranking, which is written less often
    pub rank_lookback: chrono::Duration,
}

impl Default for QuerySettings {
    fn default() -> Self {
        Self {
            lookback: chrono::Duration::minutes(10),
            rank_lookback: chrono::Duration::minutes(10),
        }
    }
}

/// Rank computer settings
#[derive(Debug, Clone)]
pub struct RankSettings {
    /// Channel excluded from cumulative voice time
    pub ignored_channel_id: Option<Snowflake>,
    /// Voice-time queries in flight per guild
    pub concurrency: usize,
    pub interval: Duration,
}

impl Default for RankSettings {
    fn default() -> Self {
        Self {
            ignored_channel_id: None,
            concurrency: 4,
            interval: Duration::from_secs(300),
        }
    }
}

/// Everything the sampler and rank loops need
#[derive(Debug, Clone)]
pub struct CollectorSettings {
    pub sampler: SamplerSettings,
    pub sample_interval: Duration,
    pub rank: RankSettings,
    pub query: QuerySettings,
}

impl Default for CollectorSettings {
    fn default() -> Self {
        Self {
            sampler: SamplerSettings::default(),
            sample_interval: Duration::from_secs(30),
            rank: RankSettings::default(),
            query: QuerySettings::default(),
        }
    }
}

impl From<&AppConfig> for SamplerSettings {
    fn from(config: &AppConfig) -> Self {
        Self {
            ignored_channels: config.discord.ignored_channels.clone(),
        }
    }
}

impl From<&AppConfig> for RecorderSettings {
    fn from(config: &AppConfig) -> Self {
        Self {
            ignored_usernames: config.discord.ignored_usernames.clone(),
        }
    }
}

impl From<&AppConfig> for DetectorSettings {
    fn from(config: &AppConfig) -> Self {
        Self {
            guild_id: config.discord.guild_id,
            poll_interval: Duration::from_millis(config.schedule.poll_interval_ms),
            queue_capacity: config.notify.queue_capacity,
        }
    }
}

impl From<&AppConfig> for QuerySettings {
    fn from(config: &AppConfig) -> Self {
        let lookback = secs(config.schedule.lookback_window_secs);
        // Two rank periods, so one missed publish does not read as absent
        let rank_lookback = lookback.max(secs(config.schedule.rank_interval_secs.saturating_mul(2)));
        Self {
            lookback,
            rank_lookback,
        }
    }
}

impl From<&AppConfig> for RankSettings {
    fn from(config: &AppConfig) -> Self {
        Self {
            ignored_channel_id: config.discord.ignored_channel_id,
            interval: Duration::from_secs(config.schedule.rank_interval_secs),
            ..Self::default()
        }
    }
}

impl From<&AppConfig> for CollectorSettings {
    fn from(config: &AppConfig) -> Self {
        Self {
            sampler: config.into(),
            sample_interval: Duration::from_secs(config.schedule.sample_interval_secs),
            rank: config.into(),
            query: config.into(),
        }
    }
}

fn secs(value: u64) -> chrono::Duration {
    chrono::Duration::seconds(i64::try_from(value).unwrap_or(i64::MAX / 1_000))
}
