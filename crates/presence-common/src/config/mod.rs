//! Configuration structs

mod app_config;

pub use app_config::{
    normalize_url, AppConfig, AppSettings, ConfigError, DiscordConfig, Environment, InfluxConfig,
    NotifyConfig, ScheduleConfig, ServerConfig,
};
