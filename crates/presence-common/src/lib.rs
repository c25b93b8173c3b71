//! # presence-common
//!
//! Shared utilities including configuration, error handling, and telemetry.

pub mod config;
pub mod error;
pub mod telemetry;

// Re-export commonly used types at crate root
pub use config::{
    AppConfig, AppSettings, ConfigError, DiscordConfig, Environment, InfluxConfig, NotifyConfig,
    ScheduleConfig, ServerConfig,
};
pub use error::{AppError, AppResult};
pub use telemetry::{
    try_init_tracing_with_config, TracingConfig, TracingError,
};
