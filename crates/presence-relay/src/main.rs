//! Relay entry point
//!
//! Run with:
//! ```bash
//! cargo run -p presence-relay
//! ```
//!
//! Configuration is loaded from environment variables (and `.env`).

use anyhow::Context;
use presence_common::{try_init_tracing_with_config, AppConfig, TracingConfig};
use tracing::{error, info};

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        error!(error = ?e, "Relay failed");
        eprintln!("presence-relay: {e:#}");
        std::process::exit(1);
    }
}

async fn run() -> anyhow::Result<()> {
    let config = AppConfig::from_env().context("failed to load configuration")?;

    if let Err(e) = try_init_tracing_with_config(TracingConfig::for_environment(config.app.env)) {
        eprintln!("Warning: Failed to initialize tracing: {e}");
    }

    info!(
        env = ?config.app.env,
        port = config.api.port,
        guild_id = %config.discord.guild_id,
        "Configuration loaded"
    );

    presence_relay::run(config).await?;
    Ok(())
}
