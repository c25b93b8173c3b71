//! Route definitions
//!
//! Read API mounted under /api/v1, health checks at the root.

use axum::{routing::get, Router};

use crate::handlers::{guilds, health};
use crate::state::AppState;

/// Create the main router
pub fn create_router() -> Router<AppState> {
    Router::new()
        .merge(health_routes())
        .nest("/api/v1", api_v1_routes())
}

/// Liveness and readiness checks
pub fn health_routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health::health_check))
        .route("/health/ready", get(health::readiness_check))
}

fn api_v1_routes() -> Router<AppState> {
    Router::new()
        .route("/guilds/:guild_id/oncall", get(guilds::get_oncall_users))
        .route("/guilds/:guild_id/online", get(guilds::get_online_users))
        .route("/guilds/:guild_id/status", get(guilds::get_voice_call_status))
        .route("/guilds/:guild_id/rank", get(guilds::get_voice_rank))
        .route(
            "/guilds/:guild_id/users/:username/voice-time",
            get(guilds::get_user_voice_time),
        )
}
