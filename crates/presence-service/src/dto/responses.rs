//! Response DTOs for API endpoints
//!
//! All response DTOs implement `Serialize` for JSON output.
//! Snowflake IDs are serialized as strings for JavaScript compatibility.

use chrono::{DateTime, Duration, Utc};
use serde::Serialize;

use crate::services::{Headcount, VoiceCallStatus, VoiceRank};

// ============================================================================
// Headcounts
// ============================================================================

#[derive(Debug, Clone, Serialize)]
pub struct HeadcountResponse {
    pub guild_name: String,
    pub count: i64,
    pub members: String,
    pub as_of: DateTime<Utc>,
}

impl From<Headcount> for HeadcountResponse {
    fn from(h: Headcount) -> Self {
        Self {
            guild_name: h.guild_name,
            count: h.count,
            members: h.members,
            as_of: h.as_of,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct VoiceCallStatusResponse {
    pub oncall: HeadcountResponse,
    pub online: HeadcountResponse,
}

impl From<VoiceCallStatus> for VoiceCallStatusResponse {
    fn from(status: VoiceCallStatus) -> Self {
        Self {
            oncall: status.oncall.into(),
            online: status.online.into(),
        }
    }
}

// ============================================================================
// Ranking
// ============================================================================

#[derive(Debug, Clone, Serialize)]
pub struct RankEntryResponse {
    pub position: usize,
    pub display_name: String,
    pub seconds: i64,
}

#[derive(Debug, Clone, Serialize)]
pub struct VoiceRankResponse {
    pub guild_name: String,
    pub user_count: i64,
    pub total_seconds: i64,
    /// Stored `display_name:seconds` form
    pub ranking: String,
    pub entries: Vec<RankEntryResponse>,
    pub as_of: DateTime<Utc>,
}

impl From<VoiceRank> for VoiceRankResponse {
    fn from(rank: VoiceRank) -> Self {
        let entries = rank
            .entries()
            .into_iter()
            .enumerate()
            .map(|(i, (display_name, total))| RankEntryResponse {
                position: i + 1,
                display_name,
                seconds: total.num_seconds(),
            })
            .collect();

        Self {
            guild_name: rank.guild_name,
            user_count: rank.user_count,
            total_seconds: rank.total_duration.num_seconds(),
            ranking: rank.ranking,
            entries,
            as_of: rank.as_of,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct VoiceTimeResponse {
    pub guild_id: String,
    pub username: String,
    pub year: i32,
    pub total_seconds: i64,
}

impl VoiceTimeResponse {
    pub fn new(guild_id: impl ToString, username: impl Into<String>, year: i32, total: Duration) -> Self {
        Self {
            guild_id: guild_id.to_string(),
            username: username.into(),
            year,
            total_seconds: total.num_seconds(),
        }
    }
}

// ============================================================================
// Health Responses
// ============================================================================

/// Basic health check response
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: DateTime<Utc>,
}

impl HealthResponse {
    pub fn healthy() -> Self {
        Self {
            status: "healthy".to_string(),
            timestamp: Utc::now(),
        }
    }
}

/// Readiness check response
#[derive(Debug, Clone, Serialize)]
pub struct ReadinessResponse {
    pub status: String,
    pub timestamp: DateTime<Utc>,
    pub checks: HealthChecks,
}

#[derive(Debug, Clone, Serialize)]
pub struct HealthChecks {
    pub store: String,
}

impl ReadinessResponse {
    pub fn ready(store_healthy: bool) -> Self {
        Self {
            status: if store_healthy { "ready" } else { "not_ready" }.to_string(),
            timestamp: Utc::now(),
            checks: HealthChecks {
                store: if store_healthy { "healthy" } else { "unhealthy" }.to_string(),
            },
        }
    }

    pub fn is_ready(&self) -> bool {
        self.status == "ready"
    }
}
