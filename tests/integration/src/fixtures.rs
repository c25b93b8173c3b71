//! Store seeding helpers and response shapes

use chrono::{DateTime, Duration, Utc};
use presence_core::traits::TimeSeriesStore;
use presence_core::{
    EventType, MeasurementKind, PresenceAggregateSnapshot, RankEntry, Snowflake, VoiceRankFact,
    VoiceTransitionEvent,
};
use presence_store::MemoryStore;
use serde::Deserialize;

use crate::helpers::TEST_GUILD_ID;

pub fn test_guild() -> Snowflake {
    Snowflake::new(TEST_GUILD_ID)
}

/// Write one headcount snapshot `age` old
pub async fn seed_snapshot(
    store: &MemoryStore,
    kind: MeasurementKind,
    members: &[&str],
    age: Duration,
) -> anyhow::Result<()> {
    let snapshot = PresenceAggregateSnapshot::new(
        test_guild(),
        "Test Guild",
        kind,
        members.iter().map(ToString::to_string).collect(),
        Utc::now() - age,
    );
    store.write_point(snapshot.to_point()).await?;
    Ok(())
}

/// Publish a ranking of `(display_name, seconds)` pairs, already in order
pub async fn seed_ranking(store: &MemoryStore, ranking: &[(&str, i64)]) -> anyhow::Result<()> {
    let entries: Vec<RankEntry> = ranking
        .iter()
        .enumerate()
        .map(|(i, (name, secs))| RankEntry {
            user_id: Snowflake::new(i as i64 + 1),
            username: name.to_lowercase(),
            display_name: (*name).to_string(),
            guild_id: test_guild(),
            total_duration: Duration::seconds(*secs),
            position: i + 1,
        })
        .collect();
    let fact = VoiceRankFact::from_entries(test_guild(), "Test Guild", &entries, Utc::now());
    store.write_point(fact.to_point()).await?;
    Ok(())
}

/// Write one `voice` transition for `username`
pub async fn seed_voice(
    store: &MemoryStore,
    username: &str,
    channel_id: i64,
    state: bool,
    at: DateTime<Utc>,
) -> anyhow::Result<()> {
    let event = VoiceTransitionEvent {
        user_id: Snowflake::new(1),
        username: username.to_string(),
        display_name: username.to_string(),
        guild_id: test_guild(),
        channel_id: Snowflake::new(channel_id),
        channel_name: format!("channel-{channel_id}"),
        event_type: EventType::Voice,
        state,
        timestamp: at,
    };
    store.write_point(event.to_point()).await?;
    Ok(())
}

#[derive(Debug, Deserialize)]
pub struct HeadcountBody {
    pub guild_name: String,
    pub count: i64,
    pub members: String,
}

#[derive(Debug, Deserialize)]
pub struct StatusBody {
    pub oncall: HeadcountBody,
    pub online: HeadcountBody,
}

#[derive(Debug, Deserialize)]
pub struct RankEntryBody {
    pub position: usize,
    pub display_name: String,
    pub seconds: i64,
}

#[derive(Debug, Deserialize)]
pub struct RankBody {
    pub guild_name: String,
    pub user_count: i64,
    pub total_seconds: i64,
    pub ranking: String,
    pub entries: Vec<RankEntryBody>,
}

#[derive(Debug, Deserialize)]
pub struct VoiceTimeBody {
    pub guild_id: String,
    pub username: String,
    pub year: i32,
    pub total_seconds: i64,
}

#[derive(Debug, Deserialize)]
pub struct ErrorBody {
    pub error: ErrorDetail,
}

#[derive(Debug, Deserialize)]
pub struct ErrorDetail {
    pub code: String,
    pub message: String,
}
