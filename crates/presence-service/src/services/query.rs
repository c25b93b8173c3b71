//! Aggregate query engine
//!
//! Read side of the pipeline: latest headcounts, the published ranking, and
//! per-member voice time reduced from the raw event log.

use chrono::{DateTime, Duration, TimeZone, Utc};
use tracing::{debug, instrument, warn};

use presence_core::entities::decode_ranking;
use presence_core::timeseries::schema::{fields, tags, VOICE_EVENTS, VOICE_RANK};
use presence_core::{
    DomainError, EventType, MeasurementKind, PresenceAggregateSnapshot, Record, SeriesQuery,
    Snowflake, VoiceRankFact, EMPTY_ONCALL_SENTINEL,
};

use crate::settings::QuerySettings;

use super::accumulator::VoiceDurationAccumulator;
use super::context::ServiceContext;
use super::error::{ServiceError, ServiceResult};

/// Latest headcount for one guild and kind
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Headcount {
    pub guild_name: String,
    pub count: i64,
    /// Display names joined with `,`
    pub members: String,
    pub as_of: DateTime<Utc>,
}

impl Headcount {
    fn from_snapshot(snapshot: PresenceAggregateSnapshot) -> Self {
        let members = if snapshot.count == 0 {
            match snapshot.kind {
                MeasurementKind::Oncall => EMPTY_ONCALL_SENTINEL.to_string(),
                MeasurementKind::Online => String::new(),
            }
        } else {
            snapshot.member_list()
        };
        Self {
            guild_name: snapshot.guild_name,
            count: snapshot.count,
            members,
            as_of: snapshot.timestamp,
        }
    }
}

/// Both headcounts for one guild
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VoiceCallStatus {
    pub oncall: Headcount,
    pub online: Headcount,
}

/// Latest published ranking
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VoiceRank {
    pub guild_name: String,
    pub total_duration: Duration,
    pub user_count: i64,
    /// `display_name:seconds` pairs in rank order
    pub ranking: String,
    pub as_of: DateTime<Utc>,
}

impl VoiceRank {
    pub fn entries(&self) -> Vec<(String, Duration)> {
        decode_ranking(&self.ranking)
    }
}

impl From<VoiceRankFact> for VoiceRank {
    fn from(fact: VoiceRankFact) -> Self {
        Self {
            guild_name: fact.guild_name,
            total_duration: Duration::seconds(fact.total_duration),
            user_count: fact.user_count,
            ranking: fact.ranking,
            as_of: fact.timestamp,
        }
    }
}

/// Aggregate query engine
pub struct AggregateQueryEngine<'a> {
    ctx: &'a ServiceContext,
    settings: QuerySettings,
}

impl<'a> AggregateQueryEngine<'a> {
    pub fn new(ctx: &'a ServiceContext, settings: QuerySettings) -> Self {
        Self { ctx, settings }
    }

    /// Newest-first rows of `measurement` for one guild inside `lookback`
    async fn recent(
        &self,
        measurement: &str,
        guild_id: Snowflake,
        lookback: Duration,
    ) -> ServiceResult<Vec<Record>> {
        let query = SeriesQuery::new(measurement, Utc::now() - lookback)
            .tag_eq(tags::GUILD_ID, guild_id)
            .descending();
        Ok(self.ctx.query(&query).await?)
    }

    /// Most recent well-formed snapshot
    async fn latest_snapshot(
        &self,
        guild_id: Snowflake,
        kind: MeasurementKind,
    ) -> ServiceResult<PresenceAggregateSnapshot> {
        let rows = self
            .recent(kind.measurement(), guild_id, self.settings.lookback)
            .await?;

        rows.iter()
            .find_map(|record| match PresenceAggregateSnapshot::from_record(kind, record) {
                Ok(snapshot) => Some(snapshot),
                Err(e) => {
                    warn!(error = %e, measurement = kind.measurement(), "Skipping malformed snapshot");
                    None
                }
            })
            .ok_or_else(|| {
                DomainError::SnapshotNotFound {
                    guild_id,
                    measurement: kind.measurement(),
                }
                .into()
            })
    }

    /// Members currently in a voice channel. An empty call reads as the
    /// sentinel, never as an empty string.
    #[instrument(skip(self))]
    pub async fn get_oncall_users(&self, guild_id: Snowflake) -> ServiceResult<Headcount> {
        let snapshot = self.latest_snapshot(guild_id, MeasurementKind::Oncall).await?;
        Ok(Headcount::from_snapshot(snapshot))
    }

    /// Members online but not in a call. Zero reads as `""`.
    #[instrument(skip(self))]
    pub async fn get_online_users(&self, guild_id: Snowflake) -> ServiceResult<Headcount> {
        let snapshot = self.latest_snapshot(guild_id, MeasurementKind::Online).await?;
        Ok(Headcount::from_snapshot(snapshot))
    }

    #[instrument(skip(self))]
    pub async fn get_voice_call_status(&self, guild_id: Snowflake) -> ServiceResult<VoiceCallStatus> {
        let (oncall, online) = tokio::try_join!(
            self.get_oncall_users(guild_id),
            self.get_online_users(guild_id)
        )?;
        Ok(VoiceCallStatus { oncall, online })
    }

    #[instrument(skip(self))]
    pub async fn get_voice_rank(&self, guild_id: Snowflake) -> ServiceResult<VoiceRank> {
        let rows = self
            .recent(VOICE_RANK, guild_id, self.settings.rank_lookback)
            .await?;

        rows.iter()
            .find_map(|record| match VoiceRankFact::from_record(record) {
                Ok(fact) => Some(VoiceRank::from(fact)),
                Err(e) => {
                    warn!(error = %e, "Skipping malformed ranking");
                    None
                }
            })
            .ok_or_else(|| {
                DomainError::SnapshotNotFound {
                    guild_id,
                    measurement: VOICE_RANK,
                }
                .into()
            })
    }

    /// Cumulative voice time since the start of `year`, leaving out one
    /// channel. Records without a boolean state or a timestamp are skipped.
    #[instrument(skip(self))]
    pub async fn get_user_voice_time(
        &self,
        username: &str,
        guild_id: Snowflake,
        ignored_channel_id: Option<Snowflake>,
        year: i32,
    ) -> ServiceResult<Duration> {
        let start = Utc
            .with_ymd_and_hms(year, 1, 1, 0, 0, 0)
            .single()
            .ok_or_else(|| ServiceError::validation(format!("invalid year {year}")))?;

        let mut query = SeriesQuery::new(VOICE_EVENTS, start)
            .tag_eq(tags::USERNAME, username)
            .tag_eq(tags::GUILD_ID, guild_id)
            .tag_eq(tags::EVENT_TYPE, EventType::Voice.as_str());
        if let Some(channel_id) = ignored_channel_id {
            query = query.tag_ne(tags::CHANNEL_ID, channel_id);
        }

        let rows = self.ctx.query(&query).await?;
        let mut skipped = 0usize;
        let acc: VoiceDurationAccumulator = rows
            .iter()
            .filter_map(|record| {
                match (record.require_bool(fields::STATE), record.require_time()) {
                    (Ok(state), Ok(at)) => Some((state, at)),
                    _ => {
                        skipped += 1;
                        None
                    }
                }
            })
            .collect();

        if skipped > 0 {
            warn!(skipped, "Skipped malformed voice events");
        }
        debug!(total_secs = acc.total().num_seconds(), "Voice time computed");
        Ok(acc.total())
    }
}
