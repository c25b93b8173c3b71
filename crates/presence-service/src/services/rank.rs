//! Rank computer
//!
//! Periodically totals each member's voice time for the current year and
//! publishes the ordered result as a `voice_rank` fact.

use chrono::{Datelike, Duration, Utc};
use futures::stream::{self, StreamExt};
use tracing::{info, instrument, warn};

use presence_core::traits::RosterProvider;
use presence_core::{GuildRef, Member, RankEntry, Snowflake, VoiceRankFact};

use crate::settings::{QuerySettings, RankSettings};

use super::context::ServiceContext;
use super::error::ServiceResult;
use super::query::AggregateQueryEngine;
use super::sampler::SweepReport;

/// Order totals longest first. Ties keep input order; positions run 1..N.
pub fn rank_entries(guild_id: Snowflake, mut totals: Vec<(Member, Duration)>) -> Vec<RankEntry> {
    totals.sort_by(|a, b| b.1.cmp(&a.1));
    totals
        .into_iter()
        .enumerate()
        .map(|(i, (member, total_duration))| RankEntry {
            user_id: member.user_id,
            display_name: member.display_name().to_string(),
            username: member.username,
            guild_id,
            total_duration,
            position: i + 1,
        })
        .collect()
}

/// Rank computer
pub struct RankComputer<'a> {
    ctx: &'a ServiceContext,
    roster: &'a dyn RosterProvider,
    settings: &'a RankSettings,
    query: QuerySettings,
}

impl<'a> RankComputer<'a> {
    pub fn new(
        ctx: &'a ServiceContext,
        roster: &'a dyn RosterProvider,
        settings: &'a RankSettings,
        query: QuerySettings,
    ) -> Self {
        Self {
            ctx,
            roster,
            settings,
            query,
        }
    }

    /// Total every non-bot member's voice time this year and rank them.
    /// Members whose query fails are left out; members with no time rank last.
    #[instrument(skip(self, guild, members), fields(guild_id = %guild.id))]
    pub async fn compute(&self, guild: &GuildRef, members: &[Member]) -> ServiceResult<Vec<RankEntry>> {
        let year = Utc::now().year();
        let guild_id = guild.id;
        let ignored = self.settings.ignored_channel_id;

        // Each lookup owns its inputs so the stream holds no borrows
        let lookups: Vec<_> = members
            .iter()
            .filter(|m| !m.is_bot())
            .cloned()
            .map(|member| {
                let ctx = self.ctx.clone();
                let query = self.query;
                async move {
                    let total = AggregateQueryEngine::new(&ctx, query)
                        .get_user_voice_time(&member.username, guild_id, ignored, year)
                        .await;
                    (member, total)
                }
            })
            .collect();

        // `buffered` keeps roster order, which the stable sort relies on
        let results: Vec<_> = stream::iter(lookups)
            .buffered(self.settings.concurrency.max(1))
            .collect()
            .await;

        let mut totals = Vec::with_capacity(results.len());
        for (member, result) in results {
            match result {
                Ok(total) => totals.push((member, total)),
                Err(e) if e.is_cancelled() => return Err(e),
                Err(e) => {
                    warn!(username = %member.username, error = %e, "Voice time query failed");
                }
            }
        }

        Ok(rank_entries(guild_id, totals))
    }

    /// Write the ranking fact
    #[instrument(skip(self, guild, entries), fields(guild_id = %guild.id))]
    pub async fn publish(&self, guild: &GuildRef, entries: &[RankEntry]) -> ServiceResult<VoiceRankFact> {
        let fact = VoiceRankFact::from_entries(guild.id, guild.name.as_str(), entries, Utc::now());
        self.ctx.write_point(fact.to_point()).await?;
        Ok(fact)
    }

    /// List members, compute, publish
    pub async fn refresh_guild(&self, guild: &GuildRef) -> ServiceResult<VoiceRankFact> {
        let members = self.roster.list_members(guild.id).await?;
        let entries = self.compute(guild, &members).await?;
        self.publish(guild, &entries).await
    }

    /// Refresh every guild; failures are isolated per guild
    #[instrument(skip(self))]
    pub async fn refresh_all(&self) -> ServiceResult<SweepReport> {
        let guilds = self.roster.list_guilds().await?;
        let total = guilds.len();
        let mut report = SweepReport::default();

        for guild in guilds {
            match self.refresh_guild(&guild).await {
                Ok(_) => report.succeeded += 1,
                Err(e) if e.is_cancelled() => return Err(e),
                Err(e) => {
                    warn!(guild_id = %guild.id, error = %e, "Rank refresh failed");
                    report.record_failure(guild.id, e);
                }
            }
        }

        info!(
            guilds = total,
            failed = report.failed.len(),
            "Rank refresh finished"
        );
        Ok(report)
    }
}
