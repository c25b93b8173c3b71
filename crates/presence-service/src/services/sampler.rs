//! Presence sampler
//!
//! Classifies every guild member as on-call, online, or neither, and writes
//! one `oncall_users` and one `online_users` snapshot per guild per pass.

use std::collections::HashSet;

use chrono::Utc;
use tracing::{debug, info, instrument, warn};

use presence_core::traits::RosterProvider;
use presence_core::{
    GuildRef, MeasurementKind, Member, PresenceAggregateSnapshot, PresenceStatus, Snowflake,
};

use crate::settings::SamplerSettings;

use super::context::ServiceContext;
use super::error::ServiceResult;

/// Live state gathered for one member. `None` means the lookup failed or
/// there was nothing to look up.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MemberPresence {
    /// Name of the voice channel the member is connected to
    pub channel_name: Option<String>,
    pub status: Option<PresenceStatus>,
}

impl MemberPresence {
    pub fn in_channel(name: impl Into<String>) -> Self {
        Self {
            channel_name: Some(name.into()),
            status: None,
        }
    }

    pub fn with_status(mut self, status: PresenceStatus) -> Self {
        self.status = Some(status);
        self
    }
}

/// Display names per bucket, in roster order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PresenceTally {
    pub oncall: Vec<String>,
    pub online: Vec<String>,
}

/// Classify members. On-call wins over online, bots never count, and a
/// user id contributes at most once.
pub fn tally(members: &[(Member, MemberPresence)], settings: &SamplerSettings) -> PresenceTally {
    let mut seen: HashSet<Snowflake> = HashSet::new();
    let mut result = PresenceTally::default();

    for (member, presence) in members {
        if member.is_bot() || seen.contains(&member.user_id) {
            continue;
        }

        let on_call = presence
            .channel_name
            .as_deref()
            .is_some_and(|name| !settings.is_ignored_channel(name));
        if on_call {
            seen.insert(member.user_id);
            result.oncall.push(member.display_name().to_string());
            continue;
        }

        if presence.status.is_some_and(|s| s.is_online()) {
            seen.insert(member.user_id);
            result.online.push(member.display_name().to_string());
        }
    }

    result
}

/// Outcome of one pass over every guild
#[derive(Debug, Default)]
pub struct SweepReport {
    pub succeeded: usize,
    pub failed: Vec<GuildFailure>,
}

#[derive(Debug)]
pub struct GuildFailure {
    pub guild_id: Snowflake,
    pub error: String,
}

impl SweepReport {
    pub fn record_failure(&mut self, guild_id: Snowflake, error: impl ToString) {
        self.failed.push(GuildFailure {
            guild_id,
            error: error.to_string(),
        });
    }
}

/// Presence sampler
pub struct PresenceSampler<'a> {
    ctx: &'a ServiceContext,
    roster: &'a dyn RosterProvider,
    settings: &'a SamplerSettings,
}

impl<'a> PresenceSampler<'a> {
    pub fn new(
        ctx: &'a ServiceContext,
        roster: &'a dyn RosterProvider,
        settings: &'a SamplerSettings,
    ) -> Self {
        Self {
            ctx,
            roster,
            settings,
        }
    }

    /// Gather live state for one member. Lookup failures are logged and
    /// leave the corresponding slot empty.
    async fn look_up(&self, guild_id: Snowflake, member: &Member) -> MemberPresence {
        let mut presence = MemberPresence::default();

        match self.roster.voice_state(guild_id, member.user_id).await {
            Ok(Some(voice)) => {
                if let Some(channel_id) = voice.channel_id {
                    match self.roster.channel_name(channel_id).await {
                        Ok(name) => presence.channel_name = Some(name),
                        Err(e) => {
                            warn!(user_id = %member.user_id, %channel_id, error = %e, "Channel lookup failed")
                        }
                    }
                }
            }
            Ok(None) => {}
            Err(e) => warn!(user_id = %member.user_id, error = %e, "Voice state lookup failed"),
        }

        match self.roster.presence_status(guild_id, member.user_id).await {
            Ok(status) => presence.status = Some(status),
            Err(e) => warn!(user_id = %member.user_id, error = %e, "Presence lookup failed"),
        }

        presence
    }

    /// Sample one guild and write both snapshots with the same timestamp
    #[instrument(skip(self, guild), fields(guild_id = %guild.id))]
    pub async fn sample_guild(&self, guild: &GuildRef) -> ServiceResult<PresenceTally> {
        let members = self.roster.list_members(guild.id).await?;

        let mut observed = Vec::with_capacity(members.len());
        for member in members {
            let presence = if member.is_bot() {
                MemberPresence::default()
            } else {
                self.look_up(guild.id, &member).await
            };
            observed.push((member, presence));
        }

        let result = tally(&observed, self.settings);
        let now = Utc::now();

        for (kind, names) in [
            (MeasurementKind::Oncall, &result.oncall),
            (MeasurementKind::Online, &result.online),
        ] {
            let snapshot =
                PresenceAggregateSnapshot::new(guild.id, guild.name.as_str(), kind, names.clone(), now);
            self.ctx.write_point(snapshot.to_point()).await?;
        }

        debug!(
            oncall = result.oncall.len(),
            online = result.online.len(),
            "Guild sampled"
        );
        Ok(result)
    }

    /// Sample every guild. A failing guild is reported and skipped; only a
    /// failed guild listing or cancellation fails the sweep.
    #[instrument(skip(self))]
    pub async fn sweep(&self) -> ServiceResult<SweepReport> {
        let guilds = self.roster.list_guilds().await?;
        let total = guilds.len();
        let mut report = SweepReport::default();

        for guild in guilds {
            match self.sample_guild(&guild).await {
                Ok(_) => report.succeeded += 1,
                Err(e) if e.is_cancelled() => return Err(e),
                Err(e) => {
                    warn!(guild_id = %guild.id, error = %e, "Presence sample failed");
                    report.record_failure(guild.id, e);
                }
            }
        }

        info!(
            guilds = total,
            failed = report.failed.len(),
            "Presence sweep finished"
        );
        Ok(report)
    }
}
