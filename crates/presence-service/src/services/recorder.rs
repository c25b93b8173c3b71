//! Voice event recorder
//!
//! Turns a member's before/after voice state into `voice_events` facts.

use chrono::{Duration, Utc};
use tracing::{debug, instrument, warn};

use presence_core::traits::RosterProvider;
use presence_core::{EventType, Member, Snowflake, VoiceState, VoiceTransitionEvent};

use crate::settings::RecorderSettings;

use super::context::ServiceContext;
use super::error::ServiceResult;

/// One boolean flip derived from a state change
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transition {
    pub event_type: EventType,
    pub state: bool,
    pub channel_id: Snowflake,
}

impl Transition {
    fn new(event_type: EventType, state: bool, channel_id: Snowflake) -> Self {
        Self {
            event_type,
            state,
            channel_id,
        }
    }
}

/// Diff two voice states. A channel change yields a leave of the old channel
/// followed by a join of the new one; within one channel each toggled flag
/// yields its own transition.
pub fn voice_transitions(before: &VoiceState, after: &VoiceState) -> Vec<Transition> {
    let mut out = Vec::new();

    if before.channel_id != after.channel_id {
        if let Some(old) = before.channel_id {
            out.push(Transition::new(EventType::Voice, false, old));
        }
        if let Some(new) = after.channel_id {
            out.push(Transition::new(EventType::Voice, true, new));
        }
        return out;
    }

    let Some(channel_id) = after.channel_id else {
        return out;
    };

    let flags = [
        (EventType::Mute, before.self_mute, after.self_mute),
        (EventType::Deafen, before.self_deaf, after.self_deaf),
        (EventType::Webcam, before.self_video, after.self_video),
        (EventType::Streaming, before.self_stream, after.self_stream),
    ];
    for (event_type, was, now) in flags {
        if was != now {
            out.push(Transition::new(event_type, now, channel_id));
        }
    }
    out
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct RecordReport {
    pub recorded: usize,
    /// Transitions dropped because their channel name could not be resolved
    pub skipped: usize,
    /// The member is on the ignore list
    pub ignored: bool,
}

/// Voice event recorder
pub struct VoiceEventRecorder<'a> {
    ctx: &'a ServiceContext,
    roster: &'a dyn RosterProvider,
    settings: &'a RecorderSettings,
}

impl<'a> VoiceEventRecorder<'a> {
    pub fn new(
        ctx: &'a ServiceContext,
        roster: &'a dyn RosterProvider,
        settings: &'a RecorderSettings,
    ) -> Self {
        Self {
            ctx,
            roster,
            settings,
        }
    }

    /// Write one point per transition. Transitions of one update get
    /// strictly increasing timestamps so a leave sorts before the next join.
    #[instrument(skip(self, member, before, after), fields(user_id = %member.user_id))]
    pub async fn record(
        &self,
        guild_id: Snowflake,
        member: &Member,
        before: &VoiceState,
        after: &VoiceState,
    ) -> ServiceResult<RecordReport> {
        if self.settings.is_ignored_user(&member.username) {
            debug!(username = %member.username, "Ignored member");
            return Ok(RecordReport {
                ignored: true,
                ..RecordReport::default()
            });
        }

        let transitions = voice_transitions(before, after);
        let base = Utc::now();
        let mut report = RecordReport::default();

        for (i, transition) in transitions.iter().enumerate() {
            let channel_name = match self.roster.channel_name(transition.channel_id).await {
                Ok(name) => name,
                Err(e) => {
                    warn!(channel_id = %transition.channel_id, error = %e, "Channel lookup failed");
                    report.skipped += 1;
                    continue;
                }
            };

            let event = VoiceTransitionEvent {
                user_id: member.user_id,
                username: member.username.clone(),
                display_name: member.display_name().to_string(),
                guild_id,
                channel_id: transition.channel_id,
                channel_name,
                event_type: transition.event_type,
                state: transition.state,
                timestamp: base + Duration::nanoseconds(i as i64),
            };
            self.ctx.write_point(event.to_point()).await?;
            report.recorded += 1;
        }

        Ok(report)
    }
}
