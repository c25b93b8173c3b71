//! Scripted collaborators shared by the unit tests

use std::collections::{HashMap, HashSet};

use async_trait::async_trait;
use parking_lot::Mutex;

use presence_core::traits::{NotificationSink, RepoResult, RosterProvider};
use presence_core::{
    DomainError, GuildRef, Member, PresenceStatus, Snowflake, VoiceState, VoiceTransitionEvent,
};

#[derive(Default)]
struct RosterState {
    guilds: Vec<GuildRef>,
    members: HashMap<Snowflake, Vec<Member>>,
    voice: HashMap<Snowflake, VoiceState>,
    status: HashMap<Snowflake, PresenceStatus>,
    channels: HashMap<Snowflake, String>,
    fail_guild_list: bool,
    fail_members: HashSet<Snowflake>,
    fail_voice: HashSet<Snowflake>,
    fail_status: HashSet<Snowflake>,
}

/// In-memory roster; every lookup can be made to fail
#[derive(Default)]
pub struct FakeRoster {
    state: Mutex<RosterState>,
}

impl FakeRoster {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_guild(&self, guild: GuildRef, members: Vec<Member>) {
        let mut state = self.state.lock();
        state.members.insert(guild.id, members);
        state.guilds.push(guild);
    }

    pub fn set_voice(&self, user_id: Snowflake, voice: VoiceState) {
        self.state.lock().voice.insert(user_id, voice);
    }

    pub fn set_status(&self, user_id: Snowflake, status: PresenceStatus) {
        self.state.lock().status.insert(user_id, status);
    }

    pub fn add_channel(&self, channel_id: Snowflake, name: &str) {
        self.state.lock().channels.insert(channel_id, name.to_string());
    }

    pub fn fail_guild_list(&self) {
        self.state.lock().fail_guild_list = true;
    }

    pub fn fail_members(&self, guild_id: Snowflake) {
        self.state.lock().fail_members.insert(guild_id);
    }

    pub fn fail_voice(&self, user_id: Snowflake) {
        self.state.lock().fail_voice.insert(user_id);
    }

    pub fn fail_status(&self, user_id: Snowflake) {
        self.state.lock().fail_status.insert(user_id);
    }
}

#[async_trait]
impl RosterProvider for FakeRoster {
    async fn list_guilds(&self) -> RepoResult<Vec<GuildRef>> {
        let state = self.state.lock();
        if state.fail_guild_list {
            return Err(DomainError::RosterError("guild list unavailable".into()));
        }
        Ok(state.guilds.clone())
    }

    async fn list_members(&self, guild_id: Snowflake) -> RepoResult<Vec<Member>> {
        let state = self.state.lock();
        if state.fail_members.contains(&guild_id) {
            return Err(DomainError::RosterError("member list unavailable".into()));
        }
        state
            .members
            .get(&guild_id)
            .cloned()
            .ok_or(DomainError::GuildNotFound(guild_id))
    }

    async fn voice_state(
        &self,
        _guild_id: Snowflake,
        user_id: Snowflake,
    ) -> RepoResult<Option<VoiceState>> {
        let state = self.state.lock();
        if state.fail_voice.contains(&user_id) {
            return Err(DomainError::RosterError("voice state unavailable".into()));
        }
        Ok(state.voice.get(&user_id).copied())
    }

    async fn presence_status(
        &self,
        _guild_id: Snowflake,
        user_id: Snowflake,
    ) -> RepoResult<PresenceStatus> {
        let state = self.state.lock();
        if state.fail_status.contains(&user_id) {
            return Err(DomainError::RosterError("presence unavailable".into()));
        }
        Ok(state.status.get(&user_id).copied().unwrap_or_default())
    }

    async fn channel_name(&self, channel_id: Snowflake) -> RepoResult<String> {
        self.state
            .lock()
            .channels
            .get(&channel_id)
            .cloned()
            .ok_or(DomainError::ChannelNotFound(channel_id))
    }
}

/// Sink that records every event it is handed
#[derive(Default)]
pub struct RecordingSink {
    pub events: Mutex<Vec<VoiceTransitionEvent>>,
    pub fail: std::sync::atomic::AtomicBool,
}

#[async_trait]
impl NotificationSink for RecordingSink {
    async fn notify(&self, event: &VoiceTransitionEvent) -> RepoResult<()> {
        if self.fail.load(std::sync::atomic::Ordering::SeqCst) {
            return Err(DomainError::NotifierError("sink down".into()));
        }
        self.events.lock().push(event.clone());
        Ok(())
    }
}
