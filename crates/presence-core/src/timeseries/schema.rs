//! Measurement, tag, and field names shared by every writer and reader

/// Discrete voice-state transitions
pub const VOICE_EVENTS: &str = "voice_events";
/// Per-guild on-call headcount snapshots
pub const ONCALL_USERS: &str = "oncall_users";
/// Per-guild online headcount snapshots
pub const ONLINE_USERS: &str = "online_users";
/// Per-guild published voice ranking
pub const VOICE_RANK: &str = "voice_rank";

/// Separator for list-valued tags (`user_list`, `rank_list`)
pub const LIST_SEPARATOR: char = ',';

/// Tag keys
pub mod tags {
    pub const USER_ID: &str = "user_id";
    pub const USERNAME: &str = "username";
    pub const USER_DISPLAY_NAME: &str = "user_display_name";
    pub const GUILD_ID: &str = "guild_id";
    pub const GUILD_NAME: &str = "guild_name";
    pub const CHANNEL_ID: &str = "channel_id";
    pub const CHANNEL_NAME: &str = "channel_name";
    pub const EVENT_TYPE: &str = "event_type";
    pub const USER_LIST: &str = "user_list";
    pub const RANK_LIST: &str = "rank_list";
}

/// Field keys
pub mod fields {
    pub const STATE: &str = "state";
    pub const USER_COUNT: &str = "user_count";
    pub const TOTAL_DURATION: &str = "total_duration";
}
