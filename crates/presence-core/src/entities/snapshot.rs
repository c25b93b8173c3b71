//! Per-guild headcount snapshots written once per sampler pass

use chrono::{DateTime, Utc};

use crate::error::DomainError;
use crate::timeseries::schema::{fields, tags, LIST_SEPARATOR, ONCALL_USERS, ONLINE_USERS};
use crate::timeseries::{Point, Record};
use crate::value_objects::Snowflake;

/// Reported in place of a member list when nobody is on a call
pub const EMPTY_ONCALL_SENTINEL: &str = "Empty Discord. Crowded streets.";

/// Which headcount a snapshot carries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MeasurementKind {
    Oncall,
    Online,
}

impl MeasurementKind {
    pub fn measurement(&self) -> &'static str {
        match self {
            Self::Oncall => ONCALL_USERS,
            Self::Online => ONLINE_USERS,
        }
    }
}

/// "As of this pass, N members are in state X"
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PresenceAggregateSnapshot {
    pub guild_id: Snowflake,
    pub guild_name: String,
    pub kind: MeasurementKind,
    pub count: i64,
    pub members: Vec<String>,
    pub timestamp: DateTime<Utc>,
}

impl PresenceAggregateSnapshot {
    pub fn new(
        guild_id: Snowflake,
        guild_name: impl Into<String>,
        kind: MeasurementKind,
        members: Vec<String>,
        timestamp: DateTime<Utc>,
    ) -> Self {
        Self {
            guild_id,
            guild_name: guild_name.into(),
            kind,
            count: members.len() as i64,
            members,
            timestamp,
        }
    }

    /// Members joined into the stored tag form
    pub fn member_list(&self) -> String {
        self.members.join(&LIST_SEPARATOR.to_string())
    }

    pub fn to_point(&self) -> Point {
        Point::new(self.kind.measurement(), self.timestamp)
            .tag(tags::GUILD_ID, self.guild_id.to_string())
            .tag(tags::GUILD_NAME, self.guild_name.as_str())
            .tag(tags::USER_LIST, self.member_list())
            .field(fields::USER_COUNT, self.count)
    }

    /// Validate a snapshot row. A missing `user_list` is an empty list.
    pub fn from_record(kind: MeasurementKind, record: &Record) -> Result<Self, DomainError> {
        let members = record
            .optional_str(tags::USER_LIST)
            .filter(|list| !list.is_empty())
            .map(|list| list.split(LIST_SEPARATOR).map(str::to_string).collect())
            .unwrap_or_default();

        Ok(Self {
            guild_id: record.require_snowflake(tags::GUILD_ID)?,
            guild_name: record
                .optional_str(tags::GUILD_NAME)
                .unwrap_or_default()
                .to_string(),
            kind,
            count: record.require_int(fields::USER_COUNT)?,
            members,
            timestamp: record.require_time()?,
        })
    }
}
