//! Voice ranking - per-member totals ordered by cumulative voice time

use chrono::{DateTime, Duration, Utc};

use crate::error::DomainError;
use crate::timeseries::schema::{fields, tags, LIST_SEPARATOR, VOICE_RANK};
use crate::timeseries::{Point, Record};
use crate::value_objects::Snowflake;

/// One ranked member
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RankEntry {
    pub user_id: Snowflake,
    pub username: String,
    pub display_name: String,
    pub guild_id: Snowflake,
    pub total_duration: Duration,
    /// 1-based, ties are not collapsed
    pub position: usize,
}

/// The published `voice_rank` fact for one guild
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VoiceRankFact {
    pub guild_id: Snowflake,
    pub guild_name: String,
    /// `display_name:seconds` pairs in rank order, with `\` and `,` in names escaped
    pub ranking: String,
    pub user_count: i64,
    /// Sum over all entries, in seconds
    pub total_duration: i64,
    pub timestamp: DateTime<Utc>,
}

impl VoiceRankFact {
    /// Build the fact from entries already in rank order
    pub fn from_entries(
        guild_id: Snowflake,
        guild_name: impl Into<String>,
        entries: &[RankEntry],
        timestamp: DateTime<Utc>,
    ) -> Self {
        let ranking = entries
            .iter()
            .map(|e| {
                format!(
                    "{}:{}",
                    escape_name(&e.display_name),
                    e.total_duration.num_seconds()
                )
            })
            .collect::<Vec<_>>()
            .join(&LIST_SEPARATOR.to_string());

        Self {
            guild_id,
            guild_name: guild_name.into(),
            ranking,
            user_count: entries.len() as i64,
            total_duration: entries.iter().map(|e| e.total_duration.num_seconds()).sum(),
            timestamp,
        }
    }

    /// Decode `ranking` back into `(display_name, duration)` pairs.
    /// Malformed pairs are skipped.
    pub fn entries(&self) -> Vec<(String, Duration)> {
        decode_ranking(&self.ranking)
    }

    pub fn to_point(&self) -> Point {
        Point::new(VOICE_RANK, self.timestamp)
            .tag(tags::GUILD_ID, self.guild_id.to_string())
            .tag(tags::GUILD_NAME, self.guild_name.as_str())
            .tag(tags::RANK_LIST, self.ranking.as_str())
            .field(fields::USER_COUNT, self.user_count)
            .field(fields::TOTAL_DURATION, self.total_duration)
    }

    pub fn from_record(record: &Record) -> Result<Self, DomainError> {
        Ok(Self {
            guild_id: record.require_snowflake(tags::GUILD_ID)?,
            guild_name: record
                .optional_str(tags::GUILD_NAME)
                .unwrap_or_default()
                .to_string(),
            ranking: record
                .optional_str(tags::RANK_LIST)
                .unwrap_or_default()
                .to_string(),
            user_count: record.require_int(fields::USER_COUNT)?,
            total_duration: record.require_int(fields::TOTAL_DURATION)?,
            timestamp: record.require_time()?,
        })
    }
}

/// `\` and `,` inside a display name are backslash-escaped
fn escape_name(name: &str) -> String {
    name.replace('\\', "\\\\")
        .replace(LIST_SEPARATOR, &format!("\\{LIST_SEPARATOR}"))
}

/// Split on unescaped separators, unescaping as we go
fn split_escaped(list: &str) -> Vec<String> {
    let mut items = Vec::new();
    let mut current = String::new();
    let mut chars = list.chars();
    while let Some(c) = chars.next() {
        match c {
            '\\' => current.extend(chars.next()),
            c if c == LIST_SEPARATOR => items.push(std::mem::take(&mut current)),
            c => current.push(c),
        }
    }
    items.push(current);
    items
}

/// Display names may contain `:`, so split each pair on the last one
pub fn decode_ranking(ranking: &str) -> Vec<(String, Duration)> {
    split_escaped(ranking)
        .into_iter()
        .filter_map(|pair| {
            let (name, secs) = pair.rsplit_once(':')?;
            let secs = secs.parse::<i64>().ok()?;
            Some((name.to_string(), Duration::seconds(secs)))
        })
        .collect()
}
