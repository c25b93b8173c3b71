//! Structured time-series queries
//!
//! A `SeriesQuery` describes one measurement over a half-open time range
//! `[start, stop)`, narrowed by tag filters. Backends translate it into their
//! own language (Flux for InfluxDB) or evaluate it directly (`matches`).

use chrono::{DateTime, Utc};

use super::record::Record;

/// Result ordering by time
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
    #[default]
    Ascending,
    Descending,
}

impl SortOrder {
    #[inline]
    pub fn is_descending(self) -> bool {
        matches!(self, Self::Descending)
    }
}

/// A predicate on one tag
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TagFilter {
    Eq { key: String, value: String },
    /// Also satisfied when the tag is absent
    Ne { key: String, value: String },
    OneOf { key: String, values: Vec<String> },
}

impl TagFilter {
    pub fn key(&self) -> &str {
        match self {
            Self::Eq { key, .. } | Self::Ne { key, .. } | Self::OneOf { key, .. } => key,
        }
    }

    /// Evaluate the filter against a record's columns
    pub fn matches(&self, record: &Record) -> bool {
        let actual = record.optional_str(self.key());
        match self {
            Self::Eq { value, .. } => actual == Some(value.as_str()),
            Self::Ne { value, .. } => actual != Some(value.as_str()),
            Self::OneOf { values, .. } => actual.is_some_and(|a| values.iter().any(|v| v == a)),
        }
    }
}

/// Query over a single measurement
#[derive(Debug, Clone, PartialEq)]
pub struct SeriesQuery {
    pub measurement: String,
    pub start: DateTime<Utc>,
    pub stop: Option<DateTime<Utc>>,
    pub filters: Vec<TagFilter>,
    pub order: SortOrder,
    pub limit: Option<usize>,
}

impl SeriesQuery {
    /// Ascending, unbounded query from `start`
    pub fn new(measurement: impl Into<String>, start: DateTime<Utc>) -> Self {
        Self {
            measurement: measurement.into(),
            start,
            stop: None,
            filters: Vec::new(),
            order: SortOrder::Ascending,
            limit: None,
        }
    }

    /// Exclusive upper bound
    #[must_use]
    pub fn until(mut self, stop: DateTime<Utc>) -> Self {
        self.stop = Some(stop);
        self
    }

    #[must_use]
    pub fn tag_eq(mut self, key: impl Into<String>, value: impl ToString) -> Self {
        self.filters.push(TagFilter::Eq {
            key: key.into(),
            value: value.to_string(),
        });
        self
    }

    #[must_use]
    pub fn tag_ne(mut self, key: impl Into<String>, value: impl ToString) -> Self {
        self.filters.push(TagFilter::Ne {
            key: key.into(),
            value: value.to_string(),
        });
        self
    }

    #[must_use]
    pub fn tag_in<I, S>(mut self, key: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: ToString,
    {
        self.filters.push(TagFilter::OneOf {
            key: key.into(),
            values: values.into_iter().map(|v| v.to_string()).collect(),
        });
        self
    }

    #[must_use]
    pub fn descending(mut self) -> Self {
        self.order = SortOrder::Descending;
        self
    }

    #[must_use]
    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Whether a timestamp falls inside `[start, stop)`
    pub fn contains_time(&self, time: DateTime<Utc>) -> bool {
        time >= self.start && self.stop.map_or(true, |stop| time < stop)
    }

    /// Full in-process evaluation: measurement, time range, and every filter
    pub fn matches(&self, record: &Record) -> bool {
        record.measurement.as_deref() == Some(self.measurement.as_str())
            && record.time.is_some_and(|t| self.contains_time(t))
            && self.filters.iter().all(|f| f.matches(record))
    }
}
