//! Records - rows returned by a time-series query
//!
//! A record is schemaless: tags and fields share one column map, exactly as a
//! pivoted query result does. The `require_*` accessors are the validation
//! step that turns a loose row into typed domain values.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};

use super::point::{FieldValue, Point};
use crate::error::DomainError;
use crate::value_objects::Snowflake;

/// A decoded query row
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Record {
    pub measurement: Option<String>,
    pub time: Option<DateTime<Utc>>,
    pub values: BTreeMap<String, FieldValue>,
}

impl Record {
    /// Flatten a point into the row a pivoted query would return for it
    pub fn from_point(point: &Point) -> Self {
        let mut values: BTreeMap<String, FieldValue> = point
            .tags
            .iter()
            .map(|(k, v)| (k.clone(), FieldValue::Str(v.clone())))
            .collect();
        values.extend(point.fields.iter().map(|(k, v)| (k.clone(), v.clone())));

        Self {
            measurement: Some(point.measurement.clone()),
            time: Some(point.timestamp),
            values,
        }
    }

    #[must_use]
    pub fn with_value(mut self, key: impl Into<String>, value: impl Into<FieldValue>) -> Self {
        self.values.insert(key.into(), value.into());
        self
    }

    pub fn get(&self, key: &str) -> Option<&FieldValue> {
        self.values.get(key)
    }

    /// String column, if present and a string
    pub fn optional_str(&self, key: &str) -> Option<&str> {
        self.get(key).and_then(FieldValue::as_str)
    }

    pub fn require_time(&self) -> Result<DateTime<Utc>, DomainError> {
        self.time.ok_or(DomainError::MissingField("_time"))
    }

    pub fn require_str(&self, key: &'static str) -> Result<&str, DomainError> {
        self.get(key)
            .ok_or(DomainError::MissingField(key))?
            .as_str()
            .ok_or(DomainError::InvalidField {
                field: key,
                expected: "string",
            })
    }

    pub fn require_bool(&self, key: &'static str) -> Result<bool, DomainError> {
        self.get(key)
            .ok_or(DomainError::MissingField(key))?
            .as_bool()
            .ok_or(DomainError::InvalidField {
                field: key,
                expected: "boolean",
            })
    }

    pub fn require_int(&self, key: &'static str) -> Result<i64, DomainError> {
        self.get(key)
            .ok_or(DomainError::MissingField(key))?
            .as_i64()
            .ok_or(DomainError::InvalidField {
                field: key,
                expected: "integer",
            })
    }

    pub fn require_snowflake(&self, key: &'static str) -> Result<Snowflake, DomainError> {
        Snowflake::parse(self.require_str(key)?).map_err(|_| DomainError::InvalidField {
            field: key,
            expected: "snowflake",
        })
    }
}
