//! Line protocol encoding
//!
//! `measurement,tag=value field=value timestamp`, tags in key order,
//! timestamp in nanoseconds.

use std::fmt::Write;

use presence_core::{FieldValue, Point};

use crate::stores::StoreError;

/// Encode one point as a single line (no trailing newline)
pub fn encode_point(point: &Point) -> Result<String, StoreError> {
    if point.measurement.is_empty() {
        return Err(StoreError::Encode("empty measurement name".to_string()));
    }
    if point.fields.is_empty() {
        return Err(StoreError::Encode(format!(
            "point for {} has no fields",
            point.measurement
        )));
    }
    let nanos = point.timestamp.timestamp_nanos_opt().ok_or_else(|| {
        StoreError::Encode(format!("timestamp {} out of range", point.timestamp))
    })?;

    let mut line = escape(&point.measurement, &[',', ' ']);
    for (key, value) in &point.tags {
        // Empty tag values are invalid on the wire
        if value.is_empty() {
            continue;
        }
        let _ = write!(line, ",{}={}", escape_key(key), escape_key(value));
    }

    let fields = point
        .fields
        .iter()
        .map(|(key, value)| format!("{}={}", escape_key(key), encode_field(value)))
        .collect::<Vec<_>>()
        .join(",");

    let _ = write!(line, " {fields} {nanos}");
    Ok(line)
}

fn encode_field(value: &FieldValue) -> String {
    match value {
        FieldValue::Bool(b) => b.to_string(),
        FieldValue::Int(i) => format!("{i}i"),
        FieldValue::UInt(u) => format!("{u}u"),
        FieldValue::Float(f) => f.to_string(),
        FieldValue::Str(s) => format!("\"{}\"", escape(s, &['"', '\\'])),
    }
}

/// Tag keys, tag values, and field keys share one escaping rule. A run of
/// `n` backslashes reads back as `ceil(n / 2)`, so every backslash is doubled.
fn escape_key(raw: &str) -> String {
    escape(raw, &[',', '=', ' ', '\\'])
}

fn escape(raw: &str, special: &[char]) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        if special.contains(&c) {
            out.push('\\');
        }
        out.push(c);
    }
    out
}
