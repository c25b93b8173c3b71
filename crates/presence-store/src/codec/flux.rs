//! Flux rendering for `SeriesQuery`

use chrono::{DateTime, SecondsFormat, Utc};
use serde_json::{json, Value};

use presence_core::{SeriesQuery, TagFilter};

/// Render a query against `bucket`. Rows are pivoted so every field becomes
/// a column next to the tags, then merged into one table sorted by time.
pub fn render_flux(bucket: &str, query: &SeriesQuery) -> String {
    let mut range = format!("start: {}", flux_time(query.start));
    if let Some(stop) = query.stop {
        range.push_str(&format!(", stop: {}", flux_time(stop)));
    }

    let mut lines = vec![
        format!("from(bucket: {})", flux_string(bucket)),
        format!("  |> range({range})"),
        format!(
            "  |> filter(fn: (r) => r._measurement == {})",
            flux_string(&query.measurement)
        ),
    ];
    lines.extend(
        query
            .filters
            .iter()
            .map(|filter| format!("  |> filter(fn: (r) => {})", predicate(filter))),
    );
    lines.push(
        r#"  |> pivot(rowKey: ["_time"], columnKey: ["_field"], valueColumn: "_value")"#
            .to_string(),
    );
    lines.push("  |> group()".to_string());
    lines.push(format!(
        r#"  |> sort(columns: ["_time"], desc: {})"#,
        query.order.is_descending()
    ));
    if let Some(limit) = query.limit {
        lines.push(format!("  |> limit(n: {limit})"));
    }

    lines.join("\n")
}

/// JSON body for `POST /api/v2/query`, asking for the annotations the CSV
/// decoder relies on
pub fn query_body(flux: &str) -> Value {
    json!({
        "query": flux,
        "type": "flux",
        "dialect": {
            "annotations": ["datatype", "group", "default"],
            "header": true,
            "delimiter": ",",
        },
    })
}

fn predicate(filter: &TagFilter) -> String {
    match filter {
        TagFilter::Eq { key, value } => {
            format!("r[{}] == {}", flux_string(key), flux_string(value))
        }
        TagFilter::Ne { key, value } => {
            format!("r[{}] != {}", flux_string(key), flux_string(value))
        }
        // An empty set matches nothing
        TagFilter::OneOf { values, .. } if values.is_empty() => "false".to_string(),
        TagFilter::OneOf { key, values } => values
            .iter()
            .map(|value| format!("r[{}] == {}", flux_string(key), flux_string(value)))
            .collect::<Vec<_>>()
            .join(" or "),
    }
}

fn flux_time(time: DateTime<Utc>) -> String {
    time.to_rfc3339_opts(SecondsFormat::AutoSi, true)
}

/// Double-quoted Flux string literal; `${` would start interpolation
fn flux_string(raw: &str) -> String {
    let escaped = raw
        .replace('\\', r"\\")
        .replace('"', r#"\""#)
        .replace("${", r"\${");
    format!("\"{escaped}\"")
}
