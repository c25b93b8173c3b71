//! Annotated CSV decoding
//!
//! A Flux response is a sequence of tables. Each table starts with
//! annotation rows (`#datatype`, `#group`, `#default`) followed by a header
//! row, and the first column of every row is reserved for annotations.
//! Columns are decoded by their `#datatype`; system columns (`result`,
//! `table`, `_start`, `_stop`) are dropped and `_time` / `_measurement`
//! become the record's time and measurement. A row with a cell that does
//! not match its `#datatype` is logged and skipped.

use chrono::{DateTime, Utc};
use csv::{ReaderBuilder, StringRecord};
use tracing::warn;

use presence_core::{FieldValue, Record};

use crate::stores::StoreError;

const SYSTEM_COLUMNS: [&str; 5] = ["", "result", "table", "_start", "_stop"];

/// Decode a full query response body into records, in response order
pub fn decode_annotated_csv(body: &str) -> Result<Vec<Record>, StoreError> {
    let mut reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(body.as_bytes());

    let mut datatypes: Option<StringRecord> = None;
    let mut header: Option<StringRecord> = None;
    let mut records = Vec::new();
    let mut skipped = Vec::new();

    for row in reader.records() {
        let row = row.map_err(|e| StoreError::Decode(e.to_string()))?;
        if row.iter().all(str::is_empty) {
            continue;
        }

        match row.get(0) {
            Some("#datatype") => {
                // A new table begins
                datatypes = Some(row);
                header = None;
                continue;
            }
            Some(annotation) if annotation.starts_with('#') => continue,
            _ => {}
        }

        let Some(columns) = header.as_ref() else {
            header = Some(row);
            continue;
        };

        if let Some(message) = error_message(columns, &row) {
            return Err(StoreError::Query(message));
        }
        match decode_row(columns, datatypes.as_ref(), &row) {
            Ok(record) => records.push(record),
            Err(e) => skipped.push(e),
        }
    }

    if let Some(first) = skipped.first() {
        warn!(skipped = skipped.len(), error = %first, "Skipped undecodable rows");
    }
    Ok(records)
}

/// Query failures can arrive as a table with `error` and `reference` columns
fn error_message(header: &StringRecord, row: &StringRecord) -> Option<String> {
    let position = |name: &str| header.iter().position(|c| c == name);
    let error = position("error")?;
    position("reference")?;
    Some(row.get(error).unwrap_or_default().to_string())
}

fn decode_row(
    header: &StringRecord,
    datatypes: Option<&StringRecord>,
    row: &StringRecord,
) -> Result<Record, StoreError> {
    let mut record = Record::default();

    for (index, column) in header.iter().enumerate() {
        if SYSTEM_COLUMNS.contains(&column) {
            continue;
        }
        // Empty cells are nulls
        let Some(cell) = row.get(index).filter(|cell| !cell.is_empty()) else {
            continue;
        };

        match column {
            "_time" => record.time = Some(parse_time(cell)?),
            "_measurement" => record.measurement = Some(cell.to_string()),
            _ => {
                let datatype = datatypes.and_then(|d| d.get(index)).unwrap_or("string");
                let value = decode_cell(datatype, cell).ok_or_else(|| {
                    StoreError::Decode(format!("column {column}: '{cell}' is not a valid {datatype}"))
                })?;
                record.values.insert(column.to_string(), value);
            }
        }
    }

    Ok(record)
}

fn decode_cell(datatype: &str, cell: &str) -> Option<FieldValue> {
    match datatype {
        "boolean" => match cell {
            "true" => Some(FieldValue::Bool(true)),
            "false" => Some(FieldValue::Bool(false)),
            _ => None,
        },
        "long" => cell.parse().ok().map(FieldValue::Int),
        "unsignedLong" => cell.parse().ok().map(FieldValue::UInt),
        "double" => cell.parse().ok().map(FieldValue::Float),
        _ => Some(FieldValue::Str(cell.to_string())),
    }
}

fn parse_time(cell: &str) -> Result<DateTime<Utc>, StoreError> {
    DateTime::parse_from_rfc3339(cell)
        .map(|t| t.with_timezone(&Utc))
        .map_err(|e| StoreError::Decode(format!("_time '{cell}': {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    const VOICE_EVENTS: &str = "\
#datatype,string,long,dateTime:RFC3339,dateTime:RFC3339,dateTime:RFC3339,string,string,string,string,string,string,string,string,boolean
#group,false,false,false,false,false,false,false,false,false,false,false,false,false,false
#default,_result,,,,,,,,,,,,,
,result,table,_start,_stop,_time,_measurement,channel_id,channel_name,event_type,guild_id,user_display_name,user_id,username,state
,,0,2024-05-01T12:00:00Z,2024-05-01T12:00:01Z,2024-05-01T12:00:00.25Z,voice_events,10,\"Late Night, Chill\",voice,1,Alice,42,alice,true
,,0,2024-05-01T12:00:00Z,2024-05-01T12:00:01Z,2024-05-01T12:00:00.5Z,voice_events,10,General,webcam,1,Bob,43,bob,false

";

    #[test]
    fn test_decode_pivoted_table() {
        let records = decode_annotated_csv(VOICE_EVENTS).unwrap();
        assert_eq!(records.len(), 2);

        let first = &records[0];
        assert_eq!(first.measurement.as_deref(), Some("voice_events"));
        assert_eq!(
            first.time,
            Some(Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap() + chrono::Duration::milliseconds(250))
        );
        assert_eq!(first.optional_str("channel_name"), Some("Late Night, Chill"));
        assert_eq!(first.get("state"), Some(&FieldValue::Bool(true)));
        assert!(first.get("result").is_none());
        assert!(first.get("_start").is_none());

        assert_eq!(records[1].get("state"), Some(&FieldValue::Bool(false)));
        assert_eq!(records[1].optional_str("event_type"), Some("webcam"));
    }

    #[test]
    fn test_multiple_tables_and_nulls() {
        let body = "\
#datatype,string,long,dateTime:RFC3339,string,long
#group,false,false,false,true,false
#default,_result,,,,
,result,table,_time,guild_id,user_count
,,0,2024-05-01T12:00:00Z,1,3

#datatype,string,long,dateTime:RFC3339,string,string,long
#group,false,false,false,true,false,false
#default,_result,,,,,
,result,table,_time,guild_id,user_list,user_count
,,1,2024-05-01T12:00:30Z,1,,0
";
        let records = decode_annotated_csv(body).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].get("user_count"), Some(&FieldValue::Int(3)));
        assert_eq!(records[1].get("user_count"), Some(&FieldValue::Int(0)));
        assert!(records[1].get("user_list").is_none());
    }

    #[test]
    fn test_empty_body() {
        assert!(decode_annotated_csv("").unwrap().is_empty());
        assert!(decode_annotated_csv("\r\n").unwrap().is_empty());
    }

    #[test]
    fn test_type_mismatch_drops_only_that_row() {
        let body = "\
#datatype,string,long,dateTime:RFC3339,long
#group,false,false,false,false
#default,_result,,,
,result,table,_time,user_count
,,0,2024-05-01T12:00:00Z,3
,,0,2024-05-01T12:00:30Z,many
,,0,not-a-time,4
";
        let records = decode_annotated_csv(body).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].get("user_count"), Some(&FieldValue::Int(3)));
    }

    #[test]
    fn test_decode_row_reports_the_bad_cell() {
        let header = StringRecord::from(vec!["", "result", "table", "_time", "user_count"]);
        let types = StringRecord::from(vec!["#datatype", "string", "long", "dateTime:RFC3339", "long"]);
        let row = StringRecord::from(vec!["", "", "0", "2024-05-01T12:00:00Z", "many"]);

        let err = decode_row(&header, Some(&types), &row).unwrap_err();
        assert!(err.to_string().contains("user_count"));
    }

    #[test]
    fn test_error_table() {
        let body = "\
#datatype,string,string
#group,true,true
#default,,
,error,reference
,failed to compile query,
";
        let err = decode_annotated_csv(body).unwrap_err();
        assert!(matches!(err, StoreError::Query(ref msg) if msg == "failed to compile query"));
    }

    #[test]
    fn test_unannotated_columns_fall_back_to_strings() {
        let body = ",result,table,_time,state\n,,0,2024-05-01T12:00:00Z,true\n";
        let records = decode_annotated_csv(body).unwrap();
        assert_eq!(records[0].optional_str("state"), Some("true"));
    }
}
