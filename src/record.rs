//! Helpers over raw [`Record`] values: identity, timestamps, truthiness.

use crate::types::{CREATED_AT_FIELD, ID_FIELD, Record, RecordId, UPDATED_AT_FIELD};
use chrono::Local;
use serde_json::Value;

/// On-disk timestamp layout: day-first, two-digit year.
pub const TIMESTAMP_FORMAT: &str = "%d-%m-%y %H:%M:%S";

#[must_use]
pub fn timestamp_now() -> String {
    Local::now().format(TIMESTAMP_FORMAT).to_string()
}

/// Integer id of a record, if it carries one. Integral floats (`5.0`) count.
#[must_use]
pub fn id_of(record: &Record) -> Option<RecordId> {
    let n = match record.get(ID_FIELD)? {
        Value::Number(n) => n,
        _ => return None,
    };
    n.as_i64().or_else(|| {
        let f = n.as_f64()?;
        // i64::MAX as f64 rounds up to 2^63, so the upper bound is exclusive.
        (f.fract() == 0.0 && f >= i64::MIN as f64 && f < i64::MAX as f64).then_some(f as i64)
    })
}

/// Largest integer id in `records`, ignoring records without one.
#[must_use]
pub fn max_id(records: &[Record]) -> Option<RecordId> {
    records.iter().filter_map(id_of).max()
}

/// Builds the stored form of a new record: id first, caller fields, then timestamps.
#[must_use]
pub fn stamp_new(id: RecordId, data: Record) -> Record {
    let mut out = Record::with_capacity(data.len() + 3);
    out.insert(ID_FIELD.to_string(), Value::from(id));
    for (k, v) in data {
        if k == ID_FIELD || k == CREATED_AT_FIELD || k == UPDATED_AT_FIELD {
            continue;
        }
        out.insert(k, v);
    }
    out.insert(CREATED_AT_FIELD.to_string(), Value::String(timestamp_now()));
    out.insert(UPDATED_AT_FIELD.to_string(), Value::Null);
    out
}

/// Merges `patch` into `record` and refreshes `updated_at`. `id` and `created_at` never change.
pub fn merge_patch(record: &mut Record, patch: Record) {
    for (k, v) in patch {
        if k == ID_FIELD || k == CREATED_AT_FIELD {
            continue;
        }
        record.insert(k, v);
    }
    record.insert(UPDATED_AT_FIELD.to_string(), Value::String(timestamp_now()));
}

/// Falsy values never resolve a relation: null, false, zero, "", "0" and empty containers.
#[must_use]
pub fn is_falsy(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Bool(b) => !b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f == 0.0),
        Value::String(s) => s.is_empty() || s == "0",
        Value::Array(a) => a.is_empty(),
        Value::Object(o) => o.is_empty(),
    }
}
