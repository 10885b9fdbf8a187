//! Field-by-field normalization of untrusted `getMyFIRs` payloads.
//!
//! Contract clients hand back whatever their ABI decoder produced: plain
//! objects, positional tuples, big-number wrappers, numeric strings. Every
//! field gets a documented default so a malformed entry still yields a record.

use serde_json::Value;

use crate::model::{Fir, FirId, UnixTimeSecs};
use crate::DEFAULT_STATUS;

/// ABI order of the on-chain struct, used for tuple-shaped entries.
const TUPLE_FIELDS: [&str; 8] = [
    "id",
    "complainant",
    "title",
    "description",
    "location",
    "timestamp",
    "isResolved",
    "status",
];

/// Normalizes a whole payload. Anything but an array yields an empty list.
#[must_use]
pub fn normalize_records(raw: &Value) -> Vec<Fir> {
    match raw {
        Value::Array(entries) => entries.iter().map(normalize_record).collect(),
        _ => Vec::new(),
    }
}

#[must_use]
pub fn normalize_record(entry: &Value) -> Fir {
    let field = |name: &str| lookup(entry, name);

    let status = coerce_string(field("status"));
    Fir {
        id: FirId(coerce_u64(field("id"))),
        complainant: coerce_string(field("complainant")),
        title: coerce_string(field("title")),
        description: coerce_string(field("description")),
        location: coerce_string(field("location")),
        timestamp: UnixTimeSecs(coerce_u64(field("timestamp"))),
        is_resolved: coerce_bool(field("isResolved")),
        status: if status.is_empty() {
            DEFAULT_STATUS.to_string()
        } else {
            status
        },
    }
}

fn lookup<'a>(entry: &'a Value, name: &str) -> Option<&'a Value> {
    match entry {
        Value::Object(map) => map.get(name),
        Value::Array(items) => TUPLE_FIELDS
            .iter()
            .position(|f| *f == name)
            .and_then(|i| items.get(i)),
        _ => None,
    }
}

/// Integer coercion; 0 for absent, negative, or unparseable values.
#[must_use]
pub fn coerce_u64(value: Option<&Value>) -> u64 {
    match value {
        Some(Value::Number(n)) => n.as_u64().or_else(|| n.as_f64().and_then(float_to_u64)),
        Some(Value::String(s)) => parse_integer_text(s),
        Some(Value::Bool(b)) => Some(u64::from(*b)),
        // ethers v5 BigNumber: {"type": "BigNumber", "hex": "0x..."}
        Some(Value::Object(map)) => map
            .get("hex")
            .and_then(Value::as_str)
            .and_then(parse_integer_text),
        _ => None,
    }
    .unwrap_or(0)
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss, clippy::cast_precision_loss)]
fn float_to_u64(f: f64) -> Option<u64> {
    (f.is_finite() && f >= 0.0 && f < u64::MAX as f64).then(|| f.trunc() as u64)
}

fn parse_integer_text(text: &str) -> Option<u64> {
    let text = text.trim();
    if let Some(hex) = text.strip_prefix("0x").or_else(|| text.strip_prefix("0X")) {
        return u64::from_str_radix(hex, 16).ok();
    }
    text.parse::<u64>()
        .ok()
        .or_else(|| text.parse::<f64>().ok().and_then(float_to_u64))
}

#[must_use]
pub fn coerce_bool(value: Option<&Value>) -> bool {
    match value {
        Some(Value::Bool(b)) => *b,
        Some(Value::Number(n)) => n.as_f64().is_some_and(|f| f != 0.0),
        Some(Value::String(s)) => {
            let s = s.trim();
            s.eq_ignore_ascii_case("true") || s == "1"
        }
        _ => false,
    }
}

#[must_use]
pub fn coerce_string(value: Option<&Value>) -> String {
    match value {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Number(n)) => n.to_string(),
        Some(Value::Bool(b)) => b.to_string(),
        _ => String::new(),
    }
}
