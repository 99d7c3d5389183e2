// src/submit/mod.rs

use serde_json::{Map, Value};

use crate::questions::RATING_SCALE;

/// A client submission: arbitrary field names to JSON values.
pub type Submission = Map<String, Value>;

/// Fields a submission must carry before it is written.
pub const REQUIRED_FIELDS: &[&str] = &["Management Email ID", "Role Reviewed", "Process"];

/// Columns written verbatim; every other column is a rating column.
pub const EXCLUDED_FIELDS: &[&str] = &[
    "Timestamp",
    "Encrypted Submitter ID",
    "Role Reviewed",
    "Process",
    "Management Email ID",
    "Additional Comments",
];

/// Names from `REQUIRED_FIELDS` absent from `payload`, in declaration order.
pub fn missing_required(payload: &Submission) -> Vec<String> {
    REQUIRED_FIELDS
        .iter()
        .filter(|f| !payload.contains_key(**f))
        .map(|f| f.to_string())
        .collect()
}

/// Align `payload` to `header`, decoding numeric ratings into scale labels.
///
/// The result always has one trimmed cell per header column. Payload keys
/// not in the header are dropped; missing keys give `""`.
pub fn encode(header: &[String], payload: &Submission) -> Vec<String> {
    header
        .iter()
        .map(|field| {
            let cell = match payload.get(field.as_str()) {
                None => String::new(),
                Some(v) if EXCLUDED_FIELDS.contains(&field.as_str()) => stringify(v),
                Some(v) => decode_rating(v),
            };
            cell.trim().to_string()
        })
        .collect()
}

/// Align `payload` to `header` with no rating codec.
pub fn align_strict(header: &[String], payload: &Submission) -> Vec<String> {
    header
        .iter()
        .map(|field| payload.get(field.as_str()).map(stringify).unwrap_or_default())
        .collect()
}

/// Map a 1..=5 score to its label. Fractions truncate toward zero before
/// the lookup; anything else keeps its own text. Booleans are not scores:
/// `true` encodes as `"true"`, not as the label for 1 the way the older
/// Python service coerced it.
fn decode_rating(value: &Value) -> String {
    let Value::Number(n) = value else {
        return stringify(value);
    };
    let score = n
        .as_i64()
        .or_else(|| n.as_f64().map(|f| f.trunc() as i64));
    match score {
        Some(s @ 1..=5) => RATING_SCALE[(s - 1) as usize].to_string(),
        _ => n.to_string(),
    }
}

fn stringify(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
