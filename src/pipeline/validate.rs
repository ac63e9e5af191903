//! Schema validation: the gate between loose model output and typed data.
//!
//! Validation is all-or-nothing per result: one invalid event invalidates the
//! whole candidate. Accepting a subset would silently drop events the user
//! can see on their document, which is worse than a clean failure they can
//! retry.
//!
//! The return type is the enforcement mechanism: only a [`ValidatedResult`]
//! can reach the field transformer, so nothing downstream ever touches an
//! unchecked field.

use crate::error::ExtractError;
use crate::output::TimetableMetadata;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Deserialize;
use serde_json::Value;

/// `HH:MM` or `HH:MM:SS`, anchored.
static RE_CLOCK_TIME: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\d{2}:\d{2}(:\d{2})?$").unwrap());

/// A candidate result that has passed every schema check.
#[derive(Debug, Clone, Deserialize)]
pub struct ValidatedResult {
    #[serde(default)]
    pub metadata: Option<TimetableMetadata>,
    pub events: Vec<ValidatedEvent>,
}

/// One event with guaranteed non-empty title and well-formed times.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidatedEvent {
    pub title: String,
    #[serde(default)]
    pub day: Option<String>,
    pub start_time: String,
    pub end_time: String,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub metadata: Option<String>,
    #[serde(default)]
    pub subject: Option<String>,
    #[serde(default)]
    pub additional_info: Option<String>,
}

/// Validate a normalised candidate object.
///
/// Rejects when `events` is missing or not an array, and when any element has
/// an empty/missing `title` or a `startTime`/`endTime` that is not `HH:MM` or
/// `HH:MM:SS`. Optional fields pass through unchanged. Pure function, no side
/// effects.
pub fn validate(candidate: &Value) -> Result<ValidatedResult, ExtractError> {
    let events = candidate
        .get("events")
        .ok_or_else(|| invalid("result has no 'events' field"))?
        .as_array()
        .ok_or_else(|| invalid("'events' is not an array"))?;

    for (i, event) in events.iter().enumerate() {
        let obj = event
            .as_object()
            .ok_or_else(|| invalid(&format!("event {i} is not an object")))?;

        match obj.get("title").and_then(Value::as_str) {
            Some(t) if !t.trim().is_empty() => {}
            _ => return Err(invalid(&format!("event {i}: title is empty or missing"))),
        }

        for field in ["startTime", "endTime"] {
            match obj.get(field).and_then(Value::as_str) {
                Some(t) if RE_CLOCK_TIME.is_match(t) => {}
                Some(t) => {
                    return Err(invalid(&format!(
                        "event {i}: {field} '{t}' is not HH:MM or HH:MM:SS"
                    )))
                }
                None => return Err(invalid(&format!("event {i}: {field} is missing"))),
            }
        }
    }

    // Structural checks passed; the typed conversion can still fail on
    // mistyped optional fields (a numeric location, a metadata string at the
    // result level) and that is a validation failure too.
    serde_json::from_value(candidate.clone()).map_err(|e| invalid(&e.to_string()))
}

fn invalid(detail: &str) -> ExtractError {
    ExtractError::SchemaValidation {
        detail: detail.to_string(),
    }
}
