//! Response normalisation: deterministic cleanup of the raw model reply.
//!
//! ## Why is normalisation necessary?
//!
//! Even well-prompted models routinely disobey "return only JSON":
//!
//! - Wrapping the object in ` ```json ... ``` ` fences
//! - Adding explanatory prose before or after the object
//! - Emitting a combined ISO-8601 timestamp ("2025-11-03T13:30:00") where the
//!   prompt asked for separate day and clock-time fields
//!
//! This module applies cheap, deterministic passes that fix those quirks
//! without interpreting content, then hands the loose candidate object to the
//! schema validator. Keeping the rules here rather than in the prompt means
//! the prompt stays focused on *what to extract*.
//!
//! ## JSON isolation strategy
//!
//! The trimmed, fence-stripped reply is first parsed as a whole — the strict
//! path that cannot be fooled by braces inside string values. Only when that
//! fails does the greedy first-`{`-to-last-`}` bracket match run as a
//! fallback for replies with surrounding prose.

use crate::error::ExtractError;
use chrono::{Datelike, NaiveDate, Weekday};
use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;
use tracing::debug;

/// Strip formatting artefacts from the raw reply and parse the candidate
/// object, deriving day/time fields from combined timestamps.
///
/// The returned `Value` is *not* validated; it goes to
/// [`crate::pipeline::validate::validate`] next.
pub fn normalize(reply: &str) -> Result<Value, ExtractError> {
    let stripped = strip_fences(reply);
    let mut candidate = isolate_json(&stripped)?;
    derive_day_fields(&mut candidate);
    Ok(candidate)
}

// ── Pass 1: strip outer code fences ──────────────────────────────────────────

static RE_OUTER_FENCES: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)^```[A-Za-z0-9_-]*\s*\n?(.*?)\n?```\s*$").unwrap());

fn strip_fences(input: &str) -> String {
    if let Some(caps) = RE_OUTER_FENCES.captures(input.trim()) {
        caps[1].to_string()
    } else {
        input.to_string()
    }
}

// ── Pass 2: isolate and parse the JSON payload ──────────────────────────────

fn isolate_json(input: &str) -> Result<Value, ExtractError> {
    let trimmed = input.trim();

    // Strict path: the whole reply is JSON.
    if let Ok(value) = serde_json::from_str::<Value>(trimmed) {
        return Ok(value);
    }

    // Fallback: greedy bracket match for replies with surrounding prose.
    let start = trimmed.find('{').ok_or(ExtractError::NoJsonFound)?;
    let end = trimmed.rfind('}').ok_or(ExtractError::NoJsonFound)?;
    if end < start {
        return Err(ExtractError::NoJsonFound);
    }

    let span = &trimmed[start..=end];
    debug!("Bracket-matched JSON span of {} chars", span.len());
    serde_json::from_str(span).map_err(|e| ExtractError::MalformedJson {
        detail: e.to_string(),
    })
}

// ── Pass 3: derive day/time from combined timestamps ────────────────────────

/// Rewrite events whose `startTime` is a combined ISO-8601 timestamp.
///
/// The date portion is resolved to a full weekday name via calendar lookup
/// and stored in `day`; both time fields are cut down to their time-only
/// portion. Events with a plain clock time are left untouched — a still
/// missing `day` is defaulted downstream, after validation.
///
/// A `T` separator with an unparseable date half is left as-is; the schema
/// validator then rejects the event rather than this pass guessing a date.
fn derive_day_fields(candidate: &mut Value) {
    let Some(events) = candidate.get_mut("events").and_then(Value::as_array_mut) else {
        return;
    };

    for event in events {
        let Some(obj) = event.as_object_mut() else {
            continue;
        };

        let Some((date_part, time_part)) = obj
            .get("startTime")
            .and_then(Value::as_str)
            .and_then(|s| s.split_once('T'))
            .map(|(d, t)| (d.to_string(), t.to_string()))
        else {
            continue;
        };

        let Ok(date) = NaiveDate::parse_from_str(&date_part, "%Y-%m-%d") else {
            continue;
        };

        debug!(
            "Derived day '{}' from combined timestamp {}T{}",
            weekday_name(date.weekday()),
            date_part,
            time_part
        );
        obj.insert(
            "day".to_string(),
            Value::String(weekday_name(date.weekday()).to_string()),
        );
        obj.insert("startTime".to_string(), Value::String(time_part));

        if let Some(end_time) = obj
            .get("endTime")
            .and_then(Value::as_str)
            .and_then(|s| s.split_once('T'))
            .map(|(_, t)| t.to_string())
        {
            obj.insert("endTime".to_string(), Value::String(end_time));
        }
    }
}

fn weekday_name(w: Weekday) -> &'static str {
    match w {
        Weekday::Mon => "Monday",
        Weekday::Tue => "Tuesday",
        Weekday::Wed => "Wednesday",
        Weekday::Thu => "Thursday",
        Weekday::Fri => "Friday",
        Weekday::Sat => "Saturday",
        Weekday::Sun => "Sunday",
    }
}
