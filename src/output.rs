//! Output types: the persisted shape of an extraction run.
//!
//! Everything in this module serialises with camelCase field names because
//! the [`ExtractionResult`] is the object handed across the persistence
//! boundary and ultimately returned to API callers — the wire shape is the
//! contract, the Rust names are an implementation detail.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A single schedule event in its final, persisted shape.
///
/// Produced by the field transformer from a validated event; every field is
/// always present (optional inputs default to the empty string) so consumers
/// never need null-handling.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersistedEvent {
    /// Event title ("Mathematics", "Staff meeting").
    pub name: String,
    /// Day of week, full English name. Defaults to "Monday" when the model
    /// supplied neither a day nor a derivable date.
    pub day: String,
    /// Start time, `HH:MM` or `HH:MM:SS`.
    pub start_time: String,
    /// End time, `HH:MM` or `HH:MM:SS`.
    pub end_time: String,
    /// `end − start` in whole minutes. May be negative when the model emitted
    /// a reversed or overnight range; the value is preserved, not clamped,
    /// and the orchestrator records a warning for it.
    pub duration_minutes: i64,
    pub location: String,
    pub notes: String,
    pub metadata: String,
    pub subject: String,
    pub additional_info: String,
    /// Extraction confidence in `[0, 1]`. Currently a fixed constant; see
    /// [`crate::pipeline::transform::CONFIDENCE`].
    pub confidence: f32,
}

/// Header-level timetable context, independent of individual events.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimetableMetadata {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub school_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub class_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub term: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub teacher_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub academic_year: Option<String>,
}

impl TimetableMetadata {
    /// True when no header field was extracted at all.
    pub fn is_empty(&self) -> bool {
        self.school_name.is_none()
            && self.class_name.is_none()
            && self.term.is_none()
            && self.teacher_name.is_none()
            && self.academic_year.is_none()
    }
}

/// Provenance of one extraction run: which upload produced it, and when.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SourceInfo {
    pub filename: String,
    pub mimetype: String,
    pub size: u64,
    /// ISO-8601 timestamp of when the pipeline ran.
    pub processed_at: DateTime<Utc>,
}

/// The unit handed to the persistence store: one immutable result per run.
///
/// `events` may be empty — total failure still yields a well-formed result,
/// never an error to the caller. `warnings` accumulates every recoverable
/// problem in the order encountered; inspecting `events.is_empty()` together
/// with `warnings` is how callers distinguish success from failure.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtractionResult {
    pub source: SourceInfo,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<TimetableMetadata>,
    pub events: Vec<PersistedEvent>,
    pub warnings: Vec<String>,
}
