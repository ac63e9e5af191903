//! Field transformation: validated events into their persisted shape.
//!
//! All derivation is mechanical — minute arithmetic, defaults, one constant —
//! and operates only on [`ValidatedEvent`]s, so every parse in here is
//! guaranteed to succeed by the validator's time-format check.

use crate::output::PersistedEvent;
use crate::pipeline::validate::ValidatedEvent;

/// Fixed confidence assigned to every extracted event.
///
/// The system does not yet derive confidence from model signals; replacing
/// this with a real scoring policy is an explicit extension point, as long
/// as the value stays a float in `[0, 1]`.
pub const CONFIDENCE: f32 = 0.85;

/// Day used when the model supplied neither a day nor a derivable date.
pub const DEFAULT_DAY: &str = "Monday";

/// Map validated events into persisted events.
///
/// - `durationMinutes = end − start`; negative values (reversed or overnight
///   ranges) are preserved, not clamped — the orchestrator records a warning
///   for them.
/// - `day` defaults to [`DEFAULT_DAY`]; optional strings default to empty.
pub fn transform(events: Vec<ValidatedEvent>) -> Vec<PersistedEvent> {
    events.into_iter().map(transform_event).collect()
}

fn transform_event(event: ValidatedEvent) -> PersistedEvent {
    let duration_minutes = clock_minutes(&event.end_time) - clock_minutes(&event.start_time);

    PersistedEvent {
        name: event.title,
        day: event
            .day
            .filter(|d| !d.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_DAY.to_string()),
        start_time: event.start_time,
        end_time: event.end_time,
        duration_minutes,
        location: event.location.unwrap_or_default(),
        notes: event.description.unwrap_or_default(),
        metadata: event.metadata.unwrap_or_default(),
        subject: event.subject.unwrap_or_default(),
        additional_info: event.additional_info.unwrap_or_default(),
        confidence: CONFIDENCE,
    }
}

/// Minutes since midnight for a validated `HH:MM[:SS]` string.
///
/// Seconds are deliberately ignored: duration is defined in whole minutes.
fn clock_minutes(time: &str) -> i64 {
    let mut parts = time.split(':');
    // The validator guarantees two zero-padded numeric fields.
    let hours: i64 = parts.next().and_then(|p| p.parse().ok()).unwrap_or(0);
    let minutes: i64 = parts.next().and_then(|p| p.parse().ok()).unwrap_or(0);
    hours * 60 + minutes
}

#[cfg(test)]
mod tests {
    use super::*;

    fn event(start: &str, end: &str) -> ValidatedEvent {
        ValidatedEvent {
            title: "Maths".into(),
            day: None,
            start_time: start.into(),
            end_time: end.into(),
            location: None,
            description: None,
            metadata: None,
            subject: None,
            additional_info: None,
        }
    }

    #[test]
    fn duration_is_minute_difference() {
        let out = transform(vec![event("13:30", "14:30")]);
        assert_eq!(out[0].duration_minutes, 60);
    }

    #[test]
    fn duration_ignores_seconds() {
        let out = transform(vec![event("09:00:45", "09:30:10")]);
        assert_eq!(out[0].duration_minutes, 30);
    }

    #[test]
    fn negative_duration_is_preserved() {
        let out = transform(vec![event("22:00", "01:00")]);
        assert_eq!(out[0].duration_minutes, -(21 * 60));
    }

    #[test]
    fn day_defaults_to_monday() {
        let out = transform(vec![event("09:00", "10:00")]);
        assert_eq!(out[0].day, "Monday");
    }

    #[test]
    fn blank_day_also_defaults() {
        let mut ev = event("09:00", "10:00");
        ev.day = Some("  ".into());
        assert_eq!(transform(vec![ev])[0].day, "Monday");
    }

    #[test]
    fn optional_fields_default_to_empty_strings() {
        let out = transform(vec![event("09:00", "10:00")]);
        let ev = &out[0];
        assert_eq!(ev.location, "");
        assert_eq!(ev.notes, "");
        assert_eq!(ev.metadata, "");
        assert_eq!(ev.subject, "");
        assert_eq!(ev.additional_info, "");
    }

    #[test]
    fn confidence_is_fixed_constant() {
        let out = transform(vec![event("09:00", "10:00"), event("10:00", "11:00")]);
        assert!(out.iter().all(|e| e.confidence == CONFIDENCE));
        assert!((0.0..=1.0).contains(&CONFIDENCE));
    }

    #[test]
    fn description_maps_to_notes() {
        let mut ev = event("09:00", "10:00");
        ev.description = Some("bring calculator".into());
        assert_eq!(transform(vec![ev])[0].notes, "bring calculator");
    }
}
