//! Pipeline stages for timetable extraction.
//!
//! Each submodule implements exactly one transformation step. Keeping stages
//! separate makes each independently testable and lets us swap an
//! implementation (e.g. the provider call) without touching other stages.
//!
//! ## Data Flow
//!
//! ```text
//! classify ──▶ content ──▶ prompt ──▶ invoke ──▶ normalize ──▶ validate ──▶ transform
//! (mode)    (text/PNG)  (request)   (model)     (candidate)   (typed)      (persisted)
//! ```
//!
//! 1. [`classify`]  — pure, total mode decision (PDF text vs vision image)
//! 2. [`content`]   — PDF text extraction / image normalisation; CPU-bound,
//!    runs in `spawn_blocking`
//! 3. [`crate::prompts`] — build the provider request
//! 4. [`invoke`]    — the deadline-bound provider call; the only stage with
//!    network I/O
//! 5. [`normalize`] — fence stripping, JSON isolation, day/time derivation
//! 6. [`validate`]  — all-or-nothing schema gate producing typed events
//! 7. [`transform`] — duration arithmetic, defaults, confidence

pub mod classify;
pub mod content;
pub mod invoke;
pub mod normalize;
pub mod transform;
pub mod validate;
