//! Procedural backing track: event schedule, voice recipes and the offline audio context.

/// Offline audio context and its PCM destination.
pub mod context;
/// Backing-track schedule.
pub mod schedule;
pub(crate) mod synth;
