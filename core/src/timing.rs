//! Frame clock helpers
//!
//! Absolute times are local wall-clock `NaiveDateTime`s sampled once per frame.
//! Offsets and durations handed around the engine are `f32` seconds.

use chrono::{Duration, NaiveDateTime};

/// Seconds from `from` to `to` (negative if `to` is earlier)
pub fn secs_between(from: NaiveDateTime, to: NaiveDateTime) -> f32 {
    let delta = to.signed_duration_since(from);
    match delta.num_microseconds() {
        Some(us) => (us as f64 / 1_000_000.0) as f32,
        None => delta.num_milliseconds() as f32 / 1000.0,
    }
}

/// Whole microseconds in `secs`, `None` if not finite or out of `i64` range
pub fn secs_to_micros(secs: f32) -> Option<i64> {
    let micros = (secs as f64 * 1_000_000.0).round();
    if !micros.is_finite() || micros.abs() >= i64::MAX as f64 {
        return None;
    }
    Some(micros as i64)
}

/// `t` shifted by a (possibly fractional) number of seconds.
///
/// `None` when the offset is not finite or the result leaves the calendar
/// range; callers treat that as "never".
pub fn add_secs(t: NaiveDateTime, secs: f32) -> Option<NaiveDateTime> {
    let micros = secs_to_micros(secs)?;
    t.checked_add_signed(Duration::microseconds(micros))
}
