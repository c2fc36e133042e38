use chrono::{Duration, NaiveTime};

use crate::error::ScheduleError;

pub const TIME_FORMAT: &str = "%H:%M";

/// How many complete appointments fit a window, and what is left over.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SlotFit {
    pub complete_slots: i64,
    pub leftover_minutes: i64,
}

/// Parse an "HH:MM" wall-clock string.
pub fn parse_time(value: &str) -> Result<NaiveTime, ScheduleError> {
    NaiveTime::parse_from_str(value.trim(), TIME_FORMAT)
        .map_err(|_| ScheduleError::InvalidTimeFormat(format!("'{}'", value)))
}

pub fn format_time(time: NaiveTime) -> String {
    time.format(TIME_FORMAT).to_string()
}

/// Minutes from `start` to `end`. Negative when `end` is earlier; callers
/// treat a non-positive window as invalid.
pub fn minutes_between(start: &str, end: &str) -> Result<i64, ScheduleError> {
    let start = parse_time(start)?;
    let end = parse_time(end)?;
    Ok(end.signed_duration_since(start).num_minutes())
}

/// Shift an "HH:MM" time by whole minutes. Negative shifts move the time
/// earlier. Wraps at midnight, which real clinic windows never reach.
pub fn add_minutes(value: &str, minutes: i64) -> Result<String, ScheduleError> {
    let time = parse_time(value)?;
    Ok(format_time(time + Duration::minutes(minutes)))
}

/// Integer slot fit: `complete_slots * duration + leftover == window`.
/// Callers guarantee `duration_minutes > 0`.
pub fn fit_slots(window_minutes: i64, duration_minutes: u32) -> SlotFit {
    let duration = duration_minutes as i64;
    SlotFit {
        complete_slots: window_minutes / duration,
        leftover_minutes: window_minutes % duration,
    }
}
