use tracing::debug;

use crate::error::ScheduleError;
use crate::models::{Recommendation, ResizeOption, ShortenOption, SlotComputation};
use crate::services::fitting::{add_minutes, fit_slots, minutes_between, SlotFit};

/// Leftovers below this many minutes are accepted as-is. A shorter gap is
/// not worth disturbing the schedule over.
pub const MIN_ACTIONABLE_LEFTOVER: i64 = 10;

/// Largest leftover still fixed by extending the window. Above this the
/// advisor proposes restructuring instead.
pub const MAX_EXTEND_LEFTOVER: i64 = 30;

/// Run the fitter over one time window and derive the optimization
/// recommendation for it, if any.
///
/// Thresholds: leftover 0 and 1-9 minutes produce no recommendation,
/// 10-30 minutes produce an extension that fits exactly one more
/// appointment, anything larger produces a shorten/resize pair.
pub fn advise(
    start_time: &str,
    end_time: &str,
    duration_minutes: u32,
) -> Result<SlotComputation, ScheduleError> {
    if duration_minutes == 0 {
        return Err(ScheduleError::InvalidDuration(format!(
            "'{}'",
            duration_minutes
        )));
    }

    let window_minutes = minutes_between(start_time, end_time)?;
    if window_minutes <= 0 {
        return Err(ScheduleError::EndBeforeStart(format!(
            "{} to {}",
            start_time, end_time
        )));
    }

    let fit = fit_slots(window_minutes, duration_minutes);
    let recommendation = recommend(end_time, duration_minutes, window_minutes, fit)?;

    debug!(
        "Advised {}-{} at {} min: {} complete, {} leftover",
        start_time, end_time, duration_minutes, fit.complete_slots, fit.leftover_minutes
    );

    Ok(SlotComputation {
        window_minutes,
        duration_minutes,
        complete_slots: fit.complete_slots,
        leftover_minutes: fit.leftover_minutes,
        recommendation,
    })
}

fn recommend(
    end_time: &str,
    duration_minutes: u32,
    window_minutes: i64,
    fit: SlotFit,
) -> Result<Option<Recommendation>, ScheduleError> {
    let leftover = fit.leftover_minutes;

    // Covers both the exact fit and the sub-10-minute dead zone.
    if leftover < MIN_ACTIONABLE_LEFTOVER {
        return Ok(None);
    }

    if leftover <= MAX_EXTEND_LEFTOVER {
        let extra_minutes = duration_minutes as i64 - leftover;
        let new_end_time = add_minutes(end_time, extra_minutes)?;
        let message = format!(
            "Extending the schedule to {} would fit one more appointment",
            new_end_time
        );
        return Ok(Some(Recommendation::Extend {
            extra_minutes,
            new_end_time,
            message,
        }));
    }

    let new_end_time = add_minutes(end_time, -leftover)?;
    let new_duration = (window_minutes / (fit.complete_slots + 1)) as u32;
    Ok(Some(Recommendation::Optimize {
        message: format!("{} minutes are left unused at the end of this block", leftover),
        shorten: ShortenOption {
            message: format!(
                "End the block at {} for an exact fit of {} appointments",
                new_end_time, fit.complete_slots
            ),
            new_end_time,
        },
        resize: ResizeOption {
            new_duration,
            message: format!(
                "{}-minute appointments would fit {} in the same block",
                new_duration,
                fit.complete_slots + 1
            ),
        },
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    fn recommendation(start: &str, end: &str, duration: u32) -> Option<Recommendation> {
        advise(start, end, duration).unwrap().recommendation
    }

    #[test]
    fn exact_fit_needs_no_recommendation() {
        // 180 / 60: three appointments, no waste.
        let computation = advise("09:00", "12:00", 60).unwrap();
        assert_eq!(computation.window_minutes, 180);
        assert_eq!(computation.complete_slots, 3);
        assert_eq!(computation.leftover_minutes, 0);
        assert!(computation.recommendation.is_none());
    }

    #[test]
    fn small_leftovers_are_ignored() {
        // 125 / 60 leaves 5 minutes: inside the dead zone.
        assert!(recommendation("09:00", "11:05", 60).is_none());
        // 129 / 60 leaves 9 minutes: still inside.
        assert!(recommendation("09:00", "11:09", 60).is_none());
    }

    #[test]
    fn ten_minute_leftover_starts_the_extend_band() {
        match recommendation("09:00", "11:10", 60) {
            Some(Recommendation::Extend { extra_minutes, new_end_time, .. }) => {
                assert_eq!(extra_minutes, 50);
                assert_eq!(new_end_time, "12:00");
            }
            other => panic!("Expected an extend recommendation, got {:?}", other),
        }
    }

    #[test]
    fn extend_scenario_three_fifty_minute_slots() {
        // 09:00-12:00 at 50 min: 3 complete, 30 left, extend by 20 to 12:20.
        let computation = advise("09:00", "12:00", 50).unwrap();
        assert_eq!(computation.complete_slots, 3);
        assert_eq!(computation.leftover_minutes, 30);
        match computation.recommendation {
            Some(Recommendation::Extend { extra_minutes, new_end_time, message }) => {
                assert_eq!(extra_minutes, 20);
                assert_eq!(new_end_time, "12:20");
                assert!(message.contains("12:20"));
            }
            other => panic!("Expected an extend recommendation, got {:?}", other),
        }
    }

    #[test]
    fn optimize_scenario_offers_shorten_and_resize() {
        // 09:00-13:00 at 50 min: 4 complete, 40 left.
        let computation = advise("09:00", "13:00", 50).unwrap();
        assert_eq!(computation.complete_slots, 4);
        assert_eq!(computation.leftover_minutes, 40);
        match computation.recommendation {
            Some(Recommendation::Optimize { shorten, resize, .. }) => {
                assert_eq!(shorten.new_end_time, "12:20");
                assert_eq!(resize.new_duration, 48);
                assert!(resize.message.contains("fit 5"));
            }
            other => panic!("Expected an optimize recommendation, got {:?}", other),
        }
    }

    #[test]
    fn extend_re_evaluates_to_an_exact_fit() {
        for (end, duration) in [("12:00", 50u32), ("11:10", 60), ("17:25", 45)] {
            let computation = advise("09:00", end, duration).unwrap();
            if let Some(Recommendation::Extend { new_end_time, .. }) = computation.recommendation {
                let again = advise("09:00", &new_end_time, duration).unwrap();
                assert_eq!(again.leftover_minutes, 0, "end {} duration {}", end, duration);
                assert_eq!(again.complete_slots, computation.complete_slots + 1);
                assert!(again.recommendation.is_none());
            } else {
                panic!("expected an extend recommendation for end {} duration {}", end, duration);
            }
        }
    }

    #[test]
    fn shorten_and_resize_re_evaluate_as_promised() {
        let computation = advise("09:00", "13:00", 50).unwrap();
        let Some(Recommendation::Optimize { shorten, resize, .. }) = computation.recommendation
        else {
            panic!("expected an optimize recommendation");
        };

        // Shorten keeps the slot count and removes the leftover entirely.
        let shortened = advise("09:00", &shorten.new_end_time, 50).unwrap();
        assert_eq!(shortened.complete_slots, computation.complete_slots);
        assert_eq!(shortened.leftover_minutes, 0);
        assert!(shortened.recommendation.is_none());

        // Resize fits exactly one more appointment in the same window.
        let resized = advise("09:00", "13:00", resize.new_duration).unwrap();
        assert_eq!(resized.complete_slots, computation.complete_slots + 1);
    }

    #[test]
    fn rejects_invalid_windows_and_durations() {
        assert_matches!(
            advise("09:00", "12:00", 0),
            Err(ScheduleError::InvalidDuration(_))
        );
        assert_matches!(
            advise("12:00", "09:00", 50),
            Err(ScheduleError::EndBeforeStart(_))
        );
        assert_matches!(
            advise("09:00", "09:00", 50),
            Err(ScheduleError::EndBeforeStart(_))
        );
        assert_matches!(
            advise("morning", "12:00", 50),
            Err(ScheduleError::InvalidTimeFormat(_))
        );
    }
}
