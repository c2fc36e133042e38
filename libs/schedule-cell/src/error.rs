use thiserror::Error;

use shared_models::error::AppError;

/// Everything that can go wrong while editing or submitting a weekly
/// schedule. All of these are recoverable and end up as user-visible
/// messages.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ScheduleError {
    #[error("Invalid duration '{0}': expected a whole number of minutes")]
    InputFormat(String),

    #[error("Invalid time format: {0}, expected HH:MM")]
    InvalidTimeFormat(String),

    #[error("End time must be after start time: {0}")]
    EndBeforeStart(String),

    #[error("Appointment duration must be greater than zero: {0}")]
    InvalidDuration(String),

    #[error("Appointment duration cannot exceed 120 minutes: {0}")]
    DurationTooLong(String),

    #[error("Overlapping slots: {0}")]
    OverlappingSlots(String),

    #[error("No active days in the schedule")]
    NoActiveDays,

    #[error("Active day has no slots: {0}")]
    EmptyActiveDay(String),

    #[error("A slot is still being edited, finish or discard that edit first")]
    EditInProgress,

    #[error("Cannot remove the only slot of active day {0}")]
    RemoveLastSlot(String),

    #[error("Slot is not in edit mode")]
    SlotNotEditing,

    #[error("No {0} recommendation is available for this slot")]
    RecommendationUnavailable(String),

    #[error("Slot not found: {0}")]
    SlotNotFound(String),
}

impl From<ScheduleError> for AppError {
    fn from(err: ScheduleError) -> Self {
        let message = err.to_string();
        match err {
            ScheduleError::InputFormat(_) => AppError::BadRequest(message),
            ScheduleError::SlotNotFound(_) => AppError::NotFound(message),
            ScheduleError::EditInProgress
            | ScheduleError::SlotNotEditing
            | ScheduleError::RemoveLastSlot(_)
            | ScheduleError::RecommendationUnavailable(_) => AppError::Conflict(message),
            _ => AppError::ValidationError(message),
        }
    }
}
