// libs/schedule-cell/src/models.rs
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use uuid::Uuid;

/// Slot defaults used when a day is first configured or a slot is added
/// to an empty day.
pub const DEFAULT_START_TIME: &str = "09:00";
pub const DEFAULT_END_TIME: &str = "12:00";
pub const DEFAULT_DURATION_MINUTES: u32 = 50;

/// Upper bound for a single appointment. Longer durations are clamped at
/// edit time and rejected at validation time.
pub const MAX_DURATION_MINUTES: u32 = 120;

// ==============================================================================
// WEEK / DAY / SLOT MODELS
// ==============================================================================

/// Days of the week in display order. The store API speaks Spanish day
/// names; everything else in this crate uses the English ones.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Weekday {
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
    Sunday,
}

impl Weekday {
    pub const ALL: [Weekday; 7] = [
        Weekday::Monday,
        Weekday::Tuesday,
        Weekday::Wednesday,
        Weekday::Thursday,
        Weekday::Friday,
        Weekday::Saturday,
        Weekday::Sunday,
    ];

    /// Day name as the store API writes it.
    pub fn wire_name(&self) -> &'static str {
        match self {
            Weekday::Monday => "Lunes",
            Weekday::Tuesday => "Martes",
            Weekday::Wednesday => "Miércoles",
            Weekday::Thursday => "Jueves",
            Weekday::Friday => "Viernes",
            Weekday::Saturday => "Sábado",
            Weekday::Sunday => "Domingo",
        }
    }

    pub fn from_wire_name(name: &str) -> Option<Weekday> {
        Weekday::ALL.iter().copied().find(|d| d.wire_name() == name)
    }
}

impl fmt::Display for Weekday {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Weekday::Monday => "monday",
            Weekday::Tuesday => "tuesday",
            Weekday::Wednesday => "wednesday",
            Weekday::Thursday => "thursday",
            Weekday::Friday => "friday",
            Weekday::Saturday => "saturday",
            Weekday::Sunday => "sunday",
        };
        write!(f, "{}", name)
    }
}

/// Edit lifecycle of a slot. Fields only change while `Editing`, and the
/// week cannot be submitted while any slot is still `Editing`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SlotState {
    Viewing,
    Editing,
}

/// One working window of a day, subdivided into fixed-duration
/// appointments. Start and end hold the raw entered text so that a slot
/// can pass through invalid intermediate values during an edit session;
/// they are parsed at computation and validation boundaries.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Slot {
    pub id: Uuid,
    pub start_time: String,
    pub end_time: String,
    pub duration_minutes: u32,
    pub state: SlotState,
    pub computation: Option<SlotComputation>,
}

impl Slot {
    pub fn new(start_time: &str, end_time: &str, duration_minutes: u32) -> Self {
        Self {
            id: Uuid::new_v4(),
            start_time: start_time.to_string(),
            end_time: end_time.to_string(),
            duration_minutes,
            state: SlotState::Viewing,
            computation: None,
        }
    }

    pub fn with_defaults() -> Self {
        Self::new(DEFAULT_START_TIME, DEFAULT_END_TIME, DEFAULT_DURATION_MINUTES)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DaySchedule {
    pub day: Weekday,
    pub active: bool,
    pub slots: Vec<Slot>,
}

// ==============================================================================
// DERIVED COMPUTATION MODELS
// ==============================================================================

/// What the fitter and advisor derived for one slot. Never persisted,
/// recomputed whenever the slot changes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SlotComputation {
    pub window_minutes: i64,
    pub duration_minutes: u32,
    pub complete_slots: i64,
    pub leftover_minutes: i64,
    pub recommendation: Option<Recommendation>,
}

/// Suggested, user-confirmable change that eliminates or reduces leftover
/// minutes in a slot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Recommendation {
    /// The window almost fits one more appointment: lengthen it.
    Extend {
        extra_minutes: i64,
        new_end_time: String,
        message: String,
    },
    /// Too much waste for a simple extension: either shrink the window or
    /// change the appointment length. Neither option is picked
    /// automatically.
    Optimize {
        message: String,
        shorten: ShortenOption,
        resize: ResizeOption,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShortenOption {
    pub new_end_time: String,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResizeOption {
    pub new_duration: u32,
    pub message: String,
}

/// Which recommendation variant to apply to a slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecommendationChoice {
    Extend,
    Shorten,
    Resize,
}

impl fmt::Display for RecommendationChoice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            RecommendationChoice::Extend => "extend",
            RecommendationChoice::Shorten => "shorten",
            RecommendationChoice::Resize => "resize",
        };
        write!(f, "{}", name)
    }
}

/// Editable slot fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SlotField {
    StartTime,
    EndTime,
    Duration,
}

// ==============================================================================
// STORE WIRE MODELS
// ==============================================================================

/// Load payload from the store API, keyed by Spanish day name.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct HorariosResponse {
    #[serde(default)]
    pub horarios: HashMap<String, DayPayload>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DayPayload {
    pub activo: bool,
    #[serde(default)]
    pub franjas: Vec<FranjaPayload>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FranjaPayload {
    pub hora_inicio: String,
    pub hora_fin: String,
    pub duracion: u32,
}

/// One persisted slot record, as the create-multiple endpoint expects it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HorarioRecord {
    pub empleado_id: Uuid,
    pub dia_semana: String,
    pub hora_inicio: String,
    pub hora_fin: String,
    pub duracion: u32,
}

/// Outcome of the two-call save.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SaveSummary {
    pub created: usize,
}

// ==============================================================================
// REQUEST MODELS
// ==============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdviseRequest {
    pub start_time: String,
    pub end_time: String,
    pub duration_minutes: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OpenSessionRequest {
    pub employee_id: Uuid,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EditFieldRequest {
    pub field: SlotField,
    pub value: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApplyRecommendationRequest {
    pub choice: RecommendationChoice,
}
