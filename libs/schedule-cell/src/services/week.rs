use chrono::Duration;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::error::ScheduleError;
use crate::models::{
    DaySchedule, HorarioRecord, HorariosResponse, Recommendation, RecommendationChoice, Slot,
    SlotField, SlotState, Weekday, DEFAULT_DURATION_MINUTES, MAX_DURATION_MINUTES,
};
use crate::services::advisor::advise;
use crate::services::fitting::{format_time, parse_time};

/// Gap between an existing slot's end and the start of a newly added one.
const NEW_SLOT_GAP_MINUTES: i64 = 30;
/// Length of a newly added slot.
const NEW_SLOT_LENGTH_MINUTES: i64 = 60;

/// One employee's full week of working windows. This is the aggregate the
/// editor operates on: every mutation goes through it, and it keeps each
/// slot's derived computation current as the slot changes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeekSchedule {
    // Always seven entries, in Weekday::ALL order.
    pub days: Vec<DaySchedule>,
}

impl WeekSchedule {
    /// Empty week, all days inactive.
    pub fn new() -> Self {
        Self {
            days: Weekday::ALL
                .iter()
                .map(|&day| DaySchedule { day, active: false, slots: Vec::new() })
                .collect(),
        }
    }

    /// Build a week from the store payload. Unknown day names are ignored,
    /// missing days stay inactive.
    pub fn from_payload(payload: &HorariosResponse) -> Self {
        let mut week = Self::new();
        for (name, day_payload) in &payload.horarios {
            let Some(day) = Weekday::from_wire_name(name) else {
                warn!("Ignoring unknown day name from store: {}", name);
                continue;
            };
            let entry = week.day_mut(day);
            entry.active = day_payload.activo;
            entry.slots = day_payload
                .franjas
                .iter()
                .map(|franja| {
                    let mut slot = Slot::new(&franja.hora_inicio, &franja.hora_fin, franja.duracion);
                    recompute(&mut slot);
                    slot
                })
                .collect();
        }
        week
    }

    /// One store record per slot of every active day.
    pub fn to_records(&self, employee_id: Uuid) -> Vec<HorarioRecord> {
        self.days
            .iter()
            .filter(|day| day.active)
            .flat_map(|day| {
                day.slots.iter().map(move |slot| HorarioRecord {
                    empleado_id: employee_id,
                    dia_semana: day.day.wire_name().to_string(),
                    hora_inicio: slot.start_time.clone(),
                    hora_fin: slot.end_time.clone(),
                    duracion: slot.duration_minutes,
                })
            })
            .collect()
    }

    pub fn day(&self, day: Weekday) -> &DaySchedule {
        &self.days[day as usize]
    }

    fn day_mut(&mut self, day: Weekday) -> &mut DaySchedule {
        &mut self.days[day as usize]
    }

    pub fn slot(&self, day: Weekday, slot_id: Uuid) -> Result<&Slot, ScheduleError> {
        self.day(day)
            .slots
            .iter()
            .find(|slot| slot.id == slot_id)
            .ok_or_else(|| ScheduleError::SlotNotFound(slot_id.to_string()))
    }

    fn slot_mut(&mut self, day: Weekday, slot_id: Uuid) -> Result<&mut Slot, ScheduleError> {
        self.day_mut(day)
            .slots
            .iter_mut()
            .find(|slot| slot.id == slot_id)
            .ok_or_else(|| ScheduleError::SlotNotFound(slot_id.to_string()))
    }

    /// Flip a day on or off. Activating a day that was never configured
    /// seeds it with one default slot. Returns the new active state.
    pub fn toggle_day(&mut self, day: Weekday) -> bool {
        let entry = self.day_mut(day);
        entry.active = !entry.active;
        if entry.active && entry.slots.is_empty() {
            let mut slot = Slot::with_defaults();
            recompute(&mut slot);
            entry.slots.push(slot);
            info!("Activated {} with a default slot", day);
        } else {
            debug!("Toggled {} to active={}", day, entry.active);
        }
        entry.active
    }

    /// Append a slot after the last one: half an hour after its end, one
    /// hour long, default appointment length. Falls back to the default
    /// window when the day is empty or the previous end does not parse.
    /// The new slot starts out in edit mode.
    pub fn add_slot(&mut self, day: Weekday) -> Slot {
        let entry = self.day_mut(day);
        let mut slot = match entry.slots.last().and_then(|last| parse_time(&last.end_time).ok()) {
            Some(last_end) => {
                let start = last_end + Duration::minutes(NEW_SLOT_GAP_MINUTES);
                let end = start + Duration::minutes(NEW_SLOT_LENGTH_MINUTES);
                Slot::new(&format_time(start), &format_time(end), DEFAULT_DURATION_MINUTES)
            }
            None => Slot::with_defaults(),
        };
        slot.state = SlotState::Editing;
        recompute(&mut slot);
        debug!("Added slot {} to {}: {}-{}", slot.id, day, slot.start_time, slot.end_time);
        entry.slots.push(slot.clone());
        slot
    }

    /// Remove a slot. An active day keeps at least one slot.
    pub fn remove_slot(&mut self, day: Weekday, slot_id: Uuid) -> Result<(), ScheduleError> {
        let entry = self.day_mut(day);
        let index = entry
            .slots
            .iter()
            .position(|slot| slot.id == slot_id)
            .ok_or_else(|| ScheduleError::SlotNotFound(slot_id.to_string()))?;

        if entry.active && entry.slots.len() == 1 {
            warn!("Refusing to remove the only slot of active day {}", day);
            return Err(ScheduleError::RemoveLastSlot(day.to_string()));
        }

        let removed = entry.slots.remove(index);
        debug!("Removed slot {} from {}", removed.id, day);
        Ok(())
    }

    pub fn begin_edit(&mut self, day: Weekday, slot_id: Uuid) -> Result<Slot, ScheduleError> {
        let slot = self.slot_mut(day, slot_id)?;
        slot.state = SlotState::Editing;
        Ok(slot.clone())
    }

    /// End an edit session; the slot keeps whatever values it has.
    /// Whether those values are acceptable is decided at submit time.
    pub fn save_slot(&mut self, day: Weekday, slot_id: Uuid) -> Result<Slot, ScheduleError> {
        let slot = self.slot_mut(day, slot_id)?;
        slot.state = SlotState::Viewing;
        Ok(slot.clone())
    }

    /// Update one field of a slot mid-edit. Returns a warning message when
    /// the value was accepted but adjusted (duration clamp).
    pub fn edit_field(
        &mut self,
        day: Weekday,
        slot_id: Uuid,
        field: SlotField,
        value: &str,
    ) -> Result<Option<String>, ScheduleError> {
        let slot = self.slot_mut(day, slot_id)?;
        if slot.state != SlotState::Editing {
            return Err(ScheduleError::SlotNotEditing);
        }

        let mut warning = None;
        match field {
            SlotField::StartTime => slot.start_time = value.to_string(),
            SlotField::EndTime => slot.end_time = value.to_string(),
            SlotField::Duration => {
                let parsed: u32 = value
                    .trim()
                    .parse()
                    .map_err(|_| ScheduleError::InputFormat(value.to_string()))?;
                if parsed > MAX_DURATION_MINUTES {
                    warn!("Clamping appointment duration {} to {}", parsed, MAX_DURATION_MINUTES);
                    warning = Some(format!(
                        "Appointment duration is capped at {} minutes",
                        MAX_DURATION_MINUTES
                    ));
                    slot.duration_minutes = MAX_DURATION_MINUTES;
                } else {
                    slot.duration_minutes = parsed;
                }
            }
        }

        // Slot-local by design: a field edit never touches the other slots.
        recompute(slot);
        Ok(warning)
    }

    /// Rewrite the slot's end or duration to the advisor's suggested value
    /// and refresh its computation.
    pub fn apply_recommendation(
        &mut self,
        day: Weekday,
        slot_id: Uuid,
        choice: RecommendationChoice,
    ) -> Result<Slot, ScheduleError> {
        let slot = self.slot_mut(day, slot_id)?;
        let recommendation = slot
            .computation
            .as_ref()
            .and_then(|c| c.recommendation.clone())
            .ok_or_else(|| ScheduleError::RecommendationUnavailable(choice.to_string()))?;

        match (choice, recommendation) {
            (RecommendationChoice::Extend, Recommendation::Extend { new_end_time, .. }) => {
                slot.end_time = new_end_time;
            }
            (RecommendationChoice::Shorten, Recommendation::Optimize { shorten, .. }) => {
                slot.end_time = shorten.new_end_time;
            }
            (RecommendationChoice::Resize, Recommendation::Optimize { resize, .. }) => {
                slot.duration_minutes = resize.new_duration;
            }
            _ => return Err(ScheduleError::RecommendationUnavailable(choice.to_string())),
        }

        info!("Applied {} recommendation to slot {} on {}", choice, slot_id, day);
        recompute(slot);
        Ok(slot.clone())
    }

    /// True while any slot anywhere in the week is mid-edit.
    pub fn any_editing(&self) -> bool {
        self.days
            .iter()
            .any(|day| day.slots.iter().any(|slot| slot.state == SlotState::Editing))
    }

    /// Submit-time validation. Scans Monday to Sunday and reports the
    /// first problem found; nothing is aggregated across days.
    pub fn validate(&self) -> Result<(), ScheduleError> {
        if !self.days.iter().any(|day| day.active) {
            return Err(ScheduleError::NoActiveDays);
        }

        for day in self.days.iter().filter(|day| day.active) {
            if day.slots.is_empty() {
                return Err(ScheduleError::EmptyActiveDay(day.day.to_string()));
            }

            let mut ranges = Vec::with_capacity(day.slots.len());
            for slot in &day.slots {
                let start = parse_time(&slot.start_time).map_err(|_| {
                    ScheduleError::InvalidTimeFormat(format!("'{}' on {}", slot.start_time, day.day))
                })?;
                let end = parse_time(&slot.end_time).map_err(|_| {
                    ScheduleError::InvalidTimeFormat(format!("'{}' on {}", slot.end_time, day.day))
                })?;
                if end <= start {
                    return Err(ScheduleError::EndBeforeStart(format!(
                        "{} {}-{}",
                        day.day, slot.start_time, slot.end_time
                    )));
                }
                if slot.duration_minutes == 0 {
                    return Err(ScheduleError::InvalidDuration(format!("on {}", day.day)));
                }
                if slot.duration_minutes > MAX_DURATION_MINUTES {
                    return Err(ScheduleError::DurationTooLong(format!(
                        "{} minutes on {}",
                        slot.duration_minutes, day.day
                    )));
                }
                ranges.push((start, end, slot));
            }

            // Pairwise interval check over [start, end) ranges.
            for i in 0..ranges.len() {
                for j in (i + 1)..ranges.len() {
                    let (a_start, a_end, a) = &ranges[i];
                    let (b_start, b_end, b) = &ranges[j];
                    if a_start < b_end && b_start < a_end {
                        return Err(ScheduleError::OverlappingSlots(format!(
                            "{} {}-{} and {}-{}",
                            day.day, a.start_time, a.end_time, b.start_time, b.end_time
                        )));
                    }
                }
            }
        }

        Ok(())
    }
}

impl Default for WeekSchedule {
    fn default() -> Self {
        Self::new()
    }
}

/// Refresh a slot's derived state. A slot whose fields do not currently
/// form a valid window simply has no computation.
fn recompute(slot: &mut Slot) {
    slot.computation = advise(&slot.start_time, &slot.end_time, slot.duration_minutes).ok();
}
