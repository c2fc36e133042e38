// libs/schedule-cell/src/handlers.rs
use std::collections::HashMap;
use std::sync::Arc;

use axum::{
    extract::{Path, State},
    Json,
};
use chrono::{DateTime, Utc};
use serde_json::{json, Value};
use tokio::sync::RwLock;
use tracing::info;
use uuid::Uuid;

use shared_config::AppConfig;
use shared_models::error::AppError;

use crate::error::ScheduleError;
use crate::models::{
    AdviseRequest, ApplyRecommendationRequest, EditFieldRequest, OpenSessionRequest, Weekday,
};
use crate::services::advisor::advise;
use crate::services::schedule::ScheduleService;
use crate::services::week::WeekSchedule;

/// One employee's week being edited.
#[derive(Debug, Clone)]
pub struct EditorSession {
    pub id: Uuid,
    pub employee_id: Uuid,
    pub week: WeekSchedule,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl EditorSession {
    fn new(employee_id: Uuid, week: WeekSchedule) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            employee_id,
            week,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Cell state: configuration plus the open editor sessions.
#[derive(Clone)]
pub struct ScheduleState {
    pub config: Arc<AppConfig>,
    pub sessions: Arc<RwLock<HashMap<Uuid, EditorSession>>>,
}

impl ScheduleState {
    pub fn new(config: Arc<AppConfig>) -> Self {
        Self {
            config,
            sessions: Arc::new(RwLock::new(HashMap::new())),
        }
    }
}

fn session_not_found(session_id: Uuid) -> AppError {
    AppError::NotFound(format!("Session not found: {}", session_id))
}

/// Run the fitter and advisor over one time window.
pub async fn advise_slot(
    State(_state): State<ScheduleState>,
    Json(request): Json<AdviseRequest>,
) -> Result<Json<Value>, AppError> {
    let computation = advise(
        &request.start_time,
        &request.end_time,
        request.duration_minutes,
    )?;
    Ok(Json(json!({ "computation": computation })))
}

/// Currently persisted week for an employee.
pub async fn get_employee_week(
    State(state): State<ScheduleState>,
    Path(employee_id): Path<Uuid>,
) -> Result<Json<Value>, AppError> {
    let service = ScheduleService::new(&state.config);
    let week = service
        .load_week(employee_id)
        .await
        .map_err(|e| AppError::ExternalService(e.to_string()))?;

    Ok(Json(json!({
        "employee_id": employee_id,
        "week": week,
    })))
}

/// Load an employee's week from the store and open an editing session
/// over it. The in-memory week is only created if the load succeeds.
pub async fn open_session(
    State(state): State<ScheduleState>,
    Json(request): Json<OpenSessionRequest>,
) -> Result<Json<Value>, AppError> {
    let service = ScheduleService::new(&state.config);
    let week = service
        .load_week(request.employee_id)
        .await
        .map_err(|e| AppError::ExternalService(e.to_string()))?;

    let session = EditorSession::new(request.employee_id, week);
    info!(
        "Opened schedule session {} for employee {}",
        session.id, session.employee_id
    );

    let response = Json(json!({
        "session_id": session.id,
        "employee_id": session.employee_id,
        "week": session.week,
    }));

    let mut sessions = state.sessions.write().await;
    sessions.insert(session.id, session);

    Ok(response)
}

pub async fn get_session(
    State(state): State<ScheduleState>,
    Path(session_id): Path<Uuid>,
) -> Result<Json<Value>, AppError> {
    let sessions = state.sessions.read().await;
    let session = sessions
        .get(&session_id)
        .ok_or_else(|| session_not_found(session_id))?;

    Ok(Json(json!({
        "session_id": session.id,
        "employee_id": session.employee_id,
        "week": session.week,
        "editing": session.week.any_editing(),
        "updated_at": session.updated_at,
    })))
}

/// Discard a session without saving anything.
pub async fn close_session(
    State(state): State<ScheduleState>,
    Path(session_id): Path<Uuid>,
) -> Result<Json<Value>, AppError> {
    let mut sessions = state.sessions.write().await;
    sessions
        .remove(&session_id)
        .ok_or_else(|| session_not_found(session_id))?;

    info!("Closed schedule session {}", session_id);
    Ok(Json(json!({ "success": true })))
}

pub async fn toggle_day(
    State(state): State<ScheduleState>,
    Path((session_id, day)): Path<(Uuid, Weekday)>,
) -> Result<Json<Value>, AppError> {
    let mut sessions = state.sessions.write().await;
    let session = sessions
        .get_mut(&session_id)
        .ok_or_else(|| session_not_found(session_id))?;

    let active = session.week.toggle_day(day);
    session.updated_at = Utc::now();

    Ok(Json(json!({
        "day": day,
        "active": active,
        "slots": session.week.day(day).slots,
    })))
}

pub async fn add_slot(
    State(state): State<ScheduleState>,
    Path((session_id, day)): Path<(Uuid, Weekday)>,
) -> Result<Json<Value>, AppError> {
    let mut sessions = state.sessions.write().await;
    let session = sessions
        .get_mut(&session_id)
        .ok_or_else(|| session_not_found(session_id))?;

    let slot = session.week.add_slot(day);
    session.updated_at = Utc::now();

    Ok(Json(json!({ "day": day, "slot": slot })))
}

pub async fn remove_slot(
    State(state): State<ScheduleState>,
    Path((session_id, day, slot_id)): Path<(Uuid, Weekday, Uuid)>,
) -> Result<Json<Value>, AppError> {
    let mut sessions = state.sessions.write().await;
    let session = sessions
        .get_mut(&session_id)
        .ok_or_else(|| session_not_found(session_id))?;

    session.week.remove_slot(day, slot_id)?;
    session.updated_at = Utc::now();

    Ok(Json(json!({
        "day": day,
        "slots": session.week.day(day).slots,
    })))
}

pub async fn begin_edit(
    State(state): State<ScheduleState>,
    Path((session_id, day, slot_id)): Path<(Uuid, Weekday, Uuid)>,
) -> Result<Json<Value>, AppError> {
    let mut sessions = state.sessions.write().await;
    let session = sessions
        .get_mut(&session_id)
        .ok_or_else(|| session_not_found(session_id))?;

    let slot = session.week.begin_edit(day, slot_id)?;
    session.updated_at = Utc::now();

    Ok(Json(json!({ "day": day, "slot": slot })))
}

pub async fn save_slot(
    State(state): State<ScheduleState>,
    Path((session_id, day, slot_id)): Path<(Uuid, Weekday, Uuid)>,
) -> Result<Json<Value>, AppError> {
    let mut sessions = state.sessions.write().await;
    let session = sessions
        .get_mut(&session_id)
        .ok_or_else(|| session_not_found(session_id))?;

    let slot = session.week.save_slot(day, slot_id)?;
    session.updated_at = Utc::now();

    Ok(Json(json!({ "day": day, "slot": slot })))
}

/// Change one field of a slot that is in edit mode. The response carries
/// the refreshed slot and, when the value was adjusted, a warning.
pub async fn edit_field(
    State(state): State<ScheduleState>,
    Path((session_id, day, slot_id)): Path<(Uuid, Weekday, Uuid)>,
    Json(request): Json<EditFieldRequest>,
) -> Result<Json<Value>, AppError> {
    let mut sessions = state.sessions.write().await;
    let session = sessions
        .get_mut(&session_id)
        .ok_or_else(|| session_not_found(session_id))?;

    let warning = session
        .week
        .edit_field(day, slot_id, request.field, &request.value)?;
    session.updated_at = Utc::now();

    let slot = session.week.slot(day, slot_id)?;
    Ok(Json(json!({
        "day": day,
        "slot": slot,
        "warning": warning,
    })))
}

pub async fn apply_recommendation(
    State(state): State<ScheduleState>,
    Path((session_id, day, slot_id)): Path<(Uuid, Weekday, Uuid)>,
    Json(request): Json<ApplyRecommendationRequest>,
) -> Result<Json<Value>, AppError> {
    let mut sessions = state.sessions.write().await;
    let session = sessions
        .get_mut(&session_id)
        .ok_or_else(|| session_not_found(session_id))?;

    let slot = session
        .week
        .apply_recommendation(day, slot_id, request.choice)?;
    session.updated_at = Utc::now();

    Ok(Json(json!({ "day": day, "slot": slot })))
}

/// Submit-time validation without saving. Fails while any slot is still
/// being edited.
pub async fn validate_session(
    State(state): State<ScheduleState>,
    Path(session_id): Path<Uuid>,
) -> Result<Json<Value>, AppError> {
    let sessions = state.sessions.read().await;
    let session = sessions
        .get(&session_id)
        .ok_or_else(|| session_not_found(session_id))?;

    if session.week.any_editing() {
        return Err(ScheduleError::EditInProgress.into());
    }
    session.week.validate()?;

    Ok(Json(json!({ "valid": true })))
}

/// Validate the week and persist it through the delete-then-create saga.
pub async fn submit_session(
    State(state): State<ScheduleState>,
    Path(session_id): Path<Uuid>,
) -> Result<Json<Value>, AppError> {
    // Validate under the lock, save outside it.
    let (employee_id, week) = {
        let sessions = state.sessions.read().await;
        let session = sessions
            .get(&session_id)
            .ok_or_else(|| session_not_found(session_id))?;

        if session.week.any_editing() {
            return Err(ScheduleError::EditInProgress.into());
        }
        session.week.validate()?;
        (session.employee_id, session.week.clone())
    };

    let service = ScheduleService::new(&state.config);
    let summary = service
        .save_week(employee_id, &week)
        .await
        .map_err(|e| AppError::ExternalService(e.to_string()))?;

    info!(
        "Submitted session {}: {} records saved for employee {}",
        session_id, summary.created, employee_id
    );

    Ok(Json(json!({
        "success": true,
        "created": summary.created,
    })))
}
