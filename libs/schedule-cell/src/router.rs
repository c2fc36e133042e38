use std::sync::Arc;

use axum::{
    routing::{get, patch, post},
    Router,
};

use shared_config::AppConfig;

use crate::handlers::{self, ScheduleState};

pub fn schedule_routes(config: Arc<AppConfig>) -> Router {
    let state = ScheduleState::new(config);

    Router::new()
        // Pure engine endpoint
        .route("/advise", post(handlers::advise_slot))
        // Persisted schedule
        .route("/employees/{employee_id}/week", get(handlers::get_employee_week))
        // Editor sessions
        .route("/sessions", post(handlers::open_session))
        .route(
            "/sessions/{session_id}",
            get(handlers::get_session).delete(handlers::close_session),
        )
        .route("/sessions/{session_id}/validate", post(handlers::validate_session))
        .route("/sessions/{session_id}/submit", post(handlers::submit_session))
        .route("/sessions/{session_id}/days/{day}/toggle", post(handlers::toggle_day))
        .route("/sessions/{session_id}/days/{day}/slots", post(handlers::add_slot))
        .route(
            "/sessions/{session_id}/days/{day}/slots/{slot_id}",
            patch(handlers::edit_field).delete(handlers::remove_slot),
        )
        .route(
            "/sessions/{session_id}/days/{day}/slots/{slot_id}/edit",
            post(handlers::begin_edit),
        )
        .route(
            "/sessions/{session_id}/days/{day}/slots/{slot_id}/save",
            post(handlers::save_slot),
        )
        .route(
            "/sessions/{session_id}/days/{day}/slots/{slot_id}/recommendation",
            post(handlers::apply_recommendation),
        )
        .with_state(state)
}
