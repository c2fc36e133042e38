use std::sync::Arc;

use axum::{
    routing::get,
    Json, Router,
};
use serde_json::{json, Value};

use schedule_cell::router::schedule_routes;
use shared_config::AppConfig;

pub fn create_router(state: Arc<AppConfig>) -> Router {
    Router::new()
        .route("/", get(|| async { "Clinic Schedule API is running!" }))
        .route("/health", get(health_check))
        .nest("/schedule", schedule_routes(state))
}

async fn health_check() -> Json<Value> {
    Json(json!({
        "status": "healthy",
        "service": "clinic-schedule-api",
    }))
}
