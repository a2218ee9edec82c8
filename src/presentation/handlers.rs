// HTTP request handlers
use crate::application::history_service::DEFAULT_HISTORY_POINTS;
use crate::infrastructure::json_mapper::{
    ControlJson, PlotJson, control_to_json, plot_to_json, snapshot_to_json,
};
use crate::presentation::app_state::AppState;
use axum::{
    Json,
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Deserialize;
use std::sync::Arc;

#[derive(Deserialize)]
pub struct HistoryQuery {
    pub points: Option<usize>,
}

#[derive(Deserialize)]
pub struct ControlUpdate {
    pub running: Option<bool>,
    pub interval_minutes: Option<u64>,
}

/// Health check endpoint
pub async fn health_check() -> &'static str {
    "ok"
}

/// Latest estimation snapshot, 204 until the first cycle succeeded
pub async fn get_snapshot(State(state): State<Arc<AppState>>) -> Response {
    match state.polling_service.latest() {
        Some(snapshot) => Json(snapshot_to_json(&snapshot)).into_response(),
        None => StatusCode::NO_CONTENT.into_response(),
    }
}

/// Plot-ready history of the latest records
pub async fn get_history(
    Query(query): Query<HistoryQuery>,
    State(state): State<Arc<AppState>>,
) -> Result<Json<PlotJson>, (StatusCode, String)> {
    let points = query.points.unwrap_or(DEFAULT_HISTORY_POINTS);

    match state.history_service.plot_data(points).await {
        Ok(plot) => Ok(Json(plot_to_json(plot))),
        Err(e) => {
            tracing::error!("Error reading history: {:#}", e);
            Err((StatusCode::INTERNAL_SERVER_ERROR, e.to_string()))
        }
    }
}

pub async fn get_control(State(state): State<Arc<AppState>>) -> Json<ControlJson> {
    Json(control_to_json(state.polling_service.control()))
}

/// Start/stop the polling loop or change its interval
pub async fn put_control(
    State(state): State<Arc<AppState>>,
    Json(update): Json<ControlUpdate>,
) -> Result<Json<ControlJson>, (StatusCode, String)> {
    state
        .polling_service
        .update_control(update.running, update.interval_minutes)
        .map(|control| Json(control_to_json(control)))
        .map_err(|e| (StatusCode::BAD_REQUEST, e.to_string()))
}

/// Move the history into a backup file and empty the live one
pub async fn archive_history(
    State(state): State<Arc<AppState>>,
) -> Result<Json<serde_json::Value>, (StatusCode, String)> {
    match state.history_service.archive().await {
        Ok(backup) => Ok(Json(serde_json::json!({ "backup": backup.display().to_string() }))),
        Err(e) => {
            tracing::error!("Error archiving history: {:#}", e);
            Err((StatusCode::INTERNAL_SERVER_ERROR, e.to_string()))
        }
    }
}
