//! Status API endpoint handlers.

use std::sync::Arc;

use axum::{Json, extract::State};

use crate::{infrastructure::dto::http::LobbyDto, ui::state::AppState};

/// Health check endpoint
pub async fn health_check() -> Json<serde_json::Value> {
    Json(serde_json::json!({"status": "ok"}))
}

/// Current participants and log size
pub async fn get_lobby(State(state): State<Arc<AppState>>) -> Json<LobbyDto> {
    let lobby = state.get_lobby_state_usecase.execute().await;
    Json(LobbyDto::from(&lobby))
}
