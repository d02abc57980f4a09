//! Player handlers
//!
//! Transport controls are fire-and-forget: a 200 means the event was handed to
//! the controller link, not that the player acted on it.

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use remote_core::schema::{SeekRequest, VolumeRequest};
use remote_core::Command;
use serde_json::Value;

use crate::error::ApiError;
use crate::extract::ValidatedJson;
use crate::state::AppState;

async fn accept(state: &AppState, command: Command) -> Result<StatusCode, ApiError> {
    state.gateway().execute(command).await?;
    Ok(StatusCode::OK)
}

/// GET /player/now-playing
///
/// Asks the controller for its status and returns the reply payload verbatim.
pub async fn now_playing(State(state): State<AppState>) -> Result<Json<Value>, ApiError> {
    let outcome = state.gateway().execute(Command::NowPlaying).await?;
    Ok(Json(outcome.into_reply().unwrap_or(Value::Null)))
}

pub async fn next(State(state): State<AppState>) -> Result<StatusCode, ApiError> {
    accept(&state, Command::Next).await
}

pub async fn previous(State(state): State<AppState>) -> Result<StatusCode, ApiError> {
    accept(&state, Command::Previous).await
}

pub async fn pause(State(state): State<AppState>) -> Result<StatusCode, ApiError> {
    accept(&state, Command::Pause).await
}

pub async fn play_pause(State(state): State<AppState>) -> Result<StatusCode, ApiError> {
    accept(&state, Command::PlayPause).await
}

pub async fn stop(State(state): State<AppState>) -> Result<StatusCode, ApiError> {
    accept(&state, Command::Stop).await
}

pub async fn play(State(state): State<AppState>) -> Result<StatusCode, ApiError> {
    accept(&state, Command::Play).await
}

pub async fn mute(State(state): State<AppState>) -> Result<StatusCode, ApiError> {
    accept(&state, Command::Mute).await
}

/// POST /player/volume
pub async fn set_volume(
    State(state): State<AppState>,
    ValidatedJson(request): ValidatedJson<VolumeRequest>,
) -> Result<StatusCode, ApiError> {
    accept(&state, request.into()).await
}

/// POST /player/seek
pub async fn seek(
    State(state): State<AppState>,
    ValidatedJson(request): ValidatedJson<SeekRequest>,
) -> Result<StatusCode, ApiError> {
    accept(&state, request.into()).await
}
