//! Equalizer handlers

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use remote_core::schema::UpdateEqualizerRequest;
use remote_core::Command;
use serde_json::Value;

use crate::error::ApiError;
use crate::extract::ValidatedJson;
use crate::state::AppState;

/// GET /equalizer
///
/// Returns the stored equalizer snapshot as-is. No controller round trip.
pub async fn get_equalizer(State(state): State<AppState>) -> Result<Json<Value>, ApiError> {
    Ok(Json(state.gateway().equalizer()?))
}

/// POST /equalizer
///
/// Forwards ten band values to the controller.
pub async fn update_equalizer(
    State(state): State<AppState>,
    ValidatedJson(request): ValidatedJson<UpdateEqualizerRequest>,
) -> Result<StatusCode, ApiError> {
    state.gateway().execute(Command::from(request)).await?;
    Ok(StatusCode::OK)
}

/// POST /equalizer/{name}/set
pub async fn set_equalizer(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Result<StatusCode, ApiError> {
    state.gateway().select_preset(&name).await?;
    Ok(StatusCode::OK)
}
