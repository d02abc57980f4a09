//! Request schemas for parameterized commands
//!
//! Bodies are checked with `validator` before a command is built, so a payload
//! that fails here never reaches the event bridge.

use serde::{Deserialize, Serialize};
use serde_json::Number;
use validator::{Validate, ValidationError};

use crate::command::Command;

pub const VOLUME_MIN: f64 = 0.0;
pub const VOLUME_MAX: f64 = 100.0;
pub const EQUALIZER_BANDS: u64 = 10;
pub const BAND_MIN: f64 = -10.0;
pub const BAND_MAX: f64 = 10.0;

/// Body of `POST /player/volume`
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct VolumeRequest {
    #[validate(custom(function = "validate_volume"))]
    pub value: Number,
}

impl From<VolumeRequest> for Command {
    fn from(request: VolumeRequest) -> Self {
        Command::Volume(request.value)
    }
}

/// Body of `POST /player/seek`, position in seconds
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct SeekRequest {
    #[validate(custom(function = "validate_position"))]
    pub value: Number,
}

impl From<SeekRequest> for Command {
    fn from(request: SeekRequest) -> Self {
        Command::Seek(request.value)
    }
}

/// Body of `POST /equalizer`
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct UpdateEqualizerRequest {
    #[validate(
        length(equal = EQUALIZER_BANDS),
        custom(function = "validate_bands")
    )]
    pub values: Vec<Number>,
}

impl From<UpdateEqualizerRequest> for Command {
    fn from(request: UpdateEqualizerRequest) -> Self {
        Command::UpdateEqualizer(request.values)
    }
}

fn in_range(value: &Number, min: f64, max: f64) -> bool {
    value.as_f64().is_some_and(|v| (min..=max).contains(&v))
}

fn range_error(message: String) -> ValidationError {
    let mut err = ValidationError::new("range");
    err.message = Some(message.into());
    err
}

fn validate_volume(value: &Number) -> Result<(), ValidationError> {
    if in_range(value, VOLUME_MIN, VOLUME_MAX) {
        Ok(())
    } else {
        Err(range_error(format!(
            "must be between {} and {}",
            VOLUME_MIN, VOLUME_MAX
        )))
    }
}

fn validate_position(value: &Number) -> Result<(), ValidationError> {
    if in_range(value, 0.0, f64::MAX) {
        Ok(())
    } else {
        Err(range_error("must be at least 0".to_string()))
    }
}

fn validate_bands(values: &[Number]) -> Result<(), ValidationError> {
    if values.iter().all(|v| in_range(v, BAND_MIN, BAND_MAX)) {
        Ok(())
    } else {
        Err(range_error(format!(
            "each band must be between {} and {}",
            BAND_MIN, BAND_MAX
        )))
    }
}
