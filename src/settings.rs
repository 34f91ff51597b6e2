//! In-memory user settings.

use std::ops::RangeInclusive;

use serde::{Deserialize, Serialize};

use crate::error::AppError;

pub const SPEECH_RATE_RANGE: RangeInclusive<f32> = 0.5..=2.0;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Settings {
    /// Consult the offline dictionary before the provider even when online.
    pub offline_mode_preferred: bool,
    /// Speak each accepted translation.
    pub auto_speak: bool,
    /// Playback rate handed to the speech output.
    pub speech_rate: f32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            offline_mode_preferred: true,
            auto_speak: false,
            speech_rate: 1.0,
        }
    }
}

/// Partial update; `None` fields are left unchanged.
#[derive(Debug, Clone, Copy, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SettingsUpdate {
    pub offline_mode_preferred: Option<bool>,
    pub auto_speak: Option<bool>,
    pub speech_rate: Option<f32>,
}

impl Settings {
    /// Applies `update`, or nothing at all when any field is invalid.
    pub fn update(&mut self, update: SettingsUpdate) -> Result<(), AppError> {
        if let Some(rate) = update.speech_rate {
            validate_speech_rate(rate)?;
        }

        if let Some(value) = update.offline_mode_preferred {
            self.offline_mode_preferred = value;
        }
        if let Some(value) = update.auto_speak {
            self.auto_speak = value;
        }
        if let Some(rate) = update.speech_rate {
            self.speech_rate = rate;
        }
        Ok(())
    }
}

fn validate_speech_rate(rate: f32) -> Result<(), AppError> {
    if !rate.is_finite() || !SPEECH_RATE_RANGE.contains(&rate) {
        return Err(AppError::invalid_request(format!(
            "invalid speech rate {rate}; expected a value in range [{}, {}]",
            SPEECH_RATE_RANGE.start(),
            SPEECH_RATE_RANGE.end()
        )));
    }
    Ok(())
}
