//! Driver settings
//!
//! How the native driver runs the game: seed, frame rate, how many runs,
//! and how the autopilot plays. Gameplay rules are fixed in [`crate::consts`].

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::clock::FrameClock;
use crate::consts::TARGET_FPS;
use crate::pilot::PilotSettings;

/// Problems loading a settings file
#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("failed to read settings file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse settings: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("invalid setting `{field}`: {reason}")]
    Invalid {
        field: &'static str,
        reason: &'static str,
    },
}

/// Driver settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// RNG seed (`None` = seed from the wall clock)
    pub seed: Option<u64>,
    /// Number of runs to play before exiting
    pub runs: u32,
    /// Frames per second of the driver loop
    pub frame_rate: u32,
    /// Hard cap on frames per run (0 = unlimited)
    pub max_frames_per_run: u64,
    /// Seconds between HUD log lines
    pub hud_interval_secs: f32,
    /// Autopilot tuning
    pub pilot: PilotSettings,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            seed: None,
            runs: 3,
            frame_rate: TARGET_FPS,
            max_frames_per_run: 10 * 60 * TARGET_FPS as u64,
            hud_interval_secs: 5.0,
            pilot: PilotSettings::default(),
        }
    }
}

impl Settings {
    /// Parse settings from JSON; missing fields take their defaults
    pub fn from_json(json: &str) -> Result<Self, SettingsError> {
        let settings: Self = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Load settings from a JSON file
    pub fn load(path: &Path) -> Result<Self, SettingsError> {
        let json = std::fs::read_to_string(path)?;
        let settings = Self::from_json(&json)?;
        log::info!("Loaded settings from {}", path.display());
        Ok(settings)
    }

    pub fn validate(&self) -> Result<(), SettingsError> {
        if self.runs == 0 {
            return Err(SettingsError::Invalid {
                field: "runs",
                reason: "must be at least 1",
            });
        }
        if self.frame_rate == 0 || self.frame_rate > 1000 {
            return Err(SettingsError::Invalid {
                field: "frame_rate",
                reason: "must be between 1 and 1000",
            });
        }
        if !(self.hud_interval_secs > 0.0) {
            return Err(SettingsError::Invalid {
                field: "hud_interval_secs",
                reason: "must be positive",
            });
        }
        if !(self.pilot.max_speed > 0.0) {
            return Err(SettingsError::Invalid {
                field: "pilot.max_speed",
                reason: "must be positive",
            });
        }
        if !(0.0..=1.0).contains(&self.pilot.comfort) {
            return Err(SettingsError::Invalid {
                field: "pilot.comfort",
                reason: "must be between 0 and 1",
            });
        }
        Ok(())
    }

    /// Driver clock running at [`Self::frame_rate`]
    pub fn frame_clock(&self) -> FrameClock {
        FrameClock::new(self.frame_rate)
    }
}
