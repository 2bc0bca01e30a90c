//! Autopilot - scripted pointer for demo and headless runs
//!
//! Plays the player's side: it circles the AI ball while trying to hold a
//! comfortable fraction of the allowed distance, moving no faster than a
//! human hand would.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::sim::GameState;

/// Autopilot tuning
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PilotSettings {
    /// Pointer speed limit (units/second)
    pub max_speed: f32,
    /// Where to sit between touching (0.0) and too far (1.0)
    pub comfort: f32,
    /// Orbit rate around the AI ball (radians/second)
    pub orbit_rate: f32,
}

impl Default for PilotSettings {
    fn default() -> Self {
        Self {
            max_speed: 420.0,
            comfort: 0.5,
            orbit_rate: 1.2,
        }
    }
}

/// Pointer driver that keeps the player ball near the AI
#[derive(Debug, Clone)]
pub struct Autopilot {
    settings: PilotSettings,
    pointer: Option<Vec2>,
}

impl Autopilot {
    pub fn new(settings: PilotSettings) -> Self {
        Self {
            settings,
            pointer: None,
        }
    }

    /// Distance the pilot tries to hold for a given limit
    pub fn preferred_distance(&self, max_distance: f32) -> f32 {
        crate::lerp_clamped(MIN_DISTANCE, max_distance, self.settings.comfort)
    }

    /// Forget the pointer position (new run)
    pub fn reset(&mut self) {
        self.pointer = None;
    }

    /// Next pointer position for a frame of `dt` seconds
    pub fn pointer(&mut self, state: &GameState, dt: f32) -> Vec2 {
        let current = self.pointer.unwrap_or(state.player_pos);

        let away = (current - state.ai_pos).normalize_or(Vec2::NEG_Y);
        let orbit = Vec2::from_angle(self.settings.orbit_rate * dt);
        let wanted = state.ai_pos + orbit.rotate(away) * self.preferred_distance(state.max_distance());

        let step = wanted - current;
        let max_step = self.settings.max_speed * dt;
        let next = if step.length() > max_step {
            current + step.normalize_or_zero() * max_step
        } else {
            wanted
        };

        let next = next.clamp(
            Vec2::splat(BALL_RADIUS),
            Vec2::new(FIELD_WIDTH - BALL_RADIUS, FIELD_HEIGHT - BALL_RADIUS),
        );
        self.pointer = Some(next);
        next
    }
}
