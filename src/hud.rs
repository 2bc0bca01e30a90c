//! HUD and energy-field view model
//!
//! Everything a renderer needs to draw a frame, computed from [`GameState`]
//! without touching it.

use glam::Vec2;
use serde::Serialize;

use crate::sim::{GamePhase, GameState};

/// Alpha factors of the four energy-field layers, faintest first
pub const LINK_ALPHA_FACTORS: [f32; 4] = [0.2, 0.4, 0.7, 1.0];

/// One stroke of the energy field
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LinkLayer {
    pub alpha: u8,
    pub thickness: f32,
}

/// The glowing link between both balls, brighter the closer they are
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EnergyLink {
    pub from: Vec2,
    pub to: Vec2,
    /// Overall opacity before the per-layer factors
    pub base_alpha: u8,
    pub layers: [LinkLayer; 4],
}

impl EnergyLink {
    /// Build the link, or `None` once the balls are at or past the limit
    pub fn between(from: Vec2, to: Vec2, max_distance: f32) -> Option<Self> {
        let distance = from.distance(to);
        let clamped = distance.min(max_distance);
        let base_alpha = (255.0 * (1.0 - clamped / max_distance)) as i32;
        if base_alpha <= 0 {
            return None;
        }
        let base_alpha = base_alpha.min(255) as u8;

        let layers = std::array::from_fn(|i| LinkLayer {
            alpha: (f32::from(base_alpha) * LINK_ALPHA_FACTORS[i]) as u8,
            thickness: 2.0 + i as f32 * 2.0,
        });

        Some(Self {
            from,
            to,
            base_alpha,
            layers,
        })
    }

    pub fn length(&self) -> f32 {
        self.from.distance(self.to)
    }

    /// Angle of the link (radians)
    pub fn angle(&self) -> f32 {
        let d = self.to - self.from;
        d.y.atan2(d.x)
    }
}

/// Snapshot of what the screen shows
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Hud {
    pub phase: GamePhase,
    pub player_pos: Vec2,
    pub ai_pos: Vec2,
    pub lead_label: &'static str,
    pub points: u64,
    pub max_distance: u32,
    pub link: Option<EnergyLink>,
}

impl Hud {
    pub fn from_state(state: &GameState) -> Self {
        let max_distance = state.max_distance();
        let link = if state.is_running() {
            EnergyLink::between(state.player_pos, state.ai_pos, max_distance)
        } else {
            None
        };
        Self {
            phase: state.phase,
            player_pos: state.player_pos,
            ai_pos: state.ai_pos,
            lead_label: state.lead.label(),
            points: state.score as u64,
            max_distance: max_distance as u32,
            link,
        }
    }

    /// Text lines for the current screen, top to bottom
    pub fn lines(&self) -> Vec<String> {
        match self.phase {
            GamePhase::Waiting => vec!["Move your mouse to start".to_string()],
            GamePhase::Running => vec![
                self.lead_label.to_string(),
                format!("Points: {}", self.points),
                format!("Max Distance: {}", self.max_distance),
            ],
            GamePhase::GameOver { cause } => vec![
                cause.message().to_string(),
                "Press R to Restart".to_string(),
                format!("Final Points: {}", self.points),
            ],
        }
    }
}
