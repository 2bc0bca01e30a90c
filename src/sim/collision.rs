//! Distance and boundary checks

use glam::Vec2;

use super::state::GameOverCause;
use crate::consts::*;

/// Which field edges a ball overlaps
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FieldExit {
    /// Past the left or right edge
    pub x: bool,
    /// Past the top or bottom edge
    pub y: bool,
}

/// Check a ball center against the field edges, inset by its radius
pub fn field_exit(pos: Vec2, radius: f32) -> FieldExit {
    FieldExit {
        x: pos.x < radius || pos.x > FIELD_WIDTH - radius,
        y: pos.y < radius || pos.y > FIELD_HEIGHT - radius,
    }
}

/// Decide whether the current separation ends the run.
///
/// Touching is checked first, so it wins if both could hold.
pub fn check_game_over(player: Vec2, ai: Vec2, max_distance: f32) -> Option<GameOverCause> {
    let distance = player.distance(ai);
    if distance < MIN_DISTANCE {
        return Some(GameOverCause::Touched);
    }
    if distance > max_distance {
        return Some(GameOverCause::TooFar);
    }
    None
}
