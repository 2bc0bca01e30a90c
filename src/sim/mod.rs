//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Time comes from the driver (frame delta and clock readings)
//! - Seeded RNG passed in by the caller, never an ambient one
//! - No rendering or platform dependencies

pub mod collision;
pub mod state;
pub mod tick;

pub use collision::{FieldExit, check_game_over, field_exit};
pub use state::{
    AiHeading, GameEvent, GameOverCause, GamePhase, GameState, Lead, SwitchTimer,
    draw_switch_delay,
};
pub use tick::{TickInput, advance, max_distance, pursue, speed_multiplier, tick};
