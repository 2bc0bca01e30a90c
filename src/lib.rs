//! Energy Field - A two-ball chase arcade game
//!
//! Core modules:
//! - `sim`: Deterministic simulation (AI motion, lead switching, game-over rules)
//! - `hud`: Read-only view model for whatever draws the frame
//! - `pilot`: Scripted pointer for the headless demo driver
//! - `highscores`: Session leaderboard of finished runs
//! - `clock`: Fixed-rate frame clock for the driver
//! - `settings`: Driver configuration

pub mod clock;
pub mod highscores;
pub mod hud;
pub mod pilot;
pub mod settings;
pub mod sim;

pub use highscores::HighScores;
pub use settings::Settings;

use glam::Vec2;

/// Game configuration constants
pub mod consts {
    /// Target frame rate of the driver loop
    pub const TARGET_FPS: u32 = 60;

    /// Playing field dimensions
    pub const FIELD_WIDTH: f32 = 800.0;
    pub const FIELD_HEIGHT: f32 = 600.0;

    /// Both balls share one radius
    pub const BALL_RADIUS: f32 = 20.0;
    /// Balls closer than this have touched
    pub const MIN_DISTANCE: f32 = BALL_RADIUS * 2.0;
    /// Vertical offset of each ball from the field center at reset
    pub const SPAWN_OFFSET: f32 = 50.0;

    /// Allowed separation at the start of a run
    pub const INITIAL_MAX_DISTANCE: f32 = 300.0;
    /// Allowed separation once the field has fully shrunk
    pub const MIN_MAX_DISTANCE: f32 = 150.0;
    /// Seconds the field takes to shrink to its minimum
    pub const DISTANCE_SHRINK_DURATION: f32 = 120.0;

    /// AI movement per frame at 1x speed
    pub const BASE_AI_SPEED: f32 = 2.0;
    /// Cap on the time-based speed multiplier
    pub const MAX_SPEED_MULTIPLIER: f32 = 5.0;
    /// Seconds per +1x of speed multiplier
    pub const SPEED_RAMP_SECONDS: f32 = 20.0;
    /// Points per second at 1x speed
    pub const SCORE_RATE: f32 = 10.0;

    /// Chance that the next lead switch comes quickly
    pub const FAST_SWITCH_CHANCE: f64 = 0.4;
    /// Quick lead switch delay range (ms, inclusive)
    pub const FAST_SWITCH_MS: (u32, u32) = (1000, 3000);
    /// Normal lead switch delay range (ms, inclusive)
    pub const SLOW_SWITCH_MS: (u32, u32) = (3000, 8000);

    /// Initial AI angular velocity is drawn from [-this, this]
    pub const INITIAL_ANGULAR_VEL: f32 = 1.0;
    /// Per-second jitter applied to the wandering AI's angular velocity
    pub const ANGULAR_JITTER: f32 = 0.5;
    /// Clamp for the wandering AI's angular velocity (rad/s)
    pub const MAX_ANGULAR_VEL: f32 = 1.5;
}

/// Center of the playing field
#[inline]
pub fn field_center() -> Vec2 {
    Vec2::new(consts::FIELD_WIDTH / 2.0, consts::FIELD_HEIGHT / 2.0)
}

/// Unit vector for a heading angle
#[inline]
pub fn heading_to_dir(theta: f32) -> Vec2 {
    Vec2::new(theta.cos(), theta.sin())
}

/// Linear interpolation from `a` to `b`, `t` clamped to [0, 1]
#[inline]
pub fn lerp_clamped(a: f32, b: f32, t: f32) -> f32 {
    let t = t.clamp(0.0, 1.0);
    a + (b - a) * t
}
