//! Game state and core simulation types
//!
//! Everything one run needs lives in [`GameState`]. The driver owns it and
//! hands it to [`super::tick`] once per frame together with the clock and RNG.

use std::f32::consts::{PI, TAU};

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::collision::field_exit;
use crate::consts::*;
use crate::{field_center, heading_to_dir};

/// Current phase of a run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Fresh run, waiting for the first pointer motion
    Waiting,
    /// Active gameplay
    Running,
    /// Run ended; motion and scoring are frozen until restart
    GameOver { cause: GameOverCause },
}

/// Why a run ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameOverCause {
    /// The balls came within two radii of each other
    Touched,
    /// The balls drifted further apart than the energy field allows
    TooFar,
}

impl GameOverCause {
    pub fn as_str(&self) -> &'static str {
        match self {
            GameOverCause::Touched => "touched",
            GameOverCause::TooFar => "too far",
        }
    }

    /// End-screen headline
    pub fn message(&self) -> &'static str {
        match self {
            GameOverCause::Touched => "Balls touched! Game Over.",
            GameOverCause::TooFar => "Balls too far apart! Game Over.",
        }
    }
}

/// Who is setting the pace.
///
/// With [`Lead::Player`] the AI chases the pointer-driven ball; with
/// [`Lead::Ai`] the AI wanders on its own and the player has to keep up.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Lead {
    Player,
    Ai,
}

impl Lead {
    pub fn flipped(&self) -> Self {
        match self {
            Lead::Player => Lead::Ai,
            Lead::Ai => Lead::Player,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Lead::Player => "Player Lead",
            Lead::Ai => "AI Lead",
        }
    }
}

/// Notable things that happened during a tick, drained by the driver
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    Started,
    LeadSwitched { lead: Lead },
    GameOver { cause: GameOverCause, score: f32 },
    Restarted,
}

/// Heading of the AI ball while it wanders
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AiHeading {
    /// Direction of travel (radians)
    pub theta: f32,
    /// Turn rate (radians/second)
    pub angular_vel: f32,
}

impl AiHeading {
    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Self {
            theta: rng.random_range(0.0..TAU),
            angular_vel: rng.random_range(-INITIAL_ANGULAR_VEL..=INITIAL_ANGULAR_VEL),
        }
    }

    /// Drift one frame along a jittering curve.
    ///
    /// Returns the new position and the per-frame velocity. The position is
    /// returned even when it crosses the field edge; crossing only reflects
    /// the heading for the following frames.
    pub fn wander<R: Rng + ?Sized>(
        &mut self,
        pos: Vec2,
        speed: f32,
        dt: f32,
        rng: &mut R,
    ) -> (Vec2, Vec2) {
        self.theta += self.angular_vel * dt;
        self.angular_vel += rng.random_range(-ANGULAR_JITTER..=ANGULAR_JITTER) * dt;
        self.angular_vel = self.angular_vel.clamp(-MAX_ANGULAR_VEL, MAX_ANGULAR_VEL);

        let vel = heading_to_dir(self.theta) * speed;
        let new_pos = pos + vel;

        let exit = field_exit(new_pos, BALL_RADIUS);
        if exit.x {
            self.angular_vel = -self.angular_vel;
            self.theta = PI - self.theta;
        }
        if exit.y {
            self.angular_vel = -self.angular_vel;
            self.theta = -self.theta;
        }

        (new_pos, vel)
    }
}

/// Draw the delay until the lead may flip again (ms).
///
/// Bursty on purpose: 40% of draws are quick 1-3s switches, the rest 3-8s.
pub fn draw_switch_delay<R: Rng + ?Sized>(rng: &mut R) -> u32 {
    let (lo, hi) = if rng.random_bool(FAST_SWITCH_CHANCE) {
        FAST_SWITCH_MS
    } else {
        SLOW_SWITCH_MS
    };
    rng.random_range(lo..=hi)
}

/// When the lead last flipped and how long until it may flip again
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SwitchTimer {
    pub last_switch_ms: u64,
    pub next_delay_ms: u32,
}

impl SwitchTimer {
    pub fn new<R: Rng + ?Sized>(now_ms: u64, rng: &mut R) -> Self {
        Self {
            last_switch_ms: now_ms,
            next_delay_ms: draw_switch_delay(rng),
        }
    }

    /// Strictly more than the drawn delay has passed
    pub fn is_due(&self, now_ms: u64) -> bool {
        now_ms.saturating_sub(self.last_switch_ms) > u64::from(self.next_delay_ms)
    }

    pub fn rearm<R: Rng + ?Sized>(&mut self, now_ms: u64, rng: &mut R) {
        *self = Self::new(now_ms, rng);
    }
}

/// Complete state of one run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameState {
    /// Pointer-driven ball
    pub player_pos: Vec2,
    /// AI-driven ball
    pub ai_pos: Vec2,
    /// Last per-frame AI velocity
    pub ai_vel: Vec2,
    pub heading: AiHeading,
    pub lead: Lead,
    pub switch: SwitchTimer,
    /// Clock reading when the run was reset
    pub run_start_ms: u64,
    /// Clock reading of the latest advanced frame
    pub last_tick_ms: u64,
    pub phase: GamePhase,
    pub score: f32,
    /// Frames advanced while running
    pub frames: u64,
    #[serde(skip)]
    events: Vec<GameEvent>,
}

impl GameState {
    /// Fresh run waiting for its start trigger
    pub fn new<R: Rng + ?Sized>(now_ms: u64, rng: &mut R) -> Self {
        let heading = AiHeading::random(rng);
        let center = field_center();
        Self {
            player_pos: center - Vec2::new(0.0, SPAWN_OFFSET),
            ai_pos: center + Vec2::new(0.0, SPAWN_OFFSET),
            ai_vel: heading_to_dir(heading.theta),
            heading,
            lead: Lead::Player,
            switch: SwitchTimer::new(now_ms, rng),
            run_start_ms: now_ms,
            last_tick_ms: now_ms,
            phase: GamePhase::Waiting,
            score: 0.0,
            frames: 0,
            events: Vec::new(),
        }
    }

    /// Discard the current run and replace it with a fresh one
    pub fn reset<R: Rng + ?Sized>(&mut self, now_ms: u64, rng: &mut R) {
        *self = Self::new(now_ms, rng);
    }

    /// First pointer motion starts the run. No-op outside `Waiting`.
    pub fn start(&mut self) -> bool {
        if self.phase != GamePhase::Waiting {
            return false;
        }
        self.phase = GamePhase::Running;
        self.events.push(GameEvent::Started);
        log::info!("Run started");
        true
    }

    /// Restart after a game over, straight into `Running`. No-op otherwise.
    pub fn restart<R: Rng + ?Sized>(&mut self, now_ms: u64, rng: &mut R) -> bool {
        if !self.is_game_over() {
            return false;
        }
        let pending = std::mem::take(&mut self.events);
        self.reset(now_ms, rng);
        self.events = pending;
        self.phase = GamePhase::Running;
        self.events.push(GameEvent::Restarted);
        log::info!("Run restarted");
        true
    }

    pub fn is_running(&self) -> bool {
        self.phase == GamePhase::Running
    }

    pub fn is_game_over(&self) -> bool {
        matches!(self.phase, GamePhase::GameOver { .. })
    }

    pub fn game_over_cause(&self) -> Option<GameOverCause> {
        match self.phase {
            GamePhase::GameOver { cause } => Some(cause),
            _ => None,
        }
    }

    /// Seconds from reset to the latest advanced frame
    pub fn elapsed_secs(&self) -> f32 {
        self.last_tick_ms.saturating_sub(self.run_start_ms) as f32 / 1000.0
    }

    /// Allowed separation as of the latest advanced frame
    pub fn max_distance(&self) -> f32 {
        super::tick::max_distance(self.elapsed_secs())
    }

    pub fn distance(&self) -> f32 {
        self.player_pos.distance(self.ai_pos)
    }

    pub(crate) fn emit(&mut self, event: GameEvent) {
        self.events.push(event);
    }

    /// Take all events emitted since the last drain
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }
}
