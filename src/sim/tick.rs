//! Per-frame simulation step
//!
//! The driver calls [`tick`] once per rendered frame with the frame delta,
//! the pointer and the current clock reading. Nothing in here reads a clock
//! or an ambient RNG.

use glam::Vec2;
use rand::Rng;

use super::collision::check_game_over;
use super::state::{GameEvent, GamePhase, GameState, Lead};
use crate::consts::*;
use crate::lerp_clamped;

/// Input for a single frame
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Pointer position in field coordinates
    pub pointer: Vec2,
    /// Pointer moved since the previous frame (start trigger)
    pub pointer_moved: bool,
    /// Restart request (only honoured after a game over)
    pub restart: bool,
    /// Monotonic clock reading (ms)
    pub now_ms: u64,
}

/// Allowed separation after `elapsed` seconds: 300 shrinking linearly to 150
/// over the first 120 seconds, then flat.
pub fn max_distance(elapsed: f32) -> f32 {
    lerp_clamped(
        INITIAL_MAX_DISTANCE,
        MIN_MAX_DISTANCE,
        elapsed / DISTANCE_SHRINK_DURATION,
    )
}

/// Difficulty multiplier after `elapsed` seconds: +1x every 20 seconds, capped at 5x
pub fn speed_multiplier(elapsed: f32) -> f32 {
    (1.0 + elapsed / SPEED_RAMP_SECONDS).min(MAX_SPEED_MULTIPLIER)
}

/// Step from `pos` toward `target` by at most `speed`, never past it
pub fn pursue(pos: Vec2, target: Vec2, speed: f32) -> Vec2 {
    let delta = target - pos;
    let dist = delta.length();
    if dist <= 0.0 {
        return pos;
    }
    if speed >= dist {
        return target;
    }
    pos + delta * (speed / dist)
}

/// Handle the frame's triggers, then advance a running game by one frame
pub fn tick<R: Rng + ?Sized>(state: &mut GameState, input: &TickInput, dt: f32, rng: &mut R) {
    match state.phase {
        GamePhase::Waiting => {
            if !input.pointer_moved {
                return;
            }
            state.start();
        }
        GamePhase::GameOver { .. } => {
            if input.restart {
                state.restart(input.now_ms, rng);
            }
            return;
        }
        GamePhase::Running => {}
    }

    advance(state, input.pointer, input.now_ms, dt, rng);
}

/// Advance a running game by one frame. Does nothing unless running.
pub fn advance<R: Rng + ?Sized>(
    state: &mut GameState,
    pointer: Vec2,
    now_ms: u64,
    dt: f32,
    rng: &mut R,
) {
    if !state.is_running() {
        return;
    }

    state.last_tick_ms = now_ms;
    let elapsed = state.elapsed_secs();
    let max_distance = max_distance(elapsed);

    if state.switch.is_due(now_ms) {
        state.lead = state.lead.flipped();
        state.switch.rearm(now_ms, rng);
        log::debug!(
            "{} at {:.2}s, next switch in {}ms",
            state.lead.label(),
            elapsed,
            state.switch.next_delay_ms
        );
        state.emit(GameEvent::LeadSwitched { lead: state.lead });
    }

    let speed_multiplier = speed_multiplier(elapsed);
    let ai_speed = BASE_AI_SPEED * speed_multiplier;

    state.player_pos = pointer;

    match state.lead {
        Lead::Player => {
            state.ai_pos = pursue(state.ai_pos, state.player_pos, ai_speed);
        }
        Lead::Ai => {
            let (pos, vel) = state.heading.wander(state.ai_pos, ai_speed, dt, rng);
            state.ai_pos = pos;
            state.ai_vel = vel;
        }
    }

    state.score += speed_multiplier * dt * SCORE_RATE;
    state.frames += 1;

    if let Some(cause) = check_game_over(state.player_pos, state.ai_pos, max_distance) {
        state.phase = GamePhase::GameOver { cause };
        log::info!(
            "Game over ({}) after {:.1}s with {} points",
            cause.as_str(),
            elapsed,
            state.score as u64
        );
        state.emit(GameEvent::GameOver {
            cause,
            score: state.score,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::state::GameOverCause;
    use proptest::prelude::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    const DT: f32 = 1.0 / 60.0;

    fn running_state(rng: &mut Pcg32) -> GameState {
        let mut state = GameState::new(0, rng);
        state.start();
        state.drain_events();
        state
    }

    #[test]
    fn test_max_distance_endpoints() {
        assert_eq!(max_distance(0.0), 300.0);
        assert_eq!(max_distance(60.0), 225.0);
        assert_eq!(max_distance(120.0), 150.0);
        assert_eq!(max_distance(130.0), 150.0);
        assert_eq!(max_distance(10_000.0), 150.0);
    }

    #[test]
    fn test_speed_multiplier_ramp() {
        assert_eq!(speed_multiplier(0.0), 1.0);
        assert_eq!(speed_multiplier(20.0), 2.0);
        assert_eq!(speed_multiplier(80.0), 5.0);
        assert_eq!(speed_multiplier(500.0), 5.0);
    }

    #[test]
    fn test_pursue_stops_on_target() {
        let pos = Vec2::new(0.0, 0.0);
        let target = Vec2::new(1.5, 0.0);
        assert_eq!(pursue(pos, target, 2.0), target);
        assert_eq!(pursue(target, target, 2.0), target);
    }

    #[test]
    fn test_waiting_until_pointer_moves() {
        let mut rng = Pcg32::seed_from_u64(11);
        let mut state = GameState::new(0, &mut rng);
        let still = TickInput {
            pointer: Vec2::new(10.0, 10.0),
            now_ms: 16,
            ..Default::default()
        };
        tick(&mut state, &still, DT, &mut rng);
        assert_eq!(state.phase, GamePhase::Waiting);
        assert_eq!(state.player_pos, Vec2::new(400.0, 250.0));
        assert_eq!(state.score, 0.0);

        let moved = TickInput {
            pointer: Vec2::new(400.0, 240.0),
            pointer_moved: true,
            now_ms: 32,
            ..Default::default()
        };
        tick(&mut state, &moved, DT, &mut rng);
        assert_eq!(state.phase, GamePhase::Running);
        assert_eq!(state.player_pos, Vec2::new(400.0, 240.0));
        assert!(state.score > 0.0);
        assert_eq!(state.drain_events()[0], GameEvent::Started);
    }

    #[test]
    fn test_pursuit_moves_exactly_base_speed() {
        let mut rng = Pcg32::seed_from_u64(12);
        let mut state = running_state(&mut rng);
        let start = state.ai_pos;
        let pointer = start - Vec2::new(400.0, 0.0);

        advance(&mut state, pointer, 0, DT, &mut rng);

        let moved = state.ai_pos.distance(start);
        assert!((moved - 2.0).abs() < 1e-4);
        assert!((state.ai_pos.distance(pointer) - 398.0).abs() < 1e-3);
        // 398 apart is beyond the 300 allowed at the start
        assert_eq!(state.game_over_cause(), Some(GameOverCause::TooFar));
    }

    #[test]
    fn test_touching_ends_the_run() {
        let mut rng = Pcg32::seed_from_u64(13);
        let mut state = running_state(&mut rng);
        let pointer = Vec2::new(400.0, 300.0);
        state.ai_pos = pointer + Vec2::new(MIN_DISTANCE - 1.0, 0.0);

        advance(&mut state, pointer, 0, DT, &mut rng);

        assert_eq!(state.game_over_cause(), Some(GameOverCause::Touched));
        let events = state.drain_events();
        assert!(matches!(
            events.last(),
            Some(GameEvent::GameOver {
                cause: GameOverCause::Touched,
                ..
            })
        ));
    }

    #[test]
    fn test_game_over_freezes_state() {
        let mut rng = Pcg32::seed_from_u64(14);
        let mut state = running_state(&mut rng);
        state.phase = GamePhase::GameOver {
            cause: GameOverCause::TooFar,
        };
        let before = state.clone();

        let input = TickInput {
            pointer: Vec2::new(1.0, 1.0),
            pointer_moved: true,
            now_ms: 5_000,
            ..Default::default()
        };
        tick(&mut state, &input, DT, &mut rng);

        assert_eq!(state.phase, before.phase);
        assert_eq!(state.score, before.score);
        assert_eq!(state.ai_pos, before.ai_pos);
        assert_eq!(state.player_pos, before.player_pos);
        assert_eq!(state.last_tick_ms, before.last_tick_ms);
    }

    #[test]
    fn test_restart_from_game_over() {
        let mut rng = Pcg32::seed_from_u64(15);
        let mut state = running_state(&mut rng);
        state.score = 300.0;
        state.phase = GamePhase::GameOver {
            cause: GameOverCause::Touched,
        };

        let input = TickInput {
            restart: true,
            now_ms: 40_000,
            ..Default::default()
        };
        tick(&mut state, &input, DT, &mut rng);

        assert!(state.is_running());
        assert_eq!(state.score, 0.0);
        assert_eq!(state.lead, Lead::Player);
        assert_eq!(state.run_start_ms, 40_000);
        assert_eq!(state.drain_events(), vec![GameEvent::Restarted]);
    }

    #[test]
    fn test_restart_ignored_while_running() {
        let mut rng = Pcg32::seed_from_u64(16);
        let mut state = running_state(&mut rng);
        let pointer = state.player_pos;
        advance(&mut state, pointer, 1_000, DT, &mut rng);
        let score = state.score;

        let input = TickInput {
            pointer,
            restart: true,
            now_ms: 1_016,
            ..Default::default()
        };
        tick(&mut state, &input, DT, &mut rng);
        assert!(state.score > score);
        assert_eq!(state.run_start_ms, 0);
    }

    #[test]
    fn test_lead_flips_only_after_delay() {
        let mut rng = Pcg32::seed_from_u64(17);
        let mut state = running_state(&mut rng);
        let delay = u64::from(state.switch.next_delay_ms);
        // Keep the AI safely in range while it pursues
        let pointer = state.player_pos;

        state.ai_pos = pointer + Vec2::new(0.0, 200.0);
        advance(&mut state, pointer, delay, DT, &mut rng);
        assert_eq!(state.lead, Lead::Player);

        state.ai_pos = pointer + Vec2::new(0.0, 200.0);
        advance(&mut state, pointer, delay + 1, DT, &mut rng);
        assert_eq!(state.lead, Lead::Ai);
        assert_eq!(state.switch.last_switch_ms, delay + 1);
        assert!((1_000..=8_000).contains(&state.switch.next_delay_ms));
        assert_eq!(
            state.drain_events(),
            vec![GameEvent::LeadSwitched { lead: Lead::Ai }]
        );
    }

    #[test]
    fn test_wandering_ai_ignores_player() {
        let mut rng = Pcg32::seed_from_u64(18);
        let mut state = running_state(&mut rng);
        state.lead = Lead::Ai;
        state.switch.next_delay_ms = u32::MAX;
        state.heading.theta = 0.0;
        state.heading.angular_vel = 0.0;
        let start = state.ai_pos;
        let pointer = start + Vec2::new(-100.0, 0.0);

        advance(&mut state, pointer, 0, DT, &mut rng);

        // Heading 0 points along +x, away from the player
        assert!(state.ai_pos.x > start.x);
        assert!((state.ai_vel.length() - 2.0).abs() < 1e-5);
        assert!(state.is_running());
    }

    fn wandering_state(rng: &mut Pcg32, ai_pos: Vec2, theta: f32, angular_vel: f32) -> GameState {
        let mut state = running_state(rng);
        state.lead = Lead::Ai;
        state.switch.next_delay_ms = u32::MAX;
        state.ai_pos = ai_pos;
        state.heading.theta = theta;
        state.heading.angular_vel = angular_vel;
        state
    }

    #[test]
    fn test_wander_reflects_off_right_edge() {
        let mut rng = Pcg32::seed_from_u64(20);
        let ai_start = Vec2::new(FIELD_WIDTH - BALL_RADIUS - 1.0, 300.0);
        let mut state = wandering_state(&mut rng, ai_start, 0.0, 0.6);
        let pointer = ai_start - Vec2::new(100.0, 0.0);

        advance(&mut state, pointer, 0, DT, &mut rng);

        let integrated = 0.6 * DT;
        // The step past the edge is kept; only the heading turns back
        assert!(state.ai_pos.x > FIELD_WIDTH - BALL_RADIUS);
        assert!((state.heading.theta - (std::f32::consts::PI - integrated)).abs() < 1e-6);
        assert!(state.heading.angular_vel < 0.0);
        assert!(state.is_running());

        // Next frame heads back into the field
        let x = state.ai_pos.x;
        advance(&mut state, pointer, 16, DT, &mut rng);
        assert!(state.ai_pos.x < x);
    }

    #[test]
    fn test_wander_reflects_off_bottom_edge() {
        let mut rng = Pcg32::seed_from_u64(23);
        let ai_start = Vec2::new(400.0, FIELD_HEIGHT - BALL_RADIUS - 1.0);
        let theta = std::f32::consts::FRAC_PI_2;
        let mut state = wandering_state(&mut rng, ai_start, theta, -0.4);
        let pointer = ai_start - Vec2::new(0.0, 100.0);

        advance(&mut state, pointer, 0, DT, &mut rng);

        let integrated = theta - 0.4 * DT;
        assert!(state.ai_pos.y > FIELD_HEIGHT - BALL_RADIUS);
        assert!((state.heading.theta + integrated).abs() < 1e-6);
        assert!(state.heading.angular_vel > 0.0);

        let y = state.ai_pos.y;
        advance(&mut state, pointer, 16, DT, &mut rng);
        assert!(state.ai_pos.y < y);
    }

    #[test]
    fn test_score_accrual_rate() {
        let mut rng = Pcg32::seed_from_u64(19);
        let mut state = running_state(&mut rng);
        let pointer = state.player_pos;
        state.ai_pos = pointer + Vec2::new(0.0, 250.0);
        state.switch.next_delay_ms = u32::MAX;

        // 20s in: speed multiplier 2x
        state.run_start_ms = 0;
        advance(&mut state, pointer, 20_000, 0.5, &mut rng);
        assert!((state.score - 2.0 * 0.5 * 10.0).abs() < 1e-4);
    }

    #[test]
    fn test_determinism() {
        let mut rng1 = Pcg32::seed_from_u64(99999);
        let mut rng2 = Pcg32::seed_from_u64(99999);
        let mut state1 = GameState::new(0, &mut rng1);
        let mut state2 = GameState::new(0, &mut rng2);

        for frame in 1..600u64 {
            let angle = frame as f32 * 0.02;
            let input = TickInput {
                pointer: Vec2::new(400.0 + angle.cos() * 60.0, 300.0 + angle.sin() * 60.0),
                pointer_moved: true,
                now_ms: frame * 16,
                ..Default::default()
            };
            tick(&mut state1, &input, 0.016, &mut rng1);
            tick(&mut state2, &input, 0.016, &mut rng2);
        }

        assert_eq!(state1.phase, state2.phase);
        assert_eq!(state1.lead, state2.lead);
        assert_eq!(state1.ai_pos, state2.ai_pos);
        assert_eq!(state1.score, state2.score);
    }

    proptest! {
        #[test]
        fn prop_max_distance_non_increasing(a in 0.0f32..400.0, b in 0.0f32..400.0) {
            let (early, late) = if a <= b { (a, b) } else { (b, a) };
            prop_assert!(max_distance(late) <= max_distance(early));
            prop_assert!(max_distance(late) >= MIN_MAX_DISTANCE);
            prop_assert!(max_distance(early) <= INITIAL_MAX_DISTANCE);
        }

        #[test]
        fn prop_pursuit_never_overshoots(
            px in -200.0f32..1000.0, py in -200.0f32..800.0,
            tx in -200.0f32..1000.0, ty in -200.0f32..800.0,
            speed in 0.0f32..12.0,
        ) {
            let pos = Vec2::new(px, py);
            let target = Vec2::new(tx, ty);
            let before = pos.distance(target);
            let after = pursue(pos, target, speed).distance(target);
            let expected = (before - speed).max(0.0);
            prop_assert!((after - expected).abs() < 2e-3);
        }

        #[test]
        fn prop_score_never_decreases(seed in any::<u64>(), frames in 1usize..400) {
            let mut rng = Pcg32::seed_from_u64(seed);
            let mut state = GameState::new(0, &mut rng);
            let mut last_score = state.score;
            for frame in 0..frames {
                let t = frame as f32 * 0.05;
                let input = TickInput {
                    pointer: Vec2::new(400.0 + t.sin() * 90.0, 250.0 + t.cos() * 40.0),
                    pointer_moved: true,
                    now_ms: frame as u64 * 16,
                    ..Default::default()
                };
                let was_over = state.is_game_over();
                tick(&mut state, &input, 0.016, &mut rng);
                prop_assert!(state.score >= last_score);
                if was_over {
                    prop_assert_eq!(state.score, last_score);
                }
                last_score = state.score;

                let phases = [
                    state.phase == GamePhase::Waiting,
                    state.is_running(),
                    state.is_game_over(),
                ];
                prop_assert_eq!(phases.iter().filter(|p| **p).count(), 1);
            }
        }
    }
}
