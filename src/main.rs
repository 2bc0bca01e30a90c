//! Energy Field entry point
//!
//! Headless native driver: runs the simulation on a synthetic monotonic clock
//! at a fixed frame rate, with the autopilot standing in for the mouse.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use env_logger::{Builder, Env};
use log::LevelFilter;
use rand::SeedableRng;
use rand_pcg::Pcg32;

use energy_field::hud::Hud;
use energy_field::pilot::Autopilot;
use energy_field::sim::{GameEvent, GameState, TickInput, tick};
use energy_field::{HighScores, Settings};

/// Command line flags (override the settings file)
#[derive(Debug, Parser)]
#[command(name = "energy-field", about = "Headless Energy Field runs driven by the autopilot")]
struct Cli {
    /// JSON settings file
    #[arg(short, long)]
    settings: Option<PathBuf>,
    /// RNG seed
    #[arg(long)]
    seed: Option<u64>,
    /// Number of runs to play
    #[arg(long)]
    runs: Option<u32>,
    /// Print the leaderboard as JSON when done
    #[arg(long)]
    json: bool,
    /// Debug logging
    #[arg(short, long)]
    verbose: bool,
}

fn init_logging(verbose: bool) {
    let level = if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };
    let env = Env::default().default_filter_or(level.to_string());
    let _ = Builder::from_env(env).try_init();
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);
    log::info!("Energy Field (native) starting...");

    let mut settings = match &cli.settings {
        Some(path) => match Settings::load(path) {
            Ok(settings) => settings,
            Err(e) => {
                log::error!("{}", e);
                return ExitCode::FAILURE;
            }
        },
        None => Settings::default(),
    };
    if let Some(seed) = cli.seed {
        settings.seed = Some(seed);
    }
    if let Some(runs) = cli.runs {
        settings.runs = runs;
    }
    if let Err(e) = settings.validate() {
        log::error!("{}", e);
        return ExitCode::FAILURE;
    }

    let scores = play(&settings);

    match scores.best() {
        Some(best) => log::info!(
            "Best run: {} points, survived {:.1}s",
            best.points,
            best.survived_secs
        ),
        None => log::info!("No run scored"),
    }
    if cli.json {
        match serde_json::to_string_pretty(&scores) {
            Ok(json) => println!("{}", json),
            Err(e) => {
                log::error!("Failed to encode leaderboard: {}", e);
                return ExitCode::FAILURE;
            }
        }
    }
    ExitCode::SUCCESS
}

/// Play `settings.runs` runs back to back and collect their scores
fn play(settings: &Settings) -> HighScores {
    let seed = settings.seed.unwrap_or_else(|| {
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .map(|d| d.as_millis() as u64)
            .unwrap_or(0)
    });
    log::info!("Seed: {}", seed);

    let mut rng = Pcg32::seed_from_u64(seed);
    let mut clock = settings.frame_clock();
    let dt = clock.dt();
    let hud_every = clock.frames_in(settings.hud_interval_secs);

    let mut state = GameState::new(clock.now_ms(), &mut rng);
    let mut pilot = Autopilot::new(settings.pilot);
    let mut scores = HighScores::new();
    let mut last_pointer = state.player_pos;
    let mut finished = 0u32;
    let mut run_frames = 0u64;

    while finished < settings.runs {
        let now_ms = clock.advance();
        run_frames += 1;

        let pointer = pilot.pointer(&state, dt);
        let input = TickInput {
            pointer,
            pointer_moved: pointer != last_pointer,
            restart: state.is_game_over(),
            now_ms,
        };
        last_pointer = pointer;
        tick(&mut state, &input, dt, &mut rng);

        for event in state.drain_events() {
            match event {
                GameEvent::GameOver { cause, score } => {
                    finished += 1;
                    let points = score as u64;
                    match scores.add_score(points, state.elapsed_secs(), Some(cause)) {
                        Some(rank) => log::info!(
                            "Run {} ended: {} ({} points, rank {})",
                            finished,
                            cause.message(),
                            points,
                            rank
                        ),
                        None => log::info!(
                            "Run {} ended: {} ({} points)",
                            finished,
                            cause.message(),
                            points
                        ),
                    }
                }
                GameEvent::Restarted => {
                    pilot.reset();
                    run_frames = 0;
                }
                GameEvent::LeadSwitched { lead } => log::debug!("Lead: {}", lead.label()),
                GameEvent::Started => {}
            }
        }

        if state.is_running() && run_frames % hud_every == 0 {
            log_hud(&Hud::from_state(&state), &scores, state.elapsed_secs());
        }

        if settings.max_frames_per_run > 0
            && run_frames >= settings.max_frames_per_run
            && state.is_running()
        {
            finished += 1;
            log::warn!(
                "Run {} hit the frame cap after {:.1}s",
                finished,
                state.elapsed_secs()
            );
            scores.add_score(state.score as u64, state.elapsed_secs(), None);
            state.reset(now_ms, &mut rng);
            pilot.reset();
            last_pointer = state.player_pos;
            run_frames = 0;
        }
    }

    scores
}

/// Periodic status line, plus the energy link at debug level
fn log_hud(hud: &Hud, scores: &HighScores, elapsed: f32) {
    let pace = match scores.potential_rank(hud.points, elapsed) {
        Some(rank) => format!("on pace for #{}", rank),
        None => "off the board".to_string(),
    };
    log::info!("{} | {}", hud.lines().join(" | "), pace);

    match &hud.link {
        Some(link) => log::debug!(
            "Link: {:.0} long at {:.2} rad, alpha {}",
            link.length(),
            link.angle(),
            link.base_alpha
        ),
        None => log::debug!("Link: gone"),
    }
}
