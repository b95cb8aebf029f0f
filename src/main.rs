//! Space Invaders entry point
//!
//! Headless driver: runs the fixed-tick scheduler with the autopilot at the
//! controls, routes cues to the audio layer and reports the final score to the
//! on-disk leaderboard.

use std::path::PathBuf;
use std::time::{Duration, Instant};

use anyhow::{Context, Result, anyhow};
use clap::Parser;

use space_invaders::audio::{AudioManager, LogBackend};
use space_invaders::consts::TICK_MS;
use space_invaders::highscores::FileScoreStore;
use space_invaders::platform::{Clock, ManualClock, MonotonicClock};
use space_invaders::sim::{GameMode, MenuItem, ModeCommand};
use space_invaders::{Game, Settings, Tuning};

/// Catch-up limit per wall-clock frame in realtime mode
const MAX_SUBSTEPS: u64 = 5;

#[derive(Parser)]
#[command(
    name = "space-invaders",
    about = "Fixed-tick Space Invaders simulation played by the autopilot"
)]
struct Cli {
    /// Maximum ticks to run (16 ms each)
    #[arg(long, default_value = "36000")]
    ticks: u64,

    /// RNG seed for the first game
    #[arg(long, default_value = "1")]
    seed: u64,

    /// Pace ticks against the wall clock instead of running flat out
    #[arg(long)]
    realtime: bool,

    /// Directory holding highscores.json and settings.json
    #[arg(long, default_value = "data")]
    data_dir: PathBuf,

    /// Leaderboard name (saved to settings)
    #[arg(long)]
    name: Option<String>,

    /// Tuning file (TOML); overrides $SPACE_INVADERS_TUNING
    #[arg(long)]
    tuning: Option<PathBuf>,

    /// Print the final playfield as JSON
    #[arg(long)]
    snapshot: bool,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let cli = Cli::parse();
    log::info!("Space Invaders starting...");

    let tuning = match &cli.tuning {
        Some(path) => Tuning::from_file(path)
            .ok_or_else(|| anyhow!("could not load tuning from {}", path.display()))?,
        None => Tuning::load(),
    };

    let mut settings = Settings::load(&cli.data_dir);
    if let Some(name) = &cli.name {
        settings.set_player_name(name);
        if let Err(e) = settings.save(&cli.data_dir) {
            log::warn!("Could not save settings: {}", e);
        }
    }

    let mut audio = AudioManager::new(Some(Box::new(LogBackend)));
    audio.set_master_volume(settings.master_volume);
    audio.set_sfx_volume(settings.sfx_volume);
    audio.set_muted(settings.muted);

    let store = FileScoreStore::load(&cli.data_dir);

    if cli.realtime {
        let (game, _input) = Game::new(MonotonicClock::new(), store, tuning, cli.seed);
        let mut game = game.with_player_name(settings.player_name.clone());
        let mut accumulator = 0u64;
        let mut last = Instant::now();
        run(&mut game, &cli, &mut audio, |_| {
            // Sleep off the remainder of the tick, then bank elapsed time
            let spent = last.elapsed();
            let period = Duration::from_millis(TICK_MS);
            if accumulator < TICK_MS && spent < period {
                std::thread::sleep(period - spent);
            }
            accumulator += last.elapsed().as_millis() as u64;
            last = Instant::now();
            let substeps = (accumulator / TICK_MS).clamp(1, MAX_SUBSTEPS);
            accumulator = accumulator.saturating_sub(substeps * TICK_MS);
            substeps
        })
    } else {
        let (game, _input) = Game::new(ManualClock::new(0), store, tuning, cli.seed);
        let mut game = game.with_player_name(settings.player_name.clone());
        run(&mut game, &cli, &mut audio, |clock| {
            clock.advance(TICK_MS);
            1
        })
    }
}

/// Play one autopilot game. `pace` waits for the next slot and returns how
/// many ticks are due.
fn run<C: Clock>(
    game: &mut Game<C, FileScoreStore>,
    cli: &Cli,
    audio: &mut AudioManager,
    mut pace: impl FnMut(&C) -> u64,
) -> Result<()> {
    game.set_idle_mode(true);
    game.select(MenuItem::NewGame);

    let mut ticks = 0u64;
    'outer: while ticks < cli.ticks {
        let due = pace(game.clock());
        for _ in 0..due {
            if ticks >= cli.ticks {
                break 'outer;
            }
            ticks += 1;
            let report = game.frame();
            audio.handle_events(&game.drain_events());
            if report.as_ref().is_some_and(|r| r.collisions() > 0) {
                log::trace!("tick {}: {:?}", ticks, report);
            }
            if game.mode() != GameMode::Playing {
                break 'outer;
            }
        }
    }

    if cli.snapshot {
        match game.snapshot() {
            Some(snapshot) => {
                let json = serde_json::to_string_pretty(&snapshot).context("serializing snapshot")?;
                println!("{json}");
            }
            None => log::warn!("No playfield to snapshot (game over)"),
        }
    }

    match (game.last_score(), game.session()) {
        (Some(score), _) => match game.last_rank() {
            Some(rank) => println!("Game over after {ticks} ticks: {score} points, rank #{rank}"),
            None => println!("Game over after {ticks} ticks: {score} points"),
        },
        (None, Some(state)) => println!(
            "Stopped after {ticks} ticks at level {} with {} points and {} lives",
            state.level, state.score, state.lives
        ),
        (None, None) => {}
    }
    print!("{}", game.store().scores().render_table());

    if game.mode() == GameMode::Playing {
        game.command(ModeCommand::Pause);
    }
    game.select(MenuItem::Quit);
    Ok(())
}
