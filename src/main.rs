//! Galaxy Fury headless runner
//!
//! Plays a seeded run through the full game driver without a window. The
//! autopilot flies by default; logs report level milestones and the final
//! score is printed at the end.
//!
//! Usage:
//!   galaxy-fury --seed 7 --frames 36000
//!   RUST_LOG=debug galaxy-fury --level 3 --data-dir ./save

use std::path::PathBuf;
use std::time::{SystemTime, UNIX_EPOCH};

use anyhow::{Context, Result};
use clap::{ArgAction, Parser};

use galaxy_fury::audio::{AudioManager, LogBackend};
use galaxy_fury::consts::{FPS, MAX_LEVEL};
use galaxy_fury::render::FrameStats;
use galaxy_fury::settings::SETTINGS_FILE;
use galaxy_fury::sim::GamePhase;
use galaxy_fury::{FileHighScores, Game, HighScoreStore, Key, MemoryHighScores, Settings};

#[derive(Parser)]
#[command(name = "galaxy-fury")]
#[command(about = "Run a headless Galaxy Fury session")]
struct Args {
    /// RNG seed (defaults to the current time)
    #[arg(long)]
    seed: Option<u64>,

    /// Frames to simulate before stopping
    #[arg(long, default_value_t = 60 * 60 * 10)]
    frames: u64,

    /// Directory holding highscore.txt and settings.json
    #[arg(long)]
    data_dir: Option<PathBuf>,

    /// Let the autopilot fly
    #[arg(long, default_value_t = true, action = ArgAction::Set)]
    autopilot: bool,

    /// Starting level
    #[arg(long, default_value_t = 1, value_parser = clap::value_parser!(u32).range(1..=MAX_LEVEL as i64))]
    level: u32,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    let seed = match args.seed {
        Some(seed) => seed,
        None => SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .context("system clock is before the epoch")?
            .as_nanos() as u64,
    };

    let scores: Box<dyn HighScoreStore>;
    let (settings, settings_path) = match &args.data_dir {
        Some(dir) => {
            std::fs::create_dir_all(dir)
                .with_context(|| format!("creating data dir {}", dir.display()))?;
            scores = Box::new(FileHighScores::in_dir(dir));
            let path = dir.join(SETTINGS_FILE);
            (Settings::load(&path), Some(path))
        }
        None => {
            scores = Box::new(MemoryHighScores::default());
            (Settings::default(), None)
        }
    };

    log::info!("Galaxy Fury headless run, seed {}", seed);
    let audio = AudioManager::new(Some(Box::new(LogBackend)));
    let mut game = Game::new(seed, scores, audio)
        .with_settings(settings, settings_path)
        .with_autopilot(args.autopilot)
        .with_start_level(args.level);

    // Menu starts on Play
    game.key_down(Key::Confirm);

    let dt = 1.0 / FPS as f32;
    let mut stats = FrameStats::default();
    let mut frames = 0;
    while frames < args.frames {
        game.frame(dt);
        game.render(&mut stats);
        frames += 1;
        if matches!(game.state().phase, GamePhase::GameOver | GamePhase::Ending) {
            break;
        }
    }

    let state = game.state();
    println!();
    println!("=== RUN RESULTS ===");
    println!("  Seed:       {}", seed);
    println!("  Outcome:    {:?}", state.phase);
    println!("  Level:      {}", state.level.min(MAX_LEVEL));
    println!("  Score:      {}", state.score);
    println!("  High score: {}", state.high_score);
    println!("  Frames:     {} ({:.1}s)", frames, frames as f32 * dt);
    println!("  Sprites:    {}", stats.sprites);

    Ok(())
}
