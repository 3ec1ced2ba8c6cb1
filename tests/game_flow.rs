//! End-to-end runs through the public `Game` driver

use galaxy_fury::audio::AudioManager;
use galaxy_fury::consts::*;
use galaxy_fury::render::{FrameStats, Screen};
use galaxy_fury::sim::{GamePhase, GameState, TickInput, tick};
use galaxy_fury::{FileHighScores, Game, HighScoreStore, Key, MemoryHighScores};

const DT: f32 = 1.0 / FPS as f32;

fn autopilot_game(seed: u64) -> Game {
    Game::new(seed, Box::new(MemoryHighScores::default()), AudioManager::default())
        .with_autopilot(true)
}

#[test]
fn autopilot_run_renders_every_frame() {
    let mut game = autopilot_game(11);
    game.key_down(Key::Confirm);

    let mut stats = FrameStats::default();
    for _ in 0..(FPS * 20) {
        game.frame(DT);
        game.render(&mut stats);
        if game.state().phase != GamePhase::Playing {
            break;
        }
    }

    assert!(stats.frames > 0);
    let hud = stats.last_hud.expect("hud drawn during play");
    assert_eq!(hud.level, 1);
    assert!(hud.lives <= PLAYER_LIVES);
}

#[test]
fn same_seed_same_run() {
    let run = |seed| {
        let mut state = GameState::new(seed, 0);
        state.start_run();
        let input = TickInput {
            autopilot: true,
            ..Default::default()
        };
        for _ in 0..(FPS * 40) {
            tick(&mut state, &input, DT);
        }
        (state.score, state.player.lives, state.enemies.len(), state.level_time)
    };
    assert_eq!(run(99), run(99));
}

#[test]
fn level_three_boss_fight_ends_the_game() {
    let mut state = GameState::new(5, 0);
    state.start_run_at(3);
    state.level_time = LEVEL_DURATION;
    tick(&mut state, &TickInput::default(), DT);
    assert!(state.boss.is_some());

    // Kill it outright and let the hold run out
    if let Some(boss) = state.boss.as_mut() {
        boss.take_damage(boss.max_hp);
    }
    let score_before = state.score;
    tick(&mut state, &TickInput::default(), DT);
    assert!(state.boss.is_none());
    assert_eq!(state.phase, GamePhase::LevelComplete);
    assert!(state.score >= score_before + 200);

    for _ in 0..(FPS * 3) {
        tick(&mut state, &TickInput::default(), DT);
    }
    assert_eq!(state.phase, GamePhase::Ending);
    assert_eq!(state.high_score, state.score);
}

#[test]
fn high_score_survives_restart() {
    let dir = tempfile::tempdir().unwrap();
    let mut game = Game::new(
        3,
        Box::new(FileHighScores::in_dir(dir.path())),
        AudioManager::default(),
    )
    .with_autopilot(true);
    game.key_down(Key::Confirm);

    let mut frames = 0;
    while game.state().phase == GamePhase::Playing && frames < FPS * 600 {
        game.frame(DT);
        frames += 1;
    }
    let best = game.state().high_score;

    let store = FileHighScores::in_dir(dir.path());
    assert_eq!(store.read_high_score(), best);

    let mut fresh = Game::new(4, Box::new(store), AudioManager::default());
    fresh.key_down(Key::Down);
    fresh.key_down(Key::Down);
    fresh.key_down(Key::Confirm);
    let mut stats = FrameStats::default();
    fresh.render(&mut stats);
    assert_eq!(stats.last_screen, Some(Screen::HighScores { best }));
}

#[test]
fn pause_overlay_freezes_the_scene() {
    let mut game = Game::new(8, Box::new(MemoryHighScores::new(0)), AudioManager::default());
    game.key_down(Key::Confirm);
    for _ in 0..FPS {
        game.frame(DT);
    }

    game.key_down(Key::Pause);
    game.frame(DT);
    let frozen = game.state().clone();
    for _ in 0..FPS {
        game.frame(DT);
    }
    assert_eq!(game.state().phase, GamePhase::Paused);
    assert_eq!(game.state().level_time, frozen.level_time);
    assert_eq!(game.state().player.pos, frozen.player.pos);
    assert_eq!(game.state().enemies.len(), frozen.enemies.len());

    let mut stats = FrameStats::default();
    game.render(&mut stats);
    assert_eq!(stats.last_screen, Some(Screen::Paused));
    assert_eq!(stats.frames, 1);
}
