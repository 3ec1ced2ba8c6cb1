//! Front-end game driver
//!
//! Owns the simulation state plus everything around it: menu-side screens,
//! key handling, settings, audio and the high-score store. A platform layer
//! feeds key edges and the frame delta, then asks for a render.

use std::path::PathBuf;

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use crate::audio::AudioManager;
use crate::highscores::HighScoreStore;
use crate::render::{self, MENU_ITEMS, OPTION_ITEMS, RenderSink, Screen};
use crate::settings::Settings;
use crate::sim::{GameEvent, GamePhase, GameState, TickInput, tick};

/// Logical keys, mapped from the platform's keyboard
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Up,
    Down,
    Left,
    Right,
    /// Enter
    Confirm,
    /// Escape
    Back,
    /// Space
    Fire,
    /// P
    Pause,
}

/// Directional keys currently held
#[derive(Debug, Clone, Copy, Default)]
struct Held {
    up: bool,
    down: bool,
    left: bool,
    right: bool,
}

impl Held {
    fn axis(&self) -> Vec2 {
        let x = self.right as i32 - self.left as i32;
        let y = self.down as i32 - self.up as i32;
        Vec2::new(x as f32, y as f32)
    }

    fn set(&mut self, key: Key, down: bool) {
        match key {
            Key::Up => self.up = down,
            Key::Down => self.down = down,
            Key::Left => self.left = down,
            Key::Right => self.right = down,
            _ => {}
        }
    }
}

pub struct Game {
    state: GameState,
    settings: Settings,
    settings_path: Option<PathBuf>,
    audio: AudioManager,
    scores: Box<dyn HighScoreStore>,
    menu_index: usize,
    options_index: usize,
    held: Held,
    /// One-shot commands waiting for the next frame
    pending: TickInput,
    autopilot: bool,
    start_level: u32,
    running: bool,
    /// Cosmetic randomness, kept apart from the simulation's generator
    fx_rng: Pcg32,
}

impl Game {
    pub fn new(seed: u64, scores: Box<dyn HighScoreStore>, audio: AudioManager) -> Self {
        let best = scores.read_high_score();
        Self {
            state: GameState::new(seed, best),
            settings: Settings::default(),
            settings_path: None,
            audio,
            scores,
            menu_index: 0,
            options_index: 0,
            held: Held::default(),
            pending: TickInput::default(),
            autopilot: false,
            start_level: 1,
            running: true,
            fx_rng: Pcg32::seed_from_u64(seed ^ 0x5eed_f00d),
        }
    }

    /// Use `settings`, saving changes back to `path` if given
    pub fn with_settings(mut self, settings: Settings, path: Option<PathBuf>) -> Self {
        self.audio.apply_settings(&settings);
        self.settings = settings;
        self.settings_path = path;
        self
    }

    pub fn with_autopilot(mut self, autopilot: bool) -> Self {
        self.autopilot = autopilot;
        self
    }

    /// Level a new run starts at
    pub fn with_start_level(mut self, level: u32) -> Self {
        self.start_level = level;
        self
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn high_scores(&self) -> &dyn HighScoreStore {
        self.scores.as_ref()
    }

    pub fn menu_index(&self) -> usize {
        self.menu_index
    }

    pub fn options_index(&self) -> usize {
        self.options_index
    }

    /// False once Quit was chosen
    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn key_down(&mut self, key: Key) {
        self.held.set(key, true);

        match self.state.phase {
            GamePhase::Menu => self.menu_key(key),
            GamePhase::Options => self.options_key(key),
            GamePhase::HighScores => {
                if key == Key::Back {
                    self.state.phase = GamePhase::Menu;
                }
            }
            GamePhase::Playing => match key {
                Key::Fire => self.pending.fire = true,
                Key::Pause => self.pending.pause = true,
                _ => {}
            },
            GamePhase::Paused => {
                if key == Key::Pause {
                    self.pending.pause = true;
                }
            }
            GamePhase::GameOver | GamePhase::Ending => {
                if key == Key::Confirm {
                    self.pending.confirm = true;
                }
            }
            GamePhase::LevelComplete => {}
        }
    }

    pub fn key_up(&mut self, key: Key) {
        self.held.set(key, false);
    }

    fn menu_key(&mut self, key: Key) {
        let count = MENU_ITEMS.len();
        match key {
            Key::Up => self.menu_index = (self.menu_index + count - 1) % count,
            Key::Down => self.menu_index = (self.menu_index + 1) % count,
            Key::Confirm => match self.menu_index {
                0 => self.start_run(),
                1 => {
                    self.options_index = 0;
                    self.state.phase = GamePhase::Options;
                }
                2 => self.state.phase = GamePhase::HighScores,
                _ => {
                    log::info!("Quit selected");
                    self.running = false;
                }
            },
            _ => {}
        }
    }

    fn options_key(&mut self, key: Key) {
        let count = OPTION_ITEMS.len();
        match key {
            Key::Up => self.options_index = (self.options_index + count - 1) % count,
            Key::Down => self.options_index = (self.options_index + 1) % count,
            Key::Left | Key::Right => {
                let steps = if key == Key::Left { -1 } else { 1 };
                if self.options_index == 0 {
                    self.settings.step_sfx(steps);
                } else {
                    self.settings.step_music(steps);
                }
                self.audio.apply_settings(&self.settings);
            }
            Key::Back => {
                if let Some(path) = &self.settings_path {
                    self.settings.save(path);
                }
                self.state.phase = GamePhase::Menu;
            }
            _ => {}
        }
    }

    fn start_run(&mut self) {
        self.pending = TickInput::default();
        self.state.start_run_at(self.start_level);
        self.dispatch_events();
    }

    /// Advance one frame of `dt` seconds
    pub fn frame(&mut self, dt: f32) {
        let mut input = std::mem::take(&mut self.pending);
        input.axis = self.held.axis();
        input.autopilot = self.autopilot;

        tick(&mut self.state, &input, dt);
        self.dispatch_events();
    }

    fn dispatch_events(&mut self) {
        for event in self.state.drain_events() {
            self.audio.handle(&event);
            if let GameEvent::NewHighScore(score) = event {
                self.scores.write_high_score(score);
            }
        }
    }

    /// Screen-space shake for this frame
    pub fn shake_offset(&mut self) -> Vec2 {
        let magnitude = self.state.shake as i32;
        if !self.settings.screen_shake || magnitude <= 0 {
            return Vec2::ZERO;
        }
        Vec2::new(
            self.fx_rng.random_range(-magnitude..=magnitude) as f32,
            self.fx_rng.random_range(-magnitude..=magnitude) as f32,
        )
    }

    pub fn render(&mut self, sink: &mut dyn RenderSink) {
        match self.state.phase {
            GamePhase::Menu => sink.screen(&Screen::Menu {
                selected: self.menu_index,
            }),
            GamePhase::Options => sink.screen(&Screen::Options {
                selected: self.options_index,
                sfx_volume: self.settings.sfx_volume,
                music_volume: self.settings.music_volume,
            }),
            GamePhase::HighScores => sink.screen(&Screen::HighScores {
                best: self.state.high_score,
            }),
            _ => {
                let offset = self.shake_offset();
                render::draw_frame(&self.state, offset, sink);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::highscores::MemoryHighScores;
    use crate::render::FrameStats;

    const DT: f32 = 1.0 / 60.0;

    fn game() -> Game {
        Game::new(42, Box::new(MemoryHighScores::new(100)), AudioManager::default())
    }

    #[test]
    fn test_starts_at_menu_with_stored_best() {
        let game = game();
        assert_eq!(game.state().phase, GamePhase::Menu);
        assert_eq!(game.state().high_score, 100);
        assert!(game.is_running());
    }

    #[test]
    fn test_menu_navigation_wraps() {
        let mut game = game();
        game.key_down(Key::Up);
        assert_eq!(game.menu_index(), 3);
        game.key_down(Key::Down);
        assert_eq!(game.menu_index(), 0);

        game.key_down(Key::Up);
        game.key_down(Key::Confirm);
        assert!(!game.is_running());
    }

    #[test]
    fn test_play_starts_run() {
        let mut game = game().with_start_level(2);
        game.key_down(Key::Confirm);
        assert_eq!(game.state().phase, GamePhase::Playing);
        assert_eq!(game.state().level, 2);
        assert!(game.state().events.is_empty());
    }

    #[test]
    fn test_options_adjust_and_back() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        let mut game = game().with_settings(Settings::default(), Some(path.clone()));

        game.key_down(Key::Down);
        game.key_down(Key::Confirm);
        assert_eq!(game.state().phase, GamePhase::Options);

        game.key_down(Key::Right);
        assert!((game.settings().sfx_volume - 0.5).abs() < 1e-6);
        game.key_down(Key::Down);
        game.key_down(Key::Left);
        assert!((game.settings().music_volume - 0.3).abs() < 1e-6);

        game.key_down(Key::Back);
        assert_eq!(game.state().phase, GamePhase::Menu);
        assert_eq!(Settings::load(&path), *game.settings());
    }

    #[test]
    fn test_high_scores_screen() {
        let mut game = game();
        game.key_down(Key::Down);
        game.key_down(Key::Down);
        game.key_down(Key::Confirm);
        assert_eq!(game.state().phase, GamePhase::HighScores);

        let mut stats = FrameStats::default();
        game.render(&mut stats);
        assert_eq!(stats.last_screen, Some(Screen::HighScores { best: 100 }));

        game.key_down(Key::Back);
        assert_eq!(game.state().phase, GamePhase::Menu);
    }

    #[test]
    fn test_pause_key_round_trip() {
        let mut game = game();
        game.key_down(Key::Confirm);
        game.frame(DT);
        game.key_down(Key::Pause);
        game.frame(DT);
        assert_eq!(game.state().phase, GamePhase::Paused);
        let frozen = game.state().level_time;
        game.frame(DT);
        assert_eq!(game.state().level_time, frozen);
        game.key_down(Key::Pause);
        game.frame(DT);
        assert_eq!(game.state().phase, GamePhase::Playing);
    }

    #[test]
    fn test_held_keys_move_player() {
        let mut game = game();
        game.key_down(Key::Confirm);
        let start = game.state().player.pos;
        game.key_down(Key::Left);
        for _ in 0..10 {
            game.frame(DT);
        }
        game.key_up(Key::Left);
        assert!(game.state().player.pos.x < start.x);
    }

    #[test]
    fn test_new_high_score_written_to_store() {
        let mut game = game();
        game.key_down(Key::Confirm);
        game.state.score = 250;
        game.state.game_over();
        game.frame(DT);
        assert_eq!(game.high_scores().read_high_score(), 250);

        game.key_down(Key::Confirm);
        game.frame(DT);
        assert_eq!(game.state().phase, GamePhase::Menu);
    }

    #[test]
    fn test_shake_offset_bounded_and_switchable() {
        let mut game = game();
        game.state.shake = 6.0;
        for _ in 0..50 {
            let offset = game.shake_offset();
            assert!(offset.x.abs() <= 6.0 && offset.y.abs() <= 6.0);
        }

        let calm = Settings {
            screen_shake: false,
            ..Settings::default()
        };
        let mut game = game.with_settings(calm, None);
        assert_eq!(game.shake_offset(), Vec2::ZERO);
    }
}
