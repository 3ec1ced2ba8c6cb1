//! Scene emission for rendering backends
//!
//! The simulation never draws. Each frame the driver walks the state in a
//! fixed z-order and hands every entity rectangle to a [`RenderSink`], then
//! the HUD and whichever overlay screen the current phase needs.

use glam::Vec2;

use crate::sim::{EnemyKind, GamePhase, GameState, Player, PowerUpKind, Rect};

/// Blink slot length while invulnerable (seconds)
const BLINK_SLOT: f32 = 0.12;

/// Sprite identifier handed to the sink alongside each rectangle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sprite {
    /// Full-screen scrolling backdrop for a level
    Background { level: u32 },
    Player { frame: u8 },
    Enemy(EnemyKind),
    PlayerBullet,
    EnemyBullet,
    PowerUp(PowerUpKind),
    Particle([u8; 3]),
    Asteroid,
    Boss { level: u32 },
    /// Outline around an active boss weak point
    WeakPoint,
}

/// HUD readout
#[derive(Debug, Clone, PartialEq)]
pub struct Hud {
    pub score: u64,
    pub lives: u32,
    pub level: u32,
    /// Boss health in [0, 1] while a boss is alive
    pub boss_health: Option<f32>,
}

/// Full-screen or overlay screens
#[derive(Debug, Clone, PartialEq)]
pub enum Screen {
    Menu { selected: usize },
    Options { selected: usize, sfx_volume: f32, music_volume: f32 },
    HighScores { best: u64 },
    /// Overlay on top of the frozen scene
    Paused,
    /// Overlay on top of the scene
    LevelComplete,
    GameOver { score: u64 },
    Ending { score: u64 },
}

/// Menu entries in display order
pub const MENU_ITEMS: [&str; 4] = ["Play", "Options", "High Scores", "Quit"];
/// Options rows in display order
pub const OPTION_ITEMS: [&str; 2] = ["SFX Volume", "Music Volume"];

/// Drawing backend contract
pub trait RenderSink {
    fn draw(&mut self, sprite: Sprite, rect: Rect);
    fn hud(&mut self, hud: &Hud);
    fn screen(&mut self, screen: &Screen);
}

/// Whether the player is drawn this frame
pub fn player_visible(player: &Player, time: f32) -> bool {
    if player.invuln <= 0.0 {
        return true;
    }
    ((time / BLINK_SLOT).floor() as i64) % 2 != 0
}

pub fn hud(state: &GameState) -> Hud {
    Hud {
        score: state.score,
        lives: state.player.lives,
        level: state.level,
        boss_health: state.boss.as_ref().map(|b| b.health_fraction()),
    }
}

/// Emit the play field in z-order, shifted by the shake `offset`
pub fn draw_scene(state: &GameState, offset: Vec2, sink: &mut dyn RenderSink) {
    let background = Rect::new(0.0, 0.0, crate::consts::WIDTH, crate::consts::HEIGHT);
    sink.draw(Sprite::Background { level: state.level }, background);

    if player_visible(&state.player, state.time) {
        sink.draw(
            Sprite::Player {
                frame: state.player.frame,
            },
            state.player.rect().offset(offset),
        );
    }
    for enemy in &state.enemies {
        sink.draw(Sprite::Enemy(enemy.kind), enemy.rect().offset(offset));
    }
    for bullet in &state.player_bullets {
        sink.draw(Sprite::PlayerBullet, bullet.rect().offset(offset));
    }
    for bullet in &state.enemy_bullets {
        sink.draw(Sprite::EnemyBullet, bullet.rect().offset(offset));
    }
    for powerup in &state.powerups {
        sink.draw(Sprite::PowerUp(powerup.kind), powerup.rect().offset(offset));
    }
    for particle in &state.particles {
        sink.draw(Sprite::Particle(particle.color), particle.rect().offset(offset));
    }
    for asteroid in &state.asteroids {
        sink.draw(Sprite::Asteroid, asteroid.rect().offset(offset));
    }
    if let Some(boss) = &state.boss {
        sink.draw(Sprite::Boss { level: boss.level }, boss.rect().offset(offset));
        for wp in boss.active_weak_points() {
            sink.draw(Sprite::WeakPoint, wp.offset(offset));
        }
    }

    sink.hud(&hud(state));
}

/// Emit a whole frame for an in-run phase
///
/// Menu-side screens are drawn by the driver, which owns their selection state.
pub fn draw_frame(state: &GameState, offset: Vec2, sink: &mut dyn RenderSink) {
    match state.phase {
        GamePhase::GameOver => sink.screen(&Screen::GameOver { score: state.score }),
        GamePhase::Ending => sink.screen(&Screen::Ending { score: state.score }),
        GamePhase::Playing => draw_scene(state, offset, sink),
        GamePhase::Paused => {
            draw_scene(state, offset, sink);
            sink.screen(&Screen::Paused);
        }
        GamePhase::LevelComplete => {
            draw_scene(state, offset, sink);
            sink.screen(&Screen::LevelComplete);
        }
        GamePhase::Menu | GamePhase::Options | GamePhase::HighScores => {}
    }
}

/// Sink that counts what it was given, for headless runs
#[derive(Debug, Default, Clone)]
pub struct FrameStats {
    pub sprites: usize,
    pub frames: usize,
    pub last_hud: Option<Hud>,
    pub last_screen: Option<Screen>,
}

impl RenderSink for FrameStats {
    fn draw(&mut self, sprite: Sprite, _rect: Rect) {
        if matches!(sprite, Sprite::Background { .. }) {
            self.frames += 1;
        }
        self.sprites += 1;
    }

    fn hud(&mut self, hud: &Hud) {
        self.last_hud = Some(hud.clone());
    }

    fn screen(&mut self, screen: &Screen) {
        self.last_screen = Some(screen.clone());
    }
}
