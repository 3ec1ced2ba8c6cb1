//! Galaxy Fury - a vertically scrolling arcade shoot-'em-up
//!
//! Core modules:
//! - `sim`: Frame-stepped simulation (entities, patterns, spawning, collisions, game state)
//! - `render`: Rendering sink contract and fixed z-order scene emission
//! - `audio`: Audio sink contract and event-to-cue mapping
//! - `persistence`: File helpers shared by high scores and settings
//! - `game`: Front-end driver (menus, options, wiring sim events to collaborators)

pub mod audio;
pub mod game;
pub mod highscores;
pub mod persistence;
pub mod render;
pub mod settings;
pub mod sim;

pub use game::{Game, Key};
pub use highscores::{FileHighScores, HighScoreStore, MemoryHighScores};
pub use settings::Settings;

/// Game configuration constants
pub mod consts {
    pub const TITLE: &str = "Galaxy Fury";

    /// Screen dimensions in pixels
    pub const WIDTH: f32 = 800.0;
    pub const HEIGHT: f32 = 600.0;
    /// Target frame rate; one simulation tick per rendered frame
    pub const FPS: u32 = 60;

    /// Seconds of wave spawning before the boss arrives
    pub const LEVEL_DURATION: f32 = 150.0;
    /// Last level; clearing it ends the game
    pub const MAX_LEVEL: u32 = 3;
    /// LEVEL_COMPLETE hold time (seconds)
    pub const LEVEL_TRANSITION_TIME: f32 = 2.2;

    /// Player defaults
    pub const PLAYER_WIDTH: f32 = 36.0;
    pub const PLAYER_HEIGHT: f32 = 28.0;
    pub const PLAYER_SPEED: f32 = 300.0;
    pub const PLAYER_MAX_SPEED: f32 = 400.0;
    pub const PLAYER_LIVES: u32 = 3;
    pub const SHOOT_COOLDOWN: f32 = 0.14;
    pub const ANIM_FRAME_TIME: f32 = 0.12;

    /// Bullets
    pub const BULLET_WIDTH: f32 = 4.0;
    pub const BULLET_HEIGHT: f32 = 12.0;
    pub const PLAYER_BULLET_SPEED: f32 = 520.0;
    pub const TRIPLE_SHOT_SPREAD: f32 = 14.0;

    /// Enemies
    pub const ENEMY_WIDTH: f32 = 32.0;
    pub const ENEMY_HEIGHT: f32 = 28.0;

    /// Boss
    pub const BOSS_WIDTH: f32 = 180.0;
    pub const BOSS_HEIGHT: f32 = 110.0;
    /// Top edge the boss descends to before swaying
    pub const BOSS_ENTRY_TOP: f32 = 40.0;

    /// Power-ups
    pub const POWERUP_SIZE: f32 = 20.0;
    pub const POWERUP_FALL_SPEED: f32 = 160.0;
    pub const POWERUP_DROP_CHANCE: f32 = 0.22;

    /// Particles
    pub const PARTICLE_SIZE: f32 = 3.0;
    pub const PARTICLE_LIFESPAN: f32 = 0.6;
    pub const MAX_PARTICLES: usize = 512;

    /// Entities below `HEIGHT + OFFSCREEN_MARGIN` are culled
    pub const OFFSCREEN_MARGIN: f32 = 40.0;
}

/// Clamp that tolerates an inverted range by preferring the lower bound
#[inline]
pub fn clamp(value: f32, min: f32, max: f32) -> f32 {
    value.min(max).max(min)
}
