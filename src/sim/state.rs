//! Game state and run/level lifecycle
//!
//! Everything the simulation mutates lives here, including the seeded RNG,
//! so a run is reproducible from its seed and input sequence.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::boss::Boss;
use super::entities::{Asteroid, Bullet, Enemy, Particle, Player, PowerUp};
use crate::consts::*;

/// Top-level game state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    Menu,
    Options,
    HighScores,
    /// The only phase that runs the simulation
    Playing,
    Paused,
    /// Boss down, holding before the next level
    LevelComplete,
    GameOver,
    /// All levels cleared
    Ending,
}

/// Side effects for external collaborators, drained by the driver each frame
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameEvent {
    /// Player fired
    Fire,
    /// Enemy destroyed
    Explosion,
    /// Power-up collected
    PowerUp,
    /// Boss arrived
    BossEnter,
    /// Run ended with no lives left
    GameOver,
    /// Start looping the music track for a level
    MusicStart(u32),
    MusicStop,
    EngineStart,
    EngineStop,
    /// A new best score should be persisted
    NewHighScore(u64),
}

/// Particle colors (RGB)
pub mod palette {
    pub const ENEMY_EXPLOSION: [u8; 3] = [255, 120, 120];
    pub const BOSS_EXPLOSION: [u8; 3] = [200, 150, 255];
    pub const PLAYER_HIT: [u8; 3] = [80, 200, 255];
    pub const DEBRIS: [u8; 3] = [150, 120, 90];
}

/// Particles per burst
pub const BURST_NORMAL: usize = 20;
pub const BURST_SMALL: usize = 10;
pub const BURST_LARGE: usize = 60;

/// Complete simulation state
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameState {
    /// Run seed for reproducibility
    pub seed: u64,
    /// Seeded generator for every spawn decision
    pub rng: Pcg32,
    pub phase: GamePhase,
    pub score: u64,
    /// Best score known to the simulation (seeded from persistence)
    pub high_score: u64,
    /// Current level (1-based)
    pub level: u32,
    /// Seconds spent in the current level while playing
    pub level_time: f32,
    /// Seconds of simulation since the state was created
    pub time: f32,
    /// Screen shake magnitude (pixels), decays 10/s
    pub shake: f32,
    pub spawn_timer: f32,
    pub asteroid_timer: f32,
    /// Remaining LEVEL_COMPLETE hold (seconds)
    pub transition_timer: f32,
    /// Boss already spawned this level
    pub boss_spawned: bool,
    pub player: Player,
    pub enemies: Vec<Enemy>,
    pub player_bullets: Vec<Bullet>,
    pub enemy_bullets: Vec<Bullet>,
    pub powerups: Vec<PowerUp>,
    pub particles: Vec<Particle>,
    pub asteroids: Vec<Asteroid>,
    pub boss: Option<Boss>,
    /// Pending collaborator events
    #[serde(skip)]
    pub events: Vec<GameEvent>,
}

impl GameState {
    /// Create a state sitting at the menu
    pub fn new(seed: u64, high_score: u64) -> Self {
        Self {
            seed,
            rng: Pcg32::seed_from_u64(seed),
            phase: GamePhase::Menu,
            score: 0,
            high_score,
            level: 1,
            level_time: 0.0,
            time: 0.0,
            shake: 0.0,
            spawn_timer: 0.0,
            asteroid_timer: 0.0,
            transition_timer: 0.0,
            boss_spawned: false,
            player: Player::default(),
            enemies: Vec::new(),
            player_bullets: Vec::new(),
            enemy_bullets: Vec::new(),
            powerups: Vec::new(),
            particles: Vec::new(),
            asteroids: Vec::new(),
            boss: None,
            events: Vec::new(),
        }
    }

    pub fn emit(&mut self, event: GameEvent) {
        self.events.push(event);
    }

    /// Take all pending events
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    /// Difficulty ramp in [0, 1] over the first 45 seconds of a level
    pub fn difficulty(&self) -> f32 {
        (self.level_time / 45.0).min(1.0)
    }

    /// Start a fresh run at level 1
    pub fn start_run(&mut self) {
        self.start_run_at(1);
    }

    /// Start a fresh run at `level` (clamped to the valid range)
    pub fn start_run_at(&mut self, level: u32) {
        self.score = 0;
        self.level = level.clamp(1, MAX_LEVEL);
        self.level_time = 0.0;
        self.shake = 0.0;
        self.spawn_timer = 0.0;
        self.asteroid_timer = 0.0;
        self.transition_timer = 0.0;
        self.player = Player::default();
        self.clear_level_pools();
        self.particles.clear();
        self.player.shield = 3.0;
        self.player.triple_shot = 3.0;
        self.phase = GamePhase::Playing;

        log::info!("Run started at level {} (seed {})", self.level, self.seed);
        self.emit(GameEvent::MusicStart(self.level));
        self.emit(GameEvent::EngineStart);
    }

    /// Drop every per-level population
    pub fn clear_level_pools(&mut self) {
        self.enemies.clear();
        self.enemy_bullets.clear();
        self.player_bullets.clear();
        self.powerups.clear();
        self.asteroids.clear();
        self.boss = None;
        self.boss_spawned = false;
    }

    /// Boss defeated: hold on the level-complete screen
    pub fn complete_level(&mut self) {
        log::info!("Level {} cleared (score {})", self.level, self.score);
        self.phase = GamePhase::LevelComplete;
        self.transition_timer = LEVEL_TRANSITION_TIME;
        self.emit(GameEvent::MusicStop);
        self.emit(GameEvent::EngineStop);
    }

    /// Leave LEVEL_COMPLETE: next level or the ending
    pub fn advance_level(&mut self) {
        self.level += 1;
        if self.level > MAX_LEVEL {
            log::info!("All levels cleared, final score {}", self.score);
            self.phase = GamePhase::Ending;
            self.emit(GameEvent::MusicStop);
            self.emit(GameEvent::EngineStop);
            self.record_high_score();
            return;
        }

        self.level_time = 0.0;
        self.clear_level_pools();
        self.player.shield = self.player.shield.max(2.0);
        self.player.triple_shot = self.player.triple_shot.max(2.0);
        self.phase = GamePhase::Playing;

        log::info!("Level {} started", self.level);
        self.emit(GameEvent::MusicStart(self.level));
        self.emit(GameEvent::EngineStart);
    }

    /// Out of lives
    pub fn game_over(&mut self) {
        log::info!("Game over at level {} with score {}", self.level, self.score);
        self.phase = GamePhase::GameOver;
        self.emit(GameEvent::MusicStop);
        self.emit(GameEvent::EngineStop);
        self.emit(GameEvent::GameOver);
        self.record_high_score();
    }

    fn record_high_score(&mut self) {
        if self.score > self.high_score {
            log::info!("New high score: {}", self.score);
            self.high_score = self.score;
            self.emit(GameEvent::NewHighScore(self.score));
        }
    }

    /// Spawn a burst of `count` particles at `pos`
    pub fn explode(&mut self, pos: Vec2, color: [u8; 3], count: usize) {
        let room = MAX_PARTICLES.saturating_sub(self.particles.len());
        for _ in 0..count.min(room) {
            let vel = Vec2::new(
                self.rng.random_range(-90.0..90.0),
                self.rng.random_range(-140.0..140.0),
            );
            self.particles.push(Particle {
                pos,
                vel,
                color,
                life: PARTICLE_LIFESPAN,
            });
        }
    }

    /// Debug-build checks run after each simulated tick
    pub fn check_invariants(&self) {
        debug_assert!(
            self.enemies.iter().all(|e| e.hp > 0),
            "dead enemy survived the collision pass"
        );
        debug_assert!(
            self.boss.as_ref().is_none_or(|b| b.hp > 0),
            "dead boss survived the collision pass"
        );
        debug_assert!(
            self.particles.len() <= MAX_PARTICLES,
            "particle cap exceeded"
        );
    }
}
