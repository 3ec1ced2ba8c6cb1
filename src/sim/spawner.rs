//! Wave, formation, boss, asteroid and power-up emission
//!
//! All randomness comes from `GameState::rng`, so the same seed and input
//! sequence always produce the same waves.

use std::f32::consts::{PI, TAU};

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::boss::Boss;
use super::entities::{Asteroid, Bullet, Enemy, EnemyKind, PowerUp, PowerUpKind};
use super::pattern::{Heading, Pattern};
use super::state::{GameEvent, GameState};
use crate::consts::*;

/// Chance a wave is a formation rather than a flat batch
const FORMATION_CHANCE: f32 = 0.55;
/// Seconds between asteroids on level 2
const ASTEROID_INTERVAL: f32 = 0.9;
const ENEMY_BULLET_DAMAGE: i32 = 1;
const BOSS_BULLET_DAMAGE: i32 = 2;
const BOSS_AIMED_SPEED: f32 = 220.0;

/// Enemies per wave or formation
pub fn wave_size(level: u32) -> usize {
    4 + level as usize * 2
}

/// Seconds between waves
pub fn spawn_interval(level: u32, difficulty: f32) -> f32 {
    (2.6 - difficulty * 0.8 - (level as f32 - 1.0) * 0.2).max(1.6)
}

/// Waves stop spawning at this many live enemies
pub fn max_live_enemies(level: u32) -> usize {
    16 + level as usize * 4
}

/// Enemy fire is suppressed once more bullets than this are in flight
pub fn enemy_bullet_cap(level: u32) -> usize {
    12 + level as usize * 6
}

/// Per-enemy, per-tick chance of firing
pub fn enemy_fire_chance(level: u32, difficulty: f32) -> f32 {
    0.003 + difficulty * 0.004 + level as f32 * 0.0015
}

/// Basic/kamikaze/shielded weights for flat batches
pub fn enemy_kind_weights(level_time: f32) -> [f32; 3] {
    if level_time < 18.0 {
        [0.78, 0.18, 0.04]
    } else if level_time < 45.0 {
        [0.65, 0.22, 0.13]
    } else {
        [0.55, 0.25, 0.20]
    }
}

/// Weighted pick of an enemy type for a flat batch
pub fn roll_enemy_kind<R: Rng>(rng: &mut R, level_time: f32) -> EnemyKind {
    let [basic, kamikaze, _] = enemy_kind_weights(level_time);
    let roll: f32 = rng.random();
    if roll < basic {
        EnemyKind::Basic
    } else if roll < basic + kamikaze {
        EnemyKind::Kamikaze
    } else {
        EnemyKind::Shielded
    }
}

/// Pre-shaped enemy layouts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Formation {
    Line,
    Zig,
    V,
    Arc,
    Stagger,
    Escort,
}

impl Formation {
    pub const ALL: [Formation; 6] = [
        Formation::Line,
        Formation::Zig,
        Formation::V,
        Formation::Arc,
        Formation::Stagger,
        Formation::Escort,
    ];
}

fn make_enemy(state: &mut GameState, kind: EnemyKind, pos: Vec2) -> Enemy {
    let sway_phase = state.rng.random_range(0.0..TAU);
    Enemy::new(kind, pos, state.level, sway_phase)
}

fn random_px<R: Rng>(rng: &mut R, min: i32, max: i32) -> f32 {
    rng.random_range(min..=max) as f32
}

/// Advance the wave timer and spawn a wave when due
pub fn update_waves(state: &mut GameState, dt: f32) {
    state.spawn_timer += dt;
    state.level_time += dt;

    if state.level_time >= LEVEL_DURATION {
        return;
    }
    let interval = spawn_interval(state.level, state.difficulty());
    if state.spawn_timer > interval && state.enemies.len() < max_live_enemies(state.level) {
        state.spawn_timer = 0.0;
        spawn_wave(state);
    }
}

/// Spawn either a random formation or a flat weighted batch
pub fn spawn_wave(state: &mut GameState) {
    if state.rng.random::<f32>() < FORMATION_CHANCE {
        let formation = Formation::ALL[state.rng.random_range(0..Formation::ALL.len())];
        spawn_formation(state, formation);
        return;
    }

    let count = wave_size(state.level);
    log::debug!("Flat batch of {} at level {} ({:.1}s)", count, state.level, state.level_time);
    for _ in 0..count {
        let kind = roll_enemy_kind(&mut state.rng, state.level_time);
        let x = random_px(&mut state.rng, 40, WIDTH as i32 - 40);
        let y = random_px(&mut state.rng, -200, -40);
        let enemy = make_enemy(state, kind, Vec2::new(x, y));
        state.enemies.push(enemy);
    }
}

/// Spawn a named formation above the screen
pub fn spawn_formation(state: &mut GameState, formation: Formation) {
    let count = wave_size(state.level);
    log::debug!("Formation {:?} of {} at level {}", formation, count, state.level);

    match formation {
        Formation::Line => {
            for i in 0..count {
                let x = 60.0 + ((i * 60) % (WIDTH as usize - 120)) as f32;
                let y = random_px(&mut state.rng, -220, -60);
                let enemy = make_enemy(state, EnemyKind::Basic, Vec2::new(x, y));
                state.enemies.push(enemy.with_pattern(Pattern::Line));
            }
        }
        Formation::Zig => {
            for i in 0..count {
                let x = 80.0 + (i % 2) as f32 * (WIDTH - 160.0);
                let y = -60.0 - i as f32 * 40.0;
                let kind = if i % 3 == 0 {
                    EnemyKind::Kamikaze
                } else {
                    EnemyKind::Basic
                };
                let enemy = make_enemy(state, kind, Vec2::new(x, y));
                state
                    .enemies
                    .push(enemy.with_pattern(Pattern::zig(x, i as f32 * 0.6)));
            }
        }
        Formation::V => {
            let mid = (count / 2) as i32;
            for i in 0..count as i32 {
                let x = WIDTH / 2.0 + (i - mid) as f32 * 40.0;
                let y = -60.0 - (i - mid).abs() as f32 * 20.0;
                let heading = if i < mid { Heading::Left } else { Heading::Right };
                let enemy = make_enemy(state, EnemyKind::Basic, Vec2::new(x, y));
                state.enemies.push(enemy.with_pattern(Pattern::v(heading, 90.0)));
            }
        }
        Formation::Arc => {
            for i in 0..count {
                let t = i as f32 / (count.max(2) - 1) as f32;
                let x = WIDTH * 0.15 + t * WIDTH * 0.7 + (t * PI).sin() * 120.0;
                let y = -80.0 - (t * PI).cos() * 50.0;
                let kind = if i % 2 == 0 {
                    EnemyKind::Basic
                } else {
                    EnemyKind::Shielded
                };
                let enemy = make_enemy(state, kind, Vec2::new(x, y));
                state
                    .enemies
                    .push(enemy.with_pattern(Pattern::arc(x, t * 1.6)));
            }
        }
        Formation::Stagger => {
            for i in 0..count {
                let x = random_px(&mut state.rng, 80, WIDTH as i32 - 80);
                let y = -80.0 - i as f32 * 45.0;
                let kind = if i % 2 == 0 {
                    EnemyKind::Kamikaze
                } else {
                    EnemyKind::Basic
                };
                let enemy = make_enemy(state, kind, Vec2::new(x, y));
                state
                    .enemies
                    .push(enemy.with_pattern(Pattern::stagger(i as f32 * 0.15)));
            }
        }
        Formation::Escort => {
            let x = random_px(&mut state.rng, 180, WIDTH as i32 - 180);
            let y = random_px(&mut state.rng, -200, -80);
            let phase = state.rng.random_range(0.0..2.0);
            let lead = make_enemy(state, EnemyKind::Shielded, Vec2::new(x, y));
            state
                .enemies
                .push(lead.with_pattern(Pattern::EscortLead { start_x: x, phase }));

            // Wings alternate left/right; the first pair flies 40px ahead of
            // the lead, each further pair 45px behind the previous one
            for k in 0..count.saturating_sub(1) {
                let offset = if k % 2 == 0 { -70.0 } else { 70.0 };
                let row = (k / 2) as f32;
                let phase = state.rng.random_range(0.0..2.0);
                let wing_y = y + 40.0 - row * 45.0;
                let wing = make_enemy(state, EnemyKind::Basic, Vec2::new(x + offset, wing_y));
                state.enemies.push(wing.with_pattern(Pattern::EscortWing {
                    start_x: x,
                    offset,
                    phase,
                }));
            }
        }
    }
}

/// Spawn the level boss once the level timer runs out
pub fn update_boss_trigger(state: &mut GameState) {
    if state.level_time >= LEVEL_DURATION && state.boss.is_none() && !state.boss_spawned {
        spawn_boss(state);
    }
}

pub fn spawn_boss(state: &mut GameState) {
    let boss = Boss::new(state.level);
    log::info!("Boss arriving on level {} with {} hp", state.level, boss.hp);
    state.boss = Some(boss);
    state.boss_spawned = true;
    state.emit(GameEvent::BossEnter);
}

/// Level 2 hazard: one asteroid every 0.9s until the boss shows up
pub fn update_asteroids(state: &mut GameState, dt: f32) {
    if state.level != 2 || state.boss.is_some() {
        return;
    }
    state.asteroid_timer += dt;
    if state.asteroid_timer > ASTEROID_INTERVAL {
        state.asteroid_timer = 0.0;
        spawn_asteroid(state);
    }
}

pub fn spawn_asteroid(state: &mut GameState) {
    let rng = &mut state.rng;
    let size = random_px(rng, 20, 40);
    let x = random_px(rng, 40, WIDTH as i32 - 40);
    let y = random_px(rng, -120, -40);
    let speed = random_px(rng, 90, 150);
    let drift = random_px(rng, -40, 40);
    state.asteroids.push(Asteroid {
        pos: Vec2::new(x, y),
        size,
        speed,
        drift,
    });
}

/// 22% chance of dropping a uniformly chosen power-up at `pos`
pub fn maybe_drop_powerup(state: &mut GameState, pos: Vec2) {
    if state.rng.random::<f32>() < POWERUP_DROP_CHANCE {
        let kind = PowerUpKind::ALL[state.rng.random_range(0..PowerUpKind::ALL.len())];
        state.powerups.push(PowerUp::new(pos, kind));
    }
}

/// Roll every live enemy's fire chance for this tick
pub fn enemy_fire(state: &mut GameState) {
    let muzzles: Vec<Vec2> = state
        .enemies
        .iter()
        .map(|e| {
            let r = e.rect();
            Vec2::new(r.center().x, r.bottom() + 6.0)
        })
        .collect();

    let speed = 190.0 + state.level as f32 * 18.0;
    for muzzle in muzzles {
        if state.enemy_bullets.len() > enemy_bullet_cap(state.level) {
            return;
        }
        let chance = enemy_fire_chance(state.level, state.difficulty());
        if state.rng.random::<f32>() < chance {
            state.enemy_bullets.push(Bullet::enemy(
                muzzle,
                Vec2::new(0.0, speed),
                ENEMY_BULLET_DAMAGE,
            ));
        }
    }
}

/// Boss volley: aimed on level 1, straight down afterwards
pub fn boss_fire(state: &mut GameState, dt: f32) {
    let Some(boss) = state.boss.as_mut() else {
        return;
    };
    if !boss.should_fire(dt) {
        return;
    }

    let r = boss.rect();
    let muzzle_y = r.bottom() + 10.0;
    if state.level == 1 {
        let target = state.player.pos;
        for offset in [-30.0, 0.0, 30.0] {
            let origin = Vec2::new(r.center().x + offset, muzzle_y);
            let to_player = target - origin;
            let dir = to_player / to_player.length().max(1.0);
            state
                .enemy_bullets
                .push(Bullet::enemy(origin, dir * BOSS_AIMED_SPEED, BOSS_BULLET_DAMAGE));
        }
    } else {
        let speed = 220.0 + state.level as f32 * 24.0;
        for offset in [-40.0, 0.0, 40.0] {
            let origin = Vec2::new(r.center().x + offset, muzzle_y);
            state
                .enemy_bullets
                .push(Bullet::enemy(origin, Vec2::new(0.0, speed), BOSS_BULLET_DAMAGE));
        }
    }
}

/// Level 2 boss calls in two escorts at each minion trigger
pub fn boss_minions(state: &mut GameState, dt: f32) {
    if state.level != 2 {
        return;
    }
    let Some(boss) = state.boss.as_mut() else {
        return;
    };
    if !boss.should_spawn_minion(dt) {
        return;
    }

    let r = boss.rect();
    for _ in 0..2 {
        let x = r.center().x + random_px(&mut state.rng, -60, 60);
        let y = r.bottom() + random_px(&mut state.rng, 10, 40);
        let minion = make_enemy(state, EnemyKind::Basic, Vec2::new(x, y));
        state.enemies.push(minion);
    }
}
