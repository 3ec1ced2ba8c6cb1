//! Entity model: player, enemies, projectiles and effects
//!
//! Each population lives in its own `Vec` on `GameState`, so a value can only
//! ever belong to one population. Positions are centers; rectangles are
//! derived for collision and drawing.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::pattern::Pattern;
use super::rect::Rect;
use crate::clamp;
use crate::consts::*;

/// Who fired a bullet (also selects its color)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BulletOwner {
    Player,
    Enemy,
}

/// A projectile
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Bullet {
    pub pos: Vec2,
    pub vel: Vec2,
    pub owner: BulletOwner,
    pub damage: i32,
}

impl Bullet {
    /// Straight-up player shot
    pub fn player(pos: Vec2) -> Self {
        Self {
            pos,
            vel: Vec2::new(0.0, -PLAYER_BULLET_SPEED),
            owner: BulletOwner::Player,
            damage: 1,
        }
    }

    /// Enemy or boss shot with an arbitrary velocity
    pub fn enemy(pos: Vec2, vel: Vec2, damage: i32) -> Self {
        Self {
            pos,
            vel,
            owner: BulletOwner::Enemy,
            damage,
        }
    }

    pub fn rect(&self) -> Rect {
        Rect::from_center(self.pos, Vec2::new(BULLET_WIDTH, BULLET_HEIGHT))
    }

    pub fn update(&mut self, dt: f32) {
        self.pos += self.vel * dt;
    }

    /// Left the visible playfield
    pub fn is_offscreen(&self) -> bool {
        let r = self.rect();
        r.bottom() < 0.0 || r.top() > HEIGHT || r.right() < 0.0 || r.left() > WIDTH
    }
}

/// A short-lived explosion fragment
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Particle {
    pub pos: Vec2,
    pub vel: Vec2,
    pub color: [u8; 3],
    /// Seconds left to live
    pub life: f32,
}

impl Particle {
    pub fn rect(&self) -> Rect {
        Rect::from_center(self.pos, Vec2::splat(PARTICLE_SIZE))
    }

    pub fn update(&mut self, dt: f32) {
        self.life -= dt;
        self.pos += self.vel * dt;
    }

    pub fn is_alive(&self) -> bool {
        self.life > 0.0
    }
}

/// A drifting rock (level 2 hazard)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Asteroid {
    pub pos: Vec2,
    pub size: f32,
    /// Fall speed (px/s)
    pub speed: f32,
    /// Horizontal drift (px/s)
    pub drift: f32,
}

impl Asteroid {
    pub fn rect(&self) -> Rect {
        Rect::from_center(self.pos, Vec2::splat(self.size))
    }

    pub fn update(&mut self, dt: f32) {
        self.pos.y += self.speed * dt;
        self.pos.x += self.drift * dt;
    }

    pub fn is_offscreen(&self) -> bool {
        self.rect().top() > HEIGHT + OFFSCREEN_MARGIN
    }
}

/// Power-up types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PowerUpKind {
    Speed,
    Triple,
    Shield,
}

impl PowerUpKind {
    pub const ALL: [PowerUpKind; 3] = [PowerUpKind::Speed, PowerUpKind::Triple, PowerUpKind::Shield];
}

/// A falling pickup
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PowerUp {
    pub pos: Vec2,
    pub kind: PowerUpKind,
    pub speed: f32,
}

impl PowerUp {
    pub fn new(pos: Vec2, kind: PowerUpKind) -> Self {
        Self {
            pos,
            kind,
            speed: POWERUP_FALL_SPEED,
        }
    }

    pub fn rect(&self) -> Rect {
        Rect::from_center(self.pos, Vec2::splat(POWERUP_SIZE))
    }

    pub fn update(&mut self, dt: f32) {
        self.pos.y += self.speed * dt;
    }

    pub fn is_offscreen(&self) -> bool {
        self.rect().top() > HEIGHT
    }
}

/// Result of `Player::hit`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HitOutcome {
    /// Still invulnerable from a previous hit
    Ignored,
    /// Shield consumed instead of a life
    Shielded,
    /// A life was lost
    Damaged,
}

impl HitOutcome {
    pub fn took_damage(self) -> bool {
        self == HitOutcome::Damaged
    }
}

/// The player's craft
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    pub pos: Vec2,
    pub speed: f32,
    pub lives: u32,
    /// Remaining shield time (seconds)
    pub shield: f32,
    /// Remaining triple-shot time (seconds)
    pub triple_shot: f32,
    pub shoot_cooldown: f32,
    /// Remaining invulnerability after a hit (seconds)
    pub invuln: f32,
    /// Current animation frame (0 or 1)
    pub frame: u8,
    anim_timer: f32,
}

impl Default for Player {
    fn default() -> Self {
        Self {
            pos: Vec2::new(WIDTH / 2.0, HEIGHT - 60.0),
            speed: PLAYER_SPEED,
            lives: PLAYER_LIVES,
            shield: 0.0,
            triple_shot: 0.0,
            shoot_cooldown: 0.0,
            invuln: 0.0,
            frame: 0,
            anim_timer: 0.0,
        }
    }
}

impl Player {
    pub fn size() -> Vec2 {
        Vec2::new(PLAYER_WIDTH, PLAYER_HEIGHT)
    }

    pub fn rect(&self) -> Rect {
        Rect::from_center(self.pos, Self::size())
    }

    /// Move by `axis * speed * dt` (axis components in [-1, 1]) and decay timers
    pub fn update(&mut self, dt: f32, axis: Vec2) {
        let axis = axis.clamp(Vec2::NEG_ONE, Vec2::ONE);
        self.pos += axis * self.speed * dt;

        let half = Self::size() / 2.0;
        self.pos.x = clamp(self.pos.x, half.x, WIDTH - half.x);
        self.pos.y = clamp(self.pos.y, half.y, HEIGHT - half.y);

        self.shoot_cooldown = (self.shoot_cooldown - dt).max(0.0);
        self.triple_shot = (self.triple_shot - dt).max(0.0);
        self.invuln = (self.invuln - dt).max(0.0);
        self.shield = (self.shield - dt).max(0.0);

        self.anim_timer += dt;
        if self.anim_timer > ANIM_FRAME_TIME {
            self.anim_timer = 0.0;
            self.frame ^= 1;
        }
    }

    pub fn can_shoot(&self) -> bool {
        self.shoot_cooldown <= 0.0
    }

    /// Fire if the cooldown allows. Returns the new bullets (empty when gated).
    pub fn shoot(&mut self) -> Vec<Bullet> {
        if !self.can_shoot() {
            return Vec::new();
        }
        self.shoot_cooldown = SHOOT_COOLDOWN;

        let muzzle = self.pos - Vec2::new(0.0, 15.0);
        if self.triple_shot > 0.0 {
            [-TRIPLE_SHOT_SPREAD, 0.0, TRIPLE_SHOT_SPREAD]
                .iter()
                .map(|dx| Bullet::player(muzzle + Vec2::new(*dx, 0.0)))
                .collect()
        } else {
            vec![Bullet::player(muzzle)]
        }
    }

    /// Take a hit: invulnerability first, then shield, then a life
    pub fn hit(&mut self) -> HitOutcome {
        if self.invuln > 0.0 {
            return HitOutcome::Ignored;
        }
        if self.shield > 0.0 {
            self.shield = 0.0;
            self.invuln = 1.0;
            return HitOutcome::Shielded;
        }
        self.lives = self.lives.saturating_sub(1);
        self.invuln = 1.6;
        HitOutcome::Damaged
    }

    pub fn apply_powerup(&mut self, kind: PowerUpKind) {
        match kind {
            PowerUpKind::Speed => self.speed = (self.speed + 60.0).min(PLAYER_MAX_SPEED),
            PowerUpKind::Triple => self.triple_shot = 8.0,
            PowerUpKind::Shield => self.shield = 6.0,
        }
    }
}

/// Enemy types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EnemyKind {
    Basic,
    Kamikaze,
    Shielded,
}

impl EnemyKind {
    pub fn base_hp(self) -> i32 {
        match self {
            EnemyKind::Shielded => 3,
            _ => 1,
        }
    }

    pub fn score_value(self) -> u64 {
        match self {
            EnemyKind::Basic => 10,
            EnemyKind::Kamikaze | EnemyKind::Shielded => 20,
        }
    }
}

/// Kamikaze homing speed relative to base speed
const KAMIKAZE_SPEED_FACTOR: f32 = 1.05;
/// Unpatterned shielded enemies descend at this fraction of base speed
const SHIELDED_DESCENT_FACTOR: f32 = 0.6;
const SHIELDED_SWAY_SPEED: f32 = 60.0;
const SHIELDED_SWAY_PERIOD: f32 = 0.18;

/// A hostile craft
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Enemy {
    pub kind: EnemyKind,
    pub pos: Vec2,
    pub hp: i32,
    pub speed: f32,
    pub pattern: Option<Pattern>,
    /// Seconds since spawn
    pub age: f32,
    /// Phase offset for the unpatterned shielded sway
    pub sway_phase: f32,
}

impl Enemy {
    pub fn new(kind: EnemyKind, pos: Vec2, level: u32, sway_phase: f32) -> Self {
        Self {
            kind,
            pos,
            hp: kind.base_hp(),
            speed: 95.0 + level as f32 * 8.0,
            pattern: None,
            age: 0.0,
            sway_phase,
        }
    }

    pub fn with_pattern(mut self, pattern: Pattern) -> Self {
        self.pattern = Some(pattern);
        self
    }

    pub fn rect(&self) -> Rect {
        Rect::from_center(self.pos, Vec2::new(ENEMY_WIDTH, ENEMY_HEIGHT))
    }

    pub fn update(&mut self, dt: f32, player_center: Vec2) {
        self.age += dt;

        if self.kind == EnemyKind::Kamikaze {
            let to_player = player_center - self.pos;
            let dist = to_player.length().max(1.0);
            self.pos += to_player / dist * self.speed * KAMIKAZE_SPEED_FACTOR * dt;
            return;
        }

        match (self.pattern, self.kind) {
            (Some(pattern), _) => {
                self.pos = pattern.step(self.pos, self.age, self.speed, dt);
            }
            (None, EnemyKind::Shielded) => {
                self.pos.y += self.speed * SHIELDED_DESCENT_FACTOR * dt;
                let sway = (self.age / SHIELDED_SWAY_PERIOD + self.sway_phase).sin();
                self.pos.x += sway * SHIELDED_SWAY_SPEED * dt;
            }
            (None, _) => {
                self.pos.y += self.speed * dt;
            }
        }
    }

    pub fn is_dead(&self) -> bool {
        self.hp <= 0
    }

    pub fn is_offscreen(&self) -> bool {
        self.rect().top() > HEIGHT + OFFSCREEN_MARGIN
    }
}
