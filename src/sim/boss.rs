//! Level boss: entry, sway, phase machine and periodic triggers

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::rect::Rect;
use crate::consts::*;

/// Fire interval (seconds) per phase
const FIRE_INTERVAL_PHASE_1: f32 = 0.6;
const FIRE_INTERVAL_PHASE_2: f32 = 0.4;
/// Minion interval (seconds) per phase
const MINION_INTERVAL_PHASE_1: f32 = 3.0;
const MINION_INTERVAL_PHASE_2: f32 = 2.0;
/// Sway period divisor (seconds)
const SWAY_PERIOD: f32 = 0.6;

/// Boss difficulty tier
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum BossPhase {
    One,
    Two,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Boss {
    pub level: u32,
    pub pos: Vec2,
    pub hp: i32,
    pub max_hp: i32,
    pub speed: f32,
    /// Still descending onto the playfield
    pub entering: bool,
    pub phase: BossPhase,
    /// Seconds since the boss finished entering
    pub age: f32,
    fire_timer: f32,
    minion_timer: f32,
    /// Weak points relative to the boss's top-left corner (level 3 only)
    weak_points: Vec<Rect>,
}

impl Boss {
    pub fn new(level: u32) -> Self {
        let hp = 200 + (level as i32 - 1) * 120;
        let weak_points = if level == 3 {
            let (w, h) = (BOSS_WIDTH, BOSS_HEIGHT);
            let (wp_w, wp_h) = (w * 0.12, h * 0.18);
            vec![
                Rect::new(w * 0.28, h * 0.28, wp_w, wp_h),
                Rect::new(w * 0.60, h * 0.28, wp_w, wp_h),
            ]
        } else {
            Vec::new()
        };

        Self {
            level,
            pos: Vec2::new(WIDTH / 2.0, -120.0),
            hp,
            max_hp: hp,
            speed: 70.0 + level as f32 * 20.0,
            entering: true,
            phase: BossPhase::One,
            age: 0.0,
            fire_timer: 0.0,
            minion_timer: 0.0,
            weak_points,
        }
    }

    pub fn size() -> Vec2 {
        Vec2::new(BOSS_WIDTH, BOSS_HEIGHT)
    }

    pub fn rect(&self) -> Rect {
        Rect::from_center(self.pos, Self::size())
    }

    /// Weak points in screen space. Only active on level 3 in phase two.
    pub fn active_weak_points(&self) -> Vec<Rect> {
        if self.level != 3 || self.phase != BossPhase::Two {
            return Vec::new();
        }
        let origin = self.rect();
        self.weak_points
            .iter()
            .map(|wp| wp.offset(Vec2::new(origin.x, origin.y)))
            .collect()
    }

    pub fn update(&mut self, dt: f32) {
        if self.entering {
            self.pos.y += self.speed * dt;
            if self.rect().top() >= BOSS_ENTRY_TOP {
                self.entering = false;
            }
            return;
        }

        self.age += dt;
        self.pos.x += (self.age / SWAY_PERIOD).sin() * self.speed * dt;
        self.update_phase();
    }

    /// Apply damage; hp never increases
    pub fn take_damage(&mut self, damage: i32) {
        debug_assert!(damage >= 0, "negative damage would heal the boss");
        self.hp -= damage.max(0);
        self.update_phase();
    }

    fn update_phase(&mut self) {
        if (self.hp as f32) < self.max_hp as f32 * 0.5 {
            self.phase = BossPhase::Two;
        }
    }

    pub fn is_dead(&self) -> bool {
        self.hp <= 0
    }

    pub fn health_fraction(&self) -> f32 {
        (self.hp.max(0) as f32 / self.max_hp as f32).clamp(0.0, 1.0)
    }

    fn fire_interval(&self) -> f32 {
        match self.phase {
            BossPhase::One => FIRE_INTERVAL_PHASE_1,
            BossPhase::Two => FIRE_INTERVAL_PHASE_2,
        }
    }

    fn minion_interval(&self) -> f32 {
        match self.phase {
            BossPhase::One => MINION_INTERVAL_PHASE_1,
            BossPhase::Two => MINION_INTERVAL_PHASE_2,
        }
    }

    /// Accumulate `dt`; true once per elapsed fire interval
    pub fn should_fire(&mut self, dt: f32) -> bool {
        self.fire_timer += dt;
        if self.fire_timer >= self.fire_interval() {
            self.fire_timer = 0.0;
            return true;
        }
        false
    }

    /// Accumulate `dt`; true once per elapsed minion interval
    pub fn should_spawn_minion(&mut self, dt: f32) -> bool {
        self.minion_timer += dt;
        if self.minion_timer >= self.minion_interval() {
            self.minion_timer = 0.0;
            return true;
        }
        false
    }
}
