//! Collision detection and damage resolution
//!
//! Runs once per PLAYING tick in a fixed order. Each step first collects what
//! it hit (marks, kills, pickups) while only reading positions, then applies
//! removals and side effects once the pass is done. That keeps every
//! destruction exactly-once and no population is mutated mid-iteration.

use glam::Vec2;

use super::entities::PowerUpKind;
use super::rect::Rect;
use super::spawner::maybe_drop_powerup;
use super::state::{
    BURST_LARGE, BURST_NORMAL, BURST_SMALL, GameEvent, GamePhase, GameState, palette,
};

/// Points for downing a boss
pub const BOSS_SCORE: u64 = 200;
/// Points for collecting a power-up
pub const POWERUP_SCORE: u64 = 50;
/// Shake (pixels) when a bullet hits the boss
const BOSS_HIT_SHAKE: f32 = 6.0;
/// Shake (pixels) when the player is hit
const PLAYER_HIT_SHAKE: f32 = 10.0;

/// Resolve all collisions for this tick
///
/// Stops at the first step that leaves PLAYING (boss down or last life
/// lost), so nothing scores after the run's outcome is decided.
pub fn resolve(state: &mut GameState) {
    let steps: [fn(&mut GameState); 7] = [
        bullets_vs_enemies,
        bullets_vs_boss,
        player_vs_enemy_bullets,
        player_vs_enemies,
        player_vs_asteroids,
        bullets_vs_asteroids,
        player_vs_powerups,
    ];
    for step in steps {
        step(state);
        if state.phase != GamePhase::Playing {
            return;
        }
    }
}

/// Drop every item whose mark is set
fn remove_marked<T>(items: &mut Vec<T>, marked: &[bool]) {
    let mut idx = 0;
    items.retain(|_| {
        let keep = !marked[idx];
        idx += 1;
        keep
    });
}

/// Remove everything in `items` overlapping `target`; true if anything was removed
fn remove_overlapping<T>(items: &mut Vec<T>, target: &Rect, rect_of: impl Fn(&T) -> Rect) -> bool {
    let before = items.len();
    items.retain(|item| !target.intersects(&rect_of(item)));
    items.len() != before
}

fn bullets_vs_enemies(state: &mut GameState) {
    let mut spent = vec![false; state.player_bullets.len()];
    let mut kills: Vec<(Vec2, u64)> = Vec::new();

    for (bullet, used) in state.player_bullets.iter().zip(spent.iter_mut()) {
        let bullet_rect = bullet.rect();
        for enemy in state.enemies.iter_mut().filter(|e| !e.is_dead()) {
            if !bullet_rect.intersects(&enemy.rect()) {
                continue;
            }
            enemy.hp -= bullet.damage;
            *used = true;
            if enemy.is_dead() {
                kills.push((enemy.pos, enemy.kind.score_value()));
            }
        }
    }

    remove_marked(&mut state.player_bullets, &spent);
    state.enemies.retain(|e| !e.is_dead());

    for (pos, value) in kills {
        state.score += value;
        maybe_drop_powerup(state, pos);
        state.explode(pos, palette::ENEMY_EXPLOSION, BURST_NORMAL);
        state.emit(GameEvent::Explosion);
    }
}

fn bullets_vs_boss(state: &mut GameState) {
    let Some(boss) = state.boss.as_mut() else {
        return;
    };

    let mut spent = vec![false; state.player_bullets.len()];
    let mut hit = false;
    for (bullet, used) in state.player_bullets.iter().zip(spent.iter_mut()) {
        if boss.is_dead() {
            break;
        }
        let bullet_rect = bullet.rect();
        if !boss.rect().intersects(&bullet_rect) {
            continue;
        }
        // Weak points are only reported on level 3 in phase two
        let weak_hit = boss
            .active_weak_points()
            .iter()
            .any(|wp| wp.intersects(&bullet_rect));
        let damage = if weak_hit {
            bullet.damage * 2
        } else {
            bullet.damage
        };
        boss.take_damage(damage);
        *used = true;
        hit = true;
    }

    let defeated = boss.is_dead();
    let center = boss.pos;
    remove_marked(&mut state.player_bullets, &spent);
    if hit {
        state.shake = BOSS_HIT_SHAKE;
    }
    if defeated {
        state.score += BOSS_SCORE;
        state.explode(center, palette::BOSS_EXPLOSION, BURST_LARGE);
        state.emit(GameEvent::Explosion);
        state.boss = None;
        state.complete_level();
    }
}

fn player_vs_enemy_bullets(state: &mut GameState) {
    let player = state.player.rect();
    if remove_overlapping(&mut state.enemy_bullets, &player, |b| b.rect()) {
        on_player_hit(state);
    }
}

fn player_vs_enemies(state: &mut GameState) {
    let player = state.player.rect();
    if remove_overlapping(&mut state.enemies, &player, |e| e.rect()) {
        on_player_hit(state);
    }
}

fn player_vs_asteroids(state: &mut GameState) {
    let player = state.player.rect();
    if remove_overlapping(&mut state.asteroids, &player, |a| a.rect()) {
        on_player_hit(state);
    }
}

fn bullets_vs_asteroids(state: &mut GameState) {
    let mut spent = vec![false; state.player_bullets.len()];
    let mut smashed = vec![false; state.asteroids.len()];
    let mut debris: Vec<Vec2> = Vec::new();

    for (bullet, used) in state.player_bullets.iter().zip(spent.iter_mut()) {
        let bullet_rect = bullet.rect();
        for (asteroid, gone) in state.asteroids.iter().zip(smashed.iter_mut()) {
            if !*gone && bullet_rect.intersects(&asteroid.rect()) {
                *gone = true;
                *used = true;
            }
        }
        if *used {
            debris.push(bullet.pos);
        }
    }

    remove_marked(&mut state.player_bullets, &spent);
    remove_marked(&mut state.asteroids, &smashed);
    for pos in debris {
        state.explode(pos, palette::DEBRIS, BURST_SMALL);
    }
}

fn player_vs_powerups(state: &mut GameState) {
    let player = state.player.rect();
    let collected: Vec<PowerUpKind> = state
        .powerups
        .iter()
        .filter(|p| player.intersects(&p.rect()))
        .map(|p| p.kind)
        .collect();
    if collected.is_empty() {
        return;
    }
    state.powerups.retain(|p| !player.intersects(&p.rect()));

    for kind in collected {
        state.score += POWERUP_SCORE;
        state.emit(GameEvent::PowerUp);
        state.player.apply_powerup(kind);
    }
}

/// The player was touched by something hostile
pub fn on_player_hit(state: &mut GameState) {
    let outcome = state.player.hit();
    state.shake = PLAYER_HIT_SHAKE;
    let pos = state.player.pos;
    state.explode(pos, palette::PLAYER_HIT, BURST_NORMAL);
    if outcome.took_damage() && state.player.lives == 0 {
        state.game_over();
    }
}
