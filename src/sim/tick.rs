//! Per-frame simulation tick
//!
//! One tick per rendered frame, driven by the measured frame delta. Only the
//! PLAYING phase runs spawning, movement and collisions; PAUSED freezes every
//! timer and accumulator exactly where it was.

use glam::Vec2;

use super::collision;
use super::spawner;
use super::state::{GameEvent, GamePhase, GameState};
use crate::consts::*;

/// Shake decay (pixels per second)
const SHAKE_DECAY: f32 = 10.0;

/// Input commands for a single tick
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Held movement direction, components in [-1, 1] (y down)
    pub axis: Vec2,
    /// Fire pressed this frame
    pub fire: bool,
    /// Pause toggle
    pub pause: bool,
    /// Confirm pressed (leaves GAME_OVER / ENDING)
    pub confirm: bool,
    /// Demo mode - the autopilot flies the ship
    pub autopilot: bool,
}

/// Advance the game state by one frame
pub fn tick(state: &mut GameState, input: &TickInput, dt: f32) {
    // Handle pause toggle
    if input.pause {
        match state.phase {
            GamePhase::Playing => {
                state.phase = GamePhase::Paused;
                state.emit(GameEvent::EngineStop);
                return;
            }
            GamePhase::Paused => {
                state.phase = GamePhase::Playing;
                state.emit(GameEvent::EngineStart);
            }
            _ => {}
        }
    }

    match state.phase {
        GamePhase::Playing => {
            let input = if input.autopilot {
                autopilot_input(state)
            } else {
                input.clone()
            };
            run_playing(state, &input, dt);
        }
        GamePhase::LevelComplete => {
            state.transition_timer -= dt;
            if state.transition_timer <= 0.0 {
                state.advance_level();
            }
        }
        GamePhase::GameOver | GamePhase::Ending => {
            if input.confirm {
                state.phase = GamePhase::Menu;
            }
        }
        GamePhase::Paused | GamePhase::Menu | GamePhase::Options | GamePhase::HighScores => {
            return;
        }
    }

    state.shake = (state.shake - dt * SHAKE_DECAY).max(0.0);
}

fn run_playing(state: &mut GameState, input: &TickInput, dt: f32) {
    state.time += dt;

    if input.fire {
        let shots = state.player.shoot();
        if !shots.is_empty() {
            state.player_bullets.extend(shots);
            state.emit(GameEvent::Fire);
        }
    }
    state.player.update(dt, input.axis);

    spawner::update_waves(state, dt);

    let target = state.player.pos;
    for enemy in &mut state.enemies {
        enemy.update(dt, target);
    }
    state.enemies.retain(|e| !e.is_offscreen());
    spawner::enemy_fire(state);

    spawner::update_boss_trigger(state);
    if let Some(boss) = state.boss.as_mut() {
        boss.update(dt);
    }
    spawner::boss_fire(state, dt);
    spawner::boss_minions(state, dt);

    spawner::update_asteroids(state, dt);

    for bullet in state.player_bullets.iter_mut().chain(state.enemy_bullets.iter_mut()) {
        bullet.update(dt);
    }
    state.player_bullets.retain(|b| !b.is_offscreen());
    state.enemy_bullets.retain(|b| !b.is_offscreen());

    for powerup in &mut state.powerups {
        powerup.update(dt);
    }
    state.powerups.retain(|p| !p.is_offscreen());

    for particle in &mut state.particles {
        particle.update(dt);
    }
    state.particles.retain(|p| p.is_alive());

    for asteroid in &mut state.asteroids {
        asteroid.update(dt);
    }
    state.asteroids.retain(|a| !a.is_offscreen());

    collision::resolve(state);
    state.check_invariants();
}

/// Steer under the lowest threat and keep firing
fn autopilot_input(state: &GameState) -> TickInput {
    let player = state.player.pos;

    let target_x = state
        .boss
        .as_ref()
        .map(|b| b.pos.x)
        .or_else(|| {
            state
                .enemies
                .iter()
                .filter(|e| e.pos.y > 0.0 && e.pos.y < player.y)
                .max_by(|a, b| a.pos.y.total_cmp(&b.pos.y))
                .map(|e| e.pos.x)
        })
        .unwrap_or(WIDTH / 2.0);

    let dx = target_x - player.x;
    let axis_x = if dx.abs() > 8.0 { dx.signum() } else { 0.0 };
    let axis_y = if player.y < HEIGHT - 60.0 { 1.0 } else { 0.0 };

    TickInput {
        axis: Vec2::new(axis_x, axis_y),
        fire: true,
        ..Default::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::boss::Boss;

    const DT: f32 = 1.0 / FPS as f32;

    fn playing_state() -> GameState {
        let mut state = GameState::new(12345, 0);
        state.start_run();
        state.drain_events();
        state
    }

    #[test]
    fn test_menu_does_not_simulate() {
        let mut state = GameState::new(1, 0);
        tick(&mut state, &TickInput::default(), DT);
        assert_eq!(state.phase, GamePhase::Menu);
        assert_eq!(state.level_time, 0.0);
    }

    #[test]
    fn test_pause_freezes_accumulators() {
        let mut state = playing_state();
        for _ in 0..30 {
            tick(&mut state, &TickInput::default(), DT);
        }
        let level_time = state.level_time;
        let spawn_timer = state.spawn_timer;
        let player = state.player.clone();

        let pause = TickInput {
            pause: true,
            ..Default::default()
        };
        tick(&mut state, &pause, DT);
        assert_eq!(state.phase, GamePhase::Paused);
        assert_eq!(state.drain_events(), vec![GameEvent::EngineStop]);

        for _ in 0..100 {
            tick(&mut state, &TickInput::default(), DT);
        }
        assert_eq!(state.level_time, level_time);
        assert_eq!(state.spawn_timer, spawn_timer);
        assert_eq!(state.player.shield, player.shield);

        // Unpausing resumes in the same frame
        tick(&mut state, &pause, DT);
        assert_eq!(state.phase, GamePhase::Playing);
        assert!(state.level_time > level_time);
        assert!(state.drain_events().contains(&GameEvent::EngineStart));
    }

    #[test]
    fn test_fire_emits_cue() {
        let mut state = playing_state();
        let fire = TickInput {
            fire: true,
            ..Default::default()
        };
        tick(&mut state, &fire, DT);
        // Grace triple shot from the run start
        assert_eq!(state.player_bullets.len(), 3);
        assert!(state.drain_events().contains(&GameEvent::Fire));

        // Cooldown gates the next press
        tick(&mut state, &fire, DT);
        assert_eq!(state.player_bullets.len(), 3);
    }

    #[test]
    fn test_boss_arrives_after_level_duration() {
        let mut state = playing_state();
        state.level_time = LEVEL_DURATION - DT / 2.0;
        tick(&mut state, &TickInput::default(), DT);
        assert!(state.boss.is_some());
        assert!(state.drain_events().contains(&GameEvent::BossEnter));
    }

    #[test]
    fn test_level_complete_holds_then_advances() {
        let mut state = playing_state();
        state.complete_level();
        let mut ticks = 0;
        while state.phase == GamePhase::LevelComplete {
            tick(&mut state, &TickInput::default(), DT);
            ticks += 1;
            assert!(ticks < 1000);
        }
        // 2.2 seconds at 60 Hz
        assert!((131..=134).contains(&ticks), "held for {ticks} ticks");
        assert_eq!(state.phase, GamePhase::Playing);
        assert_eq!(state.level, 2);
        assert_eq!(state.level_time, 0.0);
    }

    #[test]
    fn test_game_over_waits_for_confirm() {
        let mut state = playing_state();
        state.game_over();
        for _ in 0..10 {
            tick(&mut state, &TickInput::default(), DT);
        }
        assert_eq!(state.phase, GamePhase::GameOver);

        let confirm = TickInput {
            confirm: true,
            ..Default::default()
        };
        tick(&mut state, &confirm, DT);
        assert_eq!(state.phase, GamePhase::Menu);
    }

    #[test]
    fn test_shake_decays_to_zero() {
        let mut state = playing_state();
        state.shake = 10.0;
        tick(&mut state, &TickInput::default(), 0.5);
        assert!((state.shake - 5.0).abs() < 1e-4);
        tick(&mut state, &TickInput::default(), 1.0);
        assert_eq!(state.shake, 0.0);
    }

    #[test]
    fn test_boss_kill_through_tick() {
        let mut state = playing_state();
        let mut boss = Boss::new(1);
        boss.entering = false;
        boss.hp = 1;
        boss.pos = Vec2::new(state.player.pos.x, 200.0);
        state.boss = Some(boss);
        state.boss_spawned = true;

        let fire = TickInput {
            fire: true,
            ..Default::default()
        };
        for _ in 0..120 {
            tick(&mut state, &fire, DT);
            if state.phase != GamePhase::Playing {
                break;
            }
        }
        assert_eq!(state.phase, GamePhase::LevelComplete);
        assert!(state.boss.is_none());
    }

    #[test]
    fn test_determinism() {
        // Two states with same seed should produce identical results
        let mut state1 = playing_state();
        let mut state2 = playing_state();

        let input = TickInput {
            autopilot: true,
            ..Default::default()
        };
        for _ in 0..1200 {
            tick(&mut state1, &input, DT);
            tick(&mut state2, &input, DT);
        }

        assert_eq!(state1.score, state2.score);
        assert_eq!(state1.enemies.len(), state2.enemies.len());
        assert_eq!(state1.player.pos, state2.player.pos);
        assert_eq!(state1.player.lives, state2.player.lives);
    }

    #[test]
    fn test_autopilot_scores() {
        let mut state = playing_state();
        let input = TickInput {
            autopilot: true,
            ..Default::default()
        };
        for _ in 0..(FPS * 30) {
            tick(&mut state, &input, DT);
            if state.phase != GamePhase::Playing {
                break;
            }
        }
        assert!(state.score > 0);
    }
}
