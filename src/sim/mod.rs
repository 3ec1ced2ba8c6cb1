//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must stay free of rendering,
//! audio and platform dependencies:
//! - Seeded RNG only
//! - Stable iteration order (insertion order of each population)
//! - Side effects leave as [`GameEvent`]s for the driver to dispatch

pub mod boss;
pub mod collision;
pub mod entities;
pub mod pattern;
pub mod rect;
pub mod spawner;
pub mod state;
pub mod tick;

pub use boss::{Boss, BossPhase};
pub use entities::{
    Asteroid, Bullet, BulletOwner, Enemy, EnemyKind, HitOutcome, Particle, Player, PowerUp,
    PowerUpKind,
};
pub use pattern::{Heading, Pattern};
pub use rect::Rect;
pub use spawner::Formation;
pub use state::{GameEvent, GamePhase, GameState};
pub use tick::{TickInput, tick};
