//! Named enemy flight patterns
//!
//! A pattern is picked when an enemy spawns and carries exactly the
//! parameters its trajectory needs. Stepping a pattern is a pure function of
//! (pattern, position, age, speed, dt).

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Default sway for the arc formation
pub const ARC_AMPLITUDE: f32 = 100.0;
pub const ARC_FREQUENCY: f32 = 1.1;
/// Default sway for the zig formation
pub const ZIG_AMPLITUDE: f32 = 140.0;
pub const ZIG_FREQUENCY: f32 = 2.2;

const ESCORT_LEAD_AMPLITUDE: f32 = 20.0;
const ESCORT_LEAD_FREQUENCY: f32 = 1.2;
const ESCORT_WING_AMPLITUDE: f32 = 15.0;
const ESCORT_WING_FREQUENCY: f32 = 1.5;

/// Descent multiplier for staggered enemies still waiting on their delay
const STAGGER_SLOW_FACTOR: f32 = 0.3;

/// Horizontal heading of a V-formation member
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Heading {
    Left,
    Right,
}

impl Heading {
    pub fn sign(self) -> f32 {
        match self {
            Heading::Left => -1.0,
            Heading::Right => 1.0,
        }
    }
}

/// Parametric trajectory of a patterned enemy
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Pattern {
    /// Straight descent at base speed
    Line,
    /// Fast wide sine sway around `start_x`
    Zig {
        start_x: f32,
        amp: f32,
        freq: f32,
        phase: f32,
    },
    /// Slow gentle sine sway around `start_x`
    Arc {
        start_x: f32,
        amp: f32,
        freq: f32,
        phase: f32,
    },
    /// Diverging V: constant lateral drift
    V { heading: Heading, vx: f32 },
    /// Crawl at 30% speed until `age >= delay`
    Stagger { delay: f32 },
    /// Escort leader: small sway around `start_x`
    EscortLead { start_x: f32, phase: f32 },
    /// Escort wingman: small sway around the leader's column plus a fixed offset
    EscortWing { start_x: f32, offset: f32, phase: f32 },
}

impl Pattern {
    /// Zig with the formation's default amplitude/frequency
    pub fn zig(start_x: f32, phase: f32) -> Self {
        Pattern::Zig {
            start_x,
            amp: ZIG_AMPLITUDE,
            freq: ZIG_FREQUENCY,
            phase,
        }
    }

    /// Arc with the formation's default amplitude/frequency
    pub fn arc(start_x: f32, phase: f32) -> Self {
        Pattern::Arc {
            start_x,
            amp: ARC_AMPLITUDE,
            freq: ARC_FREQUENCY,
            phase,
        }
    }

    pub fn v(heading: Heading, vx: f32) -> Self {
        debug_assert!(vx >= 0.0, "V drift speed must be non-negative");
        Pattern::V { heading, vx }
    }

    pub fn stagger(delay: f32) -> Self {
        debug_assert!(delay >= 0.0, "stagger delay must be non-negative");
        Pattern::Stagger { delay }
    }

    /// Advance a patterned position by one tick.
    ///
    /// `age` is the entity age *after* this tick's `dt` has been added.
    pub fn step(&self, pos: Vec2, age: f32, speed: f32, dt: f32) -> Vec2 {
        let descend = pos.y + speed * dt;
        match *self {
            Pattern::Line => Vec2::new(pos.x, descend),
            Pattern::Zig {
                start_x,
                amp,
                freq,
                phase,
            }
            | Pattern::Arc {
                start_x,
                amp,
                freq,
                phase,
            } => Vec2::new(start_x + (age * freq + phase).sin() * amp, descend),
            Pattern::V { heading, vx } => Vec2::new(pos.x + heading.sign() * vx * dt, descend),
            Pattern::Stagger { delay } => {
                let mul = if age < delay { STAGGER_SLOW_FACTOR } else { 1.0 };
                Vec2::new(pos.x, pos.y + speed * mul * dt)
            }
            Pattern::EscortLead { start_x, phase } => Vec2::new(
                start_x + (age * ESCORT_LEAD_FREQUENCY + phase).sin() * ESCORT_LEAD_AMPLITUDE,
                descend,
            ),
            Pattern::EscortWing {
                start_x,
                offset,
                phase,
            } => Vec2::new(
                start_x + offset + (age * ESCORT_WING_FREQUENCY + phase).sin() * ESCORT_WING_AMPLITUDE,
                descend,
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const DT: f32 = 1.0 / 60.0;

    #[test]
    fn test_line_descends() {
        let p = Pattern::Line.step(Vec2::new(100.0, 0.0), DT, 120.0, DT);
        assert_eq!(p.x, 100.0);
        assert!((p.y - 2.0).abs() < 1e-4);
    }

    #[test]
    fn test_zig_tracks_sine() {
        let pattern = Pattern::zig(300.0, 0.5);
        let age = 1.0;
        let p = pattern.step(Vec2::new(0.0, 50.0), age, 100.0, DT);
        let expected = 300.0 + (age * ZIG_FREQUENCY + 0.5).sin() * ZIG_AMPLITUDE;
        assert!((p.x - expected).abs() < 1e-3);
    }

    #[test]
    fn test_arc_and_zig_share_shape() {
        let arc = Pattern::Arc {
            start_x: 200.0,
            amp: 140.0,
            freq: 2.2,
            phase: 0.0,
        };
        let zig = Pattern::zig(200.0, 0.0);
        let pos = Vec2::new(10.0, 10.0);
        assert_eq!(arc.step(pos, 0.7, 90.0, DT), zig.step(pos, 0.7, 90.0, DT));
    }

    #[test]
    fn test_v_diverges() {
        let left = Pattern::v(Heading::Left, 90.0).step(Vec2::new(400.0, 0.0), DT, 100.0, DT);
        let right = Pattern::v(Heading::Right, 90.0).step(Vec2::new(400.0, 0.0), DT, 100.0, DT);
        assert!(left.x < 400.0);
        assert!(right.x > 400.0);
    }

    #[test]
    fn test_stagger_waits_then_full_speed() {
        let pattern = Pattern::stagger(0.5);
        let slow = pattern.step(Vec2::ZERO, 0.2, 100.0, 1.0);
        let fast = pattern.step(Vec2::ZERO, 0.6, 100.0, 1.0);
        assert!((slow.y - 30.0).abs() < 1e-4);
        assert!((fast.y - 100.0).abs() < 1e-4);
    }

    #[test]
    fn test_escort_wing_keeps_offset() {
        let wing = Pattern::EscortWing {
            start_x: 400.0,
            offset: -70.0,
            phase: 0.0,
        };
        let p = wing.step(Vec2::ZERO, 0.0, 100.0, DT);
        assert!((p.x - 330.0).abs() < 1e-4);
        // Sway never strays more than the wing amplitude from the slot
        for i in 0..200 {
            let p = wing.step(Vec2::ZERO, i as f32 * 0.05, 100.0, DT);
            assert!((p.x - 330.0).abs() <= ESCORT_WING_AMPLITUDE + 1e-3);
        }
    }

    #[test]
    fn test_escort_lead_sway() {
        let lead = Pattern::EscortLead {
            start_x: 400.0,
            phase: 0.0,
        };
        for i in 0..100 {
            let age = i as f32 * 0.07;
            let p = lead.step(Vec2::new(0.0, 10.0), age, 100.0, DT);
            let expected = 400.0 + (age * 1.2).sin() * 20.0;
            assert!((p.x - expected).abs() < 1e-3);
        }
        // Peak of the sway
        let peak = lead.step(Vec2::ZERO, std::f32::consts::FRAC_PI_2 / 1.2, 100.0, DT);
        assert!((peak.x - 420.0).abs() < 1e-3);
    }

    proptest! {
        #[test]
        fn prop_step_is_pure(
            start_x in 0.0f32..800.0,
            phase in 0.0f32..6.3,
            age in 0.0f32..30.0,
            x in -100.0f32..900.0,
            y in -300.0f32..700.0,
        ) {
            let pattern = Pattern::zig(start_x, phase);
            let pos = Vec2::new(x, y);
            let a = pattern.step(pos, age, 110.0, DT);
            let b = pattern.step(pos, age, 110.0, DT);
            prop_assert_eq!(a, b);
        }
    }
}
