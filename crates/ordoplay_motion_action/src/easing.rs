// SPDX-License-Identifier: MIT OR Apache-2.0
//! Time interpolation curves.
//!
//! An easing is a pure function over normalized time: it reshapes a fraction
//! in `[0, 1]` and is consumed by actions, never mutated. The set is closed so
//! initializers can round-trip through data.

use serde::{Deserialize, Serialize};
use std::f32::consts::PI;

/// Easing curve applied to an action's normalized time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Easing {
    /// No shaping
    #[default]
    Linear,
    /// Sine ease in
    SineIn,
    /// Sine ease out
    SineOut,
    /// Sine ease in/out
    SineInOut,
    /// Quadratic ease in
    QuadIn,
    /// Quadratic ease out
    QuadOut,
    /// Quadratic ease in/out
    QuadInOut,
    /// Cubic ease in
    CubicIn,
    /// Cubic ease out
    CubicOut,
    /// Cubic ease in/out
    CubicInOut,
    /// Exponential ease in
    ExpoIn,
    /// Exponential ease out
    ExpoOut,
    /// Overshooting ease in
    BackIn,
    /// Overshooting ease out
    BackOut,
    /// Bouncing ease out
    BounceOut,
}

impl Easing {
    /// Apply the curve to a linear fraction in `[0, 1]`.
    ///
    /// Input is clamped; every curve maps 0 to 0 and 1 to 1.
    pub fn transform(&self, fraction: f32) -> f32 {
        let t = fraction.clamp(0.0, 1.0);
        match self {
            Easing::Linear => t,
            Easing::SineIn => 1.0 - (t * PI / 2.0).cos(),
            Easing::SineOut => (t * PI / 2.0).sin(),
            Easing::SineInOut => 0.5 * (1.0 - (t * PI).cos()),
            Easing::QuadIn => t * t,
            Easing::QuadOut => t * (2.0 - t),
            Easing::QuadInOut => {
                if t < 0.5 {
                    2.0 * t * t
                } else {
                    let u = t - 1.0;
                    1.0 - 2.0 * u * u
                }
            }
            Easing::CubicIn => t * t * t,
            Easing::CubicOut => {
                let u = t - 1.0;
                u * u * u + 1.0
            }
            Easing::CubicInOut => {
                if t < 0.5 {
                    4.0 * t * t * t
                } else {
                    let u = t - 1.0;
                    4.0 * u * u * u + 1.0
                }
            }
            Easing::ExpoIn => {
                if t == 0.0 {
                    0.0
                } else {
                    2f32.powf(10.0 * (t - 1.0))
                }
            }
            Easing::ExpoOut => {
                if t == 1.0 {
                    1.0
                } else {
                    1.0 - 2f32.powf(-10.0 * t)
                }
            }
            Easing::BackIn => {
                const S: f32 = 1.70158;
                t * t * ((S + 1.0) * t - S)
            }
            Easing::BackOut => {
                const S: f32 = 1.70158;
                let u = t - 1.0;
                u * u * ((S + 1.0) * u + S) + 1.0
            }
            Easing::BounceOut => bounce(t),
        }
    }
}

fn bounce(t: f32) -> f32 {
    if t < 1.0 / 2.75 {
        7.5625 * t * t
    } else if t < 2.0 / 2.75 {
        let u = t - 1.5 / 2.75;
        7.5625 * u * u + 0.75
    } else if t < 2.5 / 2.75 {
        let u = t - 2.25 / 2.75;
        7.5625 * u * u + 0.9375
    } else {
        let u = t - 2.625 / 2.75;
        7.5625 * u * u + 0.984375
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL: [Easing; 15] = [
        Easing::Linear,
        Easing::SineIn,
        Easing::SineOut,
        Easing::SineInOut,
        Easing::QuadIn,
        Easing::QuadOut,
        Easing::QuadInOut,
        Easing::CubicIn,
        Easing::CubicOut,
        Easing::CubicInOut,
        Easing::ExpoIn,
        Easing::ExpoOut,
        Easing::BackIn,
        Easing::BackOut,
        Easing::BounceOut,
    ];

    #[test]
    fn test_endpoints_are_fixed() {
        for easing in ALL {
            assert!(
                easing.transform(0.0).abs() < 1e-5,
                "{easing:?} at 0 should be 0"
            );
            assert!(
                (easing.transform(1.0) - 1.0).abs() < 1e-5,
                "{easing:?} at 1 should be 1"
            );
        }
    }

    #[test]
    fn test_input_is_clamped() {
        for easing in ALL {
            assert_eq!(easing.transform(-2.0), easing.transform(0.0));
            assert_eq!(easing.transform(3.0), easing.transform(1.0));
        }
    }

    #[test]
    fn test_linear_midpoint() {
        assert_eq!(Easing::Linear.transform(0.5), 0.5);
    }

    #[test]
    fn test_serde_round_trip() {
        let json = serde_json::to_string(&Easing::QuadInOut).unwrap();
        assert_eq!(json, "\"quad_in_out\"");
        let back: Easing = serde_json::from_str(&json).unwrap();
        assert_eq!(back, Easing::QuadInOut);
    }
}
