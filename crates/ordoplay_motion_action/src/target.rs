// SPDX-License-Identifier: MIT OR Apache-2.0
//! Target capability contract.
//!
//! Actions mutate scene objects through [`ActionTarget`]; the core never owns
//! a target's lifetime and never sees a concrete node type. Targets are
//! addressed by [`ActorId`] when a driver needs to resolve them.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Handle to a scene object owned elsewhere.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ActorId(pub Uuid);

impl ActorId {
    /// Create a new random actor ID
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for ActorId {
    fn default() -> Self {
        Self::new()
    }
}

/// Mutation capabilities an action target must expose.
///
/// Concrete leaf actions each touch a subset of these; the named-property
/// accessors cover anything outside the fixed transform set.
pub trait ActionTarget {
    /// Horizontal position
    fn x(&self) -> f64;
    /// Set horizontal position
    fn set_x(&mut self, x: f64);
    /// Vertical position
    fn y(&self) -> f64;
    /// Set vertical position
    fn set_y(&mut self, y: f64);
    /// Rotation angle in degrees
    fn rotation(&self) -> f64;
    /// Set rotation angle in degrees
    fn set_rotation(&mut self, degrees: f64);
    /// Horizontal scale factor
    fn scale_x(&self) -> f64;
    /// Set horizontal scale factor
    fn set_scale_x(&mut self, sx: f64);
    /// Vertical scale factor
    fn scale_y(&self) -> f64;
    /// Set vertical scale factor
    fn set_scale_y(&mut self, sy: f64);
    /// Opacity in `[0, 1]`
    fn alpha(&self) -> f32;
    /// Set opacity
    fn set_alpha(&mut self, alpha: f32);
    /// Tint color (RGB, `[0, 1]` per channel)
    fn tint(&self) -> [f32; 3];
    /// Set tint color
    fn set_tint(&mut self, tint: [f32; 3]);
    /// Read a named property; `None` when the path is unknown
    fn property(&self, path: &str) -> Option<f64>;
    /// Write a named property; `false` when the path is rejected
    fn set_property(&mut self, path: &str, value: f64) -> bool;

    /// Set both position components at once
    fn set_position(&mut self, x: f64, y: f64) {
        self.set_x(x);
        self.set_y(y);
    }

    /// Set both scale components at once
    fn set_scale(&mut self, sx: f64, sy: f64) {
        self.set_scale_x(sx);
        self.set_scale_y(sy);
    }
}

/// Value produced by one application of an action's mutation.
///
/// Handed to the `on_apply` observer; only materialized when such an observer
/// is actually registered.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AppliedValue {
    /// No value (delay and callback actions)
    None,
    /// Scalar (rotation, fade, named property)
    Float(f64),
    /// Pair (position, scale)
    Vec2([f64; 2]),
    /// RGB color (tint)
    Color3([f32; 3]),
}
