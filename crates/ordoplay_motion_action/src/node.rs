// SPDX-License-Identifier: MIT OR Apache-2.0
//! Reference scene node.
//!
//! A minimal [`ActionTarget`] implementation backed by plain fields and a
//! property bag. Used by the tests throughout the workspace and handy as a
//! starting point for embedders whose scene graph is not yet wired up.

use crate::target::ActionTarget;
use std::collections::HashMap;

/// Plain-field scene node implementing the target contract.
#[derive(Debug, Clone, PartialEq)]
pub struct BasicNode {
    /// Horizontal position
    pub x: f64,
    /// Vertical position
    pub y: f64,
    /// Rotation angle in degrees
    pub rotation: f64,
    /// Horizontal scale factor
    pub scale_x: f64,
    /// Vertical scale factor
    pub scale_y: f64,
    /// Opacity in `[0, 1]`
    pub alpha: f32,
    /// Tint color (RGB)
    pub tint: [f32; 3],
    /// Named properties keyed by path
    pub properties: HashMap<String, f64>,
}

impl BasicNode {
    /// Create a node at the origin with identity transform.
    pub fn new() -> Self {
        Self {
            x: 0.0,
            y: 0.0,
            rotation: 0.0,
            scale_x: 1.0,
            scale_y: 1.0,
            alpha: 1.0,
            tint: [1.0, 1.0, 1.0],
            properties: HashMap::new(),
        }
    }

    /// Create a node at a position.
    pub fn at(x: f64, y: f64) -> Self {
        Self {
            x,
            y,
            ..Self::new()
        }
    }

    /// Register a named property with an initial value.
    pub fn with_property(mut self, path: impl Into<String>, value: f64) -> Self {
        self.properties.insert(path.into(), value);
        self
    }
}

impl Default for BasicNode {
    fn default() -> Self {
        Self::new()
    }
}

impl ActionTarget for BasicNode {
    fn x(&self) -> f64 {
        self.x
    }

    fn set_x(&mut self, x: f64) {
        self.x = x;
    }

    fn y(&self) -> f64 {
        self.y
    }

    fn set_y(&mut self, y: f64) {
        self.y = y;
    }

    fn rotation(&self) -> f64 {
        self.rotation
    }

    fn set_rotation(&mut self, degrees: f64) {
        self.rotation = degrees;
    }

    fn scale_x(&self) -> f64 {
        self.scale_x
    }

    fn set_scale_x(&mut self, sx: f64) {
        self.scale_x = sx;
    }

    fn scale_y(&self) -> f64 {
        self.scale_y
    }

    fn set_scale_y(&mut self, sy: f64) {
        self.scale_y = sy;
    }

    fn alpha(&self) -> f32 {
        self.alpha
    }

    fn set_alpha(&mut self, alpha: f32) {
        self.alpha = alpha;
    }

    fn tint(&self) -> [f32; 3] {
        self.tint
    }

    fn set_tint(&mut self, tint: [f32; 3]) {
        self.tint = tint;
    }

    fn property(&self, path: &str) -> Option<f64> {
        self.properties.get(path).copied()
    }

    fn set_property(&mut self, path: &str, value: f64) -> bool {
        if path.is_empty() {
            return false;
        }
        match self.properties.get_mut(path) {
            Some(slot) => {
                *slot = value;
                true
            }
            None => false,
        }
    }
}
