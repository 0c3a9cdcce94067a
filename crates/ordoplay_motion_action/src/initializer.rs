// SPDX-License-Identifier: MIT OR Apache-2.0
//! Data-driven action construction.
//!
//! An [`ActionInitializer`] is the plain-data description of an action's
//! configuration: kind tag, endpoint values, timing, modifiers, and nested
//! children for sequences. Runtime state never round-trips. Reconstruction is
//! forgiving by contract: an unrecognized kind or a payload that does not fit
//! it degrades to `None` with one warning, because these paths are reachable
//! from data-driven content and must not take down a running frame.

use crate::action::{Action, Repeat};
use crate::easing::Easing;
use crate::kinds::ActionKind;
use crate::target::AppliedValue;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A start or end value in data form.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ValueInit {
    /// Scalar channel (rotation, fade, named property)
    Float(f64),
    /// Pair channel (position, scale)
    Vec2([f64; 2]),
    /// Color channel (tint)
    Color3([f32; 3]),
}

impl ValueInit {
    fn applied(self) -> AppliedValue {
        match self {
            ValueInit::Float(v) => AppliedValue::Float(v),
            ValueInit::Vec2(v) => AppliedValue::Vec2(v),
            ValueInit::Color3(v) => AppliedValue::Color3(v),
        }
    }
}

fn default_speed() -> f64 {
    1.0
}

fn default_repeat() -> i64 {
    1
}

/// Plain-data description of an action's configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActionInitializer {
    /// Kind tag ("move", "rotate", "scale", "fade", "tint", "property",
    /// "bezier", "delay", "sequence")
    pub kind: String,
    /// Explicit start value, if set
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub from: Option<ValueInit>,
    /// End value
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub to: Option<ValueInit>,
    /// Property path, for "property" actions
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    /// Control polygon, for "bezier" actions
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub points: Option<Vec<[f64; 2]>>,
    /// One-cycle duration, in ticks
    #[serde(default)]
    pub duration: f64,
    /// Delay before the window opens, in ticks
    #[serde(default)]
    pub delay: f64,
    /// Cycle count; `-1` means forever
    #[serde(default = "default_repeat")]
    pub repeat: i64,
    /// Relative (delta) interpolation
    #[serde(default)]
    pub relative: bool,
    /// Inverted interpolation direction
    #[serde(default)]
    pub reversed: bool,
    /// Easing curve
    #[serde(default)]
    pub easing: Easing,
    /// Time-scale multiplier
    #[serde(default = "default_speed")]
    pub speed: f64,
    /// User tag
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tag: Option<u32>,
    /// Sequential (`true`) vs spawn (`false`), for "sequence"
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sequential: Option<bool>,
    /// Child initializers, for "sequence"
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub children: Option<Vec<ActionInitializer>>,
}

/// Why an initializer failed to decode.
#[derive(Debug, Error)]
pub enum InitializerError {
    /// Kind tag is not in the closed set
    #[error("unknown action kind: {0:?}")]
    UnknownKind(String),

    /// A required field is absent
    #[error("action kind {kind:?} is missing field {field:?}")]
    MissingField {
        /// Kind tag being decoded
        kind: String,
        /// Field that was absent
        field: &'static str,
    },

    /// A value's shape does not fit the kind
    #[error("action kind {kind:?} cannot take field {field:?} of this shape")]
    ShapeMismatch {
        /// Kind tag being decoded
        kind: String,
        /// Offending field
        field: &'static str,
    },

    /// A child of a sequence failed to decode
    #[error("sequence child {index} failed: {source}")]
    Child {
        /// Index in the child list
        index: usize,
        /// The child's own failure
        #[source]
        source: Box<InitializerError>,
    },
}

/// Reconstruct a live action from data.
///
/// Returns `None` and logs one warning when the initializer is
/// unrecognizable; never panics and never surfaces an error to the frame
/// loop.
pub fn parse_action(init: &ActionInitializer) -> Option<Action> {
    match try_parse_action(init) {
        Ok(action) => Some(action),
        Err(err) => {
            tracing::warn!(kind = %init.kind, error = %err, "failed to reconstruct action from data");
            None
        }
    }
}

fn expect_vec2(
    init: &ActionInitializer,
    value: Option<ValueInit>,
    field: &'static str,
) -> Result<Option<[f64; 2]>, InitializerError> {
    match value {
        None => Ok(None),
        Some(ValueInit::Vec2(v)) => Ok(Some(v)),
        Some(_) => Err(InitializerError::ShapeMismatch {
            kind: init.kind.clone(),
            field,
        }),
    }
}

fn expect_float(
    init: &ActionInitializer,
    value: Option<ValueInit>,
    field: &'static str,
) -> Result<Option<f64>, InitializerError> {
    match value {
        None => Ok(None),
        Some(ValueInit::Float(v)) => Ok(Some(v)),
        Some(_) => Err(InitializerError::ShapeMismatch {
            kind: init.kind.clone(),
            field,
        }),
    }
}

fn expect_color(
    init: &ActionInitializer,
    value: Option<ValueInit>,
    field: &'static str,
) -> Result<Option<[f32; 3]>, InitializerError> {
    match value {
        None => Ok(None),
        Some(ValueInit::Color3(v)) => Ok(Some(v)),
        Some(_) => Err(InitializerError::ShapeMismatch {
            kind: init.kind.clone(),
            field,
        }),
    }
}

fn required<T>(
    value: Option<T>,
    init: &ActionInitializer,
    field: &'static str,
) -> Result<T, InitializerError> {
    value.ok_or_else(|| InitializerError::MissingField {
        kind: init.kind.clone(),
        field,
    })
}

fn try_parse_action(init: &ActionInitializer) -> Result<Action, InitializerError> {
    let mut action = match init.kind.as_str() {
        "move" => {
            let to = required(expect_vec2(init, init.to, "to")?, init, "to")?;
            let mut a = Action::move_to(to[0], to[1]);
            if let Some(from) = expect_vec2(init, init.from, "from")? {
                a.set_from(AppliedValue::Vec2(from));
            }
            a
        }
        "rotate" => {
            let to = required(expect_float(init, init.to, "to")?, init, "to")?;
            let mut a = Action::rotate_to(to);
            if let Some(from) = expect_float(init, init.from, "from")? {
                a.set_from(AppliedValue::Float(from));
            }
            a
        }
        "scale" => {
            let to = required(expect_vec2(init, init.to, "to")?, init, "to")?;
            let mut a = Action::scale_to(to[0], to[1]);
            if let Some(from) = expect_vec2(init, init.from, "from")? {
                a.set_from(AppliedValue::Vec2(from));
            }
            a
        }
        "fade" => {
            let to = required(expect_float(init, init.to, "to")?, init, "to")?;
            let mut a = Action::fade_to(to as f32);
            if let Some(from) = expect_float(init, init.from, "from")? {
                a.set_from(AppliedValue::Float(from));
            }
            a
        }
        "tint" => {
            let to = required(expect_color(init, init.to, "to")?, init, "to")?;
            let mut a = Action::tint_to(to);
            if let Some(from) = expect_color(init, init.from, "from")? {
                a.set_from(AppliedValue::Color3(from));
            }
            a
        }
        "property" => {
            let path = required(init.path.clone(), init, "path")?;
            let to = required(expect_float(init, init.to, "to")?, init, "to")?;
            let mut a = Action::property_to(path, to);
            if let Some(from) = expect_float(init, init.from, "from")? {
                a.set_from(AppliedValue::Float(from));
            }
            a
        }
        "bezier" => {
            let points = required(init.points.clone(), init, "points")?;
            Action::bezier_to(points)
        }
        "delay" => Action::wait(init.duration),
        "sequence" => {
            let children = init.children.as_deref().unwrap_or_default();
            let mut decoded = Vec::with_capacity(children.len());
            for (index, child) in children.iter().enumerate() {
                decoded.push(try_parse_action(child).map_err(|source| {
                    InitializerError::Child {
                        index,
                        source: Box::new(source),
                    }
                })?);
            }
            Action::sequence_of(decoded, init.sequential.unwrap_or(true))
        }
        other => return Err(InitializerError::UnknownKind(other.to_string())),
    };

    if init.kind != "sequence" {
        action.set_duration(init.duration);
        action.set_delay(init.delay);
    }
    if init.repeat < 0 {
        action.set_repeat_forever();
    } else {
        action.set_repeat_times(init.repeat.min(i64::from(u32::MAX)) as u32);
    }
    action.set_relative(init.relative);
    // The flag is restored directly: a reversed sequence already encodes its
    // flipped child order, so `set_reversed` would flip it a second time.
    action.reversed = init.reversed;
    action.set_easing(init.easing);
    action.set_speed(init.speed);
    if let Some(tag) = init.tag {
        action.set_tag(tag);
    }
    Ok(action)
}

impl Action {
    /// Describe this action's configuration as plain data.
    ///
    /// Runtime state and callbacks are not part of the description. Returns
    /// `None` (with a debug log) for actions that cannot round-trip through
    /// data: callback actions and hooks, or sequences containing them.
    pub fn get_initializer(&self) -> Option<ActionInitializer> {
        let mut init = ActionInitializer {
            kind: self.kind.tag().to_string(),
            from: None,
            to: None,
            path: None,
            points: None,
            duration: self.duration,
            delay: self.delay,
            repeat: match self.repeat {
                Repeat::Times(n) => i64::from(n),
                Repeat::Forever => -1,
            },
            relative: self.relative,
            reversed: self.reversed,
            easing: self.easing,
            speed: self.speed,
            tag: self.tag,
            sequential: None,
            children: None,
        };

        match &self.kind {
            ActionKind::Move(d) => {
                init.from = d.from.map(ValueInit::Vec2);
                init.to = Some(ValueInit::Vec2(d.to));
            }
            ActionKind::Rotate(d) => {
                init.from = d.from.map(ValueInit::Float);
                init.to = Some(ValueInit::Float(d.to));
            }
            ActionKind::Scale(d) => {
                init.from = d.from.map(ValueInit::Vec2);
                init.to = Some(ValueInit::Vec2(d.to));
            }
            ActionKind::Fade(d) => {
                init.from = d.from.map(|v| ValueInit::Float(f64::from(v)));
                init.to = Some(ValueInit::Float(f64::from(d.to)));
            }
            ActionKind::Tint(d) => {
                init.from = d.from.map(ValueInit::Color3);
                init.to = Some(ValueInit::Color3(d.to));
            }
            ActionKind::Property(d) => {
                init.path = Some(d.path.clone());
                init.from = d.from.map(ValueInit::Float);
                init.to = Some(ValueInit::Float(d.to));
            }
            ActionKind::Bezier(d) => {
                init.points = Some(d.points.clone());
            }
            ActionKind::Delay => {}
            ActionKind::Sequence(body) => {
                init.sequential = Some(body.sequential);
                let mut children = Vec::with_capacity(body.children.len());
                for child in &body.children {
                    match child.get_initializer() {
                        Some(child_init) => children.push(child_init),
                        None => {
                            tracing::debug!("sequence contains a non-serializable child");
                            return None;
                        }
                    }
                }
                init.children = Some(children);
            }
            ActionKind::Call(_) | ActionKind::Hook(_) => {
                tracing::debug!(kind = self.kind.tag(), "action kind is not serializable");
                return None;
            }
        }

        Some(init)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::BasicNode;

    fn blank(kind: &str) -> ActionInitializer {
        ActionInitializer {
            kind: kind.to_string(),
            from: None,
            to: None,
            path: None,
            points: None,
            duration: 0.0,
            delay: 0.0,
            repeat: 1,
            relative: false,
            reversed: false,
            easing: Easing::Linear,
            speed: 1.0,
            tag: None,
            sequential: None,
            children: None,
        }
    }

    #[test]
    fn test_move_round_trip() {
        let mut a = Action::move_to(100.0, 120.0);
        a.set_duration(1000.0).set_tag(3).set_easing(Easing::QuadOut);

        let init = a.get_initializer().unwrap();
        let json = serde_json::to_string(&init).unwrap();
        let decoded: ActionInitializer = serde_json::from_str(&json).unwrap();
        let b = parse_action(&decoded).unwrap();

        assert_eq!(b.duration(), 1000.0);
        assert_eq!(b.tag(), Some(3));

        let mut node = BasicNode::at(20.0, 30.0);
        let mut b = b;
        b.step(1000.0, &mut node);
        assert_eq!((node.x, node.y), (100.0, 120.0));
    }

    #[test]
    fn test_unknown_kind_degrades_to_none() {
        let init = blank("teleport");
        assert!(parse_action(&init).is_none());
    }

    #[test]
    fn test_shape_mismatch_degrades_to_none() {
        let mut init = blank("rotate");
        init.to = Some(ValueInit::Vec2([1.0, 2.0]));
        assert!(parse_action(&init).is_none());
    }

    #[test]
    fn test_missing_field_degrades_to_none() {
        let init = blank("move");
        assert!(parse_action(&init).is_none());

        let init = blank("property");
        assert!(parse_action(&init).is_none());
    }

    #[test]
    fn test_sequence_round_trip() {
        let mut first = Action::move_to(10.0, 0.0);
        first.set_duration(5.0);
        let mut second = Action::fade_to(0.0);
        second.set_duration(5.0);
        let seq = Action::sequence_of(vec![first, second], true);

        let init = seq.get_initializer().unwrap();
        assert_eq!(init.kind, "sequence");
        assert_eq!(init.sequential, Some(true));

        let back = parse_action(&init).unwrap();
        assert_eq!(back.children().len(), 2);
        assert_eq!(back.duration(), 10.0);
    }

    #[test]
    fn test_repeat_forever_encodes_negative() {
        let mut a = Action::rotate_to(360.0);
        a.set_duration(10.0).set_repeat_forever();
        let init = a.get_initializer().unwrap();
        assert_eq!(init.repeat, -1);
        let back = parse_action(&init).unwrap();
        assert!(back.total_span().is_infinite());
    }

    #[test]
    fn test_call_is_not_serializable() {
        let a = Action::call(|_, _| {});
        assert!(a.get_initializer().is_none());
    }

    #[test]
    fn test_ron_round_trip() {
        let mut a = Action::property_to("hp", 10.0);
        a.set_duration(100.0);
        let init = a.get_initializer().unwrap();
        let text = ron::to_string(&init).unwrap();
        let decoded: ActionInitializer = ron::from_str(&text).unwrap();
        let back = parse_action(&decoded).unwrap();
        assert_eq!(back.duration(), 100.0);
    }
}
