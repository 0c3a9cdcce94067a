// SPDX-License-Identifier: MIT OR Apache-2.0
//! The closed set of action kinds.
//!
//! Each kind carries its own interpolation payload; `update` performs one
//! mutation of the target for a shaped fraction `t` in `[0, 1]`. The kind set
//! is a tagged union rather than string-dispatched registration so an unknown
//! kind is unrepresentable once an action exists.
//!
//! The relative/reversed interaction is deliberate and load-bearing: a
//! relative action always interpolates over its literal `[from, to]` range,
//! and reversing it subtracts the end delta so the final value is the
//! target's original again. An absolute action reverses by swapping its
//! effective endpoints, and an absolute bezier path is shifted at capture
//! time so the curve starts at the target's current position.

use crate::action::{Action, ActionInfo};
use crate::sequence::SequenceBody;
use crate::target::{ActionTarget, AppliedValue};
use crate::time::Ticks;
use std::rc::Rc;

/// A foreign tick body riding the action protocol.
///
/// Hook actions have pinned timing (duration 0, repeat forever, always
/// running); the hook sees every tick's absolute time and does its own
/// bookkeeping. The scheduler queue is the canonical implementor.
pub trait ActionHook {
    /// Called once per tick with the wrapping action's clock.
    fn tick(&mut self, now: Ticks);
    /// Clone the hook for action configuration cloning.
    fn box_clone(&self) -> Box<dyn ActionHook>;
    /// Short name for diagnostics.
    fn name(&self) -> &'static str {
        "hook"
    }
}

/// Callback invoked by a `Call` action.
pub type CallFn = Rc<dyn Fn(&ActionInfo, &mut dyn ActionTarget)>;

#[derive(Debug, Clone, Default)]
pub(crate) struct MoveData {
    pub from: Option<[f64; 2]>,
    pub to: [f64; 2],
    pub original: Option<[f64; 2]>,
}

#[derive(Debug, Clone, Default)]
pub(crate) struct RotateData {
    pub from: Option<f64>,
    pub to: f64,
    pub original: Option<f64>,
}

#[derive(Debug, Clone, Default)]
pub(crate) struct ScaleData {
    pub from: Option<[f64; 2]>,
    pub to: [f64; 2],
    pub original: Option<[f64; 2]>,
}

#[derive(Debug, Clone, Default)]
pub(crate) struct FadeData {
    pub from: Option<f32>,
    pub to: f32,
    pub original: Option<f32>,
}

#[derive(Debug, Clone, Default)]
pub(crate) struct TintData {
    pub from: Option<[f32; 3]>,
    pub to: [f32; 3],
    pub original: Option<[f32; 3]>,
}

#[derive(Debug, Clone, Default)]
pub(crate) struct PropertyData {
    pub path: String,
    pub from: Option<f64>,
    pub to: f64,
    pub original: Option<f64>,
    pub warned: bool,
}

#[derive(Debug, Clone, Default)]
pub(crate) struct BezierData {
    /// Control points including the curve start, in travel order before
    /// reversal.
    pub points: Vec<[f64; 2]>,
    /// Translation applied to an absolute curve so it starts at the target's
    /// captured position.
    pub shift: [f64; 2],
    pub original: Option<[f64; 2]>,
}

pub(crate) struct CallData {
    pub callback: CallFn,
    pub fired: bool,
}

impl Clone for CallData {
    fn clone(&self) -> Self {
        Self {
            callback: Rc::clone(&self.callback),
            fired: false,
        }
    }
}

impl std::fmt::Debug for CallData {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CallData").field("fired", &self.fired).finish()
    }
}

/// Kind payload of an action.
pub(crate) enum ActionKind {
    Move(MoveData),
    Rotate(RotateData),
    Scale(ScaleData),
    Fade(FadeData),
    Tint(TintData),
    Property(PropertyData),
    Bezier(BezierData),
    Delay,
    Call(CallData),
    Sequence(SequenceBody),
    Hook(Box<dyn ActionHook>),
}

impl std::fmt::Debug for ActionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ActionKind::Move(d) => f.debug_tuple("Move").field(d).finish(),
            ActionKind::Rotate(d) => f.debug_tuple("Rotate").field(d).finish(),
            ActionKind::Scale(d) => f.debug_tuple("Scale").field(d).finish(),
            ActionKind::Fade(d) => f.debug_tuple("Fade").field(d).finish(),
            ActionKind::Tint(d) => f.debug_tuple("Tint").field(d).finish(),
            ActionKind::Property(d) => f.debug_tuple("Property").field(d).finish(),
            ActionKind::Bezier(d) => f.debug_tuple("Bezier").field(d).finish(),
            ActionKind::Delay => f.write_str("Delay"),
            ActionKind::Call(d) => f.debug_tuple("Call").field(d).finish(),
            ActionKind::Sequence(d) => f.debug_tuple("Sequence").field(d).finish(),
            ActionKind::Hook(h) => f.debug_tuple("Hook").field(&h.name()).finish(),
        }
    }
}

fn lerp(a: f64, b: f64, t: f64) -> f64 {
    a + (b - a) * t
}

fn lerp2(a: [f64; 2], b: [f64; 2], t: f64) -> [f64; 2] {
    [lerp(a[0], b[0], t), lerp(a[1], b[1], t)]
}

fn lerp3f(a: [f32; 3], b: [f32; 3], t: f64) -> [f32; 3] {
    let t = t as f32;
    [
        a[0] + (b[0] - a[0]) * t,
        a[1] + (b[1] - a[1]) * t,
        a[2] + (b[2] - a[2]) * t,
    ]
}

/// Interpolated value for a scalar channel under the relative/reversed law.
fn blend(
    from: Option<f64>,
    to: f64,
    original: f64,
    relative: bool,
    reversed: bool,
    t: f64,
) -> f64 {
    if relative {
        let delta = lerp(from.unwrap_or(0.0), to, t);
        if reversed {
            original + delta - to
        } else {
            original + delta
        }
    } else {
        let start = from.unwrap_or(original);
        let (a, b) = if reversed { (to, start) } else { (start, to) };
        lerp(a, b, t)
    }
}

fn blend2(
    from: Option<[f64; 2]>,
    to: [f64; 2],
    original: [f64; 2],
    relative: bool,
    reversed: bool,
    t: f64,
) -> [f64; 2] {
    [
        blend(from.map(|v| v[0]), to[0], original[0], relative, reversed, t),
        blend(from.map(|v| v[1]), to[1], original[1], relative, reversed, t),
    ]
}

/// De Casteljau evaluation over an arbitrary-degree control polygon.
fn bezier_eval(points: &[[f64; 2]], t: f64) -> [f64; 2] {
    match points {
        [] => [0.0, 0.0],
        [p] => *p,
        _ => {
            let mut scratch: Vec<[f64; 2]> = points.to_vec();
            let mut n = scratch.len();
            while n > 1 {
                for i in 0..n - 1 {
                    scratch[i] = lerp2(scratch[i], scratch[i + 1], t);
                }
                n -= 1;
            }
            scratch[0]
        }
    }
}

impl ActionKind {
    /// Capture original values from the target, and compute the absolute
    /// path shift. Called once, on the first applicable tick.
    pub(crate) fn capture(&mut self, target: &dyn ActionTarget, reversed: bool) {
        match self {
            ActionKind::Move(d) => d.original = Some([target.x(), target.y()]),
            ActionKind::Rotate(d) => d.original = Some(target.rotation()),
            ActionKind::Scale(d) => d.original = Some([target.scale_x(), target.scale_y()]),
            ActionKind::Fade(d) => d.original = Some(target.alpha()),
            ActionKind::Tint(d) => d.original = Some(target.tint()),
            ActionKind::Property(d) => {
                let value = target.property(&d.path);
                if value.is_none() && !d.warned {
                    d.warned = true;
                    tracing::warn!(path = %d.path, "property action target has no such property");
                }
                d.original = Some(value.unwrap_or(0.0));
            }
            ActionKind::Bezier(d) => {
                let original = [target.x(), target.y()];
                d.original = Some(original);
                // Absolute curves start where the target stands at capture
                // time; the whole polygon is translated to meet it.
                let start = if reversed {
                    d.points.last().copied()
                } else {
                    d.points.first().copied()
                };
                if let Some(start) = start {
                    d.shift = [original[0] - start[0], original[1] - start[1]];
                }
            }
            ActionKind::Delay
            | ActionKind::Call(_)
            | ActionKind::Sequence(_)
            | ActionKind::Hook(_) => {}
        }
    }

    /// Apply one mutation for shaped fraction `t`. Returns the applied value
    /// only when `want_value` is set; otherwise `AppliedValue::None` without
    /// materializing anything.
    pub(crate) fn update(
        &mut self,
        t: f64,
        relative: bool,
        reversed: bool,
        want_value: bool,
        info: &ActionInfo,
        target: &mut dyn ActionTarget,
    ) -> AppliedValue {
        match self {
            ActionKind::Move(d) => {
                let v = blend2(d.from, d.to, d.original.unwrap_or_default(), relative, reversed, t);
                target.set_position(v[0], v[1]);
                if want_value {
                    AppliedValue::Vec2(v)
                } else {
                    AppliedValue::None
                }
            }
            ActionKind::Rotate(d) => {
                let v = blend(d.from, d.to, d.original.unwrap_or(0.0), relative, reversed, t);
                target.set_rotation(v);
                if want_value {
                    AppliedValue::Float(v)
                } else {
                    AppliedValue::None
                }
            }
            ActionKind::Scale(d) => {
                let original = d.original.unwrap_or([1.0, 1.0]);
                let v = blend2(d.from, d.to, original, relative, reversed, t);
                target.set_scale(v[0], v[1]);
                if want_value {
                    AppliedValue::Vec2(v)
                } else {
                    AppliedValue::None
                }
            }
            ActionKind::Fade(d) => {
                let v = blend(
                    d.from.map(f64::from),
                    f64::from(d.to),
                    f64::from(d.original.unwrap_or(1.0)),
                    relative,
                    reversed,
                    t,
                );
                target.set_alpha(v as f32);
                if want_value {
                    AppliedValue::Float(v)
                } else {
                    AppliedValue::None
                }
            }
            ActionKind::Tint(d) => {
                let original = d.original.unwrap_or([1.0, 1.0, 1.0]);
                let v = if relative {
                    let delta = lerp3f(d.from.unwrap_or([0.0; 3]), d.to, t);
                    let back = if reversed { d.to } else { [0.0; 3] };
                    [
                        original[0] + delta[0] - back[0],
                        original[1] + delta[1] - back[1],
                        original[2] + delta[2] - back[2],
                    ]
                } else {
                    let start = d.from.unwrap_or(original);
                    let (a, b) = if reversed { (d.to, start) } else { (start, d.to) };
                    lerp3f(a, b, t)
                };
                target.set_tint(v);
                if want_value {
                    AppliedValue::Color3(v)
                } else {
                    AppliedValue::None
                }
            }
            ActionKind::Property(d) => {
                let v = blend(d.from, d.to, d.original.unwrap_or(0.0), relative, reversed, t);
                if !target.set_property(&d.path, v) && !d.warned {
                    d.warned = true;
                    tracing::warn!(path = %d.path, "property action target rejected property write");
                }
                if want_value {
                    AppliedValue::Float(v)
                } else {
                    AppliedValue::None
                }
            }
            ActionKind::Bezier(d) => {
                let original = d.original.unwrap_or_default();
                let v = if relative {
                    let delta = bezier_eval(&d.points, t);
                    let back = if reversed {
                        bezier_eval(&d.points, 1.0)
                    } else {
                        [0.0, 0.0]
                    };
                    [
                        original[0] + delta[0] - back[0],
                        original[1] + delta[1] - back[1],
                    ]
                } else {
                    let p = if reversed {
                        let mut rev = d.points.clone();
                        rev.reverse();
                        bezier_eval(&rev, t)
                    } else {
                        bezier_eval(&d.points, t)
                    };
                    [p[0] + d.shift[0], p[1] + d.shift[1]]
                };
                target.set_position(v[0], v[1]);
                if want_value {
                    AppliedValue::Vec2(v)
                } else {
                    AppliedValue::None
                }
            }
            ActionKind::Delay => AppliedValue::None,
            ActionKind::Call(d) => {
                if !d.fired {
                    d.fired = true;
                    let cb = Rc::clone(&d.callback);
                    cb(info, target);
                }
                AppliedValue::None
            }
            ActionKind::Sequence(_) | ActionKind::Hook(_) => AppliedValue::None,
        }
    }

    /// Set the explicit start value; shape mismatches are logged and ignored.
    pub(crate) fn set_from(&mut self, value: AppliedValue) {
        match (self, value) {
            (ActionKind::Move(d), AppliedValue::Vec2(v)) => d.from = Some(v),
            (ActionKind::Scale(d), AppliedValue::Vec2(v)) => d.from = Some(v),
            (ActionKind::Rotate(d), AppliedValue::Float(v)) => d.from = Some(v),
            (ActionKind::Fade(d), AppliedValue::Float(v)) => d.from = Some(v as f32),
            (ActionKind::Property(d), AppliedValue::Float(v)) => d.from = Some(v),
            (ActionKind::Tint(d), AppliedValue::Color3(v)) => d.from = Some(v),
            (kind, value) => {
                tracing::warn!(?value, kind = kind.tag(), "from value shape mismatch, ignored");
            }
        }
    }

    /// Set the end value; shape mismatches are logged and ignored.
    pub(crate) fn set_to(&mut self, value: AppliedValue) {
        match (self, value) {
            (ActionKind::Move(d), AppliedValue::Vec2(v)) => d.to = v,
            (ActionKind::Scale(d), AppliedValue::Vec2(v)) => d.to = v,
            (ActionKind::Rotate(d), AppliedValue::Float(v)) => d.to = v,
            (ActionKind::Fade(d), AppliedValue::Float(v)) => d.to = v as f32,
            (ActionKind::Property(d), AppliedValue::Float(v)) => d.to = v,
            (ActionKind::Tint(d), AppliedValue::Color3(v)) => d.to = v,
            (kind, value) => {
                tracing::warn!(?value, kind = kind.tag(), "to value shape mismatch, ignored");
            }
        }
    }

    /// Configuration-only deep copy: captured originals and one-shot latches
    /// reset, sequence children recurse through `Action::clone`.
    pub(crate) fn clone_config(&self) -> ActionKind {
        match self {
            ActionKind::Move(d) => ActionKind::Move(MoveData {
                original: None,
                ..d.clone()
            }),
            ActionKind::Rotate(d) => ActionKind::Rotate(RotateData {
                original: None,
                ..d.clone()
            }),
            ActionKind::Scale(d) => ActionKind::Scale(ScaleData {
                original: None,
                ..d.clone()
            }),
            ActionKind::Fade(d) => ActionKind::Fade(FadeData {
                original: None,
                ..d.clone()
            }),
            ActionKind::Tint(d) => ActionKind::Tint(TintData {
                original: None,
                ..d.clone()
            }),
            ActionKind::Property(d) => ActionKind::Property(PropertyData {
                original: None,
                warned: false,
                ..d.clone()
            }),
            ActionKind::Bezier(d) => ActionKind::Bezier(BezierData {
                original: None,
                shift: [0.0, 0.0],
                ..d.clone()
            }),
            ActionKind::Delay => ActionKind::Delay,
            ActionKind::Call(d) => ActionKind::Call(d.clone()),
            ActionKind::Sequence(body) => ActionKind::Sequence(body.clone_config()),
            ActionKind::Hook(hook) => ActionKind::Hook(hook.box_clone()),
        }
    }

    /// Reset per-run state in place (for `restart` and repeat re-arming).
    pub(crate) fn reset_runtime(&mut self) {
        match self {
            ActionKind::Move(d) => d.original = None,
            ActionKind::Rotate(d) => d.original = None,
            ActionKind::Scale(d) => d.original = None,
            ActionKind::Fade(d) => d.original = None,
            ActionKind::Tint(d) => d.original = None,
            ActionKind::Property(d) => {
                d.original = None;
                d.warned = false;
            }
            ActionKind::Bezier(d) => {
                d.original = None;
                d.shift = [0.0, 0.0];
            }
            ActionKind::Call(d) => d.fired = false,
            ActionKind::Delay | ActionKind::Hook(_) => {}
            ActionKind::Sequence(body) => {
                body.prev_local = 0.0;
                for child in &mut body.children {
                    child.re_arm();
                }
            }
        }
    }

    /// Data tag of the kind, also used as the initializer `kind` field.
    pub(crate) fn tag(&self) -> &'static str {
        match self {
            ActionKind::Move(_) => "move",
            ActionKind::Rotate(_) => "rotate",
            ActionKind::Scale(_) => "scale",
            ActionKind::Fade(_) => "fade",
            ActionKind::Tint(_) => "tint",
            ActionKind::Property(_) => "property",
            ActionKind::Bezier(_) => "bezier",
            ActionKind::Delay => "delay",
            ActionKind::Call(_) => "call",
            ActionKind::Sequence(_) => "sequence",
            ActionKind::Hook(_) => "hook",
        }
    }
}

impl Action {
    /// Move the target to an absolute position.
    pub fn move_to(x: f64, y: f64) -> Action {
        Action::from_kind(ActionKind::Move(MoveData {
            from: None,
            to: [x, y],
            original: None,
        }))
    }

    /// Move the target by a delta from wherever it stands.
    pub fn move_by(dx: f64, dy: f64) -> Action {
        let mut a = Action::move_to(dx, dy);
        a.set_relative(true);
        a
    }

    /// Rotate the target to an absolute angle, in degrees.
    pub fn rotate_to(degrees: f64) -> Action {
        Action::from_kind(ActionKind::Rotate(RotateData {
            from: None,
            to: degrees,
            original: None,
        }))
    }

    /// Rotate the target by a delta, in degrees.
    pub fn rotate_by(degrees: f64) -> Action {
        let mut a = Action::rotate_to(degrees);
        a.set_relative(true);
        a
    }

    /// Scale the target to absolute factors.
    pub fn scale_to(sx: f64, sy: f64) -> Action {
        Action::from_kind(ActionKind::Scale(ScaleData {
            from: None,
            to: [sx, sy],
            original: None,
        }))
    }

    /// Scale the target by additive deltas.
    pub fn scale_by(dx: f64, dy: f64) -> Action {
        let mut a = Action::scale_to(dx, dy);
        a.set_relative(true);
        a
    }

    /// Fade the target's opacity to an absolute value.
    pub fn fade_to(alpha: f32) -> Action {
        Action::from_kind(ActionKind::Fade(FadeData {
            from: None,
            to: alpha,
            original: None,
        }))
    }

    /// Tint the target to an absolute color.
    pub fn tint_to(tint: [f32; 3]) -> Action {
        Action::from_kind(ActionKind::Tint(TintData {
            from: None,
            to: tint,
            original: None,
        }))
    }

    /// Animate a named property to an absolute value.
    pub fn property_to(path: impl Into<String>, value: f64) -> Action {
        Action::from_kind(ActionKind::Property(PropertyData {
            path: path.into(),
            from: None,
            to: value,
            original: None,
            warned: false,
        }))
    }

    /// Animate a named property by a delta.
    pub fn property_by(path: impl Into<String>, delta: f64) -> Action {
        let mut a = Action::property_to(path, delta);
        a.set_relative(true);
        a
    }

    /// Move the target along a bezier curve given its full control polygon
    /// (first point is the curve start).
    pub fn bezier_to(points: Vec<[f64; 2]>) -> Action {
        Action::from_kind(ActionKind::Bezier(BezierData {
            points,
            shift: [0.0, 0.0],
            original: None,
        }))
    }

    /// Move the target along a bezier curve of deltas from its position.
    pub fn bezier_by(points: Vec<[f64; 2]>) -> Action {
        let mut a = Action::bezier_to(points);
        a.set_relative(true);
        a
    }

    /// Do nothing for a duration. Useful as sequence padding.
    pub fn wait(duration: Ticks) -> Action {
        let mut a = Action::from_kind(ActionKind::Delay);
        a.set_duration(duration);
        a
    }

    /// Invoke a callback once, at the action's (zero-length by default)
    /// window.
    pub fn call(f: impl Fn(&ActionInfo, &mut dyn ActionTarget) + 'static) -> Action {
        Action::from_kind(ActionKind::Call(CallData {
            callback: Rc::new(f),
            fired: false,
        }))
    }
}
