// SPDX-License-Identifier: MIT OR Apache-2.0
//! Fluent action building.
//!
//! An [`ActionChainContext`] turns a linear call sequence into the right
//! action/sequence tree attached to one target, without the caller wiring
//! parents and children by hand. Configuration calls forward to the most
//! recently built action; `sequence`/`spawn` open a composite that collects
//! subsequent actions until `end_sequence`; `then` makes the next root action
//! wait for the current one to finish.
//!
//! Misuse never panics: popping with nothing open, or chaining inside an
//! open sequence, is logged and ignored with prior state preserved.

use crate::manager::ActionManager;
use ordoplay_motion_action::{
    Action, ActionInfo, ActionTarget, ActionToken, ActorId, AppliedValue, Easing, TimeBase,
};

/// Where configuration calls currently land.
enum Current {
    /// Nothing built yet
    None,
    /// A root action living in the manager
    Root(ActionToken),
    /// The innermost open sequence itself
    OpenSequence,
    /// The most recently added child of the innermost open sequence
    LastChild,
}

/// Fluent builder over one target.
///
/// Durations, delays, and intervals are given in seconds and converted
/// through the manager's time base. Dropping the builder closes any
/// still-open sequences and attaches them.
pub struct ActionChainContext<'m> {
    manager: &'m mut ActionManager,
    target: ActorId,
    time: TimeBase,
    stack: Vec<Action>,
    current: Current,
    pending_chain: Option<ActionToken>,
}

impl ActionManager {
    /// Start building actions against a target.
    pub fn chain(&mut self, target: ActorId) -> ActionChainContext<'_> {
        let time = self.time_base();
        ActionChainContext {
            manager: self,
            target,
            time,
            stack: Vec::new(),
            current: Current::None,
            pending_chain: None,
        }
    }
}

impl ActionChainContext<'_> {
    // --- building --------------------------------------------------------

    /// Attach a pre-built action: into the innermost open sequence if one is
    /// open, directly onto the target otherwise. The action becomes current.
    pub fn action(&mut self, action: Action) -> &mut Self {
        match self.stack.last_mut() {
            Some(open) => {
                open.push_child(action);
                self.current = Current::LastChild;
            }
            None => self.attach_root(action),
        }
        self
    }

    /// Open a sequential composite; subsequent actions nest inside it until
    /// `end_sequence`.
    pub fn sequence(&mut self) -> &mut Self {
        self.stack.push(Action::sequence());
        self.current = Current::OpenSequence;
        self
    }

    /// Open a parallel (spawn) composite.
    pub fn spawn(&mut self) -> &mut Self {
        self.stack.push(Action::spawn());
        self.current = Current::OpenSequence;
        self
    }

    /// Close the innermost open composite. With no open composite this is a
    /// logged no-op.
    pub fn end_sequence(&mut self) -> &mut Self {
        let Some(closed) = self.stack.pop() else {
            tracing::warn!("end_sequence with no open sequence is ignored");
            return self;
        };
        match self.stack.last_mut() {
            Some(open) => {
                open.push_child(closed);
                self.current = Current::LastChild;
            }
            None => self.attach_root(closed),
        }
        self
    }

    /// Make the next root action start when the current one ends. Only
    /// meaningful at root level; inside an open sequence the call is a
    /// logged no-op.
    pub fn then(&mut self) -> &mut Self {
        if !self.stack.is_empty() {
            tracing::warn!("then() inside an open sequence is ignored");
            return self;
        }
        match self.current {
            Current::Root(token) => self.pending_chain = Some(token),
            _ => tracing::warn!("then() with no current root action is ignored"),
        }
        self
    }

    fn attach_root(&mut self, mut action: Action) {
        if let Some(predecessor) = self.pending_chain.take() {
            action.set_chain_after(predecessor);
        }
        let token = self.manager.run_action(self.target, action);
        self.current = Current::Root(token);
    }

    // --- leaf constructors ----------------------------------------------

    /// Move to an absolute position.
    pub fn move_to(&mut self, x: f64, y: f64) -> &mut Self {
        self.action(Action::move_to(x, y))
    }

    /// Move by a delta.
    pub fn move_by(&mut self, dx: f64, dy: f64) -> &mut Self {
        self.action(Action::move_by(dx, dy))
    }

    /// Rotate to an absolute angle, in degrees.
    pub fn rotate_to(&mut self, degrees: f64) -> &mut Self {
        self.action(Action::rotate_to(degrees))
    }

    /// Rotate by a delta, in degrees.
    pub fn rotate_by(&mut self, degrees: f64) -> &mut Self {
        self.action(Action::rotate_by(degrees))
    }

    /// Scale to absolute factors.
    pub fn scale_to(&mut self, sx: f64, sy: f64) -> &mut Self {
        self.action(Action::scale_to(sx, sy))
    }

    /// Fade opacity to an absolute value.
    pub fn fade_to(&mut self, alpha: f32) -> &mut Self {
        self.action(Action::fade_to(alpha))
    }

    /// Tint to an absolute color.
    pub fn tint_to(&mut self, tint: [f32; 3]) -> &mut Self {
        self.action(Action::tint_to(tint))
    }

    /// Animate a named property to an absolute value.
    pub fn property_to(&mut self, path: impl Into<String>, value: f64) -> &mut Self {
        self.action(Action::property_to(path, value))
    }

    /// Move along a bezier control polygon.
    pub fn bezier_to(&mut self, points: Vec<[f64; 2]>) -> &mut Self {
        self.action(Action::bezier_to(points))
    }

    /// Do nothing for a duration, in seconds.
    pub fn wait(&mut self, seconds: f64) -> &mut Self {
        let ticks = self.time.ticks(seconds);
        self.action(Action::wait(ticks))
    }

    /// Invoke a callback once.
    pub fn call(&mut self, f: impl Fn(&ActionInfo, &mut dyn ActionTarget) + 'static) -> &mut Self {
        self.action(Action::call(f))
    }

    // --- configuration of the current action -----------------------------

    fn with_current(&mut self, f: impl FnOnce(&mut Action)) -> &mut Self {
        match self.current {
            Current::None => {
                tracing::warn!("configuration call with no current action is ignored");
            }
            Current::Root(token) => match self.manager.action_mut(token) {
                Some(action) => f(action),
                None => {
                    tracing::warn!("current root action is gone; configuration ignored");
                }
            },
            Current::OpenSequence => {
                if let Some(open) = self.stack.last_mut() {
                    f(open);
                }
            }
            Current::LastChild => {
                let applied = self
                    .stack
                    .last_mut()
                    .and_then(|open| open.with_last_child(f));
                if applied.is_none() {
                    tracing::warn!("current child action is gone; configuration ignored");
                }
            }
        }
        self
    }

    /// Set the current action's duration, in seconds.
    pub fn duration(&mut self, seconds: f64) -> &mut Self {
        let ticks = self.time.ticks(seconds);
        self.with_current(|a| {
            a.set_duration(ticks);
        })
    }

    /// Set the current action's start delay, in seconds.
    pub fn delay(&mut self, seconds: f64) -> &mut Self {
        let ticks = self.time.ticks(seconds);
        self.with_current(|a| {
            a.set_delay(ticks);
        })
    }

    /// Set the current action's easing curve.
    pub fn easing(&mut self, easing: Easing) -> &mut Self {
        self.with_current(|a| {
            a.set_easing(easing);
        })
    }

    /// Interpolate the current action as a delta on the captured original.
    pub fn relative(&mut self, relative: bool) -> &mut Self {
        self.with_current(|a| {
            a.set_relative(relative);
        })
    }

    /// Reverse the current action's interpolation direction.
    pub fn reversed(&mut self) -> &mut Self {
        self.with_current(|a| {
            a.set_reversed(true);
        })
    }

    /// Repeat the current action a fixed number of cycles.
    pub fn repeat(&mut self, times: u32) -> &mut Self {
        self.with_current(|a| {
            a.set_repeat_times(times);
        })
    }

    /// Repeat the current action until explicitly ended.
    pub fn repeat_forever(&mut self) -> &mut Self {
        self.with_current(|a| {
            a.set_repeat_forever();
        })
    }

    /// Set the current action's time-scale multiplier.
    pub fn speed(&mut self, speed: f64) -> &mut Self {
        self.with_current(|a| {
            a.set_speed(speed);
        })
    }

    /// Tag the current action for bulk removal.
    pub fn tag(&mut self, tag: u32) -> &mut Self {
        self.with_current(|a| {
            a.set_tag(tag);
        })
    }

    /// Set the current action's explicit start value.
    pub fn from(&mut self, value: AppliedValue) -> &mut Self {
        self.with_current(|a| {
            a.set_from(value);
        })
    }

    /// Set the current action's end value.
    pub fn to(&mut self, value: AppliedValue) -> &mut Self {
        self.with_current(|a| {
            a.set_to(value);
        })
    }

    /// Register an `on_start` callback on the current action.
    pub fn on_start(
        &mut self,
        f: impl Fn(&ActionInfo, &mut dyn ActionTarget) + 'static,
    ) -> &mut Self {
        self.with_current(move |a| {
            a.on_start(f);
        })
    }

    /// Register an `on_end` callback on the current action.
    pub fn on_end(
        &mut self,
        f: impl Fn(&ActionInfo, &mut dyn ActionTarget) + 'static,
    ) -> &mut Self {
        self.with_current(move |a| {
            a.on_end(f);
        })
    }

    /// Register an `on_repeat` callback on the current action.
    pub fn on_repeat(
        &mut self,
        f: impl Fn(&ActionInfo, &mut dyn ActionTarget, u32) + 'static,
    ) -> &mut Self {
        self.with_current(move |a| {
            a.on_repeat(f);
        })
    }

    /// Register an `on_apply` observer on the current action.
    pub fn on_apply(
        &mut self,
        f: impl Fn(&ActionInfo, &mut dyn ActionTarget, &AppliedValue) + 'static,
    ) -> &mut Self {
        self.with_current(move |a| {
            a.on_apply(f);
        })
    }

    /// The token of the current root action, for later lookup or chaining
    /// outside the builder. `None` inside an open sequence.
    pub fn token(&self) -> Option<ActionToken> {
        match self.current {
            Current::Root(token) => Some(token),
            _ => None,
        }
    }
}

impl Drop for ActionChainContext<'_> {
    /// Close and attach any sequences left open, so a dropped builder never
    /// loses work.
    fn drop(&mut self) {
        while !self.stack.is_empty() {
            self.end_sequence();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ordoplay_motion_action::BasicNode;
    use std::cell::RefCell;
    use std::collections::HashMap;
    use std::rc::Rc;

    fn init_logs() {
        let _ = tracing_subscriber::fmt().with_test_writer().try_init();
    }

    fn scene_with_node(at: (f64, f64)) -> (HashMap<ActorId, BasicNode>, ActorId) {
        let mut scene = HashMap::new();
        let id = ActorId::new();
        scene.insert(id, BasicNode::at(at.0, at.1));
        (scene, id)
    }

    #[test]
    fn test_leaf_attaches_directly_to_target() {
        let (mut scene, id) = scene_with_node((0.0, 0.0));
        let mut manager = ActionManager::default();
        manager.chain(id).move_to(100.0, 0.0).duration(1.0);

        assert_eq!(manager.len(), 1);
        manager.step_all(0.5, &mut scene);
        assert_eq!(scene[&id].x, 50.0);
    }

    #[test]
    fn test_sequence_collects_children() {
        let (mut scene, id) = scene_with_node((0.0, 0.0));
        let mut manager = ActionManager::default();
        manager
            .chain(id)
            .sequence()
            .move_to(100.0, 0.0)
            .duration(1.0)
            .fade_to(0.0)
            .duration(1.0)
            .end_sequence();

        assert_eq!(manager.len(), 1);
        manager.step_all(1.0, &mut scene);
        assert_eq!(scene[&id].x, 100.0);
        assert_eq!(scene[&id].alpha, 1.0);
        manager.step_all(1.0, &mut scene);
        assert_eq!(scene[&id].alpha, 0.0);
        assert!(manager.is_empty());
    }

    #[test]
    fn test_nested_spawn_inside_sequence() {
        let (mut scene, id) = scene_with_node((0.0, 0.0));
        let mut manager = ActionManager::default();
        manager
            .chain(id)
            .sequence()
            .move_to(10.0, 0.0)
            .duration(1.0)
            .spawn()
            .rotate_to(90.0)
            .duration(2.0)
            .fade_to(0.0)
            .duration(1.0)
            .end_sequence()
            .end_sequence();

        let token_count = manager.len();
        assert_eq!(token_count, 1);
        // 1s move, then a 2s spawn (max of its children).
        manager.step_all(3.0, &mut scene);
        assert!(manager.is_empty());
        assert_eq!(scene[&id].x, 10.0);
        assert_eq!(scene[&id].rotation, 90.0);
        assert_eq!(scene[&id].alpha, 0.0);
    }

    #[test]
    fn test_then_chains_independent_roots() {
        let (mut scene, id) = scene_with_node((0.0, 0.0));
        let mut manager = ActionManager::default();
        manager
            .chain(id)
            .move_to(100.0, 0.0)
            .duration(1.0)
            .then()
            .fade_to(0.0)
            .duration(1.0);

        assert_eq!(manager.len(), 2);
        manager.step_all(0.5, &mut scene);
        assert_eq!(scene[&id].alpha, 1.0);
        manager.step_all(0.5, &mut scene);
        manager.step_all(1.0, &mut scene);
        assert_eq!(scene[&id].x, 100.0);
        assert_eq!(scene[&id].alpha, 0.0);
    }

    #[test]
    fn test_unbalanced_end_sequence_is_ignored() {
        init_logs();
        let (mut scene, id) = scene_with_node((0.0, 0.0));
        let mut manager = ActionManager::default();
        manager
            .chain(id)
            .end_sequence()
            .move_to(5.0, 0.0)
            .duration(1.0);

        assert_eq!(manager.len(), 1);
        manager.step_all(1.0, &mut scene);
        assert_eq!(scene[&id].x, 5.0);
    }

    #[test]
    fn test_dropped_builder_flushes_open_sequences() {
        let (mut scene, id) = scene_with_node((0.0, 0.0));
        let mut manager = ActionManager::default();
        manager
            .chain(id)
            .sequence()
            .move_to(10.0, 0.0)
            .duration(1.0);
        // The builder dropped with the sequence still open.
        assert_eq!(manager.len(), 1);
        manager.step_all(1.0, &mut scene);
        assert_eq!(scene[&id].x, 10.0);
    }

    #[test]
    fn test_config_applies_to_closed_sequence() {
        let (mut scene, id) = scene_with_node((0.0, 0.0));
        let mut manager = ActionManager::default();
        let mut chain = manager.chain(id);
        chain
            .sequence()
            .move_by(10.0, 0.0)
            .duration(1.0)
            .end_sequence()
            .repeat(2);
        let token = chain.token().unwrap();
        drop(chain);

        assert_eq!(manager.action(token).unwrap().total_span(), 2000.0);
        for _ in 0..4 {
            manager.step_all(0.5, &mut scene);
        }
        manager.step_all(0.5, &mut scene);
        // Two cycles of a relative move accumulate.
        assert_eq!(scene[&id].x, 20.0);
    }

    #[test]
    fn test_callbacks_through_builder() {
        let calls = Rc::new(RefCell::new(Vec::new()));
        let (mut scene, id) = scene_with_node((0.0, 0.0));
        let mut manager = ActionManager::default();
        {
            let started = Rc::clone(&calls);
            let ended = Rc::clone(&calls);
            manager
                .chain(id)
                .move_to(10.0, 0.0)
                .duration(1.0)
                .on_start(move |_, _| started.borrow_mut().push("start"))
                .on_end(move |_, _| ended.borrow_mut().push("end"));
        }
        manager.step_all(0.5, &mut scene);
        manager.step_all(0.5, &mut scene);
        assert_eq!(*calls.borrow(), vec!["start", "end"]);
    }

    #[test]
    fn test_wait_and_call_compose() {
        let fired = Rc::new(RefCell::new(false));
        let (mut scene, id) = scene_with_node((0.0, 0.0));
        let mut manager = ActionManager::default();
        {
            let fired = Rc::clone(&fired);
            manager
                .chain(id)
                .sequence()
                .wait(1.0)
                .call(move |_, _| *fired.borrow_mut() = true)
                .end_sequence();
        }
        manager.step_all(0.5, &mut scene);
        assert!(!*fired.borrow());
        manager.step_all(0.5, &mut scene);
        assert!(*fired.borrow());
    }
}
