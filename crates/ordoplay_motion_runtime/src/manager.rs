// SPDX-License-Identifier: MIT OR Apache-2.0
//! The per-frame action driver.
//!
//! The manager owns every root action attached to targets in a scene and
//! advances each once per frame, in insertion order. Ended actions are swept
//! after the pass, never during it, so a callback ending a sibling cannot
//! disturb the traversal. Chained actions (`then`) are withheld until their
//! predecessor completes.

use indexmap::IndexMap;
use ordoplay_motion_action::{Action, ActionTarget, ActionToken, ActorId, TimeBase};
use std::collections::{HashMap, HashSet};

/// Resolves actor handles to live targets for the duration of one call.
///
/// The manager never owns targets; the embedding scene supplies them.
pub trait TargetStore {
    /// Resolve a handle; `None` when the target is gone.
    fn target_mut(&mut self, id: ActorId) -> Option<&mut dyn ActionTarget>;
}

impl<T: ActionTarget> TargetStore for HashMap<ActorId, T> {
    fn target_mut(&mut self, id: ActorId) -> Option<&mut dyn ActionTarget> {
        self.get_mut(&id).map(|t| t as &mut dyn ActionTarget)
    }
}

/// Stand-in target for detached actions (embedded scheduler queues); every
/// capability is inert.
struct NullTarget;

impl ActionTarget for NullTarget {
    fn x(&self) -> f64 {
        0.0
    }
    fn set_x(&mut self, _x: f64) {}
    fn y(&self) -> f64 {
        0.0
    }
    fn set_y(&mut self, _y: f64) {}
    fn rotation(&self) -> f64 {
        0.0
    }
    fn set_rotation(&mut self, _degrees: f64) {}
    fn scale_x(&self) -> f64 {
        1.0
    }
    fn set_scale_x(&mut self, _sx: f64) {}
    fn scale_y(&self) -> f64 {
        1.0
    }
    fn set_scale_y(&mut self, _sy: f64) {}
    fn alpha(&self) -> f32 {
        1.0
    }
    fn set_alpha(&mut self, _alpha: f32) {}
    fn tint(&self) -> [f32; 3] {
        [1.0, 1.0, 1.0]
    }
    fn set_tint(&mut self, _tint: [f32; 3]) {}
    fn property(&self, _path: &str) -> Option<f64> {
        None
    }
    fn set_property(&mut self, _path: &str, _value: f64) -> bool {
        false
    }
}

#[derive(Debug)]
struct Entry {
    target: Option<ActorId>,
    action: Action,
}

/// Owner and driver of all root actions for a scene.
#[derive(Debug)]
pub struct ActionManager {
    time: TimeBase,
    entries: IndexMap<ActionToken, Entry>,
    completed: HashSet<ActionToken>,
}

impl ActionManager {
    /// Create a manager with an explicit time base.
    pub fn new(time: TimeBase) -> Self {
        Self {
            time,
            entries: IndexMap::new(),
            completed: HashSet::new(),
        }
    }

    /// The manager's seconds-to-ticks conversion.
    pub fn time_base(&self) -> TimeBase {
        self.time
    }

    /// Attach an action to a target for per-frame stepping.
    pub fn run_action(&mut self, target: ActorId, action: Action) -> ActionToken {
        let token = ActionToken::new();
        self.entries.insert(
            token,
            Entry {
                target: Some(target),
                action,
            },
        );
        token
    }

    /// Attach a target-less action (an embedded scheduler queue, a pure
    /// callback timeline).
    pub fn run_detached(&mut self, action: Action) -> ActionToken {
        let token = ActionToken::new();
        self.entries.insert(
            token,
            Entry {
                target: None,
                action,
            },
        );
        token
    }

    /// Look up a live action by token.
    pub fn action(&self, token: ActionToken) -> Option<&Action> {
        self.entries.get(&token).map(|e| &e.action)
    }

    /// Look up a live action mutably by token.
    pub fn action_mut(&mut self, token: ActionToken) -> Option<&mut Action> {
        self.entries.get_mut(&token).map(|e| &mut e.action)
    }

    /// Number of live root actions.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the manager drives anything.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Advance every root action by one frame's delta, in insertion order,
    /// then sweep out ended entries.
    ///
    /// Chained entries whose predecessor has not completed are withheld:
    /// their clocks do not move. A target that can no longer be resolved
    /// ends its actions with a debug log; the frame never fails.
    pub fn step_all(&mut self, dt_seconds: f64, store: &mut dyn TargetStore) {
        let dt = self.time.ticks(dt_seconds);
        let tokens: Vec<ActionToken> = self.entries.keys().copied().collect();

        for token in tokens {
            if self.is_gated(token) {
                continue;
            }
            let Some(entry) = self.entries.get_mut(&token) else {
                continue;
            };
            match entry.target {
                Some(id) => match store.target_mut(id) {
                    Some(target) => entry.action.advance(dt, target),
                    None => {
                        tracing::debug!(?id, "action target is gone; ending its action");
                        entry.action.end();
                    }
                },
                None => entry.action.advance(dt, &mut NullTarget),
            }
        }

        // Sweep ended entries after the pass; their tokens satisfy pending
        // chains from now on.
        let completed = &mut self.completed;
        self.entries.retain(|token, entry| {
            if entry.action.is_ended() {
                completed.insert(*token);
                false
            } else {
                true
            }
        });
    }

    /// Whether a chained entry still waits on its predecessor. Releases the
    /// link as soon as the predecessor is observed complete.
    fn is_gated(&mut self, token: ActionToken) -> bool {
        let Some(entry) = self.entries.get(&token) else {
            return true;
        };
        let Some(pred) = entry.action.chain_after() else {
            return false;
        };

        let pred_done = if self.completed.contains(&pred) {
            true
        } else {
            match self.entries.get(&pred) {
                Some(pred_entry) => pred_entry.action.is_ended(),
                None => {
                    tracing::debug!(?pred, "chain predecessor was never scheduled; releasing follower");
                    true
                }
            }
        };
        if !pred_done {
            return true;
        }

        if let Some(entry) = self.entries.get_mut(&token) {
            entry.action.clear_chain_after();
        }
        // Drop the completion record once nothing else waits on it.
        if !self
            .entries
            .values()
            .any(|e| e.action.chain_after() == Some(pred))
        {
            self.completed.remove(&pred);
        }
        false
    }

    /// Cancel every action attached to a target. Swept on the next pass.
    pub fn stop_actions_for(&mut self, target: ActorId) {
        for entry in self
            .entries
            .values_mut()
            .filter(|e| e.target == Some(target))
        {
            entry.action.end();
        }
    }

    /// Cancel every action carrying a tag. Swept on the next pass.
    pub fn stop_by_tag(&mut self, tag: u32) {
        for entry in self
            .entries
            .values_mut()
            .filter(|e| e.action.tag() == Some(tag))
        {
            entry.action.end();
        }
    }

    /// Cancel everything.
    pub fn stop_all(&mut self) {
        for entry in self.entries.values_mut() {
            entry.action.end();
        }
    }

    /// Freeze every action attached to a target, firing pause observers when
    /// the target resolves.
    pub fn pause_target(&mut self, target: ActorId, store: &mut dyn TargetStore) {
        for entry in self
            .entries
            .values_mut()
            .filter(|e| e.target == Some(target))
        {
            match store.target_mut(target) {
                Some(t) => entry.action.pause(t),
                None => entry.action.set_paused(true),
            }
        }
    }

    /// Unfreeze every action attached to a target.
    pub fn resume_target(&mut self, target: ActorId, store: &mut dyn TargetStore) {
        for entry in self
            .entries
            .values_mut()
            .filter(|e| e.target == Some(target))
        {
            match store.target_mut(target) {
                Some(t) => entry.action.resume(t),
                None => entry.action.set_paused(false),
            }
        }
    }
}

impl Default for ActionManager {
    fn default() -> Self {
        Self::new(TimeBase::default())
    }
}
