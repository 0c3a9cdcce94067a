// SPDX-License-Identifier: MIT OR Apache-2.0
//! The action state machine.
//!
//! An [`Action`] is a timed, interpolated mutation applied to a target once
//! per tick while inside its active window. The window is
//! `[start + delay, start + delay + duration * repeat)`; before it the action
//! is dormant, past it the action snaps to its terminal value exactly once
//! and ends. Composite and hook actions ride the same machine with derived or
//! pinned timing.
//!
//! Nothing in the tick path returns an error to the driver: a misconfigured
//! action degrades to a no-op with one log line, never a halted frame.

use crate::easing::Easing;
use crate::kinds::{ActionHook, ActionKind};
use crate::sequence::SequenceBody;
use crate::target::{ActionTarget, AppliedValue};
use crate::time::Ticks;
use serde::{Deserialize, Serialize};
use std::rc::Rc;
use uuid::Uuid;

/// Handle to an action owned by a driver.
///
/// Used by the chain builder to express "start when that one ends".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ActionToken(pub Uuid);

impl ActionToken {
    /// Create a new random token
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for ActionToken {
    fn default() -> Self {
        Self::new()
    }
}

/// Lifecycle state of an action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ActionStatus {
    /// Configured but not yet ticked into its window
    #[default]
    Created,
    /// Inside its active window
    Running,
    /// Frozen; its clock does not advance
    Paused,
    /// Terminal. Only an explicit `restart` leaves this state
    Ended,
}

/// Repetition count for an action or task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Repeat {
    /// A fixed number of full cycles
    Times(u32),
    /// Repeat until explicitly ended
    Forever,
}

impl Repeat {
    /// Finite cycle count, if any.
    pub fn count(&self) -> Option<u32> {
        match self {
            Repeat::Times(n) => Some(*n),
            Repeat::Forever => None,
        }
    }

    /// Total span of `cycles * duration`, unbounded for `Forever`.
    pub fn span(&self, duration: Ticks) -> Ticks {
        match self {
            Repeat::Times(0) => 0.0,
            Repeat::Times(n) => duration * f64::from(*n),
            Repeat::Forever => f64::INFINITY,
        }
    }
}

impl Default for Repeat {
    fn default() -> Self {
        Repeat::Times(1)
    }
}

/// Snapshot of an action's identity and timing, handed to callbacks.
///
/// Callbacks run while the action itself is mutably borrowed by `step`, so
/// they receive this by-value view instead of the action.
#[derive(Debug, Clone, Copy)]
pub struct ActionInfo {
    /// User tag, if any
    pub tag: Option<u32>,
    /// Lifecycle state at the time of the event
    pub status: ActionStatus,
    /// The action's clock, in ticks
    pub current_time: Ticks,
    /// One-cycle duration, in ticks
    pub duration: Ticks,
    /// Time-scale multiplier
    pub speed: f64,
    /// Full cycles completed so far
    pub completed_cycles: u32,
}

/// Callback fired on a lifecycle event (`on_start`, `on_end`, `on_pause`,
/// `on_resume`).
pub type EventFn = Rc<dyn Fn(&ActionInfo, &mut dyn ActionTarget)>;
/// Callback fired when a repetition boundary is crossed.
pub type RepeatFn = Rc<dyn Fn(&ActionInfo, &mut dyn ActionTarget, u32)>;
/// Callback fired after each applied mutation, with the applied value.
pub type ApplyFn = Rc<dyn Fn(&ActionInfo, &mut dyn ActionTarget, &AppliedValue)>;

/// Optional per-event callback slots.
#[derive(Clone, Default)]
pub struct Callbacks {
    pub(crate) on_start: Option<EventFn>,
    pub(crate) on_end: Option<EventFn>,
    pub(crate) on_pause: Option<EventFn>,
    pub(crate) on_resume: Option<EventFn>,
    pub(crate) on_repeat: Option<RepeatFn>,
    pub(crate) on_apply: Option<ApplyFn>,
}

impl std::fmt::Debug for Callbacks {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Callbacks")
            .field("on_start", &self.on_start.is_some())
            .field("on_end", &self.on_end.is_some())
            .field("on_repeat", &self.on_repeat.is_some())
            .field("on_apply", &self.on_apply.is_some())
            .finish()
    }
}

enum Event {
    Start,
    End,
    Pause,
    Resume,
}

/// A timed mutation unit.
///
/// Common timing state plus a kind payload; the payload decides what one
/// application actually mutates. Configuration setters return `&mut Self` so
/// they chain.
#[derive(Debug)]
pub struct Action {
    pub(crate) kind: ActionKind,
    pub(crate) start_time: Ticks,
    pub(crate) duration: Ticks,
    pub(crate) current_time: Ticks,
    pub(crate) speed: f64,
    pub(crate) delay: Ticks,
    pub(crate) repeat: Repeat,
    pub(crate) completed_cycles: u32,
    pub(crate) relative: bool,
    pub(crate) reversed: bool,
    pub(crate) easing: Easing,
    pub(crate) tag: Option<u32>,
    pub(crate) status: ActionStatus,
    pub(crate) callbacks: Callbacks,
    pub(crate) chain_after: Option<ActionToken>,
    pub(crate) initialized: bool,
    pub(crate) started: bool,
}

impl Action {
    pub(crate) fn from_kind(kind: ActionKind) -> Self {
        let status = match kind {
            ActionKind::Hook(_) => ActionStatus::Running,
            _ => ActionStatus::Created,
        };
        let repeat = match kind {
            ActionKind::Hook(_) => Repeat::Forever,
            _ => Repeat::Times(1),
        };
        Self {
            kind,
            start_time: 0.0,
            duration: 0.0,
            current_time: 0.0,
            speed: 1.0,
            delay: 0.0,
            repeat,
            completed_cycles: 0,
            relative: false,
            reversed: false,
            easing: Easing::Linear,
            tag: None,
            status,
            callbacks: Callbacks::default(),
            chain_after: None,
            initialized: false,
            started: false,
        }
    }

    /// Wrap a foreign tick body as an action with pinned timing (duration 0,
    /// repeat forever, already running).
    pub fn from_hook(hook: Box<dyn ActionHook>) -> Self {
        Self::from_kind(ActionKind::Hook(hook))
    }

    // --- configuration ---------------------------------------------------

    /// Timing is derived for sequences and pinned for hooks; their setters
    /// are accepted and ignored.
    fn timing_is_fixed(&self) -> bool {
        matches!(self.kind, ActionKind::Sequence(_) | ActionKind::Hook(_))
    }

    /// Set the one-cycle duration, in ticks. Negative input clamps to zero.
    pub fn set_duration(&mut self, duration: Ticks) -> &mut Self {
        if self.timing_is_fixed() {
            tracing::debug!("ignoring set_duration on derived-timing action");
            return self;
        }
        self.duration = duration.max(0.0);
        self
    }

    /// Set delay and duration together, optionally with an easing curve.
    pub fn time_info(
        &mut self,
        delay: Ticks,
        duration: Ticks,
        easing: Option<Easing>,
    ) -> &mut Self {
        if self.timing_is_fixed() {
            tracing::debug!("ignoring time_info on derived-timing action");
            return self;
        }
        self.delay = delay.max(0.0);
        self.duration = duration.max(0.0);
        if let Some(easing) = easing {
            self.easing = easing;
        }
        self
    }

    /// Set the delay before the active window opens, in ticks.
    pub fn set_delay(&mut self, delay: Ticks) -> &mut Self {
        if self.timing_is_fixed() {
            tracing::debug!("ignoring set_delay on derived-timing action");
            return self;
        }
        self.delay = delay.max(0.0);
        self
    }

    /// Repeat a fixed number of full cycles. A repeating sequence re-arms
    /// every descendant on each boundary, so nested callbacks fire again per
    /// outer cycle.
    pub fn set_repeat_times(&mut self, times: u32) -> &mut Self {
        if matches!(self.kind, ActionKind::Hook(_)) {
            tracing::debug!("ignoring set_repeat_times on pinned-timing action");
            return self;
        }
        self.repeat = Repeat::Times(times);
        self
    }

    /// Repeat until explicitly ended.
    pub fn set_repeat_forever(&mut self) -> &mut Self {
        if matches!(self.kind, ActionKind::Hook(_)) {
            tracing::debug!("ignoring set_repeat_forever on pinned-timing action");
            return self;
        }
        self.repeat = Repeat::Forever;
        self
    }

    /// Interpolate a delta on top of the captured original value instead of
    /// replacing it.
    pub fn set_relative(&mut self, relative: bool) -> &mut Self {
        self.relative = relative;
        self
    }

    /// Set the reversal flag. Reversing a sequence flips its child order and
    /// recursively reverses every child.
    pub fn set_reversed(&mut self, reversed: bool) -> &mut Self {
        if reversed != self.reversed {
            self.apply_reversal();
        }
        self
    }

    /// Set the time-scale multiplier.
    pub fn set_speed(&mut self, speed: f64) -> &mut Self {
        self.speed = speed;
        self
    }

    /// Set the easing curve.
    pub fn set_easing(&mut self, easing: Easing) -> &mut Self {
        self.easing = easing;
        self
    }

    /// Tag the action for bulk lookup/removal.
    pub fn set_tag(&mut self, tag: u32) -> &mut Self {
        self.tag = Some(tag);
        self
    }

    /// Defer this action until the action behind `token` has ended.
    pub fn set_chain_after(&mut self, token: ActionToken) -> &mut Self {
        self.chain_after = Some(token);
        self
    }

    /// Release the chain link once the predecessor has completed.
    pub fn clear_chain_after(&mut self) -> &mut Self {
        self.chain_after = None;
        self
    }

    /// Register the start-of-window callback.
    pub fn on_start(&mut self, f: impl Fn(&ActionInfo, &mut dyn ActionTarget) + 'static) -> &mut Self {
        self.callbacks.on_start = Some(Rc::new(f));
        self
    }

    /// Register the terminal callback. Fires exactly once, after the final
    /// mutation has been applied.
    pub fn on_end(&mut self, f: impl Fn(&ActionInfo, &mut dyn ActionTarget) + 'static) -> &mut Self {
        self.callbacks.on_end = Some(Rc::new(f));
        self
    }

    /// Register the pause callback.
    pub fn on_pause(&mut self, f: impl Fn(&ActionInfo, &mut dyn ActionTarget) + 'static) -> &mut Self {
        self.callbacks.on_pause = Some(Rc::new(f));
        self
    }

    /// Register the resume callback.
    pub fn on_resume(&mut self, f: impl Fn(&ActionInfo, &mut dyn ActionTarget) + 'static) -> &mut Self {
        self.callbacks.on_resume = Some(Rc::new(f));
        self
    }

    /// Register the repetition-boundary callback.
    pub fn on_repeat(
        &mut self,
        f: impl Fn(&ActionInfo, &mut dyn ActionTarget, u32) + 'static,
    ) -> &mut Self {
        self.callbacks.on_repeat = Some(Rc::new(f));
        self
    }

    /// Register the per-application observer. When no observer is registered
    /// the applied value is never materialized for it.
    pub fn on_apply(
        &mut self,
        f: impl Fn(&ActionInfo, &mut dyn ActionTarget, &AppliedValue) + 'static,
    ) -> &mut Self {
        self.callbacks.on_apply = Some(Rc::new(f));
        self
    }

    /// Set the interpolation start value. Marks the start as explicitly set;
    /// otherwise it is captured lazily from the target. A value whose shape
    /// does not match the action kind is logged and ignored.
    pub fn set_from(&mut self, value: AppliedValue) -> &mut Self {
        self.kind.set_from(value);
        self
    }

    /// Set the interpolation end value. A value whose shape does not match
    /// the action kind is logged and ignored.
    pub fn set_to(&mut self, value: AppliedValue) -> &mut Self {
        self.kind.set_to(value);
        self
    }

    // --- queries ---------------------------------------------------------

    /// Lifecycle state.
    pub fn status(&self) -> ActionStatus {
        self.status
    }

    /// Whether the action has reached its terminal state.
    pub fn is_ended(&self) -> bool {
        self.status == ActionStatus::Ended
    }

    /// One-cycle duration, in ticks. Derived for sequences.
    pub fn duration(&self) -> Ticks {
        self.duration
    }

    /// The action's clock, in ticks.
    pub fn current_time(&self) -> Ticks {
        self.current_time
    }

    /// User tag, if any.
    pub fn tag(&self) -> Option<u32> {
        self.tag
    }

    /// Time-scale multiplier.
    pub fn speed(&self) -> f64 {
        self.speed
    }

    /// Whether the action interpolates a relative delta.
    pub fn is_relative(&self) -> bool {
        self.relative
    }

    /// Whether the interpolation direction is inverted.
    pub fn is_reversed(&self) -> bool {
        self.reversed
    }

    /// The chain predecessor token, if this action waits on another.
    pub fn chain_after(&self) -> Option<ActionToken> {
        self.chain_after
    }

    /// Total active span: `duration * repeat`, unbounded for `Forever`.
    pub fn total_span(&self) -> Ticks {
        self.repeat.span(self.duration)
    }

    /// Occupancy inside a parent timeline: delay plus total span.
    pub(crate) fn window_len(&self) -> Ticks {
        self.delay + self.total_span()
    }

    pub(crate) fn info(&self) -> ActionInfo {
        ActionInfo {
            tag: self.tag,
            status: self.status,
            current_time: self.current_time,
            duration: self.duration,
            speed: self.speed,
            completed_cycles: self.completed_cycles,
        }
    }

    // --- lifecycle -------------------------------------------------------

    /// Capture the target's current values for relative interpolation and for
    /// lazily-defaulted start values. Called by the driver once before the
    /// first `step`; stepping also triggers it on the first applicable tick.
    ///
    /// Sequence children capture at their own first applicable tick, not
    /// here, so that a later child observes the mutations of earlier ones.
    pub fn init_with_target(&mut self, target: &dyn ActionTarget) {
        if self.initialized {
            return;
        }
        let reversed = self.reversed;
        self.kind.capture(target, reversed);
        self.initialized = true;
    }

    /// Advance the action's clock to an absolute time and apply side effects
    /// if applicable. The single entry point for drivers and parents.
    pub fn step(&mut self, now: Ticks, target: &mut dyn ActionTarget) {
        if matches!(self.status, ActionStatus::Ended | ActionStatus::Paused) {
            return;
        }
        self.current_time = now.max(0.0);
        self.step_impl(target);
    }

    /// Advance the action's clock by a delta, scaled by `speed`. Paused and
    /// ended actions do not move.
    pub fn advance(&mut self, dt: Ticks, target: &mut dyn ActionTarget) {
        if matches!(self.status, ActionStatus::Ended | ActionStatus::Paused) {
            return;
        }
        self.current_time = (self.current_time + dt * self.speed).max(0.0);
        self.step_impl(target);
    }

    fn step_impl(&mut self, target: &mut dyn ActionTarget) {
        if let ActionKind::Hook(hook) = &mut self.kind {
            hook.tick(self.current_time);
            return;
        }

        let begin = self.start_time + self.delay;
        let now = self.current_time;
        if now < begin {
            return;
        }

        if !self.initialized {
            self.init_with_target(target);
        }

        if !self.started {
            self.started = true;
            self.status = ActionStatus::Running;
            self.fire(Event::Start, target);
        }

        let span = self.total_span();
        if now >= begin + span {
            self.finish(target);
            return;
        }

        if self.duration <= 0.0 {
            // Zero duration repeating forever: the terminal value every tick.
            self.apply_leaf(1.0, target);
            return;
        }

        let local = now - begin;
        let cycle_f = (local / self.duration).floor();
        let cycle = if cycle_f >= f64::from(u32::MAX) {
            u32::MAX
        } else {
            cycle_f as u32
        };
        let in_cycle = local - cycle_f * self.duration;

        if let ActionKind::Sequence(_) = self.kind {
            self.step_sequence(cycle, in_cycle, target);
        } else {
            if cycle != self.completed_cycles {
                self.completed_cycles = cycle;
                self.fire_repeat(target, cycle);
            }
            let t = f64::from(self.easing.transform((in_cycle / self.duration) as f32));
            self.apply_leaf(t, target);
        }
    }

    /// Step children of a sequence for this tick. `cycle` is the
    /// sequence-level repetition index, `within` the time into that cycle.
    fn step_sequence(&mut self, cycle: u32, within: Ticks, target: &mut dyn ActionTarget) {

        if cycle != self.completed_cycles {
            // Close out the previous repetition: every child reaches its
            // terminal value, then all bookkeeping re-arms so nested
            // on_start/on_end fire again in the new cycle.
            if let ActionKind::Sequence(body) = &mut self.kind {
                for child in &mut body.children {
                    child.force_finish(target);
                }
                for child in &mut body.children {
                    child.re_arm();
                }
                body.prev_local = 0.0;
            }
            self.completed_cycles = cycle;
            self.fire_repeat(target, cycle);
        }

        if let ActionKind::Sequence(body) = &mut self.kind {
            let delta = within - body.prev_local;
            if delta > 0.0 {
                for child in &mut body.children {
                    child.advance(delta, target);
                }
            }
            body.prev_local = within;
        }
    }

    fn apply_leaf(&mut self, t: f64, target: &mut dyn ActionTarget) {
        let relative = self.relative;
        let reversed = self.reversed;
        let want_value = self.callbacks.on_apply.is_some();
        let info = self.info();
        let value = self
            .kind
            .update(t, relative, reversed, want_value, &info, target);
        if want_value {
            if let Some(cb) = self.callbacks.on_apply.clone() {
                cb(&info, target, &value);
            }
        }
    }

    /// Snap to the terminal state exactly once: apply the final value, fire
    /// `on_end`, transition to `Ended`.
    fn finish(&mut self, target: &mut dyn ActionTarget) {
        match &mut self.kind {
            ActionKind::Sequence(body) => {
                for child in &mut body.children {
                    child.force_finish(target);
                }
            }
            ActionKind::Hook(_) => {}
            _ => {
                if let Some(n) = self.repeat.count() {
                    if n > 0 && self.duration > 0.0 {
                        self.completed_cycles = n - 1;
                    }
                }
                self.apply_leaf(1.0, target);
            }
        }
        self.status = ActionStatus::Ended;
        self.fire(Event::End, target);
    }

    /// Drive the action to its terminal state, firing the remaining
    /// callbacks. Unbounded actions are ended without a final value.
    pub(crate) fn force_finish(&mut self, target: &mut dyn ActionTarget) {
        if self.is_ended() {
            return;
        }
        let span = self.total_span();
        if span.is_finite() {
            self.status = ActionStatus::Running;
            self.current_time = self.start_time + self.delay + span;
            self.step_impl(target);
        } else {
            self.status = ActionStatus::Ended;
        }
    }

    /// Reset run-state bookkeeping so the action plays again inside a
    /// repeating parent. Captured originals are dropped and re-captured.
    pub(crate) fn re_arm(&mut self) {
        if matches!(self.kind, ActionKind::Hook(_)) {
            return;
        }
        self.status = ActionStatus::Created;
        self.current_time = 0.0;
        self.completed_cycles = 0;
        self.started = false;
        self.initialized = false;
        self.kind.reset_runtime();
    }

    /// Reset clocks and flags so a finished or running action plays from the
    /// start. The only way out of the terminal state.
    pub fn restart(&mut self) -> &mut Self {
        self.re_arm();
        self
    }

    /// Freeze the action. Its clock stops advancing until `resume`.
    pub fn pause(&mut self, target: &mut dyn ActionTarget) {
        if matches!(self.status, ActionStatus::Ended | ActionStatus::Paused) {
            return;
        }
        self.status = ActionStatus::Paused;
        self.fire(Event::Pause, target);
    }

    /// Unfreeze a paused action.
    pub fn resume(&mut self, target: &mut dyn ActionTarget) {
        if self.status != ActionStatus::Paused {
            return;
        }
        self.status = if self.started {
            ActionStatus::Running
        } else {
            ActionStatus::Created
        };
        self.fire(Event::Resume, target);
    }

    /// Freeze or unfreeze without firing observers. For owners that cannot
    /// resolve the target (detached or dropped).
    pub fn set_paused(&mut self, paused: bool) {
        match (paused, self.status) {
            (true, ActionStatus::Created | ActionStatus::Running) => {
                self.status = ActionStatus::Paused;
            }
            (false, ActionStatus::Paused) => {
                self.status = if self.started {
                    ActionStatus::Running
                } else {
                    ActionStatus::Created
                };
            }
            _ => {}
        }
    }

    /// Cancel: transition to the terminal state without applying a final
    /// value or firing `on_end`. The owning collection sweeps the action on
    /// its next pass.
    pub fn end(&mut self) {
        self.status = ActionStatus::Ended;
    }

    /// Clone with the reversal flag toggled. The standard way to build
    /// "there and back" timelines.
    pub fn reverse(&self) -> Action {
        let mut reversed = self.clone();
        reversed.apply_reversal();
        reversed
    }

    pub(crate) fn apply_reversal(&mut self) {
        self.reversed = !self.reversed;
        if let ActionKind::Sequence(body) = &mut self.kind {
            body.children.reverse();
            for child in &mut body.children {
                child.apply_reversal();
            }
            self.duration = body.resequence();
        }
    }

    fn fire(&mut self, event: Event, target: &mut dyn ActionTarget) {
        let cb = match event {
            Event::Start => self.callbacks.on_start.clone(),
            Event::End => self.callbacks.on_end.clone(),
            Event::Pause => self.callbacks.on_pause.clone(),
            Event::Resume => self.callbacks.on_resume.clone(),
        };
        if let Some(cb) = cb {
            let info = self.info();
            cb(&info, target);
        }
    }

    fn fire_repeat(&mut self, target: &mut dyn ActionTarget, cycle: u32) {
        if let Some(cb) = self.callbacks.on_repeat.clone() {
            let info = self.info();
            cb(&info, target, cycle);
        }
    }

    // --- composition -----------------------------------------------------

    /// Append a child to a sequence. Start offsets and the derived duration
    /// are recomputed immediately. Ignored with a warning on non-sequence
    /// actions.
    pub fn push_child(&mut self, child: Action) -> &mut Self {
        match &mut self.kind {
            ActionKind::Sequence(body) => {
                body.children.push(child);
                self.duration = body.resequence();
            }
            _ => {
                tracing::warn!("push_child on a non-sequence action is ignored");
            }
        }
        self
    }

    /// Children of a sequence, empty for other kinds.
    pub fn children(&self) -> &[Action] {
        match &self.kind {
            ActionKind::Sequence(body) => &body.children,
            _ => &[],
        }
    }

    /// Mutate the most recently added child of a sequence, then re-derive
    /// start offsets and duration (the mutation may have changed the child's
    /// timing). `None` when this is not a sequence or it has no children.
    pub fn with_last_child<R>(&mut self, f: impl FnOnce(&mut Action) -> R) -> Option<R> {
        match &mut self.kind {
            ActionKind::Sequence(body) => {
                let result = body.children.last_mut().map(f);
                if result.is_some() {
                    self.duration = body.resequence();
                }
                result
            }
            _ => None,
        }
    }

    /// Whether this sequence runs its children back-to-back (`true`) or all
    /// in parallel (`false`). `None` for non-sequence actions.
    pub fn is_sequential(&self) -> Option<bool> {
        match &self.kind {
            ActionKind::Sequence(body) => Some(body.sequential),
            _ => None,
        }
    }
}

impl Clone for Action {
    /// Deep-copies configuration, not runtime state: the clone starts with
    /// fresh clocks, no captured originals, and `Created` status.
    fn clone(&self) -> Self {
        let kind = self.kind.clone_config();
        let status = match kind {
            ActionKind::Hook(_) => ActionStatus::Running,
            _ => ActionStatus::Created,
        };
        Self {
            kind,
            start_time: self.start_time,
            duration: self.duration,
            current_time: 0.0,
            speed: self.speed,
            delay: self.delay,
            repeat: self.repeat,
            completed_cycles: 0,
            relative: self.relative,
            reversed: self.reversed,
            easing: self.easing,
            tag: self.tag,
            status,
            callbacks: self.callbacks.clone(),
            chain_after: self.chain_after,
            initialized: false,
            started: false,
        }
    }
}

impl Action {
    /// Build an empty sequential sequence.
    pub fn sequence() -> Action {
        Action::from_kind(ActionKind::Sequence(SequenceBody::new(true)))
    }

    /// Build an empty parallel (spawn) sequence.
    pub fn spawn() -> Action {
        Action::from_kind(ActionKind::Sequence(SequenceBody::new(false)))
    }

    /// Build a sequence from children, sequential or spawn.
    pub fn sequence_of(children: Vec<Action>, sequential: bool) -> Action {
        let mut seq = if sequential {
            Action::sequence()
        } else {
            Action::spawn()
        };
        for child in children {
            seq.push_child(child);
        }
        seq
    }
}
