// SPDX-License-Identifier: MIT OR Apache-2.0
//! Independent timer records.
//!
//! A task is a deferred or periodic callback with its own interval, repeat
//! count, delay, and priority, decoupled from any property-mutation
//! timeline. Tasks never burst: no matter how large a frame stall was, at
//! most one firing happens per tick, and the elapsed value handed to the
//! callback reflects real elapsed time since its previous firing.

use ordoplay_motion_action::{ActorId, Repeat, Ticks};
use std::cell::RefCell;
use std::rc::Rc;

/// Identity of a task's callback.
///
/// Closures have no observable identity, so the (target, key) pair is what
/// deduplicates scheduling: the same pair never yields two live tasks.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TaskKey(pub String);

impl From<&str> for TaskKey {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for TaskKey {
    fn from(value: String) -> Self {
        Self(value)
    }
}

/// Lifecycle state of a task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TaskStatus {
    /// Eligible to fire
    #[default]
    Running,
    /// Frozen; bookkeeping does not advance
    Paused,
    /// Terminal; swept by the owning queue on its next pass
    Ended,
}

/// Callback invoked with real elapsed ticks since the previous firing.
pub type TaskFn = Rc<RefCell<dyn FnMut(Ticks)>>;

/// A single timer record owned by a queue.
pub struct SchedulerQueueTask {
    pub(crate) target: Option<ActorId>,
    pub(crate) key: TaskKey,
    pub(crate) callback: TaskFn,
    pub(crate) interval: Ticks,
    pub(crate) repeat: Repeat,
    pub(crate) delay: Ticks,
    pub(crate) priority: i32,
    pub(crate) status: TaskStatus,
    pub(crate) start_time: Ticks,
    pub(crate) prev_time: Ticks,
    pub(crate) prev_fire_time: Ticks,
    pub(crate) prev_shot: u64,
    pub(crate) fired: u32,
    pub(crate) paused_at: Option<Ticks>,
}

impl std::fmt::Debug for SchedulerQueueTask {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SchedulerQueueTask")
            .field("target", &self.target)
            .field("key", &self.key)
            .field("interval", &self.interval)
            .field("repeat", &self.repeat)
            .field("priority", &self.priority)
            .field("status", &self.status)
            .field("fired", &self.fired)
            .finish()
    }
}

impl SchedulerQueueTask {
    pub(crate) fn new(
        target: Option<ActorId>,
        key: TaskKey,
        callback: TaskFn,
        interval: Ticks,
        repeat: Repeat,
        delay: Ticks,
        priority: i32,
        now: Ticks,
    ) -> Self {
        Self {
            target,
            key,
            callback,
            interval: interval.max(0.0),
            repeat,
            delay: delay.max(0.0),
            priority,
            status: TaskStatus::Running,
            start_time: now + delay.max(0.0),
            prev_time: now,
            prev_fire_time: now,
            prev_shot: 0,
            fired: 0,
            paused_at: None,
        }
    }

    /// Scheduled target, if any.
    pub fn target(&self) -> Option<ActorId> {
        self.target
    }

    /// Callback identity key.
    pub fn key(&self) -> &TaskKey {
        &self.key
    }

    /// Queue ordering priority; lower fires earlier within a tick.
    pub fn priority(&self) -> i32 {
        self.priority
    }

    /// Lifecycle state.
    pub fn status(&self) -> TaskStatus {
        self.status
    }

    /// Firing interval, in ticks. Zero means every tick.
    pub fn interval(&self) -> Ticks {
        self.interval
    }

    /// How many times the task has fired so far.
    pub fn times_fired(&self) -> u32 {
        self.fired
    }

    /// The queue time this task last observed.
    pub fn last_stepped(&self) -> Ticks {
        self.prev_time
    }

    /// Advance the task's timing to `now` and decide whether it fires.
    ///
    /// All bookkeeping (fire count, shot index, terminal transition) happens
    /// here; the owning queue invokes the returned callback, so a firing
    /// callback can freely mutate the queue through a shared handle.
    pub(crate) fn step(&mut self, now: Ticks) -> Option<(TaskFn, Ticks)> {
        match self.status {
            TaskStatus::Paused | TaskStatus::Ended => return None,
            TaskStatus::Running => {}
        }
        self.prev_time = now;
        if now < self.start_time {
            return None;
        }

        let periodic = self.interval > 0.0 && self.repeat.count() != Some(0);
        if periodic {
            // Boundary-crossing firing: the shot index is how many full
            // intervals fit since start. At most one fire per tick; the index
            // jumps across missed boundaries, so a stalled frame still
            // converges on the exact total count over subsequent ticks.
            let shot = ((now - self.start_time) / self.interval) as u64;
            if shot <= self.prev_shot {
                return None;
            }
            self.prev_shot = shot;
            let fire = self.arm_fire(now);
            if let Some(limit) = self.repeat.count() {
                if self.fired >= limit {
                    self.status = TaskStatus::Ended;
                }
            }
            Some(fire)
        } else {
            // Single shot or every-frame: fires unconditionally while
            // running. A zero repeat means one firing total.
            let fire = self.arm_fire(now);
            if let Some(limit) = self.repeat.count() {
                if self.fired >= limit.max(1) {
                    self.status = TaskStatus::Ended;
                }
            }
            Some(fire)
        }
    }

    fn arm_fire(&mut self, now: Ticks) -> (TaskFn, Ticks) {
        let elapsed = now - self.prev_fire_time;
        self.prev_fire_time = now;
        self.fired += 1;
        (Rc::clone(&self.callback), elapsed)
    }

    /// Freeze the task. Progress truly stops: resuming shifts the schedule
    /// forward by the paused span.
    pub(crate) fn pause(&mut self, now: Ticks) {
        if self.status == TaskStatus::Running {
            self.status = TaskStatus::Paused;
            self.paused_at = Some(now);
        }
    }

    pub(crate) fn resume(&mut self, now: Ticks) {
        if self.status != TaskStatus::Paused {
            return;
        }
        if let Some(paused_at) = self.paused_at.take() {
            let frozen = (now - paused_at).max(0.0);
            self.start_time += frozen;
            self.prev_fire_time += frozen;
        }
        self.status = TaskStatus::Running;
    }

    pub(crate) fn end(&mut self) {
        self.status = TaskStatus::Ended;
    }
}
