// SPDX-License-Identifier: MIT OR Apache-2.0
//! The priority task queue.
//!
//! A queue owns its tasks, keeps them sorted by ascending priority with
//! stable ties, and evaluates every task once per tick. Tasks scheduled while
//! a tick is in flight only start running on the next tick, and removal of
//! ended tasks is a full second pass because a firing callback may end
//! arbitrary siblings, not only itself.
//!
//! Wrapped in a [`SharedSchedulerQueue`], a queue rides the action tick
//! protocol as a zero-duration, repeat-forever, always-running action.

use crate::task::{SchedulerQueueTask, TaskFn, TaskKey, TaskStatus};
use ordoplay_motion_action::{Action, ActionHook, ActorId, Repeat, Ticks};
use std::cell::RefCell;
use std::rc::Rc;

/// Priority-ordered collection of timer tasks.
#[derive(Debug, Default)]
pub struct SchedulerQueue {
    tasks: Vec<SchedulerQueueTask>,
    now: Ticks,
}

impl SchedulerQueue {
    /// Create an empty queue.
    pub fn new() -> Self {
        Self {
            tasks: Vec::new(),
            now: 0.0,
        }
    }

    /// Schedule a callback, or update it if the (target, key) pair is
    /// already scheduled.
    ///
    /// A hit updates the existing task's interval and callback and revives
    /// it with fresh bookkeeping if it had ended; priority and delay of a
    /// live task are left alone. Default priority for new tasks is 0.
    pub fn schedule(
        &mut self,
        target: Option<ActorId>,
        key: impl Into<TaskKey>,
        callback: impl FnMut(Ticks) + 'static,
        interval: Ticks,
        repeat: Repeat,
        delay: Ticks,
        priority: i32,
    ) {
        let key = key.into();
        let callback: TaskFn = Rc::new(RefCell::new(callback));
        if let Some(task) = self
            .tasks
            .iter_mut()
            .find(|t| t.target == target && t.key == key)
        {
            tracing::debug!(key = %task.key.0, "rescheduling an existing task updates it in place");
            task.interval = interval.max(0.0);
            task.callback = callback;
            if task.status == TaskStatus::Ended {
                task.status = TaskStatus::Running;
                task.start_time = self.now + task.delay;
                task.prev_fire_time = self.now;
                task.prev_shot = 0;
                task.fired = 0;
            }
            return;
        }
        let task = SchedulerQueueTask::new(
            target, key, callback, interval, repeat, delay, priority, self.now,
        );
        self.insert_task(task);
    }

    /// Insert keeping the list sorted by ascending priority; an equal
    /// priority lands after the existing entries, so same-priority tasks
    /// keep their scheduling order.
    pub fn insert_task(&mut self, task: SchedulerQueueTask) {
        let at = self.tasks.partition_point(|t| t.priority <= task.priority);
        self.tasks.insert(at, task);
    }

    /// Evaluate every task for this tick, then sweep out ended tasks.
    ///
    /// Callbacks are invoked inline. If callbacks need to reach back into
    /// this queue (cancel siblings, schedule more work), drive the queue
    /// through a [`SharedSchedulerQueue`] instead.
    pub fn update(&mut self, now: Ticks) {
        let len = self.snapshot(now);
        for index in 0..len {
            if let Some((callback, elapsed)) = self.step_task(index) {
                (callback.borrow_mut())(elapsed);
            }
        }
        self.sweep();
    }

    /// Begin a tick: record the time and snapshot the task count. Tasks
    /// scheduled during this tick sit past the snapshot and run next tick.
    pub(crate) fn snapshot(&mut self, now: Ticks) -> usize {
        self.now = now;
        self.tasks.len()
    }

    /// Advance one task's timing; the caller invokes the returned callback.
    pub(crate) fn step_task(&mut self, index: usize) -> Option<(TaskFn, Ticks)> {
        let now = self.now;
        self.tasks.get_mut(index).and_then(|task| task.step(now))
    }

    /// Remove every ended task, scanning the entire list from the back so
    /// removals do not disturb the indices still to visit.
    pub(crate) fn sweep(&mut self) {
        for index in (0..self.tasks.len()).rev() {
            if self.tasks[index].status() == TaskStatus::Ended {
                self.tasks.remove(index);
            }
        }
    }

    /// Freeze every task bound to a target.
    pub fn pause_target(&mut self, target: ActorId) {
        let now = self.now;
        for task in self.tasks.iter_mut().filter(|t| t.target == Some(target)) {
            task.pause(now);
        }
    }

    /// Unfreeze every task bound to a target.
    pub fn resume_target(&mut self, target: ActorId) {
        let now = self.now;
        for task in self.tasks.iter_mut().filter(|t| t.target == Some(target)) {
            task.resume(now);
        }
    }

    /// Cancel one (target, key) pair. The task is swept on the next tick.
    pub fn unschedule(&mut self, target: Option<ActorId>, key: &TaskKey) {
        for task in self
            .tasks
            .iter_mut()
            .filter(|t| t.target == target && t.key == *key)
        {
            task.end();
        }
    }

    /// Cancel every task bound to a target.
    pub fn unschedule_all_for_target(&mut self, target: ActorId) {
        for task in self.tasks.iter_mut().filter(|t| t.target == Some(target)) {
            task.end();
        }
    }

    /// Cancel every task in the queue.
    pub fn unschedule_all(&mut self) {
        for task in &mut self.tasks {
            task.end();
        }
    }

    /// Live tasks in iteration (priority) order.
    pub fn iter(&self) -> impl Iterator<Item = &SchedulerQueueTask> {
        self.tasks.iter()
    }

    /// Number of tasks currently held, ended-but-unswept included.
    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    /// Whether the queue holds no tasks.
    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// The queue's clock as of the last tick.
    pub fn now(&self) -> Ticks {
        self.now
    }
}

/// Shared handle to a queue, for driving it from the action protocol while
/// callers elsewhere keep scheduling into it.
///
/// During a tick the queue borrow is released around each callback
/// invocation, so a firing callback may schedule new tasks or cancel
/// siblings through a clone of this handle.
#[derive(Debug, Clone, Default)]
pub struct SharedSchedulerQueue(Rc<RefCell<SchedulerQueue>>);

impl SharedSchedulerQueue {
    /// Create a handle to a fresh queue.
    pub fn new() -> Self {
        Self(Rc::new(RefCell::new(SchedulerQueue::new())))
    }

    /// Wrap the queue as an action with pinned timing: duration 0, repeat
    /// forever, always running. Timing setters on the returned action are
    /// accepted and ignored.
    pub fn as_action(&self) -> Action {
        Action::from_hook(Box::new(self.clone()))
    }

    /// See [`SchedulerQueue::schedule`].
    pub fn schedule(
        &self,
        target: Option<ActorId>,
        key: impl Into<TaskKey>,
        callback: impl FnMut(Ticks) + 'static,
        interval: Ticks,
        repeat: Repeat,
        delay: Ticks,
        priority: i32,
    ) {
        self.0
            .borrow_mut()
            .schedule(target, key, callback, interval, repeat, delay, priority);
    }

    /// Reentrancy-safe tick: the queue borrow is dropped around every
    /// callback invocation.
    pub fn update(&self, now: Ticks) {
        let len = self.0.borrow_mut().snapshot(now);
        for index in 0..len {
            let fire = self.0.borrow_mut().step_task(index);
            if let Some((callback, elapsed)) = fire {
                (callback.borrow_mut())(elapsed);
            }
        }
        self.0.borrow_mut().sweep();
    }

    /// See [`SchedulerQueue::pause_target`].
    pub fn pause_target(&self, target: ActorId) {
        self.0.borrow_mut().pause_target(target);
    }

    /// See [`SchedulerQueue::resume_target`].
    pub fn resume_target(&self, target: ActorId) {
        self.0.borrow_mut().resume_target(target);
    }

    /// See [`SchedulerQueue::unschedule`].
    pub fn unschedule(&self, target: Option<ActorId>, key: &TaskKey) {
        self.0.borrow_mut().unschedule(target, key);
    }

    /// See [`SchedulerQueue::unschedule_all_for_target`].
    pub fn unschedule_all_for_target(&self, target: ActorId) {
        self.0.borrow_mut().unschedule_all_for_target(target);
    }

    /// See [`SchedulerQueue::unschedule_all`].
    pub fn unschedule_all(&self) {
        self.0.borrow_mut().unschedule_all();
    }

    /// Inspect the queue.
    pub fn with<R>(&self, f: impl FnOnce(&SchedulerQueue) -> R) -> R {
        f(&self.0.borrow())
    }
}

impl ActionHook for SharedSchedulerQueue {
    fn tick(&mut self, now: Ticks) {
        self.update(now);
    }

    fn box_clone(&self) -> Box<dyn ActionHook> {
        Box::new(self.clone())
    }

    fn name(&self) -> &'static str {
        "scheduler-queue"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ordoplay_motion_action::{ActionStatus, BasicNode};

    fn log_fires(log: &Rc<RefCell<Vec<(char, Ticks)>>>, label: char) -> impl FnMut(Ticks) {
        let log = Rc::clone(log);
        move |elapsed| log.borrow_mut().push((label, elapsed))
    }

    fn count_fires(count: &Rc<RefCell<u32>>) -> impl FnMut(Ticks) {
        let count = Rc::clone(count);
        move |_| *count.borrow_mut() += 1
    }

    #[test]
    fn test_dedup_by_target_and_key() {
        let mut q = SchedulerQueue::new();
        let target = Some(ActorId::new());
        q.schedule(target, "tick", |_| {}, 10.0, Repeat::Forever, 0.0, 0);
        q.schedule(target, "tick", |_| {}, 25.0, Repeat::Forever, 0.0, 0);
        assert_eq!(q.len(), 1);
        assert_eq!(q.iter().next().unwrap().interval(), 25.0);

        // A different key on the same target is a different task.
        q.schedule(target, "other", |_| {}, 10.0, Repeat::Forever, 0.0, 0);
        assert_eq!(q.len(), 2);
    }

    #[test]
    fn test_priority_order_with_stable_ties() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut q = SchedulerQueue::new();
        q.schedule(None, "b", log_fires(&log, 'b'), 0.0, Repeat::Forever, 0.0, 5);
        q.schedule(None, "d", log_fires(&log, 'd'), 0.0, Repeat::Forever, 0.0, 9);
        q.schedule(None, "a", log_fires(&log, 'a'), 0.0, Repeat::Forever, 0.0, -1);
        q.schedule(None, "c", log_fires(&log, 'c'), 0.0, Repeat::Forever, 0.0, 5);

        q.update(1.0);
        let order: Vec<char> = log.borrow().iter().map(|(c, _)| *c).collect();
        assert_eq!(order, vec!['a', 'b', 'c', 'd']);
    }

    #[test]
    fn test_periodic_task_fires_exactly_repeat_times() {
        let count = Rc::new(RefCell::new(0u32));
        let mut q = SchedulerQueue::new();
        q.schedule(None, "t", count_fires(&count), 10.0, Repeat::Times(3), 0.0, 0);

        for i in 1..100 {
            q.update(f64::from(i));
        }
        assert_eq!(*count.borrow(), 3);
        assert!(q.is_empty());
    }

    #[test]
    fn test_stalled_frame_does_not_burst() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut q = SchedulerQueue::new();
        q.schedule(None, "t", log_fires(&log, 't'), 10.0, Repeat::Times(3), 0.0, 0);

        // One giant step crosses many boundaries at once: a single firing.
        q.update(1000.0);
        assert_eq!(log.borrow().len(), 1);
        // The elapsed value reflects real elapsed time since last firing.
        assert_eq!(log.borrow()[0].1, 1000.0);

        // Missed boundaries never burst; the remaining firings land on later
        // boundaries until the exact total is reached.
        q.update(1005.0);
        assert_eq!(log.borrow().len(), 1);
        q.update(1010.0);
        q.update(1020.0);
        q.update(1030.0);
        assert_eq!(log.borrow().len(), 3);
        assert!(q.is_empty());
    }

    #[test]
    fn test_interval_zero_fires_once_per_tick_for_n_ticks() {
        let count = Rc::new(RefCell::new(0u32));
        let mut q = SchedulerQueue::new();
        q.schedule(None, "t", count_fires(&count), 0.0, Repeat::Times(4), 0.0, 0);

        for i in 1..=10 {
            q.update(f64::from(i));
        }
        assert_eq!(*count.borrow(), 4);
        assert!(q.is_empty());
    }

    #[test]
    fn test_single_shot_fires_once() {
        let count = Rc::new(RefCell::new(0u32));
        let mut q = SchedulerQueue::new();
        q.schedule(None, "t", count_fires(&count), 50.0, Repeat::Times(0), 0.0, 0);

        q.update(1.0);
        q.update(2.0);
        assert_eq!(*count.borrow(), 1);
        assert!(q.is_empty());
    }

    #[test]
    fn test_delay_defers_first_firing() {
        let count = Rc::new(RefCell::new(0u32));
        let mut q = SchedulerQueue::new();
        q.schedule(None, "t", count_fires(&count), 0.0, Repeat::Forever, 5.0, 0);

        q.update(4.0);
        assert_eq!(*count.borrow(), 0);
        q.update(5.0);
        assert_eq!(*count.borrow(), 1);
    }

    #[test]
    fn test_pause_freezes_progress() {
        let count = Rc::new(RefCell::new(0u32));
        let mut q = SchedulerQueue::new();
        let target = ActorId::new();
        q.schedule(
            Some(target),
            "t",
            count_fires(&count),
            10.0,
            Repeat::Times(2),
            0.0,
            0,
        );

        q.update(10.0);
        assert_eq!(*count.borrow(), 1);
        q.pause_target(target);
        q.update(500.0);
        assert_eq!(*count.borrow(), 1);
        q.resume_target(target);
        // The schedule shifted by the frozen span: next boundary is one
        // interval after the pre-pause one.
        q.update(510.0);
        assert_eq!(*count.borrow(), 2);
        assert!(q.is_empty());
    }

    #[test]
    fn test_task_scheduled_during_tick_runs_next_tick() {
        let q = SharedSchedulerQueue::new();
        let count = Rc::new(RefCell::new(0u32));
        {
            let q2 = q.clone();
            let count = Rc::clone(&count);
            q.schedule(
                None,
                "spawner",
                move |_| {
                    let count = Rc::clone(&count);
                    q2.schedule(
                        None,
                        "spawned",
                        move |_| *count.borrow_mut() += 1,
                        0.0,
                        Repeat::Forever,
                        0.0,
                        0,
                    );
                },
                0.0,
                Repeat::Times(0),
                0.0,
                0,
            );
        }

        q.update(1.0);
        // The freshly scheduled task was past the snapshot.
        assert_eq!(*count.borrow(), 0);
        q.update(2.0);
        assert_eq!(*count.borrow(), 1);
    }

    #[test]
    fn test_callback_can_cancel_siblings() {
        let q = SharedSchedulerQueue::new();
        let count = Rc::new(RefCell::new(0u32));
        let target = ActorId::new();
        {
            let q2 = q.clone();
            q.schedule(
                None,
                "killer",
                move |_| q2.unschedule_all_for_target(target),
                0.0,
                Repeat::Times(0),
                0.0,
                -10,
            );
        }
        q.schedule(
            Some(target),
            "victim",
            count_fires(&count),
            0.0,
            Repeat::Forever,
            0.0,
            0,
        );

        q.update(1.0);
        // The killer ran first (lower priority value) and ended the victim;
        // the sweep removed both in the same tick.
        q.with(|inner| assert!(inner.is_empty()));
        assert_eq!(*count.borrow(), 0);
    }

    #[test]
    fn test_queue_as_action_has_pinned_timing() {
        let q = SharedSchedulerQueue::new();
        let count = Rc::new(RefCell::new(0u32));
        q.schedule(None, "t", count_fires(&count), 0.0, Repeat::Forever, 0.0, 0);

        let mut action = q.as_action();
        assert_eq!(action.status(), ActionStatus::Running);
        assert_eq!(action.duration(), 0.0);
        assert!(action.total_span().is_infinite());

        action.set_duration(99.0);
        action.set_repeat_times(2);
        assert_eq!(action.duration(), 0.0);
        assert!(action.total_span().is_infinite());

        let mut node = BasicNode::new();
        action.step(1.0, &mut node);
        action.step(2.0, &mut node);
        assert_eq!(*count.borrow(), 2);
        assert!(!action.is_ended());
    }

    #[test]
    fn test_free_function_task_without_target() {
        let count = Rc::new(RefCell::new(0u32));
        let mut q = SchedulerQueue::new();
        q.schedule(None, "free", count_fires(&count), 0.0, Repeat::Times(1), 0.0, 0);
        q.update(1.0);
        assert_eq!(*count.borrow(), 1);
    }
}
