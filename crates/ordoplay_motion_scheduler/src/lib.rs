// SPDX-License-Identifier: MIT OR Apache-2.0
//! Priority task queue for OrdoPlay Motion.
//!
//! This crate decouples timer-style callbacks from the property-mutation
//! action model while reusing the same per-frame driver:
//! - [`SchedulerQueueTask`]: an independent timer with interval, repeat,
//!   delay, and priority
//! - [`SchedulerQueue`]: the priority-sorted owner evaluating every task once
//!   per tick
//! - [`SharedSchedulerQueue`]: the shared handle that rides the action tick
//!   protocol and lets firing callbacks reach back into the queue

pub mod queue;
pub mod task;

pub use queue::{SchedulerQueue, SharedSchedulerQueue};
pub use task::{SchedulerQueueTask, TaskFn, TaskKey, TaskStatus};
