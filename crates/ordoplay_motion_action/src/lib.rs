// SPDX-License-Identifier: MIT OR Apache-2.0
//! Action state machine and composite timelines for OrdoPlay Motion.
//!
//! This crate provides the timed-mutation core:
//! - The [`Action`] state machine with repetition, reversal, relative deltas,
//!   easing, and lifecycle callbacks
//! - Sequential and parallel composite timelines with derived durations
//! - The target capability contract and a reference node
//! - Data-driven reconstruction via [`ActionInitializer`]
//!
//! ## Architecture
//!
//! Everything runs on one logical timeline in a single internal time unit
//! ([`Ticks`]); an external driver advances each root action once per frame.
//! Nothing in the tick path blocks, allocates per-frame when unobserved, or
//! surfaces an error to the driver.

pub mod action;
pub mod easing;
pub mod initializer;
mod kinds;
pub mod node;
mod sequence;
pub mod target;
pub mod time;

pub use action::{
    Action, ActionInfo, ActionStatus, ActionToken, ApplyFn, Callbacks, EventFn, Repeat, RepeatFn,
};
pub use easing::Easing;
pub use initializer::{ActionInitializer, InitializerError, ValueInit, parse_action};
pub use kinds::{ActionHook, CallFn};
pub use node::BasicNode;
pub use target::{ActionTarget, ActorId, AppliedValue};
pub use time::{TimeBase, Ticks};
