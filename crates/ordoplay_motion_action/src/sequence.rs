// SPDX-License-Identifier: MIT OR Apache-2.0
//! Composite timelines.
//!
//! A sequence presents a list of child actions as a single action with one
//! derived duration, redistributing sequence time into each child's local
//! clock. Sequential mode lays children back-to-back; spawn mode starts them
//! all at offset zero. Structural changes re-derive offsets and duration
//! immediately, and since all mutation of a nested sequence flows through its
//! owner, enclosing sequences re-derive on the way out.

use crate::action::Action;
use crate::time::Ticks;

/// Child list and derived-timing state of a sequence action.
#[derive(Debug)]
pub(crate) struct SequenceBody {
    /// Children, owned by value in playback order.
    pub(crate) children: Vec<Action>,
    /// Back-to-back when `true`, parallel (spawn) when `false`.
    pub(crate) sequential: bool,
    /// In-cycle local time of the previous tick, for delta stepping.
    pub(crate) prev_local: Ticks,
}

impl SequenceBody {
    pub(crate) fn new(sequential: bool) -> Self {
        Self {
            children: Vec::new(),
            sequential,
            prev_local: 0.0,
        }
    }

    /// Reassign child start offsets and return the derived duration: the
    /// maximum of `child.start + child.window` across children, zero when
    /// empty. A repeat-forever child makes everything after it unreachable
    /// and the aggregate unbounded.
    pub(crate) fn resequence(&mut self) -> Ticks {
        let mut acc: Ticks = 0.0;
        let mut max_end: Ticks = 0.0;
        for child in &mut self.children {
            child.start_time = if self.sequential { acc } else { 0.0 };
            let len = child.window_len();
            let end = child.start_time + len;
            if self.sequential {
                acc += len;
            }
            if end > max_end {
                max_end = end;
            }
        }
        max_end
    }

    pub(crate) fn clone_config(&self) -> SequenceBody {
        SequenceBody {
            children: self.children.clone(),
            sequential: self.sequential,
            prev_local: 0.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::action::{Action, ActionStatus};
    use crate::node::BasicNode;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn move_action(x: f64, y: f64, duration: f64) -> Action {
        let mut a = Action::move_to(x, y);
        a.set_duration(duration);
        a
    }

    #[test]
    fn test_sequential_duration_is_sum() {
        let seq = Action::sequence_of(
            vec![
                move_action(1.0, 0.0, 10.0),
                move_action(2.0, 0.0, 20.0),
                move_action(3.0, 0.0, 5.0),
            ],
            true,
        );
        assert_eq!(seq.duration(), 35.0);
    }

    #[test]
    fn test_spawn_duration_is_max() {
        let seq = Action::sequence_of(
            vec![
                move_action(1.0, 0.0, 10.0),
                move_action(2.0, 0.0, 40.0),
                move_action(3.0, 0.0, 5.0),
            ],
            false,
        );
        assert_eq!(seq.duration(), 40.0);
    }

    #[test]
    fn test_repeats_and_delay_count_into_offsets() {
        let mut first = move_action(1.0, 0.0, 10.0);
        first.set_repeat_times(3).set_delay(5.0);
        let seq = Action::sequence_of(vec![first, move_action(2.0, 0.0, 1.0)], true);
        // 5 delay + 3 * 10, then the second child's single unit
        assert_eq!(seq.duration(), 36.0);
        assert_eq!(seq.children()[1].start_time, 35.0);
    }

    #[test]
    fn test_empty_sequence_ends_immediately() {
        let mut seq = Action::sequence();
        let mut node = BasicNode::new();
        assert_eq!(seq.duration(), 0.0);
        seq.step(0.0, &mut node);
        assert!(seq.is_ended());
    }

    #[test]
    fn test_duration_setters_are_noops_on_sequences() {
        let mut seq = Action::sequence_of(vec![move_action(1.0, 0.0, 10.0)], true);
        seq.set_duration(99.0);
        seq.time_info(3.0, 50.0, None);
        assert_eq!(seq.duration(), 10.0);
        // Repeat still composes with the derived duration.
        seq.set_repeat_times(7);
        assert_eq!(seq.total_span(), 70.0);
    }

    #[test]
    fn test_reversal_involution() {
        let mut a = move_action(1.0, 0.0, 10.0);
        a.set_reversed(true);
        let b = move_action(2.0, 0.0, 20.0);
        let seq = Action::sequence_of(vec![a, b], true);

        let twice = seq.reverse().reverse();
        assert_eq!(twice.children().len(), 2);
        assert_eq!(twice.children()[0].duration(), 10.0);
        assert!(twice.children()[0].is_reversed());
        assert!(!twice.children()[1].is_reversed());
        assert_eq!(twice.children()[0].start_time, 0.0);
        assert_eq!(twice.children()[1].start_time, 10.0);
        assert_eq!(twice.duration(), seq.duration());
    }

    #[test]
    fn test_reverse_flips_order_and_children() {
        let seq = Action::sequence_of(
            vec![move_action(1.0, 0.0, 10.0), move_action(2.0, 0.0, 20.0)],
            true,
        );
        let rev = seq.reverse();
        assert_eq!(rev.children()[0].duration(), 20.0);
        assert!(rev.children()[0].is_reversed());
        assert!(rev.children()[1].is_reversed());
        assert_eq!(rev.children()[1].start_time, 20.0);
    }

    #[test]
    fn test_sequential_children_run_back_to_back() {
        let mut seq = Action::sequence_of(
            vec![move_action(100.0, 0.0, 10.0), move_action(100.0, 50.0, 10.0)],
            true,
        );
        let mut node = BasicNode::new();
        seq.step(5.0, &mut node);
        assert!((node.x - 50.0).abs() < 1e-9);
        assert_eq!(node.y, 0.0);
        seq.step(15.0, &mut node);
        assert!((node.x - 100.0).abs() < 1e-9);
        assert!((node.y - 25.0).abs() < 1e-9);
        seq.step(20.0, &mut node);
        assert!(seq.is_ended());
        assert_eq!(node.y, 50.0);
    }

    #[test]
    fn test_spawn_children_run_together() {
        let mut seq = Action::sequence_of(
            vec![move_action(100.0, 0.0, 10.0), {
                let mut a = Action::fade_to(0.0);
                a.set_duration(20.0);
                a
            }],
            false,
        );
        let mut node = BasicNode::new();
        seq.step(10.0, &mut node);
        assert!((node.x - 100.0).abs() < 1e-9);
        assert!((node.alpha - 0.5).abs() < 1e-6);
        assert_eq!(seq.status(), ActionStatus::Running);
        seq.step(20.0, &mut node);
        assert!(seq.is_ended());
        assert_eq!(node.alpha, 0.0);
    }

    #[test]
    fn test_repeat_two_then_plain_scenario() {
        // A repeat-2 move (duration 2) followed by a plain move (duration 2).
        let mut first = move_action(10.0, 0.0, 2.0);
        first.set_repeat_times(2);
        let second = move_action(-10.0, 0.0, 2.0);
        let mut seq = Action::sequence_of(vec![first, second], true);
        assert_eq!(seq.duration(), 6.0);

        let mut node = BasicNode::new();
        seq.step(1.0, &mut node);
        // Midpoint of the first child's first repetition.
        assert!((node.x - 5.0).abs() < 1e-9);
        seq.step(6.0, &mut node);
        assert!(seq.is_ended());
        assert_eq!(node.x, -10.0);
    }

    #[test]
    fn test_repeating_sequence_rearms_child_callbacks() {
        let starts = Rc::new(RefCell::new(0u32));
        let ends = Rc::new(RefCell::new(0u32));
        let mut child = move_action(10.0, 0.0, 10.0);
        {
            let starts = Rc::clone(&starts);
            child.on_start(move |_, _| *starts.borrow_mut() += 1);
        }
        {
            let ends = Rc::clone(&ends);
            child.on_end(move |_, _| *ends.borrow_mut() += 1);
        }
        let mut seq = Action::sequence_of(vec![child], true);
        seq.set_repeat_times(2);

        let mut node = BasicNode::new();
        for i in 0..=20 {
            seq.step(f64::from(i), &mut node);
        }
        assert!(seq.is_ended());
        assert_eq!(*starts.borrow(), 2);
        assert_eq!(*ends.borrow(), 2);
    }

    #[test]
    fn test_nested_sequence_duration_propagates() {
        let inner = Action::sequence_of(
            vec![move_action(1.0, 0.0, 10.0), move_action(2.0, 0.0, 10.0)],
            true,
        );
        let mut outer = Action::sequence();
        outer.push_child(move_action(0.0, 0.0, 5.0));
        outer.push_child(inner);
        assert_eq!(outer.duration(), 25.0);
    }
}
