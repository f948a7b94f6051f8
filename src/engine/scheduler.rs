use std::cmp::{Ordering, Reverse};
use std::collections::BinaryHeap;

use crate::graph::context::VoiceNodeId;

/// Deferred work keyed to the audio clock.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScheduledAction {
    /// The voice's oscillators have stopped; drop its node.
    DisposeVoice(VoiceNodeId),
}

#[derive(Debug, Clone, Copy)]
struct Entry {
    time: f64,
    seq: u64,
    action: ScheduledAction,
}

impl PartialEq for Entry {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Entry {}

impl PartialOrd for Entry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Entry {
    // Earliest time first; equal times in the order they were scheduled.
    fn cmp(&self, other: &Self) -> Ordering {
        self.time
            .total_cmp(&other.time)
            .then(self.seq.cmp(&other.seq))
    }
}

/// Min-heap of timed actions. Nothing polls a wall clock: the owner drains
/// due actions after each rendered block.
#[derive(Debug, Default)]
pub struct Scheduler {
    queue: BinaryHeap<Reverse<Entry>>,
    next_seq: u64,
}

impl Scheduler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn schedule(&mut self, time: f64, action: ScheduledAction) {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.queue.push(Reverse(Entry { time, seq, action }));
    }

    /// Pop the next action due at or before `now`.
    pub fn pop_due(&mut self, now: f64) -> Option<ScheduledAction> {
        match self.queue.peek() {
            Some(Reverse(entry)) if entry.time <= now => {
                self.queue.pop().map(|Reverse(entry)| entry.action)
            }
            _ => None,
        }
    }

    pub fn next_due(&self) -> Option<f64> {
        self.queue.peek().map(|Reverse(entry)| entry.time)
    }

    pub fn len(&self) -> usize {
        self.queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }
}
