//! Virtual clock and timer queue.
//!
//! All deferred work in the engine — debounce windows, notification
//! dismissal, the simulated submission latency, counter ticks — is an entry
//! in one [`TimerQueue`]: a deadline on a monotonic millisecond clock plus a
//! [`Task`] describing what to do when it arrives. Advancing the clock
//! drains due entries in firing order (deadline first, scheduling order
//! within a deadline), and a task that schedules a follow-up inside the
//! advanced window fires in the same drain — exactly how nested timeouts
//! land on a real event loop.
//!
//! Tasks are data, not closures. Each carries an immutable snapshot of what
//! it needs (node handles, the serialized submission), so a continuation can
//! never observe state through a stale shared capture.
//!
//! Every entry is tagged with the module that scheduled it. Tearing a module
//! down cancels exactly its own entries; tearing the engine down clears the
//! queue, so nothing fires against destroyed state.

use crate::form::Submission;
use crate::page::NodeId;
use tracing::trace;

/// Handle to a scheduled entry, usable for cancellation. Stale handles
/// (already fired or cancelled) are harmless.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimerId(u64);

/// A deferred continuation. Variants carry everything their handler needs.
#[derive(Debug, Clone)]
pub enum Task {
    /// Debounced resize settled; re-check the menu against the breakpoint.
    MenuResizeCheck,
    /// A notification's display window elapsed.
    NotifyAutoDismiss { alert: NodeId },
    /// A notification's fade grace elapsed; physically remove it.
    NotifyRemove { alert: NodeId },
    /// The simulated submission latency elapsed; hand off to the backend.
    SubmitResolve {
        form: NodeId,
        submit: Option<NodeId>,
        original_label: String,
        submission: Submission,
    },
    /// Post-success delay elapsed; leave for the confirmation page.
    Redirect { url: String },
    /// One frame of a count-up animation.
    CounterTick {
        counter: NodeId,
        target: i64,
        current: f64,
        increment: f64,
    },
}

#[derive(Debug)]
struct Entry {
    id: TimerId,
    deadline: u64,
    seq: u64,
    owner: &'static str,
    task: Task,
}

/// Owner-tagged timer entries over a virtual millisecond clock.
#[derive(Debug, Default)]
pub struct TimerQueue {
    now: u64,
    next_id: u64,
    next_seq: u64,
    entries: Vec<Entry>,
}

impl TimerQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current virtual time in milliseconds.
    pub fn now(&self) -> u64 {
        self.now
    }

    pub fn pending(&self) -> usize {
        self.entries.len()
    }

    /// Schedule `task` to fire `delay_ms` from now, on behalf of `owner`.
    pub fn schedule(&mut self, owner: &'static str, delay_ms: u64, task: Task) -> TimerId {
        let id = TimerId(self.next_id);
        self.next_id += 1;
        let seq = self.next_seq;
        self.next_seq += 1;
        let deadline = self.now + delay_ms;
        trace!(owner, deadline, "timer scheduled");
        self.entries.push(Entry {
            id,
            deadline,
            seq,
            owner,
            task,
        });
        id
    }

    /// Cancel one entry. Returns false if it already fired or was cancelled.
    pub fn cancel(&mut self, id: TimerId) -> bool {
        let before = self.entries.len();
        self.entries.retain(|e| e.id != id);
        self.entries.len() != before
    }

    /// Cancel every entry belonging to `owner`. Returns how many were dropped.
    pub fn cancel_owner(&mut self, owner: &str) -> usize {
        let before = self.entries.len();
        self.entries.retain(|e| e.owner != owner);
        before - self.entries.len()
    }

    /// Drop all pending entries. Returns how many were dropped.
    pub fn clear(&mut self) -> usize {
        let dropped = self.entries.len();
        self.entries.clear();
        dropped
    }

    /// Remove and return the next entry due at or before `until`, moving the
    /// clock to its deadline. Returns `None` when nothing is due, leaving
    /// the clock where it is — call [`TimerQueue::finish_advance`] to close
    /// out the window.
    pub fn pop_due(&mut self, until: u64) -> Option<Task> {
        let idx = self
            .entries
            .iter()
            .enumerate()
            .filter(|(_, e)| e.deadline <= until)
            .min_by_key(|(_, e)| (e.deadline, e.seq))
            .map(|(i, _)| i)?;
        let entry = self.entries.swap_remove(idx);
        self.now = self.now.max(entry.deadline);
        trace!(owner = entry.owner, at = self.now, "timer fired");
        Some(entry.task)
    }

    /// Move the clock to the end of an advanced window.
    pub fn finish_advance(&mut self, until: u64) {
        self.now = self.now.max(until);
    }
}
