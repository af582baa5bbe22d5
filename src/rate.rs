//! Rate-limiting wrappers for high-frequency event streams.
//!
//! Two policies, used by every resize/scroll consumer:
//!
//! - [`Debounce`] — only the last call in a burst counts. Each trigger
//!   replaces the pending timer entry with a fresh one `wait` in the future,
//!   so the task fires once, after the stream goes quiet.
//! - [`Throttle`] — at most one call per window. The first call passes
//!   immediately and opens a cooldown; calls during the cooldown are
//!   dropped, not queued (no trailing call).

use crate::timer::{Task, TimerId, TimerQueue};

/// Fire once after a quiet period. Re-triggering replaces the pending entry.
#[derive(Debug)]
pub struct Debounce {
    owner: &'static str,
    wait_ms: u64,
    pending: Option<TimerId>,
}

impl Debounce {
    pub fn new(owner: &'static str, wait_ms: u64) -> Self {
        Self {
            owner,
            wait_ms,
            pending: None,
        }
    }

    /// Schedule `task` to fire after the quiet period, cancelling any
    /// pending one. The task that ultimately fires is the last one passed
    /// in, with whatever it captured at that point.
    pub fn trigger(&mut self, timers: &mut TimerQueue, task: Task) {
        if let Some(id) = self.pending.take() {
            timers.cancel(id);
        }
        self.pending = Some(timers.schedule(self.owner, self.wait_ms, task));
    }
}

/// At most one call per fixed window, leading edge.
#[derive(Debug)]
pub struct Throttle {
    window_ms: u64,
    open_at: u64,
}

impl Throttle {
    pub fn new(window_ms: u64) -> Self {
        Self {
            window_ms,
            open_at: 0,
        }
    }

    /// True if a call at `now` may proceed; opening a new cooldown if so.
    pub fn allow(&mut self, now: u64) -> bool {
        if now >= self.open_at {
            self.open_at = now + self.window_ms;
            true
        } else {
            false
        }
    }
}
