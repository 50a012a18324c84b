//! Host-driven time: the elapsed-time timer and deferred continuations.
//!
//! Nothing here spawns threads or sleeps. The host forwards wall-clock
//! progress with `advance(ms)` and the state machines react synchronously.
//!
//! - `GameTimer` counts whole seconds while running and not paused.
//! - `Scheduler` holds deferred actions (continue-choice delay, click
//!   debounce). Every action carries the epoch it was scheduled in;
//!   `cancel_all` bumps the epoch so anything in flight is dropped.
//!   Handlers must still re-check their preconditions when an action fires.

use serde::{Deserialize, Serialize};

/// Elapsed-time counter with idempotent start/stop and a pause flag.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameTimer {
    elapsed_secs: u64,
    running: bool,
    paused: bool,
    carry_ms: u64,
}

impl GameTimer {
    /// Create a stopped timer at zero.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Start counting. No-op when already running.
    pub fn start(&mut self) {
        if self.running {
            return;
        }
        self.running = true;
        self.carry_ms = 0;
    }

    /// Stop counting. No-op when not running.
    pub fn stop(&mut self) {
        if !self.running {
            return;
        }
        self.running = false;
        self.carry_ms = 0;
    }

    /// Stop and zero the counter.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Suspend or resume accumulation without stopping the timer.
    pub fn set_paused(&mut self, paused: bool) {
        self.paused = paused;
    }

    /// Feed `ms` of wall-clock time. Returns the number of whole seconds added.
    pub fn advance(&mut self, ms: u64) -> u64 {
        if !self.running || self.paused {
            return 0;
        }
        let total = self.carry_ms + ms;
        let secs = total / 1000;
        self.carry_ms = total % 1000;
        self.elapsed_secs += secs;
        secs
    }

    /// Whole seconds counted so far.
    #[must_use]
    pub fn elapsed_secs(&self) -> u64 {
        self.elapsed_secs
    }

    /// Whether the timer is started.
    #[must_use]
    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Whether accumulation is suspended.
    #[must_use]
    pub fn is_paused(&self) -> bool {
        self.paused
    }
}

/// Format seconds as `MM:SS`.
///
/// ```
/// assert_eq!(quiz_party::core::format_time(75), "01:15");
/// ```
#[must_use]
pub fn format_time(seconds: u64) -> String {
    format!("{:02}:{:02}", seconds / 60, seconds % 60)
}

/// Handle to a scheduled action.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Ticket {
    /// Epoch the action was scheduled in.
    pub epoch: u64,
    /// Sequence number within the scheduler.
    pub id: u64,
}

#[derive(Clone, Debug)]
struct Pending<A> {
    due_ms: u64,
    ticket: Ticket,
    action: A,
}

/// Queue of deferred actions keyed on a logical millisecond clock.
#[derive(Clone, Debug)]
pub struct Scheduler<A> {
    now_ms: u64,
    epoch: u64,
    next_id: u64,
    queue: Vec<Pending<A>>,
}

impl<A> Default for Scheduler<A> {
    fn default() -> Self {
        Self {
            now_ms: 0,
            epoch: 0,
            next_id: 0,
            queue: Vec::new(),
        }
    }
}

impl<A> Scheduler<A> {
    /// Create an empty scheduler at time zero.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Current logical time.
    #[must_use]
    pub fn now_ms(&self) -> u64 {
        self.now_ms
    }

    /// Schedule `action` to fire `delay_ms` from now.
    pub fn schedule(&mut self, delay_ms: u64, action: A) -> Ticket {
        let ticket = Ticket {
            epoch: self.epoch,
            id: self.next_id,
        };
        self.next_id += 1;
        self.queue.push(Pending {
            due_ms: self.now_ms + delay_ms,
            ticket,
            action,
        });
        ticket
    }

    /// Drop a single scheduled action. Returns whether it was still queued.
    pub fn cancel(&mut self, ticket: Ticket) -> bool {
        let before = self.queue.len();
        self.queue.retain(|p| p.ticket != ticket);
        self.queue.len() != before
    }

    /// Invalidate every in-flight action.
    pub fn cancel_all(&mut self) {
        self.epoch += 1;
        self.queue.clear();
    }

    /// Whether any action of the current epoch is waiting.
    #[must_use]
    pub fn has_pending(&self) -> bool {
        self.queue.iter().any(|p| p.ticket.epoch == self.epoch)
    }

    /// Move the clock forward and return the actions that came due,
    /// in due order (ties in scheduling order).
    pub fn advance(&mut self, ms: u64) -> Vec<A> {
        self.now_ms += ms;
        let now = self.now_ms;
        let epoch = self.epoch;

        let mut due = Vec::new();
        let mut waiting = Vec::with_capacity(self.queue.len());
        for pending in self.queue.drain(..) {
            if pending.ticket.epoch != epoch {
                continue;
            }
            if pending.due_ms <= now {
                due.push(pending);
            } else {
                waiting.push(pending);
            }
        }
        self.queue = waiting;

        due.sort_by_key(|p| (p.due_ms, p.ticket.id));
        due.into_iter().map(|p| p.action).collect()
    }
}
