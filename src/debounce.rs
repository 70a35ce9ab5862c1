//! Trailing-edge debouncers polled from the host frame tick.

use std::time::{Duration, Instant};

/// Delay between lazy segment growth steps.
pub const SEGMENT_GROWTH_DELAY: Duration = Duration::from_millis(10);
/// Delay before reacting to a container resize.
pub const RESIZE_DELAY: Duration = Duration::from_millis(100);

/// Collapses repeated triggers into a single action after `delay` of quiet.
#[derive(Clone, Copy, Debug)]
pub struct Debouncer {
    delay: Duration,
    deadline: Option<Instant>,
}

impl Debouncer {
    /// Create an idle debouncer.
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            deadline: None,
        }
    }

    /// Configured delay.
    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Arm (or re-arm) the debouncer; the trailing edge moves to `now + delay`.
    pub fn trigger(&mut self, now: Instant) {
        self.deadline = Some(now + self.delay);
    }

    /// Disarm without firing.
    pub fn cancel(&mut self) {
        self.deadline = None;
    }

    /// True while a trailing action is pending.
    pub fn is_pending(&self) -> bool {
        self.deadline.is_some()
    }

    /// Time left until the pending action fires, if any.
    pub fn remaining(&self, now: Instant) -> Option<Duration> {
        self.deadline
            .map(|deadline| deadline.saturating_duration_since(now))
    }

    /// Fire once if the deadline has passed; the debouncer is disarmed on fire.
    pub fn fire_if_due(&mut self, now: Instant) -> bool {
        match self.deadline {
            Some(deadline) if now >= deadline => {
                self.deadline = None;
                true
            }
            _ => false,
        }
    }
}
