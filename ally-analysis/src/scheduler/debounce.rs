//! A clear-and-replace debounce timer over explicit millisecond ticks.
//!
//! There is no cancellation mid-flight: rescheduling replaces the deadline,
//! so a superseded timer simply never fires.

#[derive(Debug, Clone)]
pub struct Debounce {
    delay_ms: u64,
    deadline: Option<u64>,
}

impl Debounce {
    pub fn new(delay_ms: u64) -> Self {
        Self {
            delay_ms,
            deadline: None,
        }
    }

    /// Arm (or re-arm) the timer with the default delay.
    pub fn schedule(&mut self, now: u64) {
        self.deadline = Some(now + self.delay_ms);
    }

    /// Arm with an explicit delay, replacing any pending deadline.
    pub fn schedule_with(&mut self, now: u64, delay_ms: u64) {
        self.deadline = Some(now + delay_ms);
    }

    /// True exactly once when the deadline has passed; disarms the timer.
    pub fn fire(&mut self, now: u64) -> bool {
        match self.deadline {
            Some(deadline) if now >= deadline => {
                self.deadline = None;
                true
            }
            _ => false,
        }
    }

    pub fn is_pending(&self) -> bool {
        self.deadline.is_some()
    }

    pub fn cancel(&mut self) {
        self.deadline = None;
    }
}
