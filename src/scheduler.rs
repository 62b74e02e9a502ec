//! Render scheduling with a cancelable debounce timer
//!
//! Edits and viewport moves arrive in bursts. Each request cancels the
//! pending timer and starts a new one, so a burst produces one render once
//! the host has been quiet for the debounce delay. Time is passed in by the
//! caller; the host event loop drives [`RenderScheduler::poll`].

use std::time::{Duration, Instant};

/// Quiet period before a debounced render fires
pub const DEFAULT_DEBOUNCE_MS: u64 = 75;

/// A single pending deadline; rescheduling replaces it
#[derive(Debug, Clone)]
pub struct DebounceTimer {
    delay: Duration,
    deadline: Option<Instant>,
}

impl DebounceTimer {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            deadline: None,
        }
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Cancel any pending deadline and start a new one from `now`
    ///
    /// Returns `true` if a pending deadline was replaced.
    pub fn reschedule(&mut self, now: Instant) -> bool {
        let replaced = self.deadline.is_some();
        self.deadline = Some(now + self.delay);
        replaced
    }

    /// Drop the pending deadline, if any
    pub fn cancel(&mut self) -> bool {
        self.deadline.take().is_some()
    }

    pub fn is_pending(&self) -> bool {
        self.deadline.is_some()
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    /// Consume the deadline if it has passed at `now`
    pub fn fire(&mut self, now: Instant) -> bool {
        match self.deadline {
            Some(deadline) if now >= deadline => {
                self.deadline = None;
                true
            }
            _ => false,
        }
    }
}

/// Decides when render passes run
#[derive(Debug, Clone)]
pub struct RenderScheduler {
    timer: DebounceTimer,
    /// Requests coalesced into the pending timer
    coalesced: u64,
    passes: u64,
}

impl Default for RenderScheduler {
    fn default() -> Self {
        Self::new(Duration::from_millis(DEFAULT_DEBOUNCE_MS))
    }
}

impl RenderScheduler {
    pub fn new(delay: Duration) -> Self {
        Self {
            timer: DebounceTimer::new(delay),
            coalesced: 0,
            passes: 0,
        }
    }

    /// Queue a debounced render; the latest request wins
    pub fn request(&mut self, now: Instant) {
        if self.timer.reschedule(now) {
            self.coalesced += 1;
        }
        tracing::trace!(
            "Render requested, due in {}ms",
            self.timer.delay().as_millis()
        );
    }

    /// Render right away; any pending debounced request is folded in
    pub fn render_now(&mut self) {
        if self.timer.cancel() {
            tracing::trace!("Pending render superseded by immediate render");
        }
        self.passes += 1;
    }

    /// Whether a debounced render is due at `now`
    ///
    /// Returns `true` at most once per pending request.
    pub fn poll(&mut self, now: Instant) -> bool {
        if self.timer.fire(now) {
            tracing::debug!(
                "Debounced render firing ({} requests coalesced)",
                self.coalesced
            );
            self.coalesced = 0;
            self.passes += 1;
            true
        } else {
            false
        }
    }

    pub fn is_pending(&self) -> bool {
        self.timer.is_pending()
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.timer.deadline()
    }

    /// Number of render passes started
    pub fn passes(&self) -> u64 {
        self.passes
    }
}
