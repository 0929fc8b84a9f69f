//! Rate limiting primitives for scroll and resize handling.
//!
//! Both limiters are clock-explicit and timer-free: every operation takes a
//! `now` instant, and deferred work is released by polling from the host's
//! event loop tick. That keeps the engine cooperative (no background threads)
//! and makes the timing behavior fully deterministic under test.
//!
//! `Throttle` bounds invocation frequency: at most one fire per interval under
//! sustained calls, with configurable leading and trailing edges. `Debounce`
//! coalesces a burst into a single fire after a quiet period.

use std::time::{Duration, Instant};

/// Throttles a stream of calls to at most one fire per interval.
///
/// `call()` returns the payload whenever a leading-edge fire is due; otherwise
/// the payload is stashed as the pending trailing invocation. `poll()` releases
/// the trailing payload once the interval has elapsed. Callers must `cancel()`
/// on teardown so a stale trailing payload can never fire into a torn-down
/// context.
#[derive(Debug)]
pub struct Throttle<T> {
    interval: Duration,
    leading: bool,
    trailing: bool,
    /// Start of the current rate window; `None` means quiet period.
    window_start: Option<Instant>,
    /// Payload captured from the most recent suppressed call.
    pending: Option<T>,
}

impl<T> Throttle<T> {
    pub fn new(interval: Duration, leading: bool, trailing: bool) -> Self {
        Self {
            interval,
            leading,
            trailing,
            window_start: None,
            pending: None,
        }
    }

    /// Leading and trailing edges enabled, the common case.
    pub fn with_interval(interval: Duration) -> Self {
        Self::new(interval, true, true)
    }

    /// Record a call. Returns `Some(payload)` when the call should fire
    /// immediately, `None` when it was suppressed (possibly stashed for the
    /// trailing edge).
    pub fn call(&mut self, now: Instant, payload: T) -> Option<T> {
        if self.window_start.is_none() && !self.leading {
            // Leading edge disabled: the first call only opens the window.
            self.window_start = Some(now);
        }

        let elapsed = self.window_start.map(|start| now.duration_since(start));
        match elapsed {
            None => {
                // Quiet period and leading enabled: fire immediately.
                self.window_start = Some(now);
                self.pending = None;
                Some(payload)
            }
            Some(elapsed) if elapsed >= self.interval => {
                self.window_start = Some(now);
                self.pending = None;
                Some(payload)
            }
            Some(_) if self.trailing => {
                self.pending = Some(payload);
                None
            }
            Some(_) => None,
        }
    }

    /// Release the pending trailing payload if its window has elapsed.
    pub fn poll(&mut self, now: Instant) -> Option<T> {
        let start = self.window_start?;
        if self.pending.is_none() || now.duration_since(start) < self.interval {
            return None;
        }
        self.window_start = if self.leading { Some(now) } else { None };
        self.pending.take()
    }

    /// Earliest instant at which `poll()` could fire, if anything is pending.
    pub fn next_deadline(&self) -> Option<Instant> {
        self.pending.as_ref()?;
        self.window_start.map(|start| start + self.interval)
    }

    /// Clear any pending trailing invocation and reset timing state.
    pub fn cancel(&mut self) {
        self.window_start = None;
        self.pending = None;
    }
}

/// Defers a single fire until a quiet period of `delay` has passed.
///
/// Every `call()` re-arms the deadline, so a continuous burst coalesces to
/// exactly one fire at the boundary of activity. With `immediate` set, the
/// first call of a burst fires synchronously instead and the boundary fire is
/// suppressed, mirroring leading-edge throttle semantics with unbounded
/// coalescing.
#[derive(Debug)]
pub struct Debounce<T> {
    delay: Duration,
    immediate: bool,
    deadline: Option<Instant>,
    pending: Option<T>,
}

impl<T> Debounce<T> {
    pub fn new(delay: Duration, immediate: bool) -> Self {
        Self {
            delay,
            immediate,
            deadline: None,
            pending: None,
        }
    }

    pub fn with_delay(delay: Duration) -> Self {
        Self::new(delay, false)
    }

    /// Record a call, re-arming the quiet-period deadline. Returns
    /// `Some(payload)` only for the leading call in immediate mode.
    pub fn call(&mut self, now: Instant, payload: T) -> Option<T> {
        let call_now = self.immediate && self.deadline.is_none();
        self.deadline = Some(now + self.delay);
        if self.immediate {
            call_now.then_some(payload)
        } else {
            self.pending = Some(payload);
            None
        }
    }

    /// Release the deferred payload once the quiet period has elapsed. In
    /// immediate mode this only closes the suppression window.
    pub fn poll(&mut self, now: Instant) -> Option<T> {
        let deadline = self.deadline?;
        if now < deadline {
            return None;
        }
        self.deadline = None;
        if self.immediate {
            None
        } else {
            self.pending.take()
        }
    }

    /// Earliest instant at which `poll()` has an effect.
    pub fn next_deadline(&self) -> Option<Instant> {
        self.deadline
    }

    /// True while a deferred fire (or immediate-mode suppression window) is
    /// outstanding.
    pub fn is_armed(&self) -> bool {
        self.deadline.is_some()
    }

    /// Clear the deferred payload and disarm.
    pub fn cancel(&mut self) {
        self.deadline = None;
        self.pending = None;
    }
}
