//! Structural-change observation.
//!
//! Hosts forward document mutation notifications (subtree insertions and
//! removals) through [`MutationWatcher::notify`]. Rapid successive mutations
//! are batched behind a debounce; once the churn settles, `poll()` reports
//! that a full re-snapshot and evaluation pass is due. The watcher can be
//! disabled by configuration, and a host without mutation events simply never
//! notifies; geometry then refreshes on scroll/resize only.

use std::time::{Duration, Instant};

use crate::limiter::Debounce;

#[derive(Debug)]
pub struct MutationWatcher {
    debounce: Debounce<()>,
    enabled: bool,
}

impl MutationWatcher {
    pub fn new(settle_delay: Duration, enabled: bool) -> Self {
        Self {
            debounce: Debounce::with_delay(settle_delay),
            enabled,
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Record one structural-change notification.
    pub fn notify(&mut self, now: Instant) {
        if self.enabled {
            self.debounce.call(now, ());
        }
    }

    /// True once the mutation burst has settled; the caller then re-snapshots
    /// tracked elements and re-evaluates.
    pub fn poll(&mut self, now: Instant) -> bool {
        self.enabled && self.debounce.poll(now).is_some()
    }

    pub fn next_deadline(&self) -> Option<Instant> {
        self.debounce.next_deadline()
    }

    pub fn cancel(&mut self) {
        self.debounce.cancel();
    }
}
