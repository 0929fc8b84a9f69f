//! Reveal fade styling.
//!
//! The engine only toggles classes; what "animated" looks like is the
//! consumer's business. Here a revealed section fades in over the configured
//! duration, after the configured delay, along the configured easing curve.

use std::time::{Duration, Instant};

/// Easing curves keyed by the CSS-style names the config carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Easing {
    Linear,
    Ease,
    EaseIn,
    EaseOut,
    EaseInOut,
}

impl Easing {
    /// Parse a config easing name; unknown names fall back to `Ease`.
    pub fn from_name(name: &str) -> Self {
        match name {
            "linear" => Easing::Linear,
            "ease-in" => Easing::EaseIn,
            "ease-out" => Easing::EaseOut,
            "ease-in-out" => Easing::EaseInOut,
            _ => Easing::Ease,
        }
    }

    /// Map progress [0, 1] through the curve.
    pub fn apply(&self, t: f64) -> f64 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Easing::Linear => t,
            // Close enough to the CSS `ease` feel for a text fade.
            Easing::Ease | Easing::EaseOut => cubic_ease_out(t),
            Easing::EaseIn => t * t * t,
            Easing::EaseInOut => cubic_ease_in_out(t),
        }
    }
}

/// Cubic ease-out: f(t) = 1 - (1-t)³
#[inline]
fn cubic_ease_out(t: f64) -> f64 {
    let inv = 1.0 - t;
    1.0 - inv * inv * inv
}

#[inline]
fn cubic_ease_in_out(t: f64) -> f64 {
    if t < 0.5 {
        4.0 * t * t * t
    } else {
        let inv = -2.0 * t + 2.0;
        1.0 - inv * inv * inv / 2.0
    }
}

/// One in-flight fade for a revealed section.
#[derive(Debug, Clone, Copy)]
pub struct Fade {
    /// When the fade begins (reveal time plus the configured delay).
    start: Instant,
    duration: Duration,
    easing: Easing,
}

impl Fade {
    pub fn new(revealed_at: Instant, delay: Duration, duration: Duration, easing: Easing) -> Self {
        Self {
            start: revealed_at + delay,
            duration,
            easing,
        }
    }

    /// Eased fade level in [0, 1] at `now`. Zero before the delay expires,
    /// one once the duration has run out.
    pub fn level(&self, now: Instant) -> f64 {
        if now < self.start {
            return 0.0;
        }
        if self.duration.is_zero() {
            return 1.0;
        }
        let elapsed = now.duration_since(self.start);
        let t = (elapsed.as_secs_f64() / self.duration.as_secs_f64()).clamp(0.0, 1.0);
        self.easing.apply(t)
    }

    /// True once the fade has fully run.
    pub fn is_done(&self, now: Instant) -> bool {
        now >= self.start + self.duration
    }
}
