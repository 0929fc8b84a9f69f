//! The orchestrator: wires configuration, the tracked-element set, and the
//! rate-limited event handlers into one value.
//!
//! Hosts forward their events into the engine (`on_scroll`, `on_resize`,
//! `on_mutation`, `on_ready`) and call [`Engine::tick`] from their event loop
//! so deferred trailing/debounced work gets released. Everything runs
//! cooperatively on the caller's thread; no handler preempts another, and no
//! two evaluation passes ever overlap.
//!
//! The engine value is also the teardown handle: dropping it (or calling
//! [`Engine::shutdown`]) cancels all pending rate-limiter state, so nothing
//! can fire into a torn-down host.

use std::collections::HashSet;
use std::time::Instant;

use tracing::{debug, trace};

use crate::config::Config;
use crate::document::{Document, NodeId};
use crate::limiter::{Debounce, Throttle};
use crate::observer::MutationWatcher;
use crate::tracker::{self, TrackedElement};

pub struct Engine {
    config: Config,
    elements: Vec<TrackedElement>,
    scroll: Throttle<()>,
    resize: Debounce<()>,
    watcher: MutationWatcher,
    /// False when `disable` was set at init or after `shutdown()`.
    active: bool,
    /// Set by the one-shot ready signal.
    started: bool,
}

impl Engine {
    /// Resolve configuration, snapshot every marked node into a tracked
    /// element (tagging it with the init class), and arm the event handlers.
    ///
    /// With `config.disable` set the engine comes up inert: handlers and
    /// ticks are no-ops and no node is touched.
    pub fn init<D: Document>(config: Config, doc: &mut D) -> Self {
        let scroll = Throttle::with_interval(config.throttle_delay());
        let resize = Debounce::with_delay(config.debounce_delay());
        let watcher = MutationWatcher::new(
            config.debounce_delay(),
            !config.disable_mutation_observer && doc.supports_mutation_events(),
        );

        if config.disable {
            debug!("engine disabled by configuration");
            return Self {
                config,
                elements: Vec::new(),
                scroll,
                resize,
                watcher,
                active: false,
                started: false,
            };
        }

        let elements = tracker::snapshot(doc, &config);
        debug!(
            elements = elements.len(),
            offset = config.offset,
            once = config.once,
            mirror = config.mirror,
            "engine initialized"
        );

        Self {
            config,
            elements,
            scroll,
            resize,
            watcher,
            active: true,
            started: false,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn elements(&self) -> &[TrackedElement] {
        &self.elements
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Whether the ready signal has been observed.
    pub fn is_started(&self) -> bool {
        self.started
    }

    /// One-shot ready signal (the host's analogue of the configured start
    /// event): runs the first evaluation pass. Later calls are ignored.
    pub fn on_ready<D: Document>(&mut self, doc: &mut D) {
        if !self.active || self.started {
            return;
        }
        self.started = true;
        debug!(event = %self.config.start_event, "ready signal, first evaluation");
        self.evaluate(doc);
    }

    /// Scroll notification. Throttled: fires an evaluation on the leading
    /// edge, and `tick()` releases at most one trailing evaluation per
    /// throttle window.
    pub fn on_scroll<D: Document>(&mut self, doc: &mut D, now: Instant) {
        if !self.active {
            return;
        }
        if self.scroll.call(now, ()).is_some() {
            self.evaluate(doc);
        }
    }

    /// Resize notification. Debounced: once the resize burst settles,
    /// `tick()` rebuilds every trigger window and re-evaluates.
    pub fn on_resize(&mut self, now: Instant) {
        if !self.active {
            return;
        }
        self.resize.call(now, ());
    }

    /// Structural-change notification. Debounced like resize; once settled,
    /// `tick()` re-snapshots the tracked set wholesale and re-evaluates.
    pub fn on_mutation(&mut self, now: Instant) {
        if !self.active {
            return;
        }
        self.watcher.notify(now);
    }

    /// Release deferred work: trailing scroll evaluations, settled resize
    /// recomputations, settled mutation re-snapshots. Call from the host
    /// event loop; `next_deadline()` tells the host when the next call can
    /// have an effect.
    pub fn tick<D: Document>(&mut self, doc: &mut D, now: Instant) {
        if !self.active {
            return;
        }
        if self.scroll.poll(now).is_some() {
            self.evaluate(doc);
        }
        if self.resize.poll(now).is_some() {
            self.rebuild_windows(doc);
            self.evaluate(doc);
        }
        if self.watcher.poll(now) {
            self.resnapshot(doc);
            self.evaluate(doc);
        }
    }

    /// Earliest instant at which `tick()` has pending work, if any.
    pub fn next_deadline(&self) -> Option<Instant> {
        [
            self.scroll.next_deadline(),
            self.resize.next_deadline(),
            self.watcher.next_deadline(),
        ]
        .into_iter()
        .flatten()
        .min()
    }

    /// Cancel all pending rate-limiter state and deactivate the engine.
    /// Class state already applied to the document is left as-is.
    pub fn shutdown(&mut self) {
        self.scroll.cancel();
        self.resize.cancel();
        self.watcher.cancel();
        self.active = false;
        debug!("engine shut down");
    }

    fn evaluate<D: Document>(&mut self, doc: &mut D) {
        let scroll_top = doc.viewport().scroll_top;
        trace!(scroll_top, elements = self.elements.len(), "evaluate");
        tracker::evaluate(doc, &mut self.elements, scroll_top);
    }

    /// Geometry changed but the document structure did not: recompute every
    /// window in place.
    fn rebuild_windows<D: Document>(&mut self, doc: &D) {
        let offset = self.config.offset;
        let mut stale = 0;
        for el in &mut self.elements {
            if !el.rebuild_window(doc, offset) {
                stale += 1;
            }
        }
        debug!(
            elements = self.elements.len(),
            stale, "trigger windows rebuilt"
        );
    }

    /// Document structure changed: replace the tracked set wholesale from a
    /// fresh query, carrying once-latches across by node id so a triggered
    /// element stays triggered.
    fn resnapshot<D: Document>(&mut self, doc: &mut D) {
        let latched: HashSet<NodeId> = self
            .elements
            .iter()
            .filter(|el| el.triggered)
            .map(|el| el.node)
            .collect();

        self.elements = tracker::snapshot(doc, &self.config);
        for el in &mut self.elements {
            if latched.contains(&el.node) {
                el.triggered = true;
            }
        }
        debug!(elements = self.elements.len(), "tracked set re-snapshot");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::MemoryDocument;
    use std::time::Duration;

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    /// Viewport 800px, one tracked node at 1000px: enter threshold 320.
    fn setup(config: Config) -> (MemoryDocument, Engine, NodeId) {
        let mut doc = MemoryDocument::new(800.0);
        let node = doc.insert_tracked(1000.0, 50.0, "fade-up");
        let engine = Engine::init(config, &mut doc);
        (doc, engine, node)
    }

    #[test]
    fn test_disable_short_circuits_init() {
        let config = Config {
            disable: true,
            ..Default::default()
        };
        let (mut doc, mut engine, node) = setup(config);

        assert!(!engine.is_active());
        assert!(engine.elements().is_empty());
        assert!(!doc.has_class(node, "aos-init"));

        // Handlers are inert.
        engine.on_ready(&mut doc);
        doc.set_scroll_top(500.0);
        engine.on_scroll(&mut doc, Instant::now());
        assert!(!doc.has_class(node, "aos-animate"));
    }

    #[test]
    fn test_init_tags_and_ready_evaluates_once() {
        let (mut doc, mut engine, node) = setup(Config::default());
        assert!(doc.has_class(node, "aos-init"));
        assert!(!doc.has_class(node, "aos-animate"));

        doc.set_scroll_top(400.0);
        engine.on_ready(&mut doc);
        assert!(engine.is_started());
        assert!(doc.has_class(node, "aos-animate"));

        // The ready signal is one-shot: a second delivery does not
        // re-evaluate.
        doc.set_scroll_top(0.0);
        engine.on_ready(&mut doc);
        assert!(doc.has_class(node, "aos-animate"));
    }

    #[test]
    fn test_scroll_is_throttled_with_trailing_evaluation() {
        let t0 = Instant::now();
        let (mut doc, mut engine, node) = setup(Config::default());

        // Leading edge evaluates immediately.
        doc.set_scroll_top(400.0);
        engine.on_scroll(&mut doc, t0);
        assert!(doc.has_class(node, "aos-animate"));

        // Burst continues; suppressed call sees the scroll back to top.
        doc.set_scroll_top(0.0);
        engine.on_scroll(&mut doc, t0 + ms(10));
        assert!(doc.has_class(node, "aos-animate"));

        // Trailing evaluation lands once the 99ms window elapses.
        engine.tick(&mut doc, t0 + ms(50));
        assert!(doc.has_class(node, "aos-animate"));
        engine.tick(&mut doc, t0 + ms(99));
        assert!(!doc.has_class(node, "aos-animate"));
    }

    #[test]
    fn test_resize_rebuilds_windows_after_settle() {
        let t0 = Instant::now();
        let (mut doc, mut engine, _) = setup(Config::default());
        assert_eq!(engine.elements()[0].window.enter, 320.0);

        doc.set_viewport_height(600.0);
        engine.on_resize(t0);
        engine.on_resize(t0 + ms(20));

        // Still settling.
        engine.tick(&mut doc, t0 + ms(60));
        assert_eq!(engine.elements()[0].window.enter, 320.0);

        // 50ms after the last resize: every window shifts by +200.
        engine.tick(&mut doc, t0 + ms(70));
        assert_eq!(engine.elements()[0].window.enter, 520.0);
    }

    #[test]
    fn test_resize_then_evaluates_at_new_thresholds() {
        let t0 = Instant::now();
        let (mut doc, mut engine, node) = setup(Config::default());

        // Visible at 400 with the 800px viewport.
        doc.set_scroll_top(400.0);
        engine.on_ready(&mut doc);
        assert!(doc.has_class(node, "aos-animate"));

        // Shrink to 600px: enter becomes 520, so 400 is out again.
        doc.set_viewport_height(600.0);
        engine.on_resize(t0);
        engine.tick(&mut doc, t0 + ms(50));
        assert!(!doc.has_class(node, "aos-animate"));
    }

    #[test]
    fn test_mutation_resnapshots_wholesale() {
        let t0 = Instant::now();
        let (mut doc, mut engine, _) = setup(Config::default());
        assert_eq!(engine.elements().len(), 1);

        let added = doc.insert_tracked(2000.0, 60.0, "zoom-in");
        engine.on_mutation(t0);
        engine.on_mutation(t0 + ms(10));

        engine.tick(&mut doc, t0 + ms(59));
        assert_eq!(engine.elements().len(), 1);

        engine.tick(&mut doc, t0 + ms(60));
        assert_eq!(engine.elements().len(), 2);
        assert!(doc.has_class(added, "aos-init"));
    }

    #[test]
    fn test_resnapshot_preserves_once_latch() {
        let t0 = Instant::now();
        let config = Config {
            once: true,
            ..Default::default()
        };
        let (mut doc, mut engine, node) = setup(config);

        doc.set_scroll_top(400.0);
        engine.on_ready(&mut doc);
        assert!(doc.has_class(node, "aos-animate"));

        // Structure changes while scrolled back above the threshold.
        doc.set_scroll_top(0.0);
        doc.insert_tracked(3000.0, 40.0, "");
        engine.on_mutation(t0);
        engine.tick(&mut doc, t0 + ms(50));

        // The re-snapshot must not forget the latch and un-toggle.
        assert!(doc.has_class(node, "aos-animate"));
        let el = engine
            .elements()
            .iter()
            .find(|el| el.node == node)
            .unwrap();
        assert!(el.triggered);
    }

    #[test]
    fn test_host_without_mutation_events_degrades() {
        let t0 = Instant::now();
        let mut doc = MemoryDocument::new(800.0).without_mutation_events();
        doc.insert_tracked(1000.0, 50.0, "");
        let mut engine = Engine::init(Config::default(), &mut doc);

        doc.insert_tracked(2000.0, 50.0, "");
        engine.on_mutation(t0);
        engine.tick(&mut doc, t0 + ms(100));
        // No observer support: the tracked set stays as initialized.
        assert_eq!(engine.elements().len(), 1);
    }

    #[test]
    fn test_disable_mutation_observer_config() {
        let config = Config {
            disable_mutation_observer: true,
            ..Default::default()
        };
        let t0 = Instant::now();
        let (mut doc, mut engine, _) = setup(config);

        doc.insert_tracked(2000.0, 50.0, "");
        engine.on_mutation(t0);
        engine.tick(&mut doc, t0 + ms(100));
        assert_eq!(engine.elements().len(), 1);
    }

    #[test]
    fn test_shutdown_cancels_pending_work() {
        let t0 = Instant::now();
        let (mut doc, mut engine, node) = setup(Config::default());

        doc.set_scroll_top(400.0);
        engine.on_scroll(&mut doc, t0);
        doc.set_scroll_top(0.0);
        engine.on_scroll(&mut doc, t0 + ms(10));
        assert!(engine.next_deadline().is_some());

        engine.shutdown();
        assert!(engine.next_deadline().is_none());
        engine.tick(&mut doc, t0 + ms(200));
        // The trailing evaluation never fires; applied classes are left
        // as-is.
        assert!(doc.has_class(node, "aos-animate"));
    }

    #[test]
    fn test_next_deadline_reports_earliest() {
        let t0 = Instant::now();
        let (mut doc, mut engine, _) = setup(Config::default());

        engine.on_resize(t0); // due at +50ms
        engine.on_scroll(&mut doc, t0); // leading fire, nothing pending
        engine.on_scroll(&mut doc, t0 + ms(1)); // trailing due at +99ms

        assert_eq!(engine.next_deadline(), Some(t0 + ms(50)));
    }
}
