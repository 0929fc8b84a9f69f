//! Headless scroll-reveal engine.
//!
//! Detects when tracked nodes scroll into a viewport and toggles a class set
//! to trigger consumer-defined animations, optionally reversing on scroll-out
//! (mirror mode) or latching permanently after the first trigger (once mode).
//! The engine is host-agnostic: anything that can report viewport metrics and
//! node geometry, and accept class mutations, can implement [`Document`] and
//! drive the engine from its event loop.
//!
//! # Architecture
//!
//! Atoms:
//! - `limiter` - throttle/debounce schedulers (clock-explicit, timer-free)
//! - `geometry` - viewport/document coordinate resolution
//!
//! Composites:
//! - `tracker` - per-element trigger windows and visibility evaluation
//! - `observer` - debounced structural-change watching
//! - `engine` - the orchestrator tying config, elements, and handlers
//!   together
//!
//! # Usage
//!
//! ```
//! use scrollcue_core::{Config, Engine, MemoryDocument};
//! use std::time::Instant;
//!
//! let mut doc = MemoryDocument::new(800.0);
//! doc.insert_tracked(1000.0, 50.0, "fade-up");
//!
//! let mut engine = Engine::init(Config::default(), &mut doc);
//! engine.on_ready(&mut doc);
//!
//! // From the host event loop:
//! doc.set_scroll_top(400.0);
//! engine.on_scroll(&mut doc, Instant::now());
//! engine.tick(&mut doc, Instant::now());
//! ```

pub mod config;
pub mod document;
pub mod engine;
pub mod error;
pub mod geometry;
pub mod limiter;
pub mod observer;
pub mod tracker;

pub use config::Config;
pub use document::{Document, MemoryDocument, NodeId};
pub use engine::Engine;
pub use error::{Error, Result};
pub use geometry::{absolute_offset, Offset, Rect, Viewport};
pub use limiter::{Debounce, Throttle};
pub use observer::MutationWatcher;
pub use tracker::{is_visible, TrackedElement, TriggerWindow};
