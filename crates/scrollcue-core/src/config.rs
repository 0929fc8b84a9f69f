use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Engine configuration, resolved once at init.
///
/// The engine takes an immutable snapshot of this at `Engine::init`; changing
/// behavior afterwards means re-initializing. `delay_ms`, `duration_ms` and
/// `easing` are styling hooks for consumers (the demo's fade uses them) and
/// never influence trigger geometry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Px subtracted from the viewport height when computing the enter
    /// threshold (the trigger line sits `offset` px above the viewport
    /// bottom).
    #[serde(default = "default_offset")]
    pub offset: f64,
    /// Per-element animation delay in ms (styling hook only).
    #[serde(default)]
    pub delay_ms: u64,
    /// Per-element animation duration in ms (styling hook only).
    #[serde(default = "default_duration_ms")]
    pub duration_ms: u64,
    /// Easing curve name (styling hook only).
    #[serde(default = "default_easing")]
    pub easing: String,
    /// Class toggled on visibility.
    #[serde(default = "default_animated_class_name")]
    pub animated_class_name: String,
    /// Class added once at initialization.
    #[serde(default = "default_init_class_name")]
    pub init_class_name: String,
    /// Scroll handler rate limit in ms.
    #[serde(default = "default_throttle_delay_ms")]
    pub throttle_delay_ms: u64,
    /// Resize/mutation handler settle delay in ms.
    #[serde(default = "default_debounce_delay_ms")]
    pub debounce_delay_ms: u64,
    /// Globally skip initialization.
    #[serde(default)]
    pub disable: bool,
    /// Default "trigger once" behavior per element.
    #[serde(default)]
    pub once: bool,
    /// Default "reverse on scroll-out" behavior per element.
    #[serde(default)]
    pub mirror: bool,
    /// Declared but not consumed by the geometry computation (reserved).
    #[serde(default = "default_anchor_placement")]
    pub anchor_placement: String,
    /// Skip the structural-change observer subscription.
    #[serde(default)]
    pub disable_mutation_observer: bool,
    /// Name of the document-level event that triggers the first evaluation.
    #[serde(default = "default_start_event")]
    pub start_event: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            offset: default_offset(),
            delay_ms: 0,
            duration_ms: default_duration_ms(),
            easing: default_easing(),
            animated_class_name: default_animated_class_name(),
            init_class_name: default_init_class_name(),
            throttle_delay_ms: default_throttle_delay_ms(),
            debounce_delay_ms: default_debounce_delay_ms(),
            disable: false,
            once: false,
            mirror: false,
            anchor_placement: default_anchor_placement(),
            disable_mutation_observer: false,
            start_event: default_start_event(),
        }
    }
}

fn default_offset() -> f64 {
    120.0
}

fn default_duration_ms() -> u64 {
    400
}

fn default_easing() -> String {
    "ease".to_string()
}

fn default_animated_class_name() -> String {
    "aos-animate".to_string()
}

fn default_init_class_name() -> String {
    "aos-init".to_string()
}

fn default_throttle_delay_ms() -> u64 {
    99
}

fn default_debounce_delay_ms() -> u64 {
    50
}

fn default_anchor_placement() -> String {
    "top-bottom".to_string()
}

fn default_start_event() -> String {
    "DOMContentLoaded".to_string()
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load(path: &Path) -> crate::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        toml::from_str(&content).map_err(|e| crate::Error::Config(e.to_string()))
    }

    /// Load from a TOML file if it exists, otherwise use defaults.
    pub fn load_or_default(path: &Path) -> crate::Result<Self> {
        if path.exists() {
            Self::load(path)
        } else {
            Ok(Self::default())
        }
    }

    /// Scroll handler rate limit as a Duration.
    #[inline]
    pub fn throttle_delay(&self) -> Duration {
        Duration::from_millis(self.throttle_delay_ms)
    }

    /// Resize/mutation settle delay as a Duration.
    #[inline]
    pub fn debounce_delay(&self) -> Duration {
        Duration::from_millis(self.debounce_delay_ms)
    }

    /// Styling-hook animation duration as a Duration.
    #[inline]
    pub fn duration(&self) -> Duration {
        Duration::from_millis(self.duration_ms)
    }

    /// Styling-hook animation delay as a Duration.
    #[inline]
    pub fn delay(&self) -> Duration {
        Duration::from_millis(self.delay_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.offset, 120.0);
        assert_eq!(config.delay_ms, 0);
        assert_eq!(config.duration_ms, 400);
        assert_eq!(config.easing, "ease");
        assert_eq!(config.animated_class_name, "aos-animate");
        assert_eq!(config.init_class_name, "aos-init");
        assert_eq!(config.throttle_delay_ms, 99);
        assert_eq!(config.debounce_delay_ms, 50);
        assert!(!config.disable);
        assert!(!config.once);
        assert!(!config.mirror);
        assert_eq!(config.anchor_placement, "top-bottom");
        assert!(!config.disable_mutation_observer);
        assert_eq!(config.start_event, "DOMContentLoaded");
    }

    #[test]
    fn test_partial_toml_fills_defaults() {
        let config: Config = toml::from_str(
            r#"
            offset = 80.0
            mirror = true
            "#,
        )
        .unwrap();
        assert_eq!(config.offset, 80.0);
        assert!(config.mirror);
        assert_eq!(config.throttle_delay_ms, 99);
        assert_eq!(config.animated_class_name, "aos-animate");
    }

    #[test]
    fn test_unknown_fields_ignored() {
        let config: Config = toml::from_str(
            r#"
            once = true
            some_future_option = "ignored"
            "#,
        )
        .unwrap();
        assert!(config.once);
    }

    #[test]
    fn test_durations() {
        let config = Config::default();
        assert_eq!(config.throttle_delay(), Duration::from_millis(99));
        assert_eq!(config.debounce_delay(), Duration::from_millis(50));
        assert_eq!(config.duration(), Duration::from_millis(400));
        assert_eq!(config.delay(), Duration::ZERO);
    }
}
