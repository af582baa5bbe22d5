//! Behavior configuration module.
//!
//! Handles loading and validating `behavior.toml`. Configuration covers
//! timing and thresholds only — how long windows are, where breakpoints
//! sit. The class-name and data-attribute vocabulary is deliberately not
//! configurable: it is the contract between the behavior layer, the markup,
//! and the stylesheet, and lives as constants in the modules that own it.
//!
//! ## Configuration Options
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! [menu]
//! resize_debounce_ms = 250   # Quiet period before re-checking the breakpoint
//! desktop_breakpoint = 768   # Viewport width at which the menu force-closes
//!
//! [scroll]
//! throttle_ms = 100          # Minimum spacing between scroll evaluations
//! lookahead = 100            # Pixels ahead of the viewport top that count as "in view"
//! top_threshold = 300        # Scroll offset past which the to-top control shows
//! header_fallback = 72       # Assumed header height when no header element exists
//!
//! [notify]
//! timeout_ms = 5000          # Display window before auto-dismissal
//! fade_ms = 150              # Grace between visual dismissal and removal
//!
//! [form]
//! latency_ms = 1000          # Simulated submission latency
//! redirect_delay_ms = 1500   # Pause between success feedback and redirect
//! confirmation_url = "thank_you.html"
//!
//! [counter]
//! duration_ms = 2000         # Full count-up animation length
//! tick_ms = 16               # Animation frame interval
//! ```
//!
//! ## Partial Configuration
//!
//! Config files are sparse — override just the values you want:
//!
//! ```toml
//! # Only slow the toasts down
//! [notify]
//! timeout_ms = 8000
//! ```
//!
//! Unknown keys are rejected to catch typos early.

use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Behavior timing and thresholds loaded from `behavior.toml`.
///
/// All fields have the stock values as defaults. User config files need
/// only specify the values they want to override. Unknown keys are rejected.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BehaviorConfig {
    /// Collapsible menu settings.
    pub menu: MenuConfig,
    /// Scrollspy / smooth-scroll / to-top settings.
    pub scroll: ScrollConfig,
    /// Notification lifecycle settings.
    pub notify: NotifyConfig,
    /// Form submission pipeline settings.
    pub form: FormConfig,
    /// Count-up animation settings.
    pub counter: CounterConfig,
}

impl BehaviorConfig {
    /// Validate config values are within acceptable ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.menu.desktop_breakpoint == 0 {
            return Err(ConfigError::Validation(
                "menu.desktop_breakpoint must be non-zero".into(),
            ));
        }
        if self.counter.tick_ms == 0 {
            return Err(ConfigError::Validation(
                "counter.tick_ms must be non-zero".into(),
            ));
        }
        if self.counter.duration_ms < self.counter.tick_ms {
            return Err(ConfigError::Validation(
                "counter.duration_ms must be at least one tick".into(),
            ));
        }
        if self.form.confirmation_url.is_empty() {
            return Err(ConfigError::Validation(
                "form.confirmation_url must not be empty".into(),
            ));
        }
        Ok(())
    }
}

/// Collapsible menu settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct MenuConfig {
    /// Quiet period after the last resize before re-checking the breakpoint.
    pub resize_debounce_ms: u64,
    /// Viewport width (px) at and above which an open menu force-closes.
    pub desktop_breakpoint: u32,
}

impl Default for MenuConfig {
    fn default() -> Self {
        Self {
            resize_debounce_ms: 250,
            desktop_breakpoint: 768,
        }
    }
}

/// Scroll-driven behavior settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ScrollConfig {
    /// Minimum spacing (ms) between scroll evaluations.
    pub throttle_ms: u64,
    /// Pixels ahead of the viewport top that count as "in view".
    pub lookahead: i64,
    /// Scroll offset (px) past which the to-top control becomes visible.
    pub top_threshold: i64,
    /// Assumed header height (px) when the page has no header element.
    pub header_fallback: i64,
}

impl Default for ScrollConfig {
    fn default() -> Self {
        Self {
            throttle_ms: 100,
            lookahead: 100,
            top_threshold: 300,
            header_fallback: 72,
        }
    }
}

/// Notification lifecycle settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct NotifyConfig {
    /// Display window (ms) before automatic dismissal.
    pub timeout_ms: u64,
    /// Grace (ms) between visual dismissal and physical removal.
    pub fade_ms: u64,
}

impl Default for NotifyConfig {
    fn default() -> Self {
        Self {
            timeout_ms: 5000,
            fade_ms: 150,
        }
    }
}

/// Form submission pipeline settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FormConfig {
    /// Simulated submission latency (ms) before the backend resolves.
    pub latency_ms: u64,
    /// Pause (ms) between success feedback and the confirmation redirect.
    pub redirect_delay_ms: u64,
    /// Destination of the post-success redirect.
    pub confirmation_url: String,
}

impl Default for FormConfig {
    fn default() -> Self {
        Self {
            latency_ms: 1000,
            redirect_delay_ms: 1500,
            confirmation_url: "thank_you.html".to_string(),
        }
    }
}

/// Count-up animation settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CounterConfig {
    /// Full animation length (ms).
    pub duration_ms: u64,
    /// Frame interval (ms).
    pub tick_ms: u64,
}

impl Default for CounterConfig {
    fn default() -> Self {
        Self {
            duration_ms: 2000,
            tick_ms: 16,
        }
    }
}

/// Load and validate a config file; `None` yields the stock defaults.
pub fn load_config(path: Option<&Path>) -> Result<BehaviorConfig, ConfigError> {
    let config = match path {
        Some(p) => {
            let content = std::fs::read_to_string(p)?;
            toml::from_str(&content)?
        }
        None => BehaviorConfig::default(),
    };
    config.validate()?;
    Ok(config)
}

/// A stock `behavior.toml` with all options documented.
pub fn stock_config_toml() -> String {
    r#"# sitewire behavior configuration
# All options are optional - the values below are the defaults.

[menu]
resize_debounce_ms = 250   # Quiet period before re-checking the breakpoint
desktop_breakpoint = 768   # Viewport width at which the menu force-closes

[scroll]
throttle_ms = 100          # Minimum spacing between scroll evaluations
lookahead = 100            # Pixels ahead of the viewport top that count as "in view"
top_threshold = 300        # Scroll offset past which the to-top control shows
header_fallback = 72       # Assumed header height when no header element exists

[notify]
timeout_ms = 5000          # Display window before auto-dismissal
fade_ms = 150              # Grace between visual dismissal and removal

[form]
latency_ms = 1000          # Simulated submission latency
redirect_delay_ms = 1500   # Pause between success feedback and redirect
confirmation_url = "thank_you.html"

[counter]
duration_ms = 2000         # Full count-up animation length
tick_ms = 16               # Animation frame interval
"#
    .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_the_stock_values() {
        let config = BehaviorConfig::default();
        assert_eq!(config.menu.resize_debounce_ms, 250);
        assert_eq!(config.menu.desktop_breakpoint, 768);
        assert_eq!(config.scroll.throttle_ms, 100);
        assert_eq!(config.notify.timeout_ms, 5000);
        assert_eq!(config.notify.fade_ms, 150);
        assert_eq!(config.form.confirmation_url, "thank_you.html");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn sparse_override_keeps_other_defaults() {
        let config: BehaviorConfig = toml::from_str(
            r#"
[notify]
timeout_ms = 8000
"#,
        )
        .unwrap();
        assert_eq!(config.notify.timeout_ms, 8000);
        assert_eq!(config.notify.fade_ms, 150);
        assert_eq!(config.menu.desktop_breakpoint, 768);
    }

    #[test]
    fn unknown_key_is_rejected() {
        let result: Result<BehaviorConfig, _> = toml::from_str(
            r#"
[menu]
resize_debounce = 250
"#,
        );
        assert!(result.is_err());
    }

    #[test]
    fn zero_breakpoint_fails_validation() {
        let config: BehaviorConfig = toml::from_str(
            r#"
[menu]
desktop_breakpoint = 0
"#,
        )
        .unwrap();
        assert!(matches!(
            config.validate(),
            Err(ConfigError::Validation(_))
        ));
    }

    #[test]
    fn zero_tick_fails_validation() {
        let config: BehaviorConfig = toml::from_str(
            r#"
[counter]
tick_ms = 0
"#,
        )
        .unwrap();
        assert!(matches!(
            config.validate(),
            Err(ConfigError::Validation(_))
        ));
    }

    #[test]
    fn stock_config_round_trips() {
        let config: BehaviorConfig = toml::from_str(&stock_config_toml()).unwrap();
        assert!(config.validate().is_ok());
        assert_eq!(config.form.latency_ms, 1000);
    }
}
