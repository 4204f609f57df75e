//! Session configuration types.

use std::path::PathBuf;
use std::time::Duration;

use derive_builder::Builder;
use serde::{Deserialize, Serialize};

/// Tunables for a browsing session and its pointer input.
#[derive(Debug, Clone, Builder, Serialize, Deserialize)]
#[builder(setter(into), build_fn(validate = "Self::validate"))]
#[serde(default)]
pub struct SessionConfig {
    /// Maximum delay between two presses on the same item that counts as a
    /// double-click, in milliseconds.
    #[builder(default = "500")]
    pub double_click_ms: u64,

    /// Rename delay as a multiple of the double-click interval.
    #[builder(default = "1.5")]
    pub rename_delay_factor: f64,

    /// Horizontal movement before a press turns into a drag.
    #[builder(default = "4.0")]
    pub drag_threshold_x: f64,

    /// Vertical movement before a press turns into a drag.
    #[builder(default = "4.0")]
    pub drag_threshold_y: f64,

    /// Upper bound on search results kept per query.
    #[builder(default = "999")]
    pub max_search_results: usize,

    /// Rect-select auto-scroll tick, in milliseconds.
    #[builder(default = "20")]
    pub autoscroll_tick_ms: u64,

    /// Distance from the viewport edge at which auto-scroll starts.
    #[builder(default = "0.0")]
    pub autoscroll_margin: f64,

    /// Overshoot is divided by this to get pixels scrolled per tick.
    #[builder(default = "10.0")]
    pub autoscroll_divisor: f64,

    /// Entries read between cancellation checks during enumeration.
    #[builder(default = "64")]
    pub enumeration_batch: usize,

    /// Include hidden files (starting with .).
    #[builder(default = "true")]
    pub include_hidden: bool,
}

impl SessionConfigBuilder {
    fn validate(&self) -> Result<(), String> {
        if self.double_click_ms == Some(0) {
            return Err("Double-click interval must be positive".to_string());
        }
        if let Some(factor) = self.rename_delay_factor {
            if factor < 1.0 {
                return Err("Rename delay factor must be at least 1.0".to_string());
            }
        }
        if let Some(divisor) = self.autoscroll_divisor {
            if divisor <= 0.0 {
                return Err("Auto-scroll divisor must be positive".to_string());
            }
        }
        if self.enumeration_batch == Some(0) {
            return Err("Enumeration batch size must be positive".to_string());
        }
        if self.autoscroll_tick_ms == Some(0) {
            return Err("Auto-scroll tick must be positive".to_string());
        }
        Ok(())
    }
}

impl SessionConfig {
    /// Create a new session config builder.
    pub fn builder() -> SessionConfigBuilder {
        SessionConfigBuilder::default()
    }

    /// Double-click interval.
    pub fn double_click_interval(&self) -> Duration {
        Duration::from_millis(self.double_click_ms)
    }

    /// Delay between releasing a press on the sole selected item and the
    /// start of inline rename.
    pub fn rename_delay(&self) -> Duration {
        self.double_click_interval().mul_f64(self.rename_delay_factor)
    }

    /// Rect-select auto-scroll tick.
    pub fn autoscroll_tick(&self) -> Duration {
        Duration::from_millis(self.autoscroll_tick_ms)
    }

    /// Whether a pointer displacement exceeds the drag threshold.
    pub fn exceeds_drag_threshold(&self, dx: f64, dy: f64) -> bool {
        dx.abs() > self.drag_threshold_x || dy.abs() > self.drag_threshold_y
    }

    /// Check if hidden entries should be skipped.
    pub fn should_skip_hidden(&self, name: &str) -> bool {
        !self.include_hidden && name.starts_with('.')
    }

    /// Location of the user config file.
    pub fn config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join("tabfile").join("session.toml"))
    }

    /// Load settings from disk, or return defaults.
    pub fn load() -> Self {
        Self::config_path()
            .and_then(|path| std::fs::read_to_string(&path).ok())
            .and_then(|content| toml::from_str(&content).ok())
            .unwrap_or_default()
    }

    /// Save settings to disk.
    pub fn save(&self) -> std::io::Result<()> {
        let path = Self::config_path().ok_or_else(|| {
            std::io::Error::new(std::io::ErrorKind::NotFound, "No config directory")
        })?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))?;

        std::fs::write(&path, content)
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            double_click_ms: 500,
            rename_delay_factor: 1.5,
            drag_threshold_x: 4.0,
            drag_threshold_y: 4.0,
            max_search_results: 999,
            autoscroll_tick_ms: 20,
            autoscroll_margin: 0.0,
            autoscroll_divisor: 10.0,
            enumeration_batch: 64,
            include_hidden: true,
        }
    }
}
