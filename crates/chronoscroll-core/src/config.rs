//! Configuration loading and typed config structures for Chronoscroll.
//!
//! The configuration lives in `chronoscroll-config.yaml` at the project
//! root. This module defines strongly-typed structs that mirror the YAML
//! structure, and provides a loader that reads and validates the file.
//! Every field has a default, so an empty document is a valid configuration.

use std::path::Path;

use chronoscroll_types::{ActivationPolicy, Orientation};
use serde::Deserialize;

/// Environment variable that pins the calendar year.
const CURRENT_YEAR_ENV: &str = "CHRONOSCROLL_CURRENT_YEAR";

/// Environment variable that overrides the log level.
const LOG_LEVEL_ENV: &str = "CHRONOSCROLL_LOG_LEVEL";

/// Errors that can occur when loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Failed to read the configuration file from disk.
    #[error("failed to read config file: {source}")]
    Io {
        /// The underlying I/O error.
        #[from]
        source: std::io::Error,
    },

    /// Failed to parse YAML content.
    #[error("failed to parse config YAML: {source}")]
    Yaml {
        /// The underlying YAML parse error.
        source: serde_yml::Error,
    },

    /// A value parsed but is out of its allowed range.
    #[error("invalid configuration: {reason}")]
    Invalid {
        /// Explanation of what is wrong with the configuration.
        reason: String,
    },
}

impl From<serde_yml::Error> for ConfigError {
    fn from(source: serde_yml::Error) -> Self {
        Self::Yaml { source }
    }
}

/// Top-level timeline configuration.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct TimelineConfig {
    /// Nonlinear axis settings.
    #[serde(default)]
    pub axis: AxisConfig,

    /// Viewport window, buffer and hot-zone geometry.
    #[serde(default)]
    pub viewport: ViewportConfig,

    /// Activation policy and scale curve.
    #[serde(default)]
    pub activation: ActivationConfig,

    /// Calendar anchor.
    #[serde(default)]
    pub calendar: CalendarConfig,

    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl TimelineConfig {
    /// Load configuration from a YAML file at the given path.
    ///
    /// Environment variables override YAML values:
    /// - `CHRONOSCROLL_CURRENT_YEAR` overrides `calendar.current_year`
    /// - `CHRONOSCROLL_LOG_LEVEL` overrides `logging.level`
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] if the file cannot be read,
    /// [`ConfigError::Yaml`] if the content is not valid YAML, or
    /// [`ConfigError::Invalid`] if a value is out of range.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        let mut config = if contents.trim().is_empty() {
            Self::default()
        } else {
            serde_yml::from_str(&contents)?
        };
        config.apply_env_overrides()?;
        config.validate()?;
        Ok(config)
    }

    /// Parse configuration from a YAML string.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Yaml`] if the string is not valid YAML, or
    /// [`ConfigError::Invalid`] if a value is out of range.
    pub fn parse(yaml: &str) -> Result<Self, ConfigError> {
        // An empty document deserializes as unit, not as an empty mapping.
        if yaml.trim().is_empty() {
            return Ok(Self::default());
        }
        let config: Self = serde_yml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Check every numeric setting against its allowed range.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] naming the first offending field.
    pub fn validate(&self) -> Result<(), ConfigError> {
        require_positive("axis.zoom_factor", self.axis.zoom_factor)?;
        require_non_negative("viewport.buffer_viewports", self.viewport.buffer_viewports)?;
        require_unit_interval("viewport.center_ratio", self.viewport.center_ratio)?;
        require_non_negative(
            "viewport.activation_radius_ratio",
            self.viewport.activation_radius_ratio,
        )?;
        require_non_negative("viewport.initial_length", self.viewport.initial_length)?;
        require_non_negative("activation.base_scale", self.activation.base_scale)?;
        require_non_negative("activation.scale_range", self.activation.scale_range)?;
        require_non_negative("activation.inactive_scale", self.activation.inactive_scale)?;
        Ok(())
    }

    fn apply_env_overrides(&mut self) -> Result<(), ConfigError> {
        if let Ok(raw) = std::env::var(CURRENT_YEAR_ENV) {
            let year = raw.trim().parse::<i32>().map_err(|err| ConfigError::Invalid {
                reason: format!("{CURRENT_YEAR_ENV}={raw} is not a year: {err}"),
            })?;
            self.calendar.current_year = Some(year);
        }
        if let Ok(level) = std::env::var(LOG_LEVEL_ENV) {
            self.logging.level = level;
        }
        Ok(())
    }
}

fn require_positive(field: &str, value: f64) -> Result<(), ConfigError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::Invalid {
            reason: format!("{field} must be a positive finite number, got {value}"),
        })
    }
}

fn require_non_negative(field: &str, value: f64) -> Result<(), ConfigError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(ConfigError::Invalid {
            reason: format!("{field} must be a non-negative finite number, got {value}"),
        })
    }
}

fn require_unit_interval(field: &str, value: f64) -> Result<(), ConfigError> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(ConfigError::Invalid {
            reason: format!("{field} must be within 0..=1, got {value}"),
        })
    }
}

/// Nonlinear axis configuration.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct AxisConfig {
    /// Axis units per natural-log unit of time. Controls visual density.
    #[serde(default = "default_zoom_factor")]
    pub zoom_factor: f64,

    /// Scroll dimension of the page.
    #[serde(default)]
    pub orientation: Orientation,
}

impl Default for AxisConfig {
    fn default() -> Self {
        Self {
            zoom_factor: default_zoom_factor(),
            orientation: Orientation::default(),
        }
    }
}

/// Viewport window and hot-zone geometry, as fractions of the viewport length.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct ViewportConfig {
    /// Pre-render buffer on each side of the viewport, in viewport lengths.
    #[serde(default = "default_buffer_viewports")]
    pub buffer_viewports: f64,

    /// Where the focus line sits within the viewport (0 = leading edge).
    #[serde(default = "default_half")]
    pub center_ratio: f64,

    /// Activation radius, in viewport lengths.
    #[serde(default = "default_half")]
    pub activation_radius_ratio: f64,

    /// Viewport length assumed before the first resize notification.
    #[serde(default = "default_initial_length")]
    pub initial_length: f64,
}

impl Default for ViewportConfig {
    fn default() -> Self {
        Self {
            buffer_viewports: default_buffer_viewports(),
            center_ratio: default_half(),
            activation_radius_ratio: default_half(),
            initial_length: default_initial_length(),
        }
    }
}

/// Activation policy and scale curve.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct ActivationConfig {
    /// Which in-radius nodes become active.
    #[serde(default)]
    pub policy: ActivationPolicy,

    /// Scale of an active node at the edge of the hot zone.
    #[serde(default = "default_base_scale")]
    pub base_scale: f64,

    /// Extra scale gained between the edge and the exact center.
    #[serde(default = "default_scale_range")]
    pub scale_range: f64,

    /// Scale of nodes outside the hot zone.
    #[serde(default = "default_inactive_scale")]
    pub inactive_scale: f64,
}

impl ActivationConfig {
    /// Scale of a node sitting exactly on the center line.
    pub const fn max_scale(&self) -> f64 {
        self.base_scale + self.scale_range
    }
}

impl Default for ActivationConfig {
    fn default() -> Self {
        Self {
            policy: ActivationPolicy::default(),
            base_scale: default_base_scale(),
            scale_range: default_scale_range(),
            inactive_scale: default_inactive_scale(),
        }
    }
}

/// Calendar anchor configuration.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
pub struct CalendarConfig {
    /// Pinned current year. `None` reads the system clock.
    #[serde(default)]
    pub current_year: Option<i32>,
}

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

// ---------------------------------------------------------------------------
// Default value functions for serde
// ---------------------------------------------------------------------------

const fn default_zoom_factor() -> f64 {
    400.0
}

const fn default_buffer_viewports() -> f64 {
    1.0
}

const fn default_half() -> f64 {
    0.5
}

const fn default_initial_length() -> f64 {
    800.0
}

const fn default_base_scale() -> f64 {
    0.5
}

const fn default_scale_range() -> f64 {
    0.7
}

const fn default_inactive_scale() -> f64 {
    0.5
}

fn default_log_level() -> String {
    "info".to_owned()
}
