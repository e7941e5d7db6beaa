//! Rendering configuration.
//!
//! Loaded from TOML; every key is optional. The binary layers command-line
//! flags over whatever the file provides.

use std::path::{Path, PathBuf};

use fomtrace_protocol::Timestamp;
use serde::Deserialize;
use thiserror::Error;

/// Lanes per locality when several localities share the image.
pub const DEFAULT_MAX_TASKS: usize = 20;

/// Lanes when a single locality gets the whole width.
pub const DEFAULT_MAX_TASKS_SINGLE: usize = 80;

pub const DEFAULT_IO_LANES: usize = 128;

/// Upper bound on gridlines across the visible window.
pub const MAX_GRIDLINES: i64 = 10_000;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("invalid config: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TraceConfig {
    /// Image width, px.
    pub width: u32,
    /// Image height, px.
    pub height: u32,
    /// Number of localities (worker groups).
    pub localities: usize,
    /// Visible window, seconds.
    pub duration: f64,
    /// Window start in trace timestamp format. Taken from the first record when absent.
    pub start: Option<String>,
    /// Gridline step, milliseconds.
    pub step: u64,
    pub output: PathBuf,
    /// Lanes per locality; see [`TraceConfig::max_tasks_per_group`].
    pub max_tasks: Option<usize>,
    pub io_lanes: usize,
    /// Queue waits shorter than this many microseconds are not drawn.
    pub queue_wait_threshold_us: f64,
}

impl Default for TraceConfig {
    fn default() -> Self {
        Self {
            width: 1000,
            height: 1000,
            localities: 1,
            duration: 1.0,
            start: None,
            step: 100,
            output: PathBuf::from("out.svg"),
            max_tasks: None,
            io_lanes: DEFAULT_IO_LANES,
            queue_wait_threshold_us: 1000.0,
        }
    }
}

impl TraceConfig {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml(&text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn from_toml(text: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(text)
    }

    /// `<config dir>/fomtrace/config.toml`, if the platform has a config dir.
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("fomtrace").join("config.toml"))
    }

    /// Load the default config file if one exists, else the built-in defaults.
    pub fn load_default() -> Result<Self, ConfigError> {
        match Self::default_path() {
            Some(path) if path.is_file() => {
                tracing::debug!(path = %path.display(), "Loading default config");
                Self::load(&path)
            }
            _ => Ok(Self::default()),
        }
    }

    pub fn max_tasks_per_group(&self) -> usize {
        self.max_tasks.unwrap_or(if self.localities == 1 {
            DEFAULT_MAX_TASKS_SINGLE
        } else {
            DEFAULT_MAX_TASKS
        })
    }

    pub fn visible_micros(&self) -> i64 {
        (self.duration * 1_000_000.0).round() as i64
    }

    pub fn step_micros(&self) -> i64 {
        i64::try_from(self.step.saturating_mul(1000)).unwrap_or(i64::MAX)
    }

    /// Parsed window start, if one is configured.
    pub fn start_time(&self) -> Result<Option<Timestamp>, ConfigError> {
        self.start
            .as_deref()
            .map(Timestamp::parse)
            .transpose()
            .map_err(|e| ConfigError::Invalid(format!("start: {e}")))
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.width == 0 || self.height == 0 {
            return Err(ConfigError::Invalid(format!(
                "image size must be positive, got {}x{}",
                self.width, self.height
            )));
        }
        if self.localities == 0 {
            return Err(ConfigError::Invalid("at least one locality is required".into()));
        }
        if !(self.duration.is_finite() && self.duration > 0.0) || self.visible_micros() <= 0 {
            return Err(ConfigError::Invalid(format!(
                "duration must be a positive number of seconds, got {}",
                self.duration
            )));
        }
        if self.step == 0 {
            return Err(ConfigError::Invalid("gridline step must be positive".into()));
        }
        let gridlines = self.visible_micros() / self.step_micros();
        if gridlines >= MAX_GRIDLINES {
            return Err(ConfigError::Invalid(format!(
                "{}s window with a {}ms step needs {gridlines} gridlines, at most {MAX_GRIDLINES} allowed",
                self.duration, self.step
            )));
        }
        if self.max_tasks_per_group() == 0 {
            return Err(ConfigError::Invalid("max_tasks must be positive".into()));
        }
        if self.io_lanes == 0 {
            return Err(ConfigError::Invalid("io_lanes must be positive".into()));
        }
        if !(self.queue_wait_threshold_us.is_finite() && self.queue_wait_threshold_us >= 0.0) {
            return Err(ConfigError::Invalid(format!(
                "queue_wait_threshold_us must be a non-negative number, got {}",
                self.queue_wait_threshold_us
            )));
        }
        self.start_time()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_max_tasks_default_depends_on_localities() {
        let mut config = TraceConfig::default();
        assert_eq!(config.max_tasks_per_group(), 80);
        config.localities = 4;
        assert_eq!(config.max_tasks_per_group(), 20);
        config.max_tasks = Some(3);
        assert_eq!(config.max_tasks_per_group(), 3);
    }

    #[test]
    fn test_defaults_validate() {
        assert!(TraceConfig::default().validate().is_ok());
    }
}
