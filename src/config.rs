//! Monitor configuration file and command-line overrides

use std::path::{Path, PathBuf};
use std::time::Duration;

use gpuwatch_core::{
    DEFAULT_BAR_WIDTH, DEFAULT_REFRESH_INTERVAL, DEFAULT_SAMPLE_INTERVAL, MAX_BAR_WIDTH,
};
use gpuwatch_types::{ThresholdError, ThresholdSet};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::monitor::MonitorOptions;

/// Name of the log file inside the log directory
pub const LOG_FILE_NAME: &str = "gpu_monitor.log";

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to serialize configuration: {0}")]
    Serialize(#[source] serde_json::Error),

    #[error("{field} must be a positive number of seconds, got {value}")]
    InvalidInterval { field: &'static str, value: f64 },

    #[error("bar width must be between 1 and {max}, got {value}")]
    InvalidBarWidth { value: usize, max: usize },

    #[error("invalid thresholds: {0}")]
    Thresholds(#[from] ThresholdError),
}

/// Monitor configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MonitorConfig {
    /// Seconds between samples
    pub interval_secs: f64,
    /// Seconds between redraws
    pub refresh_secs: f64,
    /// Devices to monitor; absent means all
    pub gpu_indices: Option<Vec<i64>>,
    pub bar_width: usize,
    pub thresholds: ThresholdSet,
    pub log_file: Option<PathBuf>,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            interval_secs: DEFAULT_SAMPLE_INTERVAL.as_secs_f64(),
            refresh_secs: DEFAULT_REFRESH_INTERVAL.as_secs_f64(),
            gpu_indices: None,
            bar_width: DEFAULT_BAR_WIDTH,
            thresholds: ThresholdSet::default(),
            log_file: None,
        }
    }
}

/// Values given on the command line; each one replaces the file's value
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConfigOverrides {
    pub interval_secs: Option<f64>,
    pub refresh_secs: Option<f64>,
    pub gpu_indices: Option<Vec<i64>>,
    pub bar_width: Option<usize>,
    pub log_file: Option<PathBuf>,
}

fn project_dirs() -> Option<directories::ProjectDirs> {
    directories::ProjectDirs::from("org", "gpuwatch", "gpuwatch")
}

/// Get the default configuration file path
pub fn default_config_path() -> Option<PathBuf> {
    project_dirs().map(|dirs| dirs.config_dir().join("config.json"))
}

/// Get the default log file path, falling back to `./logs`
pub fn default_log_path() -> PathBuf {
    project_dirs()
        .map(|dirs| dirs.data_dir().join("logs"))
        .unwrap_or_else(|| PathBuf::from("logs"))
        .join(LOG_FILE_NAME)
}

fn interval(field: &'static str, value: f64) -> Result<Duration, ConfigError> {
    match Duration::try_from_secs_f64(value) {
        Ok(duration) if !duration.is_zero() => Ok(duration),
        _ => Err(ConfigError::InvalidInterval { field, value }),
    }
}

impl MonitorConfig {
    /// Load from `path`, or from the default location if it exists
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        if let Some(path) = path {
            return Self::load_from_path(path);
        }
        match default_config_path() {
            Some(path) if path.exists() => Self::load_from_path(&path),
            _ => Ok(Self::default()),
        }
    }

    /// Load configuration from a specific file path
    pub fn load_from_path(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = serde_json::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        log::debug!("Loaded configuration from {}", path.display());
        Ok(config)
    }

    /// Save configuration to a specific file path
    pub fn save_to_path(&self, path: &Path) -> Result<(), ConfigError> {
        let io_error = |source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        };
        // Ensure parent directory exists
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(io_error)?;
        }
        let content = serde_json::to_string_pretty(self).map_err(ConfigError::Serialize)?;
        std::fs::write(path, content).map_err(io_error)
    }

    pub fn with_overrides(mut self, overrides: ConfigOverrides) -> Self {
        if let Some(secs) = overrides.interval_secs {
            self.interval_secs = secs;
        }
        if let Some(secs) = overrides.refresh_secs {
            self.refresh_secs = secs;
        }
        if overrides.gpu_indices.is_some() {
            self.gpu_indices = overrides.gpu_indices;
        }
        if let Some(width) = overrides.bar_width {
            self.bar_width = width;
        }
        if overrides.log_file.is_some() {
            self.log_file = overrides.log_file;
        }
        self
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        interval("interval", self.interval_secs)?;
        interval("refresh rate", self.refresh_secs)?;
        if !(1..=MAX_BAR_WIDTH).contains(&self.bar_width) {
            return Err(ConfigError::InvalidBarWidth {
                value: self.bar_width,
                max: MAX_BAR_WIDTH,
            });
        }
        self.thresholds.validate()?;
        Ok(())
    }

    /// Log file to write to
    pub fn log_path(&self) -> PathBuf {
        self.log_file.clone().unwrap_or_else(default_log_path)
    }

    /// Validated loop settings
    pub fn monitor_options(&self, max_ticks: Option<u64>) -> Result<MonitorOptions, ConfigError> {
        self.validate()?;
        Ok(MonitorOptions {
            sample_interval: interval("interval", self.interval_secs)?,
            refresh_interval: interval("refresh rate", self.refresh_secs)?,
            gpu_indices: self.gpu_indices.clone(),
            max_ticks,
            bar_width: self.bar_width,
            thresholds: self.thresholds,
        })
    }
}
