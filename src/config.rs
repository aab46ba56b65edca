//! Monitor configuration parameters
//!
//! All tunable parameters for the PetZone monitoring service.
//! Values can be overridden from a JSON file passed to the binary.

use std::io::ErrorKind;
use std::path::Path;

use log::{info, warn};
use serde::{Deserialize, Serialize};

use crate::app::ports::ConfigError;
use crate::control::FanPolicy;
use crate::reading::ValidationPolicy;

/// Core monitor configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MonitorConfig {
    // --- Timing ---
    /// Interval between sensor checks (seconds)
    pub check_interval_secs: u32,
    /// Minimum gap between two regular alerts of the same level (seconds)
    pub alert_cooldown_secs: u32,
    /// Upper bound for the retry delay after sensor failures (seconds)
    pub max_backoff_secs: u32,

    // --- Input ---
    /// How incomplete or out-of-range sensor payloads are treated
    pub validation: ValidationPolicy,

    // --- Actuators ---
    /// Fan intensity steps
    pub fan_intensity: FanPolicy,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            // Timing
            check_interval_secs: 5,
            alert_cooldown_secs: 30,
            max_backoff_secs: 60,

            // Input
            validation: ValidationPolicy::Reject,

            // Actuators
            fan_intensity: FanPolicy::default(),
        }
    }
}

impl MonitorConfig {
    /// Range-check every field.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.check_interval_secs == 0 {
            return Err(ConfigError::ValidationFailed("check_interval_secs must be > 0"));
        }
        if self.max_backoff_secs < self.check_interval_secs {
            return Err(ConfigError::ValidationFailed(
                "max_backoff_secs must be >= check_interval_secs",
            ));
        }
        self.fan_intensity.validate()
    }

    /// Parse and validate a JSON document.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json).map_err(|e| {
            warn!("MonitorConfig: corrupted document ({e})");
            ConfigError::Corrupted
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a config file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let json = std::fs::read_to_string(path).map_err(|e| match e.kind() {
            ErrorKind::NotFound => ConfigError::NotFound,
            _ => {
                warn!("MonitorConfig: read error on {} ({e})", path.display());
                ConfigError::IoError
            }
        })?;
        let config = Self::from_json(&json)?;
        info!("MonitorConfig: loaded from {}", path.display());
        Ok(config)
    }
}
