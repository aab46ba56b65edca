//! Fan intensity policy.
//!
//! Step function over air temperature: the hotter the habitat, the harder
//! the fan runs once a decision asks for cooling.
//!
//! ```text
//!   T ≥ full_above_c   → full_intensity
//!   T ≥ high_above_c   → high_intensity
//!   otherwise          → base_intensity
//! ```

use serde::{Deserialize, Serialize};

use crate::app::ports::ConfigError;

/// Upper bound of a device intensity.
pub const MAX_INTENSITY: u8 = 100;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FanPolicy {
    /// Temperature (°C) at or above which the fan runs at full intensity.
    pub full_above_c: f64,
    pub full_intensity: u8,
    /// Temperature (°C) at or above which the fan runs at high intensity.
    pub high_above_c: f64,
    pub high_intensity: u8,
    /// Intensity below `high_above_c`.
    pub base_intensity: u8,
}

impl Default for FanPolicy {
    fn default() -> Self {
        Self {
            full_above_c: 35.0,
            full_intensity: 100,
            high_above_c: 32.0,
            high_intensity: 80,
            base_intensity: 60,
        }
    }
}

impl FanPolicy {
    /// Intensity (0–100) for the given air temperature.
    pub fn intensity(&self, celsius: f64) -> u8 {
        if celsius >= self.full_above_c {
            self.full_intensity
        } else if celsius >= self.high_above_c {
            self.high_intensity
        } else {
            self.base_intensity
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.full_intensity > MAX_INTENSITY
            || self.high_intensity > MAX_INTENSITY
            || self.base_intensity > MAX_INTENSITY
        {
            return Err(ConfigError::ValidationFailed("fan intensity above 100"));
        }
        if !self.full_above_c.is_finite() || !self.high_above_c.is_finite() {
            return Err(ConfigError::ValidationFailed("fan threshold not finite"));
        }
        if self.high_above_c > self.full_above_c {
            return Err(ConfigError::ValidationFailed(
                "fan high threshold above full threshold",
            ));
        }
        if self.base_intensity > self.high_intensity || self.high_intensity > self.full_intensity {
            return Err(ConfigError::ValidationFailed("fan intensities not monotonic"));
        }
        Ok(())
    }
}
