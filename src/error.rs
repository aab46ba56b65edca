//! Unified error types for the PetZone crate.
//!
//! A single `Error` enum that every subsystem converts into, keeping the
//! monitoring loop's error handling uniform.  Port-specific errors live
//! beside their traits in [`crate::app::ports`].

use core::fmt;

use crate::app::ports::{ConfigError, DeviceError};

// ---------------------------------------------------------------------------
// Top-level error
// ---------------------------------------------------------------------------

/// Every fallible operation in the crate funnels into this type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// A reading failed validation before classification.
    InvalidReading(ReadingError),
    /// A manual device command could not be delivered.
    Device(DeviceError),
    /// Configuration is invalid or could not be loaded.
    Config(&'static str),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidReading(e) => write!(f, "invalid reading: {e}"),
            Self::Device(e) => write!(f, "device: {e}"),
            Self::Config(msg) => write!(f, "config: {msg}"),
        }
    }
}

impl std::error::Error for Error {}

// ---------------------------------------------------------------------------
// Reading validation errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReadingError {
    /// Temperature is absent from the payload.
    MissingTemperature,
    /// Humidity is absent from the payload.
    MissingHumidity,
    /// Temperature is NaN or infinite.
    NonFiniteTemperature,
    /// Humidity is NaN or infinite.
    NonFiniteHumidity,
    /// Presence signal energy is absent from the payload.
    MissingPresence,
    /// Movement signal energy is absent from the payload.
    MissingMovement,
    /// Presence signal energy is negative.
    NegativePresence,
    /// Movement signal energy is negative.
    NegativeMovement,
}

impl fmt::Display for ReadingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingTemperature => write!(f, "temperature missing"),
            Self::MissingHumidity => write!(f, "humidity missing"),
            Self::NonFiniteTemperature => write!(f, "temperature is not finite"),
            Self::NonFiniteHumidity => write!(f, "humidity is not finite"),
            Self::MissingPresence => write!(f, "presence signal missing"),
            Self::MissingMovement => write!(f, "movement signal missing"),
            Self::NegativePresence => write!(f, "presence signal is negative"),
            Self::NegativeMovement => write!(f, "movement signal is negative"),
        }
    }
}

impl std::error::Error for ReadingError {}

impl From<ReadingError> for Error {
    fn from(e: ReadingError) -> Self {
        Self::InvalidReading(e)
    }
}

impl From<DeviceError> for Error {
    fn from(e: DeviceError) -> Self {
        Self::Device(e)
    }
}

impl From<ConfigError> for Error {
    fn from(e: ConfigError) -> Self {
        match e {
            ConfigError::ValidationFailed(msg) => Self::Config(msg),
            ConfigError::NotFound => Self::Config("config not found"),
            ConfigError::Corrupted => Self::Config("config corrupted"),
            ConfigError::IoError => Self::Config("config I/O error"),
        }
    }
}

// ---------------------------------------------------------------------------
// Convenience Result alias
// ---------------------------------------------------------------------------

/// Crate-wide `Result` alias.
pub type Result<T> = core::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_includes_cause() {
        let e: Error = ReadingError::NonFiniteHumidity.into();
        assert_eq!(e.to_string(), "invalid reading: humidity is not finite");
        assert_eq!(Error::Config("bad").to_string(), "config: bad");
    }

    #[test]
    fn port_errors_convert() {
        let e: Error = DeviceError::Rejected(409).into();
        assert_eq!(e.to_string(), "device: rejected with status 409");
        let e: Error = ConfigError::NotFound.into();
        assert_eq!(e, Error::Config("config not found"));
    }
}
