//! Sensor readings.
//!
//! [`Reading`] is the typed, immutable input of the decision engine.
//! [`SensorPayload`] is the loosely-typed record delivered by the sensor
//! store, where every field may be absent; converting one into the other
//! applies a [`ValidationPolicy`].

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::ReadingError;

/// What to do with out-of-domain or absent payload values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValidationPolicy {
    /// Refuse the reading and report why.
    #[default]
    Reject,
    /// Substitute a usable value and flag the field as missing.
    ///
    /// Out-of-range values clamp to the nearest valid one.  Absent or
    /// non-finite values take the neutral substitutes below, which can
    /// never raise an alert on their own.
    Clamp,
}

/// Substitute for an absent or non-finite temperature (°C): mid comfortable plateau.
pub const NEUTRAL_TEMPERATURE: f64 = 25.0;
/// Substitute for an absent or non-finite humidity (%): mid comfortable plateau.
pub const NEUTRAL_HUMIDITY: f64 = 65.0;
/// Substitute for an absent presence signal: a pet clearly in the habitat.
pub const NEUTRAL_PRESENCE: u32 = 80;
/// Substitute for an absent movement signal: calm, below the restless band.
pub const NEUTRAL_MOVEMENT: u32 = 40;

/// Which groups of inputs were absent or unusable.  Lowers confidence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct MissingFields {
    /// Temperature or humidity was missing.
    pub environment: bool,
    /// Presence or movement signal was missing.
    pub presence: bool,
}

/// One immutable set of habitat measurements.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Reading {
    /// Air temperature (°C).
    pub temperature: f64,
    /// Relative humidity (%).
    pub humidity: f64,
    /// Signal energy indicating an object is present (0–100).
    pub presence_signal: u32,
    /// Signal energy indicating motion (0–100).
    pub movement_signal: u32,
    pub captured_at: DateTime<Utc>,
    #[serde(skip)]
    pub missing: MissingFields,
}

impl Reading {
    /// A reading captured now.
    pub fn new(temperature: f64, humidity: f64, presence_signal: u32, movement_signal: u32) -> Self {
        Self::at(
            temperature,
            humidity,
            presence_signal,
            movement_signal,
            Utc::now(),
        )
    }

    /// A reading captured at `captured_at`.
    pub fn at(
        temperature: f64,
        humidity: f64,
        presence_signal: u32,
        movement_signal: u32,
        captured_at: DateTime<Utc>,
    ) -> Self {
        Self {
            temperature,
            humidity,
            presence_signal,
            movement_signal,
            captured_at,
            missing: MissingFields::default(),
        }
    }

    /// Reject non-finite temperature or humidity.
    pub fn validate(&self) -> Result<(), ReadingError> {
        if !self.temperature.is_finite() {
            return Err(ReadingError::NonFiniteTemperature);
        }
        if !self.humidity.is_finite() {
            return Err(ReadingError::NonFiniteHumidity);
        }
        Ok(())
    }

    /// Build a reading from a sensor-store payload.
    ///
    /// Under [`ValidationPolicy::Reject`] any absent or unusable field is
    /// refused.  Under [`ValidationPolicy::Clamp`] it is substituted and
    /// flagged; an absent signal is never read as zero, since zero
    /// presence means "no pet detected".
    pub fn from_payload(
        payload: &SensorPayload,
        policy: ValidationPolicy,
    ) -> Result<Self, ReadingError> {
        let mut missing = MissingFields::default();

        let temperature = environment_value(
            payload.temperature,
            policy,
            &mut missing,
            NEUTRAL_TEMPERATURE,
            ReadingError::MissingTemperature,
            ReadingError::NonFiniteTemperature,
        )?;
        let humidity = environment_value(
            payload.humidity,
            policy,
            &mut missing,
            NEUTRAL_HUMIDITY,
            ReadingError::MissingHumidity,
            ReadingError::NonFiniteHumidity,
        )?;
        let humidity = match policy {
            ValidationPolicy::Clamp => humidity.clamp(0.0, 100.0),
            ValidationPolicy::Reject => humidity,
        };

        let presence_signal = signal_value(
            payload.presence_energy,
            policy,
            &mut missing,
            NEUTRAL_PRESENCE,
            ReadingError::MissingPresence,
            ReadingError::NegativePresence,
        )?;
        let movement_signal = signal_value(
            payload.movement_energy,
            policy,
            &mut missing,
            NEUTRAL_MOVEMENT,
            ReadingError::MissingMovement,
            ReadingError::NegativeMovement,
        )?;

        Ok(Self {
            temperature,
            humidity,
            presence_signal,
            movement_signal,
            captured_at: payload.created_at.unwrap_or_else(Utc::now),
            missing,
        })
    }
}

fn environment_value(
    value: Option<f64>,
    policy: ValidationPolicy,
    missing: &mut MissingFields,
    neutral: f64,
    absent: ReadingError,
    non_finite: ReadingError,
) -> Result<f64, ReadingError> {
    match (value, policy) {
        (Some(v), _) if v.is_finite() => Ok(v),
        (None, ValidationPolicy::Reject) => Err(absent),
        (Some(_), ValidationPolicy::Reject) => Err(non_finite),
        (_, ValidationPolicy::Clamp) => {
            missing.environment = true;
            Ok(neutral)
        }
    }
}

fn signal_value(
    value: Option<i64>,
    policy: ValidationPolicy,
    missing: &mut MissingFields,
    neutral: u32,
    absent: ReadingError,
    negative: ReadingError,
) -> Result<u32, ReadingError> {
    match value {
        None => match policy {
            ValidationPolicy::Reject => Err(absent),
            ValidationPolicy::Clamp => {
                missing.presence = true;
                Ok(neutral)
            }
        },
        Some(v) if v < 0 => match policy {
            ValidationPolicy::Reject => Err(negative),
            ValidationPolicy::Clamp => Ok(0),
        },
        Some(v) => Ok(u32::try_from(v).unwrap_or(u32::MAX)),
    }
}

/// Latest-reading record as published by the sensor store.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SensorPayload {
    #[serde(default)]
    pub temperature: Option<f64>,
    #[serde(default)]
    pub humidity: Option<f64>,
    #[serde(default)]
    pub presence_energy: Option<i64>,
    #[serde(default)]
    pub movement_energy: Option<i64>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

impl SensorPayload {
    /// A complete payload (all fields present).
    pub fn complete(
        temperature: f64,
        humidity: f64,
        presence_energy: i64,
        movement_energy: i64,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            temperature: Some(temperature),
            humidity: Some(humidity),
            presence_energy: Some(presence_energy),
            movement_energy: Some(movement_energy),
            created_at: Some(created_at),
        }
    }
}
