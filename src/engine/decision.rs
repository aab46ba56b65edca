//! Decision record produced by the engine.
//!
//! A [`Decision`] is immutable once produced.  Its serde form is the
//! outward record: `alert_level`, `actions`, `message`, `confidence`
//! (3 decimals), `reasoning` and `timestamp` (RFC 3339).

use chrono::{DateTime, Utc};
use serde::{Serialize, Serializer};

use crate::membership::{HumidityBand, PetState, SignificantDegrees, TemperatureBand, round3};
use crate::risk::{HumidityRisk, PetStatusRisk, TemperatureRisk};

/// Most distinct actions a single evaluation can yield.
pub const MAX_ACTIONS: usize = 4;

/// Alert severity, ordered from least to most severe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AlertLevel {
    Safe,
    Warning,
    Danger,
    Critical,
}

impl AlertLevel {
    pub const ALL: [Self; 4] = [Self::Safe, Self::Warning, Self::Danger, Self::Critical];

    /// Classify a combined risk.  Thresholds are checked high to low.
    pub fn from_risk(combined_risk: f64) -> Self {
        if combined_risk >= 0.8 {
            Self::Critical
        } else if combined_risk >= 0.6 {
            Self::Danger
        } else if combined_risk >= 0.3 {
            Self::Warning
        } else {
            Self::Safe
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Safe => "safe",
            Self::Warning => "warning",
            Self::Danger => "danger",
            Self::Critical => "critical",
        }
    }
}

impl core::fmt::Display for AlertLevel {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Device or notification action requested by a decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Action {
    None,
    Notify,
    #[serde(rename = "turn_on_fan")]
    FanOn,
    #[serde(rename = "turn_off_fan")]
    FanOff,
    EmergencyAlert,
}

impl Action {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Notify => "notify",
            Self::FanOn => "turn_on_fan",
            Self::FanOff => "turn_off_fan",
            Self::EmergencyAlert => "emergency_alert",
        }
    }
}

impl core::fmt::Display for Action {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Insertion-ordered set of actions.  Never empty once finished.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
#[serde(transparent)]
pub struct ActionSet(heapless::Vec<Action, MAX_ACTIONS>);

impl ActionSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `action` unless already present.
    pub fn insert(&mut self, action: Action) {
        if !self.0.contains(&action) {
            // Only four non-None actions exist; a full set already holds them all.
            let _ = self.0.push(action);
        }
    }

    pub fn contains(&self, action: Action) -> bool {
        self.0.contains(&action)
    }

    /// `{None}` when nothing was inferred, otherwise the set itself.
    pub fn finish(mut self) -> Self {
        if self.0.is_empty() {
            let _ = self.0.push(Action::None);
        }
        self
    }

    pub fn iter(&self) -> impl Iterator<Item = Action> + '_ {
        self.0.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn as_slice(&self) -> &[Action] {
        &self.0
    }
}

/// Filtered membership sets kept for auditing.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FuzzyMemberships {
    pub temperature: SignificantDegrees<TemperatureBand>,
    pub humidity: SignificantDegrees<HumidityBand>,
    pub pet_status: SignificantDegrees<PetState>,
}

/// Why the engine decided what it did.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Reasoning {
    pub temperature_analysis: TemperatureRisk,
    pub humidity_analysis: HumidityRisk,
    pub pet_status_analysis: PetStatusRisk,
    /// Importance-weighted mean of the three scores, 3 decimals.
    pub combined_risk_score: f64,
    pub fuzzy_memberships: FuzzyMemberships,
}

/// The engine's verdict for one reading.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Decision {
    pub alert_level: AlertLevel,
    pub actions: ActionSet,
    pub message: String,
    #[serde(serialize_with = "serialize_rounded")]
    pub confidence: f64,
    pub reasoning: Reasoning,
    #[serde(rename = "timestamp")]
    pub created_at: DateTime<Utc>,
}

impl Decision {
    pub fn has_action(&self, action: Action) -> bool {
        self.actions.contains(action)
    }
}

fn serialize_rounded<S: Serializer>(value: &f64, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_f64(round3(*value))
}
