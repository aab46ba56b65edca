//! Decision engine.
//!
//! Orchestrates the membership model and risk scorer across all three
//! dimensions and turns the result into a [`Decision`]:
//!
//! ```text
//!  Reading ──▶ membership ──▶ risk (×3) ──▶ combined risk
//!                                   │              │
//!                                   ▼              ▼
//!                                actions      alert level
//!                                   └──── message, confidence ──▶ Decision ──▶ history
//! ```
//!
//! Evaluation itself is lock-free and deterministic; only the append to
//! the bounded history is serialised, so one engine can be shared behind
//! an `Arc` by the monitoring loop and ad-hoc callers.

pub mod decision;
pub mod history;
pub mod message;

use std::sync::{Mutex, MutexGuard, PoisonError};

use log::debug;

use crate::error::Result;
use crate::membership::{
    self, HumidityBand, MembershipSet, PetState, TemperatureBand, round3,
};
use crate::reading::{MissingFields, Reading};
use crate::risk::{HumidityRisk, PetStatusRisk, TemperatureRisk};

use decision::{Action, ActionSet, AlertLevel, Decision, FuzzyMemberships, Reasoning};
use history::{DecisionHistory, Statistics};

/// Hot degree above which the fan is switched on.
const FAN_ON_HOT_DEGREE: f64 = 0.4;
/// Hot degree below which a running fan may be switched off.
const FAN_OFF_HOT_DEGREE: f64 = 0.2;
/// A dimension score above this raises an emergency (temperature, presence).
const EMERGENCY_SCORE: f64 = 0.8;
/// A dimension score above this raises a notification.
const NOTIFY_SCORE: f64 = 0.5;

/// Confidence factor when presence or movement was missing.
const MISSING_PRESENCE_QUALITY: f64 = 0.7;
/// Confidence factor when temperature or humidity was missing.
const MISSING_ENVIRONMENT_QUALITY: f64 = 0.6;

/// Relative importance of each dimension in the combined risk.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ImportanceWeights {
    pub temperature: f64,
    pub humidity: f64,
    pub presence: f64,
}

impl ImportanceWeights {
    pub const DEFAULT: Self = Self {
        temperature: 0.9,
        humidity: 0.7,
        presence: 0.8,
    };

    /// Importance-weighted mean of the three dimension scores.
    pub fn combine(&self, temperature: f64, humidity: f64, presence: f64) -> f64 {
        (temperature * self.temperature + humidity * self.humidity + presence * self.presence)
            / (self.temperature + self.humidity + self.presence)
    }
}

impl Default for ImportanceWeights {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Intermediate results of one evaluation.
#[derive(Debug, Clone)]
pub(crate) struct Assessment {
    pub temperature_set: MembershipSet<TemperatureBand>,
    pub humidity_set: MembershipSet<HumidityBand>,
    pub pet_set: MembershipSet<PetState>,
    pub temperature: TemperatureRisk,
    pub humidity: HumidityRisk,
    pub pet_status: PetStatusRisk,
    pub combined_risk: f64,
}

impl Assessment {
    fn of(reading: &Reading, weights: &ImportanceWeights) -> Self {
        let temperature_set = membership::temperature(reading.temperature);
        let humidity_set = membership::humidity(reading.humidity);
        let pet_set = membership::pet_state(reading.presence_signal, reading.movement_signal);

        let temperature = TemperatureRisk::assess(&temperature_set, reading.temperature);
        let humidity = HumidityRisk::assess(&humidity_set, reading.humidity);
        let pet_status =
            PetStatusRisk::assess(&pet_set, reading.presence_signal, reading.movement_signal);

        let combined_risk = weights.combine(
            temperature.risk.score,
            humidity.risk.score,
            pet_status.risk.score,
        );

        Self {
            temperature_set,
            humidity_set,
            pet_set,
            temperature,
            humidity,
            pet_status,
            combined_risk,
        }
    }
}

/// Rule-based action inference.
///
/// Rules are evaluated independently and accumulate into one ordered,
/// duplicate-free set; an empty result becomes `{None}`.
pub fn infer_actions(
    temperature_set: &MembershipSet<TemperatureBand>,
    temperature: &TemperatureRisk,
    humidity: &HumidityRisk,
    pet_status: &PetStatusRisk,
) -> ActionSet {
    let mut actions = ActionSet::new();

    let hot_degree = 0.5 * temperature_set.degree(TemperatureBand::Warm)
        + temperature_set.degree(TemperatureBand::VeryHot);
    if hot_degree > FAN_ON_HOT_DEGREE {
        actions.insert(Action::FanOn);
    } else if hot_degree < FAN_OFF_HOT_DEGREE && actions.contains(Action::FanOn) {
        // Never true on a fresh set: fan-off needs the previous decision's actions.
        actions.insert(Action::FanOff);
    }

    let (t, h, p) = (
        temperature.risk.score,
        humidity.risk.score,
        pet_status.risk.score,
    );
    if t > EMERGENCY_SCORE || p > EMERGENCY_SCORE {
        actions.insert(Action::EmergencyAlert);
    } else if t > NOTIFY_SCORE || h > NOTIFY_SCORE || p > NOTIFY_SCORE {
        actions.insert(Action::Notify);
    }

    if matches!(
        pet_status.risk.dominant_category,
        PetState::NoDetection | PetState::PetRestless
    ) {
        actions.insert(Action::Notify);
    }

    actions.finish()
}

/// Mean dominant degree scaled by data quality, within [0, 1].
///
/// A non-finite mean (NaN input that bypassed validation) counts as no
/// evidence at all.
pub fn confidence(
    temperature: &TemperatureRisk,
    humidity: &HumidityRisk,
    pet_status: &PetStatusRisk,
    missing: MissingFields,
) -> f64 {
    let mut data_quality = 1.0;
    if missing.presence {
        data_quality *= MISSING_PRESENCE_QUALITY;
    }
    if missing.environment {
        data_quality *= MISSING_ENVIRONMENT_QUALITY;
    }

    let average = (temperature.risk.dominant_degree
        + humidity.risk.dominant_degree
        + pet_status.risk.dominant_degree)
        / 3.0;
    if !average.is_finite() {
        return 0.0;
    }
    (average * data_quality).clamp(0.0, 1.0)
}

/// The decision engine.  Owns the bounded decision history.
#[derive(Debug, Default)]
pub struct DecisionEngine {
    weights: ImportanceWeights,
    history: Mutex<DecisionHistory>,
}

impl DecisionEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Compute a decision without touching the history.
    ///
    /// Total over finite and non-finite input alike; the decision is
    /// stamped with the reading's capture time, so identical readings
    /// yield identical decisions.
    pub fn decide(&self, reading: &Reading) -> Decision {
        let a = Assessment::of(reading, &self.weights);

        let actions = infer_actions(&a.temperature_set, &a.temperature, &a.humidity, &a.pet_status);
        let alert_level = AlertLevel::from_risk(a.combined_risk);
        let message = message::compose(reading, &a);
        let confidence = confidence(&a.temperature, &a.humidity, &a.pet_status, reading.missing);

        let reasoning = Reasoning {
            temperature_analysis: a.temperature,
            humidity_analysis: a.humidity,
            pet_status_analysis: a.pet_status,
            combined_risk_score: round3(a.combined_risk),
            fuzzy_memberships: FuzzyMemberships {
                temperature: a.temperature_set.significant(),
                humidity: a.humidity_set.significant(),
                pet_status: a.pet_set.significant(),
            },
        };

        Decision {
            alert_level,
            actions,
            message,
            confidence,
            reasoning,
            created_at: reading.captured_at,
        }
    }

    /// Decide and append the result to the history.
    pub fn evaluate(&self, reading: &Reading) -> Decision {
        let decision = self.decide(reading);
        debug!(
            "evaluate: T={:.1} H={:.1} P={} M={} -> {} {:?} risk={:.3} conf={:.3}",
            reading.temperature,
            reading.humidity,
            reading.presence_signal,
            reading.movement_signal,
            decision.alert_level,
            decision.actions.as_slice(),
            decision.reasoning.combined_risk_score,
            decision.confidence,
        );
        self.history().push(decision.clone());
        decision
    }

    /// Validate, then [`evaluate`](Self::evaluate).  Invalid readings are
    /// reported and leave the history untouched.
    pub fn evaluate_checked(&self, reading: &Reading) -> Result<Decision> {
        reading.validate()?;
        Ok(self.evaluate(reading))
    }

    /// Aggregates over the retained decisions; `None` when there are none.
    pub fn statistics(&self) -> Option<Statistics> {
        self.history().statistics()
    }

    /// Number of retained decisions.
    pub fn history_len(&self) -> usize {
        self.history().len()
    }

    /// Most recent retained decision.
    pub fn latest(&self) -> Option<Decision> {
        self.history().latest().cloned()
    }

    pub fn clear_history(&self) {
        self.history().clear();
    }

    // The history holds plain values, so a panic elsewhere cannot leave it
    // half-written; recover the guard instead of propagating poison.
    fn history(&self) -> MutexGuard<'_, DecisionHistory> {
        self.history.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
