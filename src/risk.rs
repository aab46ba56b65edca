//! Risk scoring.
//!
//! Reduces a [`MembershipSet`] to a scalar risk intensity:
//!
//! ```text
//! score = Σ degree(category) × risk_weight(category)
//! ```
//!
//! Weights live on the category enums (see [`Category::risk_weight`]).
//! Overlapping curves mean the score is an intensity, not a probability;
//! for the fixed tables it never exceeds 1.

use serde::Serialize;

use crate::membership::{Category, HumidityBand, MembershipSet, PetState, TemperatureBand};

/// `warm` above this degree asks for cooling.
const COOLING_WARM_DEGREE: f64 = 0.3;
/// `very_hot` above this degree asks for cooling.
const COOLING_VERY_HOT_DEGREE: f64 = 0.1;

/// Risk for one signal dimension.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DimensionRisk<C: Category + Serialize> {
    pub score: f64,
    pub dominant_category: C,
    pub dominant_degree: f64,
}

/// Score a membership set against its category weights.
pub fn score<C: Category + Serialize>(set: &MembershipSet<C>) -> DimensionRisk<C> {
    let score: f64 = set
        .iter()
        .map(|(category, degree)| degree * category.risk_weight())
        .sum();
    let (dominant_category, dominant_degree) = set.dominant();
    DimensionRisk {
        score,
        dominant_category,
        dominant_degree,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TemperatureRisk {
    #[serde(flatten)]
    pub risk: DimensionRisk<TemperatureBand>,
    /// Warm or very hot enough that the fan should run.
    pub needs_cooling: bool,
    pub actual_value: f64,
}

impl TemperatureRisk {
    pub fn assess(set: &MembershipSet<TemperatureBand>, celsius: f64) -> Self {
        Self {
            risk: score(set),
            needs_cooling: set.degree(TemperatureBand::Warm) > COOLING_WARM_DEGREE
                || set.degree(TemperatureBand::VeryHot) > COOLING_VERY_HOT_DEGREE,
            actual_value: celsius,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct HumidityRisk {
    #[serde(flatten)]
    pub risk: DimensionRisk<HumidityBand>,
    pub actual_value: f64,
}

impl HumidityRisk {
    pub fn assess(set: &MembershipSet<HumidityBand>, percent: f64) -> Self {
        Self {
            risk: score(set),
            actual_value: percent,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PetStatusRisk {
    #[serde(flatten)]
    pub risk: DimensionRisk<PetState>,
    pub presence_energy: u32,
    pub movement_energy: u32,
}

impl PetStatusRisk {
    pub fn assess(set: &MembershipSet<PetState>, presence: u32, movement: u32) -> Self {
        Self {
            risk: score(set),
            presence_energy: presence,
            movement_energy: movement,
        }
    }
}
