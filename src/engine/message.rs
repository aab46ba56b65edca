//! Contextual message synthesis.
//!
//! A small decision tree over dimension scores and membership degrees
//! picks at most one sentence per dimension, joined in the order
//! temperature, humidity, presence.  When nothing fires, a status
//! sentence keyed on the dominant pet state is used instead.

use crate::membership::{HumidityBand, MembershipSet, PetState, TemperatureBand};
use crate::reading::Reading;

use super::Assessment;

/// Separator between fired sentences.
pub const DELIMITER: &str = " | ";

const TEMPERATURE_BRANCH: f64 = 0.6;
const HUMIDITY_BRANCH: f64 = 0.5;
const PRESENCE_BRANCH: f64 = 0.5;

pub(crate) fn compose(reading: &Reading, a: &Assessment) -> String {
    let mut sentences: Vec<String> = Vec::with_capacity(3);

    if a.temperature.risk.score > TEMPERATURE_BRANCH {
        sentences.extend(temperature_sentence(reading.temperature, &a.temperature_set));
    }
    if a.humidity.risk.score > HUMIDITY_BRANCH {
        sentences.extend(humidity_sentence(reading.humidity, &a.humidity_set));
    }
    if a.pet_status.risk.score > PRESENCE_BRANCH {
        sentences.extend(presence_sentence(reading, &a.pet_set));
    }

    if sentences.is_empty() {
        sentences.push(status_sentence(reading, a.pet_set.dominant().0));
    }
    sentences.join(DELIMITER)
}

fn temperature_sentence(celsius: f64, set: &MembershipSet<TemperatureBand>) -> Option<String> {
    if set.degree(TemperatureBand::VeryHot) > 0.5 {
        Some(format!(
            "CRITICAL: temperature {celsius}°C is extremely hot! Emergency cooling engaged."
        ))
    } else if set.degree(TemperatureBand::Warm) > 0.4 {
        Some(format!(
            "Temperature {celsius}°C is rising, cooling has been activated."
        ))
    } else if set.degree(TemperatureBand::VeryCold) > 0.5 {
        Some(format!(
            "WARNING: temperature {celsius}°C is too cold for the pet!"
        ))
    } else if set.degree(TemperatureBand::Cold) > 0.4 {
        Some(format!(
            "Temperature {celsius}°C is a little cold, keep the pet warm."
        ))
    } else {
        None
    }
}

fn humidity_sentence(percent: f64, set: &MembershipSet<HumidityBand>) -> Option<String> {
    if set.degree(HumidityBand::VeryHumid) > 0.4 {
        Some(format!(
            "Humidity {percent}% is far too high, mould and illness are likely!"
        ))
    } else if set.degree(HumidityBand::Humid) > 0.4 {
        Some(format!("Humidity {percent}% is high, ventilate the habitat."))
    } else if set.degree(HumidityBand::VeryDry) > 0.4 {
        Some(format!(
            "Humidity {percent}% is far too dry, the pet may dehydrate!"
        ))
    } else if set.degree(HumidityBand::Dry) > 0.4 {
        Some(format!("Humidity {percent}% is a little dry, add water."))
    } else {
        None
    }
}

fn presence_sentence(reading: &Reading, set: &MembershipSet<PetState>) -> Option<String> {
    let presence = reading.presence_signal;
    let movement = reading.movement_signal;
    if set.degree(PetState::NoDetection) > 0.5 {
        Some(format!(
            "No pet detected (energy: {presence}). Please check the sensor!"
        ))
    } else if set.degree(PetState::EmptyCage) > 0.5 {
        Some(format!(
            "The habitat appears empty (presence: {presence}, movement: {movement})."
        ))
    } else if set.degree(PetState::PetRestless) > 0.6 {
        Some(format!(
            "WARNING: the pet shows signs of restlessness or stress! \
             (presence: {presence}%, movement: {movement}%)"
        ))
    } else {
        None
    }
}

fn status_sentence(reading: &Reading, dominant: PetState) -> String {
    let (t, h) = (reading.temperature, reading.humidity);
    match dominant {
        PetState::PetSleeping => format!(
            "Environment is good. The pet is resting. Temperature: {t}°C, humidity: {h}%"
        ),
        PetState::PetActive => format!(
            "Environment is good. The pet is active and behaving normally. \
             Temperature: {t}°C, humidity: {h}%"
        ),
        _ => format!("System is operating normally. Temperature: {t}°C, humidity: {h}%"),
    }
}
