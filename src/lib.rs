//! PetZone habitat monitor library.
//!
//! Fuzzy classification of temperature, humidity and pet presence, risk
//! scoring, action inference and the monitoring service that drives
//! devices and alerts from the resulting decisions.

#![deny(unused_must_use)]

pub mod adapters;
pub mod app;
pub mod config;
pub mod control;
pub mod cooldown;
pub mod diagnostics;
pub mod engine;
pub mod error;
pub mod membership;
pub mod reading;
pub mod risk;

pub use engine::DecisionEngine;
pub use engine::decision::{Action, AlertLevel, Decision};
pub use error::{Error, Result};
pub use reading::Reading;
