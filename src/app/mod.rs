//! Application core: monitoring orchestration, zero I/O.
//!
//! This module contains the business rules around the decision engine:
//! polling, validation, action execution, alert rate limiting and
//! backoff.  All interaction with sensor stores, devices and notification
//! channels happens through **port traits** defined in [`ports`], keeping
//! this layer fully testable without real transports.

pub mod commands;
pub mod events;
pub mod ports;
pub mod service;
