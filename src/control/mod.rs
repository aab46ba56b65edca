//! Actuator control policies.
//!
//! Pure functions from the latest reading to actuator set-points; the
//! service turns them into device commands.

pub mod fan;

pub use fan::FanPolicy;
