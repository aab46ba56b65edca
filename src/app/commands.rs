//! Inbound commands to the monitoring service.
//!
//! These represent actions requested by the outside world (caretaker UI,
//! CLI, scheduler) that the [`MonitorService`](super::service::MonitorService)
//! interprets and acts upon.

use crate::config::MonitorConfig;

use super::ports::Device;

/// Commands that external adapters can send into the monitoring core.
#[derive(Debug, Clone)]
pub enum AppCommand {
    /// User override for one device, routed straight to the actuator.
    ManualControl {
        device: Device,
        on: bool,
        /// 0–100; larger values are clamped.
        intensity: u8,
    },

    /// Forget every alert cooldown so the next alert goes out immediately.
    ResetCooldowns,

    /// Hot-reload configuration.  Rejected when validation fails.
    UpdateConfig(MonitorConfig),

    /// Resume periodic checks.
    Start,

    /// Pause periodic checks; ticks become no-ops.
    Stop,
}
