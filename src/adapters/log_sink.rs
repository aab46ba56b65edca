//! Log-based event sink adapter.
//!
//! Implements [`EventSink`] by writing structured application events to
//! the `log` facade (stderr through the binary's subscriber).  A future
//! MQTT or dashboard adapter would implement the same trait.

use log::{info, warn};

use crate::app::events::AppEvent;
use crate::app::ports::EventSink;

/// Adapter that logs every [`AppEvent`] as one `TAG | key=value` line.
#[derive(Debug, Default)]
pub struct LogEventSink;

impl LogEventSink {
    pub fn new() -> Self {
        Self
    }
}

impl EventSink for LogEventSink {
    fn emit(&mut self, event: &AppEvent) {
        match event {
            AppEvent::DecisionMade(d) => {
                info!(
                    "DECISION | level={} | actions={:?} | risk={:.3} | conf={:.3} | at={} | {}",
                    d.alert_level,
                    d.actions.as_slice(),
                    d.combined_risk,
                    d.confidence,
                    d.created_at,
                    d.message,
                );
            }
            AppEvent::Started(at) => info!("START | at={at}"),
            AppEvent::Stopped => info!("STOP"),
            AppEvent::NoReading => info!("SOURCE | no reading available"),
            AppEvent::SourceFailed {
                error,
                consecutive,
                retry_in_secs,
            } => {
                warn!("SOURCE | error={error} | consecutive={consecutive} | retry_in={retry_in_secs}s");
            }
            AppEvent::ReadingRejected(e) => warn!("REJECT | {e}"),
            AppEvent::DeviceCommanded(c) => {
                info!(
                    "DEVICE | {} on={} intensity={} | {}",
                    c.device, c.on, c.intensity, c.reason
                );
            }
            AppEvent::DeviceCommandFailed { device, error } => {
                warn!("DEVICE | {device} failed: {error}");
            }
            AppEvent::AlertSent(level) => info!("ALERT | sent level={level}"),
            AppEvent::AlertSuppressed(level) => info!("ALERT | suppressed level={level} (cooldown)"),
            AppEvent::AlertFailed { level, error } => {
                warn!("ALERT | failed level={level}: {error}");
            }
            AppEvent::EmergencySent(level) => warn!("EMERGENCY | sent level={level}"),
            AppEvent::EmergencyFailed(error) => warn!("EMERGENCY | failed: {error}"),
            AppEvent::Notified(level) => info!("NOTIFY | level={level}"),
            AppEvent::CooldownsReset => info!("ALERT | cooldowns reset"),
            AppEvent::ConfigUpdated => info!("CONFIG | updated"),
        }
    }
}
