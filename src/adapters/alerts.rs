//! Log-backed alert sink.
//!
//! Renders regular alerts as warnings and emergencies as errors.  A push
//! notification or SMS adapter would implement the same trait.

use log::{error, warn};

use crate::app::ports::{AlertError, AlertSink};
use crate::engine::decision::Decision;
use crate::reading::Reading;

#[derive(Debug, Default)]
pub struct LogAlertSink {
    alerts: u64,
    emergencies: u64,
}

impl LogAlertSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn alerts(&self) -> u64 {
        self.alerts
    }

    pub fn emergencies(&self) -> u64 {
        self.emergencies
    }
}

impl AlertSink for LogAlertSink {
    fn send_alert(&mut self, decision: &Decision, reading: &Reading) -> Result<(), AlertError> {
        self.alerts += 1;
        warn!(
            "[{}] {} (confidence {:.2}) | {}",
            decision.alert_level.as_str().to_uppercase(),
            decision.message,
            decision.confidence,
            snapshot(reading)
        );
        Ok(())
    }

    fn send_emergency(
        &mut self,
        decision: &Decision,
        reading: &Reading,
    ) -> Result<(), AlertError> {
        self.emergencies += 1;
        error!("[EMERGENCY] {} | {}", decision.message, snapshot(reading));
        Ok(())
    }
}

fn snapshot(reading: &Reading) -> String {
    format!(
        "T={:.1}C H={:.1}% P={} M={} at={}",
        reading.temperature,
        reading.humidity,
        reading.presence_signal,
        reading.movement_signal,
        reading.captured_at.to_rfc3339()
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::DecisionEngine;
    use chrono::{TimeZone, Utc};

    #[test]
    fn counts_each_channel_and_renders_snapshot() {
        let reading = Reading::at(
            38.0,
            60.0,
            80,
            40,
            Utc.with_ymd_and_hms(2025, 6, 1, 12, 0, 0).unwrap(),
        );
        let decision = DecisionEngine::new().decide(&reading);
        let mut sink = LogAlertSink::new();

        sink.send_alert(&decision, &reading).unwrap();
        sink.send_emergency(&decision, &reading).unwrap();
        sink.send_emergency(&decision, &reading).unwrap();

        assert_eq!(sink.alerts(), 1);
        assert_eq!(sink.emergencies(), 2);
        assert_eq!(
            snapshot(&reading),
            "T=38.0C H=60.0% P=80 M=40 at=2025-06-01T12:00:00+00:00"
        );
    }
}
