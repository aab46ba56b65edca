//! Service counters and the combined runtime report.
//!
//! [`ServiceStats`] is bumped by the monitoring service as it works;
//! [`ServiceReport`] is collected on demand and joins those counters with
//! uptime, the loop state and the engine's history statistics.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::engine::history::Statistics;

/// Monotonic counters since the service was constructed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ServiceStats {
    pub decisions_made: u64,
    /// Device commands accepted, notifications and emergencies delivered.
    pub actions_executed: u64,
    pub alerts_sent: u64,
    pub alerts_suppressed: u64,
    pub emergencies_sent: u64,
    pub notifications: u64,
    pub device_failures: u64,
    pub alert_failures: u64,
    pub source_failures: u64,
    pub readings_rejected: u64,
}

/// Runtime snapshot collected on demand.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ServiceReport {
    pub service_stats: ServiceStats,
    pub uptime_secs: u64,
    pub is_running: bool,
    pub consecutive_source_failures: u32,
    pub last_decision_at: Option<DateTime<Utc>>,
    /// `None` until the first decision is retained.
    pub engine_statistics: Option<Statistics>,
    pub generated_at: DateTime<Utc>,
}

impl ServiceReport {
    pub fn collect(
        service_stats: ServiceStats,
        started_at: Option<DateTime<Utc>>,
        is_running: bool,
        consecutive_source_failures: u32,
        last_decision_at: Option<DateTime<Utc>>,
        engine_statistics: Option<Statistics>,
        now: DateTime<Utc>,
    ) -> Self {
        let uptime_secs = started_at
            .map(|t| u64::try_from((now - t).num_seconds()).unwrap_or(0))
            .unwrap_or(0);
        Self {
            service_stats,
            uptime_secs,
            is_running,
            consecutive_source_failures,
            last_decision_at,
            engine_statistics,
            generated_at: now,
        }
    }
}
