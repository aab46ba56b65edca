//! Alert cooldown gate.
//!
//! Remembers when a regular alert was last delivered for each
//! [`AlertLevel`] and suppresses repeats inside the cooldown window.
//!
//! ## Lifecycle
//!
//! 1. The service asks [`AlertCooldown::allows`] before sending.
//! 2. Only when the sink accepted the alert does it call
//!    [`AlertCooldown::record`]; a failed delivery can be retried next tick.
//! 3. [`AlertCooldown::reset`] clears every level (manual command).
//!
//! Levels are tracked independently, so an escalation from `warning` to
//! `danger` is never held back by the earlier warning.  The emergency
//! channel does not pass through this gate.

use chrono::{DateTime, Duration, Utc};
use log::{debug, info};

use crate::engine::decision::AlertLevel;

/// Per-level cooldown gate.
#[derive(Debug, Clone)]
pub struct AlertCooldown {
    window: Duration,
    last_sent: [Option<DateTime<Utc>>; AlertLevel::ALL.len()],
}

impl AlertCooldown {
    pub fn new(window_secs: u32) -> Self {
        Self {
            window: Duration::seconds(i64::from(window_secs)),
            last_sent: [None; AlertLevel::ALL.len()],
        }
    }

    /// True when `level` was never sent or the window has elapsed.
    pub fn allows(&self, level: AlertLevel, now: DateTime<Utc>) -> bool {
        match self.last_sent[Self::slot(level)] {
            None => true,
            Some(sent) => {
                let open = now - sent >= self.window;
                if !open {
                    debug!("cooldown: {level} suppressed, last sent {sent}");
                }
                open
            }
        }
    }

    /// Mark `level` as delivered at `now`.
    pub fn record(&mut self, level: AlertLevel, now: DateTime<Utc>) {
        self.last_sent[Self::slot(level)] = Some(now);
    }

    /// When `level` was last delivered.
    pub fn last_sent(&self, level: AlertLevel) -> Option<DateTime<Utc>> {
        self.last_sent[Self::slot(level)]
    }

    /// Forget every delivery.
    pub fn reset(&mut self) {
        if self.last_sent.iter().any(Option::is_some) {
            info!("cooldown: all alert levels cleared");
        }
        self.last_sent = [None; AlertLevel::ALL.len()];
    }

    pub fn window(&self) -> Duration {
        self.window
    }

    fn slot(level: AlertLevel) -> usize {
        level as usize
    }
}
