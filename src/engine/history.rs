//! Bounded decision history and aggregate statistics.
//!
//! A fixed-capacity FIFO of the last [`HISTORY_CAPACITY`] decisions;
//! the oldest entry is evicted when a new one arrives at capacity.

use std::collections::BTreeMap;

use serde::Serialize;

use super::decision::{Action, AlertLevel, Decision};
use crate::membership::round3;

/// Decisions retained for statistics.
pub const HISTORY_CAPACITY: usize = 100;

#[derive(Debug, Default)]
pub struct DecisionHistory {
    entries: heapless::Deque<Decision, HISTORY_CAPACITY>,
}

impl DecisionHistory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append, evicting the oldest decision when full.
    pub fn push(&mut self, decision: Decision) {
        if self.entries.is_full() {
            let _ = self.entries.pop_front();
        }
        // Room was made above.
        let _ = self.entries.push_back(decision);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Most recent decision.
    pub fn latest(&self) -> Option<&Decision> {
        self.entries.back()
    }

    /// Oldest retained decision.
    pub fn oldest(&self) -> Option<&Decision> {
        self.entries.front()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Decision> {
        self.entries.iter()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Aggregate statistics, or `None` when no decision is retained.
    pub fn statistics(&self) -> Option<Statistics> {
        if self.entries.is_empty() {
            return None;
        }

        let mut alert_distribution = BTreeMap::new();
        let mut action_distribution = BTreeMap::new();
        let mut confidence_sum = 0.0;

        for decision in self.entries.iter() {
            *alert_distribution.entry(decision.alert_level).or_insert(0) += 1;
            for action in decision.actions.iter() {
                *action_distribution.entry(action).or_insert(0) += 1;
            }
            confidence_sum += decision.confidence;
        }

        let total_decisions = self.entries.len();
        Some(Statistics {
            total_decisions,
            alert_distribution,
            action_distribution,
            average_confidence: round3(confidence_sum / total_decisions as f64),
        })
    }
}

/// Aggregates over the retained history.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Statistics {
    pub total_decisions: usize,
    /// Only levels that occurred appear.
    pub alert_distribution: BTreeMap<AlertLevel, usize>,
    /// Only actions that occurred appear.
    pub action_distribution: BTreeMap<Action, usize>,
    /// Mean confidence, 3 decimals.
    pub average_confidence: f64,
}

impl Statistics {
    pub fn alerts(&self, level: AlertLevel) -> usize {
        self.alert_distribution.get(&level).copied().unwrap_or(0)
    }

    pub fn actions(&self, action: Action) -> usize {
        self.action_distribution.get(&action).copied().unwrap_or(0)
    }
}
