//! Scripted sensor source.
//!
//! Replays a queue of fetch results in order, then reports "no reading"
//! once exhausted.  Used by the host binary and for dry runs against
//! recorded payloads.

use std::collections::VecDeque;

use crate::app::ports::{SensorSource, SourceError};
use crate::reading::SensorPayload;

type Fetch = Result<Option<SensorPayload>, SourceError>;

#[derive(Debug, Default)]
pub struct ScriptedSource {
    queue: VecDeque<Fetch>,
}

impl ScriptedSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// A source that yields each payload once, in order.
    pub fn from_payloads(payloads: impl IntoIterator<Item = SensorPayload>) -> Self {
        Self {
            queue: payloads.into_iter().map(|p| Ok(Some(p))).collect(),
        }
    }

    pub fn push_payload(&mut self, payload: SensorPayload) {
        self.queue.push_back(Ok(Some(payload)));
    }

    pub fn push_failure(&mut self, error: SourceError) {
        self.queue.push_back(Err(error));
    }

    pub fn remaining(&self) -> usize {
        self.queue.len()
    }
}

impl SensorSource for ScriptedSource {
    fn latest(&mut self) -> Result<Option<SensorPayload>, SourceError> {
        self.queue.pop_front().unwrap_or(Ok(None))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn replays_in_order_then_runs_dry() {
        let mut src = ScriptedSource::new();
        src.push_failure(SourceError::Timeout);
        src.push_payload(SensorPayload::default());
        assert_eq!(src.latest(), Err(SourceError::Timeout));
        assert_eq!(src.latest(), Ok(Some(SensorPayload::default())));
        assert_eq!(src.latest(), Ok(None));
        assert_eq!(src.remaining(), 0);
    }
}
