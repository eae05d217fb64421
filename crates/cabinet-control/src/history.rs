//! Bounded state transition history shared by both controllers.

use std::collections::VecDeque;
use std::time::{Duration, Instant};

use cabinet_core::constants::MAX_HISTORY_SIZE;
use serde::{Deserialize, Serialize};

/// A single state transition with timestamp.
///
/// # Serialization Note
///
/// The `timestamp` field is not serialized as `Instant` is process-specific.
/// Upon deserialization it is set to the time of deserialization.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StateTransition<S> {
    /// The state transitioned from.
    pub from: S,

    /// The state transitioned to.
    pub to: S,

    /// When the transition occurred.
    #[serde(skip, default = "Instant::now")]
    pub timestamp: Instant,
}

impl<S> StateTransition<S> {
    /// Create a new state transition record stamped with the current time.
    pub fn new(from: S, to: S) -> Self {
        Self {
            from,
            to,
            timestamp: Instant::now(),
        }
    }

    /// Get the duration since this transition occurred.
    pub fn elapsed(&self) -> Duration {
        self.timestamp.elapsed()
    }
}

/// Transition history limited to [`MAX_HISTORY_SIZE`] entries, oldest first.
#[derive(Debug, Clone)]
pub struct TransitionHistory<S> {
    entries: VecDeque<StateTransition<S>>,
}

impl<S: Clone> TransitionHistory<S> {
    /// Create an empty history.
    pub fn new() -> Self {
        Self {
            entries: VecDeque::with_capacity(MAX_HISTORY_SIZE),
        }
    }

    /// Record a transition, evicting the oldest entry when full.
    pub fn record(&mut self, from: S, to: S) {
        self.entries.push_back(StateTransition::new(from, to));
        if self.entries.len() > MAX_HISTORY_SIZE {
            self.entries.pop_front();
        }
    }

    /// All recorded transitions, oldest first.
    pub fn entries(&self) -> &VecDeque<StateTransition<S>> {
        &self.entries
    }

    /// The last `count` transitions, oldest first.
    pub fn last_transitions(&self, count: usize) -> Vec<StateTransition<S>> {
        let skip = self.entries.len().saturating_sub(count);
        self.entries.iter().skip(skip).cloned().collect()
    }

    /// The most recent transition, if any.
    pub fn last(&self) -> Option<&StateTransition<S>> {
        self.entries.back()
    }

    /// Number of recorded transitions.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no transitions were recorded.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<S: Clone> Default for TransitionHistory<S> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cabinet_core::ChargeStateId;

    #[test]
    fn test_history_records_in_order() {
        let mut history = TransitionHistory::new();
        history.record(ChargeStateId::Ready, ChargeStateId::Charging);
        history.record(ChargeStateId::Charging, ChargeStateId::FullyCharged);

        assert_eq!(history.len(), 2);
        let last = history.last().unwrap();
        assert_eq!(last.from, ChargeStateId::Charging);
        assert_eq!(last.to, ChargeStateId::FullyCharged);
    }

    #[test]
    fn test_history_size_limit() {
        let mut history = TransitionHistory::new();
        for _ in 0..(MAX_HISTORY_SIZE + 10) {
            history.record(ChargeStateId::Ready, ChargeStateId::Charging);
        }
        assert_eq!(history.len(), MAX_HISTORY_SIZE);
    }

    #[test]
    fn test_last_transitions() {
        let mut history = TransitionHistory::new();
        history.record(ChargeStateId::Ready, ChargeStateId::Charging);
        history.record(ChargeStateId::Charging, ChargeStateId::Error);
        history.record(ChargeStateId::Error, ChargeStateId::Ready);

        let last_two = history.last_transitions(2);
        assert_eq!(last_two.len(), 2);
        assert_eq!(last_two[0].to, ChargeStateId::Error);
        assert_eq!(last_two[1].to, ChargeStateId::Ready);

        assert_eq!(history.last_transitions(10).len(), 3);
    }

    #[test]
    fn test_transition_serialization_skips_timestamp() {
        let transition = StateTransition::new(ChargeStateId::Ready, ChargeStateId::Charging);
        let json = serde_json::to_string(&transition).unwrap();
        assert_eq!(json, r#"{"from":"ready","to":"charging"}"#);

        let restored: StateTransition<ChargeStateId> = serde_json::from_str(&json).unwrap();
        assert_eq!(restored.to, ChargeStateId::Charging);
    }
}
