use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::model::ids::QuestionId;

/// Cross-session statistics, persisted as one JSON record.
///
/// Attempt counts and `best_accuracy` are monotonically non-decreasing;
/// `total_sessions` advances once per completed session. Every field
/// defaults so a partial or older persisted record still loads.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GlobalStats {
    attempt_counts: HashMap<QuestionId, u32>,
    total_sessions: u32,
    best_accuracy: u32,
    time_spent_secs: u64,
}

impl GlobalStats {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Attempts recorded for a question across all sessions.
    #[must_use]
    pub fn attempt_count(&self, id: QuestionId) -> u32 {
        self.attempt_counts.get(&id).copied().unwrap_or(0)
    }

    #[must_use]
    pub fn total_sessions(&self) -> u32 {
        self.total_sessions
    }

    /// Best session accuracy seen so far, as a percentage.
    #[must_use]
    pub fn best_accuracy(&self) -> u32 {
        self.best_accuracy
    }

    /// Cumulative wall time spent in completed sessions.
    #[must_use]
    pub fn time_spent_secs(&self) -> u64 {
        self.time_spent_secs
    }

    /// Record one scored answer against a question.
    pub fn record_attempt(&mut self, id: QuestionId) {
        let count = self.attempt_counts.entry(id).or_insert(0);
        *count = count.saturating_add(1);
    }

    /// Record a completed session: bumps the session count, folds the
    /// session accuracy into the best-accuracy high-water mark, and adds
    /// the elapsed session time.
    pub fn record_session(&mut self, accuracy: u32, elapsed_secs: u64) {
        self.total_sessions = self.total_sessions.saturating_add(1);
        self.best_accuracy = self.best_accuracy.max(accuracy);
        self.time_spent_secs = self.time_spent_secs.saturating_add(elapsed_secs);
    }
}

// ─── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::section::Section;

    #[test]
    fn attempts_accumulate_per_question() {
        let mut stats = GlobalStats::new();
        let q1 = QuestionId::new(Section::Quantitative, 0);
        let q2 = QuestionId::new(Section::Verbal, 0);

        stats.record_attempt(q1);
        stats.record_attempt(q1);
        stats.record_attempt(q2);

        assert_eq!(stats.attempt_count(q1), 2);
        assert_eq!(stats.attempt_count(q2), 1);
        assert_eq!(stats.attempt_count(QuestionId::new(Section::Logical, 9)), 0);
    }

    #[test]
    fn best_accuracy_only_increases() {
        let mut stats = GlobalStats::new();
        stats.record_session(75, 60);
        stats.record_session(40, 30);
        stats.record_session(90, 10);

        assert_eq!(stats.total_sessions(), 3);
        assert_eq!(stats.best_accuracy(), 90);
        assert_eq!(stats.time_spent_secs(), 100);
    }

    #[test]
    fn older_persisted_shape_still_loads() {
        // A record missing newer fields must fall back to defaults.
        let raw = r#"{"attempt_counts": {"verbal-2": 4}, "total_sessions": 7}"#;
        let stats: GlobalStats = serde_json::from_str(raw).unwrap();

        assert_eq!(stats.total_sessions(), 7);
        assert_eq!(stats.best_accuracy(), 0);
        assert_eq!(stats.attempt_count(QuestionId::new(Section::Verbal, 2)), 4);
    }

    #[test]
    fn round_trips_through_json() {
        let mut stats = GlobalStats::new();
        stats.record_attempt(QuestionId::new(Section::Domain1, 5));
        stats.record_session(67, 120);

        let json = serde_json::to_string(&stats).unwrap();
        let back: GlobalStats = serde_json::from_str(&json).unwrap();
        assert_eq!(back, stats);
    }
}
