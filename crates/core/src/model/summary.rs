use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum SessionSummaryError {
    #[error("completed_at is before started_at")]
    InvalidTimeRange,

    #[error("correct count ({correct}) exceeds answered count ({answered})")]
    CountMismatch { answered: u32, correct: u32 },
}

/// How a session selects and schedules its questions.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionMode {
    /// Untimed practice with retest interleaving of missed questions.
    #[default]
    Normal,
    /// Timed, fixed-length exam simulation with no retest remediation.
    Mock,
}

/// Aggregate summary for a completed quiz session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionSummary {
    mode: SessionMode,
    answered: u32,
    correct: u32,
    accuracy: u32,
    started_at: DateTime<Utc>,
    completed_at: DateTime<Utc>,
}

impl SessionSummary {
    /// Build a summary from session counts.
    ///
    /// Accuracy is `round(100 * correct / answered)`, or 0 when nothing was
    /// answered.
    ///
    /// # Errors
    ///
    /// Returns `SessionSummaryError::CountMismatch` if `correct > answered`,
    /// or `SessionSummaryError::InvalidTimeRange` if `completed_at` is before
    /// `started_at`.
    pub fn from_counts(
        mode: SessionMode,
        answered: u32,
        correct: u32,
        started_at: DateTime<Utc>,
        completed_at: DateTime<Utc>,
    ) -> Result<Self, SessionSummaryError> {
        if completed_at < started_at {
            return Err(SessionSummaryError::InvalidTimeRange);
        }
        if correct > answered {
            return Err(SessionSummaryError::CountMismatch { answered, correct });
        }

        Ok(Self {
            mode,
            answered,
            correct,
            accuracy: accuracy_pct(correct, answered),
            started_at,
            completed_at,
        })
    }

    #[must_use]
    pub fn mode(&self) -> SessionMode {
        self.mode
    }

    #[must_use]
    pub fn answered(&self) -> u32 {
        self.answered
    }

    #[must_use]
    pub fn correct(&self) -> u32 {
        self.correct
    }

    /// Session accuracy as a rounded percentage.
    #[must_use]
    pub fn accuracy(&self) -> u32 {
        self.accuracy
    }

    #[must_use]
    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    #[must_use]
    pub fn completed_at(&self) -> DateTime<Utc> {
        self.completed_at
    }

    /// Session wall time in whole seconds.
    #[must_use]
    pub fn elapsed_secs(&self) -> u64 {
        u64::try_from((self.completed_at - self.started_at).num_seconds()).unwrap_or(0)
    }
}

/// Rounded percentage of correct answers; 0 when nothing was answered.
#[must_use]
pub fn accuracy_pct(correct: u32, answered: u32) -> u32 {
    if answered == 0 {
        return 0;
    }
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    {
        (f64::from(correct) * 100.0 / f64::from(answered)).round() as u32
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

#[cfg(test)]
mod tests {
    use super::*;
    use crate::time::fixed_now;

    #[test]
    fn accuracy_rounds_like_a_percentage() {
        assert_eq!(accuracy_pct(6, 8), 75);
        assert_eq!(accuracy_pct(2, 3), 67);
        assert_eq!(accuracy_pct(1, 3), 33);
        assert_eq!(accuracy_pct(0, 0), 0);
        assert_eq!(accuracy_pct(5, 5), 100);
    }

    #[test]
    fn summary_carries_counts_and_accuracy() {
        let now = fixed_now();
        let summary =
            SessionSummary::from_counts(SessionMode::Normal, 8, 6, now, now).unwrap();

        assert_eq!(summary.answered(), 8);
        assert_eq!(summary.correct(), 6);
        assert_eq!(summary.accuracy(), 75);
        assert_eq!(summary.elapsed_secs(), 0);
    }

    #[test]
    fn correct_above_answered_is_rejected() {
        let now = fixed_now();
        let err =
            SessionSummary::from_counts(SessionMode::Mock, 2, 3, now, now).unwrap_err();
        assert!(matches!(
            err,
            SessionSummaryError::CountMismatch {
                answered: 2,
                correct: 3
            }
        ));
    }

    #[test]
    fn completion_before_start_is_rejected() {
        let now = fixed_now();
        let earlier = now - chrono::Duration::seconds(10);
        let err = SessionSummary::from_counts(SessionMode::Normal, 1, 1, now, earlier)
            .unwrap_err();
        assert_eq!(err, SessionSummaryError::InvalidTimeRange);
    }

    #[test]
    fn elapsed_reflects_session_length() {
        let started = fixed_now();
        let completed = started + chrono::Duration::seconds(95);
        let summary =
            SessionSummary::from_counts(SessionMode::Mock, 5, 4, started, completed)
                .unwrap();
        assert_eq!(summary.elapsed_secs(), 95);
    }
}
