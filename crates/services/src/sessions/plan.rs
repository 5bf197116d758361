use chrono::Duration;
use rand::Rng;
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};

use quiz_core::model::{QuestionRecord, SessionMode};

use crate::error::{MockParamsError, SessionError};

/// Smallest mock exam the planner accepts.
pub const MIN_MOCK_QUESTIONS: usize = 5;
/// Shortest mock exam duration the planner accepts, in minutes.
pub const MIN_MOCK_MINUTES: u32 = 1;

/// Parameters for a timed mock exam.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MockParams {
    pub num_questions: usize,
    pub duration_mins: u32,
}

impl MockParams {
    #[must_use]
    pub fn new(num_questions: usize, duration_mins: u32) -> Self {
        Self {
            num_questions,
            duration_mins,
        }
    }

    /// Validate the request against the available pool, before any
    /// truncation happens. The engine never sees an undersized mock set.
    ///
    /// # Errors
    ///
    /// Returns `MockParamsError` when the request is below the minimums or
    /// exceeds the pool.
    pub fn validate(&self, pool_size: usize) -> Result<(), MockParamsError> {
        if self.num_questions < MIN_MOCK_QUESTIONS {
            return Err(MockParamsError::TooFewQuestions {
                requested: self.num_questions,
                min: MIN_MOCK_QUESTIONS,
            });
        }
        if self.duration_mins < MIN_MOCK_MINUTES {
            return Err(MockParamsError::TooShort {
                minutes: self.duration_mins,
                min: MIN_MOCK_MINUTES,
            });
        }
        if self.num_questions > pool_size {
            return Err(MockParamsError::ExceedsPool {
                requested: self.num_questions,
                available: pool_size,
            });
        }
        Ok(())
    }

    #[must_use]
    pub fn duration(&self) -> Duration {
        Duration::minutes(i64::from(self.duration_mins))
    }
}

/// The working set assigned to a session: shuffled, possibly truncated,
/// plus the mode and an optional time limit.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionPlan {
    questions: Vec<QuestionRecord>,
    mode: SessionMode,
    time_limit: Option<Duration>,
}

impl SessionPlan {
    /// Build a normal working set from a question pool.
    ///
    /// Applies a full Fisher-Yates shuffle so every ordering of the pool is
    /// equally likely, independent of input order.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Empty` when the pool is empty.
    pub fn normal<R: Rng>(
        pool: Vec<QuestionRecord>,
        rng: &mut R,
    ) -> Result<Self, SessionError> {
        if pool.is_empty() {
            return Err(SessionError::Empty);
        }

        let mut questions = pool;
        questions.as_mut_slice().shuffle(rng);

        Ok(Self {
            questions,
            mode: SessionMode::Normal,
            time_limit: None,
        })
    }

    /// Build a timed mock working set: validate, shuffle, truncate to the
    /// requested count, and carry the countdown duration.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::MockParams` when the request fails validation
    /// against the pool.
    pub fn mock<R: Rng>(
        pool: Vec<QuestionRecord>,
        params: MockParams,
        rng: &mut R,
    ) -> Result<Self, SessionError> {
        params.validate(pool.len())?;

        let mut questions = pool;
        questions.as_mut_slice().shuffle(rng);
        questions.truncate(params.num_questions);

        Ok(Self {
            questions,
            mode: SessionMode::Mock,
            time_limit: Some(params.duration()),
        })
    }

    /// Build a plan from an already-ordered working set, skipping the
    /// shuffle. Used where the ordering is supplied externally, e.g.
    /// deterministic replays.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Empty` when the working set is empty.
    pub fn from_ordered(
        questions: Vec<QuestionRecord>,
        mode: SessionMode,
        time_limit: Option<Duration>,
    ) -> Result<Self, SessionError> {
        if questions.is_empty() {
            return Err(SessionError::Empty);
        }
        Ok(Self {
            questions,
            mode,
            time_limit,
        })
    }

    #[must_use]
    pub fn questions(&self) -> &[QuestionRecord] {
        &self.questions
    }

    #[must_use]
    pub fn mode(&self) -> SessionMode {
        self.mode
    }

    #[must_use]
    pub fn time_limit(&self) -> Option<Duration> {
        self.time_limit
    }

    /// Total number of questions in this plan.
    #[must_use]
    pub fn total(&self) -> usize {
        self.questions.len()
    }

    pub(crate) fn into_parts(self) -> (Vec<QuestionRecord>, SessionMode, Option<Duration>) {
        (self.questions, self.mode, self.time_limit)
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
