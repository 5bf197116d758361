use chrono::{DateTime, Duration, Utc};
use std::collections::VecDeque;
use std::fmt;

use quiz_core::model::{
    QuestionRecord, SessionMode, SessionSummary, accuracy_pct,
};
use quiz_core::time::Countdown;

use super::plan::SessionPlan;
use super::progress::SessionProgress;
use crate::error::SessionError;

/// Which queue the next question comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Slot {
    Active,
    Retest,
}

/// Outcome of scoring one answer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnswerOutcome {
    pub question: QuestionRecord,
    pub selected_index: usize,
    pub correct: bool,
}

/// In-memory quiz session state machine.
///
/// Owns the active queue, the retest queue for missed questions, the
/// answered history, and the session counters. All mutable session state
/// lives here; a reset is a fresh instance built from a new plan.
///
/// Invariant: a question lives in exactly one of the active queue, the
/// retest queue, or the history at any time. A missed question parks in
/// the retest queue (normal mode only) and reaches history once answered
/// correctly; in mock mode every answered question goes straight to
/// history.
pub struct SessionService {
    mode: SessionMode,
    active_queue: VecDeque<QuestionRecord>,
    retest_queue: VecDeque<QuestionRecord>,
    history: Vec<QuestionRecord>,
    answered: u32,
    correct: u32,
    total_questions: usize,
    started_at: DateTime<Utc>,
    completed_at: Option<DateTime<Utc>>,
    countdown: Option<Countdown>,
    time_expired: bool,
    awaiting_next: bool,
}

impl SessionService {
    /// Create a session from a working-set plan.
    ///
    /// `started_at` should come from the services layer clock; it anchors
    /// the mock countdown when the plan carries a time limit.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Empty` if the plan has no questions.
    pub fn new(plan: SessionPlan, started_at: DateTime<Utc>) -> Result<Self, SessionError> {
        let (questions, mode, time_limit) = plan.into_parts();
        if questions.is_empty() {
            return Err(SessionError::Empty);
        }

        Ok(Self {
            mode,
            total_questions: questions.len(),
            active_queue: questions.into(),
            retest_queue: VecDeque::new(),
            history: Vec::new(),
            answered: 0,
            correct: 0,
            started_at,
            completed_at: None,
            countdown: time_limit.map(|limit| Countdown::new(started_at, limit)),
            time_expired: false,
            awaiting_next: false,
        })
    }

    #[must_use]
    pub fn mode(&self) -> SessionMode {
        self.mode
    }

    #[must_use]
    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    #[must_use]
    pub fn completed_at(&self) -> Option<DateTime<Utc>> {
        self.completed_at
    }

    /// Size of the working set this session started with.
    #[must_use]
    pub fn total_questions(&self) -> usize {
        self.total_questions
    }

    /// Number of scored answers so far. Re-answered questions count every
    /// time, so this can exceed `total_questions`.
    #[must_use]
    pub fn answered(&self) -> u32 {
        self.answered
    }

    #[must_use]
    pub fn correct(&self) -> u32 {
        self.correct
    }

    /// Questions still waiting in the active queue, front first.
    pub fn active_questions(&self) -> impl Iterator<Item = &QuestionRecord> {
        self.active_queue.iter()
    }

    /// Missed questions waiting for re-presentation, front first.
    pub fn retest_questions(&self) -> impl Iterator<Item = &QuestionRecord> {
        self.retest_queue.iter()
    }

    /// Questions answered and settled, oldest first.
    #[must_use]
    pub fn answered_questions(&self) -> &[QuestionRecord] {
        &self.history
    }

    /// Time left on the mock countdown, if one is armed.
    #[must_use]
    pub fn time_remaining(&self, now: DateTime<Utc>) -> Option<Duration> {
        self.countdown.map(|countdown| countdown.remaining(now))
    }

    /// Returns a summary of the current session progress.
    #[must_use]
    pub fn progress(&self) -> SessionProgress {
        SessionProgress {
            total: self.total_questions,
            answered: self.answered,
            correct: self.correct,
            accuracy: accuracy_pct(self.correct, self.answered),
            remaining: self.active_queue.len() + self.retest_queue.len(),
            is_complete: self.is_complete(),
        }
    }

    /// True when no further question exists under the active mode's rule.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.select_slot().is_none()
    }

    /// The record that must be displayed next, without moving it.
    ///
    /// Clears the double-answer guard, so call this once per presented
    /// question. Selection rule:
    ///
    /// - mock: always the front of the active queue;
    /// - normal: every third answered slot is reserved for a missed
    ///   question when one is waiting; otherwise the active queue, falling
    ///   back to the retest queue once the active queue drains.
    pub fn current(&mut self) -> Option<&QuestionRecord> {
        self.awaiting_next = false;
        match self.select_slot()? {
            Slot::Active => self.active_queue.front(),
            Slot::Retest => self.retest_queue.front(),
        }
    }

    /// Score an answer against the current question.
    ///
    /// `answered_at` should come from the services layer clock; it stamps
    /// the completion time when this answer exhausts the session.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::AlreadyAnswered` if the current slot was
    /// already scored since the last `current()` call (repeated input
    /// events), `SessionError::InvalidOption` for an out-of-range index,
    /// or `SessionError::Completed` when no question is left. All three
    /// leave the session untouched.
    pub fn answer(
        &mut self,
        selected_index: usize,
        answered_at: DateTime<Utc>,
    ) -> Result<AnswerOutcome, SessionError> {
        if self.awaiting_next {
            return Err(SessionError::AlreadyAnswered);
        }
        if let Some(countdown) = self.countdown {
            if countdown.is_expired(answered_at) {
                self.expire(answered_at);
                return Err(SessionError::Completed);
            }
        }

        let slot = self.select_slot().ok_or(SessionError::Completed)?;
        let options_len = self
            .slot_front(slot)
            .map(|question| question.options().len())
            .ok_or(SessionError::Completed)?;
        if selected_index >= options_len {
            return Err(SessionError::InvalidOption {
                index: selected_index,
                len: options_len,
            });
        }

        let question = match slot {
            Slot::Active => self.active_queue.pop_front(),
            Slot::Retest => self.retest_queue.pop_front(),
        }
        .ok_or(SessionError::Completed)?;

        let correct = question.is_correct(selected_index);
        self.answered = self.answered.saturating_add(1);
        if correct {
            self.correct = self.correct.saturating_add(1);
        }

        if !correct && self.mode == SessionMode::Normal {
            self.retest_queue.push_back(question.clone());
        } else {
            self.history.push(question.clone());
        }

        self.awaiting_next = true;
        if self.select_slot().is_none() {
            self.completed_at.get_or_insert(answered_at);
        }

        Ok(AnswerOutcome {
            question,
            selected_index,
            correct,
        })
    }

    /// Re-open the most recently settled question: pops it from history to
    /// the front of the active queue for re-presentation. Stats
    /// contributions are not reversed; this is a re-answer affordance, not
    /// an undo.
    ///
    /// Returns `None`, leaving the session untouched, when the history is
    /// empty or the mock countdown already ran out.
    pub fn go_back(&mut self) -> Option<&QuestionRecord> {
        if self.time_expired {
            return None;
        }
        let question = self.history.pop()?;
        self.active_queue.push_front(question);
        self.completed_at = None;
        self.awaiting_next = false;
        self.active_queue.front()
    }

    /// External countdown signal: force completion exactly as if the
    /// question pool were exhausted. Scored answers keep counting.
    pub fn expire(&mut self, now: DateTime<Utc>) {
        self.time_expired = true;
        self.completed_at.get_or_insert(now);
    }

    /// Build the end-of-session summary, stamping the completion time if
    /// the session is being cut short.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Summary` if the counters cannot form a valid
    /// summary.
    pub fn finish(&mut self, now: DateTime<Utc>) -> Result<SessionSummary, SessionError> {
        let completed_at = *self.completed_at.get_or_insert(now);
        Ok(SessionSummary::from_counts(
            self.mode,
            self.answered,
            self.correct,
            self.started_at,
            completed_at,
        )?)
    }

    fn select_slot(&self) -> Option<Slot> {
        if self.time_expired {
            return None;
        }

        match self.mode {
            SessionMode::Mock => (!self.active_queue.is_empty()).then_some(Slot::Active),
            SessionMode::Normal => {
                let retest_due = self.answered > 0
                    && self.answered % 3 == 0
                    && !self.retest_queue.is_empty();
                if retest_due {
                    Some(Slot::Retest)
                } else if !self.active_queue.is_empty() {
                    Some(Slot::Active)
                } else if !self.retest_queue.is_empty() {
                    Some(Slot::Retest)
                } else {
                    None
                }
            }
        }
    }

    fn slot_front(&self, slot: Slot) -> Option<&QuestionRecord> {
        match slot {
            Slot::Active => self.active_queue.front(),
            Slot::Retest => self.retest_queue.front(),
        }
    }
}

impl fmt::Debug for SessionService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionService")
            .field("mode", &self.mode)
            .field("active_len", &self.active_queue.len())
            .field("retest_len", &self.retest_queue.len())
            .field("history_len", &self.history.len())
            .field("answered", &self.answered)
            .field("correct", &self.correct)
            .field("started_at", &self.started_at)
            .field("completed_at", &self.completed_at)
            .finish_non_exhaustive()
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
