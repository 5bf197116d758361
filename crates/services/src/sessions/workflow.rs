use rand::rng;
use std::sync::Arc;
use tracing::info;

use quiz_core::QuestionBank;
use quiz_core::model::{GlobalStats, QuestionId, Section, SessionSummary};
use storage::repository::{QuestionSource, StatsStore};

use super::plan::{MockParams, SessionPlan};
use super::progress::SessionProgress;
use super::service::{AnswerOutcome, SessionService};
use crate::Clock;
use crate::bank_service::BankService;
use crate::error::SessionError;
use crate::stats_service::StatsService;

/// Result of answering a single question in a session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnswerResult {
    pub outcome: AnswerOutcome,
    pub progress: SessionProgress,
    pub is_complete: bool,
}

/// Orchestrates session start, answering, and completion against the bank
/// and the global stats record.
///
/// Single-writer by design: one instance owns the bank cache and the stats
/// record, and every mutation goes through `&mut self`.
pub struct SessionLoopService {
    clock: Clock,
    bank: BankService,
    stats: StatsService,
}

impl SessionLoopService {
    /// Build the workflow and load the persisted stats record.
    pub async fn init(
        clock: Clock,
        questions: Arc<dyn QuestionSource>,
        stats_store: Arc<dyn StatsStore>,
    ) -> Self {
        let stats = StatsService::load(stats_store).await;
        Self {
            clock,
            bank: BankService::new(questions),
            stats,
        }
    }

    #[must_use]
    pub fn clock(&self) -> Clock {
        self.clock
    }

    /// The validated bank as loaded so far.
    #[must_use]
    pub fn bank(&self) -> &QuestionBank {
        self.bank.bank()
    }

    #[must_use]
    pub fn global_stats(&self) -> &GlobalStats {
        self.stats.stats()
    }

    /// Attempts recorded for a question across all sessions.
    #[must_use]
    pub fn attempt_count(&self, id: QuestionId) -> u32 {
        self.stats.attempt_count(id)
    }

    /// Pre-fetch every section so mixed and mock sessions have the full
    /// superset available. Individual section failures degrade to empty.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Bank` when no section yields any questions.
    pub async fn preload_bank(&mut self) -> Result<(), SessionError> {
        self.bank.load_all().await?;
        info!(
            sections = self.bank.bank().loaded_sections().count(),
            questions = self.bank.bank().len(),
            "question banks loaded"
        );
        Ok(())
    }

    /// Start an untimed session over one section's bank.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Bank` when the section has no valid
    /// questions.
    pub async fn start_section(
        &mut self,
        section: Section,
    ) -> Result<SessionService, SessionError> {
        let pool = self.bank.load_section(section).await?.to_vec();
        let plan = SessionPlan::normal(pool, &mut rng())?;
        SessionService::new(plan, self.clock.now())
    }

    /// Start an untimed session over the superset, optionally restricted
    /// to the given topics. An empty topic list means every section.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Empty` when the selected topics contribute no
    /// questions, or `SessionError::Bank` when nothing is loaded at all.
    pub async fn start_mixed(
        &mut self,
        topics: &[Section],
    ) -> Result<SessionService, SessionError> {
        self.preload_bank().await?;
        let bank = self.bank.bank();
        let pool = if topics.is_empty() {
            bank.all_questions()
        } else {
            bank.questions_for_topics(topics)
        };

        let plan = SessionPlan::normal(pool, &mut rng())?;
        SessionService::new(plan, self.clock.now())
    }

    /// Start a timed mock exam drawn from the full superset.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::MockParams` when the request fails validation
    /// against the pool, or `SessionError::Bank` when nothing is loaded.
    pub async fn start_mock(
        &mut self,
        params: MockParams,
    ) -> Result<SessionService, SessionError> {
        self.preload_bank().await?;
        let pool = self.bank.bank().all_questions();
        let plan = SessionPlan::mock(pool, params, &mut rng())?;
        SessionService::new(plan, self.clock.now())
    }

    /// Score an answer for the session's current question and record the
    /// attempt in the global stats.
    ///
    /// # Errors
    ///
    /// Propagates the engine's rejection (`AlreadyAnswered`,
    /// `InvalidOption`, `Completed`); none of these count an attempt.
    pub fn answer_current(
        &mut self,
        session: &mut SessionService,
        selected_index: usize,
    ) -> Result<AnswerResult, SessionError> {
        let outcome = session.answer(selected_index, self.clock.now())?;
        self.stats.record_attempt(outcome.question.id());

        Ok(AnswerResult {
            progress: session.progress(),
            is_complete: session.is_complete(),
            outcome,
        })
    }

    /// Drive the mock countdown from the injected clock. Returns true when
    /// the deadline has passed and the session was forced to complete.
    pub fn check_timer(&self, session: &mut SessionService) -> bool {
        let now = self.clock.now();
        match session.time_remaining(now) {
            Some(left) if left.is_zero() && !session.is_complete() => {
                session.expire(now);
                true
            }
            _ => false,
        }
    }

    /// Complete the session: build the summary, fold it into the global
    /// stats, and persist best-effort. Each call counts one session, so
    /// call it exactly once per logical session.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Summary` if the session counters cannot form
    /// a valid summary. Persistence failures are logged, never returned.
    pub async fn finish_session(
        &mut self,
        session: &mut SessionService,
    ) -> Result<SessionSummary, SessionError> {
        let summary = session.finish(self.clock.now())?;
        self.stats
            .record_session(summary.accuracy(), summary.elapsed_secs());
        self.stats.flush().await;
        Ok(summary)
    }
}
