use std::sync::Arc;

use async_trait::async_trait;
use quiz_core::model::{
    GlobalStats, QuestionDraft, QuestionRecord, Section, SessionMode, SessionSummary,
};
use quiz_core::time::{fixed_clock, fixed_now};
use services::session::{MockParams, SessionPlan, SessionProgress, SessionService};
use services::{Clock, PresentationSink, SessionError, SessionLoopService};
use storage::repository::{
    InMemoryQuestionSource, InMemoryStatsStore, StatsStore, StorageError,
};

fn draft(prompt: &str, correct: i64) -> QuestionDraft {
    QuestionDraft {
        prompt: prompt.to_string(),
        options: vec!["a".to_string(), "b".to_string(), "c".to_string()],
        correct_answer: Some(correct),
        explanation: "explained".to_string(),
        difficulty: None,
    }
}

fn seeded_source() -> InMemoryQuestionSource {
    let source = InMemoryQuestionSource::new();
    source.set_section(
        Section::Quantitative,
        (0..6).map(|i| draft(&format!("quant {i}"), 0)).collect(),
    );
    source.set_section(
        Section::Verbal,
        (0..4).map(|i| draft(&format!("verbal {i}"), 1)).collect(),
    );
    source
}

async fn workflow(
    source: InMemoryQuestionSource,
    store: Arc<dyn StatsStore>,
) -> SessionLoopService {
    SessionLoopService::init(fixed_clock(), Arc::new(source), store).await
}

#[tokio::test]
async fn section_session_runs_to_completion_and_persists_stats() {
    let store = Arc::new(InMemoryStatsStore::new());
    let mut loop_svc = workflow(seeded_source(), store.clone()).await;

    let mut session = loop_svc.start_section(Section::Quantitative).await.unwrap();
    assert_eq!(session.total_questions(), 6);
    assert!(session.current().is_some());

    while !session.is_complete() {
        let selected = session.current().unwrap().correct_index();
        let result = loop_svc.answer_current(&mut session, selected).unwrap();
        assert!(result.outcome.correct);
    }

    let summary = loop_svc.finish_session(&mut session).await.unwrap();
    assert_eq!(summary.answered(), 6);
    assert_eq!(summary.accuracy(), 100);
    assert_eq!(summary.mode(), SessionMode::Normal);

    let stored = store.stored().expect("stats persisted at finish");
    assert_eq!(stored.total_sessions(), 1);
    assert_eq!(stored.best_accuracy(), 100);
    // Every question in the working set was attempted exactly once.
    let attempts: u32 = (0..6)
        .map(|i| {
            stored.attempt_count(quiz_core::model::QuestionId::new(Section::Quantitative, i))
        })
        .sum();
    assert_eq!(attempts, 6);
}

#[tokio::test]
async fn two_question_scenario_with_retest_fallback() {
    // Bank = [Q1(correct 0), Q2(correct 1)], normal mode, fixed order.
    let q1 = draft("Q1", 0).validate(Section::Logical, 0).unwrap();
    let q2 = draft("Q2", 1).validate(Section::Logical, 1).unwrap();
    let plan =
        SessionPlan::from_ordered(vec![q1, q2.clone()], SessionMode::Normal, None).unwrap();
    let mut session = SessionService::new(plan, fixed_now()).unwrap();

    let first = session.answer(0, fixed_now()).unwrap();
    assert!(first.correct);
    assert_eq!((session.answered(), session.correct()), (1, 1));

    assert_eq!(session.current().unwrap().id(), q2.id());
    let second = session.answer(0, fixed_now()).unwrap();
    assert!(!second.correct);
    assert_eq!((session.answered(), session.correct()), (2, 1));
    assert_eq!(session.retest_questions().count(), 1);

    assert!(!session.is_complete());
    assert_eq!(session.current().unwrap().id(), q2.id());
    let third = session.answer(1, fixed_now()).unwrap();
    assert!(third.correct);
    assert_eq!(session.retest_questions().count(), 0);
    assert!(session.is_complete());
}

#[tokio::test]
async fn mixed_session_can_be_restricted_to_topics() {
    let store = Arc::new(InMemoryStatsStore::new());
    let mut loop_svc = workflow(seeded_source(), store).await;

    let session = loop_svc.start_mixed(&[Section::Verbal]).await.unwrap();
    assert_eq!(session.total_questions(), 4);
    assert!(
        session
            .active_questions()
            .all(|q| q.section() == Section::Verbal)
    );

    // A topic with no questions is an empty working set, never a session.
    let err = loop_svc.start_mixed(&[Section::Domain3]).await.unwrap_err();
    assert!(matches!(err, SessionError::Empty));

    let unrestricted = loop_svc.start_mixed(&[]).await.unwrap();
    assert_eq!(unrestricted.total_questions(), 10);
}

#[tokio::test]
async fn bank_degrades_gracefully_when_sections_are_missing() {
    let source = InMemoryQuestionSource::new();
    source.set_section(Section::Domain1, vec![draft("only", 0), draft("two", 0)]);
    // One section is present but entirely invalid.
    source.set_section(Section::Verbal, vec![QuestionDraft::default()]);

    let store = Arc::new(InMemoryStatsStore::new());
    let mut loop_svc = workflow(source, store).await;

    let session = loop_svc.start_mixed(&[]).await.unwrap();
    assert_eq!(session.total_questions(), 2);

    let err = loop_svc.start_section(Section::Verbal).await.unwrap_err();
    assert!(matches!(
        err,
        SessionError::Bank(services::BankError::EmptySection(Section::Verbal))
    ));
}

#[tokio::test]
async fn completely_empty_bank_refuses_to_start() {
    let store = Arc::new(InMemoryStatsStore::new());
    let mut loop_svc = workflow(InMemoryQuestionSource::new(), store).await;

    let err = loop_svc.start_mixed(&[]).await.unwrap_err();
    assert!(matches!(
        err,
        SessionError::Bank(services::BankError::NoQuestions)
    ));
}

#[tokio::test]
async fn mock_session_is_validated_timed_and_truncated() {
    let store = Arc::new(InMemoryStatsStore::new());
    let mut loop_svc = workflow(seeded_source(), store.clone()).await;

    // Requesting more than the pool (10 questions) is rejected up front.
    let err = loop_svc
        .start_mock(MockParams::new(11, 10))
        .await
        .unwrap_err();
    assert!(matches!(err, SessionError::MockParams(_)));

    let mut session = loop_svc.start_mock(MockParams::new(5, 10)).await.unwrap();
    assert_eq!(session.total_questions(), 5);
    assert_eq!(session.mode(), SessionMode::Mock);
    assert!(!loop_svc.check_timer(&mut session));

    // Answer a couple of questions, then let the deadline pass.
    for _ in 0..2 {
        let selected = session.current().unwrap().correct_index();
        loop_svc.answer_current(&mut session, selected).unwrap();
    }

    let late_clock = Clock::fixed(fixed_now() + chrono::Duration::minutes(10));
    let late_svc = SessionLoopService::init(
        late_clock,
        Arc::new(seeded_source()),
        Arc::new(InMemoryStatsStore::new()),
    )
    .await;
    assert!(late_svc.check_timer(&mut session));
    assert!(session.is_complete());

    let summary = loop_svc.finish_session(&mut session).await.unwrap();
    assert_eq!(summary.answered(), 2);
    assert_eq!(summary.accuracy(), 100);
}

#[tokio::test]
async fn finish_updates_best_accuracy_monotonically() {
    let store = Arc::new(InMemoryStatsStore::new());
    let mut loop_svc = workflow(seeded_source(), store.clone()).await;

    // First session: 100% on the quantitative bank.
    let mut session = loop_svc.start_section(Section::Quantitative).await.unwrap();
    while !session.is_complete() {
        let selected = session.current().unwrap().correct_index();
        loop_svc.answer_current(&mut session, selected).unwrap();
    }
    loop_svc.finish_session(&mut session).await.unwrap();

    // Second session: everything wrong, finished mid-way.
    let mut weaker = loop_svc.start_section(Section::Verbal).await.unwrap();
    let current = weaker.current().unwrap();
    let wrong = (current.correct_index() + 1) % current.options().len();
    loop_svc.answer_current(&mut weaker, wrong).unwrap();
    let summary = loop_svc.finish_session(&mut weaker).await.unwrap();
    assert_eq!(summary.accuracy(), 0);

    let stored = store.stored().unwrap();
    assert_eq!(stored.total_sessions(), 2);
    assert_eq!(stored.best_accuracy(), 100);
}

#[tokio::test]
async fn attempt_counts_survive_across_sessions() {
    let store = Arc::new(InMemoryStatsStore::new());

    let mut loop_svc = workflow(seeded_source(), store.clone()).await;
    let mut session = loop_svc.start_section(Section::Verbal).await.unwrap();
    let first_id = session.current().unwrap().id();
    loop_svc.answer_current(&mut session, 0).unwrap();
    loop_svc.finish_session(&mut session).await.unwrap();
    assert_eq!(loop_svc.attempt_count(first_id), 1);

    // A fresh workflow over the same store sees the persisted counts.
    let reloaded = workflow(seeded_source(), store).await;
    assert_eq!(reloaded.attempt_count(first_id), 1);
}

// ─── Presentation boundary ────────────────────────────────────────────────────

#[derive(Default)]
struct RecordingSink {
    shown: Vec<String>,
    outcomes: Vec<bool>,
    summaries: Vec<u32>,
}

impl PresentationSink for RecordingSink {
    fn show_question(
        &mut self,
        question: &QuestionRecord,
        progress: &SessionProgress,
        prior_attempts: u32,
    ) {
        self.shown
            .push(format!("{} @{} x{}", question.id(), progress.answered, prior_attempts));
    }

    fn notify_answer(&mut self, correct: bool, _explanation: &str) {
        self.outcomes.push(correct);
    }

    fn show_summary(&mut self, summary: &SessionSummary, _global: &GlobalStats) {
        self.summaries.push(summary.accuracy());
    }
}

#[tokio::test]
async fn presentation_sink_sees_the_whole_session() {
    let store = Arc::new(InMemoryStatsStore::new());
    let mut loop_svc = workflow(seeded_source(), store).await;
    let mut sink = RecordingSink::default();

    let mut session = loop_svc.start_section(Section::Verbal).await.unwrap();
    while !session.is_complete() {
        let question = session.current().unwrap().clone();
        let progress = session.progress();
        sink.show_question(&question, &progress, loop_svc.attempt_count(question.id()));

        let result = loop_svc
            .answer_current(&mut session, question.correct_index())
            .unwrap();
        sink.notify_answer(result.outcome.correct, result.outcome.question.explanation());
    }

    let summary = loop_svc.finish_session(&mut session).await.unwrap();
    sink.show_summary(&summary, loop_svc.global_stats());

    assert_eq!(sink.shown.len(), 4);
    assert_eq!(sink.outcomes, vec![true, true, true, true]);
    assert_eq!(sink.summaries, vec![100]);
}

// ─── Persistence failure tolerance ────────────────────────────────────────────

struct FailingStatsStore;

#[async_trait]
impl StatsStore for FailingStatsStore {
    async fn load_stats(&self) -> Result<GlobalStats, StorageError> {
        Err(StorageError::Io("disk on fire".to_string()))
    }

    async fn save_stats(&self, _stats: &GlobalStats) -> Result<(), StorageError> {
        Err(StorageError::Io("disk on fire".to_string()))
    }
}

#[tokio::test]
async fn broken_stats_store_never_blocks_the_quiz() {
    let mut loop_svc = SessionLoopService::init(
        fixed_clock(),
        Arc::new(seeded_source()),
        Arc::new(FailingStatsStore),
    )
    .await;

    // Load failure fell back to defaults.
    assert_eq!(loop_svc.global_stats().total_sessions(), 0);

    let mut session = loop_svc.start_section(Section::Quantitative).await.unwrap();
    loop_svc.answer_current(&mut session, 0).unwrap();

    // Save failure is swallowed; the summary still comes back.
    let summary = loop_svc.finish_session(&mut session).await.unwrap();
    assert_eq!(summary.answered(), 1);
    assert_eq!(loop_svc.global_stats().total_sessions(), 1);
}
