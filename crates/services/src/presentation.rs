use quiz_core::model::{GlobalStats, QuestionRecord, SessionSummary};

use crate::sessions::SessionProgress;

/// Boundary the session drivers render through.
///
/// The engine and workflow never touch presentation specifics; a driver
/// (terminal app, test harness) implements this trait and decides how a
/// question or summary actually appears.
pub trait PresentationSink {
    /// Present the question to answer next, along with session progress and
    /// how many times the learner attempted it in earlier sessions.
    fn show_question(
        &mut self,
        question: &QuestionRecord,
        progress: &SessionProgress,
        prior_attempts: u32,
    );

    /// Signal the outcome of a scored answer together with the explanation.
    fn notify_answer(&mut self, correct: bool, explanation: &str);

    /// Present the end-of-session summary against the global record.
    fn show_summary(&mut self, summary: &SessionSummary, global: &GlobalStats);
}
