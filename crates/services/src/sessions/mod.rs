mod plan;
mod progress;
mod service;
mod workflow;

// Public API of the session subsystem.
pub use crate::error::SessionError;
pub use plan::{MIN_MOCK_MINUTES, MIN_MOCK_QUESTIONS, MockParams, SessionPlan};
pub use progress::SessionProgress;
pub use service::{AnswerOutcome, SessionService};
pub use workflow::{AnswerResult, SessionLoopService};
