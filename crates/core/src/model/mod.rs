mod ids;
mod question;
mod section;
mod stats;
mod summary;

pub use ids::{ParseQuestionIdError, QuestionId};
pub use question::{Difficulty, QuestionDraft, QuestionRecord, QuestionValidationError};
pub use section::{ParseSectionError, Section};
pub use stats::GlobalStats;
pub use summary::{SessionMode, SessionSummary, SessionSummaryError, accuracy_pct};
