//! Shared error types for the services crate.

use thiserror::Error;

use quiz_core::model::{Section, SessionSummaryError};

/// Errors emitted by `BankService`.
///
/// Load failures are deliberately coarse: a missing file, a malformed file,
/// and a file whose records all fail validation look the same to the caller
/// (an empty section), with the cause preserved in the logs.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum BankError {
    #[error("no valid questions for section {0}")]
    EmptySection(Section),

    #[error("no questions available from any section")]
    NoQuestions,
}

/// Errors emitted by mock exam parameter validation.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum MockParamsError {
    #[error("a mock exam needs at least {min} questions, got {requested}")]
    TooFewQuestions { requested: usize, min: usize },

    #[error("a mock exam needs at least {min} minute(s), got {minutes}")]
    TooShort { minutes: u32, min: u32 },

    #[error("requested {requested} questions but only {available} are available")]
    ExceedsPool { requested: usize, available: usize },
}

/// Errors emitted by session services.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum SessionError {
    #[error("no questions available for session")]
    Empty,

    #[error("session already completed")]
    Completed,

    #[error("current question was already answered")]
    AlreadyAnswered,

    #[error("option index {index} is out of range for {len} options")]
    InvalidOption { index: usize, len: usize },

    #[error(transparent)]
    MockParams(#[from] MockParamsError),

    #[error(transparent)]
    Bank(#[from] BankError),

    #[error(transparent)]
    Summary(#[from] SessionSummaryError),
}
