#![forbid(unsafe_code)]

pub mod bank_service;
pub mod error;
pub mod presentation;
pub mod sessions;
pub mod stats_service;

pub use quiz_core::Clock;
pub use sessions as session;

pub use bank_service::BankService;
pub use error::{BankError, MockParamsError, SessionError};
pub use presentation::PresentationSink;
pub use stats_service::StatsService;

pub use sessions::{
    AnswerOutcome, AnswerResult, MockParams, SessionLoopService, SessionPlan, SessionProgress,
    SessionService,
};
