#![forbid(unsafe_code)]

pub mod json;
pub mod repository;

pub use json::{JsonBankDir, JsonStatsFile};
pub use repository::{
    InMemoryQuestionSource, InMemoryStatsStore, QuestionSource, StatsStore, Storage, StorageError,
};
