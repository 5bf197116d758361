use async_trait::async_trait;
use std::collections::HashMap;
use std::path::Path;
use std::sync::{Arc, Mutex};
use thiserror::Error;

use quiz_core::model::{GlobalStats, QuestionDraft, Section};

/// Errors surfaced by storage adapters.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum StorageError {
    #[error("not found")]
    NotFound,

    #[error("io error: {0}")]
    Io(String),

    #[error("malformed data: {0}")]
    Malformed(String),
}

/// Source of raw question drafts, one batch per section.
///
/// Implementations only fetch and parse; the validation that turns drafts
/// into records lives in the services layer.
#[async_trait]
pub trait QuestionSource: Send + Sync {
    /// Fetch the raw drafts for a section.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::NotFound` if the section has no backing data,
    /// `StorageError::Malformed` if the data cannot be parsed, or
    /// `StorageError::Io` for transport failures.
    async fn load_section(&self, section: Section) -> Result<Vec<QuestionDraft>, StorageError>;
}

/// Persistence for the cross-session `GlobalStats` record.
#[async_trait]
pub trait StatsStore: Send + Sync {
    /// Fetch the persisted stats record.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::NotFound` if nothing has been persisted yet,
    /// or other storage errors.
    async fn load_stats(&self) -> Result<GlobalStats, StorageError>;

    /// Persist the stats record, replacing any previous one.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the record cannot be written.
    async fn save_stats(&self, stats: &GlobalStats) -> Result<(), StorageError>;
}

//
// ─── IN-MEMORY IMPLEMENTATIONS ─────────────────────────────────────────────────
//

/// In-memory question source for tests and prototyping.
#[derive(Clone, Default)]
pub struct InMemoryQuestionSource {
    sections: Arc<Mutex<HashMap<Section, Vec<QuestionDraft>>>>,
}

impl InMemoryQuestionSource {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed or replace one section's drafts.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    pub fn set_section(&self, section: Section, drafts: Vec<QuestionDraft>) {
        self.sections
            .lock()
            .expect("section map lock poisoned")
            .insert(section, drafts);
    }

    /// Remove a section so subsequent loads fail with `NotFound`.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    pub fn remove_section(&self, section: Section) {
        self.sections
            .lock()
            .expect("section map lock poisoned")
            .remove(&section);
    }
}

#[async_trait]
impl QuestionSource for InMemoryQuestionSource {
    async fn load_section(&self, section: Section) -> Result<Vec<QuestionDraft>, StorageError> {
        let guard = self
            .sections
            .lock()
            .map_err(|e| StorageError::Io(e.to_string()))?;
        guard.get(&section).cloned().ok_or(StorageError::NotFound)
    }
}

/// In-memory stats store for tests and prototyping.
#[derive(Clone, Default)]
pub struct InMemoryStatsStore {
    stats: Arc<Mutex<Option<GlobalStats>>>,
}

impl InMemoryStatsStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of the stored record, if any.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    #[must_use]
    pub fn stored(&self) -> Option<GlobalStats> {
        self.stats.lock().expect("stats lock poisoned").clone()
    }
}

#[async_trait]
impl StatsStore for InMemoryStatsStore {
    async fn load_stats(&self) -> Result<GlobalStats, StorageError> {
        let guard = self
            .stats
            .lock()
            .map_err(|e| StorageError::Io(e.to_string()))?;
        guard.clone().ok_or(StorageError::NotFound)
    }

    async fn save_stats(&self, stats: &GlobalStats) -> Result<(), StorageError> {
        let mut guard = self
            .stats
            .lock()
            .map_err(|e| StorageError::Io(e.to_string()))?;
        *guard = Some(stats.clone());
        Ok(())
    }
}

//
// ─── STORAGE AGGREGATE ─────────────────────────────────────────────────────────
//

/// Aggregates the question source and stats store behind trait objects for
/// easy backend swapping.
#[derive(Clone)]
pub struct Storage {
    pub questions: Arc<dyn QuestionSource>,
    pub stats: Arc<dyn StatsStore>,
}

impl Storage {
    #[must_use]
    pub fn in_memory() -> Self {
        Self {
            questions: Arc::new(InMemoryQuestionSource::new()),
            stats: Arc::new(InMemoryStatsStore::new()),
        }
    }

    /// JSON-backed storage: one bank file per section under `questions_dir`,
    /// stats in a single file at `stats_path`.
    #[must_use]
    pub fn json(questions_dir: impl AsRef<Path>, stats_path: impl AsRef<Path>) -> Self {
        Self {
            questions: Arc::new(crate::json::JsonBankDir::new(questions_dir)),
            stats: Arc::new(crate::json::JsonStatsFile::new(stats_path)),
        }
    }
}
