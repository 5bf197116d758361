use std::sync::Arc;
use tracing::warn;

use quiz_core::model::{GlobalStats, QuestionId};
use storage::repository::{StatsStore, StorageError};

/// Owns the cross-session stats record and its persistence.
///
/// Loss of stats persistence never blocks quiz usage: load failures fall
/// back to a fresh record, and save failures are logged and swallowed.
pub struct StatsService {
    store: Arc<dyn StatsStore>,
    stats: GlobalStats,
}

impl StatsService {
    /// Load the persisted record, falling back to defaults on missing or
    /// corrupt data.
    pub async fn load(store: Arc<dyn StatsStore>) -> Self {
        let stats = match store.load_stats().await {
            Ok(stats) => stats,
            Err(StorageError::NotFound) => GlobalStats::new(),
            Err(err) => {
                warn!(%err, "failed to load global stats, starting fresh");
                GlobalStats::new()
            }
        };

        Self { store, stats }
    }

    #[must_use]
    pub fn stats(&self) -> &GlobalStats {
        &self.stats
    }

    /// Attempts recorded for a question across all sessions.
    #[must_use]
    pub fn attempt_count(&self, id: QuestionId) -> u32 {
        self.stats.attempt_count(id)
    }

    /// Record one scored answer against a question.
    pub fn record_attempt(&mut self, id: QuestionId) {
        self.stats.record_attempt(id);
    }

    /// Fold a completed session into the record.
    pub fn record_session(&mut self, accuracy: u32, elapsed_secs: u64) {
        self.stats.record_session(accuracy, elapsed_secs);
    }

    /// Persist the current record. Best-effort: failures are logged, never
    /// propagated.
    pub async fn flush(&self) {
        if let Err(err) = self.store.save_stats(&self.stats).await {
            warn!(%err, "failed to persist global stats");
        }
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
