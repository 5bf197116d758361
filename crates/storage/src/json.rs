//! JSON-file backends: one bank file per section, one stats file.

use async_trait::async_trait;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::debug;

use quiz_core::model::{GlobalStats, QuestionDraft, Section};

use crate::repository::{QuestionSource, StatsStore, StorageError};

fn map_read_error(err: std::io::Error) -> StorageError {
    if err.kind() == ErrorKind::NotFound {
        StorageError::NotFound
    } else {
        StorageError::Io(err.to_string())
    }
}

//
// ─── QUESTION BANK DIRECTORY ───────────────────────────────────────────────────
//

/// Question source reading `<dir>/<section>.json` files.
#[derive(Debug, Clone)]
pub struct JsonBankDir {
    dir: PathBuf,
}

impl JsonBankDir {
    #[must_use]
    pub fn new(dir: impl AsRef<Path>) -> Self {
        Self {
            dir: dir.as_ref().to_path_buf(),
        }
    }

    #[must_use]
    pub fn section_path(&self, section: Section) -> PathBuf {
        self.dir.join(format!("{}.json", section.key()))
    }
}

#[async_trait]
impl QuestionSource for JsonBankDir {
    async fn load_section(&self, section: Section) -> Result<Vec<QuestionDraft>, StorageError> {
        let path = self.section_path(section);
        let bytes = tokio::fs::read(&path).await.map_err(map_read_error)?;

        let drafts: Vec<QuestionDraft> = serde_json::from_slice(&bytes)
            .map_err(|e| StorageError::Malformed(e.to_string()))?;

        debug!(section = %section, count = drafts.len(), "loaded section bank file");
        Ok(drafts)
    }
}

//
// ─── STATS FILE ────────────────────────────────────────────────────────────────
//

/// Stats store persisting the `GlobalStats` record to a single JSON file.
#[derive(Debug, Clone)]
pub struct JsonStatsFile {
    path: PathBuf,
}

impl JsonStatsFile {
    #[must_use]
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl StatsStore for JsonStatsFile {
    async fn load_stats(&self) -> Result<GlobalStats, StorageError> {
        let bytes = tokio::fs::read(&self.path).await.map_err(map_read_error)?;
        serde_json::from_slice(&bytes).map_err(|e| StorageError::Malformed(e.to_string()))
    }

    async fn save_stats(&self, stats: &GlobalStats) -> Result<(), StorageError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent)
                    .await
                    .map_err(|e| StorageError::Io(e.to_string()))?;
            }
        }

        let bytes = serde_json::to_vec_pretty(stats)
            .map_err(|e| StorageError::Malformed(e.to_string()))?;
        tokio::fs::write(&self.path, bytes)
            .await
            .map_err(|e| StorageError::Io(e.to_string()))?;

        debug!(path = %self.path.display(), "saved global stats");
        Ok(())
    }
}
