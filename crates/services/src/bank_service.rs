use std::sync::Arc;
use tracing::warn;

use quiz_core::QuestionBank;
use quiz_core::model::{QuestionDraft, QuestionRecord, Section};
use storage::repository::QuestionSource;

use crate::error::BankError;

/// Loads, validates, and caches the section question banks.
///
/// Malformed records are dropped at load time and never reach the engine;
/// a section that fails to load degrades to empty rather than failing the
/// bank as a whole.
pub struct BankService {
    source: Arc<dyn QuestionSource>,
    bank: QuestionBank,
}

impl BankService {
    #[must_use]
    pub fn new(source: Arc<dyn QuestionSource>) -> Self {
        Self {
            source,
            bank: QuestionBank::new(),
        }
    }

    /// The validated bank as loaded so far.
    #[must_use]
    pub fn bank(&self) -> &QuestionBank {
        &self.bank
    }

    /// Load and validate one section, caching the result.
    ///
    /// Already-loaded sections are served from the cache; sections that
    /// previously failed are retried, so the superset recovers
    /// opportunistically once their backing data appears.
    ///
    /// # Errors
    ///
    /// Returns `BankError::EmptySection` when the section is missing,
    /// malformed, or left empty by validation.
    pub async fn load_section(
        &mut self,
        section: Section,
    ) -> Result<&[QuestionRecord], BankError> {
        if !self.bank.has_section(section) {
            match self.source.load_section(section).await {
                Ok(drafts) => {
                    let records = validate_drafts(section, drafts);
                    self.bank.set_section(section, records);
                }
                Err(err) => {
                    warn!(section = %section, %err, "failed to load section bank");
                }
            }
        }

        let records = self.bank.section(section);
        if records.is_empty() {
            Err(BankError::EmptySection(section))
        } else {
            Ok(records)
        }
    }

    /// Load every section, degrading individual failures to empty sections.
    ///
    /// # Errors
    ///
    /// Returns `BankError::NoQuestions` only when every section ends up
    /// empty.
    pub async fn load_all(&mut self) -> Result<(), BankError> {
        for section in Section::ALL {
            let _ = self.load_section(section).await;
        }

        if self.bank.is_empty() {
            Err(BankError::NoQuestions)
        } else {
            Ok(())
        }
    }
}

/// Apply the record validation rule, dropping failures.
///
/// Identifiers are assigned by position among the survivors, matching the
/// ids used in the persisted attempt counts.
fn validate_drafts(section: Section, drafts: Vec<QuestionDraft>) -> Vec<QuestionRecord> {
    let total = drafts.len();
    let mut records: Vec<QuestionRecord> = Vec::with_capacity(total);

    for draft in drafts {
        let index = u32::try_from(records.len()).unwrap_or(u32::MAX);
        match draft.validate(section, index) {
            Ok(record) => records.push(record),
            Err(err) => {
                warn!(section = %section, %err, "dropping invalid question record");
            }
        }
    }

    if records.len() < total {
        warn!(
            section = %section,
            kept = records.len(),
            dropped = total - records.len(),
            "section bank loaded with invalid records"
        );
    }

    records
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
