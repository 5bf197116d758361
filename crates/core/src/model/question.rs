use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::model::ids::QuestionId;
use crate::model::section::Section;

//
// ─── DIFFICULTY ────────────────────────────────────────────────────────────────
//

/// Difficulty tag carried by a question. Unknown or missing tags fall back
/// to `Medium`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    #[default]
    Medium,
    Hard,
}

impl Difficulty {
    /// Parse a raw tag, defaulting to `Medium` when absent or unrecognized.
    #[must_use]
    pub fn from_tag(tag: Option<&str>) -> Self {
        match tag {
            Some("easy") => Difficulty::Easy,
            Some("hard") => Difficulty::Hard,
            _ => Difficulty::Medium,
        }
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Difficulty::Easy => "easy",
            Difficulty::Medium => "medium",
            Difficulty::Hard => "hard",
        }
    }
}

//
// ─── QUESTION TYPES ────────────────────────────────────────────────────────────
//

/// Wire shape of one entry in a section's JSON bank file.
///
/// Every field defaults so that a structurally incomplete record still
/// deserializes; validation is what rejects it. Field names follow the bank
/// file format (`question`, `correctAnswer`).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct QuestionDraft {
    #[serde(rename = "question")]
    pub prompt: String,
    pub options: Vec<String>,
    #[serde(rename = "correctAnswer")]
    pub correct_answer: Option<i64>,
    pub explanation: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub difficulty: Option<String>,
}

impl QuestionDraft {
    /// Validate the draft into a `QuestionRecord` with the given identity.
    ///
    /// # Errors
    ///
    /// Returns `QuestionValidationError` if the prompt or explanation is
    /// empty, fewer than two options are present, or the correct index is
    /// missing or out of range.
    pub fn validate(
        self,
        section: Section,
        index: u32,
    ) -> Result<QuestionRecord, QuestionValidationError> {
        if self.prompt.trim().is_empty() {
            return Err(QuestionValidationError::EmptyPrompt);
        }
        if self.options.len() < 2 {
            return Err(QuestionValidationError::TooFewOptions {
                len: self.options.len(),
            });
        }

        let raw_index = self
            .correct_answer
            .ok_or(QuestionValidationError::MissingCorrectIndex)?;
        let correct_index = usize::try_from(raw_index).map_err(|_| {
            QuestionValidationError::CorrectIndexOutOfRange {
                index: raw_index,
                len: self.options.len(),
            }
        })?;
        if correct_index >= self.options.len() {
            return Err(QuestionValidationError::CorrectIndexOutOfRange {
                index: raw_index,
                len: self.options.len(),
            });
        }

        if self.explanation.trim().is_empty() {
            return Err(QuestionValidationError::EmptyExplanation);
        }

        Ok(QuestionRecord {
            id: QuestionId::new(section, index),
            section,
            prompt: self.prompt,
            options: self.options,
            correct_index,
            explanation: self.explanation,
            difficulty: Difficulty::from_tag(self.difficulty.as_deref()),
        })
    }
}

/// A validated quiz question.
///
/// Invariant: at least two options, `correct_index` in range, non-empty
/// prompt and explanation. Drafts failing validation never become records.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuestionRecord {
    id: QuestionId,
    section: Section,
    prompt: String,
    options: Vec<String>,
    correct_index: usize,
    explanation: String,
    difficulty: Difficulty,
}

impl QuestionRecord {
    #[must_use]
    pub fn id(&self) -> QuestionId {
        self.id
    }

    #[must_use]
    pub fn section(&self) -> Section {
        self.section
    }

    #[must_use]
    pub fn prompt(&self) -> &str {
        &self.prompt
    }

    #[must_use]
    pub fn options(&self) -> &[String] {
        &self.options
    }

    #[must_use]
    pub fn correct_index(&self) -> usize {
        self.correct_index
    }

    #[must_use]
    pub fn explanation(&self) -> &str {
        &self.explanation
    }

    #[must_use]
    pub fn difficulty(&self) -> Difficulty {
        self.difficulty
    }

    /// True when the given option index is the correct answer.
    #[must_use]
    pub fn is_correct(&self, selected_index: usize) -> bool {
        selected_index == self.correct_index
    }
}

//
// ─── VALIDATION ERRORS ─────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum QuestionValidationError {
    #[error("question prompt is empty")]
    EmptyPrompt,

    #[error("question needs at least two options, got {len}")]
    TooFewOptions { len: usize },

    #[error("correct answer index is missing")]
    MissingCorrectIndex,

    #[error("correct answer index {index} is out of range for {len} options")]
    CorrectIndexOutOfRange { index: i64, len: usize },

    #[error("question explanation is empty")]
    EmptyExplanation,
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
