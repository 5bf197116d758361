use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

use crate::model::section::Section;

/// Unique identifier for a question: section plus position among the
/// section's validated records.
///
/// Serializes as the string form (`quantitative-3`) so it can key the
/// persisted attempt-count map.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct QuestionId {
    section: Section,
    index: u32,
}

impl QuestionId {
    /// Creates a new `QuestionId`.
    #[must_use]
    pub fn new(section: Section, index: u32) -> Self {
        Self { section, index }
    }

    #[must_use]
    pub fn section(&self) -> Section {
        self.section
    }

    /// Position among the section's validated records.
    #[must_use]
    pub fn index(&self) -> u32 {
        self.index
    }
}

impl fmt::Debug for QuestionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "QuestionId({self})")
    }
}

impl fmt::Display for QuestionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.section.key(), self.index)
    }
}

// ─── FromStr / Serde ───────────────────────────────────────────────────────────

/// Error type for parsing a `QuestionId` from its string form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseQuestionIdError {
    raw: String,
}

impl fmt::Display for ParseQuestionIdError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid question id: {}", self.raw)
    }
}

impl std::error::Error for ParseQuestionIdError {}

impl FromStr for QuestionId {
    type Err = ParseQuestionIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        // Section keys contain no dashes, so the last dash separates the index.
        let (section_key, index) = s.rsplit_once('-').ok_or_else(|| ParseQuestionIdError {
            raw: s.to_string(),
        })?;

        let section: Section = section_key.parse().map_err(|_| ParseQuestionIdError {
            raw: s.to_string(),
        })?;
        let index: u32 = index.parse().map_err(|_| ParseQuestionIdError {
            raw: s.to_string(),
        })?;

        Ok(Self { section, index })
    }
}

impl Serialize for QuestionId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for QuestionId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(D::Error::custom)
    }
}

// ─── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_joins_section_and_index() {
        let id = QuestionId::new(Section::Quantitative, 3);
        assert_eq!(id.to_string(), "quantitative-3");
    }

    #[test]
    fn from_str_round_trips() {
        let id = QuestionId::new(Section::GeneralAwareness, 12);
        let parsed: QuestionId = id.to_string().parse().unwrap();
        assert_eq!(parsed, id);
    }

    #[test]
    fn from_str_rejects_unknown_section() {
        let result = "astrology-1".parse::<QuestionId>();
        assert!(result.is_err());
    }

    #[test]
    fn from_str_rejects_missing_index() {
        let result = "quantitative".parse::<QuestionId>();
        assert!(result.is_err());
    }

    #[test]
    fn serializes_as_string_map_key() {
        let mut counts = std::collections::HashMap::new();
        counts.insert(QuestionId::new(Section::Verbal, 0), 2_u32);

        let json = serde_json::to_string(&counts).unwrap();
        assert_eq!(json, "{\"verbal-0\":2}");

        let back: std::collections::HashMap<QuestionId, u32> =
            serde_json::from_str(&json).unwrap();
        assert_eq!(back, counts);
    }
}
