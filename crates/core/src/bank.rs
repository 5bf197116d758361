use std::collections::BTreeMap;

use crate::model::{QuestionRecord, Section};

/// An immutable, validated collection of questions, partitioned by section.
///
/// Sections that failed to load are simply absent; `all_questions` is the
/// concatenation of the loaded sections in enumeration order, so the
/// superset degrades gracefully when some sections are unavailable.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QuestionBank {
    sections: BTreeMap<Section, Vec<QuestionRecord>>,
}

impl QuestionBank {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a bank from per-section record lists. Empty lists are dropped
    /// so `loaded_sections` only reports sections that actually have
    /// questions.
    #[must_use]
    pub fn from_sections(
        sections: impl IntoIterator<Item = (Section, Vec<QuestionRecord>)>,
    ) -> Self {
        let sections = sections
            .into_iter()
            .filter(|(_, records)| !records.is_empty())
            .collect();
        Self { sections }
    }

    /// Replace one section's records. An empty list removes the section.
    pub fn set_section(&mut self, section: Section, records: Vec<QuestionRecord>) {
        if records.is_empty() {
            self.sections.remove(&section);
        } else {
            self.sections.insert(section, records);
        }
    }

    /// Validated records for a section; empty when the section is absent.
    #[must_use]
    pub fn section(&self, section: Section) -> &[QuestionRecord] {
        self.sections
            .get(&section)
            .map_or(&[], Vec::as_slice)
    }

    #[must_use]
    pub fn has_section(&self, section: Section) -> bool {
        self.sections.contains_key(&section)
    }

    /// Sections with at least one validated question, in enumeration order.
    pub fn loaded_sections(&self) -> impl Iterator<Item = Section> + '_ {
        self.sections.keys().copied()
    }

    /// Sections currently absent from the bank, in enumeration order.
    pub fn missing_sections(&self) -> impl Iterator<Item = Section> + '_ {
        Section::ALL
            .into_iter()
            .filter(|section| !self.sections.contains_key(section))
    }

    /// The "all questions" superset: every loaded section's records,
    /// concatenated in section enumeration order.
    #[must_use]
    pub fn all_questions(&self) -> Vec<QuestionRecord> {
        self.sections.values().flatten().cloned().collect()
    }

    /// Superset filtered to the given topics; order within the result still
    /// follows section enumeration order.
    #[must_use]
    pub fn questions_for_topics(&self, topics: &[Section]) -> Vec<QuestionRecord> {
        self.sections
            .iter()
            .filter(|(section, _)| topics.contains(section))
            .flat_map(|(_, records)| records.iter().cloned())
            .collect()
    }

    /// Total number of validated questions across all loaded sections.
    #[must_use]
    pub fn len(&self) -> usize {
        self.sections.values().map(Vec::len).sum()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }
}

// ─── Tests ─────────────────────────────────────────────────────────────────────
