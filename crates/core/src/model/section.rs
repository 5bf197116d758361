use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A named topic partition of the question bank.
///
/// The section set is fixed: one JSON file per section on disk, and the
/// "all questions" superset is assembled in enumeration order.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum Section {
    Quantitative,
    Verbal,
    Logical,
    GeneralAwareness,
    CurrentAffairs,
    Domain1,
    Domain2,
    Domain3,
}

impl Section {
    /// Every section, in enumeration order.
    pub const ALL: [Section; 8] = [
        Section::Quantitative,
        Section::Verbal,
        Section::Logical,
        Section::GeneralAwareness,
        Section::CurrentAffairs,
        Section::Domain1,
        Section::Domain2,
        Section::Domain3,
    ];

    /// Stable snake_case key, also the file stem of the section's bank file.
    #[must_use]
    pub fn key(self) -> &'static str {
        match self {
            Section::Quantitative => "quantitative",
            Section::Verbal => "verbal",
            Section::Logical => "logical",
            Section::GeneralAwareness => "general_awareness",
            Section::CurrentAffairs => "current_affairs",
            Section::Domain1 => "domain1",
            Section::Domain2 => "domain2",
            Section::Domain3 => "domain3",
        }
    }

    /// Human-readable name for display.
    #[must_use]
    pub fn display_name(self) -> &'static str {
        match self {
            Section::Quantitative => "Quantitative",
            Section::Verbal => "Verbal",
            Section::Logical => "Logical",
            Section::GeneralAwareness => "General Awareness",
            Section::CurrentAffairs => "Current Affairs",
            Section::Domain1 => "Domain 1",
            Section::Domain2 => "Domain 2",
            Section::Domain3 => "Domain 3",
        }
    }
}

impl fmt::Display for Section {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// Error type for parsing a section from its key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseSectionError {
    raw: String,
}

impl ParseSectionError {
    #[must_use]
    pub fn raw(&self) -> &str {
        &self.raw
    }
}

impl fmt::Display for ParseSectionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown section: {}", self.raw)
    }
}

impl std::error::Error for ParseSectionError {}

impl FromStr for Section {
    type Err = ParseSectionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Section::ALL
            .into_iter()
            .find(|section| section.key() == s)
            .ok_or_else(|| ParseSectionError { raw: s.to_string() })
    }
}

// ─── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn key_round_trips_for_every_section() {
        for section in Section::ALL {
            let parsed: Section = section.key().parse().unwrap();
            assert_eq!(parsed, section);
        }
    }

    #[test]
    fn unknown_key_is_rejected() {
        let err = "astrology".parse::<Section>().unwrap_err();
        assert_eq!(err.raw(), "astrology");
    }

    #[test]
    fn enumeration_order_is_stable() {
        assert_eq!(Section::ALL[0], Section::Quantitative);
        assert_eq!(Section::ALL[7], Section::Domain3);
        let mut sorted = Section::ALL;
        sorted.sort();
        assert_eq!(sorted, Section::ALL);
    }

    #[test]
    fn serde_uses_snake_case_keys() {
        let json = serde_json::to_string(&Section::GeneralAwareness).unwrap();
        assert_eq!(json, "\"general_awareness\"");
        let back: Section = serde_json::from_str(&json).unwrap();
        assert_eq!(back, Section::GeneralAwareness);
    }
}
