//! Structured outcome of one area-code lookup.

use serde::Serialize;

use crate::AreaCode;

/// Reason recorded when a response parsed cleanly but every field was default.
pub const NO_INFORMATION_REASON: &str = "extraction response carried no information";

/// Field values read from a single extraction response.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ExtractedFacts {
    pub in_use: bool,
    pub assignable: bool,
    pub location: String,
    pub country: String,
}

impl ExtractedFacts {
    /// `true` when no field differs from its default.
    #[must_use]
    pub fn is_blank(&self) -> bool {
        !self.in_use && !self.assignable && self.location.is_empty() && self.country.is_empty()
    }
}

/// The result recorded for one [`AreaCode`].
///
/// A record is either *informative* (facts from one extraction response, no
/// reason) or *empty* (all defaults plus a diagnostic `reason`). The
/// constructors are the only way to build one, so a partially populated record
/// cannot exist.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CodeRecord {
    code: AreaCode,
    #[serde(flatten)]
    facts: ExtractedFacts,
    reason: Option<String>,
}

impl CodeRecord {
    /// An empty record explaining why nothing could be determined.
    #[must_use]
    pub fn empty(code: AreaCode, reason: impl Into<String>) -> Self {
        Self {
            code,
            facts: ExtractedFacts::default(),
            reason: Some(reason.into()),
        }
    }

    /// A record built from one response's facts.
    ///
    /// Blank facts degrade to an empty record with [`NO_INFORMATION_REASON`].
    #[must_use]
    pub fn from_facts(code: AreaCode, facts: ExtractedFacts) -> Self {
        if facts.is_blank() {
            return Self::empty(code, NO_INFORMATION_REASON);
        }
        Self {
            code,
            facts,
            reason: None,
        }
    }

    #[must_use]
    pub fn code(&self) -> AreaCode {
        self.code
    }

    #[must_use]
    pub fn in_use(&self) -> bool {
        self.facts.in_use
    }

    #[must_use]
    pub fn assignable(&self) -> bool {
        self.facts.assignable
    }

    #[must_use]
    pub fn location(&self) -> &str {
        &self.facts.location
    }

    #[must_use]
    pub fn country(&self) -> &str {
        &self.facts.country
    }

    #[must_use]
    pub fn reason(&self) -> Option<&str> {
        self.reason.as_deref()
    }

    /// Whether the record carries extracted facts. Persisted as `valid`.
    #[must_use]
    pub fn is_informative(&self) -> bool {
        self.reason.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn code(s: &str) -> AreaCode {
        s.parse().unwrap()
    }

    #[test]
    fn empty_record_has_defaults_and_reason() {
        let record = CodeRecord::empty(code("555"), "unparsable extraction response");
        assert!(!record.is_informative());
        assert!(!record.in_use());
        assert!(!record.assignable());
        assert_eq!(record.location(), "");
        assert_eq!(record.country(), "");
        assert_eq!(record.reason(), Some("unparsable extraction response"));
    }

    #[test]
    fn from_facts_keeps_informative_fields() {
        let facts = ExtractedFacts {
            in_use: true,
            assignable: false,
            location: "New York City".to_string(),
            country: "US".to_string(),
        };
        let record = CodeRecord::from_facts(code("212"), facts);
        assert!(record.is_informative());
        assert_eq!(record.code(), code("212"));
        assert!(record.in_use());
        assert!(!record.assignable());
        assert_eq!(record.location(), "New York City");
        assert_eq!(record.country(), "US");
        assert!(record.reason().is_none());
    }

    #[test]
    fn single_true_flag_is_informative() {
        let facts = ExtractedFacts {
            assignable: true,
            ..ExtractedFacts::default()
        };
        assert!(CodeRecord::from_facts(code("200"), facts).is_informative());
    }

    #[test]
    fn blank_facts_degrade_to_empty() {
        let record = CodeRecord::from_facts(code("311"), ExtractedFacts::default());
        assert!(!record.is_informative());
        assert_eq!(record.reason(), Some(NO_INFORMATION_REASON));
    }

    #[test]
    fn serializes_flat() {
        let record = CodeRecord::empty(code("042"), "nothing");
        let value = serde_json::to_value(&record).unwrap();
        assert_eq!(value["code"], "042");
        assert_eq!(value["in_use"], false);
        assert_eq!(value["reason"], "nothing");
    }
}
