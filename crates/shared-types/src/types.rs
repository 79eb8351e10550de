use std::collections::BTreeMap;

/// Operating mode selecting which pass/fail threshold applies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ComplianceMode {
    Strict,
    Fuzzy,
}

/// Pass/fail thresholds per mode, on the 0-100 score scale.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Thresholds {
    pub strict: f64,
    pub fuzzy: f64,
}

impl Thresholds {
    pub fn for_mode(&self, mode: ComplianceMode) -> f64 {
        match mode {
            ComplianceMode::Strict => self.strict,
            ComplianceMode::Fuzzy => self.fuzzy,
        }
    }
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            strict: 98.0,
            fuzzy: 80.0,
        }
    }
}

/// Reference script as authored by a compliance team.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct ReferenceScript {
    pub script_text: String,
    /// Unit id -> pre-approved alternate phrasings
    #[serde(default)]
    pub variants: BTreeMap<usize, Vec<String>>,
    /// Unit ids spoken at the agent's discretion, excluded from scoring
    #[serde(default)]
    pub optional_units: Vec<usize>,
}

impl ReferenceScript {
    pub fn new(script_text: impl Into<String>) -> Self {
        Self {
            script_text: script_text.into(),
            variants: BTreeMap::new(),
            optional_units: Vec::new(),
        }
    }
}

/// One required disclosure element of the reference script.
///
/// Ids are ordinal positions (1..N) and define the required reading order.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ScriptUnit {
    pub id: usize,
    pub canonical_text: String,
    pub variants: Vec<String>,
    pub required: bool,
}

/// A single word/number token with its character span in the source text.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct NormalizedToken {
    pub text: String,
    pub start: usize, // Character offset in the source text
    pub end: usize,   // End character offset (exclusive)
}

/// Outcome kind for one script unit.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(tag = "kind", content = "score", rename_all = "snake_case")]
pub enum MatchStatus {
    Exact,
    Fuzzy(f64),
    Missing,
}

impl MatchStatus {
    /// True for `Exact` and `Fuzzy`, false for `Missing`.
    pub fn is_hit(&self) -> bool {
        !matches!(self, MatchStatus::Missing)
    }

    pub fn is_exact(&self) -> bool {
        matches!(self, MatchStatus::Exact)
    }
}

/// Outcome of matching one script unit against the transcript.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct UnitMatch {
    pub unit_id: usize,
    pub status: MatchStatus,
    /// Token-offset range in the transcript (half-open), absent when `Missing`
    pub matched_span: Option<(usize, usize)>,
    /// Literal transcript substring behind the span, for paraphrase reporting
    pub matched_text: Option<String>,
}

/// Two matched units whose transcript order contradicts their script order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct SequenceError {
    pub earlier_unit_id: usize,
    pub later_unit_id: usize,
}

/// A fuzzy-matched unit reported so reviewers can compare wordings.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct ParaphrasedSection {
    pub unit_id: usize,
    pub canonical_text: String,
    pub matched_text: String,
    pub similarity: f64,
}

/// Final verdict for one transcript segment.
///
/// Field names and types are the stable contract persisted by callers and
/// rendered by dashboards; changing them requires a versioned migration.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct ComplianceVerdict {
    pub overall_score: f64,
    pub compliance_passed: bool,
    pub word_match_percentage: f64,
    pub phrase_match_percentage: f64,
    pub sequence_score: f64,
    pub similarity_score: f64,
    pub missing_phrases: Vec<String>,
    pub paraphrased_sections: Vec<ParaphrasedSection>,
    pub sequence_errors: Vec<SequenceError>,
    pub extra_content: Vec<String>,
    pub levenshtein_distance: usize,
    pub flagged_for_review: bool,
    pub flag_reasons: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_match_status_serializes_tagged() {
        let exact = serde_json::to_value(MatchStatus::Exact).unwrap();
        assert_eq!(exact["kind"], "exact");

        let fuzzy = serde_json::to_value(MatchStatus::Fuzzy(0.72)).unwrap();
        assert_eq!(fuzzy["kind"], "fuzzy");
        assert_eq!(fuzzy["score"], 0.72);
    }

    #[test]
    fn test_thresholds_default_and_mode_selection() {
        let t = Thresholds::default();
        assert_eq!(t.for_mode(ComplianceMode::Strict), 98.0);
        assert_eq!(t.for_mode(ComplianceMode::Fuzzy), 80.0);
    }

    #[test]
    fn test_reference_script_deserializes_without_optional_fields() {
        let script: ReferenceScript =
            serde_json::from_str(r#"{"script_text": "This call may be recorded."}"#).unwrap();
        assert!(script.variants.is_empty());
        assert!(script.optional_units.is_empty());
    }
}
